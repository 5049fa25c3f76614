//! Sentence interface to the graph.
//!
//! A sentence ending in `?` asks which thoughts are related to every thought
//! named in it. A sentence ending in `.` teaches the graph that the named
//! thoughts belong together. Anything else is ignored.
//!
//! Query tokens only resolve to existing thoughts; unknown words are dropped
//! and never create nodes.

use crate::registry::ThoughtGraph;
use rayon::prelude::*;
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use thoughtnet_core::error::{Result, ThoughtError};
use thoughtnet_core::node::ThoughtNode;
use thoughtnet_core::store::ThoughtStore;
use thoughtnet_core::types::NodeId;
use tracing::{debug, warn};

/// What a sentence asks for, decided by its final raw token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    Question,
    Remember,
    Ignore,
}

impl QueryMode {
    pub fn detect(last_token: &str) -> Self {
        if last_token.ends_with('?') {
            QueryMode::Question
        } else if last_token.ends_with('.') {
            QueryMode::Remember
        } else {
            QueryMode::Ignore
        }
    }
}

/// Result of processing one sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    /// Thoughts related to every queried thought.
    Related(BTreeSet<String>),
    /// Nothing is related to all of the queried thoughts, or none resolved.
    NotFound,
    /// The queried thoughts are not all associated with each other.
    NotAClique,
    /// Associations created while remembering, as `(source, target)`.
    Remembered(Vec<(String, String)>),
    /// The sentence ended in neither `?` nor `.`.
    Ignored,
}

/// Keep only ASCII letters and digits.
pub fn sanitize(token: &str) -> String {
    token.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

/// Answers questions and remembers statements against a graph.
pub struct QueryProcessor {
    graph: Arc<ThoughtGraph>,
    store: Option<Arc<dyn ThoughtStore>>,
}

impl QueryProcessor {
    pub fn new(graph: Arc<ThoughtGraph>) -> Self {
        Self { graph, store: None }
    }

    /// Mirror associations created while remembering into `store`.
    pub fn with_store(mut self, store: Arc<dyn ThoughtStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn process(&self, sentence: &str) -> Result<QueryOutcome> {
        let tokens: Vec<&str> = sentence.split_whitespace().collect();
        let Some(last) = tokens.last() else {
            return Err(ThoughtError::EmptyQuery);
        };

        let mode = QueryMode::detect(last);
        if mode == QueryMode::Ignore {
            debug!(sentence, "query ignored: no terminator");
            return Ok(QueryOutcome::Ignored);
        }

        let nodes = self.resolve(&tokens);
        debug!(?mode, resolved = nodes.len(), tokens = tokens.len(), "processing query");

        match mode {
            QueryMode::Question => Ok(self.answer(&nodes)),
            QueryMode::Remember => self.remember(&nodes),
            QueryMode::Ignore => Ok(QueryOutcome::Ignored),
        }
    }

    /// Existing thoughts named by `tokens`, in first-occurrence order.
    fn resolve(&self, tokens: &[&str]) -> Vec<Arc<ThoughtNode>> {
        let found: Vec<Arc<ThoughtNode>> = tokens
            .par_iter()
            .filter_map(|token| {
                let name = sanitize(token);
                if name.is_empty() {
                    None
                } else {
                    self.graph.lookup(&name)
                }
            })
            .collect();

        let mut seen = HashSet::new();
        found
            .into_iter()
            .filter(|node| seen.insert(node.id()))
            .collect()
    }

    fn answer(&self, nodes: &[Arc<ThoughtNode>]) -> QueryOutcome {
        let Some((first, rest)) = nodes.split_first() else {
            return QueryOutcome::NotFound;
        };
        if !is_clique(nodes) {
            return QueryOutcome::NotAClique;
        }

        let queried: HashSet<NodeId> = nodes.iter().map(|node| node.id()).collect();
        let neighbor_sets: Vec<HashSet<NodeId>> =
            rest.iter().map(|node| node.neighbor_ids()).collect();

        let related: BTreeSet<String> = first
            .associations()
            .par_iter()
            .filter(|assoc| !queried.contains(&assoc.target.id()))
            .filter(|assoc| {
                neighbor_sets
                    .iter()
                    .all(|set| set.contains(&assoc.target.id()))
            })
            .map(|assoc| assoc.target.name().to_string())
            .collect();

        if related.is_empty() {
            QueryOutcome::NotFound
        } else {
            QueryOutcome::Related(related)
        }
    }

    fn remember(&self, nodes: &[Arc<ThoughtNode>]) -> Result<QueryOutcome> {
        let mut created = Vec::new();
        for from in nodes {
            for to in nodes {
                if from.id() == to.id() || from.is_connected_to(&to.id()) {
                    continue;
                }
                if self.graph.connect(from.name(), to.name()) {
                    created.push((from.name().to_string(), to.name().to_string()));
                }
            }
        }

        if let Some(store) = &self.store {
            let mut first_error = None;
            for (source, target) in &created {
                if let Err(e) = store.save_edge(source, target) {
                    warn!(source = %source, target = %target, error = %e, "failed to persist association");
                    first_error.get_or_insert(e);
                }
            }
            if let Some(e) = first_error {
                return Err(e);
            }
        }

        debug!(created = created.len(), "remembered sentence");
        Ok(QueryOutcome::Remembered(created))
    }
}

/// Every ordered pair of distinct nodes has an association.
fn is_clique(nodes: &[Arc<ThoughtNode>]) -> bool {
    nodes.par_iter().all(|from| {
        nodes
            .iter()
            .all(|to| from.id() == to.id() || from.is_connected_to(&to.id()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_with(names: &[&str], links: &[(&str, &str)]) -> Arc<ThoughtGraph> {
        let graph = Arc::new(ThoughtGraph::new());
        for name in names {
            graph.create(name);
        }
        for (a, b) in links {
            graph.connect(a, b);
        }
        graph
    }

    fn related(names: &[&str]) -> QueryOutcome {
        QueryOutcome::Related(names.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn mode_detection() {
        assert_eq!(QueryMode::detect("animal?"), QueryMode::Question);
        assert_eq!(QueryMode::detect("animal."), QueryMode::Remember);
        assert_eq!(QueryMode::detect("animal"), QueryMode::Ignore);
    }

    #[test]
    fn sanitize_strips_punctuation() {
        assert_eq!(sanitize("cat?"), "cat");
        assert_eq!(sanitize("(rock-solid)."), "rocksolid");
        assert_eq!(sanitize("?!"), "");
    }

    #[test]
    fn empty_sentence_is_an_error() {
        let processor = QueryProcessor::new(Arc::new(ThoughtGraph::new()));
        assert_eq!(processor.process("   "), Err(ThoughtError::EmptyQuery));
    }

    #[test]
    fn unterminated_sentence_is_ignored() {
        let graph = graph_with(&["cat", "animal"], &[]);
        let processor = QueryProcessor::new(Arc::clone(&graph));
        assert_eq!(processor.process("cat animal").unwrap(), QueryOutcome::Ignored);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn question_intersects_neighbors() {
        let graph = graph_with(
            &["cat", "animal", "mammal", "pet"],
            &[
                ("cat", "animal"),
                ("animal", "cat"),
                ("cat", "mammal"),
                ("animal", "mammal"),
                ("cat", "pet"),
            ],
        );
        let processor = QueryProcessor::new(graph);
        assert_eq!(processor.process("cat animal?").unwrap(), related(&["mammal"]));
    }

    #[test]
    fn single_token_returns_all_neighbors() {
        let graph = graph_with(&["cat", "animal", "pet"], &[("cat", "animal"), ("cat", "pet")]);
        let processor = QueryProcessor::new(graph);
        assert_eq!(processor.process("cat?").unwrap(), related(&["animal", "pet"]));
    }

    #[test]
    fn non_clique_question() {
        let graph = graph_with(&["cat", "rock"], &[("cat", "rock")]);
        let processor = QueryProcessor::new(graph);
        assert_eq!(processor.process("cat rock?").unwrap(), QueryOutcome::NotAClique);
    }

    #[test]
    fn nothing_related_or_nothing_resolved() {
        let graph = graph_with(&["cat", "animal"], &[("cat", "animal"), ("animal", "cat")]);
        let processor = QueryProcessor::new(graph);
        assert_eq!(processor.process("cat animal?").unwrap(), QueryOutcome::NotFound);
        assert_eq!(processor.process("unicorn?").unwrap(), QueryOutcome::NotFound);
    }

    #[test]
    fn duplicate_tokens_collapse() {
        let graph = graph_with(&["cat", "pet"], &[("cat", "pet")]);
        let processor = QueryProcessor::new(graph);
        assert_eq!(processor.process("cat cat?").unwrap(), related(&["pet"]));
    }

    #[test]
    fn remember_builds_a_clique() {
        let graph = graph_with(&["cat", "animal", "pet"], &[("cat", "animal")]);
        let processor = QueryProcessor::new(Arc::clone(&graph));

        let outcome = processor.process("cat animal pet.").unwrap();
        let QueryOutcome::Remembered(created) = outcome else {
            panic!("expected Remembered, got {:?}", outcome);
        };
        assert_eq!(created.len(), 5);
        assert_eq!(graph.edge_count(), 6);
        assert_eq!(
            processor.process("cat animal pet?").unwrap(),
            QueryOutcome::NotFound
        );
    }

    #[test]
    fn remember_skips_unknown_words() {
        let graph = graph_with(&["cat"], &[]);
        let processor = QueryProcessor::new(Arc::clone(&graph));
        assert_eq!(
            processor.process("cat unicorn.").unwrap(),
            QueryOutcome::Remembered(Vec::new())
        );
        assert!(!graph.exists("unicorn"));
    }
}
