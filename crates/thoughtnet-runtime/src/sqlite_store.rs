//! SQLite-backed implementation of the ThoughtStore trait.
//!
//! Two tables: `thought_node` (name, position) and `association`
//! (`source->target` key plus endpoints). Supports both in-memory and
//! file-backed databases.

#![cfg(feature = "sqlite")]

use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thoughtnet_core::error::{Result, ThoughtError};
use thoughtnet_core::store::ThoughtStore;
use thoughtnet_core::types::{Position, StoredEdge, StoredNode};

/// SQLite persistence for thought positions and association existence.
#[derive(Clone)]
pub struct SqliteThoughtStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteThoughtStore {
    /// Create a new in-memory store.
    pub fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| ThoughtError::data_access("open", e))?;
        Self::init_with_connection(conn)
    }

    /// Create or open a file-backed store.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path).map_err(|e| ThoughtError::data_access("open", e))?;
        Self::init_with_connection(conn)
    }

    fn init_with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS thought_node (
                name TEXT PRIMARY KEY,
                x REAL NOT NULL,
                y REAL NOT NULL
            );

            CREATE TABLE IF NOT EXISTS association (
                id TEXT PRIMARY KEY,
                source TEXT NOT NULL,
                target TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_association_source ON association(source);
            "#,
        )
        .map_err(|e| ThoughtError::data_access("create schema", e))?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn execute(&self, operation: &str, sql: &str, args: impl rusqlite::Params) -> Result<usize> {
        self.conn()
            .execute(sql, args)
            .map_err(|e| ThoughtError::data_access(operation, e))
    }
}

impl ThoughtStore for SqliteThoughtStore {
    fn save_node_position(&self, name: &str, position: Position) -> Result<()> {
        self.execute(
            "save_node_position",
            "INSERT INTO thought_node (name, x, y) VALUES (?1, ?2, ?3)
             ON CONFLICT(name) DO UPDATE SET x = excluded.x, y = excluded.y",
            params![name, position.x, position.y],
        )?;
        Ok(())
    }

    fn load_all_nodes(&self) -> Result<Vec<StoredNode>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare("SELECT name, x, y FROM thought_node ORDER BY name")
            .map_err(|e| ThoughtError::data_access("load_all_nodes", e))?;
        let rows = stmt
            .query_map([], |row| {
                Ok(StoredNode::new(
                    row.get::<_, String>(0)?,
                    Position::new(row.get(1)?, row.get(2)?),
                ))
            })
            .map_err(|e| ThoughtError::data_access("load_all_nodes", e))?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| ThoughtError::data_access("load_all_nodes", e))
    }

    fn save_edge(&self, source: &str, target: &str) -> Result<()> {
        let key = StoredEdge::new(source, target).key();
        self.execute(
            "save_edge",
            "INSERT OR IGNORE INTO association (id, source, target) VALUES (?1, ?2, ?3)",
            params![key, source, target],
        )?;
        Ok(())
    }

    fn load_all_edges(&self) -> Result<Vec<StoredEdge>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare("SELECT source, target FROM association ORDER BY source, target")
            .map_err(|e| ThoughtError::data_access("load_all_edges", e))?;
        let rows = stmt
            .query_map([], |row| {
                Ok(StoredEdge::new(
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                ))
            })
            .map_err(|e| ThoughtError::data_access("load_all_edges", e))?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| ThoughtError::data_access("load_all_edges", e))
    }

    fn delete_node(&self, name: &str) -> Result<()> {
        self.execute(
            "delete_node",
            "DELETE FROM thought_node WHERE name = ?1",
            params![name],
        )?;
        Ok(())
    }

    fn delete_edge(&self, source: &str, target: &str) -> Result<()> {
        let key = StoredEdge::new(source, target).key();
        self.execute(
            "delete_edge",
            "DELETE FROM association WHERE id = ?1",
            params![key],
        )?;
        Ok(())
    }

    fn delete_all_nodes(&self) -> Result<()> {
        self.execute("delete_all_nodes", "DELETE FROM thought_node", [])?;
        Ok(())
    }

    fn delete_all_edges(&self) -> Result<()> {
        self.execute("delete_all_edges", "DELETE FROM association", [])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nodes_round_trip_in_memory() {
        let store = SqliteThoughtStore::new_in_memory().unwrap();
        store.save_node_position("cat", Position::new(10.0, 20.0)).unwrap();
        store.save_node_position("animal", Position::origin()).unwrap();
        store.save_node_position("cat", Position::new(11.0, 21.0)).unwrap();

        let nodes = store.load_all_nodes().unwrap();
        assert_eq!(
            nodes,
            vec![
                StoredNode::new("animal", Position::origin()),
                StoredNode::new("cat", Position::new(11.0, 21.0)),
            ]
        );
    }

    #[test]
    fn edges_are_keyed_by_direction() {
        let store = SqliteThoughtStore::new_in_memory().unwrap();
        store.save_edge("cat", "animal").unwrap();
        store.save_edge("cat", "animal").unwrap();
        store.save_edge("animal", "cat").unwrap();
        assert_eq!(store.load_all_edges().unwrap().len(), 2);

        store.delete_edge("cat", "animal").unwrap();
        assert_eq!(
            store.load_all_edges().unwrap(),
            vec![StoredEdge::new("animal", "cat")]
        );
    }

    #[test]
    fn delete_all_empties_tables() {
        let store = SqliteThoughtStore::new_in_memory().unwrap();
        store.save_node_position("a", Position::origin()).unwrap();
        store.save_edge("a", "b").unwrap();
        store.delete_all_edges().unwrap();
        store.delete_all_nodes().unwrap();
        assert!(store.load_all_nodes().unwrap().is_empty());
        assert!(store.load_all_edges().unwrap().is_empty());
    }
}
