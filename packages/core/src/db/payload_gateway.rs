//! Payload Gateway
//!
//! Routes payload bodies to their per-type table. The gateway owns the check
//! that a body only lands on a node of the matching type; callers translate
//! the outcome into their own error type. Bodies are JSON text here; encoding
//! and decoding `Payload` values is the caller's job.

use crate::db::error::DatabaseError;
use crate::db::node_repository::format_timestamp;
use crate::models::{NodeId, NodeType};
use chrono::{DateTime, Utc};
use libsql::{params, Connection};

/// Outcome of `PayloadGateway::attach`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachOutcome {
    Stored,
    NodeMissing,
    /// The node exists but its type is `actual`
    TypeMismatch { actual: NodeType },
}

pub struct PayloadGateway<'c> {
    conn: &'c Connection,
}

impl<'c> PayloadGateway<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Store the `node_type` payload `body` for `node_id`, replacing any
    /// previous one.
    ///
    /// Nothing is written unless the node exists and is of `node_type`.
    pub async fn attach(
        &self,
        node_id: NodeId,
        node_type: NodeType,
        body: &str,
        now: DateTime<Utc>,
    ) -> Result<AttachOutcome, DatabaseError> {
        let actual = match self.node_type_of(node_id).await? {
            Some(actual) => actual,
            None => return Ok(AttachOutcome::NodeMissing),
        };
        if actual != node_type {
            return Ok(AttachOutcome::TypeMismatch { actual });
        }

        self.conn
            .execute(
                &format!(
                    "INSERT INTO {} (node_id, data, updated_at) VALUES (?1, ?2, ?3)
                     ON CONFLICT(node_id) DO UPDATE SET data = excluded.data, updated_at = excluded.updated_at",
                    actual.payload_table()
                ),
                (node_id.get(), body, format_timestamp(now)),
            )
            .await
            .map_err(|e| {
                DatabaseError::sql_execution(format!("Failed to store {} payload: {}", actual, e))
            })?;

        Ok(AttachOutcome::Stored)
    }

    /// Stored body for a node of known type
    pub async fn get(
        &self,
        node_id: NodeId,
        node_type: NodeType,
    ) -> Result<Option<String>, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                &format!(
                    "SELECT data FROM {} WHERE node_id = ?",
                    node_type.payload_table()
                ),
                params![node_id.get()],
            )
            .await
            .map_err(|e| DatabaseError::sql_execution(format!("Failed to load payload: {}", e)))?;

        match rows.next().await? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }

    /// Payload rows across all tables; used by maintenance tooling
    pub async fn count_all(&self) -> Result<u64, DatabaseError> {
        let mut total = 0u64;
        for node_type in NodeType::ALL {
            let mut rows = self
                .conn
                .query(
                    &format!("SELECT COUNT(*) FROM {}", node_type.payload_table()),
                    (),
                )
                .await
                .map_err(|e| {
                    DatabaseError::sql_execution(format!("Failed to count payloads: {}", e))
                })?;
            if let Some(row) = rows.next().await? {
                let count: i64 = row.get(0)?;
                total += count as u64;
            }
        }
        Ok(total)
    }

    async fn node_type_of(&self, node_id: NodeId) -> Result<Option<NodeType>, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                "SELECT node_type FROM nodes WHERE id = ?",
                params![node_id.get()],
            )
            .await
            .map_err(|e| DatabaseError::sql_execution(format!("Failed to look up node: {}", e)))?;

        match rows.next().await? {
            Some(row) => {
                let raw: String = row.get(0)?;
                raw.parse()
                    .map(Some)
                    .map_err(|e| DatabaseError::invalid_row("nodes", e))
            }
            None => Ok(None),
        }
    }
}
