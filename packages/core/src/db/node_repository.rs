//! Node Repository
//!
//! Row-level access to the `nodes` table. Every method borrows a connection, so
//! the same repository code runs inside a `UnitOfWork` or on a plain read
//! connection. Closure rows are not touched here; see `ClosureMaintainer`.

use crate::db::error::DatabaseError;
use crate::models::{DataStatus, Node, NodeId, NodeQuery, NodeType};
use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use libsql::{params, Connection, Row};

/// Column list matching `row_to_node`
pub(crate) const NODE_COLUMNS: &str =
    "id, name, node_type, parent_id, path, data_status, description, created_at, modified_at";

/// Same columns qualified with the `n` alias, for joins
pub(crate) const NODE_COLUMNS_N: &str = "n.id, n.name, n.node_type, n.parent_id, n.path, \
     n.data_status, n.description, n.created_at, n.modified_at";

/// Fields needed to insert a node row
#[derive(Debug, Clone)]
pub struct NewNodeRow<'p> {
    pub name: &'p str,
    pub node_type: NodeType,
    pub parent_id: Option<NodeId>,
    pub path: &'p str,
    pub description: Option<&'p str>,
}

pub struct NodeRepository<'c> {
    conn: &'c Connection,
}

impl<'c> NodeRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Insert a node row and return it as stored
    pub async fn insert(
        &self,
        row: NewNodeRow<'_>,
        now: DateTime<Utc>,
    ) -> Result<Node, DatabaseError> {
        let timestamp = format_timestamp(now);
        self.conn
            .execute(
                "INSERT INTO nodes (name, node_type, parent_id, path, data_status, description, created_at, modified_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
                (
                    row.name,
                    row.node_type.as_str(),
                    row.parent_id.map(NodeId::get),
                    row.path,
                    DataStatus::New.as_str(),
                    row.description,
                    timestamp.as_str(),
                    timestamp.as_str(),
                ),
            )
            .await
            .map_err(|e| DatabaseError::sql_execution(format!("Failed to insert node: {}", e)))?;

        let id = NodeId(self.conn.last_insert_rowid());
        self.get(id).await?.ok_or_else(|| {
            DatabaseError::invalid_row("nodes", format!("node {} vanished after insert", id))
        })
    }

    pub async fn get(&self, id: NodeId) -> Result<Option<Node>, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT {} FROM nodes WHERE id = ?", NODE_COLUMNS),
                params![id.get()],
            )
            .await
            .map_err(|e| DatabaseError::sql_execution(format!("Failed to get node: {}", e)))?;

        match rows.next().await? {
            Some(row) => Ok(Some(row_to_node(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn exists(&self, id: NodeId) -> Result<bool, DatabaseError> {
        let mut rows = self
            .conn
            .query("SELECT 1 FROM nodes WHERE id = ?", params![id.get()])
            .await
            .map_err(|e| DatabaseError::sql_execution(format!("Failed to check node: {}", e)))?;
        Ok(rows.next().await?.is_some())
    }

    /// Direct children of `parent_id`, oldest first
    pub async fn children(&self, parent_id: NodeId) -> Result<Vec<Node>, DatabaseError> {
        let rows = self
            .conn
            .query(
                &format!(
                    "SELECT {} FROM nodes WHERE parent_id = ? ORDER BY id ASC",
                    NODE_COLUMNS
                ),
                params![parent_id.get()],
            )
            .await
            .map_err(|e| DatabaseError::sql_execution(format!("Failed to get children: {}", e)))?;
        collect_nodes(rows).await
    }

    /// Nodes without a parent, oldest first
    pub async fn roots(&self) -> Result<Vec<Node>, DatabaseError> {
        let rows = self
            .conn
            .query(
                &format!(
                    "SELECT {} FROM nodes WHERE parent_id IS NULL ORDER BY id ASC",
                    NODE_COLUMNS
                ),
                (),
            )
            .await
            .map_err(|e| DatabaseError::sql_execution(format!("Failed to get roots: {}", e)))?;
        collect_nodes(rows).await
    }

    pub async fn update_name_and_path(
        &self,
        id: NodeId,
        name: &str,
        path: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, DatabaseError> {
        let affected = self
            .conn
            .execute(
                "UPDATE nodes SET name = ?, path = ?, modified_at = ? WHERE id = ?",
                (name, path, format_timestamp(now), id.get()),
            )
            .await
            .map_err(|e| DatabaseError::sql_execution(format!("Failed to rename node: {}", e)))?;
        Ok(affected > 0)
    }

    pub async fn update_parent_and_path(
        &self,
        id: NodeId,
        parent_id: Option<NodeId>,
        path: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, DatabaseError> {
        let affected = self
            .conn
            .execute(
                "UPDATE nodes SET parent_id = ?, path = ?, modified_at = ? WHERE id = ?",
                (
                    parent_id.map(NodeId::get),
                    path,
                    format_timestamp(now),
                    id.get(),
                ),
            )
            .await
            .map_err(|e| DatabaseError::sql_execution(format!("Failed to move node: {}", e)))?;
        Ok(affected > 0)
    }

    /// Overwrite `path` only; `modified_at` is left alone
    pub async fn set_path(&self, id: NodeId, path: &str) -> Result<bool, DatabaseError> {
        let affected = self
            .conn
            .execute("UPDATE nodes SET path = ? WHERE id = ?", (path, id.get()))
            .await
            .map_err(|e| DatabaseError::sql_execution(format!("Failed to set path: {}", e)))?;
        Ok(affected > 0)
    }

    pub async fn update_status(
        &self,
        id: NodeId,
        status: DataStatus,
        now: DateTime<Utc>,
    ) -> Result<bool, DatabaseError> {
        let affected = self
            .conn
            .execute(
                "UPDATE nodes SET data_status = ?, modified_at = ? WHERE id = ?",
                (status.as_str(), format_timestamp(now), id.get()),
            )
            .await
            .map_err(|e| DatabaseError::sql_execution(format!("Failed to update status: {}", e)))?;
        Ok(affected > 0)
    }

    pub async fn update_description(
        &self,
        id: NodeId,
        description: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<bool, DatabaseError> {
        let affected = self
            .conn
            .execute(
                "UPDATE nodes SET description = ?, modified_at = ? WHERE id = ?",
                (description, format_timestamp(now), id.get()),
            )
            .await
            .map_err(|e| {
                DatabaseError::sql_execution(format!("Failed to update description: {}", e))
            })?;
        Ok(affected > 0)
    }

    /// Bump `modified_at` on `id` and every one of its ancestors.
    ///
    /// Returns the number of rows touched (0 when the node does not exist).
    pub async fn touch_with_ancestors(
        &self,
        id: NodeId,
        now: DateTime<Utc>,
    ) -> Result<u64, DatabaseError> {
        self.conn
            .execute(
                "UPDATE nodes SET modified_at = ?
                 WHERE id IN (SELECT ancestor_id FROM node_closure WHERE descendant_id = ?)",
                (format_timestamp(now), id.get()),
            )
            .await
            .map_err(|e| DatabaseError::sql_execution(format!("Failed to touch node: {}", e)))
    }

    /// Delete one node row. Children, closure rows and payloads go with it
    /// through the foreign-key cascades.
    pub async fn delete(&self, id: NodeId) -> Result<bool, DatabaseError> {
        let affected = self
            .conn
            .execute("DELETE FROM nodes WHERE id = ?", params![id.get()])
            .await
            .map_err(|e| DatabaseError::sql_execution(format!("Failed to delete node: {}", e)))?;
        Ok(affected > 0)
    }

    /// Delete every node (and, by cascade, every closure and payload row)
    ///
    /// Returns how many nodes existed; the change counter would miss rows
    /// removed through the parent_id cascade.
    pub async fn delete_all(&self) -> Result<u64, DatabaseError> {
        let existing = self.count(&NodeQuery::default()).await?;
        self.conn
            .execute("DELETE FROM nodes", ())
            .await
            .map_err(|e| DatabaseError::sql_execution(format!("Failed to purge nodes: {}", e)))?;
        Ok(existing)
    }

    /// Filtered listing, most recently modified first
    pub async fn list(&self, query: &NodeQuery) -> Result<Vec<Node>, DatabaseError> {
        // SQLite treats a negative LIMIT as "no limit"
        let limit = query.limit.map(|l| l as i64).unwrap_or(-1);
        let offset = query.offset.unwrap_or(0) as i64;

        let rows = self
            .conn
            .query(
                &format!(
                    "SELECT {} FROM nodes WHERE {} ORDER BY modified_at DESC, id DESC LIMIT ?5 OFFSET ?6",
                    NODE_COLUMNS, QUERY_FILTER
                ),
                (
                    query.node_type.map(|t| t.as_str()),
                    query.ancestor_id.map(NodeId::get),
                    query.max_depth.map(i64::from),
                    query.data_status.map(|s| s.as_str()),
                    limit,
                    offset,
                ),
            )
            .await
            .map_err(|e| DatabaseError::sql_execution(format!("Failed to list nodes: {}", e)))?;
        collect_nodes(rows).await
    }

    /// Number of nodes matching `query` (limit and offset ignored)
    pub async fn count(&self, query: &NodeQuery) -> Result<u64, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT COUNT(*) FROM nodes WHERE {}", QUERY_FILTER),
                (
                    query.node_type.map(|t| t.as_str()),
                    query.ancestor_id.map(NodeId::get),
                    query.max_depth.map(i64::from),
                    query.data_status.map(|s| s.as_str()),
                ),
            )
            .await
            .map_err(|e| DatabaseError::sql_execution(format!("Failed to count nodes: {}", e)))?;

        let count: i64 = match rows.next().await? {
            Some(row) => row.get(0)?,
            None => 0,
        };
        Ok(count as u64)
    }

    /// `(id, parent_id, name, path)` of every node, ordered by id
    pub async fn all_links(
        &self,
    ) -> Result<Vec<(NodeId, Option<NodeId>, String, String)>, DatabaseError> {
        let mut rows = self
            .conn
            .query("SELECT id, parent_id, name, path FROM nodes ORDER BY id", ())
            .await
            .map_err(|e| DatabaseError::sql_execution(format!("Failed to scan nodes: {}", e)))?;

        let mut links = Vec::new();
        while let Some(row) = rows.next().await? {
            let id: i64 = row.get(0)?;
            let parent_id: Option<i64> = row.get(1)?;
            let name: String = row.get(2)?;
            let path: String = row.get(3)?;
            links.push((NodeId(id), parent_id.map(NodeId), name, path));
        }
        Ok(links)
    }
}

/// Shared WHERE clause for `list` and `count`; `?1`..`?4` are the optional filters
const QUERY_FILTER: &str = "(?1 IS NULL OR node_type = ?1)
    AND (?2 IS NULL OR id IN (
        SELECT descendant_id FROM node_closure
        WHERE ancestor_id = ?2 AND depth > 0 AND (?3 IS NULL OR depth <= ?3)))
    AND (?4 IS NULL OR data_status = ?4)";

pub(crate) async fn collect_nodes(mut rows: libsql::Rows) -> Result<Vec<Node>, DatabaseError> {
    let mut nodes = Vec::new();
    while let Some(row) = rows.next().await? {
        nodes.push(row_to_node(&row)?);
    }
    Ok(nodes)
}

/// Timestamps are stored as fixed-width RFC3339 so text order is time order
pub(crate) fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse timestamp from either SQLite or RFC3339 format
pub(crate) fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    // Rows written by hand through sqlite3 use "YYYY-MM-DD HH:MM:SS"
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Ok(naive.and_utc());
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    Err(DatabaseError::invalid_row(
        "nodes",
        format!("Unable to parse timestamp '{}'", s),
    ))
}

/// Convert a row selected with `NODE_COLUMNS` (starting at `offset`) into a Node
pub(crate) fn row_to_node_at(row: &Row, offset: i32) -> Result<Node, DatabaseError> {
    let id: i64 = row.get(offset)?;
    let name: String = row.get(offset + 1)?;
    let node_type: String = row.get(offset + 2)?;
    let parent_id: Option<i64> = row.get(offset + 3)?;
    let path: String = row.get(offset + 4)?;
    let data_status: String = row.get(offset + 5)?;
    let description: Option<String> = row.get(offset + 6)?;
    let created_at: String = row.get(offset + 7)?;
    let modified_at: String = row.get(offset + 8)?;

    Ok(Node {
        id: NodeId(id),
        name,
        node_type: node_type
            .parse()
            .map_err(|e| DatabaseError::invalid_row("nodes", e))?,
        parent_id: parent_id.map(NodeId),
        path,
        data_status: data_status
            .parse()
            .map_err(|e| DatabaseError::invalid_row("nodes", e))?,
        description,
        created_at: parse_timestamp(&created_at)?,
        modified_at: parse_timestamp(&modified_at)?,
    })
}

pub(crate) fn row_to_node(row: &Row) -> Result<Node, DatabaseError> {
    row_to_node_at(row, 0)
}
