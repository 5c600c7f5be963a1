//! Closure Table Maintenance
//!
//! `node_closure` holds one row per (ancestor, descendant) pair, including the
//! self-loop `(n, n, 0)` of every node. All mutations here are set-based SQL so
//! ancestor and descendant queries never walk `parent_id`.
//!
//! Invariants kept by this module (given a consistent store to start from):
//!
//! - Every node has exactly one self-loop
//! - `(A, D, d)` exists iff following `parent_id` from D reaches A in d steps
//! - No row pairs a node with something outside its own root tree
//!
//! `verify` and `rebuild` are the maintenance pair: the first recomputes the
//! expected rows from `parent_id` and diffs them against the table, the second
//! throws the table away and derives it again.

use crate::db::error::DatabaseError;
use crate::db::node_repository::{collect_nodes, row_to_node_at, NodeRepository, NODE_COLUMNS_N};
use crate::models::{rebase_path, ClosureEdge, Node, NodeId, NodeRef, PATH_SEPARATOR};
use libsql::{params, Connection};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// A stored path that disagrees with the names along the parent chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathMismatch {
    pub id: NodeId,
    pub stored: String,
    pub expected: String,
}

/// Result of comparing `node_closure` with what `parent_id` implies
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosureReport {
    pub nodes_checked: usize,
    pub edges_checked: usize,
    /// Rows implied by `parent_id` but absent from the table
    pub missing_edges: Vec<ClosureEdge>,
    /// Rows in the table that `parent_id` does not imply (or with the wrong depth)
    pub stale_edges: Vec<ClosureEdge>,
    pub path_mismatches: Vec<PathMismatch>,
    /// Nodes whose parent chain loops or points at a missing node
    pub broken_chains: Vec<NodeId>,
}

impl ClosureReport {
    pub fn is_consistent(&self) -> bool {
        self.missing_edges.is_empty()
            && self.stale_edges.is_empty()
            && self.path_mismatches.is_empty()
            && self.broken_chains.is_empty()
    }
}

/// What `rebuild` changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RebuildSummary {
    pub edges_written: u64,
    pub paths_rewritten: u64,
}

pub struct ClosureMaintainer<'c> {
    conn: &'c Connection,
}

impl<'c> ClosureMaintainer<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Insert the closure rows of a freshly inserted node.
    ///
    /// Writes the self-loop, then one row per ancestor of the parent with the
    /// depth increased by one. Returns the number of rows written.
    pub async fn link_new_node(
        &self,
        node_id: NodeId,
        parent_id: Option<NodeId>,
    ) -> Result<u64, DatabaseError> {
        let mut written = self
            .conn
            .execute(
                "INSERT INTO node_closure (ancestor_id, descendant_id, depth) VALUES (?1, ?1, 0)",
                params![node_id.get()],
            )
            .await
            .map_err(|e| DatabaseError::sql_execution(format!("Failed to insert self-loop: {}", e)))?;

        if let Some(parent_id) = parent_id {
            written += self
                .conn
                .execute(
                    "INSERT INTO node_closure (ancestor_id, descendant_id, depth)
                     SELECT ancestor_id, ?1, depth + 1 FROM node_closure WHERE descendant_id = ?2",
                    (node_id.get(), parent_id.get()),
                )
                .await
                .map_err(|e| {
                    DatabaseError::sql_execution(format!("Failed to fan out ancestors: {}", e))
                })?;
        }

        Ok(written)
    }

    /// Every ancestor of `id`, nearest first, starting with `id` itself at depth 0.
    ///
    /// Empty when the node does not exist.
    pub async fn ancestors_of(&self, id: NodeId) -> Result<Vec<NodeRef>, DatabaseError> {
        self.refs(
            "SELECT ancestor_id, depth FROM node_closure
             WHERE descendant_id = ? ORDER BY depth ASC",
            id,
        )
        .await
    }

    /// `id` itself (depth 0) followed by every descendant, shallowest first.
    ///
    /// Empty when the node does not exist, which lets callers tell "no
    /// descendants" from "no such node" with one query.
    pub async fn subtree_refs(&self, id: NodeId) -> Result<Vec<NodeRef>, DatabaseError> {
        self.refs(
            "SELECT descendant_id, depth FROM node_closure
             WHERE ancestor_id = ? ORDER BY depth ASC, descendant_id ASC",
            id,
        )
        .await
    }

    /// Strict descendants of `id`, shallowest first
    pub async fn descendants_of(&self, id: NodeId) -> Result<Vec<NodeRef>, DatabaseError> {
        self.refs(
            "SELECT descendant_id, depth FROM node_closure
             WHERE ancestor_id = ? AND depth > 0 ORDER BY depth ASC, descendant_id ASC",
            id,
        )
        .await
    }

    /// Direct children of `id`
    pub async fn children_of(&self, id: NodeId) -> Result<Vec<NodeId>, DatabaseError> {
        let refs = self
            .refs(
                "SELECT descendant_id, depth FROM node_closure
                 WHERE ancestor_id = ? AND depth = 1 ORDER BY descendant_id ASC",
                id,
            )
            .await?;
        Ok(refs.into_iter().map(|r| r.id).collect())
    }

    /// Whether `candidate` is `ancestor` or lies below it
    pub async fn is_in_subtree(
        &self,
        ancestor: NodeId,
        candidate: NodeId,
    ) -> Result<bool, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                "SELECT 1 FROM node_closure WHERE ancestor_id = ? AND descendant_id = ?",
                (ancestor.get(), candidate.get()),
            )
            .await
            .map_err(|e| DatabaseError::sql_execution(format!("Failed to check subtree: {}", e)))?;
        Ok(rows.next().await?.is_some())
    }

    /// Every node of the subtree rooted at `id` with its distance from `id`,
    /// shallowest first. One closure join, no recursion.
    pub async fn subtree_nodes(&self, id: NodeId) -> Result<Vec<(i64, Node)>, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                &format!(
                    "SELECT c.depth, {} FROM node_closure c
                     JOIN nodes n ON n.id = c.descendant_id
                     WHERE c.ancestor_id = ?
                     ORDER BY c.depth ASC, n.id ASC",
                    NODE_COLUMNS_N
                ),
                params![id.get()],
            )
            .await
            .map_err(|e| DatabaseError::sql_execution(format!("Failed to load subtree: {}", e)))?;

        let mut nodes = Vec::new();
        while let Some(row) = rows.next().await? {
            let depth: i64 = row.get(0)?;
            let node = row_to_node_at(&row, 1)?;
            nodes.push((depth, node));
        }
        Ok(nodes)
    }

    /// Rewrite the path of every strict descendant of `id` from `old_prefix`
    /// onto `new_prefix`. Returns the number of paths rewritten.
    ///
    /// A descendant whose path is not below `old_prefix` means the stored paths
    /// were already inconsistent; the whole operation fails so the caller's
    /// transaction rolls back.
    pub async fn propagate_path(
        &self,
        id: NodeId,
        old_prefix: &str,
        new_prefix: &str,
    ) -> Result<u64, DatabaseError> {
        if old_prefix == new_prefix {
            return Ok(0);
        }

        let rows = self
            .conn
            .query(
                &format!(
                    "SELECT {} FROM node_closure c
                     JOIN nodes n ON n.id = c.descendant_id
                     WHERE c.ancestor_id = ? AND c.depth > 0",
                    NODE_COLUMNS_N
                ),
                params![id.get()],
            )
            .await
            .map_err(|e| {
                DatabaseError::sql_execution(format!("Failed to load descendants: {}", e))
            })?;
        let descendants = collect_nodes(rows).await?;

        let repo = NodeRepository::new(self.conn);
        let mut rewritten = 0;
        for node in descendants {
            let path = rebase_path(&node.path, old_prefix, new_prefix).ok_or_else(|| {
                DatabaseError::invalid_row(
                    "nodes",
                    format!(
                        "path '{}' of node {} is not below '{}'",
                        node.path, node.id, old_prefix
                    ),
                )
            })?;
            repo.set_path(node.id, &path).await?;
            rewritten += 1;
        }

        tracing::debug!(
            "Rebased {} descendant paths of node {} from '{}' to '{}'",
            rewritten,
            id,
            old_prefix,
            new_prefix
        );
        Ok(rewritten)
    }

    /// Remove every row linking the subtree of `id` to nodes outside it.
    ///
    /// Rows inside the subtree (including its self-loops) are kept, so the
    /// subtree stays internally consistent and can be re-attached.
    pub async fn detach_subtree(&self, id: NodeId) -> Result<u64, DatabaseError> {
        self.conn
            .execute(
                "DELETE FROM node_closure
                 WHERE descendant_id IN (SELECT descendant_id FROM node_closure WHERE ancestor_id = ?1)
                   AND ancestor_id NOT IN (SELECT descendant_id FROM node_closure WHERE ancestor_id = ?1)",
                params![id.get()],
            )
            .await
            .map_err(|e| DatabaseError::sql_execution(format!("Failed to detach subtree: {}", e)))
    }

    /// Link a detached subtree rooted at `id` under `new_parent`.
    ///
    /// Writes the cross product of the parent's ancestors (self included) and
    /// the subtree's members, with depth = parent depth + subtree depth + 1.
    pub async fn attach_subtree(
        &self,
        id: NodeId,
        new_parent: NodeId,
    ) -> Result<u64, DatabaseError> {
        self.conn
            .execute(
                "INSERT INTO node_closure (ancestor_id, descendant_id, depth)
                 SELECT p.ancestor_id, c.descendant_id, p.depth + c.depth + 1
                 FROM node_closure p, node_closure c
                 WHERE p.descendant_id = ?1 AND c.ancestor_id = ?2",
                (new_parent.get(), id.get()),
            )
            .await
            .map_err(|e| DatabaseError::sql_execution(format!("Failed to attach subtree: {}", e)))
    }

    pub async fn all_edges(&self) -> Result<Vec<ClosureEdge>, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                "SELECT ancestor_id, descendant_id, depth FROM node_closure
                 ORDER BY ancestor_id, descendant_id",
                (),
            )
            .await
            .map_err(|e| DatabaseError::sql_execution(format!("Failed to scan closure: {}", e)))?;

        let mut edges = Vec::new();
        while let Some(row) = rows.next().await? {
            let ancestor_id: i64 = row.get(0)?;
            let descendant_id: i64 = row.get(1)?;
            let depth: i64 = row.get(2)?;
            edges.push(ClosureEdge {
                ancestor_id: NodeId(ancestor_id),
                descendant_id: NodeId(descendant_id),
                depth,
            });
        }
        Ok(edges)
    }

    /// Compare the closure table and stored paths with what `parent_id` implies
    pub async fn verify(&self) -> Result<ClosureReport, DatabaseError> {
        let links = NodeRepository::new(self.conn).all_links().await?;
        let actual = self.all_edges().await?;

        let expected = expected_closure(&links);

        let actual_set: HashSet<ClosureEdge> = actual.iter().copied().collect();
        let mut missing_edges: Vec<ClosureEdge> = expected
            .edges
            .iter()
            .filter(|edge| !actual_set.contains(edge))
            .copied()
            .collect();
        missing_edges.sort_by_key(|e| (e.ancestor_id, e.descendant_id));

        let expected_set: HashSet<ClosureEdge> = expected.edges.iter().copied().collect();
        let stale_edges: Vec<ClosureEdge> = actual
            .iter()
            .filter(|edge| !expected_set.contains(edge))
            .copied()
            .collect();

        let path_mismatches = links
            .iter()
            .filter_map(|(id, _, _, stored)| {
                let expected_path = expected.paths.get(id)?;
                (expected_path != stored).then(|| PathMismatch {
                    id: *id,
                    stored: stored.clone(),
                    expected: expected_path.clone(),
                })
            })
            .collect();

        let report = ClosureReport {
            nodes_checked: links.len(),
            edges_checked: actual.len(),
            missing_edges,
            stale_edges,
            path_mismatches,
            broken_chains: expected.broken_chains,
        };

        if report.is_consistent() {
            tracing::debug!(
                "Closure verified: {} nodes, {} edges",
                report.nodes_checked,
                report.edges_checked
            );
        } else {
            tracing::warn!(
                "Closure inconsistent: {} missing, {} stale, {} bad paths, {} broken chains",
                report.missing_edges.len(),
                report.stale_edges.len(),
                report.path_mismatches.len(),
                report.broken_chains.len()
            );
        }

        Ok(report)
    }

    /// Drop every closure row and derive the table (and all paths) again from
    /// `parent_id` and `name`.
    pub async fn rebuild(&self) -> Result<RebuildSummary, DatabaseError> {
        self.conn
            .execute("DELETE FROM node_closure", ())
            .await
            .map_err(|e| DatabaseError::sql_execution(format!("Failed to clear closure: {}", e)))?;

        // The depth bound stops the recursion if parent_id ever forms a loop
        let edges_written = self
            .conn
            .execute(
                "INSERT INTO node_closure (ancestor_id, descendant_id, depth)
                 WITH RECURSIVE chain(ancestor_id, descendant_id, depth) AS (
                     SELECT id, id, 0 FROM nodes
                     UNION ALL
                     SELECT chain.ancestor_id, n.id, chain.depth + 1
                     FROM chain JOIN nodes n ON n.parent_id = chain.descendant_id
                     WHERE chain.depth < (SELECT COUNT(*) FROM nodes)
                 )
                 SELECT ancestor_id, descendant_id, MIN(depth) FROM chain
                 GROUP BY ancestor_id, descendant_id",
                (),
            )
            .await
            .map_err(|e| DatabaseError::sql_execution(format!("Failed to rebuild closure: {}", e)))?;

        let links = NodeRepository::new(self.conn).all_links().await?;
        let expected = expected_closure(&links);

        let repo = NodeRepository::new(self.conn);
        let mut paths_rewritten = 0;
        for (id, _, _, stored) in &links {
            if let Some(path) = expected.paths.get(id) {
                if path != stored {
                    repo.set_path(*id, path).await?;
                    paths_rewritten += 1;
                }
            }
        }

        tracing::info!(
            "Rebuilt closure table: {} edges, {} paths rewritten",
            edges_written,
            paths_rewritten
        );

        Ok(RebuildSummary {
            edges_written,
            paths_rewritten,
        })
    }

    async fn refs(&self, sql: &str, id: NodeId) -> Result<Vec<NodeRef>, DatabaseError> {
        let mut rows = self
            .conn
            .query(sql, params![id.get()])
            .await
            .map_err(|e| DatabaseError::sql_execution(format!("Failed to query closure: {}", e)))?;

        let mut refs = Vec::new();
        while let Some(row) = rows.next().await? {
            let node_id: i64 = row.get(0)?;
            let depth: i64 = row.get(1)?;
            refs.push(NodeRef {
                id: NodeId(node_id),
                depth,
            });
        }
        Ok(refs)
    }
}

struct ExpectedClosure {
    edges: Vec<ClosureEdge>,
    paths: HashMap<NodeId, String>,
    broken_chains: Vec<NodeId>,
}

/// Walk `parent_id` upward from every node to derive the closure rows and
/// paths the store should hold.
fn expected_closure(links: &[(NodeId, Option<NodeId>, String, String)]) -> ExpectedClosure {
    let by_id: HashMap<NodeId, (Option<NodeId>, &str)> = links
        .iter()
        .map(|(id, parent, name, _)| (*id, (*parent, name.as_str())))
        .collect();

    let mut edges = Vec::new();
    let mut paths = HashMap::new();
    let mut broken_chains = Vec::new();

    'nodes: for (id, _, _, _) in links {
        let mut chain = vec![*id];
        let mut current = *id;
        while let Some((Some(parent), _)) = by_id.get(&current) {
            if !by_id.contains_key(parent) || chain.contains(parent) {
                broken_chains.push(*id);
                continue 'nodes;
            }
            chain.push(*parent);
            current = *parent;
        }

        for (depth, ancestor) in chain.iter().enumerate() {
            edges.push(ClosureEdge {
                ancestor_id: *ancestor,
                descendant_id: *id,
                depth: depth as i64,
            });
        }

        let mut path = String::new();
        for ancestor in chain.iter().rev() {
            path.push(PATH_SEPARATOR);
            path.push_str(by_id.get(ancestor).map(|(_, name)| *name).unwrap_or_default());
        }
        paths.insert(*id, path);
    }

    ExpectedClosure {
        edges,
        paths,
        broken_chains,
    }
}
