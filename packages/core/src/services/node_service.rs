//! Node Service - Tree Operations
//!
//! This module provides the business logic layer collaborators call:
//!
//! - Node lifecycle (create, rename, move, delete)
//! - Hierarchy queries answered from the closure table (ancestors, descendants, subtree)
//! - Typed payload attachment
//! - Workflow updates (status, description, touch) and filtered listings
//! - Closure maintenance (verify, rebuild, purge)
//!
//! # Transactions
//!
//! Every mutating method opens one `UnitOfWork` and performs its whole sequence
//! (node row, closure rows, payload row, path propagation) on that unit's
//! connection. The unit commits only if every step succeeded; otherwise it
//! rolls back and the caller sees the first error. Events are sent after the
//! commit, so subscribers never observe a change that was undone.
//!
//! # Concurrency
//!
//! Write units start with `BEGIN IMMEDIATE`, so two writers never interleave
//! between reading the parent's ancestors and inserting the new rows; the
//! second one waits (up to the configured busy timeout) for the first to commit.

use crate::config::StoreConfig;
use crate::db::{
    AttachOutcome, ClosureMaintainer, ClosureReport, DatabaseService, NewNodeRow,
    NodeRepository, PayloadGateway, RebuildSummary, TreeEvent,
};
use crate::models::{
    child_path, replace_last_segment, validate_name, DataStatus, Node, NodeId, NodeQuery,
    NodeRef, NodeTree, NodeType, Payload,
};
use crate::services::error::NodeServiceError;
use chrono::Utc;
use libsql::Connection;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Parameters for creating a node
///
/// # Examples
///
/// ```no_run
/// # use heattree_core::services::CreateNodeParams;
/// # use heattree_core::models::{NodeId, NodeType, Payload, ClientPayload};
/// let params = CreateNodeParams::new("Acme", NodeType::Client)
///     .with_description("Key account")
///     .with_payload(Payload::Client(ClientPayload {
///         city: Some("Lyon".to_string()),
///         ..Default::default()
///     }));
///
/// let child = CreateNodeParams::new("Order1", NodeType::Order).with_parent(NodeId(1));
/// ```
#[derive(Debug, Clone)]
pub struct CreateNodeParams {
    pub name: String,
    pub node_type: NodeType,
    /// Parent node; `None` creates a root
    pub parent_id: Option<NodeId>,
    pub description: Option<String>,
    /// Attached in the same transaction as the node itself; `None` stores the empty payload
    pub payload: Option<Payload>,
}

impl CreateNodeParams {
    pub fn new(name: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            name: name.into(),
            node_type,
            parent_id: None,
            description: None,
            payload: None,
        }
    }

    pub fn with_parent(mut self, parent_id: NodeId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = Some(payload);
        self
    }
}

/// Core service for the record tree
///
/// Cheap to clone; clones share the database and the event channel.
#[derive(Clone)]
pub struct NodeService {
    db: Arc<DatabaseService>,
    event_tx: broadcast::Sender<TreeEvent>,
}

impl NodeService {
    /// Create a NodeService over an open database
    pub fn new(db: Arc<DatabaseService>) -> Self {
        Self::with_event_capacity(db, crate::config::DEFAULT_EVENT_CHANNEL_CAPACITY)
    }

    pub fn with_event_capacity(db: Arc<DatabaseService>, capacity: usize) -> Self {
        let (event_tx, _) = broadcast::channel(capacity.max(1));
        Self { db, event_tx }
    }

    /// Open the database described by `config` and wrap it in a service
    pub async fn open(config: &StoreConfig) -> Result<Self, NodeServiceError> {
        let db = DatabaseService::open(config).await?;
        Ok(Self::with_event_capacity(
            Arc::new(db),
            config.event_channel_capacity,
        ))
    }

    pub fn database(&self) -> &Arc<DatabaseService> {
        &self.db
    }

    /// Subscribe to tree events
    ///
    /// Events are only sent for committed changes. A receiver that falls more
    /// than the channel capacity behind gets `RecvError::Lagged`.
    pub fn subscribe_to_events(&self) -> broadcast::Receiver<TreeEvent> {
        self.event_tx.subscribe()
    }

    /// Ignores errors if no subscribers (expected in most tests).
    fn emit_event(&self, event: TreeEvent) {
        let _ = self.event_tx.send(event);
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Create a node under `parent_id` (or as a root)
    ///
    /// # Errors
    ///
    /// - `ParentNotFound` if `parent_id` names a missing node
    /// - `ValidationFailed` for an empty name or one containing `/`
    pub async fn create_node(
        &self,
        name: &str,
        node_type: NodeType,
        parent_id: Option<NodeId>,
    ) -> Result<Node, NodeServiceError> {
        let mut params = CreateNodeParams::new(name, node_type);
        params.parent_id = parent_id;
        self.create(params).await
    }

    /// Create a node with optional description and payload, all in one transaction
    ///
    /// Without a payload the node gets the empty payload of its type.
    /// A payload of the wrong type fails the whole creation with `TypeMismatch`;
    /// no node, closure or payload row is left behind.
    pub async fn create(&self, params: CreateNodeParams) -> Result<Node, NodeServiceError> {
        validate_name(&params.name)?;

        let uow = self.db.begin().await?;
        let result = Self::create_in(uow.conn(), &params).await;
        let node = uow.finish(result).await?;

        tracing::info!(
            "Created {} node {} at {}",
            node.node_type,
            node.id,
            node.path
        );
        self.emit_event(TreeEvent::NodeCreated(node.clone()));
        Ok(node)
    }

    async fn create_in(
        conn: &Connection,
        params: &CreateNodeParams,
    ) -> Result<Node, NodeServiceError> {
        let now = Utc::now();
        let repo = NodeRepository::new(conn);

        let parent = match params.parent_id {
            Some(parent_id) => Some(
                repo.get(parent_id)
                    .await?
                    .ok_or_else(|| NodeServiceError::parent_not_found(parent_id))?,
            ),
            None => None,
        };

        let path = child_path(parent.as_ref().map(|p| p.path.as_str()), &params.name);
        let node = repo
            .insert(
                NewNodeRow {
                    name: &params.name,
                    node_type: params.node_type,
                    parent_id: params.parent_id,
                    path: &path,
                    description: params.description.as_deref(),
                },
                now,
            )
            .await?;

        let linked = ClosureMaintainer::new(conn)
            .link_new_node(node.id, params.parent_id)
            .await?;
        tracing::debug!("Wrote {} closure rows for node {}", linked, node.id);

        // Every node has exactly one payload row, empty unless one was given
        let payload = params
            .payload
            .clone()
            .unwrap_or_else(|| Payload::empty(params.node_type));
        Self::attach_in(conn, node.id, &payload).await?;

        Ok(node)
    }

    /// Rename a node and rewrite the paths of its whole subtree
    ///
    /// Only the last path segment changes; `parent_id` and closure rows stay.
    /// Renaming to the current name only bumps `modified_at`.
    pub async fn rename_node(
        &self,
        id: NodeId,
        new_name: &str,
    ) -> Result<Node, NodeServiceError> {
        validate_name(new_name)?;

        let uow = self.db.begin().await?;
        let result = Self::rename_in(uow.conn(), id, new_name).await;
        let (node, old_path, descendants_updated) = uow.finish(result).await?;

        if old_path != node.path {
            tracing::info!(
                "Renamed node {} from {} to {} ({} descendants updated)",
                id,
                old_path,
                node.path,
                descendants_updated
            );
            self.emit_event(TreeEvent::NodeRenamed {
                id,
                old_path,
                new_path: node.path.clone(),
                descendants_updated,
            });
        }
        Ok(node)
    }

    async fn rename_in(
        conn: &Connection,
        id: NodeId,
        new_name: &str,
    ) -> Result<(Node, String, u64), NodeServiceError> {
        let now = Utc::now();
        let repo = NodeRepository::new(conn);
        let node = repo
            .get(id)
            .await?
            .ok_or_else(|| NodeServiceError::node_not_found(id))?;

        let new_path = replace_last_segment(&node.path, new_name);
        repo.update_name_and_path(id, new_name, &new_path, now)
            .await?;
        let descendants_updated = ClosureMaintainer::new(conn)
            .propagate_path(id, &node.path, &new_path)
            .await?;

        let renamed = repo
            .get(id)
            .await?
            .ok_or_else(|| NodeServiceError::node_not_found(id))?;
        Ok((renamed, node.path, descendants_updated))
    }

    /// Move a node (with its subtree) under `new_parent_id`, or to the root
    /// level when `None`
    ///
    /// Relative depths inside the subtree are preserved. Moving a node to its
    /// current parent is a no-op.
    ///
    /// # Errors
    ///
    /// - `NodeNotFound` / `ParentNotFound`
    /// - `CyclicMove` if the target parent is the node itself or one of its descendants
    pub async fn move_node(
        &self,
        id: NodeId,
        new_parent_id: Option<NodeId>,
    ) -> Result<Node, NodeServiceError> {
        let uow = self.db.begin().await?;
        let result = Self::move_in(uow.conn(), id, new_parent_id).await;
        let (node, old_parent_id) = uow.finish(result).await?;

        if old_parent_id != new_parent_id {
            tracing::info!(
                "Moved node {} from {:?} to {:?}, now at {}",
                id,
                old_parent_id,
                new_parent_id,
                node.path
            );
            self.emit_event(TreeEvent::NodeMoved {
                id,
                old_parent_id,
                new_parent_id,
                new_path: node.path.clone(),
            });
        }
        Ok(node)
    }

    async fn move_in(
        conn: &Connection,
        id: NodeId,
        new_parent_id: Option<NodeId>,
    ) -> Result<(Node, Option<NodeId>), NodeServiceError> {
        let now = Utc::now();
        let repo = NodeRepository::new(conn);
        let closure = ClosureMaintainer::new(conn);

        let node = repo
            .get(id)
            .await?
            .ok_or_else(|| NodeServiceError::node_not_found(id))?;

        let new_parent = match new_parent_id {
            Some(parent_id) => {
                let parent = repo
                    .get(parent_id)
                    .await?
                    .ok_or_else(|| NodeServiceError::parent_not_found(parent_id))?;
                if closure.is_in_subtree(id, parent_id).await? {
                    return Err(NodeServiceError::cyclic_move(id, parent_id));
                }
                Some(parent)
            }
            None => None,
        };

        if node.parent_id == new_parent_id {
            return Ok((node, new_parent_id));
        }

        let detached = closure.detach_subtree(id).await?;
        let attached = match new_parent_id {
            Some(parent_id) => closure.attach_subtree(id, parent_id).await?,
            None => 0,
        };
        tracing::debug!(
            "Re-parented subtree of node {}: {} closure rows removed, {} added",
            id,
            detached,
            attached
        );

        let new_path = child_path(new_parent.as_ref().map(|p| p.path.as_str()), &node.name);
        repo.update_parent_and_path(id, new_parent_id, &new_path, now)
            .await?;
        closure.propagate_path(id, &node.path, &new_path).await?;

        let moved = repo
            .get(id)
            .await?
            .ok_or_else(|| NodeServiceError::node_not_found(id))?;
        Ok((moved, node.parent_id))
    }

    /// Delete a node and its entire subtree
    ///
    /// Descendants, closure rows and payloads are removed by the store's
    /// foreign-key cascades in the same statement.
    pub async fn delete_node(&self, id: NodeId) -> Result<(), NodeServiceError> {
        let uow = self.db.begin().await?;
        let result = Self::delete_in(uow.conn(), id).await;
        let (path, subtree_size) = uow.finish(result).await?;

        tracing::info!(
            "Deleted node {} at {} ({} nodes removed)",
            id,
            path,
            subtree_size
        );
        self.emit_event(TreeEvent::NodeDeleted { id, path });
        Ok(())
    }

    async fn delete_in(conn: &Connection, id: NodeId) -> Result<(String, usize), NodeServiceError> {
        let repo = NodeRepository::new(conn);
        let node = repo
            .get(id)
            .await?
            .ok_or_else(|| NodeServiceError::node_not_found(id))?;
        let subtree_size = ClosureMaintainer::new(conn).subtree_refs(id).await?.len();

        if !repo.delete(id).await? {
            return Err(NodeServiceError::node_not_found(id));
        }
        Ok((node.path, subtree_size))
    }

    // ------------------------------------------------------------------
    // Hierarchy queries
    // ------------------------------------------------------------------

    /// Ancestors of `id`, nearest first; the first entry is `id` itself at depth 0
    pub async fn ancestors_of(&self, id: NodeId) -> Result<Vec<NodeRef>, NodeServiceError> {
        let conn = self.db.connect_with_timeout().await?;
        let refs = ClosureMaintainer::new(&conn).ancestors_of(id).await?;
        // Every existing node has its self-loop, so no rows means no node
        if refs.is_empty() {
            return Err(NodeServiceError::node_not_found(id));
        }
        Ok(refs)
    }

    /// Strict descendants of `id`, shallowest first
    pub async fn descendants_of(&self, id: NodeId) -> Result<Vec<NodeRef>, NodeServiceError> {
        let conn = self.db.connect_with_timeout().await?;
        if !NodeRepository::new(&conn).exists(id).await? {
            return Err(NodeServiceError::node_not_found(id));
        }
        Ok(ClosureMaintainer::new(&conn).descendants_of(id).await?)
    }

    /// Direct children of `id`, by id
    pub async fn children_of(&self, id: NodeId) -> Result<Vec<NodeId>, NodeServiceError> {
        let conn = self.db.connect_with_timeout().await?;
        if !NodeRepository::new(&conn).exists(id).await? {
            return Err(NodeServiceError::node_not_found(id));
        }
        Ok(ClosureMaintainer::new(&conn).children_of(id).await?)
    }

    /// The subtree rooted at `id` as a nested tree, children ordered by id
    pub async fn subtree(&self, id: NodeId) -> Result<NodeTree, NodeServiceError> {
        let conn = self.db.connect_with_timeout().await?;
        let rows = ClosureMaintainer::new(&conn).subtree_nodes(id).await?;
        build_tree(rows).ok_or_else(|| NodeServiceError::node_not_found(id))
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    pub async fn get_node(&self, id: NodeId) -> Result<Node, NodeServiceError> {
        self.find_node(id)
            .await?
            .ok_or_else(|| NodeServiceError::node_not_found(id))
    }

    pub async fn find_node(&self, id: NodeId) -> Result<Option<Node>, NodeServiceError> {
        let conn = self.db.connect_with_timeout().await?;
        Ok(NodeRepository::new(&conn).get(id).await?)
    }

    /// Direct children as full nodes, ordered by id
    pub async fn list_children(&self, parent_id: NodeId) -> Result<Vec<Node>, NodeServiceError> {
        let conn = self.db.connect_with_timeout().await?;
        let repo = NodeRepository::new(&conn);
        if !repo.exists(parent_id).await? {
            return Err(NodeServiceError::node_not_found(parent_id));
        }
        Ok(repo.children(parent_id).await?)
    }

    /// Root nodes, ordered by id
    pub async fn list_roots(&self) -> Result<Vec<Node>, NodeServiceError> {
        let conn = self.db.connect_with_timeout().await?;
        Ok(NodeRepository::new(&conn).roots().await?)
    }

    /// Filtered listing, most recently modified first
    pub async fn list_nodes(&self, query: &NodeQuery) -> Result<Vec<Node>, NodeServiceError> {
        let conn = self.db.connect_with_timeout().await?;
        Ok(NodeRepository::new(&conn).list(query).await?)
    }

    /// Number of nodes matching `query`, ignoring its limit and offset
    pub async fn count_nodes(&self, query: &NodeQuery) -> Result<u64, NodeServiceError> {
        let conn = self.db.connect_with_timeout().await?;
        Ok(NodeRepository::new(&conn).count(query).await?)
    }

    // ------------------------------------------------------------------
    // Payloads
    // ------------------------------------------------------------------

    /// Attach (or replace) the payload of `id`
    ///
    /// # Errors
    ///
    /// - `NodeNotFound` if the node is absent
    /// - `TypeMismatch` if the payload variant differs from the node's type
    pub async fn attach_payload(
        &self,
        id: NodeId,
        payload: Payload,
    ) -> Result<(), NodeServiceError> {
        let uow = self.db.begin().await?;
        let result = Self::attach_in(uow.conn(), id, &payload).await;
        uow.finish(result).await?;

        tracing::info!("Attached {} payload to node {}", payload.node_type(), id);
        self.emit_event(TreeEvent::PayloadAttached {
            id,
            node_type: payload.node_type(),
        });
        Ok(())
    }

    async fn attach_in(
        conn: &Connection,
        id: NodeId,
        payload: &Payload,
    ) -> Result<(), NodeServiceError> {
        let body = payload.body_json().map_err(|e| {
            NodeServiceError::serialization(format!(
                "cannot encode {} payload: {}",
                payload.node_type(),
                e
            ))
        })?;

        match PayloadGateway::new(conn)
            .attach(id, payload.node_type(), &body, Utc::now())
            .await?
        {
            AttachOutcome::Stored => Ok(()),
            AttachOutcome::NodeMissing => Err(NodeServiceError::node_not_found(id)),
            AttachOutcome::TypeMismatch { actual } => Err(NodeServiceError::type_mismatch(
                id,
                actual,
                payload.node_type(),
            )),
        }
    }

    /// Payload of `id`; `None` only if its row was removed outside the service
    pub async fn get_payload(&self, id: NodeId) -> Result<Option<Payload>, NodeServiceError> {
        let conn = self.db.connect_with_timeout().await?;
        let node = NodeRepository::new(&conn)
            .get(id)
            .await?
            .ok_or_else(|| NodeServiceError::node_not_found(id))?;
        let body = match PayloadGateway::new(&conn).get(id, node.node_type).await? {
            Some(body) => body,
            None => return Ok(None),
        };
        Payload::from_body_json(node.node_type, &body)
            .map(Some)
            .map_err(|e| {
                NodeServiceError::serialization(format!(
                    "stored {} payload of node {} is not valid: {}",
                    node.node_type, id, e
                ))
            })
    }

    // ------------------------------------------------------------------
    // Workflow updates
    // ------------------------------------------------------------------

    pub async fn update_status(
        &self,
        id: NodeId,
        status: DataStatus,
    ) -> Result<Node, NodeServiceError> {
        let uow = self.db.begin().await?;
        let result = async {
            let repo = NodeRepository::new(uow.conn());
            if !repo.update_status(id, status, Utc::now()).await? {
                return Err(NodeServiceError::node_not_found(id));
            }
            repo.get(id)
                .await?
                .ok_or_else(|| NodeServiceError::node_not_found(id))
        }
        .await;
        let node = uow.finish(result).await?;

        tracing::info!("Node {} status set to {}", id, status);
        self.emit_event(TreeEvent::StatusChanged { id, status });
        Ok(node)
    }

    pub async fn set_description(
        &self,
        id: NodeId,
        description: Option<String>,
    ) -> Result<Node, NodeServiceError> {
        let uow = self.db.begin().await?;
        let result = async {
            let repo = NodeRepository::new(uow.conn());
            if !repo
                .update_description(id, description.as_deref(), Utc::now())
                .await?
            {
                return Err(NodeServiceError::node_not_found(id));
            }
            repo.get(id)
                .await?
                .ok_or_else(|| NodeServiceError::node_not_found(id))
        }
        .await;
        uow.finish(result).await
    }

    /// Bump `modified_at` on `id` and all of its ancestors.
    ///
    /// Returns how many nodes were touched (the node plus its ancestors).
    pub async fn touch(&self, id: NodeId) -> Result<u64, NodeServiceError> {
        let uow = self.db.begin().await?;
        let result = NodeRepository::new(uow.conn())
            .touch_with_ancestors(id, Utc::now())
            .await
            .map_err(NodeServiceError::from)
            .and_then(|touched| {
                if touched == 0 {
                    Err(NodeServiceError::node_not_found(id))
                } else {
                    Ok(touched)
                }
            });
        uow.finish(result).await
    }

    // ------------------------------------------------------------------
    // Maintenance
    // ------------------------------------------------------------------

    /// Delete every node, closure row and payload
    pub async fn purge_all(&self) -> Result<u64, NodeServiceError> {
        let uow = self.db.begin().await?;
        let result = NodeRepository::new(uow.conn())
            .delete_all()
            .await
            .map_err(NodeServiceError::from);
        let nodes_deleted = uow.finish(result).await?;

        tracing::warn!("Purged record tree: {} nodes deleted", nodes_deleted);
        self.emit_event(TreeEvent::TreePurged { nodes_deleted });
        Ok(nodes_deleted)
    }

    /// Compare the closure table and stored paths against `parent_id`
    pub async fn verify_closure(&self) -> Result<ClosureReport, NodeServiceError> {
        let conn = self.db.connect_with_timeout().await?;
        Ok(ClosureMaintainer::new(&conn).verify().await?)
    }

    /// Regenerate every closure row and path from `parent_id`, in one transaction
    pub async fn rebuild_closure(&self) -> Result<RebuildSummary, NodeServiceError> {
        let uow = self.db.begin().await?;
        let result = ClosureMaintainer::new(uow.conn())
            .rebuild()
            .await
            .map_err(NodeServiceError::from);
        let summary = uow.finish(result).await?;

        self.emit_event(TreeEvent::ClosureRebuilt {
            edges_written: summary.edges_written,
        });
        Ok(summary)
    }
}

/// Assemble a nested tree from `(depth, node)` rows sorted by depth.
///
/// The first row is the subtree root. Returns `None` for no rows.
fn build_tree(rows: Vec<(i64, Node)>) -> Option<NodeTree> {
    let root_id = rows.first().map(|(_, node)| node.id)?;

    let mut children: HashMap<NodeId, Vec<NodeTree>> = HashMap::new();
    let mut root = None;

    // Deepest first, so every node's children are complete when it is built
    for (depth, node) in rows.into_iter().rev() {
        let mut kids = children.remove(&node.id).unwrap_or_default();
        kids.sort_by_key(|tree| tree.node.id);
        let parent_id = node.parent_id;
        let tree = NodeTree {
            node,
            depth,
            children: kids,
        };

        if tree.node.id == root_id {
            root = Some(tree);
        } else if let Some(parent_id) = parent_id {
            children.entry(parent_id).or_default().push(tree);
        }
    }

    root
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: i64, parent: Option<i64>, path: &str) -> Node {
        let now = Utc::now();
        Node {
            id: NodeId(id),
            name: path.rsplit('/').next().unwrap_or_default().to_string(),
            node_type: NodeType::Part,
            parent_id: parent.map(NodeId),
            path: path.to_string(),
            data_status: DataStatus::New,
            description: None,
            created_at: now,
            modified_at: now,
        }
    }

    #[test]
    fn test_build_tree_nests_by_parent() {
        let rows = vec![
            (0, node(1, None, "/a")),
            (1, node(2, Some(1), "/a/b")),
            (1, node(3, Some(1), "/a/c")),
            (2, node(4, Some(3), "/a/c/d")),
        ];

        let tree = build_tree(rows).unwrap();
        assert_eq!(tree.node.id, NodeId(1));
        assert_eq!(tree.len(), 4);
        assert_eq!(
            tree.children.iter().map(|c| c.node.id).collect::<Vec<_>>(),
            vec![NodeId(2), NodeId(3)]
        );
        assert_eq!(tree.children[1].children[0].node.path, "/a/c/d");
        assert_eq!(tree.children[1].children[0].depth, 2);
    }

    #[test]
    fn test_build_tree_of_non_root_subtree() {
        // Subtree root still has a parent outside the rows
        let rows = vec![(0, node(3, Some(1), "/a/c")), (1, node(4, Some(3), "/a/c/d"))];

        let tree = build_tree(rows).unwrap();
        assert_eq!(tree.node.id, NodeId(3));
        assert_eq!(tree.children.len(), 1);
    }

    #[test]
    fn test_build_tree_empty() {
        assert!(build_tree(Vec::new()).is_none());
    }

    #[test]
    fn test_create_params_builder() {
        let params = CreateNodeParams::new("Order1", NodeType::Order)
            .with_parent(NodeId(1))
            .with_description("rush");
        assert_eq!(params.parent_id, Some(NodeId(1)));
        assert_eq!(params.description.as_deref(), Some("rush"));
        assert!(params.payload.is_none());
    }
}

// Store-backed tests in separate module
#[cfg(test)]
#[path = "node_service_test.rs"]
mod node_service_test;
