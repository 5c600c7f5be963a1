//! Tree Events
//!
//! Events emitted by `NodeService` after a mutation has committed. They follow
//! the observer pattern: subscribers get a tokio broadcast receiver and never
//! see changes that were rolled back.
//!
//! # Event Flow
//!
//! 1. NodeService runs a mutation inside a `UnitOfWork`
//! 2. The unit commits
//! 3. A `TreeEvent` is sent on the broadcast channel
//! 4. Every subscriber receives it asynchronously (slow ones may lag)

use crate::models::{DataStatus, Node, NodeId, NodeType};
use serde::Serialize;

/// Change to the tree, described at the domain level
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TreeEvent {
    /// A node was created (payload, if any, already attached)
    NodeCreated(Node),

    #[serde(rename_all = "camelCase")]
    NodeRenamed {
        id: NodeId,
        old_path: String,
        new_path: String,
        /// Descendant paths rewritten along with the node
        descendants_updated: u64,
    },

    #[serde(rename_all = "camelCase")]
    NodeMoved {
        id: NodeId,
        old_parent_id: Option<NodeId>,
        new_parent_id: Option<NodeId>,
        new_path: String,
    },

    /// A node and its whole subtree were deleted
    #[serde(rename_all = "camelCase")]
    NodeDeleted { id: NodeId, path: String },

    #[serde(rename_all = "camelCase")]
    PayloadAttached { id: NodeId, node_type: NodeType },

    #[serde(rename_all = "camelCase")]
    StatusChanged { id: NodeId, status: DataStatus },

    /// Every node was removed
    #[serde(rename_all = "camelCase")]
    TreePurged { nodes_deleted: u64 },

    /// The closure table was derived again from `parent_id`
    #[serde(rename_all = "camelCase")]
    ClosureRebuilt { edges_written: u64 },
}

impl TreeEvent {
    /// Get a string representation of the event type
    pub fn event_type(&self) -> &'static str {
        match self {
            TreeEvent::NodeCreated(_) => "node:created",
            TreeEvent::NodeRenamed { .. } => "node:renamed",
            TreeEvent::NodeMoved { .. } => "node:moved",
            TreeEvent::NodeDeleted { .. } => "node:deleted",
            TreeEvent::PayloadAttached { .. } => "payload:attached",
            TreeEvent::StatusChanged { .. } => "node:status",
            TreeEvent::TreePurged { .. } => "tree:purged",
            TreeEvent::ClosureRebuilt { .. } => "closure:rebuilt",
        }
    }

    /// Node the event is about, if it concerns a single node
    pub fn node_id(&self) -> Option<NodeId> {
        match self {
            TreeEvent::NodeCreated(node) => Some(node.id),
            TreeEvent::NodeRenamed { id, .. }
            | TreeEvent::NodeMoved { id, .. }
            | TreeEvent::NodeDeleted { id, .. }
            | TreeEvent::PayloadAttached { id, .. }
            | TreeEvent::StatusChanged { id, .. } => Some(*id),
            TreeEvent::TreePurged { .. } | TreeEvent::ClosureRebuilt { .. } => None,
        }
    }
}
