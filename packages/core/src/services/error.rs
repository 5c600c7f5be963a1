//! Errors returned by `NodeService` and the `TreeStore` contract.

use crate::db::DatabaseError;
use crate::models::{NodeId, NodeType, ValidationError};
use thiserror::Error;

/// Why a tree operation was refused or failed
///
/// Every mutating operation is all-or-nothing: whichever variant is returned,
/// the store is left exactly as it was before the call.
#[derive(Error, Debug)]
pub enum NodeServiceError {
    #[error("Node not found: {id}")]
    NodeNotFound { id: NodeId },

    /// Referenced parent does not exist
    #[error("Parent node not found: {parent_id}")]
    ParentNotFound { parent_id: NodeId },

    /// Payload variant does not match the node's type
    #[error("Payload type mismatch for node {node_id}: node is {expected}, payload is {actual}")]
    TypeMismatch {
        node_id: NodeId,
        expected: NodeType,
        actual: NodeType,
    },

    /// Target parent lies inside the subtree being moved
    #[error("Cannot move node {node_id} under {new_parent_id}: target is inside its subtree")]
    CyclicMove {
        node_id: NodeId,
        new_parent_id: NodeId,
    },

    /// Store failure: connection, SQL, commit. Surfaced as-is, never retried.
    #[error("Transaction failed: {0}")]
    TransactionFailed(#[from] DatabaseError),

    /// Rejected node name or unknown type/status string
    #[error("Invalid input: {0}")]
    ValidationFailed(#[from] ValidationError),

    /// Payload JSON could not be encoded or decoded
    #[error("Payload JSON error: {0}")]
    Serialization(String),
}

impl NodeServiceError {
    pub fn node_not_found(id: NodeId) -> Self {
        Self::NodeNotFound { id }
    }

    pub fn parent_not_found(parent_id: NodeId) -> Self {
        Self::ParentNotFound { parent_id }
    }

    pub fn type_mismatch(node_id: NodeId, expected: NodeType, actual: NodeType) -> Self {
        Self::TypeMismatch {
            node_id,
            expected,
            actual,
        }
    }

    pub fn cyclic_move(node_id: NodeId, new_parent_id: NodeId) -> Self {
        Self::CyclicMove {
            node_id,
            new_parent_id,
        }
    }

    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }
}
