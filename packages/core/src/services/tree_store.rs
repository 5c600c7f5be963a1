//! TreeStore Trait - Collaborator Contract
//!
//! Business-entity services (orders, trials, file attachments, reports) never
//! touch the closure table or the payload tables directly. They hold an
//! `Arc<dyn TreeStore>` and go through these four operations, which lets them
//! be tested against an in-memory fake.

use crate::models::{NodeId, NodeRef, NodeTree, Payload};
use crate::services::error::NodeServiceError;
use crate::services::node_service::NodeService;
use async_trait::async_trait;

/// What collaborators may ask of the record tree
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so a single store can be shared
/// across request handlers.
#[async_trait]
pub trait TreeStore: Send + Sync {
    /// Attach (or replace) the typed payload of a node
    async fn attach_payload(&self, id: NodeId, payload: Payload)
        -> Result<(), NodeServiceError>;

    /// Ancestors nearest first, the node itself at depth 0
    async fn ancestors_of(&self, id: NodeId) -> Result<Vec<NodeRef>, NodeServiceError>;

    /// Strict descendants, shallowest first
    async fn descendants_of(&self, id: NodeId) -> Result<Vec<NodeRef>, NodeServiceError>;

    /// Nested subtree rooted at `id`
    async fn subtree(&self, id: NodeId) -> Result<NodeTree, NodeServiceError>;
}

#[async_trait]
impl TreeStore for NodeService {
    async fn attach_payload(
        &self,
        id: NodeId,
        payload: Payload,
    ) -> Result<(), NodeServiceError> {
        NodeService::attach_payload(self, id, payload).await
    }

    async fn ancestors_of(&self, id: NodeId) -> Result<Vec<NodeRef>, NodeServiceError> {
        NodeService::ancestors_of(self, id).await
    }

    async fn descendants_of(&self, id: NodeId) -> Result<Vec<NodeRef>, NodeServiceError> {
        NodeService::descendants_of(self, id).await
    }

    async fn subtree(&self, id: NodeId) -> Result<NodeTree, NodeServiceError> {
        NodeService::subtree(self, id).await
    }
}
