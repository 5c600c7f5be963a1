//! Business Services
//!
//! This module contains the service layer collaborators talk to:
//!
//! - `NodeService` - Tree lifecycle, hierarchy queries, payloads, maintenance
//! - `TreeStore` - The narrow async contract business-entity services depend on
//!
//! Services coordinate between the database layer and application logic,
//! running each operation as one transaction and broadcasting events after commit.

pub mod error;
pub mod node_service;
pub mod tree_store;

pub use error::NodeServiceError;
pub use node_service::{CreateNodeParams, NodeService};
pub use tree_store::TreeStore;
