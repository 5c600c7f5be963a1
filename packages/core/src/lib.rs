//! HeatTree Core Business Logic Layer
//!
//! This crate provides the hierarchical record store behind HeatTree: customers,
//! orders, parts, furnaces, trials, steels and file attachments kept as one
//! arbitrary-depth tree of nodes.
//!
//! # Architecture
//!
//! - **Adjacency + closure**: `nodes.parent_id` is the source of truth; the
//!   `node_closure` table answers ancestor/descendant queries in one lookup
//! - **Materialized paths**: every node stores `/Root/.../Name`, kept correct
//!   through renames and moves
//! - **Typed payloads**: one JSON payload table per node type, 1:1 with its node
//! - **libsql**: Embedded SQLite; foreign-key cascades delete whole subtrees
//! - **One operation, one transaction**: every mutation commits or rolls back as a unit
//!
//! # Modules
//!
//! - [`models`] - Data structures (Node, NodeType, Payload, NodeTree, ...)
//! - [`db`] - Database layer: repository, closure maintainer, payload gateway, transactions
//! - [`services`] - `NodeService` façade and the `TreeStore` collaborator contract
//! - [`config`] - Store configuration from file and environment

pub mod config;
pub mod db;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use config::StoreConfig;
pub use db::{DatabaseError, DatabaseService, TreeEvent};
pub use models::*;
pub use services::*;
