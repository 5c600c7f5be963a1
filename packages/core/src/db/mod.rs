//! Database Layer
//!
//! This module handles all database interactions using libsql (embedded SQLite):
//!
//! - Database initialization and connection management
//! - The `nodes` adjacency list and the `node_closure` table derived from it
//! - One JSON payload table per node type
//! - Transactions spanning all of the above
//!
//! # Architecture
//!
//! Row-level components (`NodeRepository`, `ClosureMaintainer`,
//! `PayloadGateway`) borrow a `libsql::Connection` and never open transactions
//! themselves. The service layer opens a `UnitOfWork` and hands its connection
//! to whichever components an operation needs, so one operation is one
//! transaction no matter how many tables it touches.

mod closure;
mod database;
mod error;
pub mod events;
mod node_repository;
mod payload_gateway;
mod transaction;

pub use closure::{ClosureMaintainer, ClosureReport, PathMismatch, RebuildSummary};
pub use database::DatabaseService;
pub use error::DatabaseError;
pub use events::TreeEvent;
pub use node_repository::{NewNodeRow, NodeRepository};
pub use payload_gateway::{AttachOutcome, PayloadGateway};
pub use transaction::UnitOfWork;
