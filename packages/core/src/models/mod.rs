//! Data Models
//!
//! This module contains the core data structures used throughout HeatTree:
//!
//! - `Node` - Universal node model for every business record
//! - `ClosureEdge`, `NodeRef`, `NodeTree` - Hierarchy views over the closure table
//! - `Payload` - Typed business data attached 1:1 to a node
//!
//! Node-specific data lives in one payload table per `NodeType`; the `nodes`
//! table itself only carries what every record shares.

mod node;
mod payload;

pub use node::{
    child_path, rebase_path, replace_last_segment, validate_name, ClosureEdge, DataStatus, Node,
    NodeId, NodeQuery, NodeRef, NodeTree, NodeType, ValidationError, PATH_SEPARATOR,
};
pub use payload::{
    ClientPayload, FilePayload, FurnacePayload, OrderPayload, PartPayload, Payload, SteelPayload,
    TrialPayload,
};
