//! Node Data Structures
//!
//! This module defines the core `Node` struct and the value types that travel with it
//! through the hierarchy layer.
//!
//! # Architecture
//!
//! - **Universal Node**: One row per business record, whatever its type
//! - **Closed type set**: `NodeType` names the payload table that owns the record's data
//! - **Materialized path**: `path` spells the chain of names from the root, slash-delimited
//! - **Adjacency is truth**: `parent_id` decides shape; closure rows are derived from it
//!
//! # Examples
//!
//! ```rust
//! use heattree_core::models::{child_path, NodeType};
//!
//! assert_eq!(child_path(None, "Acme"), "/Acme");
//! assert_eq!(child_path(Some("/Acme"), "Order1"), "/Acme/Order1");
//! assert_eq!("part".parse::<NodeType>().unwrap(), NodeType::Part);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Separator between segments of a materialized path
pub const PATH_SEPARATOR: char = '/';

/// Validation errors for Node operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid node name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Invalid node type: {0}")]
    InvalidNodeType(String),

    #[error("Invalid data status: {0}")]
    InvalidDataStatus(String),
}

/// Surrogate identifier of a node (SQLite rowid)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub i64);

impl NodeId {
    pub fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for NodeId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Business type of a node.
///
/// Each variant owns exactly one payload table. Adding a record kind means adding a
/// variant here (and its payload struct), never matching on free-form strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Client,
    Order,
    Part,
    Furnace,
    Trial,
    File,
    Steel,
}

impl NodeType {
    /// Every known node type, in schema creation order
    pub const ALL: [NodeType; 7] = [
        NodeType::Client,
        NodeType::Order,
        NodeType::Part,
        NodeType::Furnace,
        NodeType::Trial,
        NodeType::File,
        NodeType::Steel,
    ];

    /// Stored representation (`nodes.node_type` column)
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Client => "client",
            NodeType::Order => "order",
            NodeType::Part => "part",
            NodeType::Furnace => "furnace",
            NodeType::Trial => "trial",
            NodeType::File => "file",
            NodeType::Steel => "steel",
        }
    }

    /// Name of the table holding this type's payload rows
    pub fn payload_table(&self) -> &'static str {
        match self {
            NodeType::Client => "payload_client",
            NodeType::Order => "payload_order",
            NodeType::Part => "payload_part",
            NodeType::Furnace => "payload_furnace",
            NodeType::Trial => "payload_trial",
            NodeType::File => "payload_file",
            NodeType::Steel => "payload_steel",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidNodeType(s.to_string()))
    }
}

/// Workflow tag carried by every node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataStatus {
    /// Freshly created, not yet looked at
    #[default]
    New,
    /// Seen at least once
    Old,
    /// Currently open in some editor
    Opened,
}

impl DataStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataStatus::New => "new",
            DataStatus::Old => "old",
            DataStatus::Opened => "opened",
        }
    }
}

impl fmt::Display for DataStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "new" => Ok(DataStatus::New),
            "old" => Ok(DataStatus::Old),
            "opened" => Ok(DataStatus::Opened),
            _ => Err(ValidationError::InvalidDataStatus(s.to_string())),
        }
    }
}

/// A single entry of the business-record tree.
///
/// # Fields
///
/// - `id`: Surrogate integer identifier
/// - `name`: Display label, also the last segment of `path`
/// - `node_type`: Which payload table owns this record's business data
/// - `parent_id`: Parent node (`None` for roots)
/// - `path`: Slash-delimited names from the root down to this node
/// - `data_status`: Workflow tag (new / old / opened)
/// - `description`: Optional free text
/// - `created_at` / `modified_at`: Timestamps (UTC)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub node_type: NodeType,
    pub parent_id: Option<NodeId>,
    pub path: String,
    #[serde(default)]
    pub data_status: DataStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl Node {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Number of parent links between the root and this node, read from `path`
    pub fn depth(&self) -> usize {
        self.path_segments().count().saturating_sub(1)
    }

    pub fn path_segments(&self) -> impl Iterator<Item = &str> {
        self.path
            .split(PATH_SEPARATOR)
            .filter(|segment| !segment.is_empty())
    }
}

/// Check that `name` can be used as a path segment.
///
/// Names must contain something besides whitespace and must not contain the
/// path separator. Duplicate sibling names are allowed.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::InvalidName {
            name: name.to_string(),
            reason: "name must not be empty".to_string(),
        });
    }
    if name.contains(PATH_SEPARATOR) {
        return Err(ValidationError::InvalidName {
            name: name.to_string(),
            reason: format!("name must not contain '{}'", PATH_SEPARATOR),
        });
    }
    Ok(())
}

/// Path of a node called `name` placed under a parent with `parent_path`
/// (or at the root when there is no parent).
pub fn child_path(parent_path: Option<&str>, name: &str) -> String {
    match parent_path {
        Some(parent) => format!("{}{}{}", parent, PATH_SEPARATOR, name),
        None => format!("{}{}", PATH_SEPARATOR, name),
    }
}

/// Replace only the final segment of `path` with `new_name`
pub fn replace_last_segment(path: &str, new_name: &str) -> String {
    match path.rfind(PATH_SEPARATOR) {
        Some(idx) => format!("{}{}", &path[..=idx], new_name),
        None => child_path(None, new_name),
    }
}

/// Re-root `path` from `old_prefix` onto `new_prefix`.
///
/// Returns `None` when `path` is not `old_prefix` itself or below it. Matching is
/// segment-aware: `/Acme2/x` is not below `/Acme`.
pub fn rebase_path(path: &str, old_prefix: &str, new_prefix: &str) -> Option<String> {
    if path == old_prefix {
        return Some(new_prefix.to_string());
    }
    let rest = path.strip_prefix(old_prefix)?;
    if rest.starts_with(PATH_SEPARATOR) {
        Some(format!("{}{}", new_prefix, rest))
    } else {
        None
    }
}

/// One row of the closure table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosureEdge {
    pub ancestor_id: NodeId,
    pub descendant_id: NodeId,
    /// Parent links between ancestor and descendant (0 for the self-loop)
    pub depth: i64,
}

/// Node reference returned by ancestor / descendant queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeRef {
    pub id: NodeId,
    pub depth: i64,
}

/// Nested view of a subtree, built from one closure query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeTree {
    pub node: Node,
    /// Distance from the subtree root
    pub depth: i64,
    pub children: Vec<NodeTree>,
}

impl NodeTree {
    /// Number of nodes in this tree, root included
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(NodeTree::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Pre-order walk over every node in the tree
    pub fn iter(&self) -> impl Iterator<Item = &NodeTree> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let next = stack.pop()?;
            stack.extend(next.children.iter().rev());
            Some(next)
        })
    }
}

/// Filter for node listings
///
/// All criteria are combined with AND. `ancestor_id` restricts results to the
/// subtree below that node (the ancestor itself excluded); `max_depth` bounds the
/// distance from it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_type: Option<NodeType>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ancestor_id: Option<NodeId>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_status: Option<DataStatus>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
}

impl NodeQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_node_type(mut self, node_type: NodeType) -> Self {
        self.node_type = Some(node_type);
        self
    }

    pub fn with_ancestor(mut self, ancestor_id: NodeId) -> Self {
        self.ancestor_id = Some(ancestor_id);
        self
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    pub fn with_data_status(mut self, data_status: DataStatus) -> Self {
        self.data_status = Some(data_status);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }
}

// Unit tests in separate module
#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;
