//! Typed Payloads
//!
//! Business data attached 1:1 to a node. Each `NodeType` has exactly one payload
//! struct and one payload table; the `Payload` enum is the closed union the
//! gateway dispatches on.
//!
//! Payload bodies are stored as JSON in the per-type table, so fields can grow
//! without schema changes. Unknown or missing fields deserialize to defaults.

use crate::models::{NodeId, NodeType};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Customer record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientPayload {
    pub client_code: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub client_group: Option<String>,
    pub address: Option<String>,
}

/// Customer order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderPayload {
    pub order_number: Option<String>,
    pub order_date: Option<NaiveDate>,
    pub commercial: Option<String>,
}

/// Part to be treated
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartPayload {
    pub designation: Option<String>,
    pub client_designation: Option<String>,
    pub reference: Option<String>,
    pub quantity: Option<i64>,
    /// Steel grade node this part is made of (a cross-link, not a tree edge)
    pub steel_node_id: Option<NodeId>,
}

/// Furnace
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FurnacePayload {
    pub furnace_type: Option<String>,
    pub furnace_size: Option<String>,
    pub heating_cell: Option<String>,
    pub cooling_media: Option<String>,
}

/// Heat-treatment trial
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrialPayload {
    pub trial_code: Option<String>,
    pub load_number: Option<String>,
    pub trial_date: Option<NaiveDate>,
    pub status: Option<String>,
    pub location: Option<String>,
    pub process_type: Option<String>,
    pub is_measured: bool,
}

/// File attachment metadata (content lives outside the store)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePayload {
    pub original_name: Option<String>,
    pub size: Option<u64>,
    pub mime_type: Option<String>,
    pub storage_key: Option<String>,
    pub category: Option<String>,
}

/// Steel grade and chemistry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SteelPayload {
    pub grade: Option<String>,
    pub standard: Option<String>,
    pub family: Option<String>,
    /// Element symbol → mass fraction in percent
    pub chemistry: Vec<(String, f64)>,
}

/// Payload attached to a node, one variant per `NodeType`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Payload {
    Client(ClientPayload),
    Order(OrderPayload),
    Part(PartPayload),
    Furnace(FurnacePayload),
    Trial(TrialPayload),
    File(FilePayload),
    Steel(SteelPayload),
}

impl Payload {
    /// Node type this payload belongs to
    pub fn node_type(&self) -> NodeType {
        match self {
            Payload::Client(_) => NodeType::Client,
            Payload::Order(_) => NodeType::Order,
            Payload::Part(_) => NodeType::Part,
            Payload::Furnace(_) => NodeType::Furnace,
            Payload::Trial(_) => NodeType::Trial,
            Payload::File(_) => NodeType::File,
            Payload::Steel(_) => NodeType::Steel,
        }
    }

    /// Empty payload for `node_type`
    pub fn empty(node_type: NodeType) -> Self {
        match node_type {
            NodeType::Client => Payload::Client(ClientPayload::default()),
            NodeType::Order => Payload::Order(OrderPayload::default()),
            NodeType::Part => Payload::Part(PartPayload::default()),
            NodeType::Furnace => Payload::Furnace(FurnacePayload::default()),
            NodeType::Trial => Payload::Trial(TrialPayload::default()),
            NodeType::File => Payload::File(FilePayload::default()),
            NodeType::Steel => Payload::Steel(SteelPayload::default()),
        }
    }

    /// Serialize the body only (the type is implied by the table it lands in)
    pub fn body_json(&self) -> serde_json::Result<String> {
        match self {
            Payload::Client(p) => serde_json::to_string(p),
            Payload::Order(p) => serde_json::to_string(p),
            Payload::Part(p) => serde_json::to_string(p),
            Payload::Furnace(p) => serde_json::to_string(p),
            Payload::Trial(p) => serde_json::to_string(p),
            Payload::File(p) => serde_json::to_string(p),
            Payload::Steel(p) => serde_json::to_string(p),
        }
    }

    /// Rebuild a payload from a stored body and the node type that owns it
    pub fn from_body_json(node_type: NodeType, body: &str) -> serde_json::Result<Self> {
        Ok(match node_type {
            NodeType::Client => Payload::Client(serde_json::from_str(body)?),
            NodeType::Order => Payload::Order(serde_json::from_str(body)?),
            NodeType::Part => Payload::Part(serde_json::from_str(body)?),
            NodeType::Furnace => Payload::Furnace(serde_json::from_str(body)?),
            NodeType::Trial => Payload::Trial(serde_json::from_str(body)?),
            NodeType::File => Payload::File(serde_json::from_str(body)?),
            NodeType::Steel => Payload::Steel(serde_json::from_str(body)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_reports_its_node_type() {
        for node_type in NodeType::ALL {
            assert_eq!(Payload::empty(node_type).node_type(), node_type);
        }
    }

    #[test]
    fn test_body_json_omits_type_tag() {
        let payload = Payload::Client(ClientPayload {
            city: Some("Lyon".to_string()),
            ..Default::default()
        });

        let body = payload.body_json().unwrap();
        assert!(body.contains("Lyon"));
        assert!(!body.contains("\"type\""));

        let restored = Payload::from_body_json(NodeType::Client, &body).unwrap();
        assert_eq!(restored, payload);
    }

    #[test]
    fn test_from_body_json_fills_missing_fields() {
        let restored = Payload::from_body_json(NodeType::Trial, r#"{"trial_code":"T-01"}"#).unwrap();
        match restored {
            Payload::Trial(trial) => {
                assert_eq!(trial.trial_code.as_deref(), Some("T-01"));
                assert!(!trial.is_measured);
                assert!(trial.trial_date.is_none());
            }
            other => panic!("expected trial payload, got {:?}", other),
        }
    }

    #[test]
    fn test_tagged_representation() {
        let payload = Payload::Steel(SteelPayload {
            grade: Some("42CrMo4".to_string()),
            chemistry: vec![("C".to_string(), 0.42), ("Cr".to_string(), 1.05)],
            ..Default::default()
        });
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["type"], "steel");
        assert_eq!(value["data"]["grade"], "42CrMo4");
    }
}
