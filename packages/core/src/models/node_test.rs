//! Tests for node value types and path helpers

#[cfg(test)]
mod tests {
    use crate::models::{
        child_path, rebase_path, replace_last_segment, validate_name, DataStatus, Node, NodeId,
        NodeQuery, NodeTree, NodeType, ValidationError,
    };
    use chrono::Utc;

    fn sample_node(id: i64, name: &str, parent_id: Option<i64>, path: &str) -> Node {
        let now = Utc::now();
        Node {
            id: NodeId(id),
            name: name.to_string(),
            node_type: NodeType::Part,
            parent_id: parent_id.map(NodeId),
            path: path.to_string(),
            data_status: DataStatus::New,
            description: None,
            created_at: now,
            modified_at: now,
        }
    }

    #[test]
    fn test_child_path_for_root_and_child() {
        assert_eq!(child_path(None, "Acme"), "/Acme");
        assert_eq!(child_path(Some("/Acme"), "Order1"), "/Acme/Order1");
        assert_eq!(
            child_path(Some("/Acme/Order1"), "Part1"),
            "/Acme/Order1/Part1"
        );
    }

    #[test]
    fn test_replace_last_segment_keeps_prefix() {
        assert_eq!(replace_last_segment("/Acme", "Acme Corp"), "/Acme Corp");
        assert_eq!(
            replace_last_segment("/Acme/Order1", "Order 42"),
            "/Acme/Order 42"
        );
    }

    #[test]
    fn test_rebase_path_is_segment_aware() {
        assert_eq!(
            rebase_path("/Acme/Order1/Part1", "/Acme", "/Acme Corp"),
            Some("/Acme Corp/Order1/Part1".to_string())
        );
        assert_eq!(
            rebase_path("/Acme", "/Acme", "/Acme Corp"),
            Some("/Acme Corp".to_string())
        );
        // A sibling whose name merely starts with the old name is not below it
        assert_eq!(rebase_path("/Acme2/Order1", "/Acme", "/Acme Corp"), None);
        assert_eq!(rebase_path("/Other/Acme", "/Acme", "/Acme Corp"), None);
    }

    #[test]
    fn test_validate_name_rejects_empty_and_separator() {
        assert!(validate_name("Order 1").is_ok());
        assert!(matches!(
            validate_name("   "),
            Err(ValidationError::InvalidName { .. })
        ));
        assert!(matches!(
            validate_name("a/b"),
            Err(ValidationError::InvalidName { .. })
        ));
    }

    #[test]
    fn test_node_type_round_trips_through_str() {
        for node_type in NodeType::ALL {
            assert_eq!(node_type.as_str().parse::<NodeType>().unwrap(), node_type);
            assert!(node_type.payload_table().starts_with("payload_"));
        }
        assert!(matches!(
            "customer".parse::<NodeType>(),
            Err(ValidationError::InvalidNodeType(_))
        ));
    }

    #[test]
    fn test_data_status_parsing_is_case_insensitive() {
        assert_eq!("OPENED".parse::<DataStatus>().unwrap(), DataStatus::Opened);
        assert_eq!("old".parse::<DataStatus>().unwrap(), DataStatus::Old);
        assert_eq!(DataStatus::default(), DataStatus::New);
        assert!("archived".parse::<DataStatus>().is_err());
    }

    #[test]
    fn test_node_depth_from_path() {
        let root = sample_node(1, "Acme", None, "/Acme");
        let part = sample_node(3, "Part1", Some(2), "/Acme/Order1/Part1");

        assert!(root.is_root());
        assert_eq!(root.depth(), 0);
        assert!(!part.is_root());
        assert_eq!(part.depth(), 2);
        assert_eq!(
            part.path_segments().collect::<Vec<_>>(),
            vec!["Acme", "Order1", "Part1"]
        );
    }

    #[test]
    fn test_node_serializes_camel_case() {
        let node = sample_node(7, "Acme", None, "/Acme");
        let json = serde_json::to_value(&node).unwrap();

        assert_eq!(json["id"], 7);
        assert_eq!(json["nodeType"], "part");
        assert_eq!(json["dataStatus"], "new");
        assert!(json.get("description").is_none());
    }

    #[test]
    fn test_node_tree_len_and_preorder() {
        let tree = NodeTree {
            node: sample_node(1, "Acme", None, "/Acme"),
            depth: 0,
            children: vec![
                NodeTree {
                    node: sample_node(2, "Order1", Some(1), "/Acme/Order1"),
                    depth: 1,
                    children: vec![NodeTree {
                        node: sample_node(4, "Part1", Some(2), "/Acme/Order1/Part1"),
                        depth: 2,
                        children: vec![],
                    }],
                },
                NodeTree {
                    node: sample_node(3, "Order2", Some(1), "/Acme/Order2"),
                    depth: 1,
                    children: vec![],
                },
            ],
        };

        assert_eq!(tree.len(), 4);
        let order: Vec<i64> = tree.iter().map(|t| t.node.id.get()).collect();
        assert_eq!(order, vec![1, 2, 4, 3]);
    }

    #[test]
    fn test_node_query_builder() {
        let query = NodeQuery::new()
            .with_node_type(NodeType::File)
            .with_ancestor(NodeId(5))
            .with_max_depth(2)
            .with_limit(10)
            .with_offset(20);

        assert_eq!(query.node_type, Some(NodeType::File));
        assert_eq!(query.ancestor_id, Some(NodeId(5)));
        assert_eq!(query.max_depth, Some(2));
        assert_eq!(query.data_status, None);
        assert_eq!(query.limit, Some(10));
        assert_eq!(query.offset, Some(20));
    }
}
