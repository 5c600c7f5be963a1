//! TreeStore contract as seen by a collaborator
//!
//! A business-entity service only holds `Arc<dyn TreeStore>`; these tests go
//! through the trait object to make sure NodeService honours the contract.

#[cfg(test)]
mod tree_store_tests {
    use anyhow::Result;
    use heattree_core::models::{
        NodeId, NodeType, Payload, SteelPayload, TrialPayload,
    };
    use heattree_core::services::{NodeService, NodeServiceError, TreeStore};
    use heattree_core::StoreConfig;
    use std::sync::Arc;
    use tempfile::TempDir;

    /// Minimal stand-in for a trial-management service
    struct TrialRegistry {
        tree: Arc<dyn TreeStore>,
    }

    impl TrialRegistry {
        async fn record_trial(&self, trial_id: NodeId, code: &str) -> Result<(), NodeServiceError> {
            self.tree
                .attach_payload(
                    trial_id,
                    Payload::Trial(TrialPayload {
                        trial_code: Some(code.to_string()),
                        is_measured: true,
                        ..Default::default()
                    }),
                )
                .await
        }

        /// Root customer of a trial: the deepest ancestor
        async fn customer_of(&self, trial_id: NodeId) -> Result<NodeId, NodeServiceError> {
            let ancestors = self.tree.ancestors_of(trial_id).await?;
            ancestors
                .last()
                .map(|r| r.id)
                .ok_or_else(|| NodeServiceError::node_not_found(trial_id))
        }
    }

    async fn create_test_service() -> Result<(Arc<NodeService>, TempDir)> {
        let temp_dir = TempDir::new()?;
        let config = StoreConfig::new(temp_dir.path().join("test.db"));
        let service = Arc::new(NodeService::open(&config).await?);
        Ok((service, temp_dir))
    }

    #[tokio::test]
    async fn test_collaborator_through_trait_object() -> Result<()> {
        let (service, _temp_dir) = create_test_service().await?;
        let acme = service.create_node("Acme", NodeType::Client, None).await?;
        let order = service
            .create_node("Order1", NodeType::Order, Some(acme.id))
            .await?;
        let part = service
            .create_node("Part1", NodeType::Part, Some(order.id))
            .await?;
        let trial = service
            .create_node("T-01", NodeType::Trial, Some(part.id))
            .await?;

        let registry = TrialRegistry {
            tree: service.clone(),
        };

        registry.record_trial(trial.id, "T-01").await?;
        assert_eq!(registry.customer_of(trial.id).await?, acme.id);

        match service.get_payload(trial.id).await? {
            Some(Payload::Trial(payload)) => {
                assert_eq!(payload.trial_code.as_deref(), Some("T-01"));
                assert!(payload.is_measured);
            }
            other => panic!("expected trial payload, got {:?}", other),
        }

        let tree: Arc<dyn TreeStore> = service.clone();
        let subtree = tree.subtree(order.id).await?;
        assert_eq!(subtree.len(), 3);
        assert_eq!(subtree.children[0].node.id, part.id);
        assert_eq!(subtree.children[0].children[0].depth, 2);

        let below = tree.descendants_of(acme.id).await?;
        assert_eq!(below.len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_trait_surfaces_type_mismatch() -> Result<()> {
        let (service, _temp_dir) = create_test_service().await?;
        let trial = service.create_node("T-01", NodeType::Trial, None).await?;
        let tree: Arc<dyn TreeStore> = service;

        let err = tree
            .attach_payload(trial.id, Payload::Steel(SteelPayload::default()))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            NodeServiceError::TypeMismatch {
                expected: NodeType::Trial,
                actual: NodeType::Steel,
                ..
            }
        ));
        Ok(())
    }
}
