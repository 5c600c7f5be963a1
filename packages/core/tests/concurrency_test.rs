//! Concurrent writers
//!
//! Each operation runs on its own connection inside a `BEGIN IMMEDIATE`
//! transaction; concurrent creations under one parent must serialize in the
//! store and leave a consistent closure table.

#[cfg(test)]
mod concurrency_tests {
    use anyhow::Result;
    use heattree_core::models::{NodeQuery, NodeType};
    use heattree_core::services::NodeService;
    use heattree_core::StoreConfig;
    use std::collections::BTreeSet;
    use std::sync::Arc;
    use tempfile::TempDir;

    const WRITERS: usize = 8;
    const NODES_PER_WRITER: usize = 5;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_children_under_same_parent() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let mut config = StoreConfig::new(temp_dir.path().join("test.db"));
        config.busy_timeout_ms = 30_000;
        let service = Arc::new(NodeService::open(&config).await?);

        let acme = service.create_node("Acme", NodeType::Client, None).await?;
        let order = service
            .create_node("Order1", NodeType::Order, Some(acme.id))
            .await?;

        let mut handles = Vec::new();
        for writer in 0..WRITERS {
            let service = Arc::clone(&service);
            let parent = order.id;
            handles.push(tokio::spawn(async move {
                let mut created = Vec::new();
                for i in 0..NODES_PER_WRITER {
                    let node = service
                        .create_node(&format!("P{}-{}", writer, i), NodeType::Part, Some(parent))
                        .await?;
                    created.push(node.id);
                }
                Ok::<_, heattree_core::NodeServiceError>(created)
            }));
        }

        let mut all_created = BTreeSet::new();
        for handle in handles {
            all_created.extend(handle.await??);
        }
        assert_eq!(all_created.len(), WRITERS * NODES_PER_WRITER);

        let children: BTreeSet<_> = service.children_of(order.id).await?.into_iter().collect();
        assert_eq!(children, all_created);

        let under_acme = service
            .count_nodes(&NodeQuery::new().with_ancestor(acme.id))
            .await?;
        assert_eq!(under_acme as usize, WRITERS * NODES_PER_WRITER + 1);

        for id in &all_created {
            assert_eq!(service.ancestors_of(*id).await?.len(), 3);
        }
        let report = service.verify_closure().await?;
        assert!(report.is_consistent(), "{:?}", report);
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_moves_and_creates_stay_consistent() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let mut config = StoreConfig::new(temp_dir.path().join("test.db"));
        config.busy_timeout_ms = 30_000;
        let service = Arc::new(NodeService::open(&config).await?);

        let left = service.create_node("Left", NodeType::Furnace, None).await?;
        let right = service.create_node("Right", NodeType::Furnace, None).await?;
        let mut trials = Vec::new();
        for i in 0..6 {
            trials.push(
                service
                    .create_node(&format!("T{}", i), NodeType::Trial, Some(left.id))
                    .await?,
            );
        }

        let mover = {
            let service = Arc::clone(&service);
            let ids: Vec<_> = trials.iter().map(|t| t.id).collect();
            let target = right.id;
            tokio::spawn(async move {
                for id in ids {
                    service.move_node(id, Some(target)).await?;
                }
                Ok::<_, heattree_core::NodeServiceError>(())
            })
        };
        let creator = {
            let service = Arc::clone(&service);
            let parents: Vec<_> = trials.iter().map(|t| t.id).collect();
            tokio::spawn(async move {
                for (i, parent) in parents.into_iter().enumerate() {
                    service
                        .create_node(&format!("F{}", i), NodeType::File, Some(parent))
                        .await?;
                }
                Ok::<_, heattree_core::NodeServiceError>(())
            })
        };

        mover.await??;
        creator.await??;

        assert!(service.descendants_of(left.id).await?.is_empty());
        assert_eq!(service.descendants_of(right.id).await?.len(), 12);
        for trial in &trials {
            let files = service.list_children(trial.id).await?;
            assert_eq!(files.len(), 1);
            assert!(files[0].path.starts_with("/Right/"));
        }
        let report = service.verify_closure().await?;
        assert!(report.is_consistent(), "{:?}", report);
        Ok(())
    }
}
