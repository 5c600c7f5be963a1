//! Performance benchmarks for HeatTree core tree operations
//!
//! Run with: `cargo bench -p heattree-core`
//!
//! These benchmarks measure critical path performance:
//! - Child creation at increasing depth (closure fan-out cost)
//! - Ancestor / descendant queries on a populated tree
//! - Renaming a node with a large subtree (path propagation)
//! - Moving a subtree between branches (closure re-parenting)

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use heattree_core::models::{Node, NodeType};
use heattree_core::services::NodeService;
use heattree_core::StoreConfig;
use tempfile::TempDir;
use tokio::runtime::Runtime;

/// Setup a service with a fresh database
async fn setup_test_service() -> (NodeService, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let config = StoreConfig::new(temp_dir.path().join("bench.db"));
    let service = NodeService::open(&config).await.unwrap();
    (service, temp_dir)
}

/// Chain of `depth` nodes below a root; returns the deepest node
async fn build_chain(service: &NodeService, depth: usize) -> Node {
    let mut current = service
        .create_node("Root", NodeType::Client, None)
        .await
        .unwrap();
    for level in 0..depth {
        current = service
            .create_node(&format!("L{}", level), NodeType::Order, Some(current.id))
            .await
            .unwrap();
    }
    current
}

/// Root with `fanout` children, each with `fanout` grandchildren
async fn build_wide_tree(service: &NodeService, fanout: usize) -> Node {
    let root = service
        .create_node("Acme", NodeType::Client, None)
        .await
        .unwrap();
    for i in 0..fanout {
        let order = service
            .create_node(&format!("Order{}", i), NodeType::Order, Some(root.id))
            .await
            .unwrap();
        for j in 0..fanout {
            service
                .create_node(&format!("Part{}", j), NodeType::Part, Some(order.id))
                .await
                .unwrap();
        }
    }
    root
}

/// Benchmark child creation below chains of increasing depth
///
/// Each insert writes depth + 2 closure rows in a single INSERT … SELECT.
fn bench_create_at_depth(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("create_child_at_depth");

    for depth in [1usize, 10, 50] {
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, &depth| {
            b.iter_custom(|iters| {
                rt.block_on(async {
                    let (service, _temp) = setup_test_service().await;
                    let parent = build_chain(&service, depth).await;

                    let start = std::time::Instant::now();
                    for i in 0..iters {
                        let child = service
                            .create_node(&format!("Child{}", i), NodeType::Part, Some(parent.id))
                            .await
                            .unwrap();
                        black_box(child);
                    }
                    start.elapsed()
                })
            });
        });
    }

    group.finish();
}

/// Benchmark single-query ancestor and descendant lookups
fn bench_hierarchy_queries(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let (service, _temp, root, leaf) = rt.block_on(async {
        let (service, temp) = setup_test_service().await;
        let root = build_wide_tree(&service, 20).await;
        let leaf = build_chain(&service, 30).await;
        (service, temp, root, leaf)
    });

    c.bench_function("ancestors_of_depth_30", |b| {
        b.iter(|| rt.block_on(async { black_box(service.ancestors_of(leaf.id).await.unwrap()) }));
    });

    c.bench_function("descendants_of_420_nodes", |b| {
        b.iter(|| rt.block_on(async { black_box(service.descendants_of(root.id).await.unwrap()) }));
    });

    c.bench_function("subtree_420_nodes", |b| {
        b.iter(|| rt.block_on(async { black_box(service.subtree(root.id).await.unwrap()) }));
    });
}

/// Benchmark rename and move of a 420-node subtree
fn bench_restructuring(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("restructure");
    group.sample_size(10); // Fewer samples for expensive operations

    group.bench_function("rename_root_420_nodes", |b| {
        b.iter_custom(|iters| {
            rt.block_on(async {
                let (service, _temp) = setup_test_service().await;
                let root = build_wide_tree(&service, 20).await;

                let start = std::time::Instant::now();
                for i in 0..iters {
                    service
                        .rename_node(root.id, &format!("Acme{}", i))
                        .await
                        .unwrap();
                }
                start.elapsed()
            })
        });
    });

    group.bench_function("move_subtree_420_nodes", |b| {
        b.iter_custom(|iters| {
            rt.block_on(async {
                let (service, _temp) = setup_test_service().await;
                let subtree = build_wide_tree(&service, 20).await;
                let left = service
                    .create_node("Left", NodeType::Furnace, None)
                    .await
                    .unwrap();
                let right = service
                    .create_node("Right", NodeType::Furnace, None)
                    .await
                    .unwrap();

                let start = std::time::Instant::now();
                for i in 0..iters {
                    let target = if i % 2 == 0 { left.id } else { right.id };
                    service.move_node(subtree.id, Some(target)).await.unwrap();
                }
                start.elapsed()
            })
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_create_at_depth,
    bench_hierarchy_queries,
    bench_restructuring
);
criterion_main!(benches);
