use cbmtree::CBMTree;
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

const BASE_TREE_SIZE: u64 = 1_000_000;
const BATCH_SMALL: u64 = 2_000;
const BATCH_LARGE: u64 = 100_000;

fn build_tree(size: u64) -> CBMTree<u64> {
    eprintln!("Building tree of size {}...", size);
    let mut tree = CBMTree::<u64>::new();
    tree.insert_batch(0..size).expect("tree should grow");
    eprintln!("Done.");
    tree
}

fn single_op_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("cbmtree_basic_ops");
    let base_tree = build_tree(BASE_TREE_SIZE);
    let mut insert_tree = base_tree.clone();
    let root_tree = base_tree.clone();
    let lookup_tree = base_tree.clone();

    group.bench_function("insert_single", |b| {
        let mut next_value = BASE_TREE_SIZE;
        b.iter(|| {
            next_value += 1;
            black_box(insert_tree.insert(next_value)).expect("insert should succeed");
        });
    });

    group.bench_function("root_hash", |b| {
        b.iter(|| black_box(root_tree.root_hash()));
    });

    group.bench_function("get", |b| {
        let target = (BASE_TREE_SIZE - 1) / 2;
        b.iter(|| black_box(lookup_tree.get(target as usize)));
    });

    group.finish();
}

fn growth_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("cbmtree_growth");

    // Filling exactly to a power of two and inserting once more isolates the doubling spike.
    for layers in [10u32, 14, 18] {
        let full = build_tree(1 << (layers - 1));
        group.bench_with_input(BenchmarkId::new("doubling", layers), &full, |b, full| {
            b.iter_batched(
                || full.clone(),
                |mut tree| black_box(tree.insert(0)).expect("growth should succeed"),
                criterion::BatchSize::LargeInput,
            );
        });
    }

    for (label, size) in [("small", BATCH_SMALL), ("large", BATCH_LARGE)] {
        group.bench_function(BenchmarkId::new("insert_batch", label), |b| {
            b.iter(|| {
                let mut tree = CBMTree::<u64>::new();
                black_box(tree.insert_batch(0..size)).expect("batch should succeed");
            });
        });
    }

    group.finish();
}

fn iteration_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("cbmtree_iteration");
    let tree = build_tree(BATCH_LARGE);

    group.bench_function("leaves", |b| {
        b.iter(|| black_box(tree.leaves().count()));
    });

    group.bench_function("traverse", |b| {
        b.iter(|| black_box(tree.traverse().count()));
    });

    group.finish();
}

criterion_group!(
    benches,
    single_op_benches,
    growth_benches,
    iteration_benches
);
criterion_main!(benches);
