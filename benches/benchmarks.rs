//! Performance benchmarks for orchard

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use orchard::test_utils::TestTree;
use orchard::tree::DEFAULT_EXCLUDED_PATHS;
use orchard::{
    CancellationToken, ColorEncoder, ColorEncoding, DiagramConfig, LayoutEngine, PathFilter,
    TreeBuilder, WalkerConfig, generate,
};
use std::collections::BTreeMap;

fn create_tree(dirs: usize, files_per_dir: usize, depth: usize) -> TestTree {
    let tree = TestTree::new();
    tree.populate(dirs, files_per_dir, depth);
    tree
}

fn bench_path_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("path_filter");

    let excluded: Vec<String> = DEFAULT_EXCLUDED_PATHS.iter().map(|s| s.to_string()).collect();
    let globs = vec!["**/*.test.js".to_string(), "*.{png,jpg,gif}".to_string()];
    let filter = PathFilter::new(&excluded, &globs).unwrap();

    group.bench_function("compile", |b| {
        b.iter(|| PathFilter::new(black_box(&excluded), black_box(&globs)))
    });
    group.bench_function("kept_path", |b| {
        b.iter(|| filter.should_exclude(black_box("src/components/button/index.tsx")))
    });
    group.bench_function("excluded_component", |b| {
        b.iter(|| filter.should_exclude(black_box("packages/web/node_modules/react")))
    });
    group.bench_function("excluded_glob", |b| {
        b.iter(|| filter.should_exclude(black_box("src/app/app.test.js")))
    });

    group.finish();
}

fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan");

    // ~100 files
    let small = create_tree(5, 10, 2);
    group.bench_function("small_tree_100_files", |b| {
        b.iter(|| {
            TreeBuilder::new(PathFilter::allow_all())
                .build(black_box(small.path()))
                .unwrap()
        })
    });

    // ~1000 files
    let large = create_tree(10, 20, 5);
    group.bench_function("large_tree_1000_files", |b| {
        b.iter(|| {
            TreeBuilder::new(PathFilter::allow_all())
                .build(black_box(large.path()))
                .unwrap()
        })
    });
    group.bench_function("large_tree_1000_files_sequential", |b| {
        b.iter(|| {
            TreeBuilder::new(PathFilter::allow_all())
                .with_workers(1)
                .build(black_box(large.path()))
                .unwrap()
        })
    });

    group.finish();
}

fn bench_layout_and_color(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");

    let large = create_tree(10, 20, 5);
    let scanned = TreeBuilder::new(PathFilter::allow_all())
        .build(large.path())
        .unwrap()
        .root;

    group.bench_function("squarify_1000_files", |b| {
        b.iter(|| {
            let mut tree = scanned.clone();
            LayoutEngine::new(1000.0, 1000.0).layout(black_box(&mut tree));
            tree
        })
    });

    let custom = BTreeMap::new();
    let encoder = ColorEncoder::new(ColorEncoding::Extension, &custom);
    group.bench_function("color_1000_files", |b| {
        b.iter(|| {
            let mut tree = scanned.clone();
            encoder.apply(black_box(&mut tree))
        })
    });

    group.finish();
}

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");

    let medium = create_tree(8, 12, 3);
    let config = DiagramConfig {
        walker: WalkerConfig::unfiltered(),
        ..DiagramConfig::new(medium.path())
    };
    group.bench_function("medium_tree_svg", |b| {
        b.iter(|| generate(black_box(&config), &CancellationToken::new()).unwrap())
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_path_filter,
    bench_scan,
    bench_layout_and_color,
    bench_generate,
);
criterion_main!(benches);
