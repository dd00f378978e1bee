use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use model_sieve::data::AttributeManager;
use model_sieve::model::{BRep, ComponentModel, ModelBuilder};

fn manager(n: usize) -> AttributeManager {
    let mut manager = AttributeManager::with_elements(n);
    let dense = manager.find_or_create_attribute_variable("dense", 0.0f64).unwrap();
    for i in 0..n {
        dense.set_value(i, i as f64).unwrap();
    }
    let sparse = manager.find_or_create_attribute_sparse("sparse", 0u32).unwrap();
    for i in (0..n).step_by(16) {
        sparse.set_value(i, i as u32).unwrap();
    }
    manager
        .find_or_create_attribute_constant("flag", true)
        .unwrap();
    manager
}

fn bench_attribute_manager(c: &mut Criterion) {
    let mut group = c.benchmark_group("attribute_manager");

    for &n in &[1_000usize, 100_000usize] {
        let base = manager(n);
        let every_third: Vec<bool> = (0..n).map(|i| i % 3 == 0).collect();
        let reversed: Vec<usize> = (0..n).rev().collect();

        group.bench_with_input(BenchmarkId::new("delete_elements", n), &n, |b, _| {
            b.iter(|| {
                let mut m = base.clone();
                m.delete_elements(black_box(&every_third)).unwrap();
                black_box(m.nb_elements())
            })
        });

        group.bench_with_input(BenchmarkId::new("permute_elements", n), &n, |b, _| {
            b.iter(|| {
                let mut m = base.clone();
                m.permute_elements(black_box(&reversed)).unwrap();
                black_box(m.nb_elements())
            })
        });

        group.bench_with_input(BenchmarkId::new("sparse_scan", n), &n, |b, _| {
            let sparse = base.find_attribute::<u32>("sparse").unwrap();
            b.iter(|| {
                let mut sum = 0u64;
                for i in 0..n {
                    sum += u64::from(*sparse.value(black_box(i)).unwrap());
                }
                black_box(sum)
            })
        });
    }

    group.finish();
}

fn bench_relationship_ranges(c: &mut Criterion) {
    let mut group = c.benchmark_group("relationships");

    for &n in &[100usize, 1_000usize] {
        let mut brep = BRep::new();
        let mut builder = brep.builder();
        let surface = builder.add_surface();
        for _ in 0..n {
            let line = builder.add_line();
            builder
                .add_line_surface_boundary_relationship(line, surface)
                .unwrap();
        }

        group.bench_with_input(BenchmarkId::new("boundary_lines", n), &n, |b, _| {
            b.iter(|| black_box(brep.boundary_lines(surface).unwrap().count()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_attribute_manager, bench_relationship_ranges);
criterion_main!(benches);
