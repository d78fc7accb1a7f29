use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use kd_index::kdtree::{KDTree, KDTreeIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rstar::RTree;

fn generate_points(n: usize, rng: &mut StdRng) -> Vec<[f64; 2]> {
    (0..n)
        .map(|_| [rng.gen_range(-180.0..180.0), rng.gen_range(-90.0..90.0)])
        .collect()
}

fn construct_kdtree(points: &[[f64; 2]]) -> KDTree<f64> {
    KDTree::build(2, points).unwrap()
}

fn construct_rstar(points: Vec<[f64; 2]>) -> RTree<[f64; 2]> {
    RTree::bulk_load(points)
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let points = generate_points(100_000, &mut rng);
    let queries = generate_points(1_000, &mut rng);

    c.bench_function("construction (kd-index)", |b| {
        b.iter(|| construct_kdtree(&points))
    });

    c.bench_function("construction (rstar bulk)", |b| {
        b.iter(|| construct_rstar(points.to_vec()))
    });

    let kdtree = construct_kdtree(&points);
    let rstar_tree = construct_rstar(points.to_vec());

    c.bench_function("nearest (kd-index)", |b| {
        b.iter(|| {
            for query in queries.iter() {
                kdtree.nearest(query).unwrap();
            }
        })
    });

    c.bench_function("nearest (rstar)", |b| {
        b.iter(|| {
            for query in queries.iter() {
                rstar_tree.nearest_neighbor(query);
            }
        })
    });

    let mut group = c.benchmark_group("k-nearest");
    for k in [1, 10, 100] {
        group.bench_with_input(BenchmarkId::new("kd-index", k), &k, |b, &k| {
            b.iter(|| {
                for query in queries.iter() {
                    kdtree.k_nearest(query, k).unwrap();
                }
            })
        });
        group.bench_with_input(BenchmarkId::new("rstar", k), &k, |b, &k| {
            b.iter(|| {
                for query in queries.iter() {
                    rstar_tree.nearest_neighbor_iter(query).take(k).count();
                }
            })
        });
    }
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
