use std::collections::BTreeMap;
use std::hint::black_box;
use std::time::{Duration, Instant};

use bench::{
    apply_medium_runtime_config, apply_small_runtime_config, default_rng, missing_keys,
    shuffled_keys,
};
use criterion::measurement::Measurement;
use criterion::{BenchmarkGroup, BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::Rng;
use rand::seq::SliceRandom;
use rbtree::{NodeArena, NodeId, RbMap, RbNode, RbRoot};

const SIZES: [usize; 4] = [1_000, 16_000, 64_000, 256_000];
const KEY_STRIDE: u64 = 4;
const LOOKUPS_PER_ITER: usize = 1_000;

struct Record {
    key: u64,
    rb: RbNode,
}

struct Records(Vec<Record>);

impl NodeArena for Records {
    fn node(&self, id: NodeId) -> &RbNode {
        &self.0[id.index()].rb
    }
}

impl Records {
    fn new(keys: &[u64]) -> Self {
        Self(
            keys.iter()
                .map(|&key| Record {
                    key,
                    rb: RbNode::new(),
                })
                .collect(),
        )
    }

    fn key(&self, id: NodeId) -> u64 {
        self.0[id.index()].key
    }

    fn fill(&self, root: &RbRoot) {
        for (i, rec) in self.0.iter().enumerate() {
            let key = rec.key;
            let res = root.insert_by(self, NodeId::new(i), |p| self.key(p).cmp(&key));
            debug_assert!(res.is_ok());
        }
    }
}

fn bench_insert<T: Measurement<Value = Duration>>(group: &mut BenchmarkGroup<'_, T>) {
    let mut rng = default_rng();
    for &size in &SIZES {
        apply_small_runtime_config(group);
        let keys = shuffled_keys(&mut rng, size, KEY_STRIDE);
        group.bench_function(BenchmarkId::new("insert", size), |bencher| {
            bencher.iter_custom(|iters| {
                let mut total = Duration::ZERO;
                for _ in 0..iters {
                    let records = Records::new(&keys);
                    let root = RbRoot::new();
                    let start = Instant::now();
                    records.fill(&root);
                    total += start.elapsed();
                    black_box(root.top());
                }
                total
            })
        });
    }
}

fn bench_erase<T: Measurement<Value = Duration>>(group: &mut BenchmarkGroup<'_, T>) {
    let mut rng = default_rng();
    for &size in &SIZES {
        apply_small_runtime_config(group);
        let keys = shuffled_keys(&mut rng, size, KEY_STRIDE);
        let mut order = (0..size).collect::<Vec<_>>();
        order.shuffle(&mut rng);
        group.bench_function(BenchmarkId::new("erase", size), |bencher| {
            bencher.iter_custom(|iters| {
                let mut total = Duration::ZERO;
                for _ in 0..iters {
                    let records = Records::new(&keys);
                    let root = RbRoot::new();
                    records.fill(&root);
                    let start = Instant::now();
                    for &i in &order {
                        root.erase(&records, NodeId::new(i));
                    }
                    total += start.elapsed();
                    black_box(root.is_empty());
                }
                total
            })
        });
    }
}

fn bench_read<T: Measurement<Value = Duration>>(group: &mut BenchmarkGroup<'_, T>) {
    let mut rng = default_rng();
    for &size in &SIZES {
        apply_medium_runtime_config(group);
        let keys = shuffled_keys(&mut rng, size, KEY_STRIDE);
        let records = Records::new(&keys);
        let root = RbRoot::new();
        records.fill(&root);

        let hits = (0..LOOKUPS_PER_ITER)
            .map(|_| keys[rng.random_range(0..size)])
            .collect::<Vec<_>>();
        let misses = missing_keys(&mut rng, LOOKUPS_PER_ITER, KEY_STRIDE);

        group.bench_function(BenchmarkId::new("find_hit", size), |bencher| {
            bencher.iter(|| {
                for &key in &hits {
                    black_box(root.find_by(&records, |p| records.key(p).cmp(&key)));
                }
            })
        });
        group.bench_function(BenchmarkId::new("find_miss", size), |bencher| {
            bencher.iter(|| {
                for &key in &misses {
                    black_box(root.find_by(&records, |p| records.key(p).cmp(&key)));
                }
            })
        });
        group.bench_function(BenchmarkId::new("iterate", size), |bencher| {
            bencher.iter(|| black_box(root.iter(&records).count()))
        });
    }
}

fn bench_map<T: Measurement<Value = Duration>>(group: &mut BenchmarkGroup<'_, T>) {
    let mut rng = default_rng();
    for &size in &SIZES {
        apply_small_runtime_config(group);
        let keys = shuffled_keys(&mut rng, size, KEY_STRIDE);
        let probes = (0..LOOKUPS_PER_ITER)
            .map(|_| rng.random_range(0..size as u64 * KEY_STRIDE))
            .collect::<Vec<_>>();

        group.bench_function(BenchmarkId::new("rb_map", size), |bencher| {
            bencher.iter(|| {
                let mut map = keys.iter().map(|&k| (k, k)).collect::<RbMap<_, _>>();
                for &key in &probes {
                    black_box(map.lower_bound(&key));
                    black_box(map.remove(&key));
                }
                black_box(map.len())
            })
        });
        group.bench_function(BenchmarkId::new("std_btree_map", size), |bencher| {
            bencher.iter(|| {
                let mut map = keys.iter().map(|&k| (k, k)).collect::<BTreeMap<_, _>>();
                for &key in &probes {
                    black_box(map.range(key..).next());
                    black_box(map.remove(&key));
                }
                black_box(map.len())
            })
        });
    }
}

fn bench(c: &mut Criterion) {
    let mut update = c.benchmark_group("rbtree/update");
    bench_insert(&mut update);
    bench_erase(&mut update);
    update.finish();

    let mut read = c.benchmark_group("rbtree/read");
    bench_read(&mut read);
    read.finish();

    let mut map = c.benchmark_group("rbtree/map");
    bench_map(&mut map);
    map.finish();
}

criterion_group!(benches, bench);
criterion_main!(benches);
