use core::hint::black_box;

use criterion::AxisScale;
use criterion::BatchSize;
use criterion::Criterion;
use criterion::PlotConfiguration;
use criterion::Throughput;
use criterion::criterion_group;
use criterion::criterion_main;
use probe_hash::Dict;
use probe_hash::HashMap as ProbeHashMap;
use rand::SeedableRng;
use rand::TryRngCore;
use rand::rngs::OsRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

trait BenchKey: Clone + core::hash::Hash + Eq {
    fn new(key: u64) -> Self;
}

impl BenchKey for u64 {
    fn new(key: u64) -> Self {
        black_box(key)
    }
}

impl BenchKey for String {
    fn new(key: u64) -> Self {
        black_box(format!("key_{:016X}", key))
    }
}

const SIZES: &[usize] = &[(1 << 10), (1 << 12), (1 << 14), (1 << 16)];

fn random_keys<K: BenchKey>(count: usize) -> Vec<K> {
    let mut rng = OsRng;
    (0..count)
        .map(|_| K::new(rng.try_next_u64().unwrap()))
        .collect()
}

fn sequential_keys<K: BenchKey>(count: usize) -> Vec<K> {
    (0..count as u64).map(K::new).collect()
}

fn bench_insert<K: BenchKey>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("insert_{}", core::any::type_name::<K>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES {
        let keys = random_keys::<K>(*size);
        group.throughput(Throughput::Elements(*size as u64));

        group.bench_function("probe_map", |b| {
            b.iter_batched(
                || keys.clone(),
                |keys| {
                    let mut map: ProbeHashMap<_, _> = ProbeHashMap::new();
                    for (i, key) in keys.into_iter().enumerate() {
                        black_box(map.insert(key, i as u64));
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function("dict", |b| {
            b.iter_batched(
                || keys.clone(),
                |keys| {
                    let mut dict: Dict<_, _> = Dict::new();
                    for (i, key) in keys.into_iter().enumerate() {
                        black_box(dict.insert(key, i as u64));
                    }
                    black_box(dict)
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function("hashbrown", |b| {
            b.iter_batched(
                || keys.clone(),
                |keys| {
                    let mut map = hashbrown::HashMap::new();
                    for (i, key) in keys.into_iter().enumerate() {
                        black_box(map.insert(key, i as u64));
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_insert_preallocated<K: BenchKey>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!(
        "insert_preallocated_{}",
        core::any::type_name::<K>()
    ));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES {
        let keys = random_keys::<K>(*size);
        group.throughput(Throughput::Elements(*size as u64));

        group.bench_function("probe_map", |b| {
            b.iter_batched(
                || keys.clone(),
                |keys| {
                    let mut map: ProbeHashMap<_, _> = ProbeHashMap::with_capacity(keys.len());
                    for (i, key) in keys.into_iter().enumerate() {
                        black_box(map.insert(key, i as u64));
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function("dict", |b| {
            b.iter_batched(
                || keys.clone(),
                |keys| {
                    let capacity = keys.len() * 2;
                    let mut dict: Dict<_, _> = Dict::with_capacity(capacity);
                    for (i, key) in keys.into_iter().enumerate() {
                        black_box(dict.insert(key, i as u64));
                    }
                    black_box(dict)
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function("hashbrown", |b| {
            b.iter_batched(
                || keys.clone(),
                |keys| {
                    let mut map = hashbrown::HashMap::with_capacity(keys.len());
                    for (i, key) in keys.into_iter().enumerate() {
                        black_box(map.insert(key, i as u64));
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_lookup_hit<K: BenchKey>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("lookup_hit_{}", core::any::type_name::<K>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES {
        // Even keys populate the containers; the full even set is probed.
        let keys: Vec<K> = (0..*size as u64 * 2).step_by(2).map(K::new).collect();

        let mut probe_map: ProbeHashMap<_, _> = ProbeHashMap::new();
        let mut dict: Dict<_, _> = Dict::new();
        let mut brown = hashbrown::HashMap::new();
        for (i, key) in keys.iter().cloned().enumerate() {
            probe_map.insert(key.clone(), i as u64);
            dict.insert(key.clone(), i as u64);
            brown.insert(key, i as u64);
        }

        group.throughput(Throughput::Elements(*size as u64));

        group.bench_function("probe_map", |b| {
            b.iter_batched(
                || {
                    let mut keys = keys.clone();
                    keys.shuffle(&mut SmallRng::from_os_rng());
                    keys
                },
                |keys| {
                    for key in &keys {
                        black_box(probe_map.get(key));
                    }
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function("dict", |b| {
            b.iter_batched(
                || {
                    let mut keys = keys.clone();
                    keys.shuffle(&mut SmallRng::from_os_rng());
                    keys
                },
                |keys| {
                    for key in &keys {
                        black_box(dict.get(key));
                    }
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function("hashbrown", |b| {
            b.iter_batched(
                || {
                    let mut keys = keys.clone();
                    keys.shuffle(&mut SmallRng::from_os_rng());
                    keys
                },
                |keys| {
                    for key in &keys {
                        black_box(brown.get(key));
                    }
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_lookup_miss<K: BenchKey>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("lookup_miss_{}", core::any::type_name::<K>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES {
        let keys: Vec<K> = (0..*size as u64 * 2).step_by(2).map(K::new).collect();
        let misses: Vec<K> = (1..*size as u64 * 2).step_by(2).map(K::new).collect();

        let mut probe_map: ProbeHashMap<_, _> = ProbeHashMap::new();
        let mut dict: Dict<_, _> = Dict::new();
        let mut brown = hashbrown::HashMap::new();
        for (i, key) in keys.into_iter().enumerate() {
            probe_map.insert(key.clone(), i as u64);
            dict.insert(key.clone(), i as u64);
            brown.insert(key, i as u64);
        }

        group.throughput(Throughput::Elements(*size as u64));

        group.bench_function("probe_map", |b| {
            b.iter(|| {
                for key in &misses {
                    black_box(probe_map.get(key));
                }
            })
        });

        group.bench_function("dict", |b| {
            b.iter(|| {
                for key in &misses {
                    black_box(dict.get(key));
                }
            })
        });

        group.bench_function("hashbrown", |b| {
            b.iter(|| {
                for key in &misses {
                    black_box(brown.get(key));
                }
            })
        });
    }

    group.finish();
}

fn bench_remove<K: BenchKey>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("remove_{}", core::any::type_name::<K>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES {
        let keys = sequential_keys::<K>(*size);
        group.throughput(Throughput::Elements(*size as u64));

        group.bench_function("probe_map", |b| {
            b.iter_batched(
                || {
                    let mut map: ProbeHashMap<_, _> = ProbeHashMap::new();
                    for (i, key) in keys.iter().cloned().enumerate() {
                        map.insert(key, i as u64);
                    }
                    let mut keys = keys.clone();
                    keys.shuffle(&mut SmallRng::from_os_rng());
                    (map, keys)
                },
                |(mut map, keys)| {
                    for key in &keys {
                        black_box(map.remove(key));
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function("dict", |b| {
            b.iter_batched(
                || {
                    let mut dict: Dict<_, _> = Dict::new();
                    for (i, key) in keys.iter().cloned().enumerate() {
                        dict.insert(key, i as u64);
                    }
                    let mut keys = keys.clone();
                    keys.shuffle(&mut SmallRng::from_os_rng());
                    (dict, keys)
                },
                |(mut dict, keys)| {
                    for key in &keys {
                        black_box(dict.remove(key));
                    }
                    black_box(dict)
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function("hashbrown", |b| {
            b.iter_batched(
                || {
                    let mut map = hashbrown::HashMap::new();
                    for (i, key) in keys.iter().cloned().enumerate() {
                        map.insert(key, i as u64);
                    }
                    let mut keys = keys.clone();
                    keys.shuffle(&mut SmallRng::from_os_rng());
                    (map, keys)
                },
                |(mut map, keys)| {
                    for key in &keys {
                        black_box(map.remove(key));
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_churn<K: BenchKey>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("churn_{}", core::any::type_name::<K>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES {
        // Each key appears twice; the second occurrence removes it again.
        let keys: Vec<K> = sequential_keys::<K>(*size)
            .into_iter()
            .flat_map(|key| [key.clone(), key])
            .collect();

        group.throughput(Throughput::Elements(*size as u64 * 2));

        group.bench_function("probe_map", |b| {
            b.iter_batched(
                || {
                    let mut keys = keys.clone();
                    keys.shuffle(&mut SmallRng::from_os_rng());
                    keys
                },
                |keys| {
                    let mut map: ProbeHashMap<_, _> = ProbeHashMap::new();
                    for key in keys {
                        if map.contains_key(&key) {
                            black_box(map.remove(&key));
                        } else {
                            black_box(map.insert(key, 0u64));
                        }
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function("dict", |b| {
            b.iter_batched(
                || {
                    let mut keys = keys.clone();
                    keys.shuffle(&mut SmallRng::from_os_rng());
                    keys
                },
                |keys| {
                    let mut dict: Dict<_, _> = Dict::new();
                    for key in keys {
                        if dict.contains_key(&key) {
                            black_box(dict.remove(&key));
                        } else {
                            black_box(dict.insert(key, 0u64));
                        }
                    }
                    black_box(dict)
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function("hashbrown", |b| {
            b.iter_batched(
                || {
                    let mut keys = keys.clone();
                    keys.shuffle(&mut SmallRng::from_os_rng());
                    keys
                },
                |keys| {
                    let mut map = hashbrown::HashMap::new();
                    for key in keys {
                        if map.contains_key(&key) {
                            black_box(map.remove(&key));
                        } else {
                            black_box(map.insert(key, 0u64));
                        }
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_insert::<u64>,
    bench_insert::<String>,
    bench_insert_preallocated::<u64>,
    bench_insert_preallocated::<String>,
    bench_lookup_hit::<u64>,
    bench_lookup_hit::<String>,
    bench_lookup_miss::<u64>,
    bench_lookup_miss::<String>,
    bench_remove::<u64>,
    bench_remove::<String>,
    bench_churn::<u64>,
    bench_churn::<String>,
);

criterion_main!(benches);
