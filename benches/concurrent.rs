use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, PlotConfiguration};
use moka::sync::Cache as MokaCache;
use rand::Rng;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use ttl_lru_cache::{Expiry, ShardedLruCache};

const THREAD_COUNT: usize = 10;
const OPERATIONS_PER_THREAD: usize = 100_000;
const SHARD_COUNT: usize = 16;

#[derive(Clone)]
struct BenchConfig {
    name: String,
    cache_size: usize,
    key_space: usize,
    write_ratio: usize, // Number of write operations per 10 operations
    ttl: Duration,
}

impl BenchConfig {
    fn new(name: &str, cache_size: usize, key_space: usize, write_ratio: usize, ttl_ms: u64) -> Self {
        Self {
            name: name.to_string(),
            cache_size,
            key_space,
            write_ratio,
            ttl: Duration::from_millis(ttl_ms),
        }
    }
}

// Define different test scenarios
fn get_cache_size_configs() -> Vec<BenchConfig> {
    vec![
        BenchConfig::new("1K", 1_000, 10_000, 5, 60_000),
        BenchConfig::new("10K", 10_000, 10_000, 5, 60_000),
        BenchConfig::new("100K", 100_000, 10_000, 5, 60_000),
    ]
}

fn get_write_ratio_configs() -> Vec<BenchConfig> {
    vec![
        BenchConfig::new("10% writes", 10_000, 20_000, 1, 60_000),
        BenchConfig::new("50% writes", 10_000, 20_000, 5, 60_000),
        BenchConfig::new("80% writes", 10_000, 20_000, 8, 60_000),
    ]
}

// Short TTLs make expired entries the usual eviction victims
fn get_ttl_configs() -> Vec<BenchConfig> {
    vec![
        BenchConfig::new("1ms", 10_000, 20_000, 5, 1),
        BenchConfig::new("10ms", 10_000, 20_000, 5, 10),
        BenchConfig::new("1s", 10_000, 20_000, 5, 1_000),
    ]
}

fn bench_cache(cache_type: CacheType, config: &BenchConfig) -> Duration {
    match cache_type {
        CacheType::TtlLru => {
            let cache = Arc::new(ShardedLruCache::new(SHARD_COUNT, config.cache_size).unwrap());
            // Pre-populate with half of the key space
            for i in 0..config.key_space / 2 {
                cache.set(format!("key_{}", i), i, Expiry::after(config.ttl));
            }

            let start = std::time::Instant::now();
            let mut handles = vec![];

            for _thread_id in 0..THREAD_COUNT {
                let cache = Arc::clone(&cache);
                let config = config.clone();
                handles.push(thread::spawn(move || {
                    let mut rng = rand::thread_rng();
                    for i in 0..OPERATIONS_PER_THREAD {
                        let n = rng.gen_range(0..config.key_space);
                        let key = format!("key_{}", n);
                        if i % 10 < config.write_ratio {
                            // Write operation
                            cache.set(key, n, Expiry::after(config.ttl));
                        } else {
                            // Read operation
                            let _ = cache.get_not_stale(&key);
                        }
                    }
                }));
            }

            for handle in handles {
                handle.join().unwrap();
            }
            start.elapsed()
        }
        CacheType::Moka => {
            let cache: Arc<MokaCache<String, usize>> = Arc::new(
                MokaCache::builder()
                    .max_capacity(config.cache_size as u64)
                    .time_to_live(config.ttl)
                    .build(),
            );
            // Pre-populate with half of the key space
            for i in 0..config.key_space / 2 {
                cache.insert(format!("key_{}", i), i);
            }

            let start = std::time::Instant::now();
            let mut handles = vec![];

            for _thread_id in 0..THREAD_COUNT {
                let cache = Arc::clone(&cache);
                let config = config.clone();
                handles.push(thread::spawn(move || {
                    let mut rng = rand::thread_rng();
                    for i in 0..OPERATIONS_PER_THREAD {
                        let n = rng.gen_range(0..config.key_space);
                        let key = format!("key_{}", n);
                        if i % 10 < config.write_ratio {
                            // Write operation
                            cache.insert(key, n);
                        } else {
                            // Read operation
                            let _ = cache.get(&key);
                        }
                    }
                }));
            }

            for handle in handles {
                handle.join().unwrap();
            }
            start.elapsed()
        }
    }
}

#[derive(Clone, Copy)]
enum CacheType {
    TtlLru,
    Moka,
}

fn run_benchmark_group(c: &mut Criterion, name: &str, configs: Vec<BenchConfig>) {
    let plot_config = PlotConfiguration::default().summary_scale(criterion::AxisScale::Linear);

    let mut group = c.benchmark_group(name);
    group.plot_config(plot_config);
    group.measurement_time(Duration::from_secs(10));
    group.sample_size(10);

    for config in configs.iter() {
        group.bench_with_input(
            BenchmarkId::new("TTL LRU Cache", &config.name),
            config,
            |b, config| {
                b.iter(|| bench_cache(CacheType::TtlLru, config));
            },
        );

        group.bench_with_input(
            BenchmarkId::new("Moka Cache", &config.name),
            config,
            |b, config| {
                b.iter(|| bench_cache(CacheType::Moka, config));
            },
        );
    }
    group.finish();
}

fn concurrent_benchmark(c: &mut Criterion) {
    // Test impact of different cache sizes
    run_benchmark_group(c, "Cache Size Impact", get_cache_size_configs());

    // Test impact of different write ratios
    run_benchmark_group(c, "Write Ratio Impact", get_write_ratio_configs());

    // Test impact of entry lifetime
    run_benchmark_group(c, "TTL Impact", get_ttl_configs());
}

criterion_group!(benches, concurrent_benchmark);
criterion_main!(benches);
