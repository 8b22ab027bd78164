//! Throughput of puts and gets through the shard actors

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hashcache::{Cache, CacheConfig, HashType};
use tokio::runtime::Runtime;

fn setup_runtime() -> Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .unwrap()
}

fn bench_put_get(c: &mut Criterion) {
    let rt = setup_runtime();
    let mut group = c.benchmark_group("put_get");

    for hash_type in [HashType::Sha256, HashType::Sha512] {
        let cache: Cache<Vec<u8>> = {
            let _guard = rt.enter();
            let config = CacheConfig::builder()
                .with_hash_type(hash_type)
                .build()
                .unwrap();
            Cache::new(config).unwrap()
        };

        group.bench_function(BenchmarkId::new("put", hash_type), |b| {
            let mut i = 0u64;
            b.to_async(&rt).iter(|| {
                i += 1;
                let cache = cache.clone();
                let key = i;
                async move { cache.put(&key, vec![0u8; 128]).await.unwrap() }
            });
        });

        group.bench_function(BenchmarkId::new("get", hash_type), |b| {
            rt.block_on(cache.put("hot", vec![1u8; 128])).unwrap();
            b.to_async(&rt).iter(|| {
                let cache = cache.clone();
                async move { black_box(cache.get("hot").await.unwrap()) }
            });
        });

        rt.block_on(cache.shutdown());
    }

    group.finish();
}

fn bench_concurrent_gets(c: &mut Criterion) {
    let rt = setup_runtime();
    let cache: Cache<u64> = {
        let _guard = rt.enter();
        Cache::new(CacheConfig::default()).unwrap()
    };
    rt.block_on(async {
        for i in 0..1024u64 {
            cache.put(&i, i).await.unwrap();
        }
    });

    c.bench_function("concurrent_gets_64", |b| {
        b.to_async(&rt).iter(|| {
            let cache = cache.clone();
            async move {
                let mut handles = Vec::with_capacity(64);
                for i in 0..64u64 {
                    let cache = cache.clone();
                    handles.push(tokio::spawn(async move { cache.get(&(i * 16)).await }));
                }
                for handle in handles {
                    black_box(handle.await.unwrap().unwrap());
                }
            }
        });
    });

    rt.block_on(cache.shutdown());
}

criterion_group!(benches, bench_put_get, bench_concurrent_gets);
criterion_main!(benches);
