//! Concurrent writers and readers across all shards

use hashcache::{Cache, CacheConfig, CacheError};
use rand::Rng;
use std::sync::Arc;
use tokio::task::JoinSet;

const TESTERS: usize = 10;
const ITEMS_PER_TESTER: usize = 200;
const READS_PER_ITEM: usize = 20;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn random_entries(count: usize) -> Vec<(Vec<u8>, Vec<u8>)> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| {
            let mut key = vec![0u8; 64];
            rng.fill(&mut key[..]);
            let mut value = vec![0u8; rng.gen_range(1..=1024)];
            rng.fill(&mut value[..]);
            (key, value)
        })
        .collect()
}

/// Write distinct keys, then read every key back concurrently
async fn tester(id: usize, cache: Cache<Vec<u8>>) -> Result<(), String> {
    let entries = Arc::new(random_entries(ITEMS_PER_TESTER));

    for (key, value) in entries.iter() {
        cache
            .put(key, value.clone())
            .await
            .map_err(|e| format!("tester {id}: put failed: {e}"))?;
    }

    let mut reads = JoinSet::new();
    for index in 0..entries.len() {
        for attempt in 0..READS_PER_ITEM {
            let cache = cache.clone();
            let entries = Arc::clone(&entries);
            reads.spawn(async move {
                let (key, expected) = &entries[index];
                match cache.get(key).await {
                    Ok(value) if &value == expected => Ok(()),
                    Ok(_) => Err(format!(
                        "tester {id}: after {attempt} reads, key[{index}] had value mismatch"
                    )),
                    Err(e) => Err(format!(
                        "tester {id}: after {attempt} reads, key[{index}] had error: {e}"
                    )),
                }
            });
        }
    }

    while let Some(outcome) = reads.join_next().await {
        outcome.map_err(|e| format!("tester {id}: read task failed: {e}"))??;
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_readers_see_last_write() {
    init_tracing();
    let config = CacheConfig::builder()
        .with_buffer_size(10_000)
        .build()
        .unwrap();
    let cache: Cache<Vec<u8>> = Cache::new(config).unwrap();

    let mut testers = JoinSet::new();
    for id in 0..TESTERS {
        testers.spawn(tester(id, cache.clone()));
    }

    while let Some(outcome) = testers.join_next().await {
        if let Err(e) = outcome.unwrap() {
            panic!("{e}");
        }
    }

    assert_eq!(cache.len().await.unwrap(), TESTERS * ITEMS_PER_TESTER);

    let stats = cache.stats();
    assert_eq!(stats.writes, (TESTERS * ITEMS_PER_TESTER) as u64);
    assert_eq!(
        stats.hits,
        (TESTERS * ITEMS_PER_TESTER * READS_PER_ITEM) as u64
    );
    assert_eq!(stats.misses, 0);

    cache.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_teardown_under_load_never_hangs() {
    init_tracing();
    let config = CacheConfig::builder().with_buffer_size(4).build().unwrap();
    let cache: Cache<u64> = Cache::new(config).unwrap();

    let mut writers = JoinSet::new();
    for writer in 0..8u64 {
        let cache = cache.clone();
        writers.spawn(async move {
            for i in 0..10_000u64 {
                match cache.put(&(writer, i), i).await {
                    Ok(()) => {}
                    Err(CacheError::CacheInvalidated) => return true,
                    Err(e) => panic!("unexpected error: {e}"),
                }
            }
            false
        });
    }

    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    cache.delete();

    let finished = tokio::time::timeout(std::time::Duration::from_secs(10), async {
        while let Some(outcome) = writers.join_next().await {
            outcome.unwrap();
        }
    })
    .await;
    assert!(finished.is_ok(), "writers hung after teardown");

    assert!(cache.get(&(0u64, 0u64)).await.unwrap_err().is_invalidated());
    cache.shutdown().await;
}
