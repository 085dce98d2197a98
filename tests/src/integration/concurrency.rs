//! # Concurrency
//!
//! - One open handle per directory, with a bounded wait
//! - Readers running next to a writer only ever see whole batches

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::{Duration, Instant};

    use fg_block_index::{
        BlockIndexApi, BlockIndexStore, KVStoreError, LockError, StorageError, StoreConfig,
    };
    use parking_lot::Mutex;
    use tempfile::TempDir;

    use crate::fixtures::{blocks, hash_for, open_store};

    const BATCH: u64 = 10;
    const BATCHES: u64 = 50;

    #[test]
    fn test_second_open_fails_after_timeout() {
        let dir = TempDir::new().unwrap();
        let _first = open_store(dir.path());

        let timeout = Duration::from_millis(150);
        let config = StoreConfig::for_testing(dir.path()).with_open_timeout(timeout);

        let started = Instant::now();
        let result = BlockIndexStore::open(config);
        assert!(started.elapsed() >= timeout);

        match result {
            Err(StorageError::Engine(KVStoreError::Lock(LockError::AlreadyLocked { .. }))) => {}
            Err(other) => panic!("Expected lock error, got {:?}", other),
            Ok(_) => panic!("Second open of a held directory succeeded"),
        }
    }

    #[test]
    fn test_waiting_open_succeeds_once_holder_closes() {
        let dir = TempDir::new().unwrap();
        let first = open_store(dir.path());
        first.insert_blocks(&blocks([1])).unwrap();

        let path = dir.path().to_path_buf();
        let waiter = thread::spawn(move || {
            let config =
                StoreConfig::for_testing(&path).with_open_timeout(Duration::from_secs(10));
            BlockIndexStore::open(config)
        });

        thread::sleep(Duration::from_millis(100));
        first.close().unwrap();

        let second = waiter.join().unwrap().expect("open after release");
        assert!(second.query_is_block_finalized_by_height(1).unwrap());
    }

    #[test]
    fn test_readers_only_observe_whole_batches() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(open_store(dir.path()));
        let done = Arc::new(AtomicBool::new(false));
        let observed = Arc::new(Mutex::new(Vec::new()));

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                let done = Arc::clone(&done);
                let observed = Arc::clone(&observed);
                thread::spawn(move || {
                    while !done.load(Ordering::Acquire) {
                        let Some(latest) = store.query_latest_finalized_block().unwrap() else {
                            continue;
                        };
                        // `latest` commits with its batch, so the whole batch is visible.
                        let batch_start = latest.height - latest.height % BATCH;
                        for height in batch_start..=latest.height {
                            assert!(
                                store.query_is_block_finalized_by_height(height).unwrap(),
                                "height {} missing while latest is {}",
                                height,
                                latest.height
                            );
                            assert!(store.query_is_block_finalized_by_hash(&hash_for(height)).unwrap());
                        }
                        observed.lock().push(latest.height);
                    }
                })
            })
            .collect();

        for batch in 0..BATCHES {
            let start = batch * BATCH;
            // Reverse order inside the batch: the maximum is staged first.
            store
                .insert_blocks(&blocks((start..start + BATCH).rev()))
                .unwrap();
        }
        done.store(true, Ordering::Release);

        for reader in readers {
            reader.join().unwrap();
        }

        // Readers never see `latest` move backwards.
        let observed = observed.lock();
        assert!(!observed.is_empty());
        let max_seen = observed.iter().copied().max().unwrap();
        assert!(max_seen <= BATCH * BATCHES - 1);
        assert_eq!(
            store.query_latest_finalized_block().unwrap().map(|b| b.height),
            Some(BATCH * BATCHES - 1)
        );
        assert_eq!(store.query_earliest_finalized_block().unwrap().height, 0);
    }

    #[test]
    fn test_concurrent_writers_are_serialized() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(open_store(dir.path()));

        let writers: Vec<_> = (0..4u64)
            .map(|w| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for batch in 0..10u64 {
                        let start = (w * 10 + batch) * BATCH;
                        store.insert_blocks(&blocks(start..start + BATCH)).unwrap();
                    }
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }

        let total = 4 * 10 * BATCH;
        for height in 0..total {
            assert_eq!(store.get_block_by_hash(&hash_for(height)).unwrap().height, height);
        }
        assert_eq!(
            store.query_latest_finalized_block().unwrap().map(|b| b.height),
            Some(total - 1)
        );
    }
}
