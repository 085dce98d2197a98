//! # End-to-End Scenarios
//!
//! Indexing flows as the poller drives them, run against RocksDB.

#[cfg(test)]
mod tests {
    use fg_block_index::{
        blocks_from_views, BlockIndexApi, BlockIndexStore, BlockView, Bucket, FaultyKVStore,
        KVStoreError, LookupKey, StorageError,
    };
    use tempfile::TempDir;

    use crate::fixtures::{block, blocks, hash_for, open_store};

    #[test]
    fn test_bound_history_across_batches() {
        let dir = TempDir::new().unwrap();
        let store = open_store(dir.path());

        store.insert_blocks(&blocks([5, 7, 6])).unwrap();
        assert_eq!(store.query_earliest_finalized_block().unwrap().height, 5);
        assert_eq!(store.query_latest_finalized_block().unwrap().unwrap().height, 7);

        store.insert_blocks(&blocks([10])).unwrap();
        assert_eq!(store.query_earliest_finalized_block().unwrap().height, 5);
        assert_eq!(store.query_latest_finalized_block().unwrap().unwrap().height, 10);

        // Backfill below the recorded earliest only stores the block.
        store.insert_blocks(&blocks([1])).unwrap();
        assert_eq!(store.query_earliest_finalized_block().unwrap().height, 5);
        assert_eq!(store.query_latest_finalized_block().unwrap().unwrap().height, 10);
        assert_eq!(store.get_block_by_height(1).unwrap(), block(1));
    }

    #[test]
    fn test_empty_store_queries() {
        let dir = TempDir::new().unwrap();
        let store = open_store(dir.path());

        match store.query_earliest_finalized_block() {
            Err(StorageError::NotFound { key: LookupKey::Bound(_) }) => {}
            other => panic!("Expected missing earliest bound, got {:?}", other),
        }
        assert!(store.query_latest_finalized_block().unwrap().is_none());
        assert!(!store.query_is_block_finalized_by_height(0).unwrap());
        assert!(!store.query_is_block_finalized_by_hash(&hash_for(0)).unwrap());
    }

    #[test]
    fn test_unknown_hash_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = open_store(dir.path());
        store.insert_blocks(&blocks(0..5)).unwrap();

        let err = store.get_block_by_hash("0xdeadbeef").unwrap_err();
        assert!(err.is_not_found());
        assert!(!store.query_is_block_finalized_by_hash("0xdeadbeef").unwrap());
    }

    #[test]
    fn test_block_becomes_finalized() {
        let dir = TempDir::new().unwrap();
        let store = open_store(dir.path());

        assert!(!store.query_is_block_finalized_by_height(12).unwrap());
        assert!(!store.query_is_block_finalized_by_hash(&hash_for(12)).unwrap());

        store.insert_blocks(&blocks([12])).unwrap();

        assert!(store.query_is_block_finalized_by_height(12).unwrap());
        assert!(store.query_is_block_finalized_by_hash(&hash_for(12)).unwrap());
    }

    #[test]
    fn test_reorged_height_drops_old_hash() {
        let dir = TempDir::new().unwrap();
        let store = open_store(dir.path());
        store.insert_blocks(&blocks([20])).unwrap();

        let replacement = fg_block_index::Block::new(20, "0xreplacement", 1_718_332_999);
        store.insert_blocks(&[replacement.clone()]).unwrap();

        assert_eq!(store.get_block_by_height(20).unwrap(), replacement);
        assert_eq!(store.get_block_by_hash("0xreplacement").unwrap(), replacement);
        assert!(!store.query_is_block_finalized_by_hash(&hash_for(20)).unwrap());
    }

    #[test]
    fn test_failed_batch_leaves_no_trace() {
        let store = BlockIndexStore::new(FaultyKVStore::new());
        store.create_initial_schema().unwrap();
        store.insert_blocks(&blocks([1, 2])).unwrap();

        // Third write of the next batch: after the first block lands in the stage.
        store.kv_store().fail_on_write(3);
        let err = store.insert_blocks(&blocks([3, 4, 5])).unwrap_err();
        assert!(matches!(err, StorageError::Engine(KVStoreError::Injected { .. })));

        store.kv_store().disarm();
        for height in 3..=5 {
            assert!(!store.query_is_block_finalized_by_height(height).unwrap());
            assert!(!store.query_is_block_finalized_by_hash(&hash_for(height)).unwrap());
        }
        assert_eq!(store.query_latest_finalized_block().unwrap().unwrap().height, 2);
        assert_eq!(store.kv_store().inner().entry_count(Bucket::Blocks), 2);
        assert_eq!(store.kv_store().inner().entry_count(Bucket::BlockHeights), 2);

        // The same batch goes through once the fault is gone.
        store.insert_blocks(&blocks([3, 4, 5])).unwrap();
        assert_eq!(store.query_latest_finalized_block().unwrap().unwrap().height, 5);
    }

    #[test]
    fn test_poller_views_are_indexed() {
        let dir = TempDir::new().unwrap();
        let store = open_store(dir.path());

        let views: Vec<BlockView> = (100..103)
            .map(|h| BlockView {
                block_hash: hash_for(h),
                block_height: h.to_string(),
                block_time: (1_718_332_131 + h).to_string(),
            })
            .collect();

        let converted = blocks_from_views(views).unwrap();
        store.insert_blocks(&converted).unwrap();

        let stored = store.get_block_by_hash(&hash_for(101)).unwrap();
        assert_eq!(stored.height, 101);
        assert_eq!(stored.timestamp, 1_718_332_232);
        assert_eq!(store.query_earliest_finalized_block().unwrap().height, 100);
        assert_eq!(store.query_latest_finalized_block().unwrap().unwrap().height, 102);
    }

    #[test]
    fn test_malformed_view_rejects_whole_page() {
        let views = vec![
            BlockView {
                block_hash: hash_for(1),
                block_height: "1".into(),
                block_time: "1718332131".into(),
            },
            BlockView {
                block_hash: hash_for(2),
                block_height: "two".into(),
                block_time: "1718332132".into(),
            },
        ];

        assert!(matches!(
            blocks_from_views(views),
            Err(StorageError::Encoding { .. })
        ));
    }
}
