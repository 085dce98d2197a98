//! # Persistence Across Reopen
//!
//! Everything the store reports must come back unchanged after `close` and
//! a fresh `open` of the same directory.

#[cfg(test)]
mod tests {
    use fg_block_index::{
        BlockIndexApi, BlockIndexStore, KVStoreError, StorageError, StoreConfig,
    };
    use serde_json::json;
    use tempfile::TempDir;

    use crate::fixtures::{block, blocks, hash_for, open_store};

    #[test]
    fn test_blocks_round_trip_across_reopen() {
        let dir = TempDir::new().unwrap();
        let inserted = blocks([3, 1, 2, 4]);
        {
            let store = open_store(dir.path());
            store.insert_blocks(&inserted).unwrap();
            store.close().unwrap();
        }

        let store = open_store(dir.path());
        for expected in &inserted {
            assert_eq!(&store.get_block_by_height(expected.height).unwrap(), expected);
            assert_eq!(&store.get_block_by_hash(&expected.hash).unwrap(), expected);
        }
    }

    #[test]
    fn test_nested_metadata_round_trip_across_reopen() {
        let dir = TempDir::new().unwrap();
        let rich = block(42).with_extra(
            "checkpoint",
            json!({
                "btc_height": 840_000u64,
                "signers": ["fp1", "fp2"],
                "quorum": { "for": 67, "total": 100 }
            }),
        );
        {
            let store = open_store(dir.path());
            store.insert_blocks(&[rich.clone()]).unwrap();
            store.close().unwrap();
        }

        let store = open_store(dir.path());
        let loaded = store.get_block_by_hash(&hash_for(42)).unwrap();
        assert_eq!(loaded, rich);
        assert_eq!(loaded.extra["checkpoint"]["quorum"]["for"], json!(67));
    }

    #[test]
    fn test_activated_timestamp_survives_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let store = open_store(dir.path());
            assert!(matches!(
                store.get_activated_timestamp(),
                Err(StorageError::ActivatedTimestampNotFound)
            ));
            store.save_activated_timestamp(1_718_332_131).unwrap();
            store.close().unwrap();
        }

        let store = open_store(dir.path());
        assert_eq!(store.get_activated_timestamp().unwrap(), 1_718_332_131);
    }

    #[test]
    fn test_bounds_survive_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let store = open_store(dir.path());
            store.insert_blocks(&blocks([5, 7, 6])).unwrap();
            store.insert_blocks(&blocks([10])).unwrap();
            store.close().unwrap();
        }

        let store = open_store(dir.path());
        assert_eq!(store.query_earliest_finalized_block().unwrap().height, 5);
        assert_eq!(
            store.query_latest_finalized_block().unwrap().map(|b| b.height),
            Some(10)
        );

        // First-batch-wins holds across restarts too.
        store.insert_blocks(&blocks([2])).unwrap();
        assert_eq!(store.query_earliest_finalized_block().unwrap().height, 5);
    }

    #[test]
    fn test_schema_creation_never_destroys_data() {
        let dir = TempDir::new().unwrap();
        {
            let store = open_store(dir.path());
            store.insert_blocks(&blocks([1])).unwrap();
            store.create_initial_schema().unwrap();
            store.close().unwrap();
        }

        // open_store creates the schema again on an existing database.
        let store = open_store(dir.path());
        store.create_initial_schema().unwrap();
        assert!(store.query_is_block_finalized_by_height(1).unwrap());
    }

    #[test]
    fn test_fresh_directory_requires_schema() {
        let dir = TempDir::new().unwrap();
        let store = BlockIndexStore::open(StoreConfig::for_testing(dir.path())).unwrap();

        assert!(matches!(
            store.query_latest_finalized_block(),
            Err(StorageError::Engine(KVStoreError::MissingRegion { .. }))
        ));

        store.create_initial_schema().unwrap();
        assert!(store.query_latest_finalized_block().unwrap().is_none());
    }

    #[test]
    fn test_drop_releases_directory() {
        let dir = TempDir::new().unwrap();
        {
            let store = open_store(dir.path());
            store.insert_blocks(&blocks([8])).unwrap();
            // Dropped without close.
        }

        let store = open_store(dir.path());
        assert!(store.query_is_block_finalized_by_height(8).unwrap());
    }
}
