//! Shared fixtures for integration tests and benchmarks.

use std::path::Path;

use fg_block_index::{Block, BlockIndexApi, BlockIndexStore, RocksDbStore, StoreConfig};

/// Deterministic hash for a height.
pub fn hash_for(height: u64) -> String {
    format!("0x{:064x}", height)
}

/// A block with a deterministic hash and some chain metadata.
pub fn block(height: u64) -> Block {
    Block::new(height, hash_for(height), 1_718_332_131 + height)
        .with_extra("btc_epoch", height / 10)
}

/// Blocks for every height in `heights`, in the given order.
pub fn blocks(heights: impl IntoIterator<Item = u64>) -> Vec<Block> {
    heights.into_iter().map(block).collect()
}

/// Open a RocksDB-backed store in `dir` with the schema created.
pub fn open_store(dir: &Path) -> BlockIndexStore<RocksDbStore> {
    let store = BlockIndexStore::open(StoreConfig::for_testing(dir)).expect("open block index");
    store.create_initial_schema().expect("create schema");
    store
}
