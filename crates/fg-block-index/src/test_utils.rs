use crate::adapters::storage::{FaultyKVStore, InMemoryKVStore};
use crate::domain::block::Block;
use crate::ports::inbound::BlockIndexApi;
use crate::service::BlockIndexStore;

pub fn make_test_block(height: u64) -> Block {
    Block::new(height, test_hash(height), 1_700_000_000 + height)
}

pub fn make_test_blocks(heights: &[u64]) -> Vec<Block> {
    heights.iter().map(|h| make_test_block(*h)).collect()
}

pub fn test_hash(height: u64) -> String {
    format!("0x{:064x}", height)
}

/// In-memory store with the schema already created.
pub fn make_test_store() -> BlockIndexStore<InMemoryKVStore> {
    let store = BlockIndexStore::new(InMemoryKVStore::new());
    store.create_initial_schema().unwrap();
    store
}

/// Fault-injecting store with the schema already created, disarmed.
pub fn make_faulty_store() -> BlockIndexStore<FaultyKVStore> {
    let store = BlockIndexStore::new(FaultyKVStore::new());
    store.create_initial_schema().unwrap();
    store
}
