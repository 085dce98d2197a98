//! # Finality Gadget Test Suite
//!
//! Cross-crate tests that need a real RocksDB directory, several threads or
//! the node lifecycle.
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── src/integration/
//! │   ├── persistence.rs   # close/reopen round trips
//! │   ├── concurrency.rs   # directory lock, readers during writes
//! │   ├── scenarios.rs     # bound history, atomicity under faults
//! │   └── node.rs          # startup, queries, shutdown
//! └── benches/
//!     └── block_index_benchmarks.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p fg-tests
//!
//! # By category
//! cargo test -p fg-tests integration::concurrency::
//!
//! # Benchmarks
//! cargo bench -p fg-tests
//! ```

pub mod fixtures;
