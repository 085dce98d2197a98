//! # Database Process Locking
//!
//! Prevents two store handles from opening the same data directory.

mod flock;

pub use flock::DatabaseLock;
