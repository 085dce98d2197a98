//! # Finalized Bounds
//!
//! The two pointers tracking the known-finalized range.
//!
//! - `earliest` is written once, by the first batch ever inserted, and is
//!   the minimum height of that batch (first-batch-wins).
//! - `latest` only moves forward.

use super::block::HeightRange;

/// Current value of both pointers, as read inside a transaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FinalizedBounds {
    pub earliest: Option<u64>,
    pub latest: Option<u64>,
}

/// Pointer writes a batch requires. `None` means leave as is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoundsUpdate {
    pub earliest: Option<u64>,
    pub latest: Option<u64>,
}

impl BoundsUpdate {
    pub fn is_empty(&self) -> bool {
        self.earliest.is_none() && self.latest.is_none()
    }
}

impl FinalizedBounds {
    /// Compute the pointer writes for a batch spanning `range`.
    pub fn advance(&self, range: HeightRange) -> BoundsUpdate {
        let earliest = match self.earliest {
            None => Some(range.min),
            Some(_) => None,
        };
        // An absent `latest` compares below every height, including 0.
        let latest = match self.latest {
            Some(current) if range.max <= current => None,
            _ => Some(range.max),
        };
        BoundsUpdate { earliest, latest }
    }
}
