//! Dataset sources: the seeded generator and its per-day memoization.

pub mod cache;
pub mod sample;

pub use cache::{CacheKey, CacheStats, DatasetCache};
pub use sample::generate;
