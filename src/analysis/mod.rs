//! Filter & aggregation pipeline.
//!
//! Responsibilities:
//!
//! - filter a table by date range and dimension selectors
//! - compute KPIs and the grouped dashboard views
//! - produce the sorted/truncated data grid
//! - describe numeric columns for the summary panel

pub mod aggregate;
pub mod filter;
pub mod sort;
pub mod stats;

pub use aggregate::*;
pub use filter::*;
pub use sort::*;
pub use stats::*;
