//! Input/output helpers.
//!
//! - CSV export of a (filtered) table (`export`)
//! - CSV ingest of a previous export (`ingest`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
