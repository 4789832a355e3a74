//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the catalog dimensions (`Product`, `Category`, `Region`)
//! - transaction rows and the immutable `Table`
//! - filter/sort inputs (`FilterCriteria`, `Selector`, `SortColumn`)
//! - generator and run configuration (`GeneratorConfig`, `DashConfig`)

pub mod types;

pub use types::*;
