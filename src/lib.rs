//! `sales-dash`: a seeded synthetic sales dataset and the filter/aggregation
//! pipeline behind a sales dashboard.
//!
//! The `dash` binary only parses flags and prints; generation, filtering,
//! the grouped views and CSV export all live here and are usable on their own.

pub mod analysis;
pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod plot;
pub mod report;
