//! Gate and level statistics for generated FHE circuit sources.
//!
//! The circuit generator emits one `static LEVEL_<n>` table per evaluation
//! level, each followed by a blank line. This crate counts the entries of
//! every table and reports, per file, the total gate count, the number of
//! levels and the size of each level.
pub mod builders;
pub mod core;
pub mod utils;
