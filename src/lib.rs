//! Safeguard and quality checks for geospatial projects before publication.
//!
//! The host hands the engine a parsed project snapshot (layers, group tree,
//! data sources) plus a [`config::CheckerConfig`] describing which safeguards
//! are enabled. One evaluation pass runs the whole rule catalogue and returns
//! a [`types::CheckReport`]. Rules are independent; none of them can abort the
//! pass. With [`checks::Checker::repair`] the fix-capable rules mutate the
//! project in place and their findings are marked as fixed.

pub mod checks;
pub mod collector;
pub mod config;
pub mod datasource;
pub mod error;
pub mod paths;
pub mod project;
pub mod tree;
pub mod types;
