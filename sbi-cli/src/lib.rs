//! Terminal front end for the structured behavioral interview tool
//!
//! The `sbi` binary wires settings, rubric and persistence together; the
//! modules here hold everything that can be driven from tests.

pub mod commands;
pub mod driver;
pub mod render;

pub use driver::{Driver, RunSummary};
