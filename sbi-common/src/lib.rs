//! # SBI Common Library
//!
//! Rubric-driven scoring and interview-session engine shared by the `sbi`
//! command line and its tests:
//! - Rubric model and structural validation
//! - Trait applicability resolution per track
//! - Weighted scoring with hard override locks
//! - Interview session model and the wizard state machine
//! - Pre-finalization validation gate
//! - Draft persistence, report export, settings loading
//! - Optional disqualifier signal reference data

pub mod applicability;
pub mod config;
pub mod drafts;
pub mod error;
pub mod finalize;
pub mod report;
pub mod rubric;
pub mod scoring;
pub mod session;
pub mod signals;
pub mod time;
pub mod wizard;

pub use error::{Error, Result, ValidationError};
pub use rubric::{Rubric, Track, Trait};
pub use scoring::{Outcome, ScoringResult};
pub use session::{InterviewSession, TraitInput};
pub use wizard::{InterviewWizard, Screen};
