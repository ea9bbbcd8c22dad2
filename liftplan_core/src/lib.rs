#![forbid(unsafe_code)]

//! Core domain model and business logic for the Liftplan system.
//!
//! This crate provides:
//! - Domain types (sets, records, progression targets)
//! - Exercise catalog
//! - Performance metrics (e1RM, volume, PR detection)
//! - Week-by-week progression engine
//! - Persistence (set journal, CSV archive, record book)

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod metrics;
pub mod progression;
pub mod journal;
pub mod archive;
pub mod records;
pub mod history;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{build_default_catalog, get_default_catalog};
pub use config::Config;
pub use journal::{JsonlSink, SetSink};
pub use metrics::{calculate_e1rm, check_for_pr, total_volume};
pub use history::load_recent_sets;
pub use progression::{apply_progression, generate_progression_preview};
