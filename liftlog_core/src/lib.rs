#![forbid(unsafe_code)]

//! Core domain model and business logic for the Lift Log workout tracker.
//!
//! This crate provides:
//! - Domain types (set records, workout entries, aggregate metrics)
//! - The compact `Sets x Reps x Weight` notation parser and formatter
//! - Derived-metrics computation (volume, reps, average weight, 1RM)
//! - The CSV-backed record store with row-level quarantine
//! - History filtering/sorting, rule-based insights, and export

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod parser;
pub mod metrics;
pub mod muscles;
pub mod store;
pub mod query;
pub mod insights;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use parser::{format_sets, parse_sets};
pub use metrics::compute_metrics;
pub use store::{append_entry, save_entries, RejectedRow, WorkoutLog};
pub use query::{filter_entries, sort_entries, EntryFilter, SortKey};
