#![forbid(unsafe_code)]

//! Core statistical engine for the growthz child growth tracker.
//!
//! This crate provides:
//! - WHO 2006 Child Growth Standards reference tables (LMS form)
//! - LMS interpolation and Z-score / percentile calculation
//! - Growth indicator aggregation with measurement validation
//! - Longitudinal trend, velocity and faltering analysis
//! - Configuration, logging and measurement history loading
//!
//! Everything in the engine is a pure function of its inputs. History is
//! passed in by the caller on every call; nothing is cached.

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod reference;
pub mod lms;
pub mod messages;
pub mod zscore;
pub mod indicators;
pub mod trend;
pub mod velocity;
pub mod faltering;
pub mod history;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::{AnalysisOptions, Config};
pub use messages::Locale;
pub use zscore::{calculate_z_score, classify, z_score_for_indicator, z_score_to_percentile};
pub use indicators::{
    age_in_months, all_growth_indicators, growth_indicators_from_dates, validate_measurements,
};
pub use trend::analyze_growth_trend;
pub use velocity::calculate_growth_velocity;
pub use faltering::detect_growth_faltering;
pub use history::{build_series, load_measurements};
