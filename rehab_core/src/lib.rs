#![forbid(unsafe_code)]

//! Core domain model and business logic for the rehabilitation plan tools.
//!
//! This crate provides:
//! - Domain types (patient profile, recommendation, user progress)
//! - Recommendation engine
//! - Plain-text plan export
//! - Projected vs actual progress chart
//! - Progress persistence and configuration

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod engine;
pub mod export;
pub mod chart;
pub mod progress;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use engine::compute_recommendation;
pub use export::{render_plan, write_plan, PLAN_FILE_NAME, PLAN_MIME_TYPE};
pub use chart::{ChartPoint, ProgressChart, MAX_CHART_WIDTH, MIN_CHART_WIDTH};
pub use progress::ProgressRecord;
