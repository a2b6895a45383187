//! Descriptive statistics and rankings over the NYC schools SAT table.
//!
//! The table is loaded once by [`loader`] into an immutable `Vec<SchoolRecord>`;
//! every analysis borrows it and returns a fresh result.
pub mod aggregate;
pub mod charts;
pub mod config;
pub mod error;
pub mod loader;
pub mod missing;
pub mod output;
pub mod overview;
pub mod ranking;
pub mod reports;
pub mod types;
pub mod util;

pub use config::Config;
pub use error::{ReportError, Result};
pub use types::SchoolRecord;
