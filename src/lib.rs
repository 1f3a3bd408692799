//! CV screener library: scoring, ranking and comparison of candidate CVs
//! against a job description, plus the analytics console's collaborator
//! seams (auth, ETL upload, dashboards).

pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod external;
pub mod input;
pub mod output;
pub mod ranking;
pub mod scoring;
pub mod session;

pub use config::Config;
pub use error::{Result, ScreenerError};
