//! Presentation of screening results

pub mod formatter;

pub use formatter::{render, ScreeningReport};
