//! Candidate document intake: file-type detection and text extraction

pub mod extractor;
pub mod file_detector;
pub mod manager;

pub use manager::DocumentIntake;
