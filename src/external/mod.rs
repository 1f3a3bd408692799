//! Narrow collaborator interfaces: authentication, ETL upload, dashboards
//!
//! The scoring core does not depend on any of these; they exist so the
//! console surface has typed seams to plug real services into.

pub mod auth;
pub mod dashboard;
pub mod etl;
