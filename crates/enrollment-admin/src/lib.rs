//! Backend building blocks for the student-selection admin dashboard.
//!
//! The crate hosts the exam-scheduling wizard state model, a generic
//! paginated client for the enrollment REST API, export and formatting
//! helpers, and the ambient configuration/telemetry/error plumbing shared by
//! the API service.

pub mod access;
pub mod config;
pub mod error;
pub mod export;
pub mod format;
pub mod resources;
pub mod telemetry;
pub mod workflows;
