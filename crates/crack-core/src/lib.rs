//! Core types for crackplot.
//!
//! Holds the data model shared by the ingestion and chart crates, password
//! policy inference and compliance checks, the error type, CLI settings and
//! label formatting.

pub mod error;
pub mod formatting;
pub mod models;
pub mod policy;
pub mod settings;

pub use error::{CrackError, Result};
