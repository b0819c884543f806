//! Data ingestion layer for crackplot.
//!
//! Responsible for reading session logs and password corpora, building the
//! cumulative guess series and the compliance counts, and running the two
//! top-level pipelines.

pub mod analysis;
pub mod corpus;
pub mod reader;
pub mod series;
pub mod summary;

pub use crack_core as core;
