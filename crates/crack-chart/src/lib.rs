//! Chart rendering layer for crackplot.
//!
//! Draws the cumulative guess chart and the policy compliance bar chart with
//! [`plotters`], writing image files into an output directory.

pub mod composition;
pub mod error;
pub mod guesses;
pub mod themes;

pub use crack_core as core;
pub use error::PlotError;
