//! Curve fitting orchestration.
//!
//! Responsibilities:
//!
//! - fit a single sample set to a polynomial with quality diagnostics
//! - fit the two pump curves (head, efficiency) in parallel

pub mod fitter;

pub use fitter::*;
