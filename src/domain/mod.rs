//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - immutable sample containers (`SampleSet`, `PumpData`)
//! - fit outputs (`CurveFit`, `FitQuality`, `CurveSamples`)
//! - run configuration (`FitConfig`)
//! - the curve JSON export schema (`CurveFile`)

pub mod types;

pub use types::*;
