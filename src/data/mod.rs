//! Data sources: synthetic pump sample generation.

pub mod sample;

pub use sample::*;
