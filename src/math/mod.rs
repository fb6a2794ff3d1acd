//! Mathematical core: polynomial least-squares fitting.

pub mod polyfit;
pub mod solve;

pub use polyfit::*;
pub use solve::*;
