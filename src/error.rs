//! Error types.
//!
//! Layering:
//!
//! - `FitError` — the fit engine's own failures (rank deficiency, too few points).
//! - `ImportError` — pump data file problems (structure, malformed numbers).
//! - `AppError` — process-boundary error carrying an exit code; everything is
//!   converted into this at the application layer.
//!
//! The engine never recovers from its own errors; callers decide whether to
//! lower the degree, skip a plot, or surface the failure.

use std::fmt;

/// Failures from the least-squares fit engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FitError {
    /// Fewer sample points than coefficients: the system is underdetermined.
    /// Raised before any solve is attempted.
    InsufficientData { needed: usize, got: usize },
    /// The design matrix is rank-deficient for the requested degree
    /// (typically: fewer distinct x values than `degree + 1`).
    SingularSystem { distinct: usize, needed: usize },
    /// `x` and `y` have different lengths.
    LengthMismatch { x_len: usize, y_len: usize },
}

impl fmt::Display for FitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FitError::InsufficientData { needed, got } => write!(
                f,
                "Insufficient data: need at least {needed} points, got {got}."
            ),
            FitError::SingularSystem { distinct, needed } => write!(
                f,
                "Singular system: {distinct} distinct x values, need at least {needed}."
            ),
            FitError::LengthMismatch { x_len, y_len } => write!(
                f,
                "Sample length mismatch: {x_len} x values vs {y_len} y values."
            ),
        }
    }
}

impl std::error::Error for FitError {}

/// Failures while importing a pump data file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    /// A numeric token failed to parse. Nothing from the offending line is
    /// appended to any sample array.
    MalformedInput { line: usize, token: String },
    /// The file has no pump-name line.
    MissingName,
    /// The units line is absent or has fewer than two labels.
    MissingUnits,
    /// No usable data rows remain after skipping short lines.
    NoData,
    /// The file could not be read at all.
    Io { path: String, message: String },
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::MalformedInput { line, token } => {
                write!(f, "Malformed numeric token '{token}' on line {line}.")
            }
            ImportError::MissingName => write!(f, "Pump data file is missing the name line."),
            ImportError::MissingUnits => {
                write!(f, "Pump data file is missing the units line (need two labels).")
            }
            ImportError::NoData => write!(f, "Pump data file contains no usable data rows."),
            ImportError::Io { path, message } => {
                write!(f, "Failed to read pump data '{path}': {message}")
            }
        }
    }
}

impl std::error::Error for ImportError {}

/// Process-boundary error with an exit code.
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<ImportError> for AppError {
    fn from(err: ImportError) -> Self {
        AppError::new(2, err.to_string())
    }
}

impl From<FitError> for AppError {
    fn from(err: FitError) -> Self {
        AppError::new(3, err.to_string())
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Debug for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
