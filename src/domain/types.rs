//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable (where they
//! cross the export boundary) so they can be:
//!
//! - used in-memory during fitting
//! - exported to JSON/CSV
//! - reloaded later for plotting

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Which quantity a curve describes (the dependent axis; flow is always x).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuantityKind {
    Head,
    Efficiency,
}

impl QuantityKind {
    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            QuantityKind::Head => "Head",
            QuantityKind::Efficiency => "Efficiency",
        }
    }
}

/// Paired `(x, y)` observations for one fit.
///
/// Invariant: `x.len() == y.len()`, and a degree-`d` fit needs at least
/// `d + 1` points (fewer yields an underdetermined system — the fit engine
/// rejects it). Populated wholesale per import, never mutated incrementally.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSet {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl SampleSet {
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Self {
        Self { x, y }
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Everything imported from one pump data file.
///
/// `flow` / `head` / `efficiency` are parallel arrays; the import layer
/// guarantees equal lengths (a row contributes to all three or to none).
#[derive(Debug, Clone, PartialEq)]
pub struct PumpData {
    pub name: String,
    pub flow_units: String,
    pub head_units: String,
    pub flow: Vec<f64>,
    pub head: Vec<f64>,
    pub efficiency: Vec<f64>,
}

impl PumpData {
    pub fn n_points(&self) -> usize {
        self.flow.len()
    }

    /// Flow/head pairs as an independently owned sample set.
    pub fn head_samples(&self) -> SampleSet {
        SampleSet::new(self.flow.clone(), self.head.clone())
    }

    /// Flow/efficiency pairs as an independently owned sample set.
    pub fn efficiency_samples(&self) -> SampleSet {
        SampleSet::new(self.flow.clone(), self.efficiency.clone())
    }
}

/// Summary stats about the points actually used for fitting.
#[derive(Debug, Clone)]
pub struct DatasetStats {
    pub n_points: usize,
    pub flow_min: f64,
    pub flow_max: f64,
    pub head_min: f64,
    pub head_max: f64,
    pub eff_min: f64,
    pub eff_max: f64,
}

/// Fit quality diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitQuality {
    pub r_squared: f64,
    pub sse: f64,
    pub rmse: f64,
    pub n: usize,
}

/// A fitted polynomial curve.
///
/// Coefficients are ordered highest power first, so `coefficients.last()` is
/// the constant term. Immutable once computed; a re-fit replaces the whole
/// value rather than mutating in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveFit {
    pub coefficients: Vec<f64>,
    pub quality: FitQuality,
}

impl CurveFit {
    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }
}

/// Both fitted curves for one pump.
#[derive(Debug, Clone)]
pub struct PumpFit {
    pub degree: usize,
    pub head: CurveFit,
    pub efficiency: CurveFit,
}

/// Densely sampled fitted curve, ready for rendering.
///
/// `xs` spans `[min(flow), max(flow)]` inclusive; `ys` is the polynomial
/// evaluated pointwise; `r_squared` is the fit quality against the original
/// samples. Derived on demand, never cached.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveSamples {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    pub r_squared: f64,
}

/// Per-point fitted values and residuals for both curves.
#[derive(Debug, Clone)]
pub struct PointResidual {
    pub flow: f64,
    pub head_obs: f64,
    pub head_fit: f64,
    pub head_residual: f64,
    pub eff_obs: f64,
    pub eff_fit: f64,
    pub eff_residual: f64,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct FitConfig {
    /// Pump data file; `None` means generate a synthetic sample instead.
    pub input: Option<PathBuf>,

    /// Polynomial degree for both curves.
    pub degree: usize,

    /// Number of points when densely sampling a fitted curve.
    pub curve_points: usize,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_results: Option<PathBuf>,
    pub export_curve: Option<PathBuf>,

    /// Synthetic sample settings (used when `input` is `None`).
    pub sample_count: usize,
    pub sample_seed: u64,
}

/// One exported curve: quantity, parameters, quality, and a baked grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveRecord {
    pub quantity: QuantityKind,
    pub fit: CurveFit,
    pub grid: CurveGrid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveGrid {
    pub flow: Vec<f64>,
    pub y: Vec<f64>,
}

/// A saved curve file (JSON).
///
/// The "portable" representation of a fitted pump: metadata, both polynomial
/// fits, and precomputed grids for quick plotting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveFile {
    pub tool: String,
    pub pump_name: String,
    pub flow_units: String,
    pub head_units: String,
    pub degree: usize,
    pub curves: Vec<CurveRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_sets_are_independently_owned() {
        let data = PumpData {
            name: "P".to_string(),
            flow_units: "gpm".to_string(),
            head_units: "ft".to_string(),
            flow: vec![1.0, 2.0],
            head: vec![10.0, 9.0],
            efficiency: vec![50.0, 60.0],
        };

        let mut head = data.head_samples();
        head.x[0] = 99.0;
        assert_eq!(data.flow[0], 1.0);
        assert_eq!(data.efficiency_samples().y, vec![50.0, 60.0]);
    }

    #[test]
    fn curve_fit_degree_from_coefficients() {
        let fit = CurveFit {
            coefficients: vec![1.0, 2.0, 3.0, 4.0],
            quality: FitQuality {
                r_squared: 1.0,
                sse: 0.0,
                rmse: 0.0,
                n: 4,
            },
        };
        assert_eq!(fit.degree(), 3);
    }
}
