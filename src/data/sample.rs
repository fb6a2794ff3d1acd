//! Synthetic pump data generation.
//!
//! Useful for demos, TUI sessions without a data file, and deterministic
//! testing. The generated pump follows the textbook shape:
//!
//! - head falls off from shutoff roughly quadratically with flow
//! - efficiency rises to a best-efficiency point (~60% of max flow) and
//!   falls away on either side
//!
//! Both series carry small Gaussian measurement noise; everything is driven
//! by a caller-supplied seed, so identical seeds yield identical pumps.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::PumpData;
use crate::error::AppError;

/// Shutoff head (ft) for the synthetic pump.
const SHUTOFF_HEAD: f64 = 92.0;

/// Maximum flow (gpm); sample abscissas span `[0, MAX_FLOW]`.
const MAX_FLOW: f64 = 600.0;

/// Peak efficiency (%) at the best-efficiency point.
const PEAK_EFFICIENCY: f64 = 78.0;

/// Best-efficiency point as a fraction of `MAX_FLOW`.
const BEP_FRACTION: f64 = 0.6;

/// Generate a synthetic pump with `count` evenly spaced flow points.
///
/// A degree-3 fit needs at least 4 points, so `count < 4` is rejected.
pub fn generate_sample(count: usize, seed: u64) -> Result<PumpData, AppError> {
    if count < 4 {
        return Err(AppError::new(2, "Sample count must be at least 4."));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let head_noise = Normal::new(0.0, 0.6)
        .map_err(|e| AppError::new(4, format!("Noise distribution error: {e}")))?;
    let eff_noise = Normal::new(0.0, 1.0)
        .map_err(|e| AppError::new(4, format!("Noise distribution error: {e}")))?;

    let mut flow = Vec::with_capacity(count);
    let mut head = Vec::with_capacity(count);
    let mut efficiency = Vec::with_capacity(count);

    let bep = BEP_FRACTION * MAX_FLOW;
    for i in 0..count {
        let q = MAX_FLOW * i as f64 / (count as f64 - 1.0);

        // Quadratic droop with a mild cubic term so a cubic fit is exercised.
        let u = q / MAX_FLOW;
        let h = SHUTOFF_HEAD * (1.0 - 0.55 * u * u - 0.12 * u * u * u);

        let d = (q - bep) / bep;
        let e = (PEAK_EFFICIENCY * (1.0 - d * d)).max(0.0);

        flow.push(q);
        head.push(h + head_noise.sample(&mut rng));
        efficiency.push((e + eff_noise.sample(&mut rng)).max(0.0));
    }

    Ok(PumpData {
        name: format!("Synthetic Pump (seed {seed})"),
        flow_units: "gpm".to_string(),
        head_units: "ft".to_string(),
        flow,
        head,
        efficiency,
    })
}

/// Serialize pump data into the whitespace-delimited import format.
///
/// The output parses back through `io::ingest::parse_pump_text`.
pub fn to_pump_text(data: &PumpData) -> String {
    let mut out = String::new();
    out.push_str(&data.name);
    out.push('\n');
    out.push_str(&format!("{} {}\n", data.flow_units, data.head_units));
    out.push_str("Flow Head Efficiency\n");
    for i in 0..data.n_points() {
        out.push_str(&format!(
            "{:.3} {:.3} {:.3}\n",
            data.flow[i], data.head[i], data.efficiency[i]
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::ingest::parse_pump_text;

    #[test]
    fn generation_is_deterministic_per_seed() {
        let a = generate_sample(12, 7).unwrap();
        let b = generate_sample(12, 7).unwrap();
        let c = generate_sample(12, 8).unwrap();

        assert_eq!(a, b);
        assert_ne!(a.head, c.head);
    }

    #[test]
    fn generated_shape_is_plausible() {
        let data = generate_sample(20, 42).unwrap();

        assert_eq!(data.n_points(), 20);
        // Head at shutoff well above head at max flow.
        assert!(data.head[0] > data.head[19] + 20.0);
        // Efficiency peaks somewhere strictly inside the flow range.
        let (peak_idx, _) = data
            .efficiency
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .unwrap();
        assert!(peak_idx > 0 && peak_idx < 19);
    }

    #[test]
    fn sample_text_round_trips_through_ingest() {
        let data = generate_sample(8, 3).unwrap();
        let text = to_pump_text(&data);

        let ingest = parse_pump_text(&text).unwrap();
        assert_eq!(ingest.data.name, data.name);
        assert_eq!(ingest.rows_used, 8);
        assert_eq!(ingest.data.flow_units, "gpm");
        // Values survive within the serialized precision.
        for (a, b) in ingest.data.head.iter().zip(data.head.iter()) {
            assert!((a - b).abs() < 5e-4);
        }
    }

    #[test]
    fn too_few_points_rejected() {
        assert!(generate_sample(3, 0).is_err());
    }
}
