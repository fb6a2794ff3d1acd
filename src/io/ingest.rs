//! Pump data file import and normalization.
//!
//! The format is a plain whitespace-delimited text blob:
//!
//! ```text
//! Goulds 3196            <- line 1: pump name
//! gpm ft                 <- line 2: flow units, head units
//! Flow Head Efficiency   <- line 3: column header (ignored)
//! 0    92.1  12.5        <- lines 4+: at least three numeric tokens each
//! ...
//! ```
//!
//! Design goals:
//! - **Strict structure** for the header lines (clear errors, exit code 2)
//! - **Row-level rules**: rows with fewer than three tokens are skipped (and
//!   counted); a malformed numeric token aborts the import with its line
//!   number, and nothing from that row is appended to any sample array
//! - **Deterministic behavior** (no hidden recovery)
//! - **Separation of concerns**: no fitting logic here

use std::fs;
use std::path::Path;

use crate::domain::{DatasetStats, PumpData};
use crate::error::ImportError;

/// Ingest output: normalized data + stats + row accounting.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub data: PumpData,
    pub stats: DatasetStats,
    pub rows_read: usize,
    pub rows_used: usize,
    pub rows_skipped: usize,
}

impl IngestedData {
    /// Wrap already-built pump data (e.g. a generated sample) so it can flow
    /// through the same pipeline as file imports.
    pub fn from_data(data: PumpData) -> Result<Self, ImportError> {
        let stats = compute_stats(&data).ok_or(ImportError::NoData)?;
        let rows = data.n_points();
        Ok(Self {
            data,
            stats,
            rows_read: rows,
            rows_used: rows,
            rows_skipped: 0,
        })
    }
}

/// Load and parse a pump data file.
pub fn load_pump_file(path: &Path) -> Result<IngestedData, ImportError> {
    let text = fs::read_to_string(path).map_err(|e| ImportError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    parse_pump_text(&text)
}

/// Parse pump data from in-memory text (the file body, or a generated blob).
pub fn parse_pump_text(text: &str) -> Result<IngestedData, ImportError> {
    let lines: Vec<&str> = text.lines().collect();

    let name = lines
        .first()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .ok_or(ImportError::MissingName)?
        .to_string();

    let units: Vec<&str> = lines
        .get(1)
        .map(|l| l.split_whitespace().collect())
        .unwrap_or_default();
    if units.len() < 2 {
        return Err(ImportError::MissingUnits);
    }
    let flow_units = units[0].to_string();
    let head_units = units[1].to_string();

    let mut flow = Vec::new();
    let mut head = Vec::new();
    let mut efficiency = Vec::new();
    let mut rows_read = 0usize;
    let mut rows_skipped = 0usize;

    // Line 3 is the column header; data starts on line 4.
    for (idx, raw) in lines.iter().enumerate().skip(3) {
        let line = idx + 1;
        rows_read += 1;

        let tokens: Vec<&str> = raw.split_whitespace().collect();
        if tokens.len() < 3 {
            rows_skipped += 1;
            continue;
        }

        // Parse all three tokens before appending anything, so a malformed
        // row never leaves partial data behind.
        let q = parse_token(tokens[0], line)?;
        let h = parse_token(tokens[1], line)?;
        let e = parse_token(tokens[2], line)?;

        flow.push(q);
        head.push(h);
        efficiency.push(e);
    }

    let data = PumpData {
        name,
        flow_units,
        head_units,
        flow,
        head,
        efficiency,
    };

    let stats = compute_stats(&data).ok_or(ImportError::NoData)?;
    let rows_used = data.n_points();

    Ok(IngestedData {
        data,
        stats,
        rows_read,
        rows_used,
        rows_skipped,
    })
}

fn parse_token(token: &str, line: usize) -> Result<f64, ImportError> {
    token.parse::<f64>().map_err(|_| ImportError::MalformedInput {
        line,
        token: token.to_string(),
    })
}

fn compute_stats(data: &PumpData) -> Option<DatasetStats> {
    if data.n_points() == 0 {
        return None;
    }

    let (flow_min, flow_max) = min_max(&data.flow)?;
    let (head_min, head_max) = min_max(&data.head)?;
    let (eff_min, eff_max) = min_max(&data.efficiency)?;

    Some(DatasetStats {
        n_points: data.n_points(),
        flow_min,
        flow_max,
        head_min,
        head_max,
        eff_min,
        eff_max,
    })
}

fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in values {
        min = min.min(v);
        max = max.max(v);
    }
    if min.is_finite() && max.is_finite() {
        Some((min, max))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Goulds 3196
gpm ft
Flow Head Efficiency
0 92.1 12.5
100 88.4 32.0
200 80.2 55.3
300 66.9 60.1
";

    #[test]
    fn parses_name_units_and_rows() {
        let ingest = parse_pump_text(SAMPLE).unwrap();

        assert_eq!(ingest.data.name, "Goulds 3196");
        assert_eq!(ingest.data.flow_units, "gpm");
        assert_eq!(ingest.data.head_units, "ft");
        assert_eq!(ingest.rows_read, 4);
        assert_eq!(ingest.rows_used, 4);
        assert_eq!(ingest.rows_skipped, 0);
        assert_eq!(ingest.data.flow, vec![0.0, 100.0, 200.0, 300.0]);
        assert!((ingest.stats.head_max - 92.1).abs() < 1e-12);
        assert!((ingest.stats.eff_max - 60.1).abs() < 1e-12);
    }

    #[test]
    fn short_rows_are_skipped_without_extending_arrays() {
        let text = "\
Pump
gpm ft
Flow Head Efficiency
10 20
0 92.1 12.5
100 88.4 32.0
200 80.2 55.3
300 66.9 60.1
";
        let ingest = parse_pump_text(text).unwrap();
        assert_eq!(ingest.rows_read, 5);
        assert_eq!(ingest.rows_used, 4);
        assert_eq!(ingest.rows_skipped, 1);
        assert_eq!(ingest.data.flow.len(), 4);
        assert_eq!(ingest.data.head.len(), 4);
        assert_eq!(ingest.data.efficiency.len(), 4);
    }

    #[test]
    fn malformed_token_reports_line_and_token() {
        let text = "\
Pump
gpm ft
Flow Head Efficiency
0 92.1 12.5
100 abc 32.0
";
        let err = parse_pump_text(text).unwrap_err();
        assert_eq!(
            err,
            ImportError::MalformedInput {
                line: 5,
                token: "abc".to_string()
            }
        );
    }

    #[test]
    fn missing_units_line_is_an_error() {
        assert_eq!(parse_pump_text("Pump\n").unwrap_err(), ImportError::MissingUnits);
        assert_eq!(
            parse_pump_text("Pump\ngpm\n").unwrap_err(),
            ImportError::MissingUnits
        );
    }

    #[test]
    fn empty_file_is_missing_name() {
        assert_eq!(parse_pump_text("").unwrap_err(), ImportError::MissingName);
    }

    #[test]
    fn header_only_file_has_no_data() {
        let text = "Pump\ngpm ft\nFlow Head Efficiency\n";
        assert_eq!(parse_pump_text(text).unwrap_err(), ImportError::NoData);
    }
}
