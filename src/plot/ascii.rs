//! ASCII/Unicode plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! The two series share the x-axis (flow) but have independent y-axes:
//! head is scaled to the left axis, efficiency to the right.
//!
//! Plot elements (mirroring the classic pump-chart styling):
//! - observed head points: `o`, fitted head curve: `-`
//! - observed efficiency points: `^`, fitted efficiency curve: `:`

use crate::domain::{CurveFile, PumpData, PumpFit, QuantityKind};
use crate::math::sample_curve;

/// Render a plot for an in-memory pump fit.
pub fn render_pump_plot(data: &PumpData, fit: &PumpFit, width: usize, height: usize) -> String {
    let head_curve = sample_curve(&fit.head.coefficients, &data.flow, &data.head, width.max(2));
    let eff_curve = sample_curve(
        &fit.efficiency.coefficients,
        &data.flow,
        &data.efficiency,
        width.max(2),
    );

    let head_points: Vec<(f64, f64)> = data.flow.iter().copied().zip(data.head.iter().copied()).collect();
    let eff_points: Vec<(f64, f64)> =
        data.flow.iter().copied().zip(data.efficiency.iter().copied()).collect();

    render_plot(
        &head_points,
        &zip_curve(&head_curve.xs, &head_curve.ys),
        &eff_points,
        &zip_curve(&eff_curve.xs, &eff_curve.ys),
        &data.flow_units,
        &data.head_units,
        width,
        height,
    )
}

/// Render a plot from a saved curve JSON file (curves only, no overlay points).
pub fn render_pump_plot_from_curve_file(curve: &CurveFile, width: usize, height: usize) -> String {
    let head = curve
        .curves
        .iter()
        .find(|c| c.quantity == QuantityKind::Head);
    let eff = curve
        .curves
        .iter()
        .find(|c| c.quantity == QuantityKind::Efficiency);

    let head_curve: Vec<(f64, f64)> = head
        .map(|c| zip_curve(&c.grid.flow, &c.grid.y))
        .unwrap_or_default();
    let eff_curve: Vec<(f64, f64)> = eff
        .map(|c| zip_curve(&c.grid.flow, &c.grid.y))
        .unwrap_or_default();

    render_plot(
        &[],
        &head_curve,
        &[],
        &eff_curve,
        &curve.flow_units,
        &curve.head_units,
        width,
        height,
    )
}

#[allow(clippy::too_many_arguments)]
fn render_plot(
    head_points: &[(f64, f64)],
    head_curve: &[(f64, f64)],
    eff_points: &[(f64, f64)],
    eff_curve: &[(f64, f64)],
    flow_units: &str,
    head_units: &str,
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (x_min, x_max) =
        x_range(&[head_points, head_curve, eff_points, eff_curve]).unwrap_or((0.0, 1.0));

    // Independent y-axes: each series is scaled to its own range.
    let (h_min, h_max) = y_range(&[head_points, head_curve]).unwrap_or((0.0, 1.0));
    let (h_min, h_max) = pad_range(h_min, h_max, 0.05);
    let (e_min, e_max) = y_range(&[eff_points, eff_curve]).unwrap_or((0.0, 1.0));
    let (e_min, e_max) = pad_range(e_min, e_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Curves first (so points can overlay), head before efficiency.
    draw_curve(&mut grid, head_curve, x_min, x_max, h_min, h_max, '-');
    draw_curve(&mut grid, eff_curve, x_min, x_max, e_min, e_max, ':');

    for &(x, y) in head_points {
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, h_min, h_max, height);
        grid[row][col] = 'o';
    }
    for &(x, y) in eff_points {
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, e_min, e_max, height);
        grid[row][col] = '^';
    }

    // Header carries both axis ranges since the grid has no room for ticks.
    let mut out = String::new();
    out.push_str(&format!(
        "Plot: flow=[{x_min:.2}, {x_max:.2}] {flow_units} | head=[{h_min:.2}, {h_max:.2}] {head_units} (o/-) | eff=[{e_min:.2}, {e_max:.2}] % (^/:)\n"
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

fn zip_curve(xs: &[f64], ys: &[f64]) -> Vec<(f64, f64)> {
    xs.iter().copied().zip(ys.iter().copied()).collect()
}

fn x_range(series: &[&[(f64, f64)]]) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for s in series {
        for &(x, _) in *s {
            min = min.min(x);
            max = max.max(x);
        }
    }
    if min.is_finite() && max.is_finite() && max > min {
        Some((min, max))
    } else {
        None
    }
}

fn y_range(series: &[&[(f64, f64)]]) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for s in series {
        for &(_, y) in *s {
            min = min.min(y);
            max = max.max(y);
        }
    }
    if min.is_finite() && max.is_finite() && max >= min {
        Some((min, max))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(
    grid: &mut [Vec<char>],
    curve: &[(f64, f64)],
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
    ch: char,
) {
    if curve.len() < 2 {
        return;
    }
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in curve {
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        if let Some((c0, r0)) = prev {
            draw_line(grid, c0, r0, col, row, ch);
        } else {
            grid[row][col] = ch;
        }
        prev = Some((col, row));
    }
}

/// Integer line drawing (Bresenham-ish). Only writes to empty cells so earlier
/// layers stay visible.
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CurveFit, FitQuality, PumpFit};

    fn quality(n: usize) -> FitQuality {
        FitQuality {
            r_squared: 1.0,
            sse: 0.0,
            rmse: 0.0,
            n,
        }
    }

    #[test]
    fn plot_golden_snapshot_small() {
        // Head: exactly linear (slope 1); efficiency: exactly constant.
        let data = PumpData {
            name: "P".to_string(),
            flow_units: "gpm".to_string(),
            head_units: "ft".to_string(),
            flow: vec![0.0, 10.0],
            head: vec![0.0, 10.0],
            efficiency: vec![50.0, 50.0],
        };
        let fit = PumpFit {
            degree: 1,
            head: CurveFit {
                coefficients: vec![1.0, 0.0],
                quality: quality(2),
            },
            efficiency: CurveFit {
                coefficients: vec![0.0, 50.0],
                quality: quality(2),
            },
        };

        let txt = render_pump_plot(&data, &fit, 10, 5);
        let expected = concat!(
            "Plot: flow=[0.00, 10.00] gpm | head=[-0.50, 10.50] ft (o/-) | eff=[50.00, 50.00] % (^/:)\n",
            "         o\n",
            "      --- \n",
            "^:::--:::^\n",
            " ---      \n",
            "o         \n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn curve_file_plot_renders_both_grids() {
        let curve = CurveFile {
            tool: "pump".to_string(),
            pump_name: "P".to_string(),
            flow_units: "gpm".to_string(),
            head_units: "ft".to_string(),
            degree: 1,
            curves: vec![
                crate::domain::CurveRecord {
                    quantity: QuantityKind::Head,
                    fit: CurveFit {
                        coefficients: vec![1.0, 0.0],
                        quality: quality(2),
                    },
                    grid: crate::domain::CurveGrid {
                        flow: vec![0.0, 5.0, 10.0],
                        y: vec![0.0, 5.0, 10.0],
                    },
                },
                crate::domain::CurveRecord {
                    quantity: QuantityKind::Efficiency,
                    fit: CurveFit {
                        coefficients: vec![0.0, 50.0],
                        quality: quality(2),
                    },
                    grid: crate::domain::CurveGrid {
                        flow: vec![0.0, 5.0, 10.0],
                        y: vec![50.0, 50.0, 50.0],
                    },
                },
            ],
        };

        let txt = render_pump_plot_from_curve_file(&curve, 20, 8);
        assert!(txt.contains('-'));
        assert!(txt.contains(':'));
        // No observed points in file-only mode.
        assert!(!txt.contains('o'));
        assert!(!txt.contains('^'));
    }
}
