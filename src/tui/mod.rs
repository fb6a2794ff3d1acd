//! Ratatui-based terminal UI.
//!
//! The TUI provides a settings panel for choosing the fit degree and (for
//! synthetic pumps) the sample count/seed, then renders the fitted head and
//! efficiency curves over the observed points. The two series share the flow
//! axis; head uses the left tick labels and efficiency the right ones.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Terminal,
};

use crate::app::pipeline::RunOutput;
use crate::cli::FitArgs;
use crate::data::generate_sample;
use crate::domain::FitConfig;
use crate::error::AppError;
use crate::io::ingest::{load_pump_file, IngestedData};
use crate::math::sample_curve;
use crate::report::fmt_r_squared;

mod plotters_chart;

use plotters_chart::PumpPlottersChart;

/// Start the TUI.
pub fn run(args: FitArgs) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(args)?;
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Settings rows, top to bottom.
const FIELD_DEGREE: usize = 0;
const FIELD_COUNT: usize = 1;
const FIELD_SEED: usize = 2;

struct App {
    config: FitConfig,
    selected_field: usize,
    status: String,
    ingest: Option<IngestedData>,
    run: Option<RunOutput>,
}

impl App {
    fn new(args: FitArgs) -> Result<Self, AppError> {
        let config = crate::app::fit_config_from_args(&args);
        let mut app = Self {
            config,
            selected_field: 0,
            status: "Loading data...".to_string(),
            ingest: None,
            run: None,
        };
        app.reload_data()?;
        Ok(app)
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))? {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Up => {
                if self.selected_field > 0 {
                    self.selected_field -= 1;
                }
            }
            KeyCode::Down => {
                if self.selected_field < FIELD_SEED {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left => self.adjust_field(-1),
            KeyCode::Right => self.adjust_field(1),
            KeyCode::Char('r') => {
                if self.config.input.is_none() {
                    self.config.sample_seed = self.config.sample_seed.wrapping_add(1);
                }
                match self.reload_data() {
                    Ok(()) => self.status = "Reloaded data.".to_string(),
                    Err(err) => self.status = format!("Reload failed: {err}"),
                }
            }
            _ => {}
        }

        false
    }

    fn adjust_field(&mut self, delta: i32) {
        match self.selected_field {
            FIELD_DEGREE => {
                let next = if delta >= 0 {
                    (self.config.degree + 1).min(9)
                } else {
                    self.config.degree.saturating_sub(1)
                };
                self.config.degree = next;
                self.refit();
                self.status = format!("degree: {}", self.config.degree);
            }
            FIELD_COUNT => {
                if self.config.input.is_some() {
                    self.status = "Count applies to synthetic pumps only.".to_string();
                    return;
                }
                let next = if delta >= 0 {
                    self.config.sample_count.saturating_add(1)
                } else {
                    self.config.sample_count.saturating_sub(1)
                };
                self.config.sample_count = next.max(4);
                match self.reload_data() {
                    Ok(()) => self.status = format!("count: {}", self.config.sample_count),
                    Err(err) => self.status = format!("Regenerate failed: {err}"),
                }
            }
            FIELD_SEED => {
                if self.config.input.is_some() {
                    self.status = "Seed applies to synthetic pumps only.".to_string();
                    return;
                }
                self.config.sample_seed = if delta >= 0 {
                    self.config.sample_seed.wrapping_add(1)
                } else {
                    self.config.sample_seed.wrapping_sub(1)
                };
                match self.reload_data() {
                    Ok(()) => self.status = format!("seed: {}", self.config.sample_seed),
                    Err(err) => self.status = format!("Regenerate failed: {err}"),
                }
            }
            _ => {}
        }
    }

    fn reload_data(&mut self) -> Result<(), AppError> {
        let ingest = match &self.config.input {
            Some(path) => load_pump_file(path)?,
            None => IngestedData::from_data(generate_sample(
                self.config.sample_count,
                self.config.sample_seed,
            )?)?,
        };
        self.ingest = Some(ingest);
        self.refit();
        Ok(())
    }

    fn refit(&mut self) {
        let Some(ingest) = &self.ingest else {
            self.status = "No data loaded.".to_string();
            return;
        };

        match crate::app::pipeline::run_fit_with_data(&self.config, ingest.clone()) {
            Ok(run) => {
                self.run = Some(run);
            }
            Err(err) => {
                // Keep the last good fit on screen; report the failure.
                self.status = format!("Fit failed: {err}");
            }
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("pump", Style::default().fg(Color::Cyan)),
            Span::raw(" — performance curve fitter"),
        ]));

        let (name, n) = self
            .ingest
            .as_ref()
            .map(|i| (i.data.name.clone(), i.stats.n_points))
            .unwrap_or_else(|| ("-".to_string(), 0));

        lines.push(Line::from(Span::styled(
            format!("pump: {name} | degree: {} | n={n}", self.config.degree),
            Style::default().fg(Color::Gray),
        )));

        if let Some(run) = &self.run {
            lines.push(Line::from(Span::styled(
                format!(
                    "head R²={} rmse={:.3} | eff R²={} rmse={:.3}",
                    fmt_r_squared(run.fit.head.quality.r_squared),
                    run.fit.head.quality.rmse,
                    fmt_r_squared(run.fit.efficiency.quality.r_squared),
                    run.fit.efficiency.quality.rmse,
                ),
                Style::default().fg(Color::Gray),
            )));
        }

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(7)])
            .split(area);

        self.draw_chart(frame, chunks[0]);
        self.draw_settings(frame, chunks[1]);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Pump Curves").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(run) = &self.run else {
            let msg = Paragraph::new("Waiting for data...")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default());
            frame.render_widget(msg, inner);
            return;
        };

        let series = chart_series(run);

        let (chart_rect, insets) = chart_layout(inner);
        let head_units = run.ingest.data.head_units.clone();
        let widget = PumpPlottersChart {
            head_curve: &series.head_curve,
            head_points: &series.head_points,
            eff_curve: &series.eff_curve,
            eff_points: &series.eff_points,
            x_bounds: series.x_bounds,
            y_bounds: series.head_bounds,
            x_label: "flow",
            y_label: format!("head ({head_units})"),
            fmt_x: fmt_axis,
            fmt_y: fmt_axis,
        };

        frame.render_widget(widget, chart_rect);
        if let Some(insets) = insets {
            draw_axis_ticks(
                frame,
                inner,
                chart_rect,
                insets,
                series.x_bounds,
                series.head_bounds,
                series.eff_bounds,
            );
        }
    }

    fn draw_settings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let source = self
            .config
            .input
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "synthetic".to_string());

        let mut items = Vec::new();
        items.push(ListItem::new(format!("Degree: {}", self.config.degree)));
        items.push(ListItem::new(format!("Count: {}", self.config.sample_count)));
        items.push(ListItem::new(format!("Seed: {}", self.config.sample_seed)));
        items.push(ListItem::new(format!("Source: {source}")));

        let list = List::new(items)
            .block(Block::default().title("Settings").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ adjust  r reload/resample  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Chart-ready series with efficiency rescaled onto the head axis.
struct ChartSeries {
    head_curve: Vec<(f64, f64)>,
    head_points: Vec<(f64, f64)>,
    eff_curve: Vec<(f64, f64)>,
    eff_points: Vec<(f64, f64)>,
    x_bounds: [f64; 2],
    head_bounds: [f64; 2],
    eff_bounds: [f64; 2],
}

/// Build chart series for Plotters.
///
/// The plane is in head units; efficiency values are linearly rescaled from
/// their own (padded) range into the head range so both curves fill the chart.
/// The right-hand tick labels undo this rescale for display.
fn chart_series(run: &RunOutput) -> ChartSeries {
    let data = &run.ingest.data;
    let n = 200usize;

    let head = sample_curve(&run.fit.head.coefficients, &data.flow, &data.head, n);
    let eff = sample_curve(
        &run.fit.efficiency.coefficients,
        &data.flow,
        &data.efficiency,
        n,
    );

    let x_bounds = [run.ingest.stats.flow_min, run.ingest.stats.flow_max];

    let head_bounds = padded_bounds(
        data.head.iter().copied().chain(head.ys.iter().copied()),
    );
    let eff_bounds = padded_bounds(
        data.efficiency.iter().copied().chain(eff.ys.iter().copied()),
    );

    let rescale = |e: f64| {
        let u = (e - eff_bounds[0]) / (eff_bounds[1] - eff_bounds[0]);
        head_bounds[0] + u * (head_bounds[1] - head_bounds[0])
    };

    let head_curve: Vec<(f64, f64)> = head.xs.iter().copied().zip(head.ys.iter().copied()).collect();
    let head_points: Vec<(f64, f64)> =
        data.flow.iter().copied().zip(data.head.iter().copied()).collect();
    let eff_curve: Vec<(f64, f64)> = eff
        .xs
        .iter()
        .copied()
        .zip(eff.ys.iter().map(|&e| rescale(e)))
        .collect();
    let eff_points: Vec<(f64, f64)> = data
        .flow
        .iter()
        .copied()
        .zip(data.efficiency.iter().map(|&e| rescale(e)))
        .collect();

    ChartSeries {
        head_curve,
        head_points,
        eff_curve,
        eff_points,
        x_bounds,
        head_bounds,
        eff_bounds,
    }
}

fn padded_bounds(values: impl Iterator<Item = f64>) -> [f64; 2] {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values {
        min = min.min(v);
        max = max.max(v);
    }
    if !min.is_finite() || !max.is_finite() || max <= min {
        min = 0.0;
        max = 1.0;
    }

    let pad = ((max - min).abs() * 0.05).max(1e-12);
    [min - pad, max + pad]
}

fn fmt_axis(v: f64) -> String {
    format!("{v:.1}")
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    // The right inset reserves room for the efficiency tick labels.
    let insets = AxisInsets {
        left: 8,
        right: 7,
        top: 1,
        bottom: 2,
    };

    if inner.width <= insets.left + insets.right + 10
        || inner.height <= insets.top + insets.bottom + 5
    {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

fn draw_axis_ticks(
    frame: &mut ratatui::Frame<'_>,
    inner: Rect,
    chart: Rect,
    insets: AxisInsets,
    x_bounds: [f64; 2],
    head_bounds: [f64; 2],
    eff_bounds: [f64; 2],
) {
    let ticks = 5usize;
    let style = Style::default().fg(Color::Gray);

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let x_val = x_bounds[0] + u * (x_bounds[1] - x_bounds[0]);
        let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
        let label = format!("{x_val:.0}");
        let label_len = label.len() as u16;
        let start = x.saturating_sub((label.len() / 2) as u16);
        let y = chart.y + chart.height;
        if y >= inner.y + inner.height - 1 {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    // Left ticks: head. Right ticks: efficiency (same rows, its own scale).
    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let head_val = head_bounds[0] + u * (head_bounds[1] - head_bounds[0]);
        let eff_val = eff_bounds[0] + u * (eff_bounds[1] - eff_bounds[0]);
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;

        let label = format!("{head_val:.0}");
        let label_len = label.len() as u16;
        let x = inner.x + insets.left.saturating_sub(1);
        let start = x.saturating_sub(label.len() as u16);
        if start >= inner.x {
            frame.render_widget(
                Paragraph::new(label).style(style),
                Rect {
                    x: start,
                    y,
                    width: label_len,
                    height: 1,
                },
            );
        }

        let label = format!("{eff_val:.0}");
        let label_len = label.len() as u16;
        let start = chart.x + chart.width + 1;
        if start + label_len <= inner.x + inner.width {
            frame.render_widget(
                Paragraph::new(label).style(style),
                Rect {
                    x: start,
                    y,
                    width: label_len,
                    height: 1,
                },
            );
        }
    }

    let x_label = Paragraph::new("flow")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
    let x_rect = Rect {
        x: chart.x,
        y: chart.y + chart.height + 1,
        width: chart.width,
        height: 1,
    };
    if x_rect.y < inner.y + inner.height {
        frame.render_widget(x_label, x_rect);
    }

    let y_label = Paragraph::new("head")
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));
    let y_rect = Rect {
        x: inner.x,
        y: inner.y,
        width: insets.left.saturating_sub(1),
        height: 1,
    };
    frame.render_widget(y_label, y_rect);

    let e_label = Paragraph::new("eff %")
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    let e_rect = Rect {
        x: chart.x + chart.width + 1,
        y: inner.y,
        width: insets.right.saturating_sub(1),
        height: 1,
    };
    if e_rect.x + e_rect.width <= inner.x + inner.width {
        frame.render_widget(e_label, e_rect);
    }
}
