//! ASCII plotting for terminal output.
//!
//! Fixed-size character grid, deterministic output. Each chart is a set of
//! traces drawn as connected lines, optional point markers on top, and an
//! optional shaded time band (used for the exponential-phase window).

use crate::domain::{PhaseWindow, TimeSeries, Trajectory};

/// Fill character for a highlighted time band.
const BAND: char = ':';

/// One curve on a chart.
#[derive(Debug, Clone)]
pub struct Trace<'a> {
    pub label: &'a str,
    pub points: Vec<(f64, f64)>,
    /// Character used for the connecting line.
    pub line: char,
    /// Character stamped on each sample, if any.
    pub marker: Option<char>,
}

impl<'a> Trace<'a> {
    pub fn from_columns(label: &'a str, x: &[f64], y: &[f64], line: char, marker: Option<char>) -> Self {
        Self {
            label,
            points: x.iter().copied().zip(y.iter().copied()).collect(),
            line,
            marker,
        }
    }
}

/// Shaded time interval with a legend label.
#[derive(Debug, Clone, Copy)]
pub struct Band<'a> {
    pub start: f64,
    pub end: f64,
    pub label: &'a str,
}

/// Biomass vs time with the exponential window shaded.
pub fn render_biomass_chart(series: &TimeSeries, window: PhaseWindow, width: usize, height: usize) -> String {
    let trace = Trace::from_columns("biomass (g/L)", series.time(), series.biomass(), '-', Some('o'));
    let band = Band {
        start: window.start,
        end: window.end,
        label: "exponential phase",
    };
    render_chart("Biomass", &[trace], Some(band), width, height)
}

pub fn render_substrate_chart(series: &TimeSeries, width: usize, height: usize) -> String {
    let trace = Trace::from_columns("substrate (g/L)", series.time(), series.substrate(), '-', Some('o'));
    render_chart("Substrate", &[trace], None, width, height)
}

pub fn render_oxygen_chart(series: &TimeSeries, width: usize, height: usize) -> String {
    let trace = Trace::from_columns("dissolved oxygen (%)", series.time(), series.oxygen(), '-', Some('o'));
    render_chart("Oxygen", &[trace], None, width, height)
}

/// All four simulated states on a shared axis, one letter per state.
pub fn render_trajectory_chart(trajectory: &Trajectory, width: usize, height: usize) -> String {
    let t = &trajectory.time;
    let traces = [
        Trace::from_columns("biomass X", t, &trajectory.biomass, 'x', None),
        Trace::from_columns("substrate S", t, &trajectory.substrate, 's', None),
        Trace::from_columns("product P", t, &trajectory.product, 'p', None),
        Trace::from_columns("oxygen O2", t, &trajectory.oxygen, 'o', None),
    ];
    render_chart("Simulation", &traces, None, width, height)
}

/// Render traces onto a `width` x `height` grid with a range header and legend.
pub fn render_chart(title: &str, traces: &[Trace<'_>], band: Option<Band<'_>>, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (t_min, t_max) = x_range(traces).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = y_range(traces).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    if let Some(b) = band {
        let x0 = map_x(b.start, t_min, t_max, width);
        let x1 = map_x(b.end, t_min, t_max, width);
        for row in grid.iter_mut() {
            for cell in &mut row[x0.min(x1)..=x0.max(x1)] {
                *cell = BAND;
            }
        }
    }

    // Lines first so markers overlay them.
    for trace in traces {
        draw_curve(&mut grid, &trace.points, trace.line, t_min, t_max, y_min, y_max);
    }
    for trace in traces {
        if let Some(marker) = trace.marker {
            for &(t, y) in &trace.points {
                if t.is_finite() && y.is_finite() {
                    grid[map_y(y, y_min, y_max, height)][map_x(t, t_min, t_max, width)] = marker;
                }
            }
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "{title}: t=[{t_min:.2}, {t_max:.2}] h | y=[{y_min:.3}, {y_max:.3}]\n"
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    let mut legend: Vec<String> = traces
        .iter()
        .map(|t| format!("{} {}", t.marker.unwrap_or(t.line), t.label))
        .collect();
    if let Some(b) = band {
        legend.push(format!("{BAND} {} [{:.2}, {:.2}] h", b.label, b.start, b.end));
    }
    out.push_str(&legend.join("   "));
    out.push('\n');

    out
}

fn finite_points<'a>(traces: &'a [Trace<'_>]) -> impl Iterator<Item = (f64, f64)> + 'a {
    traces
        .iter()
        .flat_map(|t| t.points.iter().copied())
        .filter(|(t, y)| t.is_finite() && y.is_finite())
}

fn x_range(traces: &[Trace<'_>]) -> Option<(f64, f64)> {
    let (min, max) = finite_points(traces).fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (t, _)| {
        (lo.min(t), hi.max(t))
    });
    if min.is_finite() && max.is_finite() && max > min {
        Some((min, max))
    } else {
        None
    }
}

fn y_range(traces: &[Trace<'_>]) -> Option<(f64, f64)> {
    let (min, max) = finite_points(traces).fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (_, y)| {
        (lo.min(y), hi.max(y))
    });
    if !(min.is_finite() && max.is_finite()) {
        return None;
    }
    if max > min {
        Some((min, max))
    } else {
        // Flat series: centre it.
        Some((min - 0.5, max + 0.5))
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(t: f64, t_min: f64, t_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((t - t_min) / (t_max - t_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(grid: &mut [Vec<char>], curve: &[(f64, f64)], ch: char, t_min: f64, t_max: f64, y_min: f64, y_max: f64) {
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(t, y) in curve {
        if !(t.is_finite() && y.is_finite()) {
            prev = None;
            continue;
        }
        let x = map_x(t, t_min, t_max, width);
        let yy = map_y(y, y_min, y_max, height);
        match prev {
            Some((x0, y0)) => draw_line(grid, x0, y0, x, yy, ch),
            None => put(grid, x as isize, yy as isize, ch),
        }
        prev = Some((x, yy));
    }
}

/// Integer line drawing (Bresenham-ish).
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
        put(grid, x0, y0, ch);

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

/// Write `ch` into an empty or shaded cell; earlier traces keep their cells.
fn put(grid: &mut [Vec<char>], x: isize, y: isize, ch: char) {
    if y < 0 || x < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if let Some(cell) = grid.get_mut(y).and_then(|row| row.get_mut(x)) {
        if *cell == ' ' || *cell == BAND {
            *cell = ch;
        }
    }
}
