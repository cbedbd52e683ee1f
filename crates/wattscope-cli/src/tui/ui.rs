//! TUI rendering — charts left to right, meters before the comparison.
//!
//! ┌───────────────────────────────────────────────────┐
//! │  ⚡ wattscope   watching: http://…   #42  18ms ⟳  │
//! ├─────────────────────────┬─────────────────────────┤
//! │  Meter A · 1.042 kWh    │  Meter B · 3.310 kWh    │
//! │  ⠉⠒⠤⣀ power series      │  ⣀⠤⠒⠉ power series      │
//! ├─────────────────────────┴─────────────────────────┤
//! │  A vs B · all six power series          (Watts)   │
//! ├───────────────────────────────┬───────────────────┤
//! │  Energy split  [████▏    ]    │  Reset form       │
//! ├───────────────────────────────┴───────────────────┤
//! │  q: quit   p: pause   [ ]: slower/faster   r: …   │
//! └───────────────────────────────────────────────────┘

use ratatui::{prelude::*, widgets::*};

use wattscope_core::{ChartWindow, MeterId, POWER_SERIES, format_watts};

use super::app::{App, InputMode, Snapshot};

// Light to dark per series: Inst, Win, Avg.
const METER_A_COLORS: [Color; 3] = [
    Color::Rgb(187, 222, 251),
    Color::Rgb(30, 136, 229),
    Color::Rgb(13, 71, 161),
];
const METER_B_COLORS: [Color; 3] = [
    Color::Rgb(255, 224, 178),
    Color::Rgb(251, 140, 0),
    Color::Rgb(230, 81, 0),
];

pub fn draw(f: &mut Frame, app: &App) {
    let snap = app.snapshot();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // title
            Constraint::Min(9),    // per-meter charts
            Constraint::Min(9),    // comparison chart
            Constraint::Length(4), // energy split + reset form
            Constraint::Length(1), // keys
        ])
        .split(f.area());

    draw_title(f, rows[0], app, &snap);
    draw_meters(f, rows[1], &snap);
    draw_comparison(f, rows[2], &snap);
    draw_bottom(f, rows[3], app, &snap);
    draw_keys(f, rows[4], app);
}

fn draw_title(f: &mut Frame, area: Rect, app: &App, snap: &Snapshot) {
    let stats = &snap.stats;
    let spin = if stats.fetching { " ⟳" } else { "" };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Line::from(vec![
            Span::styled(" ⚡ wattscope ", Style::default().bold().fg(Color::Cyan)),
            Span::raw("  watching: "),
            Span::styled(
                app.device_url().to_string(),
                Style::default().bold().fg(Color::Yellow),
            ),
            Span::styled(
                format!("  #{}  {}ms{spin} ", stats.ticks, stats.last_latency_ms),
                Style::default().fg(Color::DarkGray),
            ),
        ]));

    let mut spans = vec![Span::raw(format!(
        " every {}ms   applied {}   failed {}   dropped {}",
        app.interval_ms(),
        stats.applied,
        stats.failed,
        stats.dropped
    ))];
    if app.is_paused() {
        spans.push(Span::styled(
            "   ⏸ paused",
            Style::default().bold().fg(Color::Yellow),
        ));
    }
    if let Some(err) = &stats.last_failure {
        spans.push(Span::styled(
            format!("   {err}"),
            Style::default().fg(Color::Red),
        ));
    } else if let Some(msg) = &snap.reset_status {
        let style = if msg.starts_with("reset not delivered") {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::Green)
        };
        spans.push(Span::styled(format!("   {msg}"), style));
    }

    let p = Paragraph::new(Line::from(spans)).block(block);
    f.render_widget(p, area);
}

fn draw_meters(f: &mut Frame, area: Rect, snap: &Snapshot) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let charts = &snap.charts;
    draw_meter_chart(f, cols[0], MeterId::A, &charts.meter_a, &charts.readout_a);
    draw_meter_chart(f, cols[1], MeterId::B, &charts.meter_b, &charts.readout_b);
}

fn draw_meter_chart(f: &mut Frame, area: Rect, meter: MeterId, window: &ChartWindow, readout: &str) {
    if window.is_empty() {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" Meter {meter} "));
        let p = Paragraph::new("Waiting for the first sample…")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(p, area);
        return;
    }

    let colors = match meter {
        MeterId::A => &METER_A_COLORS,
        MeterId::B => &METER_B_COLORS,
    };

    let series: Vec<Vec<(f64, f64)>> = (0..window.series_count())
        .map(|i| window.series_points(i))
        .collect();
    let latest = series[0].last().map(|p| p.1).unwrap_or(0.0);

    let datasets: Vec<Dataset> = series
        .iter()
        .enumerate()
        .map(|(i, data)| {
            Dataset::default()
                .name(POWER_SERIES[i])
                .marker(symbols::Marker::Braille)
                .style(Style::default().fg(colors[i]))
                .data(data)
        })
        .collect();

    let (x_min, x_max) = x_bounds(window);
    let (y_min, y_max) = padded_y_bounds(window);

    let chart = Chart::new(datasets)
        .block(Block::default().borders(Borders::ALL).title(format!(
            " Meter {meter} · {} · {readout} kWh ",
            format_watts(latest)
        )))
        .x_axis(Axis::default().bounds([x_min, x_max]).labels(vec![
            Line::from(format!("#{x_min:.0}")),
            Line::from(format!("#{x_max:.0}")),
        ]))
        .y_axis(Axis::default().bounds([y_min, y_max]).labels(vec![
            Line::from(format_watts(y_min)),
            Line::from(format_watts(y_max)),
        ]));

    f.render_widget(chart, area);
}

fn draw_comparison(f: &mut Frame, area: Rect, snap: &Snapshot) {
    let window = &snap.charts.comparison;

    if window.is_empty() {
        let block = Block::default().borders(Borders::ALL).title(" A vs B ");
        let p = Paragraph::new("Waiting for the first sample…")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(p, area);
        return;
    }

    let names = comparison_labels();
    let colors: Vec<Color> = METER_A_COLORS
        .iter()
        .chain(&METER_B_COLORS)
        .copied()
        .collect();

    let series: Vec<Vec<(f64, f64)>> = (0..window.series_count())
        .map(|i| window.series_points(i))
        .collect();

    let datasets: Vec<Dataset> = series
        .iter()
        .enumerate()
        .map(|(i, data)| {
            Dataset::default()
                .name(names[i].clone())
                .marker(symbols::Marker::Braille)
                .style(Style::default().fg(colors[i]))
                .data(data)
        })
        .collect();

    let (x_min, x_max) = x_bounds(window);
    let (y_min, y_max) = padded_y_bounds(window);

    let chart = Chart::new(datasets)
        .block(Block::default().borders(Borders::ALL).title(" A vs B "))
        .hidden_legend_constraints((Constraint::Ratio(1, 3), Constraint::Ratio(1, 3)))
        .x_axis(Axis::default().bounds([x_min, x_max]).labels(vec![
            Line::from(format!("#{x_min:.0}")),
            Line::from(format!("#{x_max:.0}")),
        ]))
        .y_axis(
            Axis::default()
                .title("Watts")
                .bounds([y_min, y_max])
                .labels(vec![
                    Line::from(format_watts(y_min)),
                    Line::from(format_watts(y_max)),
                ]),
        );

    f.render_widget(chart, area);
}

fn draw_bottom(f: &mut Frame, area: Rect, app: &App, snap: &Snapshot) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    draw_energy(f, cols[0], snap);
    draw_reset_form(f, cols[1], app);
}

fn draw_energy(f: &mut Frame, area: Rect, snap: &Snapshot) {
    let block = Block::default().borders(Borders::ALL).title(" Energy split ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let charts = &snap.charts;
    match charts.energy.shares() {
        Some((a, b)) => {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(1), Constraint::Length(1)])
                .split(inner);

            // A negative baseline can push a share outside [0, 1], which
            // Gauge::ratio rejects.
            let gauge_a = Gauge::default()
                .ratio(a.clamp(0.0, 1.0))
                .gauge_style(Style::default().fg(METER_A_COLORS[1]).bg(Color::DarkGray))
                .label(format!("A  {} kWh  {:.0}%", charts.readout_a, a * 100.0));
            f.render_widget(gauge_a, rows[0]);

            let gauge_b = Gauge::default()
                .ratio(b.clamp(0.0, 1.0))
                .gauge_style(Style::default().fg(METER_B_COLORS[1]).bg(Color::DarkGray))
                .label(format!("B  {} kWh  {:.0}%", charts.readout_b, b * 100.0));
            f.render_widget(gauge_b, rows[1]);
        }
        None => {
            let p = Paragraph::new("No energy recorded yet")
                .style(Style::default().fg(Color::DarkGray));
            f.render_widget(p, inner);
        }
    }
}

fn draw_reset_form(f: &mut Frame, area: Rect, app: &App) {
    let editing = app.input_mode() == InputMode::ResetEntry;
    let border = if editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(" Reset ");

    let lines = if editing {
        vec![
            Line::from(vec![
                Span::raw(" meter "),
                Span::styled(
                    app.reset_meter().to_string(),
                    Style::default().bold().fg(Color::Yellow),
                ),
                Span::styled("  (m toggles)", Style::default().fg(Color::DarkGray)),
            ]),
            Line::from(vec![
                Span::raw(" kWh "),
                Span::styled(format!("{}▏", app.reset_input()), Style::default().bold()),
            ]),
        ]
    } else {
        vec![Line::from(Span::styled(
            " r rebaselines a meter's kWh counter",
            Style::default().fg(Color::DarkGray),
        ))]
    };

    let p = Paragraph::new(lines).block(block);
    f.render_widget(p, area);
}

fn draw_keys(f: &mut Frame, area: Rect, app: &App) {
    let text = match app.input_mode() {
        InputMode::Normal => " q: quit   p: pause   [ ]: slower/faster   r: reset a meter",
        InputMode::ResetEntry => " enter: send   esc: cancel   m: switch meter   type a kWh baseline",
    };
    let bar = Paragraph::new(text).style(Style::default().bg(Color::DarkGray).fg(Color::White));
    f.render_widget(bar, area);
}

/// Legend labels for the six-series chart, meter A's trio first.
fn comparison_labels() -> Vec<String> {
    MeterId::ALL
        .iter()
        .flat_map(|meter| POWER_SERIES.iter().map(move |name| format!("{meter} {name}")))
        .collect()
}

/// X axis from the retained tick range, padded so a lone point still spans.
fn x_bounds(window: &ChartWindow) -> (f64, f64) {
    let (lo, hi) = window.tick_bounds().unwrap_or((0, 1));
    (lo as f64, (hi as f64).max(lo as f64 + 1.0))
}

/// Y axis from the value range, padded and floored at zero watts.
fn padded_y_bounds(window: &ChartWindow) -> (f64, f64) {
    let (lo, hi) = window.value_bounds().unwrap_or((0.0, 1.0));
    let pad = ((hi - lo) * 0.1).max(1.0);
    ((lo - pad).max(0.0), hi + pad)
}
