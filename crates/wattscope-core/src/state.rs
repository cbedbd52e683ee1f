//! Shared dashboard state: the four chart sinks plus poll bookkeeping.
//!
//! [`ChartState`] is the single owner of everything a successful poll
//! changes. The poller worker mutates it under one mutex guard, so a frame
//! captured by the renderer sees either all of a tick's effects or none of
//! them. A failed tick leaves the charts bit-identical.

use crate::error::FetchError;
use crate::telemetry::{TelemetrySnapshot, format_kwh};
use crate::window::{ChartWindow, CumulativeEnergy};

// ---------------------------------------------------------------------------
// ChartState
// ---------------------------------------------------------------------------

/// The four chart sinks and the two formatted energy readouts.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartState {
    /// Meter A power series (Inst, Win, Avg).
    pub meter_a: ChartWindow,
    /// Meter B power series (Inst, Win, Avg).
    pub meter_b: ChartWindow,
    /// Cross-meter comparison: A's three series then B's.
    pub comparison: ChartWindow,
    /// Latest cumulative energy pair, feeding the split panel.
    pub energy: CumulativeEnergy,
    /// Meter A energy readout, always three decimals.
    pub readout_a: String,
    /// Meter B energy readout, always three decimals.
    pub readout_b: String,
}

impl Default for ChartState {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartState {
    pub fn new() -> Self {
        Self {
            meter_a: ChartWindow::new(3),
            meter_b: ChartWindow::new(3),
            comparison: ChartWindow::new(6),
            energy: CumulativeEnergy::default(),
            readout_a: format_kwh(0.0),
            readout_b: format_kwh(0.0),
        }
    }

    /// Apply one successful poll to every sink.
    ///
    /// Order is fixed: meter A chart, meter B chart, comparison chart,
    /// readouts, energy split. The caller holds the state lock across the
    /// whole call.
    pub fn apply_snapshot(&mut self, tick: u64, snap: &TelemetrySnapshot) {
        self.meter_a.push(tick, &snap.a.power_features());
        self.meter_b.push(tick, &snap.b.power_features());
        self.comparison.push(tick, &snap.combined_features());
        self.readout_a = format_kwh(snap.a.kwh);
        self.readout_b = format_kwh(snap.b.kwh);
        self.energy.replace(snap.a.kwh, snap.b.kwh);
    }
}

// ---------------------------------------------------------------------------
// PollStats
// ---------------------------------------------------------------------------

/// Poll loop bookkeeping surfaced in the dashboard header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PollStats {
    /// Ticks handed to the poller, dropped ones included.
    pub ticks: u64,
    /// Ticks whose snapshot reached the charts.
    pub applied: u64,
    /// Ticks that fetched but produced no usable snapshot.
    pub failed: u64,
    /// Ticks skipped because a fetch was still outstanding.
    pub dropped: u64,
    /// Wall time of the most recent completed fetch, milliseconds.
    pub last_latency_ms: u64,
    /// Kind and message of the most recent failure.
    pub last_failure: Option<String>,
    /// True while a fetch worker is running.
    pub fetching: bool,
}

impl PollStats {
    /// Note a failed tick. Chart contents are not touched.
    pub fn record_failure(&mut self, err: &FetchError) {
        self.failed += 1;
        self.last_failure = Some(format!("{}: {err}", err.kind()));
    }
}

/// Everything behind the dashboard's shared mutex.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    pub charts: ChartState,
    pub stats: PollStats,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
