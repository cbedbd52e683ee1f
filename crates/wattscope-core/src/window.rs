//! Fixed-capacity sliding windows behind the live charts.
//!
//! Every chart keeps the most recent [`MAX_POINTS`] samples. Eviction is
//! strictly one-in-one-out: a push beyond capacity drops exactly the oldest
//! point from the tick track and from every series in the same call, so all
//! tracks stay the same length and stay aligned to the same poll ticks.

use std::collections::VecDeque;

/// Points retained per chart, roughly one minute at the default poll rate.
pub const MAX_POINTS: usize = 60;

// ---------------------------------------------------------------------------
// SeriesWindow
// ---------------------------------------------------------------------------

/// One bounded series of samples, oldest first.
///
/// Mutation happens only through the owning [`ChartWindow`], which keeps
/// every series in lockstep with the tick track.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesWindow {
    samples: VecDeque<f64>,
}

impl SeriesWindow {
    fn push(&mut self, value: f64) {
        self.samples.push_back(value);
    }

    fn evict_oldest(&mut self) {
        self.samples.pop_front();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn latest(&self) -> Option<f64> {
        self.samples.back().copied()
    }

    pub fn oldest(&self) -> Option<f64> {
        self.samples.front().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().copied()
    }
}

// ---------------------------------------------------------------------------
// ChartWindow
// ---------------------------------------------------------------------------

/// A tick track plus N aligned series, capped at [`MAX_POINTS`].
///
/// The tick track stores the poll sequence number of every retained point
/// and doubles as the chart's X axis.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartWindow {
    ticks: VecDeque<u64>,
    series: Vec<SeriesWindow>,
    capacity: usize,
}

impl ChartWindow {
    /// Empty window holding `series_count` aligned series.
    pub fn new(series_count: usize) -> Self {
        Self::with_capacity(series_count, MAX_POINTS)
    }

    /// Non-default capacity, used by tests and small panels.
    pub fn with_capacity(series_count: usize, capacity: usize) -> Self {
        assert!(series_count > 0, "chart needs at least one series");
        assert!(capacity > 0, "chart needs room for at least one point");
        Self {
            ticks: VecDeque::with_capacity(capacity + 1),
            series: vec![SeriesWindow::default(); series_count],
            capacity,
        }
    }

    /// Append one point to every series.
    ///
    /// `values` must hold exactly one value per series; a mismatch is a
    /// programming error, not a runtime condition. When the window is full
    /// the oldest point falls off every track before this call returns.
    pub fn push(&mut self, tick: u64, values: &[f64]) {
        assert_eq!(
            values.len(),
            self.series.len(),
            "chart holds {} series but push got {} values",
            self.series.len(),
            values.len()
        );
        self.ticks.push_back(tick);
        for (track, &value) in self.series.iter_mut().zip(values) {
            track.push(value);
        }
        if self.ticks.len() > self.capacity {
            self.ticks.pop_front();
            for track in &mut self.series {
                track.evict_oldest();
            }
        }
    }

    /// Points currently held. Identical across every track.
    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Poll sequence numbers of the retained points, oldest first.
    pub fn ticks(&self) -> impl Iterator<Item = u64> + '_ {
        self.ticks.iter().copied()
    }

    /// One series' samples, oldest first.
    pub fn series_values(&self, idx: usize) -> Vec<f64> {
        self.series[idx].iter().collect()
    }

    /// `(tick, value)` pairs for one series, ready for a line chart.
    pub fn series_points(&self, idx: usize) -> Vec<(f64, f64)> {
        self.ticks
            .iter()
            .zip(self.series[idx].iter())
            .map(|(&tick, value)| (tick as f64, value))
            .collect()
    }

    /// Min and max across every series, for Y axis bounds.
    pub fn value_bounds(&self) -> Option<(f64, f64)> {
        let mut bounds: Option<(f64, f64)> = None;
        for track in &self.series {
            for value in track.iter() {
                bounds = Some(match bounds {
                    Some((lo, hi)) => (lo.min(value), hi.max(value)),
                    None => (value, value),
                });
            }
        }
        bounds
    }

    /// First and last retained tick, for X axis bounds.
    pub fn tick_bounds(&self) -> Option<(u64, u64)> {
        Some((*self.ticks.front()?, *self.ticks.back()?))
    }
}

// ---------------------------------------------------------------------------
// CumulativeEnergy
// ---------------------------------------------------------------------------

/// Latest accumulated energy per meter.
///
/// Replaced outright each successful tick. The energy split panel shows the
/// current balance only, so there is no history to window.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CumulativeEnergy {
    pub a_kwh: f64,
    pub b_kwh: f64,
}

impl CumulativeEnergy {
    pub fn replace(&mut self, a_kwh: f64, b_kwh: f64) {
        self.a_kwh = a_kwh;
        self.b_kwh = b_kwh;
    }

    /// Each meter's fraction of the total, or `None` while both read zero.
    pub fn shares(&self) -> Option<(f64, f64)> {
        let total = self.a_kwh + self.b_kwh;
        if total <= 0.0 {
            return None;
        }
        Some((self.a_kwh / total, self.b_kwh / total))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_keeps_tracks_aligned() {
        let mut win = ChartWindow::new(3);
        for tick in 1..=75u64 {
            let t = tick as f64;
            win.push(tick, &[t, t * 2.0, t * 3.0]);
            assert!(win.len() <= MAX_POINTS);
            for idx in 0..3 {
                assert_eq!(
                    win.series_values(idx).len(),
                    win.len(),
                    "series {idx} out of lockstep after tick {tick}"
                );
            }
        }
        assert_eq!(win.len(), MAX_POINTS);
    }

    #[test]
    fn eviction_is_one_in_one_out() {
        let mut win = ChartWindow::with_capacity(2, 3);
        for tick in 1..=5u64 {
            win.push(tick, &[tick as f64, -(tick as f64)]);
        }
        assert_eq!(win.len(), 3);
        assert_eq!(win.ticks().collect::<Vec<_>>(), vec![3, 4, 5]);
        assert_eq!(win.series_values(0), vec![3.0, 4.0, 5.0]);
        assert_eq!(win.series_values(1), vec![-3.0, -4.0, -5.0]);
    }

    #[test]
    fn sixty_one_pushes_keep_the_last_sixty() {
        let mut win = ChartWindow::new(1);
        for tick in 1..=61u64 {
            win.push(tick, &[tick as f64]);
        }
        assert_eq!(win.len(), 60);
        assert_eq!(win.series_values(0).first(), Some(&2.0));
        assert_eq!(win.series_values(0).last(), Some(&61.0));
        assert_eq!(win.tick_bounds(), Some((2, 61)));
    }

    #[test]
    #[should_panic(expected = "chart holds 3 series")]
    fn push_with_wrong_arity_panics() {
        let mut win = ChartWindow::new(3);
        win.push(1, &[1.0, 2.0]);
    }

    #[test]
    fn series_points_pair_ticks_with_values() {
        let mut win = ChartWindow::new(2);
        win.push(10, &[1.0, 4.0]);
        win.push(11, &[2.0, 5.0]);
        assert_eq!(win.series_points(0), vec![(10.0, 1.0), (11.0, 2.0)]);
        assert_eq!(win.series_points(1), vec![(10.0, 4.0), (11.0, 5.0)]);
    }

    #[test]
    fn value_bounds_span_every_series() {
        let mut win = ChartWindow::new(2);
        assert_eq!(win.value_bounds(), None);
        win.push(1, &[5.0, -2.0]);
        win.push(2, &[7.5, 0.0]);
        assert_eq!(win.value_bounds(), Some((-2.0, 7.5)));
    }

    #[test]
    fn energy_replace_discards_history() {
        let mut energy = CumulativeEnergy::default();
        energy.replace(9.0, 9.0);
        energy.replace(1.0, 3.0);
        assert_eq!(energy.a_kwh, 1.0);
        assert_eq!(energy.b_kwh, 3.0);
        let (a, b) = energy.shares().unwrap();
        assert!((a - 0.25).abs() < 1e-12);
        assert!((b - 0.75).abs() < 1e-12);
    }

    #[test]
    fn energy_shares_undefined_at_zero() {
        assert_eq!(CumulativeEnergy::default().shares(), None);
    }
}
