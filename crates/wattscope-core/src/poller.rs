//! Tick-driven polling with at most one fetch in flight.
//!
//! The caller owns the cadence (a timer loop calls [`TelemetryPoller::tick`]
//! roughly every [`INTERVAL_MS`]). Each tick either spawns one short-lived
//! fetch worker or, when the previous fetch has not resolved yet, drops the
//! tick and counts it. The fetch itself never holds the state lock; the
//! worker takes the lock once afterwards to apply or record the outcome, so
//! chart updates from different ticks can never interleave.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Instant;

use crate::client::DeviceClient;
use crate::state::DashboardState;

/// Milliseconds between poll ticks at the default cadence.
pub const INTERVAL_MS: u64 = 1000;

/// Drives the sampling cadence against one device.
pub struct TelemetryPoller {
    client: Arc<DeviceClient>,
    state: Arc<Mutex<DashboardState>>,
    in_flight: Arc<AtomicBool>,
    seq: u64,
}

impl TelemetryPoller {
    /// Poller writing into `state`, which the caller constructed and shares
    /// with its renderer.
    pub fn new(client: DeviceClient, state: Arc<Mutex<DashboardState>>) -> Self {
        Self {
            client: Arc::new(client),
            state,
            in_flight: Arc::new(AtomicBool::new(false)),
            seq: 0,
        }
    }

    /// Handle on the client, for callers that also send commands (resets)
    /// to the same device.
    pub fn client(&self) -> Arc<DeviceClient> {
        Arc::clone(&self.client)
    }

    /// True while a fetch worker is still running.
    pub fn in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Relaxed)
    }

    /// Ticks started so far, dropped ones included.
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Drive one tick. Returns false when the tick was dropped because the
    /// previous fetch is still outstanding.
    ///
    /// Only the worker spawned here clears the in-flight flag, and only one
    /// thread calls `tick`, so the flag check cannot race with itself.
    pub fn tick(&mut self) -> bool {
        self.seq += 1;
        let tick = self.seq;

        {
            let mut s = lock_state(&self.state);
            s.stats.ticks = tick;
            if self.in_flight.load(Ordering::Relaxed) {
                s.stats.dropped += 1;
                log::debug!("tick {tick} dropped, fetch still in flight");
                return false;
            }
            s.stats.fetching = true;
        }
        self.in_flight.store(true, Ordering::Relaxed);

        let client = Arc::clone(&self.client);
        let state = Arc::clone(&self.state);
        let flag = Arc::clone(&self.in_flight);

        thread::spawn(move || {
            let started = Instant::now();
            let fetched = client.fetch_snapshot();
            let latency_ms = started.elapsed().as_millis() as u64;

            let mut s = lock_state(&state);
            match fetched {
                Ok(snap) => {
                    s.charts.apply_snapshot(tick, &snap);
                    s.stats.applied += 1;
                    s.stats.last_failure = None;
                }
                Err(err) => {
                    log::warn!("tick {tick}: no data from device ({err})");
                    s.stats.record_failure(&err);
                }
            }
            s.stats.last_latency_ms = latency_ms;
            s.stats.fetching = false;
            drop(s);

            flag.store(false, Ordering::Relaxed);
        });

        true
    }
}

/// Lock the dashboard state, recovering the guard if a worker panicked.
pub fn lock_state(state: &Mutex<DashboardState>) -> MutexGuard<'_, DashboardState> {
    match state.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
