//! # wattscope-core
//!
//! **Live telemetry pipeline for two-channel energy monitors.**
//!
//! `wattscope-core` polls a meter device for instantaneous power, windowed
//! power, long-run average, and accumulated energy on two channels, and
//! maintains the synchronized sliding-window chart state a dashboard renders
//! from. Rendering itself lives elsewhere; this crate ends at arrays of
//! numbers.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::{Arc, Mutex};
//! use wattscope_core::{DashboardState, DeviceClient, TelemetryPoller};
//!
//! let state = Arc::new(Mutex::new(DashboardState::default()));
//! let mut poller = TelemetryPoller::new(
//!     DeviceClient::new("http://192.168.0.24"),
//!     Arc::clone(&state),
//! );
//!
//! // Call once per second from your event loop.
//! poller.tick();
//!
//! let s = state.lock().unwrap();
//! println!("meter A: {} kWh", s.charts.readout_a);
//! ```
//!
//! ## Architecture
//!
//! Device `/data` → [`DeviceClient`] → [`TelemetryPoller`] → [`ChartState`]
//!
//! One fetch at a time: a tick that lands while the previous fetch is still
//! outstanding is dropped and counted, never queued. A tick that fails to
//! produce a snapshot changes nothing on screen. Every chart keeps exactly
//! the last [`MAX_POINTS`] samples, one-in-one-out.

pub mod client;
pub mod error;
pub mod poller;
pub mod state;
pub mod telemetry;
pub mod window;

pub use client::{DEFAULT_DEVICE_URL, DeviceClient, parse_initial_kwh, reset_path};
pub use error::FetchError;
pub use poller::{INTERVAL_MS, TelemetryPoller, lock_state};
pub use state::{ChartState, DashboardState, PollStats};
pub use telemetry::{
    MeterId, MeterReading, POWER_SERIES, TelemetrySnapshot, format_kwh, format_watts,
};
pub use window::{ChartWindow, CumulativeEnergy, MAX_POINTS, SeriesWindow};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
