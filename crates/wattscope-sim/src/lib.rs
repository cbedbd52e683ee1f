//! Synthetic two-channel meter device.
//!
//! Serves the same HTTP surface as the real monitor: `GET /data` for the
//! two-meter snapshot and `POST /reset/{meter}/{kwh}` for rebaselining.
//! Readings are a sinusoidal load profile plus jitter per channel, with a
//! short rolling window for `w_win`, a running mean for `avg`, and energy
//! integrated from instantaneous power between requests.
//!
//! Two extra endpoints exist for tests only: `POST /sim/fail/{n}` makes the
//! next n data requests answer 500, and `POST /sim/lag/{ms}` delays every
//! data response, which is how the dashboard's skip-and-continue and
//! overlap-drop policies get exercised over real HTTP.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use rand::Rng;
use tokio::sync::Mutex;

use wattscope_core::{MeterId, MeterReading, TelemetrySnapshot};

/// Samples in the device's short power window.
const WIN_SAMPLES: usize = 10;

// ---------------------------------------------------------------------------
// SimChannel
// ---------------------------------------------------------------------------

/// One synthetic metering channel.
pub struct SimChannel {
    base_w: f64,
    swing_w: f64,
    period_s: f64,
    noise_w: f64,
    window: VecDeque<f64>,
    sum_w: f64,
    samples: u64,
    kwh: f64,
    started: Instant,
    last_sample: Instant,
}

impl SimChannel {
    /// Channel producing `base_w` watts with a sinusoidal swing of
    /// `swing_w` over `period_s` seconds, plus up to `noise_w` of jitter.
    pub fn new(base_w: f64, swing_w: f64, period_s: f64, noise_w: f64) -> Self {
        let now = Instant::now();
        Self {
            base_w,
            swing_w,
            period_s,
            noise_w,
            window: VecDeque::with_capacity(WIN_SAMPLES + 1),
            sum_w: 0.0,
            samples: 0,
            kwh: 0.0,
            started: now,
            last_sample: now,
        }
    }

    /// Advance the channel to `now` and report its readings.
    ///
    /// Energy accumulates from the power draw over the elapsed interval, so
    /// infrequent polling still integrates to sane kWh totals.
    pub fn sample(&mut self, now: Instant) -> MeterReading {
        let t = now.duration_since(self.started).as_secs_f64();
        let dt = now.duration_since(self.last_sample).as_secs_f64();
        self.last_sample = now;

        let phase = (t / self.period_s) * std::f64::consts::TAU;
        let jitter = rand::rng().random_range(-1.0..=1.0) * self.noise_w;
        let w_inst = (self.base_w + self.swing_w * phase.sin() + jitter).max(0.0);

        // W * s -> kWh
        self.kwh += w_inst * dt / 3_600_000.0;

        self.window.push_back(w_inst);
        if self.window.len() > WIN_SAMPLES {
            self.window.pop_front();
        }
        let w_win = self.window.iter().sum::<f64>() / self.window.len() as f64;

        self.samples += 1;
        self.sum_w += w_inst;
        let avg = self.sum_w / self.samples as f64;

        MeterReading {
            w_inst,
            w_win,
            avg,
            kwh: self.kwh,
        }
    }

    /// Upper bound on any `w_inst` this channel can produce.
    pub fn peak_w(&self) -> f64 {
        self.base_w + self.swing_w + self.noise_w
    }
}

// ---------------------------------------------------------------------------
// SimDevice
// ---------------------------------------------------------------------------

/// Both channels plus the test-only fault switches.
pub struct SimDevice {
    a: SimChannel,
    b: SimChannel,
    fail_next: u32,
    lag_ms: u64,
    data_requests: u64,
}

impl SimDevice {
    pub fn new(a: SimChannel, b: SimChannel) -> Self {
        Self {
            a,
            b,
            fail_next: 0,
            lag_ms: 0,
            data_requests: 0,
        }
    }

    /// Sample both channels at the same instant.
    pub fn sample(&mut self) -> TelemetrySnapshot {
        let now = Instant::now();
        TelemetrySnapshot {
            a: self.a.sample(now),
            b: self.b.sample(now),
        }
    }

    /// Set one meter's energy accumulator, as the reset command does.
    pub fn rebaseline(&mut self, meter: MeterId, kwh: f64) {
        match meter {
            MeterId::A => self.a.kwh = kwh,
            MeterId::B => self.b.kwh = kwh,
        }
    }

    pub fn data_requests(&self) -> u64 {
        self.data_requests
    }
}

/// The stock demo device: channel A is a household base load, channel B a
/// heavier intermittent load, so the two traces are visibly different.
pub fn default_device() -> SimDevice {
    SimDevice::new(
        SimChannel::new(180.0, 60.0, 60.0, 12.0),
        SimChannel::new(90.0, 350.0, 37.0, 25.0),
    )
}

// ---------------------------------------------------------------------------
// HTTP surface
// ---------------------------------------------------------------------------

struct AppState {
    device: Mutex<SimDevice>,
}

async fn handle_data(State(state): State<Arc<AppState>>) -> Response {
    let lag_ms = state.device.lock().await.lag_ms;
    if lag_ms > 0 {
        tokio::time::sleep(Duration::from_millis(lag_ms)).await;
    }

    let mut dev = state.device.lock().await;
    dev.data_requests += 1;
    if dev.fail_next > 0 {
        dev.fail_next -= 1;
        return (StatusCode::INTERNAL_SERVER_ERROR, "meter offline").into_response();
    }
    Json(dev.sample()).into_response()
}

async fn handle_reset(
    State(state): State<Arc<AppState>>,
    Path((meter, kwh)): Path<(String, String)>,
) -> Response {
    let Ok(meter) = meter.parse::<MeterId>() else {
        return (StatusCode::BAD_REQUEST, "unknown meter").into_response();
    };
    let Ok(kwh) = kwh.parse::<f64>() else {
        return (StatusCode::BAD_REQUEST, "bad kwh value").into_response();
    };
    state.device.lock().await.rebaseline(meter, kwh);
    (StatusCode::OK, "ok").into_response()
}

async fn handle_fail(State(state): State<Arc<AppState>>, Path(n): Path<u32>) -> StatusCode {
    state.device.lock().await.fail_next = n;
    StatusCode::OK
}

async fn handle_lag(State(state): State<Arc<AppState>>, Path(ms): Path<u64>) -> StatusCode {
    state.device.lock().await.lag_ms = ms;
    StatusCode::OK
}

async fn handle_index(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let dev = state.device.lock().await;
    Json(serde_json::json!({
        "name": "wattscope simulated meter",
        "version": wattscope_core::VERSION,
        "data_requests": dev.data_requests,
        "endpoints": {
            "/data": "GET both meters' current readings",
            "/reset/{meter}/{kwh}": "POST to rebaseline one meter's energy",
            "/sim/fail/{n}": "POST to fail the next n data requests",
            "/sim/lag/{ms}": "POST to delay every data response",
        },
    }))
}

/// Build the axum router around one simulated device.
pub fn build_router(device: SimDevice) -> Router {
    let state = Arc::new(AppState {
        device: Mutex::new(device),
    });

    Router::new()
        .route("/", get(handle_index))
        .route("/data", get(handle_data))
        .route("/reset/{meter}/{kwh}", post(handle_reset))
        .route("/sim/fail/{n}", post(handle_fail))
        .route("/sim/lag/{ms}", post(handle_lag))
        .with_state(state)
}

/// Serve `device` on an already-bound listener. Used by tests to get an
/// ephemeral port before the server starts.
pub async fn serve(listener: tokio::net::TcpListener, device: SimDevice) {
    axum::serve(listener, build_router(device)).await.unwrap();
}

/// Bind and run the simulator.
pub async fn run_server(host: &str, port: u16, device: SimDevice) {
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    serve(listener, device).await;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
