//! Blocking HTTP client bound to one meter device.
//!
//! Two endpoints matter: `GET /data` returns the two-meter snapshot, and
//! `POST /reset/{meter}/{kwh}` rebaselines one meter's energy accumulator.
//! Reset is fire-and-forget: any delivered response counts as accepted, and
//! only a transport failure surfaces as an error.

use crate::error::FetchError;
use crate::telemetry::{MeterId, TelemetrySnapshot};

/// Address the device answers on when nothing else is configured.
pub const DEFAULT_DEVICE_URL: &str = "http://192.168.0.24";

/// HTTP client for a single device.
///
/// Uses the transport's default timeout; the poller's skip-and-continue
/// policy handles slow or absent devices, so no shorter deadline is set.
pub struct DeviceClient {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl DeviceClient {
    /// Client for the device at `base_url` (trailing slashes ignored).
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            http: reqwest::blocking::Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch one snapshot of both meters.
    pub fn fetch_snapshot(&self) -> Result<TelemetrySnapshot, FetchError> {
        let url = format!("{}/data", self.base_url);
        log::debug!("GET {url}");
        let resp = self.http.get(&url).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        let body = resp.text()?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Rebaseline one meter's accumulated energy.
    ///
    /// The device applies the new baseline on its side; chart state is never
    /// written here. The next successful poll reflects the change.
    pub fn send_reset(&self, meter: MeterId, initial_kwh: f64) -> Result<(), FetchError> {
        let url = format!("{}{}", self.base_url, reset_path(meter, initial_kwh));
        log::debug!("POST {url}");
        self.http.post(&url).send()?;
        Ok(())
    }
}

/// Path of the reset command for `meter`.
///
/// The kWh segment is the shortest decimal for the value, so whole numbers
/// carry no decimal point: `5.0` becomes `/reset/B/5`.
pub fn reset_path(meter: MeterId, initial_kwh: f64) -> String {
    format!("/reset/{meter}/{initial_kwh}")
}

/// Interpret operator input for the reset form.
///
/// Empty, unparsable, or non-finite input falls back to a baseline of zero.
pub fn parse_initial_kwh(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}
