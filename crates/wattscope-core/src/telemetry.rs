//! Wire-format telemetry types for the two-channel meter device.
//!
//! The device reports both meters in one JSON document:
//!
//! ```json
//! {"A": {"w_inst": 120.5, "w_win": 118.2, "avg": 95.1, "kwh": 1.042},
//!  "B": {"w_inst": 802.0, "w_win": 640.8, "avg": 120.9, "kwh": 3.310}}
//! ```
//!
//! All four fields are required per meter. A snapshot missing any of them
//! fails deserialization and the poll counts as failed. JSON cannot encode
//! non-finite numbers, so parsed fields are finite by construction.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Names of the three power series, in chart order.
pub const POWER_SERIES: [&str; 3] = ["Inst", "Win", "Avg"];

// ---------------------------------------------------------------------------
// MeterId
// ---------------------------------------------------------------------------

/// One of the two metered channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeterId {
    A,
    B,
}

impl MeterId {
    /// Both meters, in display order.
    pub const ALL: [MeterId; 2] = [MeterId::A, MeterId::B];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
        }
    }

    /// The other channel.
    pub fn other(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }
}

impl fmt::Display for MeterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MeterId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" | "a" => Ok(Self::A),
            "B" | "b" => Ok(Self::B),
            other => Err(format!("unknown meter {other:?}, expected A or B")),
        }
    }
}

// ---------------------------------------------------------------------------
// Readings
// ---------------------------------------------------------------------------

/// Point-in-time readings for a single meter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeterReading {
    /// Instantaneous power draw, watts.
    pub w_inst: f64,
    /// Power averaged over the device's short window, watts.
    pub w_win: f64,
    /// Long-run average power, watts.
    pub avg: f64,
    /// Accumulated energy since the last rebaseline, kilowatt-hours.
    pub kwh: f64,
}

impl MeterReading {
    /// Chart value vector for this meter, in [`POWER_SERIES`] order.
    ///
    /// Every chart push goes through this projection, so series order is
    /// fixed in exactly one place.
    pub fn power_features(&self) -> [f64; 3] {
        [self.w_inst, self.w_win, self.avg]
    }
}

/// Both meters as reported by one `GET /data`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    #[serde(rename = "A")]
    pub a: MeterReading,
    #[serde(rename = "B")]
    pub b: MeterReading,
}

impl TelemetrySnapshot {
    pub fn reading(&self, meter: MeterId) -> &MeterReading {
        match meter {
            MeterId::A => &self.a,
            MeterId::B => &self.b,
        }
    }

    /// Six-element comparison vector: A's series followed by B's.
    pub fn combined_features(&self) -> [f64; 6] {
        let [a_inst, a_win, a_avg] = self.a.power_features();
        let [b_inst, b_win, b_avg] = self.b.power_features();
        [a_inst, a_win, a_avg, b_inst, b_win, b_avg]
    }
}

/// Format an energy readout with exactly three decimals.
pub fn format_kwh(kwh: f64) -> String {
    format!("{kwh:.3}")
}

/// Format a power figure for display, switching to kilowatts past 1 kW.
pub fn format_watts(w: f64) -> String {
    if w.abs() >= 1000.0 {
        format!("{:.2} kW", w / 1000.0)
    } else {
        format!("{w:.1} W")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const WIRE: &str = r#"{
        "A": {"w_inst": 120.5, "w_win": 118.2, "avg": 95.1, "kwh": 1.042},
        "B": {"w_inst": 802.0, "w_win": 640.8, "avg": 120.9, "kwh": 3.310}
    }"#;

    #[test]
    fn snapshot_parses_device_wire_format() {
        let snap: TelemetrySnapshot = serde_json::from_str(WIRE).unwrap();
        assert_eq!(snap.a.w_inst, 120.5);
        assert_eq!(snap.b.kwh, 3.310);
        assert_eq!(snap.reading(MeterId::B).avg, 120.9);
    }

    #[test]
    fn snapshot_rejects_missing_field() {
        let body = r#"{"A": {"w_inst": 1.0, "w_win": 1.0, "avg": 1.0},
                       "B": {"w_inst": 1.0, "w_win": 1.0, "avg": 1.0, "kwh": 0.0}}"#;
        assert!(serde_json::from_str::<TelemetrySnapshot>(body).is_err());
    }

    #[test]
    fn snapshot_rejects_missing_meter() {
        let body = r#"{"A": {"w_inst": 1.0, "w_win": 1.0, "avg": 1.0, "kwh": 0.0}}"#;
        assert!(serde_json::from_str::<TelemetrySnapshot>(body).is_err());
    }

    #[test]
    fn snapshot_tolerates_extra_fields() {
        let body = r#"{
            "A": {"w_inst": 1.0, "w_win": 2.0, "avg": 3.0, "kwh": 4.0, "hz": 50.1},
            "B": {"w_inst": 5.0, "w_win": 6.0, "avg": 7.0, "kwh": 8.0},
            "uptime_s": 12
        }"#;
        let snap: TelemetrySnapshot = serde_json::from_str(body).unwrap();
        assert_eq!(snap.a.kwh, 4.0);
    }

    #[test]
    fn power_features_follow_series_order() {
        let snap: TelemetrySnapshot = serde_json::from_str(WIRE).unwrap();
        assert_eq!(snap.a.power_features(), [120.5, 118.2, 95.1]);
        assert_eq!(POWER_SERIES, ["Inst", "Win", "Avg"]);
    }

    #[test]
    fn combined_features_are_a_then_b() {
        let snap: TelemetrySnapshot = serde_json::from_str(WIRE).unwrap();
        assert_eq!(
            snap.combined_features(),
            [120.5, 118.2, 95.1, 802.0, 640.8, 120.9]
        );
    }

    #[test]
    fn meter_id_round_trips() {
        for meter in MeterId::ALL {
            assert_eq!(meter.as_str().parse::<MeterId>().unwrap(), meter);
        }
        assert_eq!("b".parse::<MeterId>().unwrap(), MeterId::B);
        assert!("C".parse::<MeterId>().is_err());
        assert_eq!(MeterId::A.other(), MeterId::B);
    }

    #[test]
    fn readout_has_exactly_three_decimals() {
        assert_eq!(format_kwh(12.3456), "12.346");
        assert_eq!(format_kwh(0.0), "0.000");
        assert_eq!(format_kwh(5.0), "5.000");
    }

    #[test]
    fn watts_switch_to_kilowatts_past_one_kw() {
        assert_eq!(format_watts(802.0), "802.0 W");
        assert_eq!(format_watts(0.0), "0.0 W");
        assert_eq!(format_watts(2350.0), "2.35 kW");
    }
}
