pub mod reset;
pub mod simulate;
pub mod status;
pub mod watch;

use std::fmt::Write;

use wattscope_core::{MeterId, TelemetrySnapshot, format_kwh, format_watts};

/// Render one snapshot as the `status` table.
///
/// Column order matches the chart series order: instantaneous, windowed,
/// long-run average, then the energy counter.
pub fn render_status_table(snap: &TelemetrySnapshot) -> String {
    let mut out = String::new();
    writeln!(out, "  meter        inst         win         avg         kWh").unwrap();
    for meter in MeterId::ALL {
        let r = snap.reading(meter);
        writeln!(
            out,
            "  {:<5} {:>11} {:>11} {:>11} {:>11}",
            meter,
            format_watts(r.w_inst),
            format_watts(r.w_win),
            format_watts(r.avg),
            format_kwh(r.kwh),
        )
        .unwrap();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    use wattscope_core::MeterReading;

    fn sample() -> TelemetrySnapshot {
        TelemetrySnapshot {
            a: MeterReading { w_inst: 120.5, w_win: 118.2, avg: 95.1, kwh: 1.042 },
            b: MeterReading { w_inst: 2350.0, w_win: 640.8, avg: 120.9, kwh: 3.310 },
        }
    }

    // -----------------------------------------------------------------------
    // render_status_table tests
    // -----------------------------------------------------------------------

    #[test]
    fn test_table_has_header_and_both_meters() {
        let table = render_status_table(&sample());
        assert_eq!(table.lines().count(), 3);
        assert!(table.lines().nth(1).unwrap().contains("A"));
        assert!(table.lines().nth(2).unwrap().contains("B"));
    }

    #[test]
    fn test_table_formats_energy_with_three_decimals() {
        let table = render_status_table(&sample());
        assert!(table.contains("1.042"));
        assert!(table.contains("3.310"));
    }

    #[test]
    fn test_table_switches_units_per_cell() {
        let table = render_status_table(&sample());
        assert!(table.contains("120.5 W"));
        assert!(table.contains("2.35 kW"));
    }
}
