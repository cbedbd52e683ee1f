//! Integration tests for wattscope-core.
//!
//! These drive the real poller against a throwaway HTTP endpoint on a
//! loopback socket, covering the full path: tick → fetch worker → chart
//! state, over actual TCP.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use wattscope_core::{DashboardState, DeviceClient, TelemetryPoller};

const BODY: &str = concat!(
    r#"{"A":{"w_inst":120.5,"w_win":118.2,"avg":95.1,"kwh":1.042},"#,
    r#""B":{"w_inst":802.0,"w_win":640.8,"avg":120.9,"kwh":3.310}}"#
);

/// Serve the given responses on an ephemeral port, one connection each,
/// then stop. Returns the base URL.
fn spawn_device(responses: Vec<(&'static str, String)>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    thread::spawn(move || {
        for (status_line, body) in responses {
            let Ok((mut conn, _)) = listener.accept() else {
                return;
            };
            read_request_head(&mut conn);
            let resp = format!(
                "{status_line}\r\nContent-Type: application/json\r\n\
                 Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = conn.write_all(resp.as_bytes());
        }
    });

    format!("http://{addr}")
}

fn read_request_head(conn: &mut std::net::TcpStream) {
    let _ = conn.set_read_timeout(Some(Duration::from_secs(2)));
    let mut head = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        match conn.read(&mut chunk) {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                head.extend_from_slice(&chunk[..n]);
                if head.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
        }
    }
}

fn wait_idle(poller: &TelemetryPoller) {
    for _ in 0..500 {
        if !poller.in_flight() {
            return;
        }
        thread::sleep(Duration::from_millis(10));
    }
    panic!("fetch worker did not finish");
}

#[test]
fn poll_applies_live_snapshot() {
    let base = spawn_device(vec![("HTTP/1.1 200 OK", BODY.to_string())]);
    let state = Arc::new(Mutex::new(DashboardState::default()));
    let mut poller = TelemetryPoller::new(DeviceClient::new(base), Arc::clone(&state));

    assert!(poller.tick());
    wait_idle(&poller);

    let s = state.lock().unwrap();
    assert_eq!(s.stats.applied, 1);
    assert_eq!(s.stats.failed, 0);
    assert!(!s.stats.fetching);
    assert_eq!(s.charts.meter_a.len(), 1);
    assert_eq!(s.charts.meter_b.len(), 1);
    assert_eq!(s.charts.comparison.len(), 1);
    assert_eq!(s.charts.readout_a, "1.042");
    assert_eq!(s.charts.readout_b, "3.310");
    assert_eq!(s.charts.energy.a_kwh, 1.042);
    assert_eq!(s.charts.comparison.series_values(3), vec![802.0]);
}

#[test]
fn successive_polls_accumulate_in_order() {
    let second = BODY.replace("1.042", "1.050");
    let base = spawn_device(vec![
        ("HTTP/1.1 200 OK", BODY.to_string()),
        ("HTTP/1.1 200 OK", second),
    ]);
    let state = Arc::new(Mutex::new(DashboardState::default()));
    let mut poller = TelemetryPoller::new(DeviceClient::new(base), Arc::clone(&state));

    assert!(poller.tick());
    wait_idle(&poller);
    assert!(poller.tick());
    wait_idle(&poller);

    let s = state.lock().unwrap();
    assert_eq!(s.stats.applied, 2);
    assert_eq!(s.charts.meter_a.len(), 2);
    assert_eq!(s.charts.meter_a.ticks().collect::<Vec<_>>(), [1, 2]);
    assert_eq!(s.charts.readout_a, "1.050");
}

#[test]
fn http_error_skips_the_tick() {
    let base = spawn_device(vec![(
        "HTTP/1.1 500 Internal Server Error",
        String::new(),
    )]);
    let state = Arc::new(Mutex::new(DashboardState::default()));
    let mut poller = TelemetryPoller::new(DeviceClient::new(base), Arc::clone(&state));

    assert!(poller.tick());
    wait_idle(&poller);

    let s = state.lock().unwrap();
    assert_eq!(s.stats.failed, 1);
    assert_eq!(s.stats.applied, 0);
    assert!(s.charts.meter_a.is_empty());
    assert_eq!(
        s.stats.last_failure.as_deref(),
        Some("status: device returned HTTP 500")
    );
}

#[test]
fn garbage_body_skips_the_tick() {
    let base = spawn_device(vec![("HTTP/1.1 200 OK", "not json".to_string())]);
    let state = Arc::new(Mutex::new(DashboardState::default()));
    let mut poller = TelemetryPoller::new(DeviceClient::new(base), Arc::clone(&state));

    assert!(poller.tick());
    wait_idle(&poller);

    let s = state.lock().unwrap();
    assert_eq!(s.stats.failed, 1);
    assert!(s.charts.comparison.is_empty());
    let failure = s.stats.last_failure.as_deref().unwrap_or("");
    assert!(
        failure.starts_with("malformed"),
        "unexpected failure label: {failure}"
    );
}

#[test]
fn recovery_after_failure_resumes_charting() {
    let base = spawn_device(vec![
        ("HTTP/1.1 200 OK", BODY.to_string()),
        ("HTTP/1.1 503 Service Unavailable", String::new()),
        ("HTTP/1.1 200 OK", BODY.replace("1.042", "1.500")),
    ]);
    let state = Arc::new(Mutex::new(DashboardState::default()));
    let mut poller = TelemetryPoller::new(DeviceClient::new(base), Arc::clone(&state));

    for _ in 0..3 {
        assert!(poller.tick());
        wait_idle(&poller);
    }

    let s = state.lock().unwrap();
    assert_eq!(s.stats.ticks, 3);
    assert_eq!(s.stats.applied, 2);
    assert_eq!(s.stats.failed, 1);
    assert_eq!(s.charts.comparison.len(), 2);
    assert_eq!(s.charts.comparison.ticks().collect::<Vec<_>>(), [1, 3]);
    assert_eq!(s.charts.energy.a_kwh, 1.5);
    assert_eq!(s.stats.last_failure, None, "recovery clears the failure");
}
