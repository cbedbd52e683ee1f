//! TUI application state and event loop.
//!
//! Design: the poller owns the fetch schedule, the UI owns the keyboard.
//! Every interval the loop asks the poller for one tick; fetches run on a
//! background thread so drawing never blocks on the network. Rendering
//! reads a single snapshot of shared state per frame.

use std::io;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;

use wattscope_core::{
    ChartState, DashboardState, DeviceClient, MeterId, PollStats, TelemetryPoller, format_kwh,
    lock_state, parse_initial_kwh,
};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Fastest poll cadence the keys can dial in.
pub const MIN_INTERVAL_MS: u64 = 250;

/// Slowest poll cadence the keys can dial in.
pub const MAX_INTERVAL_MS: u64 = 10_000;

/// Longest kWh value accepted in the reset form.
const MAX_RESET_CHARS: usize = 12;

// ---------------------------------------------------------------------------
// InputMode
// ---------------------------------------------------------------------------

/// Which part of the app currently owns the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing a kWh baseline into the reset form.
    ResetEntry,
}

// ---------------------------------------------------------------------------
// Snapshot — single-lock capture of shared state for UI rendering
// ---------------------------------------------------------------------------

/// All shared state the UI needs, captured once per frame.
pub struct Snapshot {
    pub charts: ChartState,
    pub stats: PollStats,
    /// Outcome of the most recent reset submission, if any.
    pub reset_status: Option<String>,
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    device: String,
    client: Arc<DeviceClient>,
    poller: TelemetryPoller,
    state: Arc<Mutex<DashboardState>>,
    interval: Duration,
    running: bool,
    paused: bool,
    input_mode: InputMode,
    reset_meter: MeterId,
    reset_input: String,
    /// Written by the reset worker thread, read each frame.
    reset_status: Arc<Mutex<Option<String>>>,
}

impl App {
    pub fn new(device: &str, interval_ms: u64) -> Self {
        let state = Arc::new(Mutex::new(DashboardState::default()));
        let poller = TelemetryPoller::new(DeviceClient::new(device), Arc::clone(&state));
        let client = poller.client();

        Self {
            device: client.base_url().to_string(),
            client,
            poller,
            state,
            interval: Duration::from_millis(interval_ms.clamp(MIN_INTERVAL_MS, MAX_INTERVAL_MS)),
            running: true,
            paused: false,
            input_mode: InputMode::default(),
            reset_meter: MeterId::A,
            reset_input: String::new(),
            reset_status: Arc::new(Mutex::new(None)),
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Install panic hook that restores terminal before printing the panic.
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen, crossterm::cursor::Show);
            original_hook(info);
        }));

        let result = self.run_loop(&mut terminal);

        // Always restore terminal, even if the loop returned an error.
        let _ = std::panic::take_hook(); // remove our hook
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            crossterm::cursor::Show
        )?;

        result
    }

    fn run_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> io::Result<()> {
        self.poller.tick();
        let mut last_tick = Instant::now();

        while self.running {
            terminal.draw(|f| super::ui::draw(f, self))?;

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }

            if last_tick.elapsed() >= self.interval {
                if !self.paused {
                    // An overlapping tick is dropped and counted by the poller.
                    self.poller.tick();
                }
                last_tick = Instant::now();
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode) {
        match self.input_mode {
            InputMode::Normal => self.handle_normal_key(key),
            InputMode::ResetEntry => self.handle_reset_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('p') => self.paused = !self.paused,
            KeyCode::Char('r') => {
                self.input_mode = InputMode::ResetEntry;
                self.reset_input.clear();
            }
            KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Char(']') => {
                let ms = (self.interval.as_millis() as u64 / 2).max(MIN_INTERVAL_MS);
                self.interval = Duration::from_millis(ms);
            }
            KeyCode::Char('-') | KeyCode::Char('[') => {
                let ms = (self.interval.as_millis() as u64 * 2).min(MAX_INTERVAL_MS);
                self.interval = Duration::from_millis(ms);
            }
            _ => {}
        }
    }

    fn handle_reset_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => self.input_mode = InputMode::Normal,
            KeyCode::Enter => self.submit_reset(),
            KeyCode::Tab | KeyCode::Char('m') => self.reset_meter = self.reset_meter.other(),
            KeyCode::Backspace => {
                self.reset_input.pop();
            }
            KeyCode::Char(c) if c.is_ascii_digit() || c == '.' => {
                if self.reset_input.len() < MAX_RESET_CHARS {
                    self.reset_input.push(c);
                }
            }
            _ => {}
        }
    }

    /// Send the reset on a worker thread; the device applies it on its side
    /// and the next poll shows the new baseline.
    fn submit_reset(&mut self) {
        let meter = self.reset_meter;
        let kwh = parse_initial_kwh(&self.reset_input);
        let client = Arc::clone(&self.client);
        let status = Arc::clone(&self.reset_status);

        self.input_mode = InputMode::Normal;
        self.reset_input.clear();

        thread::spawn(move || {
            let outcome = match client.send_reset(meter, kwh) {
                Ok(()) => format!("meter {meter} rebaselined to {} kWh", format_kwh(kwh)),
                Err(e) => format!("reset not delivered: {e}"),
            };
            if let Ok(mut slot) = status.lock() {
                *slot = Some(outcome);
            }
        });
    }

    // --- Public accessors (non-shared state, no lock needed) ---

    pub fn device_url(&self) -> &str {
        &self.device
    }
    pub fn interval_ms(&self) -> u64 {
        self.interval.as_millis() as u64
    }
    pub fn is_paused(&self) -> bool {
        self.paused
    }
    pub fn is_running(&self) -> bool {
        self.running
    }
    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }
    pub fn reset_meter(&self) -> MeterId {
        self.reset_meter
    }
    pub fn reset_input(&self) -> &str {
        &self.reset_input
    }

    /// Capture all shared state in a single lock per frame.
    pub fn snapshot(&self) -> Snapshot {
        let s = lock_state(&self.state);
        let reset_status = match self.reset_status.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };

        Snapshot {
            charts: s.charts.clone(),
            stats: s.stats.clone(),
            reset_status,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
