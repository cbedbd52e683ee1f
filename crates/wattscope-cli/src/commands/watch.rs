use crate::tui::app::App;

pub fn run(device: &str, interval_ms: u64) {
    let mut app = App::new(device, interval_ms);
    if let Err(e) = app.run() {
        eprintln!("TUI error: {e}");
        std::process::exit(1);
    }
}
