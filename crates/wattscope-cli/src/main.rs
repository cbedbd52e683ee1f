//! wattscope command line interface.
//!
//! `wattscope watch` is the main event: a full-screen terminal dashboard
//! that polls a two-channel energy monitor once a second and charts the
//! last minute of power readings. The remaining subcommands are one-shot
//! helpers around the same device API, plus a synthetic device for
//! development without hardware.

mod commands;
mod tui;

use clap::{Parser, Subcommand};
use wattscope_core::{DEFAULT_DEVICE_URL, INTERVAL_MS, MeterId};

#[derive(Parser)]
#[command(name = "wattscope")]
#[command(about = "Watch a two-channel energy monitor from the terminal", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Live dashboard: per-meter power charts, energy split, meter reset
    Watch {
        /// Base URL of the meter device
        #[arg(long, default_value = DEFAULT_DEVICE_URL)]
        device: String,

        /// Milliseconds between polls (clamped to 250..=10000)
        #[arg(long, default_value_t = INTERVAL_MS)]
        interval_ms: u64,
    },

    /// Fetch a single snapshot and print it
    Status {
        /// Base URL of the meter device
        #[arg(long, default_value = DEFAULT_DEVICE_URL)]
        device: String,

        /// Print the raw device JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Rebaseline one meter's accumulated energy counter
    Reset {
        /// Meter to reset (A or B)
        meter: MeterId,

        /// New baseline in kWh; anything non-numeric becomes 0
        #[arg(default_value = "0")]
        kwh: String,

        /// Base URL of the meter device
        #[arg(long, default_value = DEFAULT_DEVICE_URL)]
        device: String,
    },

    /// Run a synthetic two-channel meter on localhost
    Simulate {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind
        #[arg(long, default_value_t = 8032)]
        port: u16,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Watch { device, interval_ms } => commands::watch::run(&device, interval_ms),
        Commands::Status { device, json } => commands::status::run(&device, json),
        Commands::Reset { meter, kwh, device } => commands::reset::run(meter, &kwh, &device),
        Commands::Simulate { host, port } => commands::simulate::run(&host, port),
    }
}
