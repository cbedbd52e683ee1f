use wattscope_core::{DeviceClient, MeterId, format_kwh, parse_initial_kwh};

pub fn run(meter: MeterId, kwh: &str, device: &str) {
    let value = parse_initial_kwh(kwh);
    let client = DeviceClient::new(device);

    println!(
        "⚡ rebaseline meter {meter} to {} kWh on {}",
        format_kwh(value),
        client.base_url()
    );

    match client.send_reset(meter, value) {
        Ok(()) => println!("   delivered"),
        Err(e) => {
            eprintln!("wattscope: {e}");
            std::process::exit(1);
        }
    }
}
