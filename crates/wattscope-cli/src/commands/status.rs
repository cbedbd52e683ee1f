use wattscope_core::DeviceClient;

pub fn run(device: &str, json: bool) {
    let client = DeviceClient::new(device);

    match client.fetch_snapshot() {
        Ok(snap) => {
            if json {
                if let Ok(body) = serde_json::to_string_pretty(&snap) {
                    println!("{body}");
                }
            } else {
                println!("⚡ {}", client.base_url());
                println!();
                print!("{}", super::render_status_table(&snap));
            }
        }
        Err(e) => {
            eprintln!("wattscope: {e}");
            std::process::exit(1);
        }
    }
}
