pub fn run(host: &str, port: u16) {
    let base = format!("http://{host}:{port}");

    println!("⚡ wattscope simulated meter v{}", wattscope_core::VERSION);
    println!("   {base}");
    println!();
    println!("   Endpoints:");
    println!("     GET  /                      Device index (try: curl {base})");
    println!("     GET  /data                  Current readings for meters A and B");
    println!("     POST /reset/{{meter}}/{{kwh}}    Rebaseline a meter's energy counter");
    println!("     POST /sim/fail/{{n}}          Fail the next n data requests with HTTP 500");
    println!("     POST /sim/lag/{{ms}}          Delay every data response by ms milliseconds");
    println!();
    println!("   Examples:");
    println!("     curl {base}/data");
    println!("     curl -X POST {base}/reset/A/0");
    println!("     wattscope watch --device {base}");
    println!();

    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(wattscope_sim::run_server(
        host,
        port,
        wattscope_sim::default_device(),
    ));
}
