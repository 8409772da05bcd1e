use std::env;

use touchline::Device;

#[tokio::main]
async fn main() -> touchline::Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    let url = args
        .get(1)
        .expect("usage: list_devices <controller-url>, e.g. http://192.168.1.254");

    let mut controller = Device::new(0, url.as_str())?;
    let count = controller.device_count().await?;
    println!("Controller {url} has {count} devices");

    for index in 0..count {
        let mut device = Device::new(index, url.as_str())?;
        if let Err(e) = device.update().await {
            eprintln!("[{index}] update failed: {e}");
            continue;
        }
        println!("[{index}] {}", device.name().unwrap_or("?"));
        println!("  temperature:  {:?}", device.current_temperature()?);
        println!("  setpoint:     {:?}", device.target_temperature()?);
        println!(
            "  range:        {:?} .. {:?}",
            device.target_temperature_low()?,
            device.target_temperature_high()?
        );
        println!("  week program: {:?}", device.week_program()?);
        println!("  mode:         {:?}", device.operation_mode()?);
        println!(
            "  ids:          device {:?}, controller {:?}",
            device.device_id()?,
            device.controller_id()?
        );
    }

    if count > 0 {
        println!("Hostname: {}", controller.hostname().await?);
        println!("Status: {}", controller.status().await?);
    }
    Ok(())
}
