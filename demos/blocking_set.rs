use std::env;

use touchline::blocking::Device;

fn main() -> touchline::Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 4 {
        eprintln!("usage: blocking_set <controller-url> <device-index> <celsius>");
        std::process::exit(2);
    }
    let index: u32 = args[2].parse().expect("device index must be a number");
    let celsius: f64 = args[3].parse().expect("temperature must be a number");

    let mut device = Device::new(index, args[1].as_str())?;
    device.update()?;
    println!(
        "{}: {:?} -> {:?}",
        device.name().unwrap_or("?"),
        device.current_temperature()?,
        device.target_temperature()?
    );

    if device.set_target_temperature(celsius)? {
        println!("setpoint changed to {celsius:.1}\u{00b0}C");
    } else {
        println!("controller did not confirm the new setpoint");
    }
    Ok(())
}
