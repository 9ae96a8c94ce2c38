use std::io;
use std::process;

use ossim::{console, Driver, KernelConfig};

fn main() {
    let config = match std::env::args().nth(1) {
        Some(path) => KernelConfig::from_path(&path),
        None => Ok(KernelConfig::default()),
    };

    let mut driver = match config.and_then(|config| Driver::new(config, console::stdout())) {
        Ok(driver) => driver,
        Err(err) => {
            eprintln!("Failed to start the kernel: {}", err);
            process::exit(1);
        }
    };

    driver.start(io::stdin().lock());
}
