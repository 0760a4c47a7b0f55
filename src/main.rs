use hemisync::config::{config_path, HemiConfig};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

fn main() {
    // Set RUST_LOG=debug for verbose output
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    log::info!("Initializing hemi-sync audio controller...");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    let running = Arc::new(AtomicBool::new(true));
    let handler_flag = running.clone();
    // Let the control loop wind down so the stream is closed before exit.
    if let Err(e) = ctrlc::set_handler(move || {
        log::info!("Interrupt received, shutting down");
        handler_flag.store(false, Ordering::Release);
    }) {
        log::warn!("Could not install Ctrl-C handler: {}", e);
    }

    if let Err(e) = hemisync::runtime::run(&config, &running) {
        log::error!("{}", e);
        std::process::exit(1);
    }
    log::info!("Shut down cleanly");
}

fn load_config(args: &[String]) -> hemisync::Result<HemiConfig> {
    let mut config = match config_path(args)? {
        Some(path) => {
            log::info!("Loading config from {}", path.display());
            HemiConfig::load(&path)?
        }
        None => HemiConfig::default(),
    };
    config.apply_args(args)?;
    config.validate()?;
    Ok(config)
}
