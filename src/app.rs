use std::env;
use std::process;
use std::sync::{mpsc, Arc};
use std::thread;

use crate::cli::{Cli, Commands};
use capmix::bridge::stdio::StdioBridge;
use capmix::bridge::{HostBridge, HostEvent};
use capmix::{config, ui};

pub fn run(cli: Cli) {
    if let Some(command) = cli.command {
        match command {
            Commands::InitConfig => handle_init_config(),
        }
        return;
    }

    let mut config = config::Config::load().unwrap_or_default();
    if let Some(host) = cli.host {
        config.host.command = host;
    }
    if !cli.host_args.is_empty() {
        config.host.args = cli.host_args;
    }
    if let Some(title) = cli.title {
        config.ui.title = title;
    }

    // The advisory file is read, logged, and discarded; nothing in the
    // UI consumes it.
    let cwd = env::current_dir().unwrap_or_else(|_| ".".into());
    config::probe_advisory(&cwd);

    let (host_tx, host_rx) = mpsc::channel();
    let bridge = match StdioBridge::spawn(&config.host.command, &config.host.args, host_tx.clone())
    {
        Ok(bridge) => Arc::new(bridge),
        Err(e) => {
            eprintln!("Error spawning host '{}': {}", config.host.command, e);
            process::exit(1);
        }
    };

    let state = ui::state::AppState::new(config.ui.title.clone());

    // Resolve the hardware encoder in the background so a slow host cannot
    // hold up startup; the HWEncode toggle falls back to the software table
    // until the answer arrives.
    {
        let bridge = Arc::clone(&bridge);
        thread::spawn(move || match bridge.select_encoder("h264") {
            Ok(codec) => {
                let _ = host_tx.send(HostEvent::CodecResolved(codec));
            }
            Err(e) => tracing::warn!("selectEncoder failed: {e}"),
        });
    }

    if let Err(e) = ui::run(state, &*bridge, host_rx) {
        eprintln!("Error running UI: {}", e);
        process::exit(1);
    }
}

fn handle_init_config() {
    match config::Config::load() {
        Ok(cfg) => {
            match config::Config::config_path() {
                Ok(path) => println!("Config loaded successfully from {}", path.display()),
                Err(e) => println!("Config loaded, but config path unknown: {:#}", e),
            }
            println!("{:#?}", cfg);
        }
        Err(e) => {
            println!("Config missing or invalid: {:#}", e);
            println!("Creating default config...");
            let cfg = config::Config::default();
            match cfg.save() {
                Ok(()) => match config::Config::config_path() {
                    Ok(path) => println!("Default config written to {}", path.display()),
                    Err(e) => println!("Default config written, path unknown: {:#}", e),
                },
                Err(e) => {
                    eprintln!("Failed to write default config: {:#}", e);
                    process::exit(1);
                }
            }
        }
    }
}
