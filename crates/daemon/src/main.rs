/// artcanvas daemon - steganographic art service
///
/// Serves the visible art-generation API and, underneath it, the
/// encrypted configuration-exchange channel.

use anyhow::Result;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::{info, warn, Level};

use artcanvas_common::ServiceConfig;
use artcanvas_core::TemplateStore;
use artcanvas_daemon::api::{ApiServer, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("Starting artcanvas daemon v{}", env!("CARGO_PKG_VERSION"));

    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 {
        match args[1].as_str() {
            "help" | "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            "version" | "--version" | "-v" => {
                println!("artcanvas daemon v{}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            other => {
                eprintln!("Unknown command: {}", other);
                eprintln!("Run with 'help' to see available commands");
                std::process::exit(1);
            }
        }
    }

    run_server().await
}

async fn run_server() -> Result<()> {
    let config_path = PathBuf::from("artcanvas.toml");
    let mut config = if config_path.exists() {
        info!("Loading configuration from {:?}", config_path);
        ServiceConfig::from_file(&config_path)?
    } else {
        info!("No configuration file found, using defaults");
        ServiceConfig::default()
    };

    // The shared secret enters the process here and nowhere else
    match std::env::var("ENCRYPTION_PASSWORD") {
        Ok(secret) if !secret.is_empty() => config.secret = Some(secret),
        _ => {}
    }
    if config.secret.is_none() {
        warn!("ENCRYPTION_PASSWORD is not set; the encrypted channel will reject requests");
    }

    let templates = match config.template_path.as_deref() {
        Some(path) => {
            info!("Loading base template from {}", path);
            TemplateStore::from_file(path)?
        }
        None => TemplateStore::builtin()?,
    };

    let listen_addr: SocketAddr =
        format!("{}:{}", config.listen_addr, config.listen_port).parse()?;

    let state = AppState::new(config, templates);
    ApiServer::new(listen_addr, state).start().await
}

/// Print help message
fn print_help() {
    println!("artcanvas daemon - steganographic art service");
    println!();
    println!("USAGE:");
    println!("    artcanvas-daemon [COMMAND]");
    println!();
    println!("COMMANDS:");
    println!("    help        Show this help message");
    println!("    version     Show version information");
    println!();
    println!("With no command the HTTP service starts on the configured");
    println!("address (default 127.0.0.1:3000).");
    println!();
    println!("ENVIRONMENT:");
    println!("    ENCRYPTION_PASSWORD   Shared secret for the encrypted channel");
}
