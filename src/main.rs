// src/main.rs

//! The operator command line for the Styla integration: inspect what the storefront
//! would render, and prepare route registration.

use anyhow::{Result, anyhow};
use std::env;
use std::path::Path;
use styla_seo::StylaState;
use styla_seo::config::Config;
use styla_seo::core::metrics;
use tracing::{error, info};
use tracing_subscriber::{filter::EnvFilter, prelude::*};

const USAGE: &str = "Usage: styla-seo [--config <path>] <command>

Commands:
  seo <client> <request-path>   Print the SEO metadata for a storefront request
  version <client>              Print the client's current asset version
  embed <client>                Print the script and stylesheet embed tags
  routes                        Print the SEO route registration plan as JSON
  sweep                         Delete stale cache entries once
  metrics                       Print the Prometheus metrics of this process";

/// The configuration file used when `--config` is not given, if it exists.
const DEFAULT_CONFIG_PATH: &str = "styla.toml";

#[tokio::main]
async fn main() -> Result<()> {
    const VERSION: &str = env!("STYLA_SEO_BUILD_VERSION");

    let args: Vec<String> = env::args().skip(1).collect();

    // Handle the --version flag.
    if args.contains(&"--version".to_string()) {
        println!("styla-seo version {VERSION}");
        return Ok(());
    }

    // Split off `--config <path>`; everything else is the command.
    let mut config_path = None;
    let mut command = Vec::new();
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        if arg == "--config" {
            match iter.next() {
                Some(path) => config_path = Some(path),
                None => {
                    eprintln!("--config flag requires a value");
                    std::process::exit(1);
                }
            }
        } else {
            command.push(arg);
        }
    }

    let config = match load_config(config_path.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load configuration: {e:#}");
            std::process::exit(1);
        }
    };

    // Get log level from env var or config.
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| config.log_level.clone());
    tracing_subscriber::registry()
        .with(EnvFilter::new(log_level))
        .with(
            tracing_subscriber::fmt::layer()
                .compact() // Use the compact, single-line format.
                .with_ansi(true) // Enable ANSI color codes for log levels.
                .with_writer(std::io::stderr),
        )
        .init();

    if let Err(e) = run_command(config, &command).await {
        error!("{}", e);
        return Err(e);
    }
    Ok(())
}

fn load_config(path: Option<&str>) -> Result<Config> {
    match path {
        Some(path) => Config::from_file(path),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => Config::from_file(DEFAULT_CONFIG_PATH),
        None => Ok(Config::default()),
    }
}

async fn run_command(config: Config, command: &[String]) -> Result<()> {
    let args: Vec<&str> = command.iter().map(String::as_str).collect();
    match args.as_slice() {
        ["seo", client, request_path] => {
            let state = StylaState::initialize(config)?;
            match state
                .remote_content
                .get_remote_content(client, request_path)
                .await
            {
                Some(record) => println!("{}", serde_json::to_string_pretty(&record)?),
                None => println!("unavailable"),
            }
        }
        ["version", client] => {
            let state = StylaState::initialize(config)?;
            println!("{}", state.versions.get_version(client).await);
        }
        ["embed", client] => {
            let state = StylaState::initialize(config)?;
            println!("{}", state.embed.js_embed_code(client, None).await);
            println!("{}", state.embed.css_embed_code(client, None).await);
        }
        ["routes"] => {
            let state = StylaState::initialize(config)?;
            println!("{}", serde_json::to_string_pretty(&state.route_plan())?);
        }
        ["sweep"] => {
            let state = StylaState::initialize(config)?;
            let removed = state.cache_sweeper().sweep_once().await?;
            info!("Removed {} stale cache entries.", removed);
        }
        ["metrics"] => {
            print!("{}", metrics::gather_metrics());
        }
        _ => {
            eprintln!("{USAGE}");
            return Err(anyhow!("unknown or incomplete command: {:?}", command));
        }
    }
    Ok(())
}
