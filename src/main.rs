//! Sports-betting arbitrage scanner entry point.

use std::net::SocketAddr;

use clap::{Args as ClapArgs, Parser, Subcommand};
use rust_decimal::Decimal;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use odds_arb::api::{create_router, AppState};
use odds_arb::arbitrage::scan_events;
use odds_arb::config::Config;
use odds_arb::error::AppError;
use odds_arb::metrics;
use odds_arb::odds::{
    load_events, sample_events, FallbackPolicy, LoadedEvents, OddsApiClient, OddsSource,
};
use odds_arb::report::{origin_notice, render_json, render_report};
use odds_arb::utils::shutdown_signal;

/// Sports-betting arbitrage scanner.
#[derive(Parser, Debug)]
#[command(name = "odds-arb")]
#[command(about = "Find guaranteed-profit stake splits across bookmakers")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true, env = "VERBOSE")]
    verbose: bool,

    /// Emit logs as JSON.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

/// Scan parameters that override configuration.
#[derive(ClapArgs, Debug, Default, Clone)]
struct ScanArgs {
    /// Sport key to fetch (e.g. soccer_epl).
    #[arg(long)]
    sport: Option<String>,

    /// Total stake to split.
    #[arg(long)]
    stake: Option<Decimal>,

    /// Minimum profit percent.
    #[arg(long = "min-profit")]
    min_profit: Option<Decimal>,

    /// Print the report as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch live odds and scan for arbitrage (default).
    Scan {
        #[command(flatten)]
        scan: ScanArgs,

        /// Do not fall back to sample data when the fetch fails.
        #[arg(long)]
        no_fallback: bool,
    },

    /// Scan the built-in sample events.
    Sample {
        #[command(flatten)]
        scan: ScanArgs,
    },

    /// Check the API key by listing available sports.
    CheckKey,

    /// Check configuration validity.
    CheckConfig,

    /// Serve the HTTP API.
    Serve {
        /// HTTP server port.
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env values feed both clap env fallbacks and the log filter
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("odds_arb=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    if args.json_logs {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init();
    }

    match args.command {
        Some(Command::Scan { scan, no_fallback }) => cmd_scan(scan, no_fallback).await,
        Some(Command::Sample { scan }) => cmd_sample(scan),
        Some(Command::CheckKey) => cmd_check_key().await,
        Some(Command::CheckConfig) => cmd_check_config(),
        Some(Command::Serve { port }) => cmd_serve(port).await,
        None => cmd_scan(ScanArgs::default(), false).await,
    }
}

/// Load and validate configuration, applying CLI overrides.
fn load_config(scan: &ScanArgs) -> anyhow::Result<Config> {
    let mut config = Config::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    if let Some(sport) = &scan.sport {
        config.odds_sport = sport.clone();
    }
    if let Some(stake) = scan.stake {
        config.stake = stake;
    }
    if let Some(min_profit) = scan.min_profit {
        config.min_profit_pct = min_profit;
    }

    config.validate().map_err(AppError::InvalidConfig)?;

    Ok(config)
}

/// Fetch live odds and scan them.
async fn cmd_scan(scan: ScanArgs, no_fallback: bool) -> anyhow::Result<()> {
    let config = load_config(&scan)?;
    let policy = if no_fallback {
        FallbackPolicy::disabled()
    } else {
        FallbackPolicy::from_config(&config)
    };

    info!(
        sport = %config.odds_sport,
        stake = %config.stake,
        min_profit = %config.min_profit_pct,
        "Fetching live odds..."
    );

    let loaded = load_live(&config, policy).await?;
    if let Some(notice) = origin_notice(&loaded.origin) {
        eprintln!("{}", notice);
    }

    let report = scan_events(&loaded.events, config.stake, config.min_profit_pct);
    if scan.json {
        println!("{}", render_json(&report)?);
    } else {
        print!("{}", render_report(&report));
    }

    Ok(())
}

/// Load events from the live odds API under the given fallback policy.
async fn load_live(config: &Config, policy: FallbackPolicy) -> odds_arb::Result<LoadedEvents> {
    let source = OddsSource::Live(OddsApiClient::new(config)?);
    Ok(load_events(&source, &config.odds_sport, policy).await?)
}

/// Scan the sample events.
fn cmd_sample(scan: ScanArgs) -> anyhow::Result<()> {
    let config = load_config(&scan)?;

    let report = scan_events(&sample_events(), config.stake, config.min_profit_pct);
    if scan.json {
        println!("{}", render_json(&report)?);
    } else {
        print!("{}", render_report(&report));
    }

    Ok(())
}

/// Check the API key by listing sports.
async fn cmd_check_key() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("ODDS ARB - API KEY CHECK");
    println!("======================================================================");

    let config = load_config(&ScanArgs::default())?;
    let client = OddsApiClient::new(&config)?;

    if !client.has_api_key() {
        println!("Please set ODDS_API_KEY");
        return Err(anyhow::anyhow!("API key missing"));
    }

    println!("Host: {}", client.base_url());
    print!("Testing connection to the odds API... ");
    match client.list_sports().await {
        Ok(sports) => {
            println!("OK");
            println!("  Connection successful! {} sports available", sports.len());
            let active = sports.iter().filter(|s| s.active).count();
            println!("  Active sports: {}", active);
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            println!("  Check your API key.");
            return Err(anyhow::anyhow!("API key check failed"));
        }
    }

    println!("======================================================================");
    Ok(())
}

/// Check configuration validity.
fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("ODDS ARB - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Loading configuration... ");
    let config = match Config::load() {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  API URL: {}", config.odds_api_url);
    println!(
        "  API Key: {}",
        if config.api_key().is_some() { "present" } else { "MISSING" }
    );
    println!("  Sport: {}", config.odds_sport);
    println!("  Regions: {}", config.odds_regions);
    println!("  Stake: {}", config.stake);
    println!("  Min Profit: {}%", config.min_profit_pct);
    println!(
        "  Sample Fallback: {} (after {}ms)",
        if config.sample_fallback { "Enabled" } else { "Disabled" },
        config.fallback_delay_ms
    );
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Serve the HTTP API.
async fn cmd_serve(port_override: Option<u16>) -> anyhow::Result<()> {
    let config = load_config(&ScanArgs::default())?;
    let port = port_override.unwrap_or(config.port);

    let handle = metrics::install_prometheus()?;
    let source = OddsSource::Live(OddsApiClient::new(&config)?);
    let app_state = AppState::new(source, config).with_metrics(handle);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);

    let router = create_router(app_state.clone());
    app_state.set_ready(true);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}
