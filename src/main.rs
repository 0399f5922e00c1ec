//! Nest Sim - Simulated Drone Nest Server
//!
//! Serves the nest simulator over HTTP so a dispatch client can be tested
//! against realistic mission timing and failures.
//!
//! Features:
//! - Simulated clock, steppable through `POST /step_time`
//! - Seeded mission outcomes (`--seed` or `DST_SEED`)
//! - Hospitals and inventory loaded from CSV at startup

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use nest_sim::constants::{CONFIRM_TIMEOUT_SECS, LAUNCH_DELAY_SECS_MAX, MISSION_FAILURE_RATE};
use nest_sim::{api, new_shared, seed, ClockMode, NestSim, SimConfig};

// =============================================================================
// TigerStyle Constants
// =============================================================================

/// Default bind address
pub const BIND_ADDRESS_DEFAULT: &str = "127.0.0.1";

/// Default port
pub const PORT_DEFAULT: u16 = 12345;

/// Default hospitals seed file
pub const HOSPITALS_PATH_DEFAULT: &str = "data/hospitals.csv";

/// Default products seed file
pub const PRODUCTS_PATH_DEFAULT: &str = "data/products.csv";

/// Application name
pub const APP_NAME: &str = "nest-sim";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// CLI
// =============================================================================

/// Run a simulated nest environment
#[derive(Parser, Debug)]
#[command(name = APP_NAME)]
#[command(about = "Run a simulated drone nest environment")]
#[command(version)]
struct Cli {
    /// Which address to bind to
    #[arg(long, default_value = BIND_ADDRESS_DEFAULT)]
    addr: String,

    /// Which port to run the server on
    #[arg(long, default_value_t = PORT_DEFAULT)]
    port: u16,

    /// Path to a hospitals CSV file to load
    #[arg(long, default_value = HOSPITALS_PATH_DEFAULT)]
    hospitals: String,

    /// Path to a products CSV file to load
    #[arg(long, default_value = PRODUCTS_PATH_DEFAULT)]
    products: String,

    /// RNG seed (overrides DST_SEED)
    #[arg(long)]
    seed: Option<u64>,

    /// Freeze the clock so time moves only through /step_time
    #[arg(long)]
    manual_clock: bool,

    /// Probability that a confirmed flight fails
    #[arg(long, default_value_t = MISSION_FAILURE_RATE)]
    failure_rate: f64,

    /// Seconds before an unconfirmed flight times out
    #[arg(long, default_value_t = CONFIRM_TIMEOUT_SECS)]
    confirm_timeout: i64,

    /// Maximum seconds between confirm and launch
    #[arg(long, default_value_t = LAUNCH_DELAY_SECS_MAX)]
    launch_delay_max: i64,

    /// Enable verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn sim_config(&self) -> anyhow::Result<SimConfig> {
        let base = match self.seed {
            Some(seed) => SimConfig::with_seed(seed),
            None => SimConfig::from_env()?,
        };
        let clock_mode = if self.manual_clock {
            ClockMode::Manual
        } else {
            ClockMode::Wall
        };

        Ok(base
            .with_clock_mode(clock_mode)
            .with_failure_rate(self.failure_rate)
            .with_confirm_timeout_secs(self.confirm_timeout)
            .with_launch_delay_secs_max(self.launch_delay_max))
    }
}

fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).to_string())
}

// =============================================================================
// Main
// =============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Initialize logging
    let filter = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .init();

    tracing::info!("Nest Sim v{}", APP_VERSION);

    let config = cli.sim_config()?;
    tracing::info!(seed = config.seed, "Replay this run with --seed {}", config.seed);

    let hospitals = seed::load_hospitals(&expand_path(&cli.hospitals))?;
    let products = seed::load_products(&expand_path(&cli.products))?;
    let sim = NestSim::new(config, hospitals, products).context("invalid seed data")?;

    let addr = format!("{}:{}", cli.addr, cli.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("Starting HTTP server on {}", addr);

    axum::serve(listener, api::router(new_shared(sim))).await?;

    Ok(())
}
