//! FeedMix: Main Entry Point
//!
//! Wires the adapters around the station core and serves the line console
//! on stdin/stdout.  Logs go to stderr so replies stay machine-readable.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  console (stdio)   FileStore        MotorBank   LogEventSink │
//! │  (drives)          (Storage+Config) (MotorPort) (EventSink)  │
//! │                                                              │
//! │  ─────────────── Port Trait Boundary ──────────────────      │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────┐      │
//! │  │  Station ─▶ AppService (FSM · Scale · Ledger)      │      │
//! │  └────────────────────────────────────────────────────┘      │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::util::SubscriberInitExt;

use feedmix::adapters::clock::SystemClock;
use feedmix::adapters::console;
use feedmix::adapters::file_store::FileStore;
use feedmix::adapters::hardware::MotorBank;
use feedmix::adapters::log_sink::LogEventSink;
use feedmix::app::ports::ConfigPort;
use feedmix::app::station::Station;
use feedmix::config::StationConfig;

/// Feed-mixing station control backend.
#[derive(Debug, Parser)]
#[command(name = "feedmix", version, about)]
struct Cli {
    /// Directory holding the ledger, recipes and station config.
    #[arg(long, env = "FEEDMIX_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    /// Seed the scale simulator for a reproducible run.
    #[arg(long, env = "FEEDMIX_SEED")]
    seed: Option<u64>,

    /// Persist the effective configuration before serving.
    #[arg(long)]
    save_config: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    info!("FeedMix v{} starting", env!("CARGO_PKG_VERSION"));

    let store = FileStore::open(&cli.data_dir)
        .with_context(|| format!("opening data directory {}", cli.data_dir.display()))?;

    let mut config = StationConfig::load_or_default(&store);
    if let Some(seed) = cli.seed {
        config.rng_seed = Some(seed);
    }
    if cli.save_config {
        store.save(&config).context("saving station config")?;
    }

    let station = Station::new(
        config,
        store,
        MotorBank::new(),
        LogEventSink::new(),
        SystemClock::new(),
    )
    .context("invalid station config")?;

    info!("Station ready, reading requests from stdin");
    let stdin = io::stdin();
    let replies = console::run(&station, stdin.lock(), io::stdout().lock())
        .context("console I/O failed")?;
    info!("Input closed after {} replies, shutting down", replies);
    Ok(())
}

/// `RUST_LOG` filtering, default `info`, written to stderr.  `log` records
/// from the library are bridged into the subscriber.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .finish()
        .init();
}
