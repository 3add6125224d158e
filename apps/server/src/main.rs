//! DEX Scanner - Headless Server
//!
//! Polls DEX routers on several EVM networks, detects cross-venue price
//! divergence, and sends Telegram alerts.

mod config;
mod scanner;

use clap::Parser;
use config::AppConfig;
use scanner::Scanner;
use scanner_alerts::{AlertSink, LogSink, Notifier, TelegramConfig, TelegramSink};
use scanner_engine::{NetworkPipeline, OpportunityDetector};
use scanner_feeds::RpcQuoteSource;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// DEX Scanner CLI
#[derive(Parser, Debug)]
#[command(name = "dex-scanner")]
#[command(about = "Multi-network DEX price divergence scanner", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.json")]
    config: String,

    /// Log level: trace, debug, info, warn, error (RUST_LOG takes precedence)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Minimum spread in percent, overrides the config file
    #[arg(short = 's', long)]
    min_spread: Option<f64>,

    /// Scan interval in milliseconds, overrides the config file
    #[arg(short, long)]
    interval_ms: Option<u64>,

    /// Run a single scan cycle and exit
    #[arg(long, default_value_t = false)]
    once: bool,

    /// Log alerts instead of sending them to Telegram
    #[arg(long, default_value_t = false)]
    dry_run: bool,
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

/// Alert sink and destination chat.
fn alert_sink(dry_run: bool) -> Option<(Arc<dyn AlertSink>, String)> {
    let log_only = || -> (Arc<dyn AlertSink>, String) { (Arc::new(LogSink), "log".to_string()) };

    match TelegramConfig::from_env() {
        Ok(telegram) if !dry_run => {
            info!(chat_id = %telegram.chat_id, "Telegram alerts enabled");
            let sink: Arc<dyn AlertSink> = Arc::new(TelegramSink::new(&telegram.bot_token));
            Some((sink, telegram.chat_id))
        }
        Ok(_) => {
            info!("Dry run: alerts will be logged only");
            Some(log_only())
        }
        Err(e) if dry_run => {
            info!(reason = %e, "Dry run: alerts will be logged only");
            Some(log_only())
        }
        Err(e) => {
            error!(error = %e, "Telegram credentials missing (use --dry-run to log alerts instead)");
            None
        }
    }
}

fn build_pipelines(config: &AppConfig) -> Result<Vec<NetworkPipeline>, config::ConfigError> {
    let registry = Arc::new(config.registry()?);
    let detector = OpportunityDetector::new((&config.scanner).into());
    let timeout = config.scanner.quote_timeout();

    let mut pipelines = Vec::with_capacity(registry.networks().len());
    for spec in registry.networks() {
        let source = match RpcQuoteSource::new(spec.rpc_url.clone(), timeout) {
            Ok(source) => Arc::new(source),
            Err(e) => {
                warn!(network = %spec.chain, error = %e, "Failed to build RPC client, skipping network");
                continue;
            }
        };
        pipelines.push(NetworkPipeline::for_network(
            spec,
            registry.clone(),
            source,
            detector.clone(),
        ));
    }
    Ok(pipelines)
}

fn load_config(args: &Args) -> Result<AppConfig, config::ConfigError> {
    let mut config = AppConfig::load(&args.config)?;
    config.expand_env(|var| std::env::var(var).ok())?;
    if let Some(min_spread) = args.min_spread {
        config.scanner.min_spread_pct = min_spread;
    }
    if let Some(interval_ms) = args.interval_ms {
        config.scanner.scan_interval_ms = interval_ms;
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    // Log level precedence: RUST_LOG, --log-level, config file.
    let config = load_config(&args);
    let level = args
        .log_level
        .clone()
        .or_else(|| config.as_ref().ok().map(|c| c.log_level.clone()))
        .unwrap_or_else(|| "info".to_string());
    init_logging(&level);

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };

    info!("Starting DEX Scanner");
    info!(
        config = %args.config,
        networks = config.networks.len(),
        pairs = config.pairs.len(),
        min_spread_pct = config.scanner.min_spread_pct,
        interval_ms = config.scanner.scan_interval_ms,
        cooldown_ms = config.alerts.cooldown_ms,
        "Configuration loaded"
    );

    let pipelines = match build_pipelines(&config) {
        Ok(pipelines) => pipelines,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };

    let Some((sink, destination)) = alert_sink(args.dry_run) else {
        std::process::exit(1);
    };
    let notifier = Notifier::new(sink, destination, (&config.alerts).into());
    let mut scanner = Scanner::new(pipelines, notifier);

    if args.once {
        scanner.run_cycle().await;
        return;
    }

    scanner.run(config.scanner.scan_interval()).await;
    info!("DEX Scanner stopped");
}
