use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use fixed_quota::config::{LoggingConfig, QuotaConfig};
use fixed_quota::ratelimit::{FixedIdentity, FixedWindowLimiter, MemoryStore};
use fixed_quota::{QuotaError, RateLimiter, SilentRateLimiter};

/// Exercise a configured quota rule against an in-memory counter store.
#[derive(Debug, Parser)]
#[command(name = "quota-probe", version, about)]
struct Args {
    /// Path to the YAML configuration file
    #[arg(short, long)]
    config: PathBuf,

    /// Name of the rate rule to apply
    #[arg(short, long)]
    rule: String,

    /// Caller identifier to count hits against
    #[arg(short, long, default_value = "probe")]
    identifier: String,

    /// Number of hits to perform
    #[arg(short = 'n', long, default_value_t = 1)]
    hits: u64,

    /// Stop at the first violation instead of reporting status
    #[arg(long)]
    strict: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = QuotaConfig::from_file(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    init_tracing(&config.logging);

    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let rate = config.rates.require(&args.rule)?;
    info!(rule = %args.rule, rate = %rate, identifier = %args.identifier, "Probing rule");

    let limiter = FixedWindowLimiter::new(MemoryStore::new(), FixedIdentity::new(args.identifier));

    for hit in 1..=args.hits {
        if args.strict {
            match limiter.limit(&rate) {
                Ok(()) => println!("{}: ok", hit),
                Err(QuotaError::RateLimitExceeded(e)) => {
                    warn!(hit, "Quota exhausted");
                    println!("{}: {}", hit, e);
                    break;
                }
                Err(e) => return Err(e.into()),
            }
        } else {
            let status = limiter.limit_silently(&rate)?;
            println!("{}", serde_json::to_string(&status)?);
        }
    }

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}
