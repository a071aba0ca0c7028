//! TTL Cache console
//!
//! Reads cache commands from stdin, one per line, and prints the replies.

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ttl_cache::console::{execute, Command};
use ttl_cache::{Config, ExpiringCache};

/// Main entry point for the cache console.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the cache and start background reclamation
/// 4. Serve commands from stdin until EOF, `QUIT` or Ctrl+C
/// 5. Stop reclamation and wait for it to exit
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so replies on stdout stay clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ttl_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: default_expiration={}s, cleanup_interval={}s",
        config.default_expiration.as_secs(),
        config.cleanup_interval.as_secs()
    );

    let cache = ExpiringCache::<String>::from_config(&config)
        .context("Failed to create cache")?;
    info!("Cache initialized");

    tokio::select! {
        result = serve(&cache) => result?,
        _ = signal::ctrl_c() => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
    }

    cache.shutdown().await;
    info!("Shutdown complete");
    Ok(())
}

/// Reads commands until EOF or `QUIT`.
async fn serve(cache: &ExpiringCache<String>) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        if line.trim().is_empty() {
            continue;
        }

        let reply = match Command::parse(&line) {
            Ok(Command::Quit) => break,
            Ok(command) => execute(cache, command),
            Err(err) => {
                warn!("Rejected command: {}", err);
                format!("ERR {}", err)
            }
        };

        stdout.write_all(reply.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }

    Ok(())
}
