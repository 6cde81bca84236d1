use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use secretscan_server::{routes, AppState, Config};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "secretscan-server")]
#[command(about = "Secret-scan intake server: batch fan-out over a bounded worker pool")]
struct Cli {
    /// Server host (overrides config)
    #[arg(long, env = "SERVER_HOST")]
    host: Option<String>,

    /// Server port (overrides config)
    #[arg(short, long, env = "SERVER_PORT")]
    port: Option<u16>,

    /// Serve the synchronous single-image mode instead of batch intake
    #[arg(long, env = "SECRET_SCAN_STANDALONE", default_value_t = false)]
    standalone: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "info,secretscan_server=debug,secretscan_core=debug,tower_http=warn".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = Config::from_env().context("failed to load configuration")?;
    if let Some(host) = cli.host {
        config.server_host = host;
    }
    if let Some(port) = cli.port {
        config.server_port = port;
    }

    info!(
        concurrency = config.scan_concurrency,
        console = %config.console_url,
        standalone = cli.standalone,
        "configuration in effect"
    );

    let config = Arc::new(config);
    let state = AppState::production(Arc::clone(&config));
    let app = if cli.standalone {
        routes::standalone_router(state)
    } else {
        routes::batch_router(state)
    };

    let addr = format!("{}:{}", config.server_host, config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("secret-scan server listening on {addr}");

    axum::serve(listener, app).await?;
    Ok(())
}
