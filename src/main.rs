use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use rift_console::config::AppConfig;
use rift_console::{router, AppState};

#[derive(Parser)]
#[command(name = "rift-console")]
#[command(about = "Rift admin console")]
#[command(version)]
struct Args {
    #[arg(long, help = "Address to bind (overrides RIFT_CONSOLE_BIND)")]
    bind: Option<String>,

    #[arg(long, help = "Port to listen on (overrides RIFT_CONSOLE_PORT)")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, RIFT_BACKEND_URL, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("rift_console=info,tower_http=info")),
        )
        .init();

    let args = Args::parse();

    let mut config = AppConfig::from_env().context("invalid configuration")?;
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    tracing::info!(
        environment = ?config.environment,
        backend = %config.backend.base_url,
        "Starting Rift console"
    );

    let bind_addr = format!("{}:{}", config.server.bind, config.server.port);
    let state = AppState::from_config(config)?;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Rift console listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
