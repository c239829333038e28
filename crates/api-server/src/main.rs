//! API Server binary entrypoint.

use api_server::{ApiServer, ServerConfig};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// YieldShift migration scoring API.
#[derive(Debug, Parser)]
#[command(name = "api-server", version, about)]
struct Args {
    /// Host to bind to (overrides API_HOST).
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides PORT / API_PORT).
    #[arg(long)]
    port: Option<u16>,

    /// Emit JSON logs (overrides LOG_FORMAT).
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let mut config = ServerConfig::from_env();
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    config.log_json |= args.json_logs;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "api_server=debug,migration_scorer=info,tower_http=debug".into()
    });
    let registry = tracing_subscriber::registry().with(filter);
    if config.log_json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    ApiServer::new(config).run().await
}
