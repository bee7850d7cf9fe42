use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use homeskill_gateway::api::ApiServer;
use homeskill_gateway::{
    AmazonProfileClient, Config, DeviceRegistry, DirectiveRouter, Dispatcher, HookBackend,
    IdentityVerifier,
};

/// Homeskill - smart-home directive router for Hook RF outlets
#[derive(Parser)]
#[command(name = "homeskill", version, about)]
struct Cli {
    /// Path to the TOML config file
    #[arg(short, long, env = "HOMESKILL_CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on (overrides the config file)
    #[arg(long)]
    port: Option<u16>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,homeskill_gateway=info",
        1 => "info,homeskill_gateway=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    tracing::debug!(?config, "loaded configuration");

    let registry = Arc::new(DeviceRegistry::from_config(
        &config.devices,
        &config.backend.token,
    )?);

    let backend = HookBackend::new(&config.backend.base_url, config.dispatch.request_timeout)?;
    let dispatcher = Dispatcher::with_limits(
        Arc::new(backend),
        config.dispatch.attempts,
        config.dispatch.max_in_flight,
    );

    let identity = IdentityVerifier::new(
        Box::new(AmazonProfileClient::new(&config.identity.profile_url)),
        &config.identity.authorized_user_id,
    );

    tracing::info!(
        devices = registry.len(),
        attempts = config.dispatch.attempts,
        timeout_ms = u64::try_from(config.dispatch.timeout.as_millis()).unwrap_or(u64::MAX),
        "starting homeskill gateway"
    );

    let router = DirectiveRouter::new(
        registry,
        dispatcher,
        identity,
        config.dispatch.wait_policy(),
    );

    let port = cli.port.unwrap_or(config.server.port);
    ApiServer::new(router, port).run().await?;

    Ok(())
}
