use std::net::SocketAddr;

use tracing::{error, info};
use vclock_core::config::ClockConfig;
use vclock_core::{logging, CoreResult};
use vclock_time::{ClockApiBuilder, ClockService};

#[tokio::main]
async fn main() -> CoreResult<()> {
    dotenvy::dotenv().ok();

    let config = ClockConfig::from_env()?;

    if let Err(err) = logging::init_tracing(Some(config.log_level())) {
        eprintln!("⚠️ failed to initialise tracing: {err}");
    }

    let addr: SocketAddr = config.bind_address().parse()?;

    let router = ClockApiBuilder::new(ClockService::new()).into_router();

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let actual_addr = listener.local_addr()?;
    info!(%actual_addr, environment = ?config.environment, "starting vclock");

    if let Err(err) = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(?err, "clock server terminated with error");
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        if let Ok(mut sigterm) =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        {
            sigterm.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}
