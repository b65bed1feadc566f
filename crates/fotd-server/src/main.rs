mod api;
mod middleware;
mod scheduler;

use std::sync::Arc;

use fotd_scraper::{default_sources, BrowserPool, Orchestrator, ScrapeContext};
use fotd_store::SnapshotStore;
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = fotd_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    tracing::info!(env = %config.env, "starting fotd-server");

    let browser = Arc::new(BrowserPool::new(config.chrome_executable.clone()));
    let ctx = ScrapeContext::from_app_config(browser.clone(), &config);
    let state = AppState {
        store: Arc::new(SnapshotStore::open(&config.snapshot_path).await?),
        orchestrator: Arc::new(Orchestrator::new(default_sources(), ctx)),
    };

    let mut scheduler =
        scheduler::build_scheduler(state.clone(), &config.schedule, config.timezone).await?;
    if config.run_on_startup {
        scheduler::spawn_startup_run(state.clone());
    }

    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    if let Err(e) = scheduler.shutdown().await {
        tracing::warn!(error = %e, "scheduler did not shut down cleanly");
    }
    browser.shutdown().await;
    served?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
