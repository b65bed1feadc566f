//! `collect` and `show` handlers.

use std::future::Future;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use fotd_core::{AppConfig, Location, Snapshot};
use fotd_scraper::{default_sources, BrowserPool, Orchestrator, ScrapeContext};
use fotd_store::SnapshotStore;

/// Run every source once and save (or print) the snapshot.
///
/// The browser is shut down before returning, whatever the outcome,
/// including Ctrl-C or SIGTERM mid-run.
///
/// # Errors
///
/// Returns an error if the run is interrupted or the snapshot cannot be
/// saved or printed.
pub(crate) async fn collect(config: &AppConfig, path: &Path, dry_run: bool) -> anyhow::Result<()> {
    let browser = Arc::new(BrowserPool::new(config.chrome_executable.clone()));
    let ctx = ScrapeContext::from_app_config(browser.clone(), config);
    let orchestrator = Orchestrator::new(default_sources(), ctx);

    let outcome = run_until(&orchestrator, shutdown_signal()).await;
    browser.shutdown().await;
    let Some(snapshot) = outcome else {
        anyhow::bail!("collection interrupted; nothing saved");
    };

    for error in &snapshot.errors {
        tracing::warn!(source = %error.source, error = %error.message, "source failed");
    }

    if dry_run {
        return print_json(&snapshot);
    }

    let store = SnapshotStore::open(path).await?;
    let saved = store.save(snapshot).await?;
    println!(
        "saved {} locations ({} source errors) to {}",
        saved.total_locations,
        saved.errors.len(),
        store.path().display()
    );
    Ok(())
}

/// Run every source unless `interrupt` resolves first.
pub(crate) async fn run_until(
    orchestrator: &Orchestrator,
    interrupt: impl Future<Output = ()>,
) -> Option<Snapshot> {
    tokio::select! {
        snapshot = orchestrator.run_all() => Some(snapshot),
        () = interrupt => {
            tracing::warn!("interrupted; abandoning collection run");
            None
        }
    }
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
}

/// Print the stored snapshot, or one location of it.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be read or `id` matches no location.
pub(crate) fn show(path: &Path, id: Option<&str>) -> anyhow::Result<()> {
    let snapshot = fotd_store::read_snapshot(path)?;
    match id {
        Some(id) => {
            let location = find_location(&snapshot, id)?;
            print_json(location)
        }
        None => print_json(&snapshot),
    }
}

pub(crate) fn find_location<'a>(
    snapshot: &'a Snapshot,
    id: &str,
) -> anyhow::Result<&'a Location> {
    snapshot.location(id).ok_or_else(|| {
        let known: Vec<&str> = snapshot.locations.iter().map(|l| l.id.as_str()).collect();
        anyhow::anyhow!("no location '{id}'; known ids: {}", known.join(", "))
    })
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
