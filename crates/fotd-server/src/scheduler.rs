//! Background refresh trigger.
//!
//! One cron job, evaluated in the operating timezone, runs every source and
//! saves the snapshot. Overlapping runs are skipped rather than queued.

use chrono_tz::Tz;
use tokio::task::JoinHandle;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use crate::api::AppState;

/// Builds and starts the scheduler with the daily refresh job registered.
///
/// The returned handle must be kept alive, and shut down on exit.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the schedule does not parse or the
/// scheduler fails to start.
pub async fn build_scheduler(
    state: AppState,
    schedule: &str,
    timezone: Tz,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;
    register_refresh_job(&scheduler, state, schedule, timezone).await?;
    scheduler.start().await?;
    Ok(scheduler)
}

async fn register_refresh_job(
    scheduler: &JobScheduler,
    state: AppState,
    schedule: &str,
    timezone: Tz,
) -> Result<(), JobSchedulerError> {
    let job = Job::new_async_tz(schedule, timezone, move |_uuid, _lock| {
        let state = state.clone();
        Box::pin(async move {
            run_refresh(&state, "schedule").await;
        })
    })?;

    scheduler.add(job).await?;
    tracing::info!(schedule, timezone = %timezone.name(), "scheduler: refresh job registered");
    Ok(())
}

/// Kick off one refresh in the background, e.g. at process start.
pub fn spawn_startup_run(state: AppState) -> JoinHandle<()> {
    tokio::spawn(async move {
        run_refresh(&state, "startup").await;
    })
}

async fn run_refresh(state: &AppState, trigger: &'static str) {
    tracing::info!(trigger, "scheduler: starting refresh");
    match state.refresh().await {
        Ok(Some(snapshot)) => tracing::info!(
            trigger,
            locations = snapshot.total_locations,
            errors = snapshot.errors.len(),
            "scheduler: refresh complete"
        ),
        Ok(None) => tracing::warn!(trigger, "scheduler: previous refresh still running; skipped"),
        Err(e) => tracing::error!(trigger, error = %e, "scheduler: failed to save snapshot"),
    }
}
