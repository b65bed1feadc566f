use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Extension, Json,
};
use fotd_core::SourceError;
use serde::Serialize;

use super::{ApiError, AppState};
use crate::middleware::RequestId;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RefreshData {
    total_locations: usize,
    errors: Vec<SourceError>,
}

pub(super) async fn get_snapshot(State(state): State<AppState>) -> Response {
    let snapshot = state.store.current().await;
    Json(snapshot.as_ref()).into_response()
}

pub(super) async fn get_location(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let snapshot = state.store.current().await;
    match snapshot.location(&id) {
        Some(location) => Ok(Json(location).into_response()),
        None => Err(ApiError::new(
            req_id.0,
            "not_found",
            format!("location {id} not found"),
        )),
    }
}

pub(super) async fn refresh(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<RefreshData>, ApiError> {
    tracing::info!(request_id = %req_id.0, "manual refresh requested");
    match state.refresh().await {
        Ok(Some(snapshot)) => Ok(Json(RefreshData {
            total_locations: snapshot.total_locations,
            errors: snapshot.errors.clone(),
        })),
        Ok(None) => Err(ApiError::new(
            req_id.0,
            "conflict",
            "a refresh is already in progress",
        )),
        Err(e) => {
            tracing::error!(error = %e, "manual refresh: failed to save snapshot");
            Err(ApiError::new(
                req_id.0,
                "internal_error",
                "failed to save snapshot",
            ))
        }
    }
}
