use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use super::AppState;
use crate::cost;
use crate::error::WorksheetError;
use crate::export::{self, EXPORT_CONTENT_TYPE, EXPORT_FILE_NAME};
use crate::models::*;

// ============================================================
// Error Handling
// ============================================================

/// Map a worksheet error to a response.
///
/// Validation and lookup failures are safe to show the user and are returned
/// as-is. Anything else is logged in full and returned as a generic message.
fn api_error(e: WorksheetError) -> (StatusCode, String) {
    match e {
        WorksheetError::Validation(_) => {
            tracing::warn!("Validation error: {}", e);
            (StatusCode::BAD_REQUEST, e.to_string())
        }
        WorksheetError::IndexOutOfRange { .. } | WorksheetError::SessionNotFound(_) => {
            (StatusCode::NOT_FOUND, e.to_string())
        }
        WorksheetError::Export(_) | WorksheetError::InvalidRateTable(_) => {
            tracing::error!("Internal error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
    }
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Rates
// ============================================================

pub async fn list_rates(State(state): State<AppState>) -> Json<Vec<BandRate>> {
    Json(state.rates.entries().to_vec())
}

// ============================================================
// Sessions
// ============================================================

pub async fn create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SessionResponse>), (StatusCode, String)> {
    let session = state.sessions.create_session(&state.rates);
    let rows = state
        .sessions
        .with_worksheet(session.id, |ws| cost::compute_all(ws.snapshot(), &state.rates))
        .map_err(api_error)?;

    Ok((StatusCode::CREATED, Json(SessionResponse { session, rows })))
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionInfo>, (StatusCode, String)> {
    state.sessions.get_session(id).map(Json).map_err(api_error)
}

pub async fn end_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    if state.sessions.end_session(id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(api_error(WorksheetError::SessionNotFound(id)))
    }
}

pub async fn seed_worksheet(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SeedResult>, (StatusCode, String)> {
    state
        .sessions
        .with_worksheet_mut(id, |ws| SeedResult {
            rows_added: ws.seed(&state.rates),
            row_count: ws.len(),
        })
        .map(Json)
        .map_err(api_error)
}

// ============================================================
// Rows
// ============================================================

pub async fn list_rows(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<CostedLineItem>>, (StatusCode, String)> {
    state
        .sessions
        .with_worksheet(id, |ws| cost::compute_all(ws.snapshot(), &state.rates))
        .map(Json)
        .map_err(api_error)
}

pub async fn add_row(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<AddRowInput>,
) -> Result<(StatusCode, Json<CostedLineItem>), (StatusCode, String)> {
    let item = state
        .sessions
        .with_worksheet_mut(id, |ws| ws.add_row(input, &state.rates))
        .and_then(|r| r)
        .map_err(api_error)?;

    Ok((StatusCode::CREATED, Json(costed(item, &state.rates))))
}

pub async fn update_row(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
    Json(input): Json<UpdateRowInput>,
) -> Result<Json<CostedLineItem>, (StatusCode, String)> {
    let item = state
        .sessions
        .with_worksheet_mut(id, |ws| ws.update_row(index, input, &state.rates))
        .and_then(|r| r)
        .map_err(api_error)?;

    Ok(Json(costed(item, &state.rates)))
}

pub async fn remove_row(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
) -> Result<StatusCode, (StatusCode, String)> {
    state
        .sessions
        .with_worksheet_mut(id, |ws| ws.remove_row(index))
        .and_then(|r| r)
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(api_error)
}

pub async fn replace_rows(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(rows): Json<Vec<LineItem>>,
) -> Result<Json<ReplaceOutcome>, (StatusCode, String)> {
    state
        .sessions
        .with_worksheet_mut(id, |ws| ws.replace_all(rows, &state.rates))
        .map(Json)
        .map_err(api_error)
}

// ============================================================
// Roll-up and Export
// ============================================================

pub async fn get_summary(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SummaryResponse>, (StatusCode, String)> {
    state
        .sessions
        .with_worksheet(id, |ws| cost::report(ws.snapshot(), &state.rates))
        .map(|report| Json(report.into()))
        .map_err(api_error)
}

pub async fn export_csv(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let bytes = state
        .sessions
        .with_worksheet(id, |ws| {
            export::to_csv_bytes(&cost::compute_all(ws.snapshot(), &state.rates))
        })
        .and_then(|r| r)
        .map_err(api_error)?;

    let headers = [
        (header::CONTENT_TYPE, EXPORT_CONTENT_TYPE.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME),
        ),
    ];
    Ok((headers, bytes))
}

fn costed(item: LineItem, rates: &RateTable) -> CostedLineItem {
    let total_cost = cost::compute_cost(&item, rates);
    CostedLineItem { item, total_cost }
}
