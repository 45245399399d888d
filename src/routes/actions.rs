use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::Value;

use crate::aggregate::{DateRange, TimeseriesParams};
use crate::error::AppError;
use crate::models::{Action, PeriodTotal};
use crate::state::SharedState;

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub start: Option<String>,
    pub end: Option<String>,
}

impl ListParams {
    fn range(&self) -> Result<DateRange, AppError> {
        DateRange::parse(self.start.as_deref(), self.end.as_deref())
    }
}

pub async fn list(
    State(state): State<SharedState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<Action>>, AppError> {
    let Query(params) = params.map_err(bad_query)?;
    let actions = state.repo.list_between(&params.range()?).await?;
    Ok(Json(actions))
}

pub async fn create(
    State(state): State<SharedState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Action>), AppError> {
    let Json(payload) = payload.map_err(bad_json)?;
    let action = state.repo.create(&payload).await?;
    Ok((StatusCode::CREATED, Json(action)))
}

pub async fn get(
    State(state): State<SharedState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Action>, AppError> {
    let id = action_id(id)?;
    let action = state.repo.get_by_id(id).await?;
    Ok(Json(action))
}

pub async fn update(
    State(state): State<SharedState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Action>, AppError> {
    let id = action_id(id)?;
    // Unknown ids are reported before anything about the body.
    state.repo.get_by_id(id).await?;
    let Json(payload) = payload.map_err(bad_json)?;
    let action = state.repo.update(id, &payload).await?;
    Ok(Json(action))
}

pub async fn delete(
    State(state): State<SharedState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let id = action_id(id)?;
    state.repo.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn points_timeseries(
    State(state): State<SharedState>,
    params: Result<Query<TimeseriesParams>, QueryRejection>,
) -> Result<Json<Vec<PeriodTotal>>, AppError> {
    let Query(params) = params.map_err(bad_query)?;
    let series = state.repo.points_timeseries(&params).await?;
    Ok(Json(series))
}

// Ids that are not integers cannot name a row.
fn action_id(id: Result<Path<i64>, PathRejection>) -> Result<i64, AppError> {
    id.map(|Path(id)| id)
        .map_err(|e| AppError::NotFound(format!("Invalid action id: {}", e.body_text())))
}

fn bad_json(rejection: JsonRejection) -> AppError {
    AppError::Rejected(rejection.status(), rejection.body_text())
}

fn bad_query(rejection: QueryRejection) -> AppError {
    AppError::Rejected(rejection.status(), rejection.body_text())
}
