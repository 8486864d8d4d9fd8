use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::NaiveDate;
use serde::Serialize;

use crate::error::AppResult;
use crate::models::Recheck;
use crate::rechecks::{self, NewRecheckInput, RecheckChanges};
use crate::state::AppState;

use super::to_iso;

#[derive(Serialize)]
pub struct RecheckResponse {
    pub recheck_no: i32,
    pub register_id: i32,
    pub recheck_date: NaiveDate,
    pub recheck_status: String,
    pub recheck_observation: Option<String>,
    pub recheck_tread_depth: Option<String>,
    pub recheck_code: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Recheck> for RecheckResponse {
    fn from(recheck: Recheck) -> Self {
        Self {
            recheck_no: recheck.recheck_no,
            register_id: recheck.register_id,
            recheck_date: recheck.recheck_date,
            recheck_status: recheck.recheck_status,
            recheck_observation: recheck.recheck_observation,
            recheck_tread_depth: recheck.recheck_tread_depth,
            recheck_code: recheck.recheck_code,
            created_at: to_iso(recheck.created_at),
            updated_at: to_iso(recheck.updated_at),
        }
    }
}

fn to_responses(list: Vec<Recheck>) -> Vec<RecheckResponse> {
    list.into_iter().map(RecheckResponse::from).collect()
}

pub async fn list_rechecks(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<RecheckResponse>>> {
    let mut conn = state.db()?;
    Ok(Json(to_responses(rechecks::list_rechecks(&mut conn)?)))
}

pub async fn list_register_rechecks(
    State(state): State<AppState>,
    Path(register_id): Path<i32>,
) -> AppResult<Json<Vec<RecheckResponse>>> {
    let mut conn = state.db()?;
    let list = rechecks::list_rechecks_for_register(&mut conn, register_id)?;
    Ok(Json(to_responses(list)))
}

pub async fn create_recheck(
    State(state): State<AppState>,
    Path(register_id): Path<i32>,
    Json(payload): Json<NewRecheckInput>,
) -> AppResult<(StatusCode, Json<RecheckResponse>)> {
    let mut conn = state.db()?;
    let recheck = rechecks::create_recheck(&mut conn, register_id, payload)?;
    Ok((StatusCode::CREATED, Json(recheck.into())))
}

pub async fn get_recheck(
    State(state): State<AppState>,
    Path(recheck_no): Path<i32>,
) -> AppResult<Json<RecheckResponse>> {
    let mut conn = state.db()?;
    Ok(Json(rechecks::get_recheck(&mut conn, recheck_no)?.into()))
}

pub async fn update_recheck(
    State(state): State<AppState>,
    Path(recheck_no): Path<i32>,
    Json(payload): Json<RecheckChanges>,
) -> AppResult<Json<RecheckResponse>> {
    let mut conn = state.db()?;
    let recheck = rechecks::update_recheck(&mut conn, recheck_no, payload)?;
    Ok(Json(recheck.into()))
}

pub async fn delete_recheck(
    State(state): State<AppState>,
    Path(recheck_no): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.db()?;
    rechecks::delete_recheck(&mut conn, recheck_no)?;
    Ok(StatusCode::NO_CONTENT)
}
