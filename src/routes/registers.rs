use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::models::Register;
use crate::registers::{self, NewRegisterInput, RegisterChanges, RegisterFilter};
use crate::state::AppState;

use super::to_iso;

#[derive(Serialize)]
pub struct RegisterResponse {
    pub id: i32,
    pub received_date: NaiveDate,
    pub claim_no: String,
    pub dealer: String,
    pub brand: String,
    pub size: String,
    pub serial_no: String,
    pub observation_date: Option<NaiveDate>,
    pub technical_observation: Option<String>,
    pub tread_depth: Option<String>,
    pub consultant: Option<String>,
    pub observation_status: String,
    pub observation_no: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Register> for RegisterResponse {
    fn from(register: Register) -> Self {
        Self {
            id: register.id,
            received_date: register.received_date,
            claim_no: register.claim_no,
            dealer: register.dealer,
            brand: register.brand,
            size: register.size,
            serial_no: register.serial_no,
            observation_date: register.observation_date,
            technical_observation: register.technical_observation,
            tread_depth: register.tread_depth,
            consultant: register.consultant,
            observation_status: register.observation_status,
            observation_no: register.observation_no,
            created_at: to_iso(register.created_at),
            updated_at: to_iso(register.updated_at),
        }
    }
}

#[derive(Deserialize)]
pub struct SetStatusRequest {
    pub status: String,
}

pub async fn list_registers(
    State(state): State<AppState>,
    Query(filter): Query<RegisterFilter>,
) -> AppResult<Json<Vec<RegisterResponse>>> {
    let mut conn = state.db()?;
    let entries = registers::list_registers(&mut conn, &filter)?;
    Ok(Json(entries.into_iter().map(RegisterResponse::from).collect()))
}

pub async fn create_register(
    State(state): State<AppState>,
    Json(payload): Json<NewRegisterInput>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    let mut conn = state.db()?;
    let register = registers::create_register(&mut conn, payload)?;
    Ok((StatusCode::CREATED, Json(register.into())))
}

pub async fn get_register(
    State(state): State<AppState>,
    Path(register_id): Path<i32>,
) -> AppResult<Json<RegisterResponse>> {
    let mut conn = state.db()?;
    let register = registers::get_register(&mut conn, register_id)?;
    Ok(Json(register.into()))
}

pub async fn update_register(
    State(state): State<AppState>,
    Path(register_id): Path<i32>,
    Json(payload): Json<RegisterChanges>,
) -> AppResult<Json<RegisterResponse>> {
    let mut conn = state.db()?;
    let register = registers::update_register(&mut conn, register_id, payload)?;
    Ok(Json(register.into()))
}

pub async fn set_register_status(
    State(state): State<AppState>,
    Path(register_id): Path<i32>,
    Json(payload): Json<SetStatusRequest>,
) -> AppResult<Json<RegisterResponse>> {
    let mut conn = state.db()?;
    let register = registers::set_register_status(&mut conn, register_id, &payload.status)?;
    Ok(Json(register.into()))
}

pub async fn delete_register(
    State(state): State<AppState>,
    Path(register_id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.db()?;
    registers::delete_register(&mut conn, register_id)?;
    Ok(StatusCode::NO_CONTENT)
}
