use axum::extract::{Json, Query, State};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::AppResult;
use crate::registers::RegisterFilter;
use crate::reports::{self, RegisterSummary};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ReportQuery {
    pub status: Option<String>,
    pub brand: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub columns: Option<String>,
}

impl ReportQuery {
    fn filter(&self) -> RegisterFilter {
        RegisterFilter {
            status: self.status.clone(),
            brand: self.brand.clone(),
            from: self.from,
            to: self.to,
        }
    }
}

#[derive(Serialize)]
pub struct RegisterReportResponse {
    pub columns: Vec<&'static str>,
    pub rows: Vec<Map<String, Value>>,
}

pub async fn register_summary(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> AppResult<Json<RegisterSummary>> {
    let mut conn = state.db()?;
    let summary = reports::register_summary(&mut conn, &query.filter())?;
    Ok(Json(summary))
}

pub async fn register_report(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> AppResult<Json<RegisterReportResponse>> {
    let columns = reports::parse_columns(query.columns.as_deref())?;
    let mut conn = state.db()?;
    let rows = reports::register_report(&mut conn, &query.filter(), &columns)?;
    Ok(Json(RegisterReportResponse {
        columns: columns.iter().map(|column| column.name()).collect(),
        rows,
    }))
}
