use axum::extract::{Json, Query, State};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::models::{CatalogObservation, Consultant, Dealer, TyreSize};
use crate::schema::{consultants, dealers, observation_catalog, tyre_sizes};
use crate::state::AppState;

#[derive(Serialize)]
pub struct DealerResponse {
    pub name: String,
    pub view_name: String,
    pub location: Option<String>,
}

#[derive(Serialize)]
pub struct SizeResponse {
    pub brand: String,
    pub size: String,
}

#[derive(Serialize)]
pub struct ObservationResponse {
    pub id: String,
    pub description: String,
}

#[derive(Deserialize)]
pub struct SizeQuery {
    pub brand: Option<String>,
}

pub async fn list_dealers(State(state): State<AppState>) -> AppResult<Json<Vec<DealerResponse>>> {
    let mut conn = state.db()?;
    let rows: Vec<Dealer> = dealers::table
        .order(dealers::view_name.asc())
        .load(&mut conn)?;
    Ok(Json(
        rows.into_iter()
            .map(|dealer| DealerResponse {
                name: dealer.name,
                view_name: dealer.view_name,
                location: dealer.location,
            })
            .collect(),
    ))
}

pub async fn list_sizes(
    State(state): State<AppState>,
    Query(query): Query<SizeQuery>,
) -> AppResult<Json<Vec<SizeResponse>>> {
    let mut conn = state.db()?;
    let mut sizes_query = tyre_sizes::table.into_boxed();
    if let Some(brand) = query.brand.as_deref().map(str::trim).filter(|b| !b.is_empty()) {
        sizes_query = sizes_query.filter(tyre_sizes::brand.eq(brand.to_string()));
    }
    let rows: Vec<TyreSize> = sizes_query
        .order((tyre_sizes::brand.asc(), tyre_sizes::size.asc()))
        .load(&mut conn)?;
    Ok(Json(
        rows.into_iter()
            .map(|row| SizeResponse {
                brand: row.brand,
                size: row.size,
            })
            .collect(),
    ))
}

pub async fn list_consultants(State(state): State<AppState>) -> AppResult<Json<Vec<String>>> {
    let mut conn = state.db()?;
    let rows: Vec<Consultant> = consultants::table
        .order(consultants::name.asc())
        .load(&mut conn)?;
    Ok(Json(rows.into_iter().map(|row| row.name).collect()))
}

pub async fn list_observations(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ObservationResponse>>> {
    let mut conn = state.db()?;
    let rows: Vec<CatalogObservation> = observation_catalog::table
        .order(observation_catalog::id.asc())
        .load(&mut conn)?;
    Ok(Json(
        rows.into_iter()
            .map(|row| ObservationResponse {
                id: row.id,
                description: row.description,
            })
            .collect(),
    ))
}
