use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::schema::*;

#[derive(Debug, Clone, Queryable, Identifiable)]
#[diesel(table_name = registers)]
pub struct Register {
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
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = registers)]
pub struct NewRegister {
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
}

#[derive(Debug, Clone, Queryable, Identifiable)]
#[diesel(table_name = rechecks)]
#[diesel(primary_key(recheck_no))]
pub struct Recheck {
    pub recheck_no: i32,
    pub register_id: i32,
    pub recheck_date: NaiveDate,
    pub recheck_status: String,
    pub recheck_observation: Option<String>,
    pub recheck_tread_depth: Option<String>,
    pub recheck_code: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = rechecks)]
pub struct NewRecheck {
    pub register_id: i32,
    pub recheck_date: NaiveDate,
    pub recheck_status: String,
    pub recheck_observation: Option<String>,
    pub recheck_tread_depth: Option<String>,
    pub recheck_code: String,
}

#[derive(Debug, Clone, Queryable)]
#[diesel(table_name = issued_codes)]
pub struct IssuedCode {
    pub code: String,
    pub family: String,
    pub issued_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = issued_codes)]
pub struct NewIssuedCode<'a> {
    pub code: &'a str,
    pub family: &'a str,
}

#[derive(Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = dealers)]
pub struct Dealer {
    pub name: String,
    pub view_name: String,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = tyre_sizes)]
pub struct TyreSize {
    pub brand: String,
    pub size: String,
}

#[derive(Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = consultants)]
pub struct Consultant {
    pub name: String,
}

#[derive(Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = observation_catalog)]
pub struct CatalogObservation {
    pub id: String,
    pub description: String,
}
