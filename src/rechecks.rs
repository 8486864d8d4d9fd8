use chrono::{NaiveDate, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use serde::Deserialize;

use crate::codes::CodeFamily;
use crate::models::{NewRecheck, Recheck, Register};
use crate::registers::parse_status;
use crate::schema::{rechecks, registers};
use crate::status::ObservationStatus;
use crate::store::{next_code, StoreError, StoreResult};
use crate::utils::json::{non_blank, nullable};

#[derive(Debug, Default, Clone, Deserialize)]
pub struct NewRecheckInput {
    pub recheck_date: Option<NaiveDate>,
    pub recheck_status: Option<String>,
    pub recheck_observation: Option<String>,
    pub recheck_tread_depth: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct RecheckChanges {
    pub recheck_date: Option<NaiveDate>,
    pub recheck_status: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub recheck_observation: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub recheck_tread_depth: Option<Option<String>>,
}

#[derive(AsChangeset, Default)]
#[diesel(table_name = rechecks)]
struct RecheckChangeset {
    recheck_date: Option<NaiveDate>,
    recheck_status: Option<String>,
    recheck_observation: Option<Option<String>>,
    recheck_tread_depth: Option<Option<String>>,
}

/// A recheck records an outcome, so `Pending` is not accepted.
fn recheck_status(raw: &str) -> StoreResult<ObservationStatus> {
    let status = parse_status(raw)?;
    if status == ObservationStatus::Pending {
        return Err(StoreError::validation("recheck_status must not be Pending"));
    }
    Ok(status)
}

/// The parent's own number is reused when the recheck confirms the outcome
/// the parent already carries; otherwise a fresh `RC` number is drawn.
fn recheck_code(
    conn: &mut PgConnection,
    parent: &Register,
    status: ObservationStatus,
) -> StoreResult<String> {
    let same_outcome = parent
        .observation_status
        .parse::<ObservationStatus>()
        .is_ok_and(|current| current == status);

    match parent.observation_no.as_deref() {
        Some(code) if same_outcome => Ok(code.to_string()),
        _ => next_code(conn, CodeFamily::Recheck),
    }
}

pub fn create_recheck(
    conn: &mut PgConnection,
    register_id: i32,
    input: NewRecheckInput,
) -> StoreResult<Recheck> {
    conn.transaction::<Recheck, StoreError, _>(|conn| {
        let parent: Register = registers::table
            .find(register_id)
            .for_share()
            .first(conn)?;

        let recheck_date = input
            .recheck_date
            .ok_or_else(|| StoreError::validation("recheck_date is required"))?;
        let status = non_blank(input.recheck_status)
            .ok_or_else(|| StoreError::validation("recheck_status is required"))
            .and_then(|raw| recheck_status(&raw))?;

        let new_recheck = NewRecheck {
            register_id,
            recheck_date,
            recheck_status: status.as_str().to_string(),
            recheck_observation: non_blank(input.recheck_observation),
            recheck_tread_depth: non_blank(input.recheck_tread_depth),
            recheck_code: recheck_code(conn, &parent, status)?,
        };

        let recheck: Recheck = diesel::insert_into(rechecks::table)
            .values(&new_recheck)
            .get_result(conn)?;

        tracing::info!(
            register_id,
            recheck_no = recheck.recheck_no,
            code = %recheck.recheck_code,
            "created recheck"
        );
        Ok(recheck)
    })
}

pub fn get_recheck(conn: &mut PgConnection, recheck_no: i32) -> StoreResult<Recheck> {
    Ok(rechecks::table.find(recheck_no).first(conn)?)
}

/// Rechecks recorded against `register_id`, newest first.
///
/// The parent need not exist any more: rechecks outlive a deleted register.
pub fn list_rechecks_for_register(
    conn: &mut PgConnection,
    register_id: i32,
) -> StoreResult<Vec<Recheck>> {
    Ok(rechecks::table
        .filter(rechecks::register_id.eq(register_id))
        .order((rechecks::recheck_date.desc(), rechecks::recheck_no.desc()))
        .load(conn)?)
}

pub fn list_rechecks(conn: &mut PgConnection) -> StoreResult<Vec<Recheck>> {
    Ok(rechecks::table
        .order((rechecks::recheck_date.desc(), rechecks::recheck_no.desc()))
        .load(conn)?)
}

/// Updates the recheck's own fields. Neither its code nor the parent
/// register is touched.
pub fn update_recheck(
    conn: &mut PgConnection,
    recheck_no: i32,
    changes: RecheckChanges,
) -> StoreResult<Recheck> {
    let changeset = RecheckChangeset {
        recheck_date: changes.recheck_date,
        recheck_status: changes
            .recheck_status
            .as_deref()
            .map(recheck_status)
            .transpose()?
            .map(|status| status.as_str().to_string()),
        recheck_observation: changes.recheck_observation.map(non_blank),
        recheck_tread_depth: changes.recheck_tread_depth.map(non_blank),
    };

    if changeset.recheck_date.is_none()
        && changeset.recheck_status.is_none()
        && changeset.recheck_observation.is_none()
        && changeset.recheck_tread_depth.is_none()
    {
        return get_recheck(conn, recheck_no);
    }

    let updated: Recheck = diesel::update(rechecks::table.find(recheck_no))
        .set((&changeset, rechecks::updated_at.eq(Utc::now().naive_utc())))
        .get_result(conn)?;
    Ok(updated)
}

pub fn delete_recheck(conn: &mut PgConnection, recheck_no: i32) -> StoreResult<()> {
    let deleted = diesel::delete(rechecks::table.find(recheck_no)).execute(conn)?;
    if deleted == 0 {
        return Err(StoreError::NotFound);
    }
    tracing::info!(recheck_no, "deleted recheck");
    Ok(())
}
