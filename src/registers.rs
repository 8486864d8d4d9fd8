use chrono::{NaiveDate, Utc};
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use serde::Deserialize;

use crate::codes::CodeFamily;
use crate::models::{NewRegister, Register};
use crate::schema::registers;
use crate::status::ObservationStatus;
use crate::store::{next_code, StoreError, StoreResult};
use crate::utils::json::{non_blank, nullable};

/// Caller-supplied fields for a new register entry.
///
/// There is no status field: every entry starts out `Pending`.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct NewRegisterInput {
    pub received_date: Option<NaiveDate>,
    pub claim_no: Option<String>,
    pub dealer: Option<String>,
    pub brand: Option<String>,
    pub size: Option<String>,
    pub serial_no: Option<String>,
    pub observation_date: Option<NaiveDate>,
    pub technical_observation: Option<String>,
    pub tread_depth: Option<String>,
    pub consultant: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct RegisterChanges {
    pub received_date: Option<NaiveDate>,
    pub claim_no: Option<String>,
    pub dealer: Option<String>,
    pub brand: Option<String>,
    pub size: Option<String>,
    pub serial_no: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub observation_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "nullable")]
    pub technical_observation: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub tread_depth: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub consultant: Option<Option<String>>,
    pub observation_status: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct RegisterFilter {
    pub status: Option<String>,
    pub brand: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(AsChangeset, Default)]
#[diesel(table_name = registers)]
struct RegisterChangeset {
    received_date: Option<NaiveDate>,
    claim_no: Option<String>,
    dealer: Option<String>,
    brand: Option<String>,
    size: Option<String>,
    serial_no: Option<String>,
    observation_date: Option<Option<NaiveDate>>,
    technical_observation: Option<Option<String>>,
    tread_depth: Option<Option<String>>,
    consultant: Option<Option<String>>,
    observation_status: Option<String>,
    observation_no: Option<Option<String>>,
}

impl RegisterChangeset {
    fn is_empty(&self) -> bool {
        self.received_date.is_none()
            && self.claim_no.is_none()
            && self.dealer.is_none()
            && self.brand.is_none()
            && self.size.is_none()
            && self.serial_no.is_none()
            && self.observation_date.is_none()
            && self.technical_observation.is_none()
            && self.tread_depth.is_none()
            && self.consultant.is_none()
            && self.observation_status.is_none()
            && self.observation_no.is_none()
    }
}

pub fn parse_status(raw: &str) -> StoreResult<ObservationStatus> {
    raw.parse::<ObservationStatus>()
        .map_err(|err| StoreError::validation(err.to_string()))
}

fn required(field: &str, value: Option<String>) -> StoreResult<String> {
    non_blank(value).ok_or_else(|| StoreError::validation(format!("{field} is required")))
}

fn replacement(field: &str, value: Option<String>) -> StoreResult<Option<String>> {
    match value {
        None => Ok(None),
        Some(raw) => match non_blank(Some(raw)) {
            Some(trimmed) => Ok(Some(trimmed)),
            None => Err(StoreError::validation(format!("{field} must not be empty"))),
        },
    }
}

/// Code an entry entering `status` should carry, given the code it holds now.
///
/// Re-entering the family it already holds a code in keeps that code, so
/// saving the same status twice never burns a sequence number.
fn resolve_code(
    conn: &mut PgConnection,
    status: ObservationStatus,
    current: Option<&str>,
) -> StoreResult<Option<String>> {
    let Some(family) = status.code_family() else {
        return Ok(None);
    };
    match current {
        Some(code) if family.owns(code) => Ok(Some(code.to_string())),
        _ => next_code(conn, family).map(Some),
    }
}

pub fn create_register(conn: &mut PgConnection, input: NewRegisterInput) -> StoreResult<Register> {
    let new_register = NewRegister {
        received_date: input
            .received_date
            .unwrap_or_else(|| Utc::now().date_naive()),
        claim_no: required("claim_no", input.claim_no)?,
        dealer: required("dealer", input.dealer)?,
        brand: required("brand", input.brand)?,
        size: required("size", input.size)?,
        serial_no: required("serial_no", input.serial_no)?,
        observation_date: input.observation_date,
        technical_observation: non_blank(input.technical_observation),
        tread_depth: non_blank(input.tread_depth),
        consultant: non_blank(input.consultant),
        observation_status: ObservationStatus::Pending.as_str().to_string(),
        observation_no: None,
    };

    let register: Register = diesel::insert_into(registers::table)
        .values(&new_register)
        .get_result(conn)?;

    tracing::info!(
        register_id = register.id,
        claim_no = %register.claim_no,
        "created register entry"
    );
    Ok(register)
}

pub fn get_register(conn: &mut PgConnection, register_id: i32) -> StoreResult<Register> {
    Ok(registers::table.find(register_id).first(conn)?)
}

pub(crate) fn filtered_registers(
    filter: &RegisterFilter,
) -> StoreResult<registers::BoxedQuery<'static, Pg>> {
    if let (Some(from), Some(to)) = (filter.from, filter.to) {
        if from > to {
            return Err(StoreError::validation("from must not be after to"));
        }
    }

    let mut query = registers::table.into_boxed();
    if let Some(raw) = filter.status.as_deref() {
        let status = parse_status(raw)?;
        query = query.filter(registers::observation_status.eq(status.as_str()));
    }
    if let Some(brand) = non_blank(filter.brand.clone()) {
        query = query.filter(registers::brand.eq(brand));
    }
    if let Some(from) = filter.from {
        query = query.filter(registers::received_date.ge(from));
    }
    if let Some(to) = filter.to {
        query = query.filter(registers::received_date.le(to));
    }
    Ok(query)
}

/// Entries matching `filter`, most recently received first.
pub fn list_registers(
    conn: &mut PgConnection,
    filter: &RegisterFilter,
) -> StoreResult<Vec<Register>> {
    Ok(filtered_registers(filter)?
        .order((registers::received_date.desc(), registers::id.desc()))
        .load(conn)?)
}

pub fn update_register(
    conn: &mut PgConnection,
    register_id: i32,
    changes: RegisterChanges,
) -> StoreResult<Register> {
    let status = changes
        .observation_status
        .as_deref()
        .map(parse_status)
        .transpose()?;

    let mut changeset = RegisterChangeset {
        received_date: changes.received_date,
        claim_no: replacement("claim_no", changes.claim_no)?,
        dealer: replacement("dealer", changes.dealer)?,
        brand: replacement("brand", changes.brand)?,
        size: replacement("size", changes.size)?,
        serial_no: replacement("serial_no", changes.serial_no)?,
        observation_date: changes.observation_date,
        technical_observation: changes.technical_observation.map(non_blank),
        tread_depth: changes.tread_depth.map(non_blank),
        consultant: changes.consultant.map(non_blank),
        ..Default::default()
    };

    conn.transaction::<Register, StoreError, _>(|conn| {
        let existing: Register = registers::table
            .find(register_id)
            .for_update()
            .first(conn)?;

        if let Some(status) = status {
            let code = resolve_code(conn, status, existing.observation_no.as_deref())?;
            if code != existing.observation_no {
                tracing::info!(
                    register_id,
                    status = %status,
                    previous = ?existing.observation_no,
                    code = ?code,
                    "register observation number changed"
                );
            }
            changeset.observation_status = Some(status.as_str().to_string());
            changeset.observation_no = Some(code);
        }

        if changeset.is_empty() {
            return Ok(existing);
        }

        diesel::update(registers::table.find(register_id))
            .set((&changeset, registers::updated_at.eq(Utc::now().naive_utc())))
            .execute(conn)?;

        Ok(registers::table.find(register_id).first(conn)?)
    })
}

/// Moves an entry to `status`, issuing or clearing its observation number.
pub fn set_register_status(
    conn: &mut PgConnection,
    register_id: i32,
    status: &str,
) -> StoreResult<Register> {
    update_register(
        conn,
        register_id,
        RegisterChanges {
            observation_status: Some(status.to_string()),
            ..Default::default()
        },
    )
}

/// Removes an entry. Rechecks that reference it are left untouched.
pub fn delete_register(conn: &mut PgConnection, register_id: i32) -> StoreResult<()> {
    let deleted = diesel::delete(registers::table.find(register_id)).execute(conn)?;
    if deleted == 0 {
        return Err(StoreError::NotFound);
    }
    tracing::info!(register_id, "deleted register entry");
    Ok(())
}

/// Family of the code an entry currently holds, if any.
pub fn held_family(register: &Register) -> Option<CodeFamily> {
    register
        .observation_no
        .as_deref()
        .and_then(CodeFamily::of_code)
}
