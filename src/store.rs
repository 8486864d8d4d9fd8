use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use thiserror::Error;

use crate::codes::{allocate_next, CodeFamily};
use crate::models::NewIssuedCode;
use crate::schema::issued_codes;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("{0}")]
    Validation(String),
    #[error("database error: {0}")]
    Storage(diesel::result::Error),
}

impl StoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        StoreError::Validation(message.into())
    }
}

impl From<diesel::result::Error> for StoreError {
    fn from(value: diesel::result::Error) -> Self {
        match value {
            diesel::result::Error::NotFound => StoreError::NotFound,
            other => StoreError::Storage(other),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Blocks until this transaction holds the allocation lock for `family`.
///
/// Must run inside a transaction; PostgreSQL releases the lock at commit or
/// rollback.
pub fn lock_code_family(conn: &mut PgConnection, family: CodeFamily) -> StoreResult<()> {
    diesel::sql_query("SELECT pg_advisory_xact_lock($1)")
        .bind::<BigInt, _>(family.lock_key())
        .execute(conn)?;
    Ok(())
}

/// Allocates the next code of `family` and records it as issued.
///
/// Takes the family lock first, so two transactions allocating in the same
/// family are serialized until the first one commits. The ledger keeps every
/// code ever allocated, so a code later cleared from its record is never
/// issued again.
pub fn next_code(conn: &mut PgConnection, family: CodeFamily) -> StoreResult<String> {
    lock_code_family(conn, family)?;

    let issued: Vec<String> = issued_codes::table
        .filter(issued_codes::family.eq(family.prefix()))
        .select(issued_codes::code)
        .load(conn)?;
    let code = allocate_next(family, issued.iter().map(String::as_str));

    diesel::insert_into(issued_codes::table)
        .values(&NewIssuedCode {
            code: &code,
            family: family.prefix(),
        })
        .execute(conn)?;

    tracing::debug!(family = %family, code = %code, "issued code");
    Ok(code)
}
