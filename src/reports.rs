use std::collections::{BTreeMap, HashMap};

use diesel::pg::PgConnection;
use diesel::prelude::*;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::models::Register;
use crate::registers::{filtered_registers, list_registers, RegisterFilter};
use crate::schema::registers;
use crate::status::ObservationStatus;
use crate::store::{StoreError, StoreResult};

#[derive(Debug, Serialize, PartialEq)]
pub struct StatusShare {
    pub status: ObservationStatus,
    pub count: i64,
    pub percentage: f64,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct BrandCount {
    pub brand: String,
    pub count: i64,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct RegisterSummary {
    pub total: i64,
    pub statuses: Vec<StatusShare>,
    pub brands: Vec<BrandCount>,
}

/// Columns a register report may be restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportColumn {
    Id,
    ReceivedDate,
    ClaimNo,
    Dealer,
    Brand,
    Size,
    SerialNo,
    ObservationDate,
    TechnicalObservation,
    TreadDepth,
    Consultant,
    ObservationStatus,
    ObservationNo,
}

impl ReportColumn {
    pub const ALL: [ReportColumn; 13] = [
        ReportColumn::Id,
        ReportColumn::ReceivedDate,
        ReportColumn::ClaimNo,
        ReportColumn::Dealer,
        ReportColumn::Brand,
        ReportColumn::Size,
        ReportColumn::SerialNo,
        ReportColumn::ObservationDate,
        ReportColumn::TechnicalObservation,
        ReportColumn::TreadDepth,
        ReportColumn::Consultant,
        ReportColumn::ObservationStatus,
        ReportColumn::ObservationNo,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            ReportColumn::Id => "id",
            ReportColumn::ReceivedDate => "received_date",
            ReportColumn::ClaimNo => "claim_no",
            ReportColumn::Dealer => "dealer",
            ReportColumn::Brand => "brand",
            ReportColumn::Size => "size",
            ReportColumn::SerialNo => "serial_no",
            ReportColumn::ObservationDate => "observation_date",
            ReportColumn::TechnicalObservation => "technical_observation",
            ReportColumn::TreadDepth => "tread_depth",
            ReportColumn::Consultant => "consultant",
            ReportColumn::ObservationStatus => "observation_status",
            ReportColumn::ObservationNo => "observation_no",
        }
    }

    fn value(self, register: &Register) -> Value {
        match self {
            ReportColumn::Id => Value::from(register.id),
            ReportColumn::ReceivedDate => Value::from(register.received_date.to_string()),
            ReportColumn::ClaimNo => Value::from(register.claim_no.clone()),
            ReportColumn::Dealer => Value::from(register.dealer.clone()),
            ReportColumn::Brand => Value::from(register.brand.clone()),
            ReportColumn::Size => Value::from(register.size.clone()),
            ReportColumn::SerialNo => Value::from(register.serial_no.clone()),
            ReportColumn::ObservationDate => register
                .observation_date
                .map_or(Value::Null, |date| Value::from(date.to_string())),
            ReportColumn::TechnicalObservation => {
                Value::from(register.technical_observation.clone())
            }
            ReportColumn::TreadDepth => Value::from(register.tread_depth.clone()),
            ReportColumn::Consultant => Value::from(register.consultant.clone()),
            ReportColumn::ObservationStatus => Value::from(register.observation_status.clone()),
            ReportColumn::ObservationNo => Value::from(register.observation_no.clone()),
        }
    }
}

/// Parses a comma-separated column selection. Blank input selects every column.
pub fn parse_columns(raw: Option<&str>) -> StoreResult<Vec<ReportColumn>> {
    let Some(raw) = raw.filter(|value| !value.trim().is_empty()) else {
        return Ok(ReportColumn::ALL.to_vec());
    };

    let mut columns = Vec::new();
    for name in raw.split(',').map(str::trim).filter(|name| !name.is_empty()) {
        let column = ReportColumn::ALL
            .into_iter()
            .find(|column| column.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| StoreError::validation(format!("unknown report column '{name}'")))?;
        if !columns.contains(&column) {
            columns.push(column);
        }
    }
    Ok(columns)
}

fn percentage(count: i64, total: i64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = count as f64 * 100.0 / total as f64;
    (raw * 100.0).round() / 100.0
}

/// Folds `(status, brand)` pairs into the status and brand breakdowns.
///
/// Every status appears, zero-filled, in workflow order. Rows whose status
/// label is not recognised still count toward the total.
pub fn summarize<I>(rows: I) -> RegisterSummary
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut total = 0_i64;
    let mut by_status: HashMap<ObservationStatus, i64> = HashMap::new();
    let mut by_brand: BTreeMap<String, i64> = BTreeMap::new();

    for (status, brand) in rows {
        total += 1;
        if let Ok(status) = status.parse::<ObservationStatus>() {
            *by_status.entry(status).or_default() += 1;
        }
        *by_brand.entry(brand).or_default() += 1;
    }

    let statuses = ObservationStatus::ALL
        .into_iter()
        .map(|status| {
            let count = by_status.get(&status).copied().unwrap_or(0);
            StatusShare {
                status,
                count,
                percentage: percentage(count, total),
            }
        })
        .collect();

    let brands = by_brand
        .into_iter()
        .map(|(brand, count)| BrandCount { brand, count })
        .collect();

    RegisterSummary {
        total,
        statuses,
        brands,
    }
}

pub fn register_summary(
    conn: &mut PgConnection,
    filter: &RegisterFilter,
) -> StoreResult<RegisterSummary> {
    let rows: Vec<(String, String)> = filtered_registers(filter)?
        .select((registers::observation_status, registers::brand))
        .load(conn)?;
    Ok(summarize(rows))
}

/// Register rows matching `filter`, each projected onto `columns` with keys
/// in selection order.
pub fn register_report(
    conn: &mut PgConnection,
    filter: &RegisterFilter,
    columns: &[ReportColumn],
) -> StoreResult<Vec<Map<String, Value>>> {
    let entries = list_registers(conn, filter)?;
    Ok(entries
        .iter()
        .map(|register| project(register, columns))
        .collect())
}

fn project(register: &Register, columns: &[ReportColumn]) -> Map<String, Value> {
    columns
        .iter()
        .map(|column| (column.name().to_string(), column.value(register)))
        .collect()
}
