use std::collections::{HashMap, HashSet};
use std::env;

use anyhow::{Context, Result};
use diesel::prelude::*;
use tracing_subscriber::EnvFilter;

use tyre_register::{
    codes::CodeFamily,
    config::AppConfig,
    db,
    models::{Recheck, Register},
    registers::held_family,
    schema::{issued_codes, rechecks, registers},
    status::ObservationStatus,
};

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let mut args = env::args().skip(1);
    match args.next().as_deref() {
        Some("audit-codes") => audit_codes(),
        Some(cmd) => {
            eprintln!("Unknown command: {cmd}\nUsage: maintenance audit-codes");
            std::process::exit(1);
        }
        None => {
            eprintln!("Usage: maintenance audit-codes");
            std::process::exit(1);
        }
    }
}

fn audit_codes() -> Result<()> {
    let config = AppConfig::from_env()?;
    tracing::info!(
        component = "maintenance",
        database_url = %config.redacted_database_url(),
        "loaded configuration"
    );
    let pool = db::init_pool_with_size(&config.database_url, 1)?;
    let mut conn = pool.get().context("failed to get database connection")?;

    let register_rows: Vec<Register> = registers::table
        .order(registers::id.asc())
        .load(&mut conn)
        .context("failed to load registers")?;
    let recheck_rows: Vec<Recheck> = rechecks::table
        .order(rechecks::recheck_no.asc())
        .load(&mut conn)
        .context("failed to load rechecks")?;
    let issued_rows: Vec<String> = issued_codes::table
        .select(issued_codes::code)
        .load(&mut conn)
        .context("failed to load issued codes")?;
    let issued: HashSet<&str> = issued_rows.iter().map(String::as_str).collect();

    let orphaned = orphaned_rechecks(&register_rows, &recheck_rows);
    if orphaned > 0 {
        println!("{orphaned} recheck(s) reference registers that have been deleted.");
    }

    let violations = find_violations(&register_rows, &recheck_rows, &issued);
    if violations.is_empty() {
        println!(
            "Checked {} registers and {} rechecks: no problems found.",
            register_rows.len(),
            recheck_rows.len()
        );
        return Ok(());
    }

    for violation in &violations {
        println!("{violation}");
    }
    println!("{} problem(s) found.", violations.len());
    std::process::exit(1);
}

/// Checks every code on record against its status and the issued-code ledger.
///
/// A recheck that reused its register's code keeps it after the register
/// moves on, so reused codes are only required to be issued register codes.
fn find_violations(
    register_rows: &[Register],
    recheck_rows: &[Recheck],
    issued: &HashSet<&str>,
) -> Vec<String> {
    let mut violations = Vec::new();
    let mut seen_codes: HashMap<&str, i32> = HashMap::new();

    for register in register_rows {
        let status = match register.observation_status.parse::<ObservationStatus>() {
            Ok(status) => status,
            Err(err) => {
                violations.push(format!("register {}: {err}", register.id));
                continue;
            }
        };

        match (status.code_family(), held_family(register)) {
            (None, None) => {}
            (None, Some(_)) => violations.push(format!(
                "register {}: status '{status}' should carry no code but has {:?}",
                register.id, register.observation_no
            )),
            (Some(expected), held) if held != Some(expected) => violations.push(format!(
                "register {}: status '{status}' expects a {expected} code but has {:?}",
                register.id, register.observation_no
            )),
            (Some(_), _) => {}
        }

        if let Some(code) = register.observation_no.as_deref() {
            if !issued.contains(code) {
                violations.push(format!(
                    "register {}: code {code} was never issued",
                    register.id
                ));
            }
            if let Some(first) = seen_codes.insert(code, register.id) {
                violations.push(format!(
                    "register {}: code {code} already issued to register {first}",
                    register.id
                ));
            }
        }
    }

    let mut seen_recheck_codes: HashSet<&str> = HashSet::new();

    for recheck in recheck_rows {
        let code = recheck.recheck_code.as_str();
        if !issued.contains(code) {
            violations.push(format!(
                "recheck {}: code {code} was never issued",
                recheck.recheck_no
            ));
        }

        match CodeFamily::of_code(code) {
            Some(CodeFamily::Recheck) => {
                if !seen_recheck_codes.insert(code) {
                    violations.push(format!(
                        "recheck {}: code {code} issued more than once",
                        recheck.recheck_no
                    ));
                }
            }
            Some(_) => {}
            None => violations.push(format!(
                "recheck {}: code {code} belongs to no code family",
                recheck.recheck_no
            )),
        }
    }

    violations
}

fn orphaned_rechecks(register_rows: &[Register], recheck_rows: &[Recheck]) -> usize {
    let ids: HashSet<i32> = register_rows.iter().map(|register| register.id).collect();
    recheck_rows
        .iter()
        .filter(|recheck| !ids.contains(&recheck.register_id))
        .count()
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
