mod common;

use anyhow::Result;
use axum::http::StatusCode;
use common::{acquire_db_lock, expect_json, TestApp};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
struct RegisterInfo {
    id: i32,
    received_date: String,
    claim_no: String,
    consultant: Option<String>,
    observation_status: String,
    observation_no: Option<String>,
}

fn register_payload(claim_no: &str, received_date: &str) -> Value {
    json!({
        "received_date": received_date,
        "claim_no": claim_no,
        "dealer": "Kandy Tyre House",
        "brand": "CEAT",
        "size": "175/70R13",
        "serial_no": "DOT 1223",
        "consultant": "N. Perera",
        "tread_depth": "3.5mm",
    })
}

async fn create(app: &TestApp, claim_no: &str, received_date: &str) -> Result<RegisterInfo> {
    let response = app
        .post_json("/api/registers", &register_payload(claim_no, received_date))
        .await?;
    expect_json(response, StatusCode::CREATED).await
}

async fn set_status(app: &TestApp, id: i32, status: &str) -> Result<RegisterInfo> {
    let response = app
        .patch_json(
            &format!("/api/registers/{id}/status"),
            &json!({ "status": status }),
        )
        .await?;
    expect_json(response, StatusCode::OK).await
}

#[tokio::test]
async fn new_registers_start_pending_without_code() -> Result<()> {
    let _lock = acquire_db_lock().await;
    let app = TestApp::new().await?;

    let mut payload = register_payload("CL-100", "2024-04-02");
    payload["observation_status"] = json!("Recommended");
    payload["observation_no"] = json!("R00042");
    let response = app.post_json("/api/registers", &payload).await?;
    let created: RegisterInfo = expect_json(response, StatusCode::CREATED).await?;

    assert_eq!(created.claim_no, "CL-100");
    assert_eq!(created.received_date, "2024-04-02");
    assert_eq!(created.observation_status, "Pending");
    assert_eq!(created.observation_no, None);

    let fetched: RegisterInfo = expect_json(
        app.get(&format!("/api/registers/{}", created.id)).await?,
        StatusCode::OK,
    )
    .await?;
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.consultant.as_deref(), Some("N. Perera"));

    app.cleanup().await?;
    Ok(())
}

#[tokio::test]
async fn creation_requires_identifying_fields() -> Result<()> {
    let _lock = acquire_db_lock().await;
    let app = TestApp::new().await?;

    for field in ["claim_no", "dealer", "brand", "size", "serial_no"] {
        let mut payload = register_payload("CL-1", "2024-04-02");
        payload[field] = json!("   ");
        let response = app.post_json("/api/registers", &payload).await?;
        let body: Value = expect_json(response, StatusCode::BAD_REQUEST).await?;
        assert_eq!(body["error"], format!("{field} is required"));
    }

    let listed: Vec<RegisterInfo> =
        expect_json(app.get("/api/registers").await?, StatusCode::OK).await?;
    assert!(listed.is_empty());

    app.cleanup().await?;
    Ok(())
}

#[tokio::test]
async fn status_transitions_issue_and_clear_codes() -> Result<()> {
    let _lock = acquire_db_lock().await;
    let app = TestApp::new().await?;

    let first = create(&app, "CL-1", "2024-04-01").await?;
    let second = create(&app, "CL-2", "2024-04-02").await?;

    let first = set_status(&app, first.id, "Not Recommended").await?;
    assert_eq!(first.observation_no.as_deref(), Some("NR00001"));
    let second = set_status(&app, second.id, "Not Recommended").await?;
    assert_eq!(second.observation_no.as_deref(), Some("NR00002"));

    // Saving the same status again keeps the number.
    let resaved = set_status(&app, first.id, "Not Recommended").await?;
    assert_eq!(resaved.observation_no.as_deref(), Some("NR00001"));
    let patched: RegisterInfo = expect_json(
        app.patch_json(
            &format!("/api/registers/{}", first.id),
            &json!({ "observation_status": "Not Recommended", "tread_depth": "2mm" }),
        )
        .await?,
        StatusCode::OK,
    )
    .await?;
    assert_eq!(patched.observation_no.as_deref(), Some("NR00001"));

    let recommended = set_status(&app, first.id, "Recommended").await?;
    assert_eq!(recommended.observation_status, "Recommended");
    assert_eq!(recommended.observation_no.as_deref(), Some("R00001"));

    let pending = set_status(&app, first.id, "Pending").await?;
    assert_eq!(pending.observation_no, None);

    let management = set_status(&app, second.id, "Forwarded for Management Decision").await?;
    assert_eq!(management.observation_no.as_deref(), Some("SCN00001"));

    let returned = set_status(&app, second.id, "Return to Dealer").await?;
    assert_eq!(returned.observation_status, "Return to Dealer");
    assert_eq!(returned.observation_no, None);

    // NR00001 and NR00002 are no longer on any register but stay issued.
    let third = create(&app, "CL-3", "2024-04-03").await?;
    let third = set_status(&app, third.id, "Not Recommended").await?;
    assert_eq!(third.observation_no.as_deref(), Some("NR00003"));

    app.cleanup().await?;
    Ok(())
}

#[tokio::test]
async fn cleared_and_deleted_codes_are_never_reissued() -> Result<()> {
    let _lock = acquire_db_lock().await;
    let app = TestApp::new().await?;

    let first = create(&app, "CL-A", "2024-04-01").await?;
    let issued = set_status(&app, first.id, "Recommended").await?;
    assert_eq!(issued.observation_no.as_deref(), Some("R00001"));
    set_status(&app, first.id, "Pending").await?;

    let second = create(&app, "CL-B", "2024-04-02").await?;
    let second = set_status(&app, second.id, "Recommended").await?;
    assert_eq!(second.observation_no.as_deref(), Some("R00002"));

    // Returning to the family after a clear draws a fresh number too.
    let again = set_status(&app, first.id, "Recommended").await?;
    assert_eq!(again.observation_no.as_deref(), Some("R00003"));

    let response = app.delete(&format!("/api/registers/{}", again.id)).await?;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let third = create(&app, "CL-C", "2024-04-03").await?;
    let third = set_status(&app, third.id, "Recommended").await?;
    assert_eq!(third.observation_no.as_deref(), Some("R00004"));

    app.cleanup().await?;
    Ok(())
}

#[tokio::test]
async fn rejects_unknown_status() -> Result<()> {
    let _lock = acquire_db_lock().await;
    let app = TestApp::new().await?;

    let created = create(&app, "CL-9", "2024-04-02").await?;
    let response = app
        .patch_json(
            &format!("/api/registers/{}/status", created.id),
            &json!({ "status": "Approved" }),
        )
        .await?;
    let body: Value = expect_json(response, StatusCode::BAD_REQUEST).await?;
    assert_eq!(body["error"], "unknown observation status 'Approved'");

    let unchanged: RegisterInfo = expect_json(
        app.get(&format!("/api/registers/{}", created.id)).await?,
        StatusCode::OK,
    )
    .await?;
    assert_eq!(unchanged.observation_status, "Pending");

    app.cleanup().await?;
    Ok(())
}

#[tokio::test]
async fn update_clears_nullable_fields_and_rejects_blank_required_ones() -> Result<()> {
    let _lock = acquire_db_lock().await;
    let app = TestApp::new().await?;

    let created = create(&app, "CL-5", "2024-04-02").await?;
    let path = format!("/api/registers/{}", created.id);

    let cleared: RegisterInfo = expect_json(
        app.patch_json(&path, &json!({ "consultant": null, "claim_no": " CL-5A " }))
            .await?,
        StatusCode::OK,
    )
    .await?;
    assert_eq!(cleared.consultant, None);
    assert_eq!(cleared.claim_no, "CL-5A");

    let untouched: RegisterInfo =
        expect_json(app.patch_json(&path, &json!({})).await?, StatusCode::OK).await?;
    assert_eq!(untouched.claim_no, "CL-5A");

    let blank = app.patch_json(&path, &json!({ "dealer": "" })).await?;
    assert_eq!(blank.status(), StatusCode::BAD_REQUEST);

    app.cleanup().await?;
    Ok(())
}

#[tokio::test]
async fn list_filters_and_orders_by_received_date() -> Result<()> {
    let _lock = acquire_db_lock().await;
    let app = TestApp::new().await?;

    let older = create(&app, "CL-OLD", "2024-01-15").await?;
    let newer = create(&app, "CL-NEW", "2024-03-10").await?;
    set_status(&app, older.id, "Recommended").await?;

    let listed: Vec<RegisterInfo> =
        expect_json(app.get("/api/registers").await?, StatusCode::OK).await?;
    let ids: Vec<i32> = listed.iter().map(|entry| entry.id).collect();
    assert_eq!(ids, vec![newer.id, older.id]);

    let recommended: Vec<RegisterInfo> = expect_json(
        app.get("/api/registers?status=Recommended").await?,
        StatusCode::OK,
    )
    .await?;
    assert_eq!(recommended.len(), 1);
    assert_eq!(recommended[0].id, older.id);

    let february: Vec<RegisterInfo> = expect_json(
        app.get("/api/registers?from=2024-02-01&to=2024-03-31").await?,
        StatusCode::OK,
    )
    .await?;
    assert_eq!(february.len(), 1);
    assert_eq!(february[0].id, newer.id);

    let inverted = app.get("/api/registers?from=2024-04-01&to=2024-03-01").await?;
    assert_eq!(inverted.status(), StatusCode::BAD_REQUEST);

    app.cleanup().await?;
    Ok(())
}

#[tokio::test]
async fn missing_registers_report_not_found() -> Result<()> {
    let _lock = acquire_db_lock().await;
    let app = TestApp::new().await?;

    assert_eq!(
        app.get("/api/registers/404").await?.status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        app.patch_json("/api/registers/404", &json!({ "brand": "MRF" }))
            .await?
            .status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        app.patch_json("/api/registers/404/status", &json!({ "status": "Recommended" }))
            .await?
            .status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        app.delete("/api/registers/404").await?.status(),
        StatusCode::NOT_FOUND
    );

    // The status label is checked before the entry is looked up.
    let invalid = app
        .patch_json("/api/registers/404/status", &json!({ "status": "Approved" }))
        .await?;
    let body: Value = expect_json(invalid, StatusCode::BAD_REQUEST).await?;
    assert_eq!(body["error"], "unknown observation status 'Approved'");

    let created = create(&app, "CL-7", "2024-04-02").await?;
    let path = format!("/api/registers/{}", created.id);
    assert_eq!(app.delete(&path).await?.status(), StatusCode::NO_CONTENT);
    assert_eq!(app.get(&path).await?.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.delete(&path).await?.status(), StatusCode::NOT_FOUND);

    app.cleanup().await?;
    Ok(())
}
