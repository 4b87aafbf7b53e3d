//! Project record endpoint tests
//!
//! Exercise create, update, filter and refresh through the HTTP API against
//! an in-memory worksheet.

mod common;

use common::{TestApp, TestAppOptions};
use serde_json::json;
use tracker::sheets::Column;

fn seeded() -> TestAppOptions {
    TestAppOptions::with_rows(&[
        &["Website", "In Progress", "2026-10-20", "ana", "40"],
        &["Audit", "Completed", "2026-09-01", "lee", "100"],
        &["Hiring", "Blocked", "", "ana", ""],
        &["Backups", "Completed", "", "", ""],
    ])
}

#[tokio::test]
async fn test_health_reports_snapshot_size() {
    let app = TestApp::new_with_options(seeded()).await;
    let (status, body) = app.get_json("/api/v1/health").await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["records"], 4);
}

#[tokio::test]
async fn test_list_returns_records_in_sheet_order() {
    let app = TestApp::new_with_options(seeded()).await;
    let (status, body) = app.get_json("/api/v1/projects").await;

    assert_eq!(status, 200);
    assert_eq!(body["count"], 4);
    let names: Vec<&str> = body["records"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Website", "Audit", "Hiring", "Backups"]);
    assert_eq!(body["records"][2]["progress"], 25);
    assert_eq!(body["records"][2]["deadline"], serde_json::Value::Null);
}

#[tokio::test]
async fn test_filter_completed_returns_subset_in_order() {
    let app = TestApp::new_with_options(seeded()).await;
    let (status, body) = app.get_json("/api/v1/projects?status=Completed").await;

    assert_eq!(status, 200);
    let ids: Vec<u64> = body["records"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![2, 4]);
}

#[tokio::test]
async fn test_filter_by_owner_and_deadline_range() {
    let app = TestApp::new_with_options(seeded()).await;

    let (_, by_owner) = app.get_json("/api/v1/projects?owner=ANA").await;
    assert_eq!(by_owner["count"], 2);

    let (_, by_range) = app
        .get_json("/api/v1/projects?deadline_from=2026-10-01&deadline_to=2026-10-31")
        .await;
    assert_eq!(by_range["count"], 1);
    assert_eq!(by_range["records"][0]["name"], "Website");
}

#[tokio::test]
async fn test_filter_with_unknown_status_is_400() {
    let app = TestApp::new_with_options(seeded()).await;
    let (status, body) = app.get_json("/api/v1/projects?status=Shipped").await;
    assert_eq!(status, 400);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["fields"]["status"].is_string());
}

#[tokio::test]
async fn test_create_appends_row_and_assigns_id() {
    let app = TestApp::new_with_options(seeded()).await;

    let (status, body) = app
        .post_json(
            "/api/v1/projects",
            json!({
                "name": "Launch",
                "status": "in progress",
                "deadline": "2026-12-01",
                "owner": "kim"
            }),
        )
        .await;

    assert_eq!(status, 200);
    let record = &body["record"];
    assert_eq!(record["id"], 5);
    assert_eq!(record["status"], "In Progress");
    assert_eq!(record["progress"], 50);

    let rows = app.sheet.rows().await;
    assert_eq!(
        rows.last().unwrap(),
        &vec!["Launch", "In Progress", "2026-12-01", "kim", "50"]
    );

    // A reload returns the same record
    let (_, refreshed) = app.post_json("/api/v1/projects/refresh", json!({})).await;
    assert_eq!(refreshed["records"][4], *record);
}

#[tokio::test]
async fn test_create_validation_lists_fields_and_writes_nothing() {
    let app = TestApp::new_with_options(seeded()).await;

    let (status, body) = app
        .post_json(
            "/api/v1/projects",
            json!({ "name": "", "status": "Shipped", "progress": 150 }),
        )
        .await;

    assert_eq!(status, 400);
    let fields = body["fields"].as_object().unwrap();
    assert!(fields.contains_key("name"));
    assert!(fields.contains_key("status"));
    assert!(fields.contains_key("progress"));
    assert_eq!(app.sheet.mutation_count(), 0);
}

#[tokio::test]
async fn test_update_overwrites_only_supplied_fields() {
    let app = TestApp::new_with_options(seeded()).await;

    let (status, body) = app
        .patch_json("/api/v1/projects/1", json!({ "status": "Blocked", "owner": "" }))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["record"]["status"], "Blocked");
    assert_eq!(body["record"]["owner"], serde_json::Value::Null);
    assert_eq!(body["record"]["progress"], 40);

    let rows = app.sheet.rows().await;
    assert_eq!(rows[1], vec!["Website", "Blocked", "2026-10-20", "", "40"]);

    let (_, refreshed) = app.post_json("/api/v1/projects/refresh", json!({})).await;
    assert_eq!(refreshed["records"][0], body["record"]);
}

#[tokio::test]
async fn test_update_unknown_id_is_404_without_writes() {
    let app = TestApp::new_with_options(seeded()).await;
    let (status, body) = app
        .patch_json("/api/v1/projects/99", json!({ "status": "Completed" }))
        .await;

    assert_eq!(status, 404);
    assert_eq!(body["code"], "NOT_FOUND");
    assert_eq!(app.sheet.mutation_count(), 0);
}

#[tokio::test]
async fn test_remote_write_failure_is_502_and_snapshot_kept() {
    let app = TestApp::new_with_options(seeded()).await;
    app.sheet.fail_writes(true);

    let (status, body) = app
        .patch_json("/api/v1/projects/1", json!({ "name": "Renamed" }))
        .await;
    assert_eq!(status, 502);
    assert_eq!(body["code"], "REMOTE_WRITE_ERROR");

    let (_, project) = app.get_json("/api/v1/projects/1").await;
    assert_eq!(project["record"]["name"], "Website");
}

#[tokio::test]
async fn test_refresh_picks_up_external_edits_and_reports_bad_rows() {
    let app = TestApp::new_with_options(seeded()).await;
    app.sheet.set_cell(3, Column::Status, "Paused").await;
    app.sheet.set_cell(2, Column::Name, "Audit 2026").await;

    let (status, body) = app.post_json("/api/v1/projects/refresh", json!({})).await;

    assert_eq!(status, 200);
    assert_eq!(body["count"], 3);
    assert_eq!(body["records"][0]["name"], "Audit 2026");
    assert_eq!(body["skipped"][0]["row"], 3);
    assert!(body["skipped"][0]["reason"].as_str().unwrap().contains("Paused"));
}

#[tokio::test]
async fn test_refresh_read_failure_is_502() {
    let app = TestApp::new_with_options(seeded()).await;
    app.sheet.fail_reads(true);

    let (status, body) = app.post_json("/api/v1/projects/refresh", json!({})).await;
    assert_eq!(status, 502);
    assert_eq!(body["code"], "REMOTE_READ_ERROR");
}
