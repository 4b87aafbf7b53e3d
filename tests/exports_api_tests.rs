//! Export endpoint tests

mod common;

use common::{TestApp, TestAppOptions};
use tracker::models::StatusCatalog;
use tracker::services::export;

fn seeded() -> TestAppOptions {
    TestAppOptions::with_rows(&[
        &["Website, v2", "In Progress", "2026-10-20", "ana", "40"],
        &["Audit", "Completed", "", "", "100"],
    ])
}

#[tokio::test]
async fn test_csv_export_has_header_and_one_line_per_record() {
    let app = TestApp::new_with_options(seeded()).await;

    let response = app
        .client
        .get(app.url("/api/v1/projects/export.csv"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let content_type = response.headers().get("content-type").unwrap().to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/csv"));
    let disposition = response.headers().get("content-disposition").unwrap().to_str().unwrap().to_string();
    assert!(disposition.contains("project_tracker.csv"));

    let body = response.text().await.unwrap();
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "id,name,status,deadline,owner,progress");
    assert_eq!(lines[1], "1,\"Website, v2\",In Progress,2026-10-20,ana,40");
    assert_eq!(lines[2], "2,Audit,Completed,,,100");
}

#[tokio::test]
async fn test_csv_export_round_trips_to_snapshot() {
    let app = TestApp::new_with_options(seeded()).await;

    let body = app
        .client
        .get(app.url("/api/v1/projects/export.csv"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    let parsed = export::from_csv(&body, &StatusCatalog::default()).unwrap();

    let (_, listed) = app.get_json("/api/v1/projects").await;
    assert_eq!(serde_json::to_value(&parsed).unwrap(), listed["records"]);
}

#[tokio::test]
async fn test_csv_export_respects_filter() {
    let app = TestApp::new_with_options(seeded()).await;
    let body = app
        .client
        .get(app.url("/api/v1/projects/export.csv?status=Completed"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert_eq!(body.lines().count(), 2);
    assert!(body.contains("Audit"));
    assert!(!body.contains("Website"));
}

#[tokio::test]
async fn test_txt_export() {
    let app = TestApp::new_with_options(seeded()).await;
    let response = app
        .client
        .get(app.url("/api/v1/projects/export.txt"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let disposition = response.headers().get("content-disposition").unwrap().to_str().unwrap().to_string();
    assert!(disposition.contains("project_tracker.txt"));
    let body = response.text().await.unwrap();
    assert!(body.contains("Website, v2"));
    assert!(body.contains("Audit"));
}

#[tokio::test]
async fn test_export_performs_no_remote_read() {
    let app = TestApp::new_with_options(seeded()).await;
    let reads = app.sheet.read_count();

    app.client
        .get(app.url("/api/v1/projects/export.txt"))
        .send()
        .await
        .unwrap();

    assert_eq!(app.sheet.read_count(), reads);
}
