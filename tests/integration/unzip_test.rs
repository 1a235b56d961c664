//! Integration tests for extraction jobs, driven through the system `tar`.

#![cfg(unix)]

mod helpers;

use axum::http::StatusCode;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::json;

use helpers::{TestApp, tar_archive};

#[tokio::test]
async fn test_upload_extract_list_download() {
    let app = TestApp::new().await;
    let archive = tar_archive(&[
        ("readme.txt", &b"read me first\n"[..]),
        ("data.bin", &[0u8, 1, 2, 3, 255][..]),
        ("nested/inner.txt", &b"not listed"[..]),
    ]);
    let upload_id = app.upload("bundle.tar", &archive, 1024).await;
    assert_eq!(app.archive_count(), 1);

    let job_id = app.start_job(&upload_id, None).await;
    let status = app.wait_for_job(&job_id).await;
    assert_eq!(status["status"], "done", "{status:?}");
    assert!(status["error"].is_null());
    // The archive is consumed once the job has run.
    assert_eq!(app.archive_count(), 0);

    let r = app
        .request("GET", &format!("/unzip/files?job_id={job_id}"), None)
        .await;
    assert_eq!(r.status, StatusCode::OK);
    assert_eq!(
        r.body["files"],
        json!([
            { "name": "data.bin", "size": 5 },
            { "name": "readme.txt", "size": 14 },
        ])
    );

    let expected: [(&str, &[u8]); 2] = [
        ("data.bin", &[0u8, 1, 2, 3, 255][..]),
        ("readme.txt", &b"read me first\n"[..]),
    ];
    let listed = r.body["files"].as_array().unwrap();
    assert_eq!(listed.len(), expected.len());
    for (entry, (name, contents)) in listed.iter().zip(expected) {
        assert_eq!(entry["name"], name);
        let r = app
            .request(
                "GET",
                &format!("/unzip/download?job_id={job_id}&name={name}"),
                None,
            )
            .await;
        assert_eq!(r.status, StatusCode::OK, "{name}");
        assert_eq!(r.body["name"], name);
        assert_eq!(r.body["size"], contents.len());
        let data = STANDARD
            .decode(r.body["data"].as_str().unwrap())
            .unwrap();
        assert_eq!(data, contents, "{name}");
    }
}

#[tokio::test]
async fn test_corrupt_archive_reports_error() {
    let app = TestApp::new().await;
    let upload_id = app.upload("broken.tar", b"this is not a tar archive", 16).await;

    let job_id = app.start_job(&upload_id, None).await;
    let status = app.wait_for_job(&job_id).await;
    assert_eq!(status["status"], "error");
    assert!(!status["error"].as_str().unwrap_or_default().is_empty());
    assert_eq!(app.archive_count(), 0);

    let r = app
        .request("GET", &format!("/unzip/files?job_id={job_id}"), None)
        .await;
    assert_eq!(r.status, StatusCode::CONFLICT);
    assert_eq!(r.body["details"]["status"], "error");
}

#[tokio::test]
async fn test_missing_extractor_reports_error() {
    let app = TestApp::with_config(|c| c.extractor.command = "/nonexistent/unpackd-7za".into()).await;
    let archive = tar_archive(&[("a.txt", &b"a"[..])]);
    let upload_id = app.upload("a.tar", &archive, 64).await;

    let job_id = app.start_job(&upload_id, None).await;
    let status = app.wait_for_job(&job_id).await;
    assert_eq!(status["status"], "error");
    assert!(
        status["error"]
            .as_str()
            .unwrap_or_default()
            .contains("unpackd-7za")
    );
}

#[tokio::test]
async fn test_running_job_is_not_ready() {
    let app = TestApp::with_config(|c| {
        c.extractor.command = "sleep".into();
        c.extractor.args = vec!["30".into()];
    })
    .await;
    let upload_id = app.upload("slow.tar", b"anything", 64).await;
    let job_id = app.start_job(&upload_id, None).await;

    let r = app
        .request("GET", &format!("/unzip/status?job_id={job_id}"), None)
        .await;
    assert_eq!(r.status, StatusCode::OK);
    let state = r.body["status"].as_str().unwrap().to_string();
    assert!(state == "queued" || state == "running", "{state}");

    let r = app
        .request("GET", &format!("/unzip/files?job_id={job_id}"), None)
        .await;
    assert_eq!(r.status, StatusCode::CONFLICT);

    let r = app
        .request(
            "GET",
            &format!("/unzip/download?job_id={job_id}&name=a.txt"),
            None,
        )
        .await;
    assert_eq!(r.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_start_requires_finalized_unclaimed_upload() {
    let app = TestApp::new().await;

    let r = app
        .request(
            "POST",
            "/unzip/start",
            Some(json!({ "upload_id": "not-a-token" })),
        )
        .await;
    assert_eq!(r.status, StatusCode::BAD_REQUEST);
    assert_eq!(r.body["details"]["reason"], "invalid_token");

    let pending = app.init_upload().await;
    let r = app
        .request("POST", "/unzip/start", Some(json!({ "upload_id": pending })))
        .await;
    assert_eq!(r.status, StatusCode::BAD_REQUEST);
    assert_eq!(r.body["details"]["reason"], "upload_not_ready");

    let archive = tar_archive(&[("a.txt", &b"a"[..])]);
    let upload_id = app.upload("a.tar", &archive, 64).await;
    app.start_job(&upload_id, None).await;
    let r = app
        .request("POST", "/unzip/start", Some(json!({ "upload_id": upload_id })))
        .await;
    assert_eq!(r.status, StatusCode::BAD_REQUEST);
    assert_eq!(r.body["details"]["reason"], "upload_not_ready");
}

#[tokio::test]
async fn test_unknown_job_and_bad_download_names() {
    let app = TestApp::new().await;

    for path in [
        "/unzip/status",
        "/unzip/status?job_id=nope",
        "/unzip/status?job_id=00000000-0000-4000-8000-000000000000",
        "/unzip/files?job_id=nope",
    ] {
        let r = app.request("GET", path, None).await;
        assert_eq!(r.status, StatusCode::NOT_FOUND, "{path}");
        assert_eq!(r.body["error"], "NOT_FOUND");
    }

    let archive = tar_archive(&[("a.txt", &b"a"[..])]);
    let upload_id = app.upload("a.tar", &archive, 64).await;
    let job_id = app.start_job(&upload_id, None).await;
    assert_eq!(app.wait_for_job(&job_id).await["status"], "done");

    let r = app
        .request("GET", &format!("/unzip/download?job_id={job_id}"), None)
        .await;
    assert_eq!(r.status, StatusCode::BAD_REQUEST);
    assert_eq!(r.body["details"]["reason"], "name_required");

    for name in ["missing.txt", "..%2Fjobs", "%2Fetc%2Fpasswd", "..", "."] {
        let r = app
            .request(
                "GET",
                &format!("/unzip/download?job_id={job_id}&name={name}"),
                None,
            )
            .await;
        assert_eq!(r.status, StatusCode::NOT_FOUND, "{name}");
        assert_eq!(r.body["details"]["reason"], "file_not_found");
    }
}
