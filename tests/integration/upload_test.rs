//! Integration tests for the chunked upload protocol.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use helpers::{TestApp, sha256_hex, split_encoded};

#[tokio::test]
async fn test_out_of_order_chunks_assemble() {
    let app = TestApp::new().await;
    let upload_id = app.init_upload().await;
    let expected = b"hello world!!";
    let parts = split_encoded(expected, 8);
    assert_eq!(parts.len(), 3);

    let r = app.put_chunk(&upload_id, 2, &parts[2], Some(3)).await;
    assert_eq!(r.status, StatusCode::OK);
    assert_eq!(r.body["receivedCount"], 1);
    // Later declarations do not change the latched total.
    let r = app.put_chunk(&upload_id, 0, &parts[0], Some(99)).await;
    assert_eq!(r.body["receivedCount"], 2);
    let r = app.put_chunk(&upload_id, 1, &parts[1], None).await;
    assert_eq!(r.status, StatusCode::OK);
    assert_eq!(r.body["index"], 1);
    assert_eq!(r.body["receivedCount"], 3);

    let r = app
        .request(
            "POST",
            "/upload/finish",
            Some(json!({
                "upload_id": upload_id,
                "filename": "greeting.tar",
                "size": expected.len(),
                "sha256": sha256_hex(expected).to_uppercase(),
            })),
        )
        .await;
    assert_eq!(r.status, StatusCode::OK, "{:?}", r.body);
    assert_eq!(r.body["ok"], true);
    assert_eq!(r.body["size"], expected.len());
    assert_eq!(r.body["sha256"], sha256_hex(expected));
    assert_eq!(app.archive_count(), 1);
}

#[tokio::test]
async fn test_resent_chunk_replaces_previous() {
    let app = TestApp::new().await;
    let upload_id = app.init_upload().await;

    app.put_chunk(&upload_id, 0, "Zmlyc3Q=", Some(1)).await;
    let r = app.put_chunk(&upload_id, 0, "c2Vjb25k", None).await;
    assert_eq!(r.body["receivedCount"], 1);

    let r = app
        .request(
            "POST",
            "/upload/finish",
            Some(json!({ "upload_id": upload_id, "filename": "a.bin" })),
        )
        .await;
    assert_eq!(r.status, StatusCode::OK);
    assert_eq!(r.body["sha256"], sha256_hex(b"second"));
}

#[tokio::test]
async fn test_missing_chunks_are_listed() {
    let app = TestApp::new().await;
    let upload_id = app.init_upload().await;
    let parts = split_encoded(b"abcdef", 2);
    app.put_chunk(&upload_id, 0, &parts[0], Some(4)).await;
    app.put_chunk(&upload_id, 2, &parts[2], None).await;

    let r = app
        .request(
            "POST",
            "/upload/finish",
            Some(json!({ "upload_id": upload_id, "filename": "a.bin" })),
        )
        .await;
    assert_eq!(r.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(r.body["error"], "INTEGRITY_ERROR");
    assert_eq!(r.body["details"]["reason"], "missing_chunks");
    assert_eq!(r.body["details"]["missing"], json!([1, 3]));
    assert_eq!(r.body["details"]["received"], 2);
    assert_eq!(r.body["details"]["expected"], 4);

    // The upload stays open, so the gaps can be filled and retried.
    app.put_chunk(&upload_id, 1, &parts[1], None).await;
    app.put_chunk(&upload_id, 3, &parts[3], None).await;
    let r = app
        .request(
            "POST",
            "/upload/finish",
            Some(json!({ "upload_id": upload_id, "filename": "a.bin", "size": 6 })),
        )
        .await;
    assert_eq!(r.status, StatusCode::OK, "{:?}", r.body);
}

#[tokio::test]
async fn test_first_chunk_requires_total() {
    let app = TestApp::new().await;
    let upload_id = app.init_upload().await;

    let r = app.put_chunk(&upload_id, 0, "YQ==", None).await;
    assert_eq!(r.status, StatusCode::BAD_REQUEST);
    assert_eq!(r.body["details"]["reason"], "protocol_violation");

    let r = app.put_chunk(&upload_id, 0, "YQ==", Some(0)).await;
    assert_eq!(r.status, StatusCode::BAD_REQUEST);
    assert_eq!(r.body["details"]["reason"], "protocol_violation");
}

#[tokio::test]
async fn test_declared_total_above_limit_rejected() {
    let app = TestApp::with_config(|c| c.storage.max_chunks = 4).await;
    let upload_id = app.init_upload().await;

    let r = app.put_chunk(&upload_id, 0, "YQ==", Some(4_294_967_295)).await;
    assert_eq!(r.status, StatusCode::BAD_REQUEST);
    assert_eq!(r.body["details"]["reason"], "protocol_violation");
    assert_eq!(r.body["details"]["limit"], 4);

    let r = app.put_chunk(&upload_id, 0, "YQ==", Some(4)).await;
    assert_eq!(r.status, StatusCode::OK);
}

#[tokio::test]
async fn test_index_out_of_range_and_empty_chunk() {
    let app = TestApp::new().await;
    let upload_id = app.init_upload().await;

    let r = app.put_chunk(&upload_id, 2, "YQ==", Some(2)).await;
    assert_eq!(r.status, StatusCode::BAD_REQUEST);
    assert_eq!(r.body["details"]["reason"], "index_out_of_range");

    let r = app.put_chunk(&upload_id, 0, "", Some(2)).await;
    assert_eq!(r.status, StatusCode::BAD_REQUEST);
    assert_eq!(r.body["details"]["reason"], "empty_chunk");

    let r = app
        .request(
            "POST",
            "/upload/chunk",
            Some(json!({ "upload_id": upload_id, "index": -1, "data": "YQ==", "totalChunks": 2 })),
        )
        .await;
    assert_eq!(r.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_and_malformed_tokens() {
    let app = TestApp::new().await;

    let r = app
        .put_chunk("00000000-0000-4000-8000-000000000000", 0, "YQ==", Some(1))
        .await;
    assert_eq!(r.status, StatusCode::BAD_REQUEST);
    assert_eq!(r.body["details"]["reason"], "invalid_token");

    let r = app
        .request(
            "POST",
            "/upload/finish",
            Some(json!({ "upload_id": "not-a-token", "filename": "a.zip" })),
        )
        .await;
    assert_eq!(r.status, StatusCode::BAD_REQUEST);
    assert_eq!(r.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_finish_without_chunks_conflicts() {
    let app = TestApp::new().await;
    let upload_id = app.init_upload().await;

    let r = app
        .request(
            "POST",
            "/upload/finish",
            Some(json!({ "upload_id": upload_id, "filename": "a.zip" })),
        )
        .await;
    assert_eq!(r.status, StatusCode::CONFLICT);
    assert_eq!(r.body["details"]["reason"], "protocol_violation");
}

#[tokio::test]
async fn test_integrity_checks() {
    let app = TestApp::new().await;

    let upload_id = app.init_upload().await;
    app.put_chunk(&upload_id, 0, "cGF5bG9hZA==", Some(1)).await;
    let r = app
        .request(
            "POST",
            "/upload/finish",
            Some(json!({ "upload_id": upload_id, "filename": "a.zip", "size": 3 })),
        )
        .await;
    assert_eq!(r.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(r.body["details"]["reason"], "size_mismatch");
    assert_eq!(r.body["details"]["expected"], 3);
    assert_eq!(r.body["details"]["actual"], 7);

    let r = app
        .request(
            "POST",
            "/upload/finish",
            Some(json!({
                "upload_id": upload_id,
                "filename": "a.zip",
                "sha256": sha256_hex(b"something else"),
            })),
        )
        .await;
    assert_eq!(r.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(r.body["details"]["reason"], "digest_mismatch");
    assert_eq!(app.archive_count(), 0);
}

#[tokio::test]
async fn test_invalid_base64_rejected_at_finish() {
    let app = TestApp::new().await;
    let upload_id = app.init_upload().await;

    let r = app
        .request(
            "POST",
            "/upload/chunk",
            Some(json!({ "upload_id": upload_id, "index": 0, "data": "@@@@", "totalChunks": 1 })),
        )
        .await;
    assert_eq!(r.status, StatusCode::OK);

    let r = app
        .request(
            "POST",
            "/upload/finish",
            Some(json!({ "upload_id": upload_id, "filename": "a.zip" })),
        )
        .await;
    assert_eq!(r.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(r.body["details"]["reason"], "invalid_encoding");
}

#[tokio::test]
async fn test_second_finish_and_late_chunk_conflict() {
    let app = TestApp::new().await;
    let upload_id = app.upload("a.tar", b"archive bytes", 4).await;

    let r = app
        .request(
            "POST",
            "/upload/finish",
            Some(json!({ "upload_id": upload_id, "filename": "a.tar" })),
        )
        .await;
    assert_eq!(r.status, StatusCode::CONFLICT);
    assert_eq!(r.body["details"]["reason"], "already_finalized");

    let r = app.put_chunk(&upload_id, 0, "bGF0ZQ==", None).await;
    assert_eq!(r.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_oversized_body_rejected() {
    let app = TestApp::with_config(|c| c.server.max_body_bytes = 512).await;
    let upload_id = app.init_upload().await;

    let r = app.put_chunk(&upload_id, 0, &"A".repeat(2048), Some(1)).await;
    assert_eq!(r.status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(r.body["error"], "PAYLOAD_TOO_LARGE");
}

#[tokio::test]
async fn test_malformed_json_rejected() {
    let app = TestApp::new().await;
    let r = app
        .request("POST", "/upload/chunk", Some(json!({ "index": 0 })))
        .await;
    assert_eq!(r.status, StatusCode::BAD_REQUEST);
    assert_eq!(r.body["error"], "VALIDATION_ERROR");
}
