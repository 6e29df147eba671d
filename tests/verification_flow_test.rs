//! 照合フローの結合テスト
//!
//! モックバックエンドに対して、送信内容・結果の分類・エラー種別を確認

mod common;

use axum::extract::Multipart;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use common::{client_for, record, recorder, write_png, MockBackend, TEST_TOKEN};
use serde_json::json;
use std::time::Duration;
use tempfile::tempdir;
use titweng_admin::capture::{collect_images, prepare_uploads};
use titweng_admin::{AdminError, ErrorKind};
use titweng_common::{MatchClass, Tone, VerificationOutcome};

/// 鼻紋照合: 類似度0.97 → "MATCH FOUND (97% Similarity)"
#[tokio::test]
async fn test_nose_print_match() {
    let rec = recorder();
    let r = rec.clone();
    let router = Router::new().route(
        "/admin/verify/nose",
        post(move |headers: HeaderMap, multipart: Multipart| {
            let r = r.clone();
            async move {
                record(&r, &headers, Some(multipart)).await;
                Json(json!({
                    "verification_results": [{
                        "cow_found": true,
                        "similarity": 0.97,
                        "cow_details": {
                            "cow_tag": "TW-2025-BWF-0042",
                            "breed": "Ankole",
                            "color": "Brown",
                            "owner_name": "Akol Deng",
                            "facial_image_url": "/static/faces/42.jpg"
                        }
                    }]
                }))
            }
        }),
    );
    let backend = MockBackend::spawn(router).await;
    let tc = client_for(&backend.url());

    let dir = tempdir().unwrap();
    write_png(dir.path(), "nose.png", 64, 48);
    let images = collect_images(&[dir.path().to_path_buf()]).unwrap();
    let uploads = prepare_uploads(&images, 1280, 80).unwrap();

    let outcome = tc.client.verify_nose(uploads, Some("Juba")).await.unwrap();
    let classification = outcome.classify();
    assert_eq!(classification.class, MatchClass::Match);
    assert_eq!(classification.tone, Tone::Success);
    assert_eq!(classification.title, "MATCH FOUND (97% Similarity)");
    assert_eq!(
        outcome.cow().and_then(|c| c.cow_tag.as_deref()),
        Some("TW-2025-BWF-0042")
    );

    let requests = rec.lock().clone();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.authorization.as_deref(), Some(format!("Bearer {}", TEST_TOKEN).as_str()));
    assert_eq!(request.count("files"), 1);
    assert_eq!(request.field("location"), Some("Juba"));
    let (_, file_name, _) = request.fields.iter().find(|(n, _, _)| n == "files").unwrap();
    assert_eq!(file_name.as_deref(), Some("nose.jpg"));
}

/// 鼻紋照合: 結果が空 → "NO MATCH FOUND"
#[tokio::test]
async fn test_nose_print_empty_results() {
    let router = Router::new().route(
        "/admin/verify/nose",
        post(|| async { Json(json!({ "verification_results": [] })) }),
    );
    let backend = MockBackend::spawn(router).await;
    let tc = client_for(&backend.url());

    let dir = tempdir().unwrap();
    let path = write_png(dir.path(), "nose.png", 16, 16);
    let uploads = prepare_uploads(&[path], 1280, 80).unwrap();

    let outcome = tc.client.verify_nose(uploads, None).await.unwrap();
    assert_eq!(outcome, VerificationOutcome::no_match("No matching cow found"));
    assert!(outcome.cow().is_none());
    assert_eq!(outcome.classify().title, "NO MATCH FOUND");
    assert_eq!(outcome.classify().tone, Tone::Destructive);
}

/// 部分一致: 0.9 → 警告色
#[tokio::test]
async fn test_nose_print_partial_match() {
    let router = Router::new().route(
        "/admin/verify/nose",
        post(|| async {
            Json(json!({
                "verification_results": [{ "cow_found": true, "similarity": 0.9, "cow_details": {} }]
            }))
        }),
    );
    let backend = MockBackend::spawn(router).await;
    let tc = client_for(&backend.url());

    let dir = tempdir().unwrap();
    let path = write_png(dir.path(), "nose.png", 16, 16);
    let uploads = prepare_uploads(&[path], 1280, 80).unwrap();

    let classification = tc.client.verify_nose(uploads, None).await.unwrap().classify();
    assert_eq!(classification.class, MatchClass::PartialMatch);
    assert_eq!(classification.tone, Tone::Warning);
    assert_eq!(classification.title, "PARTIAL MATCH (90% Similarity)");
}

/// タグ照合: 見つかれば類似度100%で一致
#[tokio::test]
async fn test_tag_lookup_forces_full_similarity() {
    let rec = recorder();
    let r = rec.clone();
    let router = Router::new().route(
        "/admin/verify/tag",
        post(move |headers: HeaderMap, multipart: Multipart| {
            let r = r.clone();
            async move {
                record(&r, &headers, Some(multipart)).await;
                Json(json!({
                    "verification_results": [{
                        "cow_found": true,
                        "similarity": 0.42,
                        "verified": true,
                        "cow_details": { "cow_tag": "TW-2025-BWF-0042", "breed": "Ankole" }
                    }]
                }))
            }
        }),
    );
    let backend = MockBackend::spawn(router).await;
    let tc = client_for(&backend.url());

    let outcome = tc.client.verify_tag("  TW-2025-BWF-0042 ", None).await.unwrap();
    assert_eq!(outcome.similarity_percent(), Some(100.0));
    assert_eq!(outcome.classify().class, MatchClass::Match);
    assert_eq!(outcome.classify().title, "MATCH FOUND (100% Similarity)");

    let requests = rec.lock().clone();
    assert_eq!(requests[0].field("cow_tag"), Some("TW-2025-BWF-0042"));
    assert_eq!(requests[0].field("location"), None);
}

/// タグ照合: 404は不一致として扱う
#[tokio::test]
async fn test_tag_lookup_not_found() {
    let router = Router::new().route(
        "/admin/verify/tag",
        post(|| async { (StatusCode::NOT_FOUND, Json(json!({ "detail": "Cow not found" }))) }),
    );
    let backend = MockBackend::spawn(router).await;
    let tc = client_for(&backend.url());

    let outcome = tc.client.verify_tag("TW-2025-XXX-9999", None).await.unwrap();
    assert_eq!(outcome, VerificationOutcome::no_match("Cow tag not found"));
}

/// 401 → トークンを消してUnauthorized
#[tokio::test]
async fn test_unauthorized_clears_token() {
    let router = Router::new()
        .route(
            "/admin/verify/tag",
            post(|| async {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({ "detail": "Invalid authentication" })),
                )
            }),
        )
        .route(
            "/admin/cows",
            get(|| async { (StatusCode::UNAUTHORIZED, Json(json!({ "detail": "Invalid authentication" }))) }),
        );
    let backend = MockBackend::spawn(router).await;
    let tc = client_for(&backend.url());
    assert!(tc.ctx.token().is_some());

    let err = tc.client.verify_tag("TW-2025-BWF-0042", None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    assert!(err.requires_login());
    assert!(err.to_string().contains("Invalid authentication"));
    assert!(tc.ctx.token().is_none());

    // 他の呼び出しでも同じ扱い
    tc.ctx.set_token("another").unwrap();
    let err = tc.client.list_cows().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    assert!(tc.ctx.token().is_none());
}

/// 空のタグは送信前に拒否
#[tokio::test]
async fn test_empty_tag_is_rejected_locally() {
    let rec = recorder();
    let r = rec.clone();
    let router = Router::new().route(
        "/admin/verify/tag",
        post(move |headers: HeaderMap| {
            let r = r.clone();
            async move {
                record(&r, &headers, None).await;
                Json(json!({ "verification_results": [] }))
            }
        }),
    );
    let backend = MockBackend::spawn(router).await;
    let tc = client_for(&backend.url());

    let err = tc.client.verify_tag("   ", None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(rec.lock().is_empty());
}

/// スコープを取り消すと実行中の照合が打ち切られる
#[tokio::test]
async fn test_cancelled_scope_aborts_verification() {
    let router = Router::new()
        .route(
            "/admin/verify/tag",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Json(json!({ "verification_results": [] }))
            }),
        )
        .route("/admin/verifications", get(|| async { Json(json!({ "verifications": [] })) }));
    let backend = MockBackend::spawn(router).await;
    let tc = client_for(&backend.url());

    // 完了済みのリクエストは数えない
    assert!(tc.client.verification_logs().await.unwrap().is_empty());
    assert_eq!(tc.scope.in_flight(), 0);

    let client = tc.client.clone();
    let task = tokio::spawn(async move { client.verify_tag("TW-2025-BWF-0042", None).await });

    while tc.scope.in_flight() == 0 {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    tc.scope.cancel();

    let err = task.await.unwrap().unwrap_err();
    assert!(matches!(err, AdminError::Cancelled));
    assert_eq!(err.kind(), ErrorKind::Cancelled);
}

/// 接続できないバックエンドはTransport
#[tokio::test]
async fn test_connection_failure_is_transport() {
    // 空きポートを取得してすぐ閉じる
    let addr = std::net::TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();

    let tc = client_for(&format!("http://{}", addr));
    let err = tc.client.verification_logs().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
}
