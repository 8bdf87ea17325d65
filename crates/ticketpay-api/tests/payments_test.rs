mod helpers;

use axum::http::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use axum::http::StatusCode;
use helpers::auth::{bearer, expired_token, foreign_token, valid_token};
use helpers::fixtures::{create_minimal_png, create_test_pdf, pdf_of_size, png_of_size};
use helpers::{payment_form, setup_test_app, TestApp, UNOWNED_VIOLATION_ID, VIOLATION_ID};
use rust_decimal_macros::dec;
use serde_json::Value;
use std::collections::HashSet;
use std::future::IntoFuture;

const MIB: usize = 1024 * 1024;

fn auth_header() -> HeaderValue {
    HeaderValue::from_str(&bearer(&valid_token())).unwrap()
}

async fn submit_png(app: &TestApp, violation_id: i64, amount: &str) -> Value {
    let response = app
        .client()
        .post("/payments")
        .add_header(AUTHORIZATION, auth_header())
        .multipart(payment_form(
            &violation_id.to_string(),
            amount,
            Some((create_minimal_png(), "receipt.png", "image/png")),
        ))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()
}

#[tokio::test]
async fn test_submit_payment_with_png_receipt() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/payments")
        .add_header(AUTHORIZATION, auth_header())
        .multipart(payment_form(
            "7",
            "50.00",
            Some((png_of_size(2 * MIB), "receipt.png", "image/png")),
        ))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(
        body["message"],
        "Payment submitted successfully and is pending admin approval"
    );
    assert_eq!(body["status"], "pending");
    let payment_id = body["paymentId"].as_i64().unwrap();

    let payments = app.store.payments().await;
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].payment_id, payment_id);
    assert_eq!(payments[0].violation_id, VIOLATION_ID);
    assert_eq!(payments[0].payment_amount, dec!(50.00));
    assert!(payments[0].receipt_file.as_str().ends_with(".png"));

    assert_eq!(app.stored_receipt_count(), 1);
    assert!(app.violation(VIOLATION_ID).await.payment_submitted);
}

#[tokio::test]
async fn test_oversized_receipt_is_rejected_without_side_effects() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/payments")
        .add_header(AUTHORIZATION, auth_header())
        .multipart(payment_form(
            "7",
            "50.00",
            Some((pdf_of_size(6 * MIB), "receipt.pdf", "application/pdf")),
        ))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "FILE_TOO_LARGE");

    assert!(app.store.payments().await.is_empty());
    assert_eq!(app.stored_receipt_count(), 0);
    assert!(!app.violation(VIOLATION_ID).await.payment_submitted);
}

#[tokio::test]
async fn test_missing_receipt_is_rejected() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/payments")
        .add_header(AUTHORIZATION, auth_header())
        .multipart(payment_form("7", "50.00", None))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["message"], "Receipt file is required");
    assert!(app.store.payments().await.is_empty());
}

#[tokio::test]
async fn test_non_multipart_submission_is_missing_receipt() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/payments")
        .add_header(AUTHORIZATION, auth_header())
        .form(&[("violation_id", "7"), ("payment_amount", "50.00")])
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response
        .header(CONTENT_TYPE)
        .to_str()
        .unwrap()
        .starts_with("application/json"));
    let body: Value = response.json();
    assert_eq!(body["message"], "Receipt file is required");
    assert!(app.store.payments().await.is_empty());
    assert!(!app.violation(VIOLATION_ID).await.payment_submitted);
}

#[tokio::test]
async fn test_disallowed_receipt_type_is_rejected() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/payments")
        .add_header(AUTHORIZATION, auth_header())
        .multipart(payment_form(
            "7",
            "50.00",
            Some((b"GIF89a".to_vec(), "receipt.gif", "image/gif")),
        ))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Only JPEG, PNG, and PDF files are allowed"));
    assert_eq!(app.stored_receipt_count(), 0);
}

#[tokio::test]
async fn test_extension_and_content_type_must_agree() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/payments")
        .add_header(AUTHORIZATION, auth_header())
        .multipart(payment_form(
            "7",
            "50.00",
            Some((create_minimal_png(), "receipt.png", "application/pdf")),
        ))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(app.store.payments().await.is_empty());
    assert_eq!(app.stored_receipt_count(), 0);
}

#[tokio::test]
async fn test_invalid_fields_are_rejected_before_storing() {
    let app = setup_test_app().await;

    for (violation_id, amount) in [("abc", "50.00"), ("7", "-5"), ("7", "0"), ("7", "12.345")] {
        let response = app
            .client()
            .post("/payments")
            .add_header(AUTHORIZATION, auth_header())
            .multipart(payment_form(
                violation_id,
                amount,
                Some((create_minimal_png(), "receipt.png", "image/png")),
            ))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    assert!(app.store.payments().await.is_empty());
    assert_eq!(app.stored_receipt_count(), 0);
}

#[tokio::test]
async fn test_unknown_violation_is_a_record_store_error() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/payments")
        .add_header(AUTHORIZATION, auth_header())
        .multipart(payment_form(
            "999",
            "50.00",
            Some((create_minimal_png(), "receipt.png", "image/png")),
        ))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["message"], "Database error");
    assert!(body["error"].is_string());
    assert!(app.store.payments().await.is_empty());
}

#[tokio::test]
async fn test_flag_failure_does_not_fail_submission() {
    let app = setup_test_app().await;
    app.store.fail_violation_updates(true);

    submit_png(&app, VIOLATION_ID, "50.00").await;

    assert_eq!(app.store.payments().await.len(), 1);
    assert!(!app.violation(VIOLATION_ID).await.payment_submitted);
}

#[tokio::test]
async fn test_list_payments_for_violation() {
    let app = setup_test_app().await;
    let created = submit_png(&app, VIOLATION_ID, "50.00").await;

    let response = app
        .client()
        .get("/payments/violation/7")
        .add_header(AUTHORIZATION, auth_header())
        .await;

    response.assert_status_ok();
    let payments: Vec<Value> = response.json();
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0]["payment_id"], created["paymentId"]);
    assert_eq!(payments[0]["violation_id"], 7);
    assert_eq!(payments[0]["status"], "pending");

    let response = app
        .client()
        .get("/payments/violation/42")
        .add_header(AUTHORIZATION, auth_header())
        .await;
    response.assert_status_ok();
    assert!(response.json::<Vec<Value>>().is_empty());
}

#[tokio::test]
async fn test_list_payments_newest_first_with_details() {
    let app = setup_test_app().await;
    let first = submit_png(&app, VIOLATION_ID, "50.00").await;
    let second = submit_png(&app, UNOWNED_VIOLATION_ID, "25.00").await;

    let response = app
        .client()
        .get("/payments")
        .add_header(AUTHORIZATION, auth_header())
        .await;

    response.assert_status_ok();
    let payments: Vec<Value> = response.json();
    assert_eq!(payments.len(), 2);
    assert_eq!(payments[0]["payment_id"], second["paymentId"]);
    assert_eq!(payments[1]["payment_id"], first["paymentId"]);

    assert_eq!(payments[0]["violation_type"], "Illegal parking");
    assert!(payments[0]["user_name"].is_null());
    assert_eq!(payments[1]["user_name"], "Dana Reyes");
    assert_eq!(payments[1]["driving_license_number"], "DL-0042");
    assert_eq!(payments[1]["violation_type"], "Speeding");
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/payments")
        .multipart(payment_form(
            "7",
            "50.00",
            Some((create_minimal_png(), "receipt.png", "image/png")),
        ))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["message"], "Access denied. No token provided.");

    let response = app.client().get("/payments").await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    assert!(app.store.payments().await.is_empty());
    assert_eq!(app.stored_receipt_count(), 0);
}

#[tokio::test]
async fn test_token_without_bearer_scheme_is_unauthorized() {
    let app = setup_test_app().await;

    for header in [valid_token(), format!("Basic {}", valid_token())] {
        let response = app
            .client()
            .get("/payments")
            .add_header(AUTHORIZATION, HeaderValue::from_str(&header).unwrap())
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        let body: Value = response.json();
        assert_eq!(body["message"], "Access denied. No token provided.");
    }

    let response = app
        .client()
        .get("/payments")
        .add_header(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("bearer {}", valid_token())).unwrap(),
        )
        .await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_rejected_tokens_are_forbidden() {
    let app = setup_test_app().await;

    for token in [foreign_token(), expired_token(), "garbage".to_string()] {
        let response = app
            .client()
            .post("/payments")
            .add_header(AUTHORIZATION, HeaderValue::from_str(&bearer(&token)).unwrap())
            .multipart(payment_form(
                "7",
                "50.00",
                Some((create_minimal_png(), "receipt.png", "image/png")),
            ))
            .await;
        response.assert_status(StatusCode::FORBIDDEN);
        let body: Value = response.json();
        assert_eq!(body["message"], "Invalid token.");
    }

    assert!(app.store.payments().await.is_empty());
    assert_eq!(app.stored_receipt_count(), 0);
}

#[tokio::test]
async fn test_concurrent_submissions_get_distinct_receipts() {
    let app = setup_test_app().await;

    let requests = (0..8).map(|_| {
        app.client()
            .post("/payments")
            .add_header(AUTHORIZATION, auth_header())
            .multipart(payment_form(
                "7",
                "50.00",
                Some((create_test_pdf(), "receipt.pdf", "application/pdf")),
            ))
            .into_future()
    });
    let responses = futures::future::join_all(requests).await;

    for response in &responses {
        response.assert_status(StatusCode::CREATED);
    }

    let payments = app.store.payments().await;
    assert_eq!(payments.len(), 8);
    let receipts: HashSet<String> = payments
        .iter()
        .map(|p| p.receipt_file.as_str().to_string())
        .collect();
    assert_eq!(receipts.len(), 8);
    assert_eq!(app.stored_receipt_count(), 8);
}

#[tokio::test]
async fn test_download_receipt() {
    let app = setup_test_app().await;
    submit_png(&app, VIOLATION_ID, "50.00").await;
    let reference = app.store.payments().await[0].receipt_file.clone();

    let response = app
        .client()
        .get(&format!("/payments/receipts/{}", reference))
        .add_header(AUTHORIZATION, auth_header())
        .await;

    response.assert_status_ok();
    assert_eq!(response.header(CONTENT_TYPE), "image/png");
    assert_eq!(response.as_bytes().as_ref(), create_minimal_png().as_slice());

    let response = app
        .client()
        .get("/payments/receipts/receipt-1-1.png")
        .add_header(AUTHORIZATION, auth_header())
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = setup_test_app().await;

    let response = app.client().get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "alive");
    assert_eq!(body["environment"], "test");

    let response = app.client().get("/health/ready").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["storage_durable"], true);
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = setup_test_app().await;

    let response = app.client().get("/api/openapi.json").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["paths"]["/payments"].is_object());
}
