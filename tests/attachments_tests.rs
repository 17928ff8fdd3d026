//! 附件上传测试：multipart 上传后把返回的路径写入记录

mod common;

use std::path::Path;

use actix_web::body::MessageBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::{App, test};
use serde_json::{Value, json};

use crmdesk::api::middleware::RequestIdMiddleware;
use crmdesk::runtime::modes::server::configure_app;

use common::{setup, setup_with};

const BOUNDARY: &str = "crmdesk-test-boundary";

macro_rules! admin_app {
    ($env:expr) => {
        test::init_service(App::new().wrap(RequestIdMiddleware).configure(|cfg| {
            configure_app(cfg, $env.services.clone(), $env.jwt.clone(), "/admin")
        }))
        .await
    };
}

/// 单字段 multipart 请求体
fn multipart_body(field: &str, file_name: &str, content: &[u8]) -> Vec<u8> {
    let mut body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n\
         Content-Type: application/octet-stream\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(target: &str, bearer: String, body: Vec<u8>) -> test::TestRequest {
    test::TestRequest::post()
        .uri(&format!("/admin/v1/uploads/{}", target))
        .insert_header(("Authorization", bearer))
        .insert_header((
            "Content-Type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        ))
        .set_payload(body)
}

async fn status_and_json<B: MessageBody>(resp: ServiceResponse<B>) -> (StatusCode, Value) {
    let status = resp.status();
    let body = test::read_body(resp).await;
    let json = serde_json::from_slice(&body).expect("response body must be JSON");
    (status, json)
}

#[actix_rt::test]
async fn test_uploaded_note_attachment_can_be_referenced() {
    let env = setup().await;
    let app = admin_app!(env);

    let body = multipart_body("file", "meeting minutes.txt", b"1. budget\n2. hiring\n");
    let req = upload_request("notes", env.bearer(), body).to_request();
    let (status, upload) = status_and_json(test::call_service(&app, req).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(upload["data"]["size"], 20);

    let path = upload["data"]["path"].as_str().unwrap().to_string();
    assert!(path.starts_with("attachs/notes/"));
    assert!(path.ends_with("_meeting_minutes.txt"));
    let stored = Path::new(&env.config.media.root).join(&path);
    assert_eq!(
        std::fs::read(stored).unwrap(),
        b"1. budget\n2. hiring\n".to_vec()
    );

    let req = test::TestRequest::post()
        .uri("/admin/v1/notes")
        .insert_header(("Authorization", env.bearer()))
        .set_json(json!({"name": "Kickoff", "attach": path}))
        .to_request();
    let (status, note) = status_and_json(test::call_service(&app, req).await).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(note["data"]["attach"], path);
}

#[actix_rt::test]
async fn test_document_attach_must_live_under_documents_dir() {
    let env = setup().await;
    let app = admin_app!(env);

    let req = test::TestRequest::post()
        .uri("/admin/v1/documents")
        .insert_header(("Authorization", env.bearer()))
        .set_json(json!({
            "name": "Contract",
            "attach": "attachs/notes/../../etc/passwd",
            "status": "active"
        }))
        .to_request();
    let (status, body) = status_and_json(test::call_service(&app, req).await).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let violations = body["data"].as_array().unwrap();
    assert!(
        violations
            .iter()
            .any(|v| v["field"] == "attach" && v["code"] == "invalid_path")
    );
}

#[actix_rt::test]
async fn test_oversized_upload_rejected() {
    let env = setup_with(|c| c.media.max_upload_bytes = 16).await;
    let app = admin_app!(env);

    let req = upload_request(
        "documents",
        env.bearer(),
        multipart_body("file", "big.bin", &[7u8; 64]),
    )
    .to_request();
    let (status, body) = status_and_json(test::call_service(&app, req).await).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4000);

    let documents = Path::new(&env.config.media.root).join("attachs/documents");
    let written = std::fs::read_dir(&documents)
        .map(|entries| entries.count())
        .unwrap_or(0);
    assert_eq!(written, 0);
}

#[actix_rt::test]
async fn test_upload_requires_file_field_and_known_target() {
    let env = setup().await;
    let app = admin_app!(env);

    let req = upload_request(
        "notes",
        env.bearer(),
        multipart_body("attachment", "minutes.txt", b"agenda"),
    )
    .to_request();
    let (status, body) = status_and_json(test::call_service(&app, req).await).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4000);

    let req = upload_request(
        "images",
        env.bearer(),
        multipart_body("file", "logo.png", b"png"),
    )
    .to_request();
    let (status, body) = status_and_json(test::call_service(&app, req).await).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 3002);
}

#[actix_rt::test]
async fn test_upload_requires_authentication() {
    let env = setup().await;
    let app = admin_app!(env);

    let req = test::TestRequest::post()
        .uri("/admin/v1/uploads/notes")
        .insert_header((
            "Content-Type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        ))
        .set_payload(multipart_body("file", "minutes.txt", b"agenda"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
