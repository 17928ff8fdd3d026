//! Admin API 帮助函数

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use tracing::{error, warn};

use crate::domain::Violation;
use crate::errors::CrmError;

use super::error_code::ErrorCode;
use super::types::ApiResponse;

/// 构建 JSON 响应
pub fn json_response<T: Serialize>(
    status: StatusCode,
    code: ErrorCode,
    message: impl Into<String>,
    data: Option<T>,
) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            code: code as i32,
            message: message.into(),
            data,
        })
}

/// 构建成功响应
pub fn success_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::OK, ErrorCode::Success, "OK", Some(data))
}

/// 新建成功，201
pub fn created_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::CREATED, ErrorCode::Success, "Created", Some(data))
}

/// 构建错误响应
pub fn error_response(status: StatusCode, error_code: ErrorCode, message: &str) -> HttpResponse {
    json_response::<()>(status, error_code, message, None)
}

/// 从 CrmError 构建错误响应（自动映射 HTTP 状态码和 ErrorCode）
///
/// 校验错误的 `data` 是逐字段的违反列表。
pub fn error_from_crm(err: &CrmError) -> HttpResponse {
    let status = err.http_status();
    if status.is_server_error() {
        error!("Admin API: {}", err.format_simple());
    } else {
        warn!("Admin API: {}", err.format_simple());
    }

    let code = ErrorCode::from(err);
    match err {
        CrmError::Validation(violations) => {
            json_response::<&[Violation]>(status, code, err.message(), Some(violations))
        }
        _ => error_response(status, code, &err.message()),
    }
}

/// 统一 Result → HttpResponse 转换
///
/// 成功时返回 200 OK + JSON 数据，失败时自动映射 CrmError。
pub fn api_result<T, E>(result: Result<T, E>) -> HttpResponse
where
    T: Serialize,
    E: Into<CrmError>,
{
    match result {
        Ok(data) => success_response(data),
        Err(e) => error_from_crm(&e.into()),
    }
}

impl ResponseError for CrmError {
    fn status_code(&self) -> StatusCode {
        self.http_status()
    }

    fn error_response(&self) -> HttpResponse {
        error_from_crm(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ViolationCode;
    use actix_web::body::to_bytes;

    #[actix_rt::test]
    async fn test_validation_error_carries_violations() {
        let err = CrmError::validation(vec![Violation::new(
            "stage",
            ViolationCode::InvalidChoice,
            "Select a valid choice.",
        )]);
        let response = error_from_crm(&err);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["code"], 3000);
        assert_eq!(json["data"][0]["field"], "stage");
        assert_eq!(json["data"][0]["code"], "invalid_choice");
    }

    #[actix_rt::test]
    async fn test_api_result_success_envelope() {
        let response = api_result::<_, CrmError>(Ok(vec![1, 2]));
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!({"code": 0, "message": "OK", "data": [1, 2]}));
    }

    #[test]
    fn test_response_error_status() {
        let err = CrmError::integrity("fk");
        assert_eq!(ResponseError::status_code(&err), StatusCode::CONFLICT);
    }
}
