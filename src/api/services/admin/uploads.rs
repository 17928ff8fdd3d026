//! 附件上传端点
//!
//! `POST /uploads/{documents|notes}`，multipart 字段 `file`。
//! 返回的 `path` 由客户端写入记录的 `attach` 字段。

use actix_multipart::Multipart;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use futures_util::StreamExt;
use std::str::FromStr;
use tracing::{error, info};

use crate::domain::ActingUser;
use crate::errors::CrmError;
use crate::services::{AppServices, AttachmentTarget};

use super::error_code::ErrorCode;
use super::helpers::{error_from_crm, error_response, success_response};
use super::types::UploadResponse;

pub async fn upload_attachment(
    services: web::Data<AppServices>,
    user: ActingUser,
    target: web::Path<String>,
    mut payload: Multipart,
) -> HttpResponse {
    let Ok(target) = AttachmentTarget::from_str(&target) else {
        return error_response(
            StatusCode::NOT_FOUND,
            ErrorCode::UnknownKind,
            &format!("attachments are not supported for '{}'", target),
        );
    };
    info!(
        "Admin API: {} uploading {} attachment",
        user.username,
        target.as_ref()
    );

    let store = &services.attachments;
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(item) = payload.next().await {
        let mut field = match item {
            Ok(f) => f,
            Err(e) => {
                error!("Failed to parse multipart field: {}", e);
                return error_response(
                    StatusCode::BAD_REQUEST,
                    ErrorCode::InvalidMultipartData,
                    &format!("Invalid multipart data: {}", e),
                );
            }
        };

        if field.name() != Some("file") {
            // 忽略未知字段
            continue;
        }

        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .unwrap_or("upload")
            .to_string();

        // 边读边检查累计大小
        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            match chunk {
                Ok(bytes) => {
                    if let Err(e) = store.check_size(data.len() + bytes.len()) {
                        return error_from_crm(&e);
                    }
                    data.extend_from_slice(&bytes);
                }
                Err(e) => {
                    error!("Failed to read file chunk: {}", e);
                    return error_response(
                        StatusCode::BAD_REQUEST,
                        ErrorCode::InvalidMultipartData,
                        &format!("Failed to read file: {}", e),
                    );
                }
            }
        }
        upload = Some((file_name, data));
    }

    let Some((file_name, data)) = upload else {
        return error_from_crm(&CrmError::attachment("missing multipart field 'file'"));
    };

    match store.save(target, &file_name, &data).await {
        Ok(path) => success_response(UploadResponse {
            path,
            size: data.len(),
        }),
        Err(e) => error_from_crm(&e),
    }
}
