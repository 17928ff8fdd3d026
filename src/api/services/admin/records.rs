//! 记录 CRUD 端点
//!
//! 每个处理器对记录类型泛型，由 [`super::routes::record_routes`] 为每种类型实例化。

use std::collections::HashMap;

use actix_web::{HttpResponse, web};
use tracing::debug;

use crate::domain::ActingUser;
use crate::errors::{CrmError, Result};
use crate::services::AppServices;
use crate::storage::StoredRecord;

use super::helpers::{created_response, success_response};
use super::types::{ValidationReport, list_query_from_params};

/// 请求体解析为记录；未知选项值留给校验处理，只有 JSON 结构错误在这里失败
fn parse_record<R: StoredRecord>(body: &[u8]) -> Result<R> {
    serde_json::from_slice::<R>(body).map_err(|e| {
        CrmError::serialization(format!("invalid {} payload: {}", R::KIND, e))
    })
}

pub async fn list_records<R: StoredRecord>(
    services: web::Data<AppServices>,
    params: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse> {
    let query = list_query_from_params(params.into_inner())?;
    debug!("Admin API: list {} with {:?}", R::KIND, query);

    let page = services.repository::<R>()?.list(query).await?;
    Ok(success_response(page))
}

pub async fn create_record<R: StoredRecord>(
    services: web::Data<AppServices>,
    user: ActingUser,
    body: web::Bytes,
) -> Result<HttpResponse> {
    let record = parse_record::<R>(&body)?;
    let saved = services.repository::<R>()?.create(&user, record).await?;
    Ok(created_response(saved))
}

/// 只校验不保存
pub async fn validate_record<R: StoredRecord>(
    services: web::Data<AppServices>,
    body: web::Bytes,
) -> Result<HttpResponse> {
    let record = parse_record::<R>(&body)?;
    let violations = services.repository::<R>()?.validate(&record);
    Ok(success_response(ValidationReport {
        valid: violations.is_empty(),
        violations,
    }))
}

pub async fn get_record<R: StoredRecord>(
    services: web::Data<AppServices>,
    id: web::Path<i64>,
) -> Result<HttpResponse> {
    let record = services.repository::<R>()?.get(id.into_inner()).await?;
    Ok(success_response(record))
}

pub async fn update_record<R: StoredRecord>(
    services: web::Data<AppServices>,
    user: ActingUser,
    id: web::Path<i64>,
    body: web::Bytes,
) -> Result<HttpResponse> {
    let record = parse_record::<R>(&body)?;
    let saved = services
        .repository::<R>()?
        .update(&user, id.into_inner(), record)
        .await?;
    Ok(success_response(saved))
}

pub async fn delete_record<R: StoredRecord>(
    services: web::Data<AppServices>,
    user: ActingUser,
    id: web::Path<i64>,
) -> Result<HttpResponse> {
    let id = id.into_inner();
    services.repository::<R>()?.delete(&user, id).await?;
    Ok(success_response(serde_json::json!({ "deleted": id })))
}
