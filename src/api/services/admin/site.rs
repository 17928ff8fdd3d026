//! 管理站点的展示配置端点

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use std::str::FromStr;

use crate::domain::EntityKind;
use crate::services::AppServices;

use super::error_code::ErrorCode;
use super::helpers::{error_response, success_response};

/// 首页：可见的记录类型列表
pub async fn site_index(services: web::Data<AppServices>) -> HttpResponse {
    success_response(services.site.index())
}

/// 单个类型的字段、分组、列表列等配置
pub async fn model_schema(
    services: web::Data<AppServices>,
    kind: web::Path<String>,
) -> HttpResponse {
    let Some(admin) = EntityKind::from_str(&kind)
        .ok()
        .and_then(|kind| services.site.get(kind))
    else {
        return error_response(
            StatusCode::NOT_FOUND,
            ErrorCode::UnknownKind,
            &format!("unknown record kind '{}'", kind),
        );
    };
    success_response(admin.as_ref())
}
