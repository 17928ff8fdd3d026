//! Admin API 路由配置
//!
//! 每种记录类型一个 scope，路径取类型的 slug。

use actix_web::web;

use crate::domain::{
    Address, Circulation, Contact, Contractor, Deal, Document, EmailContact, MarketingCampaign,
    Meeting, Note, PhoneCall, PreliminaryContact, Project, Task,
};
use crate::storage::StoredRecord;

use super::auth::login;
use super::records::{
    create_record, delete_record, get_record, list_records, update_record, validate_record,
};
use super::site::{model_schema, site_index};
use super::uploads::upload_attachment;

/// 记录路由 `/{slug}`
///
/// 包含：
/// - GET /{slug} - 分页列表（search、page、page_size 以及过滤参数）
/// - POST /{slug} - 创建
/// - POST /{slug}/validate - 只校验不保存
/// - GET /{slug}/{id} - 获取单条
/// - PUT /{slug}/{id} - 更新
/// - DELETE /{slug}/{id} - 删除
pub fn record_routes<R: StoredRecord>() -> actix_web::Scope {
    web::scope(&format!("/{}", R::KIND.slug()))
        .route("", web::get().to(list_records::<R>))
        .route("", web::post().to(create_record::<R>))
        // /validate must be before /{id}
        .route("/validate", web::post().to(validate_record::<R>))
        .route("/{id}", web::get().to(get_record::<R>))
        .route("/{id}", web::put().to(update_record::<R>))
        .route("/{id}", web::delete().to(delete_record::<R>))
}

/// 认证路由 `/auth`
///
/// 包含：
/// - POST /auth/login - 登录，免认证
pub fn auth_routes() -> actix_web::Scope {
    web::scope("/auth").route("/login", web::post().to(login))
}

/// Admin API v1 路由
///
/// 组合所有子模块路由，另有：
/// - GET /index - 可见的记录类型
/// - GET /schema/{kind} - 类型的展示配置
/// - POST /uploads/{target} - 上传附件（documents 或 notes）
pub fn admin_v1_routes() -> actix_web::Scope {
    web::scope("/v1")
        .route("/index", web::get().to(site_index))
        .route("/schema/{kind}", web::get().to(model_schema))
        .route("/uploads/{target}", web::post().to(upload_attachment))
        .service(auth_routes())
        .service(record_routes::<Address>())
        .service(record_routes::<EmailContact>())
        .service(record_routes::<Contractor>())
        .service(record_routes::<Contact>())
        .service(record_routes::<PreliminaryContact>())
        .service(record_routes::<MarketingCampaign>())
        .service(record_routes::<Deal>())
        .service(record_routes::<Circulation>())
        .service(record_routes::<Project>())
        .service(record_routes::<PhoneCall>())
        .service(record_routes::<Meeting>())
        .service(record_routes::<Task>())
        .service(record_routes::<Note>())
        .service(record_routes::<Document>())
}
