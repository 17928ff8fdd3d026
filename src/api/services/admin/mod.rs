//! Admin API 服务模块
//!
//! 该模块包含管理 API 的所有端点，包括：
//! - 认证（登录）
//! - 各记录类型的 CRUD 与校验
//! - 站点展示配置
//! - 附件上传

pub mod auth;
pub mod error_code;
mod helpers;
mod records;
pub mod routes;
mod site;
mod types;
mod uploads;

// 重新导出类型
pub use types::*;

// 重新导出帮助函数
pub use helpers::{api_result, created_response, error_from_crm, error_response, success_response};

// 重新导出错误码
pub use error_code::ErrorCode;

pub use routes::{admin_v1_routes, record_routes};
