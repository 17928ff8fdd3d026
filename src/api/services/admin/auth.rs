//! Admin API 认证相关端点

use actix_web::{HttpResponse, web};
use tracing::info;

use crate::errors::CrmError;
use crate::services::AppServices;

use super::helpers::success_response;
use super::types::{AuthSuccessResponse, LoginCredentials};

/// 用户名密码登录，返回 Bearer access token
pub async fn login(
    services: web::Data<AppServices>,
    credentials: web::Json<LoginCredentials>,
) -> Result<HttpResponse, CrmError> {
    info!("Admin API: login attempt for '{}'", credentials.username);

    let result = services
        .auth
        .login(&credentials.username, &credentials.password)
        .await?;

    Ok(success_response(AuthSuccessResponse {
        token: result.token,
        expires_in: result.expires_in,
        user: result.user,
    }))
}
