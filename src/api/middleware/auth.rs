use actix_service::{Service, Transform};
use actix_web::{
    Error, FromRequest, HttpMessage, HttpRequest, HttpResponse,
    body::EitherBody,
    dev::{Payload, ServiceRequest, ServiceResponse},
    http::header::CONTENT_TYPE,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use std::sync::Arc;
use tracing::{info, trace};

use crate::api::jwt::JwtService;
use crate::api::services::admin::{ApiResponse, ErrorCode};
use crate::domain::ActingUser;
use crate::errors::CrmError;

/// Admin authentication middleware
///
/// 校验 `Authorization: Bearer <token>`，把 token 中的 [`ActingUser`]
/// 放入 request extensions。登录端点直接放行。
#[derive(Clone)]
pub struct AdminAuth {
    jwt: Arc<JwtService>,
    admin_prefix: String,
}

impl AdminAuth {
    pub fn new(jwt: Arc<JwtService>, admin_prefix: impl Into<String>) -> Self {
        Self {
            jwt,
            admin_prefix: admin_prefix.into(),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AdminAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AdminAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AdminAuthMiddleware {
            service: Rc::new(service),
            jwt: Arc::clone(&self.jwt),
            login_path: format!("{}/v1/auth/login", self.admin_prefix.trim_end_matches('/')),
        }))
    }
}

pub struct AdminAuthMiddleware<S> {
    service: Rc<S>,
    jwt: Arc<JwtService>,
    login_path: String,
}

impl<S, B> AdminAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    /// Handle unauthorized requests
    fn handle_unauthorized(req: ServiceRequest) -> ServiceResponse<EitherBody<B>> {
        info!("Admin authentication failed - invalid or missing token");
        req.into_response(
            HttpResponse::Unauthorized()
                .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
                .json(ApiResponse::<()> {
                    code: ErrorCode::Unauthorized as i32,
                    message: "Unauthorized: Invalid or missing token".to_string(),
                    data: None,
                })
                .map_into_right_body(),
        )
    }

    /// 从 Authorization header 提取 Bearer token
    fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
        req.headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
            .map(|s| s.trim().to_string())
    }

    /// 验证 Bearer token 并还原操作者
    fn authenticate(jwt: &JwtService, token: &str) -> Option<ActingUser> {
        match jwt.validate_access_token(token) {
            Ok(claims) => {
                trace!("Bearer token validation successful");
                claims.acting_user()
            }
            Err(e) => {
                info!("Bearer token validation failed: {}", e);
                None
            }
        }
    }
}

impl<S, B> Service<ServiceRequest> for AdminAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let jwt = Arc::clone(&self.jwt);
        let is_login = req.path() == self.login_path;

        Box::pin(async move {
            // Allow login endpoint to pass through without authentication
            if is_login {
                trace!("Login endpoint accessed - bypassing authentication");
                let response = srv.call(req).await?.map_into_left_body();
                return Ok(response);
            }

            let user = Self::extract_bearer_token(&req)
                .and_then(|token| Self::authenticate(&jwt, &token));
            match user {
                Some(user) => {
                    trace!("Admin authentication successful: {}", user.username);
                    req.extensions_mut().insert(user);
                    let response = srv.call(req).await?.map_into_left_body();
                    Ok(response)
                }
                None => Ok(Self::handle_unauthorized(req)),
            }
        })
    }
}

/// 处理器通过参数 `user: ActingUser` 获取当前操作者
impl FromRequest for ActingUser {
    type Error = CrmError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<ActingUser>()
                .cloned()
                .ok_or_else(|| CrmError::unauthorized("no authenticated user on this request")),
        )
    }
}
