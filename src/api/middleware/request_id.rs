//! Request ID middleware
//!
//! 每个请求带一个 request id：沿用客户端传入的 `x-request-id`，
//! 没有或不合法时生成 UUID。id 注入 tracing span 并回写到响应头。

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    dev::{ServiceRequest, ServiceResponse},
    http::header::{HeaderName, HeaderValue},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::{Instrument, info_span};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// 客户端 id 的最大长度
const MAX_INCOMING_ID_LEN: usize = 64;

/// 请求 ID 类型，可从 request extensions 中提取
#[derive(Clone, Debug)]
pub struct RequestId(pub String);

/// 只接受短的可打印 ASCII id，防止日志注入
fn incoming_request_id(req: &ServiceRequest) -> Option<String> {
    let value = req.headers().get(REQUEST_ID_HEADER)?.to_str().ok()?.trim();
    let acceptable = !value.is_empty()
        && value.len() <= MAX_INCOMING_ID_LEN
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    acceptable.then(|| value.to_string())
}

/// Request ID 中间件工厂
#[derive(Clone, Default)]
pub struct RequestIdMiddleware;

impl<S, B> Transform<S, ServiceRequest> for RequestIdMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestIdService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestIdService {
            service: Rc::new(service),
        }))
    }
}

pub struct RequestIdService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequestIdService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
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

        let request_id =
            incoming_request_id(&req).unwrap_or_else(|| Uuid::new_v4().to_string());
        req.extensions_mut().insert(RequestId(request_id.clone()));

        let span = info_span!(
            "request",
            request_id = %request_id,
            method = %req.method(),
            path = %req.path(),
        );

        Box::pin(
            async move {
                let mut response = srv.call(req).await?;

                if let Ok(header_value) = HeaderValue::from_str(&request_id) {
                    response
                        .headers_mut()
                        .insert(HeaderName::from_static(REQUEST_ID_HEADER), header_value);
                }

                Ok(response)
            }
            .instrument(span),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, test, web};

    #[actix_rt::test]
    async fn test_generates_and_echoes_request_id() {
        let app = test::init_service(
            App::new()
                .wrap(RequestIdMiddleware)
                .route("/", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        let generated = resp.headers().get(REQUEST_ID_HEADER).unwrap();
        assert!(Uuid::parse_str(generated.to_str().unwrap()).is_ok());

        let req = test::TestRequest::get()
            .uri("/")
            .insert_header((REQUEST_ID_HEADER, "trace-42"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.headers().get(REQUEST_ID_HEADER).unwrap(), "trace-42");
    }

    #[actix_rt::test]
    async fn test_rejects_unsafe_incoming_id() {
        let app = test::init_service(
            App::new()
                .wrap(RequestIdMiddleware)
                .route("/", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/")
            .insert_header((REQUEST_ID_HEADER, "a b\tc"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_ne!(resp.headers().get(REQUEST_ID_HEADER).unwrap(), "a b\tc");
    }
}
