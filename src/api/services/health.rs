use actix_web::{HttpResponse, Responder, http::StatusCode, web};
use std::time::{Duration, Instant};
use tracing::{error, info, trace};

use crate::api::services::admin::{ApiResponse, ErrorCode, HealthResponse};
use crate::services::AppServices;

/// Health Service
///
/// 直接探测数据库连接，不经过仓储层。
pub struct HealthService;

impl HealthService {
    pub async fn health_check(services: web::Data<AppServices>) -> impl Responder {
        let start_time = Instant::now();
        trace!("Received health check request");

        let storage = &services.storage;
        let database = match tokio::time::timeout(Duration::from_secs(5), storage.ping()).await {
            Ok(Ok(())) => "healthy".to_string(),
            Ok(Err(e)) => {
                error!("Storage health check failed: {}", e);
                format!("unhealthy: {}", e.message())
            }
            Err(_) => {
                error!("Storage health check timeout");
                "unhealthy: timeout".to_string()
            }
        };
        let is_healthy = database == "healthy";

        let health_data = HealthResponse {
            status: if is_healthy { "healthy" } else { "unhealthy" }.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            backend: storage.backend_name().to_string(),
            database,
            response_time_ms: start_time.elapsed().as_millis() as u32,
        };

        info!(
            "Health check completed in {:?}, status: {}",
            start_time.elapsed(),
            health_data.status
        );

        let (status, code, message) = if is_healthy {
            (StatusCode::OK, ErrorCode::Success, "OK")
        } else {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorCode::DatabaseUnavailable,
                "Service Unavailable",
            )
        };

        HttpResponse::build(status)
            .append_header(("Content-Type", "application/json; charset=utf-8"))
            .json(ApiResponse {
                code: code as i32,
                message: message.to_string(),
                data: Some(health_data),
            })
    }

    // 存活检查，不碰数据库
    pub async fn liveness_check() -> impl Responder {
        trace!("Received liveness check request");

        HttpResponse::NoContent().finish()
    }
}

/// Health 路由配置 `/health`
pub fn health_routes() -> actix_web::Scope {
    web::scope("/health")
        .route("", web::get().to(HealthService::health_check))
        .route("", web::head().to(HealthService::health_check))
        .route("/live", web::get().to(HealthService::liveness_check))
        .route("/live", web::head().to(HealthService::liveness_check))
}
