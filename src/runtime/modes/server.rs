//! Server mode
//!
//! This module contains the HTTP server startup logic.
//! It configures and starts the HTTP server with all necessary routes.

use actix_web::{
    App, HttpServer,
    middleware::{Compress, DefaultHeaders},
    web,
};
use anyhow::Result;
use std::sync::Arc;
use tracing::{error, warn};

use crate::api::jwt::JwtService;
use crate::api::middleware::{AdminAuth, RequestIdMiddleware};
use crate::api::services::{admin_v1_routes, health_routes};
use crate::errors::CrmError;
use crate::runtime::lifetime;
use crate::services::AppServices;

/// 注册所有路由和共享数据
///
/// 服务器与集成测试共用，保证两边的路由树一致。
pub fn configure_app(
    cfg: &mut web::ServiceConfig,
    services: AppServices,
    jwt: Arc<JwtService>,
    admin_prefix: &str,
) {
    // 请求体解析失败统一走 API 错误信封
    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        CrmError::serialization(format!("invalid JSON body: {}", err)).into()
    });
    let query_config = web::QueryConfig::default().error_handler(|err, _req| {
        CrmError::invalid_query(err.to_string()).into()
    });
    let path_config = web::PathConfig::default()
        .error_handler(|err, _req| CrmError::not_found(err.to_string()).into());

    cfg.app_data(web::Data::new(services))
        .app_data(json_config)
        .app_data(query_config)
        .app_data(path_config)
        .app_data(web::PayloadConfig::new(1024 * 1024))
        .service(
            web::scope(admin_prefix)
                .wrap(AdminAuth::new(jwt, admin_prefix))
                .service(admin_v1_routes()),
        )
        .service(health_routes());
}

/// Run the HTTP server
///
/// This function:
/// 1. Prepares server components (storage, admin site, JWT)
/// 2. Configures and starts the HTTP server
/// 3. Listens for graceful shutdown signals
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server() -> Result<()> {
    let startup = lifetime::startup::prepare_server_startup()
        .await
        .map_err(|e| {
            error!("Server startup failed: {}", e);
            e
        })?;

    let config = crate::config::get_config();
    let cpu_count = config.server.cpu_count.clamp(1, 32);
    warn!("Using {} CPU cores for the server", cpu_count);

    let services = startup.services;
    let jwt = startup.jwt;
    let admin_prefix = startup.admin_prefix;

    // Clone storage before services move into HttpServer closure
    let storage_for_shutdown = Arc::clone(&services.storage);

    let server = HttpServer::new(move || {
        let services = services.clone();
        let jwt = Arc::clone(&jwt);
        let admin_prefix = admin_prefix.clone();
        App::new()
            .wrap(RequestIdMiddleware) // 为每个请求生成 request_id
            .wrap(Compress::default())
            .wrap(
                DefaultHeaders::new().add(("Cache-Control", "no-cache, no-store, must-revalidate")),
            )
            .configure(move |cfg| configure_app(cfg, services, jwt, &admin_prefix))
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .client_disconnect_timeout(std::time::Duration::from_millis(1000))
    .workers(cpu_count);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    warn!("Starting server at http://{}", bind_address);
    let server = server.bind(bind_address)?.run();

    // Wait for server or shutdown signal
    tokio::select! {
        res = server => {
            res?;
        }
        _ = lifetime::shutdown::listen_for_shutdown(&storage_for_shutdown) => {
            warn!("Graceful shutdown: all tasks completed");
        }
    }

    Ok(())
}
