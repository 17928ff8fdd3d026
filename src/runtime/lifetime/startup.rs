use anyhow::{Context, Result, anyhow};
use std::sync::Arc;
use tracing::{debug, info};

use crate::admin::AdminSite;
use crate::api::jwt::JwtService;
use crate::config::{StaticConfig, get_config};
use crate::services::AppServices;
use crate::storage::StorageFactory;

pub struct StartupContext {
    pub services: AppServices,
    pub jwt: Arc<JwtService>,
    pub admin_prefix: String,
}

/// 校验站点注册；展示配置引用了不存在的字段时拒绝启动
pub fn build_admin_site() -> Result<Arc<AdminSite>> {
    let site = AdminSite::crm();
    site.check()
        .map_err(|problems| anyhow!("Admin site misconfigured:\n  {}", problems.join("\n  ")))?;
    Ok(Arc::new(site))
}

/// 由配置组装服务集合（存储、站点、JWT、附件）
pub async fn build_services(config: &StaticConfig) -> Result<(AppServices, Arc<JwtService>)> {
    let storage = StorageFactory::create(&config.database)
        .await
        .context("Failed to create storage backend")?;
    info!("Using storage backend: {}", storage.backend_name());

    let site = build_admin_site()?;
    debug!("Admin site ready with {} record kinds", site.len());

    let jwt = Arc::new(JwtService::from_config(&config.admin));
    let services = AppServices::new(storage, site, Arc::clone(&jwt), config);
    Ok((services, jwt))
}

/// 准备服务器启动的上下文
pub async fn prepare_server_startup() -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let config = get_config();
    let (services, jwt) = build_services(&config).await?;

    tokio::fs::create_dir_all(services.attachments.root())
        .await
        .with_context(|| {
            format!(
                "Failed to create media directory {}",
                services.attachments.root().display()
            )
        })?;

    let admin_prefix = config.admin.route_prefix.trim_end_matches('/').to_string();
    info!("Admin API available at: {}/v1", admin_prefix);

    debug!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );

    Ok(StartupContext {
        services,
        jwt,
        admin_prefix,
    })
}
