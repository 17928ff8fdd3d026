//! 集成测试共用的环境：临时 SQLite + 完整服务集合

#![allow(dead_code)]

use std::sync::Arc;

use tempfile::TempDir;

use crmdesk::api::jwt::JwtService;
use crmdesk::config::StaticConfig;
use crmdesk::domain::ActingUser;
use crmdesk::runtime::lifetime::startup::build_admin_site;
use crmdesk::services::AppServices;
use crmdesk::storage::StorageFactory;

pub const ADMIN_USERNAME: &str = "alice";
pub const ADMIN_PASSWORD: &str = "correct-horse-battery";

pub struct TestEnv {
    pub services: AppServices,
    pub jwt: Arc<JwtService>,
    pub config: StaticConfig,
    /// 预先创建的管理员
    pub admin: ActingUser,
    _dir: TempDir,
}

impl TestEnv {
    /// 再建一个管理员，用于区分 created_by / updated_by
    pub async fn another_user(&self, username: &str) -> ActingUser {
        let user = self
            .services
            .auth
            .create_user(username, ADMIN_PASSWORD)
            .await
            .expect("Failed to create user");
        ActingUser::new(user.id, user.username)
    }

    pub fn bearer(&self) -> String {
        let token = self
            .jwt
            .generate_access_token(&self.admin)
            .expect("Failed to sign token");
        format!("Bearer {}", token)
    }
}

pub async fn setup() -> TestEnv {
    setup_with(|_| {}).await
}

/// 在默认配置上做修改后搭建环境
pub async fn setup_with(adjust: impl FnOnce(&mut StaticConfig)) -> TestEnv {
    let dir = TempDir::new().expect("Failed to create temp dir");

    let mut config = StaticConfig::default();
    config.database.database_url =
        format!("sqlite://{}?mode=rwc", dir.path().join("crm_test.db").display());
    config.database.pool_size = 2;
    config.media.root = dir.path().join("media").to_string_lossy().into_owned();
    adjust(&mut config);

    let storage = StorageFactory::create(&config.database)
        .await
        .expect("Failed to create storage");
    let site = build_admin_site().expect("Admin site must pass its check");
    let jwt = Arc::new(JwtService::new("integration-test-secret", 60));
    let services = AppServices::new(storage, site, Arc::clone(&jwt), &config);

    let user = services
        .auth
        .create_user(ADMIN_USERNAME, ADMIN_PASSWORD)
        .await
        .expect("Failed to create admin user");
    let admin = ActingUser::new(user.id, user.username);

    TestEnv {
        services,
        jwt,
        config,
        admin,
        _dir: dir,
    }
}
