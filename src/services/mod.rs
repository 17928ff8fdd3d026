//! Service layer for business logic
//!
//! HTTP 处理器和 CLI 共用的业务逻辑。

pub mod attachments;
pub mod auth;
mod repository;

use std::sync::Arc;

pub use attachments::{AttachmentStore, AttachmentTarget};
pub use auth::{AuthService, LoginResult};
pub use repository::{Paging, Repository};

use crate::admin::AdminSite;
use crate::api::jwt::JwtService;
use crate::config::{IntegrityConfig, StaticConfig};
use crate::errors::{CrmError, Result};
use crate::storage::{SeaOrmStorage, StoredRecord};

/// 请求处理共享的服务集合
#[derive(Clone)]
pub struct AppServices {
    pub storage: Arc<SeaOrmStorage>,
    pub site: Arc<AdminSite>,
    pub auth: AuthService,
    pub attachments: AttachmentStore,
    integrity: IntegrityConfig,
    paging: Paging,
}

impl AppServices {
    pub fn new(
        storage: Arc<SeaOrmStorage>,
        site: Arc<AdminSite>,
        jwt: Arc<JwtService>,
        config: &StaticConfig,
    ) -> Self {
        Self {
            auth: AuthService::new(Arc::clone(&storage), jwt),
            attachments: AttachmentStore::from_config(&config.media),
            integrity: config.integrity,
            paging: Paging {
                default_page_size: config.admin.default_page_size,
                max_page_size: config.admin.max_page_size,
            },
            storage,
            site,
        }
    }

    /// 某一记录类型的仓储，类型未在站点注册时返回 NotFound
    pub fn repository<R: StoredRecord>(&self) -> Result<Repository<R>> {
        let admin = self
            .site
            .get(R::KIND)
            .ok_or_else(|| CrmError::not_found(format!("{} is not registered", R::KIND)))?;
        let store = Arc::clone(&self.storage);
        Ok(Repository::<R>::new(store, admin, self.integrity).with_paging(self.paging))
    }
}
