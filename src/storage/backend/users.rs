//! 管理员账号的读写

use chrono::Utc;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use tracing::info;

use super::converters::model_to_user;
use super::SeaOrmStorage;
use crate::errors::Result;
use crate::storage::UserAccount;
use migration::entities::user;

impl SeaOrmStorage {
    /// 新建账号，用户名重复时返回 Integrity 错误
    pub async fn create_user(&self, username: &str, password_hash: &str) -> Result<UserAccount> {
        let model = user::ActiveModel {
            id: NotSet,
            username: Set(username.to_string()),
            password_hash: Set(password_hash.to_string()),
            is_active: Set(true),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await?;

        info!("Admin user created: {}", model.username);
        Ok(model_to_user(model))
    }

    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<UserAccount>> {
        let db = &self.db;
        let model = self.retry.run("find_user_by_username", || async {
            user::Entity::find()
                .filter(user::Column::Username.eq(username))
                .one(db)
                .await
        })
        .await?;
        Ok(model.map(model_to_user))
    }

    pub async fn get_user(&self, id: i64) -> Result<Option<UserAccount>> {
        let db = &self.db;
        let model = self.retry.run("get_user", || async {
            user::Entity::find_by_id(id).one(db).await
        })
        .await?;
        Ok(model.map(model_to_user))
    }

    pub async fn list_users(&self) -> Result<Vec<UserAccount>> {
        let models = user::Entity::find()
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_user).collect())
    }
}
