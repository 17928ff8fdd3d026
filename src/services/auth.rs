//! 管理员账号与登录

use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::api::jwt::JwtService;
use crate::domain::{ActingUser, Violation, ViolationCode};
use crate::errors::{CrmError, Result};
use crate::storage::{SeaOrmStorage, UserSummary};
use crate::utils::password::{PasswordError, hash_password, verify_password};

const USERNAME_MAX: usize = 150;

/// 登录成功的结果
#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    pub token: String,
    pub expires_in: i64,
    pub user: ActingUser,
}

#[derive(Clone)]
pub struct AuthService {
    storage: Arc<SeaOrmStorage>,
    jwt: Arc<JwtService>,
}

impl AuthService {
    pub fn new(storage: Arc<SeaOrmStorage>, jwt: Arc<JwtService>) -> Self {
        Self { storage, jwt }
    }

    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }

    /// 用户名或密码错误、账号停用都返回同样的 Unauthorized
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResult> {
        let denied = || CrmError::unauthorized("Invalid username or password");

        let Some(account) = self.storage.find_user_by_username(username.trim()).await? else {
            warn!("Login failed: unknown user '{}'", username);
            return Err(denied());
        };
        if !account.is_active {
            warn!("Login failed: user '{}' is inactive", account.username);
            return Err(denied());
        }

        match verify_password(password, &account.password_hash) {
            Ok(true) => {}
            Ok(false) => {
                warn!("Login failed: wrong password for '{}'", account.username);
                return Err(denied());
            }
            Err(e) => {
                error!("Stored password hash for '{}' is unreadable: {}", account.username, e);
                return Err(denied());
            }
        }

        let user = ActingUser::new(account.id, account.username);
        let token = self.jwt.generate_access_token(&user).map_err(|e| {
            error!("Failed to generate access token: {}", e);
            CrmError::unauthorized("Failed to issue token")
        })?;

        info!("Admin login successful: {}", user.username);
        Ok(LoginResult {
            token,
            expires_in: self.jwt.expires_in(),
            user,
        })
    }

    pub async fn create_user(&self, username: &str, password: &str) -> Result<UserSummary> {
        create_user(&self.storage, username, password).await
    }
}

/// 新建管理员账号（CLI 和服务共用，不需要 JWT）
pub async fn create_user(
    storage: &SeaOrmStorage,
    username: &str,
    password: &str,
) -> Result<UserSummary> {
    let username = username.trim();
    let mut violations = Vec::new();
    if username.is_empty() {
        violations.push(Violation::new(
            "username",
            ViolationCode::Required,
            "This field is required.",
        ));
    } else if username.chars().count() > USERNAME_MAX {
        violations.push(Violation::new(
            "username",
            ViolationCode::MaxLength,
            format!("Ensure this value has at most {} characters.", USERNAME_MAX),
        ));
    }

    let hash = match hash_password(password) {
        Ok(hash) => Some(hash),
        Err(PasswordError::TooShort(min)) => {
            violations.push(Violation::new(
                "password",
                ViolationCode::OutOfRange,
                format!("Password must be at least {} characters.", min),
            ));
            None
        }
        Err(e) => return Err(CrmError::database_operation(e.to_string())),
    };

    match hash {
        Some(hash) if violations.is_empty() => {
            let account = storage.create_user(username, &hash).await?;
            Ok(UserSummary::from(&account))
        }
        _ => Err(CrmError::validation(violations)),
    }
}
