use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::AdminConfig;
use crate::domain::ActingUser;

/// Access Token Claims
///
/// `sub` 是用户 id 的字符串形式，`username` 随 token 携带，
/// 中间件据此还原 [`ActingUser`]，不查库。
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: String,
    pub username: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
    pub token_type: String,
}

impl AccessClaims {
    pub fn acting_user(&self) -> Option<ActingUser> {
        let id = self.sub.parse::<i64>().ok()?;
        Some(ActingUser::new(id, self.username.clone()))
    }
}

/// JWT Service for generating and validating tokens
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_minutes: u64,
}

impl JwtService {
    pub fn new(secret: &str, access_token_minutes: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_minutes,
        }
    }

    /// Create JwtService from config
    pub fn from_config(config: &AdminConfig) -> Self {
        // 获取 JWT secret，如果为空则生成一个安全的随机值
        let jwt_secret = if config.jwt_secret.is_empty() {
            warn!("JWT secret not configured or empty, generating secure random token");
            crate::utils::generate_secure_token(32)
        } else {
            config.jwt_secret.clone()
        };

        Self::new(&jwt_secret, config.access_token_minutes)
    }

    /// token 有效期（秒）
    pub fn expires_in(&self) -> i64 {
        self.access_token_minutes as i64 * 60
    }

    /// Generate Access Token
    pub fn generate_access_token(
        &self,
        user: &ActingUser,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = AccessClaims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(self.access_token_minutes as i64)).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
            token_type: "access".to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
    }

    /// Validate Access Token
    pub fn validate_access_token(
        &self,
        token: &str,
    ) -> Result<AccessClaims, jsonwebtoken::errors::Error> {
        let token_data = decode::<AccessClaims>(token, &self.decoding_key, &Validation::default())?;

        // Verify token type
        if token_data.claims.token_type != "access" {
            return Err(jsonwebtoken::errors::Error::from(
                jsonwebtoken::errors::ErrorKind::InvalidToken,
            ));
        }

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_service() -> JwtService {
        JwtService::new("test_secret_key_32_bytes_long!!", 15)
    }

    fn alice() -> ActingUser {
        ActingUser::new(7, "alice")
    }

    #[test]
    fn test_generate_and_validate_access_token() {
        let service = create_test_service();
        let token = service.generate_access_token(&alice()).unwrap();
        let claims = service.validate_access_token(&token).unwrap();

        assert_eq!(claims.sub, "7");
        assert_eq!(claims.token_type, "access");
        assert!(claims.exp > claims.iat);
        assert_eq!(claims.acting_user(), Some(alice()));
        assert_eq!(service.expires_in(), 15 * 60);
    }

    #[test]
    fn test_non_numeric_subject_has_no_acting_user() {
        let claims = AccessClaims {
            sub: "admin".to_string(),
            username: "admin".to_string(),
            iat: 0,
            exp: 0,
            jti: String::new(),
            token_type: "access".to_string(),
        };
        assert_eq!(claims.acting_user(), None);
    }

    #[test]
    fn test_invalid_token_rejected() {
        let service = create_test_service();

        let result = service.validate_access_token("invalid.token.here");
        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let service1 = create_test_service();
        let service2 = JwtService::new("different_secret_key_32_bytes!!", 15);

        let token = service1.generate_access_token(&alice()).unwrap();
        let result = service2.validate_access_token(&token);
        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_token_type_rejected() {
        let service = create_test_service();
        let now = Utc::now();
        let claims = AccessClaims {
            sub: "7".to_string(),
            username: "alice".to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(5)).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
            token_type: "refresh".to_string(),
        };
        let key = EncodingKey::from_secret(b"test_secret_key_32_bytes_long!!");
        let token = encode(&Header::default(), &claims, &key).unwrap();

        assert!(service.validate_access_token(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        // 手动创建一个已过期的 token
        let service = create_test_service();

        // 创建一个过期时间在更久之前的 claims（超过默认 leeway）
        let now = chrono::Utc::now();
        let claims = AccessClaims {
            sub: "7".to_string(),
            username: "alice".to_string(),
            iat: (now - chrono::Duration::hours(2)).timestamp(),
            exp: (now - chrono::Duration::hours(1)).timestamp(), // 1 小时前过期
            jti: uuid::Uuid::new_v4().to_string(),
            token_type: "access".to_string(),
        };

        let encoding_key =
            jsonwebtoken::EncodingKey::from_secret(b"test_secret_key_32_bytes_long!!");
        let token =
            jsonwebtoken::encode(&jsonwebtoken::Header::default(), &claims, &encoding_key).unwrap();

        let result = service.validate_access_token(&token);
        assert!(
            result.is_err(),
            "Expected expired token to be rejected, but got: {:?}",
            result.map(|c| c.sub)
        );
    }
}
