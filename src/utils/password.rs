//! 管理员密码哈希
//!
//! Argon2id，PHC 字符串格式存储

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug)]
pub enum PasswordError {
    TooShort(usize),
    HashError(String),
    VerifyError(String),
}

impl std::fmt::Display for PasswordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooShort(min) => write!(f, "Password must be at least {} characters", min),
            Self::HashError(msg) => write!(f, "Password hash error: {}", msg),
            Self::VerifyError(msg) => write!(f, "Password verify error: {}", msg),
        }
    }
}

impl std::error::Error for PasswordError {}

pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(PasswordError::TooShort(MIN_PASSWORD_LEN));
    }
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::HashError(e.to_string()))
}

/// 哈希格式损坏时返回错误，密码不匹配返回 `Ok(false)`
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| PasswordError::VerifyError(e.to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("correct horse").expect("hash should succeed");

        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct horse", &hash).expect("verify should succeed"));
        assert!(!verify_password("wrong horse", &hash).expect("verify should succeed"));
    }

    #[test]
    fn test_short_password_rejected() {
        assert!(matches!(
            hash_password("short"),
            Err(PasswordError::TooShort(MIN_PASSWORD_LEN))
        ));
    }

    #[test]
    fn test_corrupt_hash_is_error() {
        assert!(verify_password("whatever1", "not-a-hash").is_err());
    }
}
