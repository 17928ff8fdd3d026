//! 统一 API 错误码定义

use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::errors::CrmError;

/// API 错误码枚举
///
/// 使用 serde_repr 序列化为数字。
/// 按千位分域：
/// - 0: 成功
/// - 1000-1099: 通用错误
/// - 2000-2099: 认证错误
/// - 3000-3099: 记录错误
/// - 4000-4099: 附件错误
/// - 5000-5099: 数据库错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(i32)]
pub enum ErrorCode {
    // 成功
    Success = 0,

    // 通用错误 1000-1099
    BadRequest = 1000,
    Unauthorized = 1001,
    NotFound = 1004,
    InternalServerError = 1005,
    InvalidQuery = 1012,
    InvalidBody = 1013,

    // 认证错误 2000-2099
    AuthFailed = 2000,

    // 记录错误 3000-3099
    ValidationFailed = 3000,
    IntegrityViolation = 3001,
    UnknownKind = 3002,

    // 附件错误 4000-4099
    AttachmentRejected = 4000,
    InvalidMultipartData = 4002,
    FileWriteError = 4003,

    // 数据库错误 5000-5099
    DatabaseError = 5000,
    DatabaseUnavailable = 5001,
}

impl From<&CrmError> for ErrorCode {
    fn from(err: &CrmError) -> Self {
        match err {
            CrmError::Validation(_) => ErrorCode::ValidationFailed,
            CrmError::Integrity(_) => ErrorCode::IntegrityViolation,
            CrmError::NotFound(_) => ErrorCode::NotFound,
            CrmError::Unauthorized(_) => ErrorCode::AuthFailed,
            CrmError::InvalidQuery(_) => ErrorCode::InvalidQuery,
            CrmError::Serialization(_) => ErrorCode::InvalidBody,
            CrmError::Attachment(_) => ErrorCode::AttachmentRejected,
            CrmError::FileOperation(_) => ErrorCode::FileWriteError,
            CrmError::DatabaseConnection(_) => ErrorCode::DatabaseUnavailable,
            CrmError::DatabaseConfig(_) | CrmError::DatabaseOperation(_) => {
                ErrorCode::DatabaseError
            }
        }
    }
}
