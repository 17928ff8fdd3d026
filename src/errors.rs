use std::fmt;

use actix_web::http::StatusCode;
use sea_orm::SqlErr;

use crate::domain::Violation;

#[derive(Debug, Clone)]
pub enum CrmError {
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    Integrity(String),
    Validation(Vec<Violation>),
    NotFound(String),
    Unauthorized(String),
    FileOperation(String),
    Attachment(String),
    Serialization(String),
    InvalidQuery(String),
}

impl CrmError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            CrmError::DatabaseConfig(_) => "E001",
            CrmError::DatabaseConnection(_) => "E002",
            CrmError::DatabaseOperation(_) => "E003",
            CrmError::Integrity(_) => "E004",
            CrmError::Validation(_) => "E005",
            CrmError::NotFound(_) => "E006",
            CrmError::Unauthorized(_) => "E007",
            CrmError::FileOperation(_) => "E008",
            CrmError::Attachment(_) => "E009",
            CrmError::Serialization(_) => "E010",
            CrmError::InvalidQuery(_) => "E011",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            CrmError::DatabaseConfig(_) => "Database Configuration Error",
            CrmError::DatabaseConnection(_) => "Database Connection Error",
            CrmError::DatabaseOperation(_) => "Database Operation Error",
            CrmError::Integrity(_) => "Integrity Error",
            CrmError::Validation(_) => "Validation Error",
            CrmError::NotFound(_) => "Resource Not Found",
            CrmError::Unauthorized(_) => "Unauthorized",
            CrmError::FileOperation(_) => "File Operation Error",
            CrmError::Attachment(_) => "Attachment Error",
            CrmError::Serialization(_) => "Serialization Error",
            CrmError::InvalidQuery(_) => "Invalid Query",
        }
    }

    /// 获取错误详情
    ///
    /// 校验错误汇总为一行，逐字段明细见 [`CrmError::violations`]。
    pub fn message(&self) -> String {
        match self {
            CrmError::Validation(violations) => match violations.as_slice() {
                [] => "validation failed".to_string(),
                [only] => format!("{}: {}", only.field, only.message),
                [first, rest @ ..] => format!(
                    "{}: {} (and {} more)",
                    first.field,
                    first.message,
                    rest.len()
                ),
            },
            CrmError::DatabaseConfig(msg)
            | CrmError::DatabaseConnection(msg)
            | CrmError::DatabaseOperation(msg)
            | CrmError::Integrity(msg)
            | CrmError::NotFound(msg)
            | CrmError::Unauthorized(msg)
            | CrmError::FileOperation(msg)
            | CrmError::Attachment(msg)
            | CrmError::Serialization(msg)
            | CrmError::InvalidQuery(msg) => msg.clone(),
        }
    }

    /// 校验错误的字段明细，其它错误为空
    pub fn violations(&self) -> &[Violation] {
        match self {
            CrmError::Validation(violations) => violations,
            _ => &[],
        }
    }

    /// 映射到 HTTP 状态码
    pub fn http_status(&self) -> StatusCode {
        match self {
            CrmError::Validation(_) | CrmError::InvalidQuery(_) | CrmError::Attachment(_) => {
                StatusCode::BAD_REQUEST
            }
            CrmError::Integrity(_) => StatusCode::CONFLICT,
            CrmError::NotFound(_) => StatusCode::NOT_FOUND,
            CrmError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            CrmError::Serialization(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CrmError::DatabaseConfig(_)
            | CrmError::DatabaseConnection(_)
            | CrmError::DatabaseOperation(_)
            | CrmError::FileOperation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 格式化为彩色输出（用于 Server 模式）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出（用于 CLI 模式）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for CrmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CrmError {}

// 便捷的构造函数
impl CrmError {
    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        CrmError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        CrmError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        CrmError::DatabaseOperation(msg.into())
    }

    pub fn integrity<T: Into<String>>(msg: T) -> Self {
        CrmError::Integrity(msg.into())
    }

    pub fn validation(violations: Vec<Violation>) -> Self {
        CrmError::Validation(violations)
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        CrmError::NotFound(msg.into())
    }

    pub fn unauthorized<T: Into<String>>(msg: T) -> Self {
        CrmError::Unauthorized(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        CrmError::FileOperation(msg.into())
    }

    pub fn attachment<T: Into<String>>(msg: T) -> Self {
        CrmError::Attachment(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        CrmError::Serialization(msg.into())
    }

    pub fn invalid_query<T: Into<String>>(msg: T) -> Self {
        CrmError::InvalidQuery(msg.into())
    }
}

// 外键、唯一约束冲突归为 Integrity，其余为数据库操作错误
impl From<sea_orm::DbErr> for CrmError {
    fn from(err: sea_orm::DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::ForeignKeyConstraintViolation(msg)) => {
                CrmError::Integrity(format!("foreign key violation: {}", msg))
            }
            Some(SqlErr::UniqueConstraintViolation(msg)) => {
                CrmError::Integrity(format!("unique constraint violation: {}", msg))
            }
            _ => CrmError::DatabaseOperation(err.to_string()),
        }
    }
}

impl From<std::io::Error> for CrmError {
    fn from(err: std::io::Error) -> Self {
        CrmError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for CrmError {
    fn from(err: serde_json::Error) -> Self {
        CrmError::Serialization(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for CrmError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        CrmError::Unauthorized(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CrmError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ViolationCode;

    fn violation(field: &str) -> Violation {
        Violation::new(field, ViolationCode::Required, "This field is required.")
    }

    #[test]
    fn test_validation_message_summarises_violations() {
        let err = CrmError::validation(vec![violation("phone")]);
        assert_eq!(err.message(), "phone: This field is required.");

        let err = CrmError::validation(vec![violation("phone"), violation("name")]);
        assert_eq!(err.message(), "phone: This field is required. (and 1 more)");
        assert_eq!(err.violations().len(), 2);
    }

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(
            CrmError::validation(vec![]).http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            CrmError::integrity("fk").http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            CrmError::not_found("x").http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            CrmError::unauthorized("x").http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            CrmError::database_operation("x").http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_non_constraint_db_error_is_operation_error() {
        let err: CrmError = sea_orm::DbErr::RecordNotFound("gone".to_string()).into();
        assert!(matches!(err, CrmError::DatabaseOperation(_)));
        assert_eq!(err.code(), "E003");
    }

    #[test]
    fn test_format_simple() {
        let err = CrmError::not_found("deal 7");
        assert_eq!(err.format_simple(), "Resource Not Found: deal 7");
        assert_eq!(err.to_string(), err.format_simple());
    }
}
