use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::domain::{ActingUser, Violation};
use crate::errors::{CrmError, Result};
use crate::storage::ListQuery;

/// 统一响应信封
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct AuthSuccessResponse {
    pub token: String,
    pub expires_in: i64,
    pub user: ActingUser,
}

/// dry-run 校验结果
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ValidationReport {
    pub valid: bool,
    pub violations: Vec<Violation>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct UploadResponse {
    /// 写入记录 `attach` 字段的相对路径
    pub path: String,
    pub size: usize,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub backend: String,
    pub database: String,
    pub response_time_ms: u32,
}

fn parse_number(name: &str, value: &str) -> Result<u64> {
    value.trim().parse::<u64>().map_err(|_| {
        CrmError::invalid_query(format!("'{}' must be a positive integer, got '{}'", name, value))
    })
}

/// 把查询字符串转换为 [`ListQuery`]
///
/// `search`、`page`、`page_size` 之外的参数都视为过滤器。
/// 分页参数在仓储中按配置收敛，这里只做类型转换。
pub fn list_query_from_params(params: HashMap<String, String>) -> Result<ListQuery> {
    let mut query = ListQuery::default();
    let mut filters = BTreeMap::new();
    for (name, value) in params {
        match name.as_str() {
            "search" => query.search = Some(value),
            "page" => query.page = parse_number("page", &value)?,
            "page_size" => query.page_size = parse_number("page_size", &value)?,
            _ => {
                filters.insert(name, value);
            }
        }
    }
    query.filters = filters;
    Ok(query)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_list_query_splits_reserved_params_and_filters() {
        let query = list_query_from_params(params(&[
            ("search", "acme"),
            ("page", "2"),
            ("page_size", "50"),
            ("stage", "proposal"),
            ("contractor", "none"),
        ]))
        .unwrap();
        assert_eq!(query.search.as_deref(), Some("acme"));
        assert_eq!((query.page, query.page_size), (2, 50));
        assert_eq!(query.filters.len(), 2);
        assert_eq!(query.filters["stage"], "proposal");
    }

    #[test]
    fn test_list_query_rejects_bad_numbers() {
        let err = list_query_from_params(params(&[("page", "-1")])).unwrap_err();
        assert!(matches!(err, CrmError::InvalidQuery(_)));
    }

    #[test]
    fn test_envelope_omits_missing_data() {
        let response = ApiResponse::<()> {
            code: 1004,
            message: "not found".into(),
            data: None,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json, serde_json::json!({"code": 1004, "message": "not found"}));
    }
}
