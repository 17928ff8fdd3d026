use serde::{Deserialize, Serialize};

/// 当前操作者：每个写操作都显式携带，用于审计盖章
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActingUser {
    pub id: i64,
    pub username: String,
}

impl ActingUser {
    pub fn new(id: i64, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
        }
    }
}
