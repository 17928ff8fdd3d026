//! 记录的声明式字段描述与 [`Record`] trait

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::kind::EntityKind;
use super::mixins::AuditStamp;
use super::validation::{Validate, Violation};

/// 字段类型（用于 schema 输出和管理配置检查）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    LongText,
    Integer,
    Decimal,
    Boolean,
    Date,
    DateTime,
    Email,
    Url,
    Choice { choices: &'static [&'static str] },
    Reference { to: EntityKind },
    ReferenceSet { to: EntityKind },
    User,
    File { upload_to: &'static str },
    Related,
}

/// 单个字段的声明
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    #[serde(flatten)]
    pub kind: FieldKind,
    pub required: bool,
    pub max_length: Option<usize>,
}

impl FieldSpec {
    pub const fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: false,
            max_length: None,
        }
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }
}

/// 可由通用仓储和管理界面处理的记录
pub trait Record: Validate + Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    const KIND: EntityKind;

    /// 自引用层级（Contractor.parent、Contact.head）所在的表
    const HIERARCHY: Option<EntityKind> = None;

    /// 指向父节点的字段名
    const HIERARCHY_FIELD: &'static str = "parent";

    /// 全部字段，包含混入的字段和审计字段
    fn fields() -> Vec<FieldSpec>;

    fn id(&self) -> Option<i64>;

    fn set_id(&mut self, id: i64);

    /// 新建时忽略客户端提交的 id
    fn clear_id(&mut self);

    fn audit(&self) -> &AuditStamp;

    fn audit_mut(&mut self) -> &mut AuditStamp;

    /// 人类可读的名称
    fn display(&self) -> String;

    fn hierarchy_parent(&self) -> Option<i64> {
        None
    }

    /// 保存前整理提交的数据（如集合去重）
    fn normalize(&mut self) {}

    /// primary_* 指针是否落在对应集合中
    fn membership_violations(&self) -> Vec<Violation> {
        Vec::new()
    }

    fn has_field(name: &str) -> bool {
        Self::fields().iter().any(|f| f.name == name)
    }
}

/// 为直接嵌入混入的记录生成 Record 的样板方法
macro_rules! record_basics {
    () => {
        fn id(&self) -> Option<i64> {
            self.id
        }

        fn set_id(&mut self, id: i64) {
            self.id = Some(id);
        }

        fn clear_id(&mut self) {
            self.id = None;
        }

        fn audit(&self) -> &$crate::domain::AuditStamp {
            &self.audit
        }

        fn audit_mut(&mut self) -> &mut $crate::domain::AuditStamp {
            &mut self.audit
        }
    };
}

pub(crate) use record_basics;
