//! 单个记录类型的管理界面配置
//!
//! 配置是纯数据：字段分组、只读字段、搜索/过滤/列表列和索引可见性。
//! 前端按 `GET /v1/schema/{kind}` 返回的内容渲染表单和列表。

use serde::Serialize;

use crate::domain::{ActingUser, AuditStamp, EntityKind, FieldSpec, Record};
use crate::storage::StoredRecord;

/// 列表列可以额外使用的伪字段
pub const ID_COLUMN: &str = "id";

/// 表单中的一组字段
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fieldset {
    pub label: Option<&'static str>,
    pub fields: Vec<&'static str>,
}

impl Fieldset {
    pub fn new(label: &'static str, fields: &[&'static str]) -> Self {
        Self {
            label: Some(label),
            fields: fields.to_vec(),
        }
    }

    pub fn untitled(fields: &[&'static str]) -> Self {
        Self {
            label: None,
            fields: fields.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelAdmin {
    pub kind: EntityKind,
    pub verbose_name: &'static str,
    pub verbose_name_plural: &'static str,
    pub fields: Vec<FieldSpec>,
    pub fieldsets: Vec<Fieldset>,
    pub readonly_fields: Vec<&'static str>,
    pub search_fields: Vec<&'static str>,
    pub list_filter: Vec<&'static str>,
    pub list_display: Vec<&'static str>,
    pub show_in_index: bool,
    /// 存储层实际支持的过滤器和搜索列，用于 [`ModelAdmin::check`]
    #[serde(skip)]
    supported_filters: Vec<&'static str>,
    #[serde(skip)]
    supported_search: Vec<&'static str>,
}

impl ModelAdmin {
    /// 以存储层支持的搜索列和过滤器为默认值构造配置
    ///
    /// 默认字段分组：非审计字段一组，审计字段单独一组，审计字段只读。
    pub fn new<R: StoredRecord>(verbose_name: &'static str, verbose_name_plural: &'static str) -> Self {
        let fields = R::fields();
        let editable: Vec<&'static str> = fields
            .iter()
            .map(|f| f.name)
            .filter(|name| !AuditStamp::FIELD_NAMES.contains(name))
            .collect();
        let list_display = std::iter::once(ID_COLUMN)
            .chain(editable.iter().copied().take(2))
            .chain(std::iter::once("updated_at"))
            .collect();
        let supported_filters: Vec<&'static str> = R::FILTERS.iter().map(|f| f.name).collect();

        Self {
            kind: R::KIND,
            verbose_name,
            verbose_name_plural,
            fieldsets: vec![
                Fieldset::untitled(&editable),
                Fieldset::new("Audit", &AuditStamp::FIELD_NAMES),
            ],
            readonly_fields: AuditStamp::FIELD_NAMES.to_vec(),
            search_fields: R::SEARCH_FIELDS.to_vec(),
            list_filter: supported_filters.clone(),
            list_display,
            show_in_index: true,
            fields,
            supported_filters,
            supported_search: R::SEARCH_FIELDS.to_vec(),
        }
    }

    /// 替换表单分组，审计分组始终追加在最后
    pub fn fieldsets(mut self, fieldsets: Vec<Fieldset>) -> Self {
        self.fieldsets = fieldsets;
        self.fieldsets
            .push(Fieldset::new("Audit", &AuditStamp::FIELD_NAMES));
        self
    }

    pub fn list_display(mut self, columns: &[&'static str]) -> Self {
        self.list_display = columns.to_vec();
        self
    }

    pub fn search_fields(mut self, fields: &[&'static str]) -> Self {
        self.search_fields = fields.to_vec();
        self
    }

    pub fn list_filter(mut self, filters: &[&'static str]) -> Self {
        self.list_filter = filters.to_vec();
        self
    }

    /// 额外的只读字段，审计字段总是只读
    pub fn readonly(mut self, fields: &[&'static str]) -> Self {
        for field in fields {
            if !self.readonly_fields.contains(field) {
                self.readonly_fields.push(field);
            }
        }
        self
    }

    /// 注册但不在管理首页显示
    pub fn hidden(mut self) -> Self {
        self.show_in_index = false;
        self
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }

    /// 检查配置引用的字段都存在，过滤器和搜索列都被存储层支持
    pub fn check(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let mut unknown = |section: &str, name: &str| {
            problems.push(format!(
                "{}: {} references unknown field '{}'",
                self.kind, section, name
            ));
        };

        for fieldset in &self.fieldsets {
            for name in &fieldset.fields {
                if !self.has_field(name) {
                    unknown("fieldsets", name);
                }
            }
        }
        for name in &self.readonly_fields {
            if !self.has_field(name) {
                unknown("readonly_fields", name);
            }
        }
        for name in &self.list_display {
            if *name != ID_COLUMN && !self.has_field(name) {
                unknown("list_display", name);
            }
        }
        for name in &self.search_fields {
            if !self.has_field(name) {
                unknown("search_fields", name);
            }
        }

        for name in &self.search_fields {
            if !self.supported_search.contains(name) {
                problems.push(format!(
                    "{}: search field '{}' is not searchable by the store",
                    self.kind, name
                ));
            }
        }
        for name in &self.list_filter {
            if !self.supported_filters.contains(name) {
                problems.push(format!(
                    "{}: list filter '{}' is not supported by the store",
                    self.kind, name
                ));
            }
        }
        for name in AuditStamp::FIELD_NAMES {
            if !self.readonly_fields.contains(&name) {
                problems.push(format!("{}: audit field '{}' must be readonly", self.kind, name));
            }
        }
        problems
    }

    /// 保存前的审计盖章
    ///
    /// 新记录（无 id）写入 created_by，任何保存都写入 updated_by。
    /// 客户端提交的时间戳被清空，由存储层填写。
    pub fn save_model<R: Record>(&self, user: &ActingUser, record: &mut R) {
        debug_assert_eq!(self.kind, R::KIND);
        let is_new = record.id().is_none();
        let audit = record.audit_mut();
        if is_new {
            audit.created_by = Some(user.id);
        }
        audit.updated_by = Some(user.id);
        audit.created_at = None;
        audit.updated_at = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Contractor, Deal, EmailContact};

    #[test]
    fn test_default_config_passes_check() {
        let admin = ModelAdmin::new::<Deal>("deal", "deals");
        assert!(admin.check().is_empty(), "{:?}", admin.check());
        assert_eq!(admin.list_display.first(), Some(&ID_COLUMN));
        assert_eq!(admin.fieldsets.last().map(|f| f.label), Some(Some("Audit")));
        for name in AuditStamp::FIELD_NAMES {
            assert!(admin.readonly_fields.contains(&name));
        }
    }

    #[test]
    fn test_check_reports_unknown_fields_and_filters() {
        let admin = ModelAdmin::new::<Contractor>("contractor", "contractors")
            .list_display(&["name", "turnover"])
            .list_filter(&["industry", "country"])
            .search_fields(&["name", "desc"]);
        let problems = admin.check();
        assert!(problems.iter().any(|p| p.contains("'turnover'")));
        assert!(problems.iter().any(|p| p.contains("list filter 'country'")));
        assert!(problems.iter().any(|p| p.contains("search field 'desc'")));
        assert_eq!(problems.len(), 3);
    }

    #[test]
    fn test_fieldsets_keep_audit_group() {
        let admin = ModelAdmin::new::<EmailContact>("email", "emails")
            .fieldsets(vec![Fieldset::untitled(&["email", "do_not_contact", "invalid"])])
            .hidden();
        assert_eq!(admin.fieldsets.len(), 2);
        assert!(!admin.show_in_index);
        assert!(admin.check().is_empty());
    }

    #[test]
    fn test_save_model_stamps_new_and_existing_records() {
        let admin = ModelAdmin::new::<EmailContact>("email", "emails");
        let alice = ActingUser::new(1, "alice");
        let bob = ActingUser::new(2, "bob");

        let mut record = EmailContact {
            email: "a@example.com".into(),
            ..Default::default()
        };
        record.audit.created_at = Some(chrono::Utc::now());
        admin.save_model(&alice, &mut record);
        assert_eq!(record.audit.created_by, Some(1));
        assert_eq!(record.audit.updated_by, Some(1));
        assert_eq!(record.audit.created_at, None);

        record.set_id(10);
        record.audit.created_by = Some(1);
        admin.save_model(&bob, &mut record);
        assert_eq!(record.audit.created_by, Some(1));
        assert_eq!(record.audit.updated_by, Some(2));
    }
}
