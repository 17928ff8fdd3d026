//! 可复用的字段组
//!
//! 具体记录通过 `#[serde(flatten)]` 嵌入这些结构体，
//! 每个混入自带字段声明和校验。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::choices::{Choice, LeadSource};
use super::kind::EntityKind;
use super::record::{FieldKind, FieldSpec};
use super::validation::{Checker, ViolationCode};

pub const NAME_MAX: usize = 255;

/// 审计戳：创建人/时间、最后修改人/时间
///
/// 只读。客户端提交的值会在保存时被覆盖。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditStamp {
    pub created_by: Option<i64>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_by: Option<i64>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl AuditStamp {
    pub const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("created_by", "Created by", FieldKind::User),
        FieldSpec::new("created_at", "Created at", FieldKind::DateTime),
        FieldSpec::new("updated_by", "Updated by", FieldKind::User),
        FieldSpec::new("updated_at", "Updated at", FieldKind::DateTime),
    ];

    pub const FIELD_NAMES: [&'static str; 4] =
        ["created_by", "created_at", "updated_by", "updated_at"];
}

/// 描述，允许为空
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Desc {
    pub desc: String,
}

impl Desc {
    pub const FIELDS: &'static [FieldSpec] =
        &[FieldSpec::new("desc", "Description", FieldKind::LongText)];
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Named {
    pub name: String,
}

impl Named {
    pub const FIELDS: &'static [FieldSpec] = &[FieldSpec::new("name", "Name", FieldKind::Text)
        .required()
        .max_length(NAME_MAX)];

    pub fn check(&self, c: &mut Checker) {
        c.text("name", &self.name, NAME_MAX);
    }
}

/// 负责人（用户 id）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Responsible {
    pub responsible: Option<i64>,
}

impl Responsible {
    pub const FIELDS: &'static [FieldSpec] =
        &[FieldSpec::new("responsible", "Responsible", FieldKind::User)];
}

/// 地址集合及主地址
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeoDestination {
    pub addresses: Vec<i64>,
    pub primary_address: Option<i64>,
}

impl GeoDestination {
    pub const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new(
            "addresses",
            "Addresses",
            FieldKind::ReferenceSet {
                to: EntityKind::Address,
            },
        ),
        FieldSpec::new(
            "primary_address",
            "Primary address",
            FieldKind::Reference {
                to: EntityKind::Address,
            },
        ),
    ];

    pub fn check_membership(&self, c: &mut Checker) {
        if let Some(primary) = self.primary_address
            && !self.addresses.contains(&primary)
        {
            c.push(
                "primary_address",
                ViolationCode::NotMember,
                format!("Address {} is not one of this record's addresses.", primary),
            );
        }
    }

    /// 去重并保持提交顺序
    pub fn normalize(&mut self) {
        dedup_ids(&mut self.addresses);
    }
}

/// 邮箱集合及主邮箱
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailDestination {
    pub emails: Vec<i64>,
    pub primary_email: Option<i64>,
}

impl EmailDestination {
    pub const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new(
            "emails",
            "Emails",
            FieldKind::ReferenceSet {
                to: EntityKind::EmailContact,
            },
        ),
        FieldSpec::new(
            "primary_email",
            "Primary email",
            FieldKind::Reference {
                to: EntityKind::EmailContact,
            },
        ),
    ];

    pub fn check_membership(&self, c: &mut Checker) {
        if let Some(primary) = self.primary_email
            && !self.emails.contains(&primary)
        {
            c.push(
                "primary_email",
                ViolationCode::NotMember,
                format!("Email {} is not one of this record's emails.", primary),
            );
        }
    }

    pub fn normalize(&mut self) {
        dedup_ids(&mut self.emails);
    }
}

/// 线索来源
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WithSrc {
    pub source: Option<Choice<LeadSource>>,
}

impl WithSrc {
    pub const FIELDS: &'static [FieldSpec] = &[FieldSpec::new(
        "source",
        "Lead source",
        FieldKind::Choice {
            choices: <LeadSource as strum::VariantNames>::VARIANTS,
        },
    )];

    pub fn check(&self, c: &mut Checker) {
        c.choice_opt("source", &self.source);
    }
}

fn dedup_ids(ids: &mut Vec<i64>) {
    let mut seen = std::collections::HashSet::new();
    ids.retain(|id| seen.insert(*id));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership_checks() {
        let geo = GeoDestination {
            addresses: vec![1, 2],
            primary_address: Some(3),
        };
        let emails = EmailDestination {
            emails: vec![],
            primary_email: None,
        };
        let mut c = Checker::new();
        geo.check_membership(&mut c);
        emails.check_membership(&mut c);
        let out = c.finish();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].field, "primary_address");
        assert_eq!(out[0].code, ViolationCode::NotMember);
    }

    #[test]
    fn test_normalize_dedups_in_order() {
        let mut geo = GeoDestination {
            addresses: vec![3, 1, 3, 2, 1],
            primary_address: None,
        };
        geo.normalize();
        assert_eq!(geo.addresses, vec![3, 1, 2]);
    }

    #[test]
    fn test_audit_stamp_accepts_partial_input() {
        let stamp: AuditStamp = serde_json::from_str(r#"{"created_by": 9}"#).unwrap();
        assert_eq!(stamp.created_by, Some(9));
        assert!(stamp.updated_at.is_none());
    }
}
