//! 记录类型标识与多态关联

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString, VariantNames};

use super::choices::Choice;
use super::validation::Checker;

/// 所有可管理的记录类型，字符串形式即 URL 中的 slug
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumString,
    AsRefStr,
    VariantNames,
    EnumIter,
)]
pub enum EntityKind {
    #[serde(rename = "addresses")]
    #[strum(serialize = "addresses")]
    Address,
    #[serde(rename = "emails")]
    #[strum(serialize = "emails")]
    EmailContact,
    #[serde(rename = "contractors")]
    #[strum(serialize = "contractors")]
    Contractor,
    #[serde(rename = "contacts")]
    #[strum(serialize = "contacts")]
    Contact,
    #[serde(rename = "preliminary-contacts")]
    #[strum(serialize = "preliminary-contacts")]
    PreliminaryContact,
    #[serde(rename = "campaigns")]
    #[strum(serialize = "campaigns")]
    MarketingCampaign,
    #[serde(rename = "deals")]
    #[strum(serialize = "deals")]
    Deal,
    #[serde(rename = "circulations")]
    #[strum(serialize = "circulations")]
    Circulation,
    #[serde(rename = "phone-calls")]
    #[strum(serialize = "phone-calls")]
    PhoneCall,
    #[serde(rename = "meetings")]
    #[strum(serialize = "meetings")]
    Meeting,
    #[serde(rename = "tasks")]
    #[strum(serialize = "tasks")]
    Task,
    #[serde(rename = "notes")]
    #[strum(serialize = "notes")]
    Note,
    #[serde(rename = "documents")]
    #[strum(serialize = "documents")]
    Document,
    #[serde(rename = "projects")]
    #[strum(serialize = "projects")]
    Project,
}

impl EntityKind {
    pub fn slug(&self) -> &'static str {
        match self {
            EntityKind::Address => "addresses",
            EntityKind::EmailContact => "emails",
            EntityKind::Contractor => "contractors",
            EntityKind::Contact => "contacts",
            EntityKind::PreliminaryContact => "preliminary-contacts",
            EntityKind::MarketingCampaign => "campaigns",
            EntityKind::Deal => "deals",
            EntityKind::Circulation => "circulations",
            EntityKind::PhoneCall => "phone-calls",
            EntityKind::Meeting => "meetings",
            EntityKind::Task => "tasks",
            EntityKind::Note => "notes",
            EntityKind::Document => "documents",
            EntityKind::Project => "projects",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

/// 多态关联：指向任意类型的一条记录
///
/// 库中存为 related_kind / related_id 两列，不建外键。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedTo {
    pub kind: Choice<EntityKind>,
    pub id: i64,
}

impl RelatedTo {
    pub fn new(kind: EntityKind, id: i64) -> Self {
        Self {
            kind: Choice::new(kind),
            id,
        }
    }

    pub fn check(related: &Option<RelatedTo>, c: &mut Checker) {
        if let Some(related) = related {
            c.choice("related_to.kind", &related.kind);
            c.range("related_to.id", Some(related.id), 1, i64::MAX);
        }
    }

    /// 拆成两列
    pub fn to_columns(related: &Option<RelatedTo>) -> (Option<String>, Option<i64>) {
        match related {
            Some(r) => (Some(r.kind.raw().to_string()), Some(r.id)),
            None => (None, None),
        }
    }

    /// 从两列还原，任一列为空视为无关联
    pub fn from_columns(kind: Option<String>, id: Option<i64>) -> Option<RelatedTo> {
        match (kind, id) {
            (Some(kind), Some(id)) => Some(RelatedTo {
                kind: Choice::from(kind),
                id,
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_slug_matches_strum_form() {
        for kind in EntityKind::iter() {
            assert_eq!(kind.slug(), kind.as_ref());
            assert_eq!(kind.slug().parse::<EntityKind>(), Ok(kind));
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.slug()));
        }
        assert_eq!(EntityKind::VARIANTS.len(), 14);
    }

    #[test]
    fn test_related_columns_round_trip() {
        let related = Some(RelatedTo::new(EntityKind::Deal, 42));
        let (kind, id) = RelatedTo::to_columns(&related);
        assert_eq!(kind.as_deref(), Some("deals"));
        assert_eq!(RelatedTo::from_columns(kind, id), related);
        assert_eq!(RelatedTo::from_columns(Some("deals".into()), None), None);
    }

    #[test]
    fn test_related_check_rejects_unknown_kind() {
        let mut c = Checker::new();
        RelatedTo::check(
            &Some(RelatedTo {
                kind: Choice::from("invoices"),
                id: 1,
            }),
            &mut c,
        );
        let out = c.finish();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].field, "related_to.kind");
    }
}
