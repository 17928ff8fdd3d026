//! 客户单位、联系人、潜在联系人

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::VariantNames;

use super::choices::{Choice, ContractorKind, Industry, PreliminaryStatus, Rating, Salutation};
use super::kind::EntityKind;
use super::mixins::{
    AuditStamp, Desc, EmailDestination, GeoDestination, Named, Responsible, WithSrc,
};
use super::record::{FieldKind, FieldSpec, Record, record_basics};
use super::validation::{Checker, Validate, Violation};

pub const PHONE_MAX: usize = 128;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contractor {
    pub id: Option<i64>,
    #[serde(flatten)]
    pub named: Named,
    #[serde(flatten)]
    pub desc: Desc,
    pub phone: String,
    pub fax: Option<String>,
    pub website: Option<String>,
    pub industry: Option<Choice<Industry>>,
    pub annual_revenue: Option<f64>,
    pub employees: Option<i32>,
    pub rating: Option<Choice<Rating>>,
    pub kind: Option<Choice<ContractorKind>>,
    pub parent: Option<i64>,
    pub campaign: Option<i64>,
    #[serde(flatten)]
    pub responsible: Responsible,
    #[serde(flatten)]
    pub geo: GeoDestination,
    #[serde(flatten)]
    pub email: EmailDestination,
    #[serde(flatten)]
    pub src: WithSrc,
    #[serde(flatten)]
    pub audit: AuditStamp,
}

const CONTRACTOR_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("phone", "Phone", FieldKind::Text)
        .required()
        .max_length(PHONE_MAX),
    FieldSpec::new("fax", "Fax", FieldKind::Text).max_length(PHONE_MAX),
    FieldSpec::new("website", "Website", FieldKind::Url),
    FieldSpec::new(
        "industry",
        "Industry",
        FieldKind::Choice {
            choices: Industry::VARIANTS,
        },
    ),
    FieldSpec::new("annual_revenue", "Annual revenue", FieldKind::Decimal),
    FieldSpec::new("employees", "Employees", FieldKind::Integer),
    FieldSpec::new(
        "rating",
        "Rating",
        FieldKind::Choice {
            choices: Rating::VARIANTS,
        },
    ),
    FieldSpec::new(
        "kind",
        "Type",
        FieldKind::Choice {
            choices: ContractorKind::VARIANTS,
        },
    ),
    FieldSpec::new(
        "parent",
        "Parent",
        FieldKind::Reference {
            to: EntityKind::Contractor,
        },
    ),
    FieldSpec::new(
        "campaign",
        "Campaign",
        FieldKind::Reference {
            to: EntityKind::MarketingCampaign,
        },
    ),
];

impl Validate for Contractor {
    fn validate(&self) -> Vec<Violation> {
        let mut c = Checker::new();
        self.named.check(&mut c);
        c.text("phone", &self.phone, PHONE_MAX)
            .max_len_opt("fax", self.fax.as_deref(), PHONE_MAX)
            .url("website", self.website.as_deref())
            .choice_opt("industry", &self.industry)
            .choice_opt("rating", &self.rating)
            .choice_opt("kind", &self.kind)
            .non_negative("annual_revenue", self.annual_revenue)
            .range("employees", self.employees, 0, i32::MAX);
        self.src.check(&mut c);
        c.finish()
    }
}

impl Record for Contractor {
    const KIND: EntityKind = EntityKind::Contractor;
    const HIERARCHY: Option<EntityKind> = Some(EntityKind::Contractor);

    record_basics!();

    fn fields() -> Vec<FieldSpec> {
        [
            Named::FIELDS,
            Desc::FIELDS,
            CONTRACTOR_FIELDS,
            Responsible::FIELDS,
            GeoDestination::FIELDS,
            EmailDestination::FIELDS,
            WithSrc::FIELDS,
            AuditStamp::FIELDS,
        ]
        .concat()
    }

    fn display(&self) -> String {
        self.named.name.clone()
    }

    fn hierarchy_parent(&self) -> Option<i64> {
        self.parent
    }

    fn normalize(&mut self) {
        self.geo.normalize();
        self.email.normalize();
    }

    fn membership_violations(&self) -> Vec<Violation> {
        let mut c = Checker::new();
        self.geo.check_membership(&mut c);
        self.email.check_membership(&mut c);
        c.finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    pub id: Option<i64>,
    #[serde(flatten)]
    pub desc: Desc,
    pub salutation: Option<Choice<Salutation>>,
    pub first_name: Option<String>,
    pub last_name: String,
    pub role: Option<String>,
    pub department: Option<String>,
    pub phone_work: Option<String>,
    pub phone_mobile: Option<String>,
    pub phone_home: Option<String>,
    pub fax: Option<String>,
    pub skype: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub contractor: Option<i64>,
    /// 汇报对象
    pub head: Option<i64>,
    pub campaign: Option<i64>,
    #[serde(flatten)]
    pub responsible: Responsible,
    #[serde(flatten)]
    pub geo: GeoDestination,
    #[serde(flatten)]
    pub email: EmailDestination,
    #[serde(flatten)]
    pub src: WithSrc,
    #[serde(flatten)]
    pub audit: AuditStamp,
}

const CONTACT_FIELDS: &[FieldSpec] = &[
    FieldSpec::new(
        "salutation",
        "Salutation",
        FieldKind::Choice {
            choices: Salutation::VARIANTS,
        },
    ),
    FieldSpec::new("first_name", "First name", FieldKind::Text).max_length(64),
    FieldSpec::new("last_name", "Last name", FieldKind::Text)
        .required()
        .max_length(64),
    FieldSpec::new("role", "Role", FieldKind::Text).max_length(128),
    FieldSpec::new("department", "Department", FieldKind::Text).max_length(128),
    FieldSpec::new("phone_work", "Work phone", FieldKind::Text).max_length(PHONE_MAX),
    FieldSpec::new("phone_mobile", "Mobile phone", FieldKind::Text).max_length(PHONE_MAX),
    FieldSpec::new("phone_home", "Home phone", FieldKind::Text).max_length(PHONE_MAX),
    FieldSpec::new("fax", "Fax", FieldKind::Text).max_length(PHONE_MAX),
    FieldSpec::new("skype", "Skype", FieldKind::Text).max_length(64),
    FieldSpec::new("birthday", "Birthday", FieldKind::Date),
    FieldSpec::new(
        "contractor",
        "Contractor",
        FieldKind::Reference {
            to: EntityKind::Contractor,
        },
    ),
    FieldSpec::new(
        "head",
        "Reports to",
        FieldKind::Reference {
            to: EntityKind::Contact,
        },
    ),
    FieldSpec::new(
        "campaign",
        "Campaign",
        FieldKind::Reference {
            to: EntityKind::MarketingCampaign,
        },
    ),
];

impl Contact {
    fn check(&self, c: &mut Checker) {
        c.choice_opt("salutation", &self.salutation)
            .max_len_opt("first_name", self.first_name.as_deref(), 64)
            .text("last_name", &self.last_name, 64)
            .max_len_opt("role", self.role.as_deref(), 128)
            .max_len_opt("department", self.department.as_deref(), 128)
            .max_len_opt("phone_work", self.phone_work.as_deref(), PHONE_MAX)
            .max_len_opt("phone_mobile", self.phone_mobile.as_deref(), PHONE_MAX)
            .max_len_opt("phone_home", self.phone_home.as_deref(), PHONE_MAX)
            .max_len_opt("fax", self.fax.as_deref(), PHONE_MAX)
            .max_len_opt("skype", self.skype.as_deref(), 64);
        self.src.check(c);
    }

    fn full_name(&self) -> String {
        match self.first_name.as_deref().map(str::trim) {
            Some(first) if !first.is_empty() => format!("{} {}", first, self.last_name),
            _ => self.last_name.clone(),
        }
    }
}

impl Validate for Contact {
    fn validate(&self) -> Vec<Violation> {
        let mut c = Checker::new();
        self.check(&mut c);
        c.finish()
    }
}

impl Record for Contact {
    const KIND: EntityKind = EntityKind::Contact;
    const HIERARCHY: Option<EntityKind> = Some(EntityKind::Contact);
    const HIERARCHY_FIELD: &'static str = "head";

    record_basics!();

    fn fields() -> Vec<FieldSpec> {
        [
            Desc::FIELDS,
            CONTACT_FIELDS,
            Responsible::FIELDS,
            GeoDestination::FIELDS,
            EmailDestination::FIELDS,
            WithSrc::FIELDS,
            AuditStamp::FIELDS,
        ]
        .concat()
    }

    fn display(&self) -> String {
        self.full_name()
    }

    fn hierarchy_parent(&self) -> Option<i64> {
        self.head
    }

    fn normalize(&mut self) {
        self.geo.normalize();
        self.email.normalize();
    }

    fn membership_violations(&self) -> Vec<Violation> {
        let mut c = Checker::new();
        self.geo.check_membership(&mut c);
        self.email.check_membership(&mut c);
        c.finish()
    }
}

/// 潜在联系人（线索）：一个联系人加上资格状态
///
/// 与 contacts 表共用主键，删除联系人时级联删除。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreliminaryContact {
    #[serde(flatten)]
    pub contact: Contact,
    pub status: Choice<PreliminaryStatus>,
    pub estimated_amount: Option<f64>,
}

const PRELIMINARY_FIELDS: &[FieldSpec] = &[
    FieldSpec::new(
        "status",
        "Status",
        FieldKind::Choice {
            choices: PreliminaryStatus::VARIANTS,
        },
    )
    .required(),
    FieldSpec::new("estimated_amount", "Estimated amount", FieldKind::Decimal),
];

impl Validate for PreliminaryContact {
    fn validate(&self) -> Vec<Violation> {
        let mut c = Checker::new();
        self.contact.check(&mut c);
        c.choice("status", &self.status)
            .non_negative("estimated_amount", self.estimated_amount);
        c.finish()
    }
}

impl Record for PreliminaryContact {
    const KIND: EntityKind = EntityKind::PreliminaryContact;
    const HIERARCHY: Option<EntityKind> = Some(EntityKind::Contact);
    const HIERARCHY_FIELD: &'static str = "head";

    fn fields() -> Vec<FieldSpec> {
        let mut fields = Contact::fields();
        let audit_at = fields.len() - AuditStamp::FIELDS.len();
        fields.splice(audit_at..audit_at, PRELIMINARY_FIELDS.iter().copied());
        fields
    }

    fn id(&self) -> Option<i64> {
        self.contact.id
    }

    fn set_id(&mut self, id: i64) {
        self.contact.id = Some(id);
    }

    fn clear_id(&mut self) {
        self.contact.id = None;
    }

    fn audit(&self) -> &AuditStamp {
        &self.contact.audit
    }

    fn audit_mut(&mut self) -> &mut AuditStamp {
        &mut self.contact.audit
    }

    fn display(&self) -> String {
        self.contact.full_name()
    }

    fn hierarchy_parent(&self) -> Option<i64> {
        self.contact.head
    }

    fn normalize(&mut self) {
        self.contact.normalize();
    }

    fn membership_violations(&self) -> Vec<Violation> {
        self.contact.membership_violations()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ViolationCode;
    use serde_json::json;

    fn acme() -> Contractor {
        Contractor {
            named: Named {
                name: "Acme".into(),
            },
            phone: "555-0100".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_contractor_minimal_is_valid() {
        assert!(acme().validate().is_empty());
    }

    #[test]
    fn test_contractor_requires_phone() {
        let mut c = acme();
        c.phone = String::new();
        let out = c.validate();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].field, "phone");
        assert_eq!(out[0].code, ViolationCode::Required);
    }

    #[test]
    fn test_contractor_field_checks() {
        let mut c = acme();
        c.website = Some("ftp://acme.example".into());
        c.industry = Some(Choice::from("mining"));
        c.employees = Some(-1);
        c.annual_revenue = Some(-5.0);
        let fields: Vec<String> = c.validate().into_iter().map(|v| v.field).collect();
        assert_eq!(
            fields,
            vec!["website", "industry", "annual_revenue", "employees"]
        );
    }

    #[test]
    fn test_contractor_deserializes_flat_json() {
        let c: Contractor = serde_json::from_value(json!({
            "name": "Acme",
            "phone": "555-0100",
            "addresses": [1, 2],
            "primary_address": 2,
            "source": "trade_show",
            "created_by": 99
        }))
        .unwrap();
        assert_eq!(c.named.name, "Acme");
        assert_eq!(c.geo.addresses, vec![1, 2]);
        assert_eq!(c.src.source, Some(Choice::from("trade_show")));
        assert_eq!(c.audit.created_by, Some(99));
        assert!(c.membership_violations().is_empty());
    }

    #[test]
    fn test_contractor_membership() {
        let mut c = acme();
        c.email = EmailDestination {
            emails: vec![4],
            primary_email: Some(5),
        };
        let out = c.membership_violations();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].code, ViolationCode::NotMember);
        // membership is not part of pure validation
        assert!(c.validate().is_empty());
    }

    #[test]
    fn test_contact_requires_last_name() {
        let contact = Contact {
            first_name: Some("Ada".into()),
            ..Default::default()
        };
        let out = contact.validate();
        assert_eq!(out[0].field, "last_name");
        assert_eq!(out[0].code, ViolationCode::Required);
    }

    #[test]
    fn test_contact_display() {
        let contact = Contact {
            first_name: Some("Ada".into()),
            last_name: "Lovelace".into(),
            ..Default::default()
        };
        assert_eq!(contact.display(), "Ada Lovelace");
        let contact = Contact {
            last_name: "Lovelace".into(),
            ..Default::default()
        };
        assert_eq!(contact.display(), "Lovelace");
    }

    #[test]
    fn test_preliminary_contact_checks_embedded_contact() {
        let lead: PreliminaryContact = serde_json::from_value(json!({
            "last_name": "",
            "status": "hot",
            "estimated_amount": 10.0
        }))
        .unwrap();
        let out = lead.validate();
        let fields: Vec<&str> = out.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["last_name", "status"]);
    }

    #[test]
    fn test_preliminary_fields_precede_audit() {
        let fields = PreliminaryContact::fields();
        let names: Vec<&str> = fields.iter().map(|f| f.name).collect();
        let status = names.iter().position(|n| *n == "status").unwrap();
        let created_by = names.iter().position(|n| *n == "created_by").unwrap();
        assert!(status < created_by);
        assert!(names.contains(&"last_name"));
    }
}
