//! 地址与邮箱：被客户单位和联系人共享引用

use serde::{Deserialize, Serialize};

use super::kind::EntityKind;
use super::mixins::{AuditStamp, Desc};
use super::record::{FieldKind, FieldSpec, Record, record_basics};
use super::validation::{Checker, Validate, Violation};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    pub id: Option<i64>,
    #[serde(flatten)]
    pub desc: Desc,
    pub street: String,
    pub city: String,
    pub region: String,
    pub zipcode: String,
    pub country: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(flatten)]
    pub audit: AuditStamp,
}

const ADDRESS_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("street", "Street", FieldKind::LongText).required(),
    FieldSpec::new("city", "City", FieldKind::Text)
        .required()
        .max_length(128),
    FieldSpec::new("region", "Region", FieldKind::Text)
        .required()
        .max_length(128),
    FieldSpec::new("zipcode", "Zip code", FieldKind::Text)
        .required()
        .max_length(16),
    FieldSpec::new("country", "Country", FieldKind::Text)
        .required()
        .max_length(128),
    FieldSpec::new("latitude", "Latitude", FieldKind::Decimal),
    FieldSpec::new("longitude", "Longitude", FieldKind::Decimal),
];

impl Validate for Address {
    fn validate(&self) -> Vec<Violation> {
        let mut c = Checker::new();
        c.required("street", &self.street)
            .text("city", &self.city, 128)
            .text("region", &self.region, 128)
            .text("zipcode", &self.zipcode, 16)
            .text("country", &self.country, 128)
            .range("latitude", self.latitude, -90.0, 90.0)
            .range("longitude", self.longitude, -180.0, 180.0);
        c.finish()
    }
}

impl Record for Address {
    const KIND: EntityKind = EntityKind::Address;

    record_basics!();

    fn fields() -> Vec<FieldSpec> {
        [Desc::FIELDS, ADDRESS_FIELDS, AuditStamp::FIELDS].concat()
    }

    fn display(&self) -> String {
        format!("{}, {} {}, {}", self.street, self.zipcode, self.city, self.country)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailContact {
    pub id: Option<i64>,
    pub email: String,
    pub do_not_contact: bool,
    pub invalid: bool,
    #[serde(flatten)]
    pub audit: AuditStamp,
}

const EMAIL_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("email", "Email", FieldKind::Email)
        .required()
        .max_length(254),
    FieldSpec::new("do_not_contact", "Do not contact", FieldKind::Boolean),
    FieldSpec::new("invalid", "Invalid", FieldKind::Boolean),
];

impl Validate for EmailContact {
    fn validate(&self) -> Vec<Violation> {
        let mut c = Checker::new();
        c.text("email", &self.email, 254).email("email", &self.email);
        c.finish()
    }
}

impl Record for EmailContact {
    const KIND: EntityKind = EntityKind::EmailContact;

    record_basics!();

    fn fields() -> Vec<FieldSpec> {
        [EMAIL_FIELDS, AuditStamp::FIELDS].concat()
    }

    fn display(&self) -> String {
        self.email.clone()
    }

    /// 校验按去掉首尾空白的值进行，存库的也应是同一个值
    fn normalize(&mut self) {
        let trimmed = self.email.trim();
        if trimmed.len() != self.email.len() {
            self.email = trimmed.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ViolationCode;

    fn address() -> Address {
        Address {
            street: "1 Main St".into(),
            city: "Springfield".into(),
            region: "IL".into(),
            zipcode: "62701".into(),
            country: "US".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_address() {
        assert!(address().validate().is_empty());
    }

    #[test]
    fn test_address_coordinates_out_of_range() {
        let mut a = address();
        a.latitude = Some(91.0);
        a.longitude = Some(-180.0);
        let out = a.validate();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].field, "latitude");
        assert_eq!(out[0].code, ViolationCode::OutOfRange);
    }

    #[test]
    fn test_address_zipcode_too_long() {
        let mut a = address();
        a.zipcode = "12345678901234567".into();
        let out = a.validate();
        assert_eq!(out[0].field, "zipcode");
        assert_eq!(out[0].code, ViolationCode::MaxLength);
    }

    #[test]
    fn test_address_desc_uses_desc_key() {
        let json = serde_json::json!({
            "desc": "HQ",
            "street": "1 Main St",
            "city": "Springfield",
            "region": "IL",
            "zipcode": "62701",
            "country": "US"
        });
        let a: Address = serde_json::from_value(json).unwrap();
        assert_eq!(a.desc.desc, "HQ");
        let back = serde_json::to_value(&a).unwrap();
        assert_eq!(back["desc"], "HQ");
        assert!(back.get("created_by").is_some());
    }

    #[test]
    fn test_email_contact_validation() {
        let ok = EmailContact {
            email: "info@acme.example".into(),
            ..Default::default()
        };
        assert!(ok.validate().is_empty());

        let bad = EmailContact {
            email: "acme".into(),
            ..Default::default()
        };
        assert_eq!(bad.validate()[0].code, ViolationCode::InvalidEmail);

        let blank = EmailContact::default();
        assert_eq!(blank.validate()[0].code, ViolationCode::Required);
    }

    #[test]
    fn test_email_surrounding_whitespace_is_stripped() {
        let mut e = EmailContact {
            email: "  sales@acme.example\n".into(),
            ..Default::default()
        };
        e.normalize();
        assert_eq!(e.email, "sales@acme.example");
        assert!(e.validate().is_empty());
    }

    #[test]
    fn test_fields_include_audit() {
        let names: Vec<&str> = EmailContact::fields().iter().map(|f| f.name).collect();
        assert!(names.contains(&"updated_at"));
        assert!(EmailContact::has_field("do_not_contact"));
        assert!(!EmailContact::has_field("desc"));
    }
}
