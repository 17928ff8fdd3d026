//! 活动类记录：电话、会议、任务、备注、文档

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::VariantNames;

use super::choices::{ActivityStatus, CallDirection, Choice, DocumentStatus, Priority, TaskStatus};
use super::kind::{EntityKind, RelatedTo};
use super::mixins::{AuditStamp, Desc, NAME_MAX, Named, Responsible};
use super::record::{FieldKind, FieldSpec, Record, record_basics};
use super::validation::{Checker, Validate, Violation, ViolationCode};

pub const DOCUMENTS_DIR: &str = "attachs/documents/";
pub const NOTES_DIR: &str = "attachs/notes/";

const RELATED_FIELD: FieldSpec = FieldSpec::new("related_to", "Related to", FieldKind::Related);

/// 附件路径必须位于 `dir` 之下，且不能包含 `..`
pub fn check_attach(c: &mut Checker, dir: &str, value: &str) {
    let inside = value
        .strip_prefix(dir)
        .is_some_and(|rest| !rest.is_empty() && !rest.starts_with('/'));
    let escapes = value.split(['/', '\\']).any(|seg| seg == "..");
    if !inside || escapes {
        c.push(
            "attach",
            ViolationCode::InvalidPath,
            format!("Attachment must be a file under {}.", dir),
        );
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhoneCall {
    pub id: Option<i64>,
    #[serde(flatten)]
    pub named: Named,
    #[serde(flatten)]
    pub desc: Desc,
    pub direction: Choice<CallDirection>,
    pub status: Choice<ActivityStatus>,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub related_to: Option<RelatedTo>,
    #[serde(flatten)]
    pub responsible: Responsible,
    #[serde(flatten)]
    pub audit: AuditStamp,
}

const PHONE_CALL_FIELDS: &[FieldSpec] = &[
    FieldSpec::new(
        "direction",
        "Direction",
        FieldKind::Choice {
            choices: CallDirection::VARIANTS,
        },
    )
    .required(),
    FieldSpec::new(
        "status",
        "Status",
        FieldKind::Choice {
            choices: ActivityStatus::VARIANTS,
        },
    )
    .required(),
    FieldSpec::new("start_at", "Start", FieldKind::DateTime).required(),
    FieldSpec::new("end_at", "End", FieldKind::DateTime),
    RELATED_FIELD,
];

impl Validate for PhoneCall {
    fn validate(&self) -> Vec<Violation> {
        let mut c = Checker::new();
        self.named.check(&mut c);
        c.choice("direction", &self.direction)
            .choice("status", &self.status)
            .required_value("start_at", &self.start_at)
            .ordered("start_at", self.start_at, "end_at", self.end_at);
        RelatedTo::check(&self.related_to, &mut c);
        c.finish()
    }
}

impl Record for PhoneCall {
    const KIND: EntityKind = EntityKind::PhoneCall;

    record_basics!();

    fn fields() -> Vec<FieldSpec> {
        [
            Named::FIELDS,
            Desc::FIELDS,
            PHONE_CALL_FIELDS,
            Responsible::FIELDS,
            AuditStamp::FIELDS,
        ]
        .concat()
    }

    fn display(&self) -> String {
        self.named.name.clone()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Meeting {
    pub id: Option<i64>,
    #[serde(flatten)]
    pub named: Named,
    #[serde(flatten)]
    pub desc: Desc,
    pub status: Choice<ActivityStatus>,
    pub location: Option<String>,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub related_to: Option<RelatedTo>,
    #[serde(flatten)]
    pub responsible: Responsible,
    #[serde(flatten)]
    pub audit: AuditStamp,
}

const MEETING_FIELDS: &[FieldSpec] = &[
    FieldSpec::new(
        "status",
        "Status",
        FieldKind::Choice {
            choices: ActivityStatus::VARIANTS,
        },
    )
    .required(),
    FieldSpec::new("location", "Location", FieldKind::Text).max_length(NAME_MAX),
    FieldSpec::new("start_at", "Start", FieldKind::DateTime).required(),
    FieldSpec::new("end_at", "End", FieldKind::DateTime),
    RELATED_FIELD,
];

impl Validate for Meeting {
    fn validate(&self) -> Vec<Violation> {
        let mut c = Checker::new();
        self.named.check(&mut c);
        c.choice("status", &self.status)
            .max_len_opt("location", self.location.as_deref(), NAME_MAX)
            .required_value("start_at", &self.start_at)
            .ordered("start_at", self.start_at, "end_at", self.end_at);
        RelatedTo::check(&self.related_to, &mut c);
        c.finish()
    }
}

impl Record for Meeting {
    const KIND: EntityKind = EntityKind::Meeting;

    record_basics!();

    fn fields() -> Vec<FieldSpec> {
        [
            Named::FIELDS,
            Desc::FIELDS,
            MEETING_FIELDS,
            Responsible::FIELDS,
            AuditStamp::FIELDS,
        ]
        .concat()
    }

    fn display(&self) -> String {
        self.named.name.clone()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Task {
    pub id: Option<i64>,
    #[serde(flatten)]
    pub named: Named,
    #[serde(flatten)]
    pub desc: Desc,
    pub status: Choice<TaskStatus>,
    pub priority: Choice<Priority>,
    pub start_at: Option<DateTime<Utc>>,
    pub due_at: Option<DateTime<Utc>>,
    pub related_to: Option<RelatedTo>,
    #[serde(flatten)]
    pub responsible: Responsible,
    #[serde(flatten)]
    pub audit: AuditStamp,
}

const TASK_FIELDS: &[FieldSpec] = &[
    FieldSpec::new(
        "status",
        "Status",
        FieldKind::Choice {
            choices: TaskStatus::VARIANTS,
        },
    )
    .required(),
    FieldSpec::new(
        "priority",
        "Priority",
        FieldKind::Choice {
            choices: Priority::VARIANTS,
        },
    )
    .required(),
    FieldSpec::new("start_at", "Start", FieldKind::DateTime),
    FieldSpec::new("due_at", "Due", FieldKind::DateTime),
    RELATED_FIELD,
];

impl Validate for Task {
    fn validate(&self) -> Vec<Violation> {
        let mut c = Checker::new();
        self.named.check(&mut c);
        c.choice("status", &self.status)
            .choice("priority", &self.priority)
            .ordered("start_at", self.start_at, "due_at", self.due_at);
        RelatedTo::check(&self.related_to, &mut c);
        c.finish()
    }
}

impl Record for Task {
    const KIND: EntityKind = EntityKind::Task;

    record_basics!();

    fn fields() -> Vec<FieldSpec> {
        [
            Named::FIELDS,
            Desc::FIELDS,
            TASK_FIELDS,
            Responsible::FIELDS,
            AuditStamp::FIELDS,
        ]
        .concat()
    }

    fn display(&self) -> String {
        self.named.name.clone()
    }
}

/// 备注，没有负责人
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Note {
    pub id: Option<i64>,
    #[serde(flatten)]
    pub named: Named,
    #[serde(flatten)]
    pub desc: Desc,
    pub attach: Option<String>,
    pub related_to: Option<RelatedTo>,
    #[serde(flatten)]
    pub audit: AuditStamp,
}

const NOTE_FIELDS: &[FieldSpec] = &[
    FieldSpec::new(
        "attach",
        "Attachment",
        FieldKind::File {
            upload_to: NOTES_DIR,
        },
    )
    .max_length(NAME_MAX),
    RELATED_FIELD,
];

impl Validate for Note {
    fn validate(&self) -> Vec<Violation> {
        let mut c = Checker::new();
        self.named.check(&mut c);
        if let Some(attach) = self.attach.as_deref().filter(|a| !a.trim().is_empty()) {
            c.max_len("attach", attach, NAME_MAX);
            check_attach(&mut c, NOTES_DIR, attach);
        }
        RelatedTo::check(&self.related_to, &mut c);
        c.finish()
    }
}

impl Record for Note {
    const KIND: EntityKind = EntityKind::Note;

    record_basics!();

    fn fields() -> Vec<FieldSpec> {
        [Named::FIELDS, Desc::FIELDS, NOTE_FIELDS, AuditStamp::FIELDS].concat()
    }

    fn display(&self) -> String {
        self.named.name.clone()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Document {
    pub id: Option<i64>,
    #[serde(flatten)]
    pub named: Named,
    #[serde(flatten)]
    pub desc: Desc,
    pub attach: String,
    pub version: Option<String>,
    pub status: Choice<DocumentStatus>,
    pub publish_date: Option<NaiveDate>,
    pub expiration_date: Option<NaiveDate>,
    #[serde(flatten)]
    pub responsible: Responsible,
    #[serde(flatten)]
    pub audit: AuditStamp,
}

const DOCUMENT_FIELDS: &[FieldSpec] = &[
    FieldSpec::new(
        "attach",
        "Attachment",
        FieldKind::File {
            upload_to: DOCUMENTS_DIR,
        },
    )
    .required()
    .max_length(NAME_MAX),
    FieldSpec::new("version", "Version", FieldKind::Text).max_length(32),
    FieldSpec::new(
        "status",
        "Status",
        FieldKind::Choice {
            choices: DocumentStatus::VARIANTS,
        },
    )
    .required(),
    FieldSpec::new("publish_date", "Publish date", FieldKind::Date),
    FieldSpec::new("expiration_date", "Expiration date", FieldKind::Date),
];

impl Validate for Document {
    fn validate(&self) -> Vec<Violation> {
        let mut c = Checker::new();
        self.named.check(&mut c);
        if self.attach.trim().is_empty() {
            c.push("attach", ViolationCode::Required, "This field is required.");
        } else {
            c.max_len("attach", &self.attach, NAME_MAX);
            check_attach(&mut c, DOCUMENTS_DIR, &self.attach);
        }
        c.max_len_opt("version", self.version.as_deref(), 32)
            .choice("status", &self.status)
            .ordered(
                "publish_date",
                self.publish_date,
                "expiration_date",
                self.expiration_date,
            );
        c.finish()
    }
}

impl Record for Document {
    const KIND: EntityKind = EntityKind::Document;

    record_basics!();

    fn fields() -> Vec<FieldSpec> {
        [
            Named::FIELDS,
            Desc::FIELDS,
            DOCUMENT_FIELDS,
            Responsible::FIELDS,
            AuditStamp::FIELDS,
        ]
        .concat()
    }

    fn display(&self) -> String {
        self.named.name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn fields(out: Vec<Violation>) -> Vec<String> {
        out.into_iter().map(|v| v.field).collect()
    }

    #[test]
    fn test_task_rejects_unknown_status() {
        let task: Task = serde_json::from_value(json!({
            "name": "Call back",
            "status": "finished",
            "priority": "high"
        }))
        .unwrap();
        let out = task.validate();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].field, "status");
        assert_eq!(out[0].code, ViolationCode::InvalidChoice);
    }

    #[test]
    fn test_phone_call_requires_start_and_orders_end() {
        let call = PhoneCall {
            named: Named {
                name: "Intro".into(),
            },
            direction: Choice::new(CallDirection::Outbound),
            status: Choice::new(ActivityStatus::Held),
            end_at: Some(Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()),
            ..Default::default()
        };
        assert_eq!(fields(call.validate()), vec!["start_at"]);

        let call = PhoneCall {
            start_at: Some(Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap()),
            ..call
        };
        let out = call.validate();
        assert_eq!(fields(out.clone()), vec!["end_at"]);
        assert_eq!(out[0].code, ViolationCode::InvalidRange);
    }

    #[test]
    fn test_related_to_round_trips_through_json() {
        let meeting: Meeting = serde_json::from_value(json!({
            "name": "Kickoff",
            "status": "planned",
            "start_at": "2024-03-01T10:00:00Z",
            "related_to": {"kind": "deals", "id": 7}
        }))
        .unwrap();
        assert!(meeting.validate().is_empty());
        assert_eq!(
            meeting.related_to,
            Some(RelatedTo::new(EntityKind::Deal, 7))
        );
    }

    #[test]
    fn test_document_attach_paths() {
        let mut doc = Document {
            named: Named {
                name: "Contract".into(),
            },
            status: Choice::new(DocumentStatus::Draft),
            ..Default::default()
        };
        assert_eq!(fields(doc.validate()), vec!["attach"]);

        doc.attach = "attachs/documents/abc_contract.pdf".into();
        assert!(doc.validate().is_empty());

        for bad in [
            "attachs/notes/abc.pdf",
            "attachs/documents/../../etc/passwd",
            "attachs/documents/",
            "/attachs/documents/x.pdf",
        ] {
            doc.attach = bad.into();
            let out = doc.validate();
            assert_eq!(out.len(), 1, "{bad}");
            assert_eq!(out[0].code, ViolationCode::InvalidPath);
        }
    }

    #[test]
    fn test_note_attach_is_optional() {
        let mut note = Note {
            named: Named {
                name: "Memo".into(),
            },
            ..Default::default()
        };
        assert!(note.validate().is_empty());
        note.attach = Some(String::new());
        assert!(note.validate().is_empty());
        note.attach = Some("attachs/documents/x.txt".into());
        assert_eq!(fields(note.validate()), vec!["attach"]);
    }

    #[test]
    fn test_note_has_no_responsible_field() {
        assert!(!Note::has_field("responsible"));
        assert!(Document::has_field("responsible"));
        assert!(Note::has_field("related_to"));
    }
}
