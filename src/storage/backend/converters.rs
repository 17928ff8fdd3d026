//! sea-orm Model 与领域记录之间的转换
//!
//! `x_to_active_model(record, is_new)`：新建时 id 不设置、created_* 写入；
//! 更新时 id 写入、created_* 不设置。审计字段在调用前已由存储层补全。

use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::ActiveValue;

use crate::domain::choices::optional_raw;
use crate::domain::{
    Address, AuditStamp, Choice, Circulation, Contact, Contractor, Deal, Desc, Document,
    EmailContact, EmailDestination, GeoDestination, MarketingCampaign, Meeting, Named, Note,
    PhoneCall, PreliminaryContact, Project, RelatedTo, Responsible, Task, WithSrc,
};
use migration::entities::{
    address, circulation, contact, contractor, deal, document, email_contact,
    marketing_campaign, meeting, note, phone_call, preliminary_contact, project, task, user,
};

use crate::storage::UserAccount;

fn audit(
    created_by: i64,
    created_at: DateTime<Utc>,
    updated_by: i64,
    updated_at: DateTime<Utc>,
) -> AuditStamp {
    AuditStamp {
        created_by: Some(created_by),
        created_at: Some(created_at),
        updated_by: Some(updated_by),
        updated_at: Some(updated_at),
    }
}

/// 审计列的 ActiveValue：(created_by, created_at, updated_by, updated_at)
type AuditValues = (
    ActiveValue<i64>,
    ActiveValue<DateTime<Utc>>,
    ActiveValue<i64>,
    ActiveValue<DateTime<Utc>>,
);

fn audit_values(stamp: &AuditStamp, is_new: bool) -> AuditValues {
    let updated_by = stamp.updated_by.or(stamp.created_by).unwrap_or_default();
    let updated_at = stamp.updated_at.or(stamp.created_at).unwrap_or_default();
    if is_new {
        (
            Set(stamp.created_by.unwrap_or_default()),
            Set(stamp.created_at.unwrap_or(updated_at)),
            Set(updated_by),
            Set(updated_at),
        )
    } else {
        (NotSet, NotSet, Set(updated_by), Set(updated_at))
    }
}

fn id_value(id: Option<i64>, is_new: bool) -> ActiveValue<i64> {
    match (is_new, id) {
        (false, Some(id)) => Set(id),
        _ => NotSet,
    }
}

fn choice_value<T>(choice: &Choice<T>) -> String {
    choice.raw().to_string()
}

// ---- directory ----

pub fn model_to_address(model: address::Model) -> Address {
    Address {
        id: Some(model.id),
        desc: Desc {
            desc: model.description,
        },
        street: model.street,
        city: model.city,
        region: model.region,
        zipcode: model.zipcode,
        country: model.country,
        latitude: model.latitude,
        longitude: model.longitude,
        audit: audit(
            model.created_by,
            model.created_at,
            model.updated_by,
            model.updated_at,
        ),
    }
}

pub fn address_to_active_model(record: &Address, is_new: bool) -> address::ActiveModel {
    let (created_by, created_at, updated_by, updated_at) = audit_values(&record.audit, is_new);
    address::ActiveModel {
        id: id_value(record.id, is_new),
        description: Set(record.desc.desc.clone()),
        street: Set(record.street.clone()),
        city: Set(record.city.clone()),
        region: Set(record.region.clone()),
        zipcode: Set(record.zipcode.clone()),
        country: Set(record.country.clone()),
        latitude: Set(record.latitude),
        longitude: Set(record.longitude),
        created_by,
        created_at,
        updated_by,
        updated_at,
    }
}

pub fn model_to_email_contact(model: email_contact::Model) -> EmailContact {
    EmailContact {
        id: Some(model.id),
        email: model.email,
        do_not_contact: model.do_not_contact,
        invalid: model.invalid,
        audit: audit(
            model.created_by,
            model.created_at,
            model.updated_by,
            model.updated_at,
        ),
    }
}

pub fn email_contact_to_active_model(
    record: &EmailContact,
    is_new: bool,
) -> email_contact::ActiveModel {
    let (created_by, created_at, updated_by, updated_at) = audit_values(&record.audit, is_new);
    email_contact::ActiveModel {
        id: id_value(record.id, is_new),
        email: Set(record.email.trim().to_string()),
        do_not_contact: Set(record.do_not_contact),
        invalid: Set(record.invalid),
        created_by,
        created_at,
        updated_by,
        updated_at,
    }
}

// ---- parties ----

/// 关联表中的地址、邮箱集合由 `load_links` 另行填充
pub fn model_to_contractor(model: contractor::Model) -> Contractor {
    Contractor {
        id: Some(model.id),
        named: Named { name: model.name },
        desc: Desc {
            desc: model.description,
        },
        phone: model.phone,
        fax: model.fax,
        website: model.website,
        industry: model.industry.map(Choice::from),
        annual_revenue: model.annual_revenue,
        employees: model.employees,
        rating: model.rating.map(Choice::from),
        kind: model.kind.map(Choice::from),
        parent: model.parent_id,
        campaign: model.campaign_id,
        responsible: Responsible {
            responsible: model.responsible_id,
        },
        geo: GeoDestination {
            addresses: Vec::new(),
            primary_address: model.primary_address_id,
        },
        email: EmailDestination {
            emails: Vec::new(),
            primary_email: model.primary_email_id,
        },
        src: WithSrc {
            source: model.source.map(Choice::from),
        },
        audit: audit(
            model.created_by,
            model.created_at,
            model.updated_by,
            model.updated_at,
        ),
    }
}

pub fn contractor_to_active_model(record: &Contractor, is_new: bool) -> contractor::ActiveModel {
    let (created_by, created_at, updated_by, updated_at) = audit_values(&record.audit, is_new);
    contractor::ActiveModel {
        id: id_value(record.id, is_new),
        name: Set(record.named.name.clone()),
        description: Set(record.desc.desc.clone()),
        phone: Set(record.phone.clone()),
        fax: Set(record.fax.clone()),
        website: Set(record.website.clone().filter(|w| !w.trim().is_empty())),
        industry: Set(optional_raw(&record.industry)),
        kind: Set(optional_raw(&record.kind)),
        rating: Set(optional_raw(&record.rating)),
        annual_revenue: Set(record.annual_revenue),
        employees: Set(record.employees),
        source: Set(optional_raw(&record.src.source)),
        parent_id: Set(record.parent),
        campaign_id: Set(record.campaign),
        responsible_id: Set(record.responsible.responsible),
        primary_address_id: Set(record.geo.primary_address),
        primary_email_id: Set(record.email.primary_email),
        created_by,
        created_at,
        updated_by,
        updated_at,
    }
}

pub fn model_to_contact(model: contact::Model) -> Contact {
    Contact {
        id: Some(model.id),
        desc: Desc {
            desc: model.description,
        },
        salutation: model.salutation.map(Choice::from),
        first_name: model.first_name,
        last_name: model.last_name,
        role: model.role,
        department: model.department,
        phone_work: model.phone_work,
        phone_mobile: model.phone_mobile,
        phone_home: model.phone_home,
        fax: model.fax,
        skype: model.skype,
        birthday: model.birthday,
        contractor: model.contractor_id,
        head: model.head_id,
        campaign: model.campaign_id,
        responsible: Responsible {
            responsible: model.responsible_id,
        },
        geo: GeoDestination {
            addresses: Vec::new(),
            primary_address: model.primary_address_id,
        },
        email: EmailDestination {
            emails: Vec::new(),
            primary_email: model.primary_email_id,
        },
        src: WithSrc {
            source: model.source.map(Choice::from),
        },
        audit: audit(
            model.created_by,
            model.created_at,
            model.updated_by,
            model.updated_at,
        ),
    }
}

pub fn contact_to_active_model(record: &Contact, is_new: bool) -> contact::ActiveModel {
    let (created_by, created_at, updated_by, updated_at) = audit_values(&record.audit, is_new);
    contact::ActiveModel {
        id: id_value(record.id, is_new),
        description: Set(record.desc.desc.clone()),
        salutation: Set(optional_raw(&record.salutation)),
        first_name: Set(record.first_name.clone()),
        last_name: Set(record.last_name.clone()),
        role: Set(record.role.clone()),
        department: Set(record.department.clone()),
        phone_work: Set(record.phone_work.clone()),
        phone_mobile: Set(record.phone_mobile.clone()),
        phone_home: Set(record.phone_home.clone()),
        fax: Set(record.fax.clone()),
        skype: Set(record.skype.clone()),
        birthday: Set(record.birthday),
        source: Set(optional_raw(&record.src.source)),
        contractor_id: Set(record.contractor),
        head_id: Set(record.head),
        campaign_id: Set(record.campaign),
        responsible_id: Set(record.responsible.responsible),
        primary_address_id: Set(record.geo.primary_address),
        primary_email_id: Set(record.email.primary_email),
        created_by,
        created_at,
        updated_by,
        updated_at,
    }
}

pub fn models_to_preliminary_contact(
    contact: Contact,
    model: preliminary_contact::Model,
) -> PreliminaryContact {
    PreliminaryContact {
        contact,
        status: Choice::from(model.status),
        estimated_amount: model.estimated_amount,
    }
}

/// 预备联系人行，主键即联系人 id
pub fn preliminary_to_active_model(
    record: &PreliminaryContact,
    contact_id: i64,
) -> preliminary_contact::ActiveModel {
    preliminary_contact::ActiveModel {
        contact_id: Set(contact_id),
        status: Set(choice_value(&record.status)),
        estimated_amount: Set(record.estimated_amount),
    }
}

// ---- pipeline ----

pub fn model_to_marketing_campaign(model: marketing_campaign::Model) -> MarketingCampaign {
    MarketingCampaign {
        id: Some(model.id),
        named: Named { name: model.name },
        desc: Desc {
            desc: model.description,
        },
        status: Choice::from(model.status),
        kind: Choice::from(model.kind),
        start_date: model.start_date,
        end_date: model.end_date,
        budget: model.budget,
        expected_cost: model.expected_cost,
        actual_cost: model.actual_cost,
        expected_revenue: model.expected_revenue,
        responsible: Responsible {
            responsible: model.responsible_id,
        },
        audit: audit(
            model.created_by,
            model.created_at,
            model.updated_by,
            model.updated_at,
        ),
    }
}

pub fn marketing_campaign_to_active_model(
    record: &MarketingCampaign,
    is_new: bool,
) -> marketing_campaign::ActiveModel {
    let (created_by, created_at, updated_by, updated_at) = audit_values(&record.audit, is_new);
    marketing_campaign::ActiveModel {
        id: id_value(record.id, is_new),
        name: Set(record.named.name.clone()),
        description: Set(record.desc.desc.clone()),
        status: Set(choice_value(&record.status)),
        kind: Set(choice_value(&record.kind)),
        start_date: Set(record.start_date),
        end_date: Set(record.end_date),
        budget: Set(record.budget),
        expected_cost: Set(record.expected_cost),
        actual_cost: Set(record.actual_cost),
        expected_revenue: Set(record.expected_revenue),
        responsible_id: Set(record.responsible.responsible),
        created_by,
        created_at,
        updated_by,
        updated_at,
    }
}

pub fn model_to_deal(model: deal::Model) -> Deal {
    Deal {
        id: Some(model.id),
        named: Named { name: model.name },
        desc: Desc {
            desc: model.description,
        },
        contractor: Some(model.contractor_id),
        campaign: model.campaign_id,
        amount: Some(model.amount),
        stage: Choice::from(model.stage),
        probability: model.probability,
        closing_date: model.closing_date,
        next_step: model.next_step,
        responsible: Responsible {
            responsible: model.responsible_id,
        },
        src: WithSrc {
            source: model.source.map(Choice::from),
        },
        audit: audit(
            model.created_by,
            model.created_at,
            model.updated_by,
            model.updated_at,
        ),
    }
}

pub fn deal_to_active_model(record: &Deal, is_new: bool) -> deal::ActiveModel {
    let (created_by, created_at, updated_by, updated_at) = audit_values(&record.audit, is_new);
    deal::ActiveModel {
        id: id_value(record.id, is_new),
        name: Set(record.named.name.clone()),
        description: Set(record.desc.desc.clone()),
        contractor_id: Set(record.contractor.unwrap_or_default()),
        campaign_id: Set(record.campaign),
        amount: Set(record.amount.unwrap_or_default()),
        stage: Set(choice_value(&record.stage)),
        probability: Set(record.probability),
        closing_date: Set(record.closing_date),
        next_step: Set(record.next_step.clone()),
        source: Set(optional_raw(&record.src.source)),
        responsible_id: Set(record.responsible.responsible),
        created_by,
        created_at,
        updated_by,
        updated_at,
    }
}

pub fn model_to_circulation(model: circulation::Model) -> Circulation {
    Circulation {
        id: Some(model.id),
        named: Named { name: model.name },
        desc: Desc {
            desc: model.description,
        },
        contractor: Some(model.contractor_id),
        priority: Choice::from(model.priority),
        status: Choice::from(model.status),
        kind: Choice::from(model.kind),
        resolution: model.resolution,
        responsible: Responsible {
            responsible: model.responsible_id,
        },
        audit: audit(
            model.created_by,
            model.created_at,
            model.updated_by,
            model.updated_at,
        ),
    }
}

pub fn circulation_to_active_model(record: &Circulation, is_new: bool) -> circulation::ActiveModel {
    let (created_by, created_at, updated_by, updated_at) = audit_values(&record.audit, is_new);
    circulation::ActiveModel {
        id: id_value(record.id, is_new),
        name: Set(record.named.name.clone()),
        description: Set(record.desc.desc.clone()),
        contractor_id: Set(record.contractor.unwrap_or_default()),
        priority: Set(choice_value(&record.priority)),
        status: Set(choice_value(&record.status)),
        kind: Set(choice_value(&record.kind)),
        resolution: Set(record.resolution.clone()),
        responsible_id: Set(record.responsible.responsible),
        created_by,
        created_at,
        updated_by,
        updated_at,
    }
}

pub fn model_to_project(model: project::Model) -> Project {
    Project {
        id: Some(model.id),
        named: Named { name: model.name },
        desc: Desc {
            desc: model.description,
        },
        status: Choice::from(model.status),
        priority: model.priority.map(Choice::from),
        contractor: model.contractor_id,
        start_date: model.start_date,
        end_date: model.end_date,
        responsible: Responsible {
            responsible: model.responsible_id,
        },
        audit: audit(
            model.created_by,
            model.created_at,
            model.updated_by,
            model.updated_at,
        ),
    }
}

pub fn project_to_active_model(record: &Project, is_new: bool) -> project::ActiveModel {
    let (created_by, created_at, updated_by, updated_at) = audit_values(&record.audit, is_new);
    project::ActiveModel {
        id: id_value(record.id, is_new),
        name: Set(record.named.name.clone()),
        description: Set(record.desc.desc.clone()),
        status: Set(choice_value(&record.status)),
        priority: Set(optional_raw(&record.priority)),
        contractor_id: Set(record.contractor),
        start_date: Set(record.start_date),
        end_date: Set(record.end_date),
        responsible_id: Set(record.responsible.responsible),
        created_by,
        created_at,
        updated_by,
        updated_at,
    }
}

// ---- activities ----

pub fn model_to_phone_call(model: phone_call::Model) -> PhoneCall {
    PhoneCall {
        id: Some(model.id),
        named: Named { name: model.name },
        desc: Desc {
            desc: model.description,
        },
        direction: Choice::from(model.direction),
        status: Choice::from(model.status),
        start_at: Some(model.start_at),
        end_at: model.end_at,
        related_to: RelatedTo::from_columns(model.related_kind, model.related_id),
        responsible: Responsible {
            responsible: model.responsible_id,
        },
        audit: audit(
            model.created_by,
            model.created_at,
            model.updated_by,
            model.updated_at,
        ),
    }
}

pub fn phone_call_to_active_model(record: &PhoneCall, is_new: bool) -> phone_call::ActiveModel {
    let (created_by, created_at, updated_by, updated_at) = audit_values(&record.audit, is_new);
    let (related_kind, related_id) = RelatedTo::to_columns(&record.related_to);
    phone_call::ActiveModel {
        id: id_value(record.id, is_new),
        name: Set(record.named.name.clone()),
        description: Set(record.desc.desc.clone()),
        direction: Set(choice_value(&record.direction)),
        status: Set(choice_value(&record.status)),
        start_at: Set(record.start_at.unwrap_or_default()),
        end_at: Set(record.end_at),
        related_kind: Set(related_kind),
        related_id: Set(related_id),
        responsible_id: Set(record.responsible.responsible),
        created_by,
        created_at,
        updated_by,
        updated_at,
    }
}

pub fn model_to_meeting(model: meeting::Model) -> Meeting {
    Meeting {
        id: Some(model.id),
        named: Named { name: model.name },
        desc: Desc {
            desc: model.description,
        },
        status: Choice::from(model.status),
        location: model.location,
        start_at: Some(model.start_at),
        end_at: model.end_at,
        related_to: RelatedTo::from_columns(model.related_kind, model.related_id),
        responsible: Responsible {
            responsible: model.responsible_id,
        },
        audit: audit(
            model.created_by,
            model.created_at,
            model.updated_by,
            model.updated_at,
        ),
    }
}

pub fn meeting_to_active_model(record: &Meeting, is_new: bool) -> meeting::ActiveModel {
    let (created_by, created_at, updated_by, updated_at) = audit_values(&record.audit, is_new);
    let (related_kind, related_id) = RelatedTo::to_columns(&record.related_to);
    meeting::ActiveModel {
        id: id_value(record.id, is_new),
        name: Set(record.named.name.clone()),
        description: Set(record.desc.desc.clone()),
        status: Set(choice_value(&record.status)),
        location: Set(record.location.clone()),
        start_at: Set(record.start_at.unwrap_or_default()),
        end_at: Set(record.end_at),
        related_kind: Set(related_kind),
        related_id: Set(related_id),
        responsible_id: Set(record.responsible.responsible),
        created_by,
        created_at,
        updated_by,
        updated_at,
    }
}

pub fn model_to_task(model: task::Model) -> Task {
    Task {
        id: Some(model.id),
        named: Named { name: model.name },
        desc: Desc {
            desc: model.description,
        },
        status: Choice::from(model.status),
        priority: Choice::from(model.priority),
        start_at: model.start_at,
        due_at: model.due_at,
        related_to: RelatedTo::from_columns(model.related_kind, model.related_id),
        responsible: Responsible {
            responsible: model.responsible_id,
        },
        audit: audit(
            model.created_by,
            model.created_at,
            model.updated_by,
            model.updated_at,
        ),
    }
}

pub fn task_to_active_model(record: &Task, is_new: bool) -> task::ActiveModel {
    let (created_by, created_at, updated_by, updated_at) = audit_values(&record.audit, is_new);
    let (related_kind, related_id) = RelatedTo::to_columns(&record.related_to);
    task::ActiveModel {
        id: id_value(record.id, is_new),
        name: Set(record.named.name.clone()),
        description: Set(record.desc.desc.clone()),
        status: Set(choice_value(&record.status)),
        priority: Set(choice_value(&record.priority)),
        start_at: Set(record.start_at),
        due_at: Set(record.due_at),
        related_kind: Set(related_kind),
        related_id: Set(related_id),
        responsible_id: Set(record.responsible.responsible),
        created_by,
        created_at,
        updated_by,
        updated_at,
    }
}

pub fn model_to_note(model: note::Model) -> Note {
    Note {
        id: Some(model.id),
        named: Named { name: model.name },
        desc: Desc {
            desc: model.description,
        },
        attach: model.attach,
        related_to: RelatedTo::from_columns(model.related_kind, model.related_id),
        audit: audit(
            model.created_by,
            model.created_at,
            model.updated_by,
            model.updated_at,
        ),
    }
}

pub fn note_to_active_model(record: &Note, is_new: bool) -> note::ActiveModel {
    let (created_by, created_at, updated_by, updated_at) = audit_values(&record.audit, is_new);
    let (related_kind, related_id) = RelatedTo::to_columns(&record.related_to);
    note::ActiveModel {
        id: id_value(record.id, is_new),
        name: Set(record.named.name.clone()),
        description: Set(record.desc.desc.clone()),
        attach: Set(record.attach.clone().filter(|a| !a.trim().is_empty())),
        related_kind: Set(related_kind),
        related_id: Set(related_id),
        created_by,
        created_at,
        updated_by,
        updated_at,
    }
}

pub fn model_to_document(model: document::Model) -> Document {
    Document {
        id: Some(model.id),
        named: Named { name: model.name },
        desc: Desc {
            desc: model.description,
        },
        attach: model.attach,
        version: model.version,
        status: Choice::from(model.status),
        publish_date: model.publish_date,
        expiration_date: model.expiration_date,
        responsible: Responsible {
            responsible: model.responsible_id,
        },
        audit: audit(
            model.created_by,
            model.created_at,
            model.updated_by,
            model.updated_at,
        ),
    }
}

pub fn document_to_active_model(record: &Document, is_new: bool) -> document::ActiveModel {
    let (created_by, created_at, updated_by, updated_at) = audit_values(&record.audit, is_new);
    document::ActiveModel {
        id: id_value(record.id, is_new),
        name: Set(record.named.name.clone()),
        description: Set(record.desc.desc.clone()),
        attach: Set(record.attach.clone()),
        version: Set(record.version.clone()),
        status: Set(choice_value(&record.status)),
        publish_date: Set(record.publish_date),
        expiration_date: Set(record.expiration_date),
        responsible_id: Set(record.responsible.responsible),
        created_by,
        created_at,
        updated_by,
        updated_at,
    }
}

// ---- users ----

pub fn model_to_user(model: user::Model) -> UserAccount {
    UserAccount {
        id: model.id,
        username: model.username,
        password_hash: model.password_hash,
        is_active: model.is_active,
        created_at: model.created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::choices::{DealStage, Rating};
    use crate::domain::{EntityKind, Record};
    use chrono::{Duration, TimeZone};

    fn ts(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, hour, 0, 0).unwrap()
    }

    fn deal_model() -> deal::Model {
        deal::Model {
            id: 9,
            name: "Renewal".to_string(),
            description: String::new(),
            contractor_id: 4,
            campaign_id: None,
            amount: 1500.0,
            stage: "proposal".to_string(),
            probability: Some(60),
            closing_date: None,
            next_step: Some("Send quote".to_string()),
            source: None,
            responsible_id: Some(2),
            created_by: 1,
            created_at: ts(8),
            updated_by: 2,
            updated_at: ts(9),
        }
    }

    #[test]
    fn test_model_to_deal() {
        let deal = model_to_deal(deal_model());
        assert_eq!(deal.id(), Some(9));
        assert_eq!(deal.contractor, Some(4));
        assert_eq!(deal.amount, Some(1500.0));
        assert_eq!(deal.stage.parse(), Some(DealStage::Proposal));
        assert_eq!(deal.audit.created_by, Some(1));
        assert_eq!(deal.audit.updated_at, Some(ts(9)));
        assert!(deal.src.source.is_none());
    }

    #[test]
    fn test_deal_to_active_model_new_vs_update() {
        let deal = model_to_deal(deal_model());

        let new = deal_to_active_model(&deal, true);
        assert!(matches!(new.id, ActiveValue::NotSet));
        assert_eq!(new.created_by, ActiveValue::Set(1));
        assert_eq!(new.created_at, ActiveValue::Set(ts(8)));
        assert_eq!(new.stage, ActiveValue::Set("proposal".to_string()));

        let update = deal_to_active_model(&deal, false);
        assert_eq!(update.id, ActiveValue::Set(9));
        assert!(matches!(update.created_by, ActiveValue::NotSet));
        assert!(matches!(update.created_at, ActiveValue::NotSet));
        assert_eq!(update.updated_by, ActiveValue::Set(2));
        assert_eq!(update.updated_at, ActiveValue::Set(ts(9)));
    }

    #[test]
    fn test_blank_optional_choices_stored_as_null() {
        let contractor = Contractor {
            named: Named {
                name: "Acme".into(),
            },
            phone: "555-0100".into(),
            rating: Some(Choice::from("")),
            website: Some("  ".into()),
            audit: AuditStamp {
                created_by: Some(1),
                created_at: Some(ts(8)),
                ..Default::default()
            },
            ..Default::default()
        };
        let active = contractor_to_active_model(&contractor, true);
        assert_eq!(active.rating, ActiveValue::Set(None));
        assert_eq!(active.website, ActiveValue::Set(None));
        // updated_* 缺省时跟随 created_*
        assert_eq!(active.updated_by, ActiveValue::Set(1));
        assert_eq!(active.updated_at, ActiveValue::Set(ts(8)));

        let rated = Contractor {
            rating: Some(Choice::new(Rating::Hot)),
            ..contractor
        };
        assert_eq!(
            contractor_to_active_model(&rated, true).rating,
            ActiveValue::Set(Some("hot".to_string()))
        );
    }

    #[test]
    fn test_related_to_columns() {
        let call = PhoneCall {
            named: Named {
                name: "Follow-up".into(),
            },
            start_at: Some(ts(10)),
            end_at: Some(ts(10) + Duration::minutes(15)),
            related_to: Some(RelatedTo::new(EntityKind::Deal, 9)),
            ..Default::default()
        };
        let active = phone_call_to_active_model(&call, true);
        assert_eq!(active.related_kind, ActiveValue::Set(Some("deals".to_string())));
        assert_eq!(active.related_id, ActiveValue::Set(Some(9)));

        let model = phone_call::Model {
            id: 3,
            name: "Follow-up".into(),
            description: String::new(),
            direction: "outbound".into(),
            status: "held".into(),
            start_at: ts(10),
            end_at: None,
            related_kind: Some("deals".into()),
            related_id: None,
            responsible_id: None,
            created_by: 1,
            created_at: ts(10),
            updated_by: 1,
            updated_at: ts(10),
        };
        // 两列缺一视为无关联
        assert!(model_to_phone_call(model).related_to.is_none());
    }

    #[test]
    fn test_preliminary_row_keyed_by_contact() {
        let record = PreliminaryContact {
            status: Choice::from("assigned"),
            estimated_amount: Some(300.0),
            ..Default::default()
        };
        let active = preliminary_to_active_model(&record, 12);
        assert_eq!(active.contact_id, ActiveValue::Set(12));
        assert_eq!(active.status, ActiveValue::Set("assigned".to_string()));
    }
}
