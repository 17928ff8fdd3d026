//! 营销活动、商机、工单、项目

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::VariantNames;

use super::choices::{
    CampaignKind, CampaignStatus, Choice, CirculationKind, CirculationPriority,
    CirculationStatus, DealStage, Priority, ProjectStatus,
};
use super::kind::EntityKind;
use super::mixins::{AuditStamp, Desc, Named, Responsible, WithSrc};
use super::record::{FieldKind, FieldSpec, Record, record_basics};
use super::validation::{Checker, Validate, Violation};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketingCampaign {
    pub id: Option<i64>,
    #[serde(flatten)]
    pub named: Named,
    #[serde(flatten)]
    pub desc: Desc,
    pub status: Choice<CampaignStatus>,
    pub kind: Choice<CampaignKind>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub budget: Option<f64>,
    pub expected_cost: Option<f64>,
    pub actual_cost: Option<f64>,
    pub expected_revenue: Option<f64>,
    #[serde(flatten)]
    pub responsible: Responsible,
    #[serde(flatten)]
    pub audit: AuditStamp,
}

const CAMPAIGN_FIELDS: &[FieldSpec] = &[
    FieldSpec::new(
        "status",
        "Status",
        FieldKind::Choice {
            choices: CampaignStatus::VARIANTS,
        },
    )
    .required(),
    FieldSpec::new(
        "kind",
        "Type",
        FieldKind::Choice {
            choices: CampaignKind::VARIANTS,
        },
    )
    .required(),
    FieldSpec::new("start_date", "Start date", FieldKind::Date),
    FieldSpec::new("end_date", "End date", FieldKind::Date),
    FieldSpec::new("budget", "Budget", FieldKind::Decimal),
    FieldSpec::new("expected_cost", "Expected cost", FieldKind::Decimal),
    FieldSpec::new("actual_cost", "Actual cost", FieldKind::Decimal),
    FieldSpec::new("expected_revenue", "Expected revenue", FieldKind::Decimal),
];

impl Validate for MarketingCampaign {
    fn validate(&self) -> Vec<Violation> {
        let mut c = Checker::new();
        self.named.check(&mut c);
        c.choice("status", &self.status)
            .choice("kind", &self.kind)
            .ordered("start_date", self.start_date, "end_date", self.end_date)
            .non_negative("budget", self.budget)
            .non_negative("expected_cost", self.expected_cost)
            .non_negative("actual_cost", self.actual_cost)
            .non_negative("expected_revenue", self.expected_revenue);
        c.finish()
    }
}

impl Record for MarketingCampaign {
    const KIND: EntityKind = EntityKind::MarketingCampaign;

    record_basics!();

    fn fields() -> Vec<FieldSpec> {
        [
            Named::FIELDS,
            Desc::FIELDS,
            CAMPAIGN_FIELDS,
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
pub struct Deal {
    pub id: Option<i64>,
    #[serde(flatten)]
    pub named: Named,
    #[serde(flatten)]
    pub desc: Desc,
    pub contractor: Option<i64>,
    pub campaign: Option<i64>,
    pub amount: Option<f64>,
    pub stage: Choice<DealStage>,
    pub probability: Option<i32>,
    pub closing_date: Option<NaiveDate>,
    pub next_step: Option<String>,
    #[serde(flatten)]
    pub responsible: Responsible,
    #[serde(flatten)]
    pub src: WithSrc,
    #[serde(flatten)]
    pub audit: AuditStamp,
}

const DEAL_FIELDS: &[FieldSpec] = &[
    FieldSpec::new(
        "contractor",
        "Contractor",
        FieldKind::Reference {
            to: EntityKind::Contractor,
        },
    )
    .required(),
    FieldSpec::new(
        "campaign",
        "Campaign",
        FieldKind::Reference {
            to: EntityKind::MarketingCampaign,
        },
    ),
    FieldSpec::new("amount", "Amount", FieldKind::Decimal).required(),
    FieldSpec::new(
        "stage",
        "Stage",
        FieldKind::Choice {
            choices: DealStage::VARIANTS,
        },
    )
    .required(),
    FieldSpec::new("probability", "Probability (%)", FieldKind::Integer),
    FieldSpec::new("closing_date", "Expected close date", FieldKind::Date),
    FieldSpec::new("next_step", "Next step", FieldKind::Text).max_length(255),
];

impl Validate for Deal {
    fn validate(&self) -> Vec<Violation> {
        let mut c = Checker::new();
        self.named.check(&mut c);
        c.required_value("contractor", &self.contractor)
            .required_value("amount", &self.amount)
            .non_negative("amount", self.amount)
            .choice("stage", &self.stage)
            .range("probability", self.probability, 0, 100)
            .max_len_opt("next_step", self.next_step.as_deref(), 255);
        self.src.check(&mut c);
        c.finish()
    }
}

impl Record for Deal {
    const KIND: EntityKind = EntityKind::Deal;

    record_basics!();

    fn fields() -> Vec<FieldSpec> {
        [
            Named::FIELDS,
            Desc::FIELDS,
            DEAL_FIELDS,
            Responsible::FIELDS,
            WithSrc::FIELDS,
            AuditStamp::FIELDS,
        ]
        .concat()
    }

    fn display(&self) -> String {
        self.named.name.clone()
    }
}

/// 工单：挂在客户单位下的内部请求
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Circulation {
    pub id: Option<i64>,
    #[serde(flatten)]
    pub named: Named,
    #[serde(flatten)]
    pub desc: Desc,
    pub contractor: Option<i64>,
    pub priority: Choice<CirculationPriority>,
    pub status: Choice<CirculationStatus>,
    pub kind: Choice<CirculationKind>,
    pub resolution: Option<String>,
    #[serde(flatten)]
    pub responsible: Responsible,
    #[serde(flatten)]
    pub audit: AuditStamp,
}

const CIRCULATION_FIELDS: &[FieldSpec] = &[
    FieldSpec::new(
        "contractor",
        "Contractor",
        FieldKind::Reference {
            to: EntityKind::Contractor,
        },
    )
    .required(),
    FieldSpec::new(
        "priority",
        "Priority",
        FieldKind::Choice {
            choices: CirculationPriority::VARIANTS,
        },
    )
    .required(),
    FieldSpec::new(
        "status",
        "Status",
        FieldKind::Choice {
            choices: CirculationStatus::VARIANTS,
        },
    )
    .required(),
    FieldSpec::new(
        "kind",
        "Type",
        FieldKind::Choice {
            choices: CirculationKind::VARIANTS,
        },
    )
    .required(),
    FieldSpec::new("resolution", "Resolution", FieldKind::LongText),
];

impl Validate for Circulation {
    fn validate(&self) -> Vec<Violation> {
        let mut c = Checker::new();
        self.named.check(&mut c);
        c.required_value("contractor", &self.contractor)
            .choice("priority", &self.priority)
            .choice("status", &self.status)
            .choice("kind", &self.kind);
        c.finish()
    }
}

impl Record for Circulation {
    const KIND: EntityKind = EntityKind::Circulation;

    record_basics!();

    fn fields() -> Vec<FieldSpec> {
        [
            Named::FIELDS,
            Desc::FIELDS,
            CIRCULATION_FIELDS,
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
pub struct Project {
    pub id: Option<i64>,
    #[serde(flatten)]
    pub named: Named,
    #[serde(flatten)]
    pub desc: Desc,
    pub status: Choice<ProjectStatus>,
    pub priority: Option<Choice<Priority>>,
    pub contractor: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(flatten)]
    pub responsible: Responsible,
    #[serde(flatten)]
    pub audit: AuditStamp,
}

const PROJECT_FIELDS: &[FieldSpec] = &[
    FieldSpec::new(
        "status",
        "Status",
        FieldKind::Choice {
            choices: ProjectStatus::VARIANTS,
        },
    )
    .required(),
    FieldSpec::new(
        "priority",
        "Priority",
        FieldKind::Choice {
            choices: Priority::VARIANTS,
        },
    ),
    FieldSpec::new(
        "contractor",
        "Contractor",
        FieldKind::Reference {
            to: EntityKind::Contractor,
        },
    ),
    FieldSpec::new("start_date", "Start date", FieldKind::Date),
    FieldSpec::new("end_date", "End date", FieldKind::Date),
];

impl Validate for Project {
    fn validate(&self) -> Vec<Violation> {
        let mut c = Checker::new();
        self.named.check(&mut c);
        c.choice("status", &self.status)
            .choice_opt("priority", &self.priority)
            .ordered("start_date", self.start_date, "end_date", self.end_date);
        c.finish()
    }
}

impl Record for Project {
    const KIND: EntityKind = EntityKind::Project;

    record_basics!();

    fn fields() -> Vec<FieldSpec> {
        [
            Named::FIELDS,
            Desc::FIELDS,
            PROJECT_FIELDS,
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
    use crate::domain::ViolationCode;
    use serde_json::json;

    #[test]
    fn test_deal_rejects_unknown_stage() {
        let deal: Deal = serde_json::from_value(json!({
            "name": "Renewal",
            "contractor": 1,
            "amount": 1200.0,
            "stage": "NotAStage"
        }))
        .unwrap();
        let out = deal.validate();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].field, "stage");
        assert_eq!(out[0].code, ViolationCode::InvalidChoice);
    }

    #[test]
    fn test_deal_requires_amount_and_contractor() {
        let deal: Deal = serde_json::from_value(json!({
            "name": "Renewal",
            "stage": "proposal"
        }))
        .unwrap();
        let fields: Vec<String> = deal.validate().into_iter().map(|v| v.field).collect();
        assert_eq!(fields, vec!["contractor", "amount"]);
    }

    #[test]
    fn test_deal_probability_bounds() {
        let deal = Deal {
            named: Named { name: "X".into() },
            contractor: Some(1),
            amount: Some(0.0),
            stage: Choice::new(DealStage::ClosedWon),
            probability: Some(120),
            ..Default::default()
        };
        let out = deal.validate();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].field, "probability");
    }

    #[test]
    fn test_campaign_dates_must_be_ordered() {
        let campaign = MarketingCampaign {
            named: Named {
                name: "Spring".into(),
            },
            status: Choice::new(CampaignStatus::Planning),
            kind: Choice::new(CampaignKind::Email),
            start_date: NaiveDate::from_ymd_opt(2024, 5, 1),
            end_date: NaiveDate::from_ymd_opt(2024, 4, 1),
            ..Default::default()
        };
        let out = campaign.validate();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].field, "end_date");
        assert_eq!(out[0].code, ViolationCode::InvalidRange);
    }

    #[test]
    fn test_circulation_requires_all_choices() {
        let circulation = Circulation {
            named: Named {
                name: "Broken login".into(),
            },
            contractor: Some(3),
            ..Default::default()
        };
        let fields: Vec<String> = circulation
            .validate()
            .into_iter()
            .map(|v| v.field)
            .collect();
        assert_eq!(fields, vec!["priority", "status", "kind"]);
    }

    #[test]
    fn test_project_optional_priority() {
        let project = Project {
            named: Named {
                name: "Rollout".into(),
            },
            status: Choice::new(ProjectStatus::Draft),
            priority: Some(Choice::from("")),
            ..Default::default()
        };
        assert!(project.validate().is_empty());
    }
}
