//! 选项枚举
//!
//! 数据库里以字符串保存；[`Choice`] 保留客户端提交的原始值，
//! 非法取值在校验阶段作为 `invalid_choice` 返回，而不是反序列化失败。

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString, VariantNames};

/// 可作为选项字段取值的枚举
pub trait ChoiceSet: FromStr + AsRef<str> + VariantNames {}

impl<T: FromStr + AsRef<str> + VariantNames> ChoiceSet for T {}

/// 选项字段值
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
pub struct Choice<T> {
    raw: String,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

impl<T> Choice<T> {
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn is_blank(&self) -> bool {
        self.raw.trim().is_empty()
    }
}

impl<T: ChoiceSet> Choice<T> {
    pub fn new(value: T) -> Self {
        Self::from(value.as_ref())
    }

    pub fn parse(&self) -> Option<T> {
        T::from_str(&self.raw).ok()
    }

    pub fn is_valid(&self) -> bool {
        self.parse().is_some()
    }
}

impl<T> From<&str> for Choice<T> {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_string())
    }
}

impl<T> From<String> for Choice<T> {
    fn from(raw: String) -> Self {
        Self {
            raw,
            _marker: PhantomData,
        }
    }
}

// 手写 impl，避免 derive 给 T 加上多余的 trait bound
impl<T> Clone for Choice<T> {
    fn clone(&self) -> Self {
        Self::from(self.raw.clone())
    }
}

impl<T> Default for Choice<T> {
    fn default() -> Self {
        Self::from(String::new())
    }
}

impl<T> PartialEq for Choice<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<T> Eq for Choice<T> {}

impl<T> fmt::Debug for Choice<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Choice({:?})", self.raw)
    }
}

/// 可选的选项字段：空字符串视为未填
pub fn optional_raw<T>(value: &Option<Choice<T>>) -> Option<String> {
    value
        .as_ref()
        .filter(|c| !c.is_blank())
        .map(|c| c.raw().to_string())
}

macro_rules! choice_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
            EnumString, AsRefStr, VariantNames, EnumIter,
        )]
        #[serde(rename_all = "snake_case")]
        #[strum(serialize_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }
    };
}

choice_enum!(
    /// 线索来源
    LeadSource {
        ColdCall,
        ExistingCustomer,
        SelfGenerated,
        Employee,
        Partner,
        PublicRelations,
        DirectMail,
        Conference,
        TradeShow,
        WebSite,
        WordOfMouth,
        Email,
        Campaign,
        Other,
    }
);

choice_enum!(
    /// 行业
    Industry {
        Apparel,
        Banking,
        Biotechnology,
        Chemicals,
        Communications,
        Construction,
        Consulting,
        Education,
        Electronics,
        Energy,
        Engineering,
        Entertainment,
        Environmental,
        Finance,
        FoodAndBeverage,
        Government,
        Healthcare,
        Hospitality,
        Insurance,
        Machinery,
        Manufacturing,
        Media,
        NotForProfit,
        Recreation,
        Retail,
        Shipping,
        Technology,
        Telecommunications,
        Transportation,
        Utilities,
        Other,
    }
);

choice_enum!(
    ContractorKind {
        Analyst,
        Competitor,
        Customer,
        Integrator,
        Investor,
        Partner,
        Press,
        Prospect,
        Reseller,
        Other,
    }
);

choice_enum!(Rating { Hot, Warm, Cold });

choice_enum!(Salutation { Mr, Ms, Mrs, Dr, Prof });

choice_enum!(
    /// 潜在联系人（线索）状态
    PreliminaryStatus {
        New,
        Assigned,
        InProcess,
        Converted,
        Recycled,
        Dead,
    }
);

choice_enum!(
    CampaignStatus {
        Planning,
        Active,
        Inactive,
        Complete,
        InQueue,
        Sending,
    }
);

choice_enum!(
    CampaignKind {
        Telesales,
        Mail,
        Email,
        Print,
        Web,
        Radio,
        Television,
        Newsletter,
    }
);

choice_enum!(
    /// 商机阶段
    DealStage {
        Prospecting,
        Qualification,
        NeedsAnalysis,
        ValueProposition,
        DecisionMakers,
        PerceptionAnalysis,
        Proposal,
        Negotiation,
        ClosedWon,
        ClosedLost,
    }
);

choice_enum!(CirculationPriority { Low, Medium, High, Urgent });

choice_enum!(
    CirculationStatus {
        New,
        Assigned,
        PendingInput,
        Closed,
        Rejected,
        Duplicate,
    }
);

choice_enum!(CirculationKind { Question, Problem, FeatureRequest });

choice_enum!(CallDirection { Inbound, Outbound });

choice_enum!(
    /// 电话、会议状态
    ActivityStatus { Planned, Held, NotHeld }
);

choice_enum!(
    TaskStatus {
        NotStarted,
        InProgress,
        Completed,
        PendingInput,
        Deferred,
    }
);

choice_enum!(Priority { Low, Medium, High });

choice_enum!(
    DocumentStatus {
        Draft,
        UnderReview,
        Active,
        Pending,
        Expired,
        Canceled,
    }
);

choice_enum!(ProjectStatus { Draft, InReview, Published, Closed });

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_snake_case_forms() {
        assert_eq!(DealStage::ClosedWon.as_ref(), "closed_won");
        assert_eq!(Industry::FoodAndBeverage.as_ref(), "food_and_beverage");
        assert_eq!("needs_analysis".parse::<DealStage>(), Ok(DealStage::NeedsAnalysis));
        assert!("NotAStage".parse::<DealStage>().is_err());
        assert!("ClosedWon".parse::<DealStage>().is_err());
    }

    #[test]
    fn test_variant_names_match_iteration() {
        let names: Vec<String> = TaskStatus::iter().map(|s| s.as_ref().to_string()).collect();
        assert_eq!(names, TaskStatus::VARIANTS);
        assert_eq!(LeadSource::VARIANTS.len(), 14);
        assert_eq!(Industry::VARIANTS.len(), 31);
    }

    #[test]
    fn test_choice_keeps_raw_value() {
        let choice: Choice<TaskStatus> = serde_json::from_str("\"sleeping\"").unwrap();
        assert_eq!(choice.raw(), "sleeping");
        assert!(!choice.is_valid());
        assert_eq!(serde_json::to_string(&choice).unwrap(), "\"sleeping\"");

        let choice = Choice::new(TaskStatus::InProgress);
        assert_eq!(choice.raw(), "in_progress");
        assert_eq!(choice.parse(), Some(TaskStatus::InProgress));
    }

    #[test]
    fn test_optional_raw_drops_blank() {
        assert_eq!(optional_raw::<Rating>(&None), None);
        assert_eq!(optional_raw::<Rating>(&Some(Choice::from("  "))), None);
        assert_eq!(
            optional_raw::<Rating>(&Some(Choice::from("hot"))),
            Some("hot".to_string())
        );
    }
}
