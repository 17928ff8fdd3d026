//! 纯函数式字段校验
//!
//! 每个记录类型实现 [`Validate`]，用 [`Checker`] 逐字段累积 [`Violation`]。
//! 校验不访问数据库，也不会因第一个错误提前返回。

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display as StrumDisplay};

use super::choices::{Choice, ChoiceSet};
use crate::utils::{email_validator, url_validator};

/// 违反的约束类别
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, StrumDisplay,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ViolationCode {
    Required,
    MaxLength,
    InvalidChoice,
    InvalidUrl,
    InvalidEmail,
    OutOfRange,
    InvalidRange,
    InvalidPath,
    NotMember,
    Cycle,
}

/// 单个字段的约束违反
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub field: String,
    pub code: ViolationCode,
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, code: ViolationCode, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            code,
            message: message.into(),
        }
    }
}

pub trait Validate {
    fn validate(&self) -> Vec<Violation>;
}

/// 校验结果累积器
#[derive(Debug, Default)]
pub struct Checker {
    violations: Vec<Violation>,
}

impl Checker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, code: ViolationCode, message: impl Into<String>) {
        self.violations.push(Violation::new(field, code, message));
    }

    pub fn extend(&mut self, violations: impl IntoIterator<Item = Violation>) {
        self.violations.extend(violations);
    }

    /// 必填文本：去掉首尾空白后不能为空
    pub fn required(&mut self, field: &str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.push(field, ViolationCode::Required, "This field is required.");
        }
        self
    }

    pub fn required_value<T>(&mut self, field: &str, value: &Option<T>) -> &mut Self {
        if value.is_none() {
            self.push(field, ViolationCode::Required, "This field is required.");
        }
        self
    }

    /// 按字符数（而非字节数）限制长度
    pub fn max_len(&mut self, field: &str, value: &str, max: usize) -> &mut Self {
        let len = value.chars().count();
        if len > max {
            self.push(
                field,
                ViolationCode::MaxLength,
                format!(
                    "Ensure this value has at most {} characters (it has {}).",
                    max, len
                ),
            );
        }
        self
    }

    pub fn max_len_opt(&mut self, field: &str, value: Option<&str>, max: usize) -> &mut Self {
        if let Some(value) = value {
            self.max_len(field, value, max);
        }
        self
    }

    /// 必填且限长
    pub fn text(&mut self, field: &str, value: &str, max: usize) -> &mut Self {
        if value.trim().is_empty() {
            self.push(field, ViolationCode::Required, "This field is required.");
        } else {
            self.max_len(field, value, max);
        }
        self
    }

    /// 必填的选项字段
    pub fn choice<T: ChoiceSet>(&mut self, field: &str, value: &Choice<T>) -> &mut Self {
        if value.is_blank() {
            self.push(field, ViolationCode::Required, "This field is required.");
        } else if value.parse().is_none() {
            self.push_invalid_choice::<T>(field, value.raw());
        }
        self
    }

    /// 可选的选项字段，空字符串视为未填
    pub fn choice_opt<T: ChoiceSet>(&mut self, field: &str, value: &Option<Choice<T>>) -> &mut Self {
        if let Some(value) = value
            && !value.is_blank()
            && value.parse().is_none()
        {
            self.push_invalid_choice::<T>(field, value.raw());
        }
        self
    }

    fn push_invalid_choice<T: ChoiceSet>(&mut self, field: &str, raw: &str) {
        self.push(
            field,
            ViolationCode::InvalidChoice,
            format!(
                "Select a valid choice. '{}' is not one of: {}.",
                raw,
                T::VARIANTS.join(", ")
            ),
        );
    }

    pub fn non_negative(&mut self, field: &str, value: Option<f64>) -> &mut Self {
        if let Some(value) = value
            && !(value >= 0.0 && value.is_finite())
        {
            self.push(
                field,
                ViolationCode::OutOfRange,
                "Ensure this value is greater than or equal to 0.",
            );
        }
        self
    }

    /// 闭区间 [min, max]
    pub fn range<T>(&mut self, field: &str, value: Option<T>, min: T, max: T) -> &mut Self
    where
        T: PartialOrd + Display + Copy,
    {
        if let Some(value) = value
            && !(value >= min && value <= max)
        {
            self.push(
                field,
                ViolationCode::OutOfRange,
                format!("Ensure this value is between {} and {}.", min, max),
            );
        }
        self
    }

    /// end 不能早于 start，违反时记在 end 字段上
    pub fn ordered<T: PartialOrd>(
        &mut self,
        start_field: &str,
        start: Option<T>,
        end_field: &str,
        end: Option<T>,
    ) -> &mut Self {
        if let (Some(start), Some(end)) = (start, end)
            && end < start
        {
            self.push(
                end_field,
                ViolationCode::InvalidRange,
                format!("{} must not be earlier than {}.", end_field, start_field),
            );
        }
        self
    }

    /// 可选 http(s) URL，空字符串视为未填
    pub fn url(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        if let Some(value) = value.filter(|v| !v.trim().is_empty())
            && let Err(e) = url_validator::validate_url(value)
        {
            self.push(
                field,
                ViolationCode::InvalidUrl,
                url_validator::validation_error_message(&e),
            );
        }
        self
    }

    pub fn email(&mut self, field: &str, value: &str) -> &mut Self {
        if !value.trim().is_empty() && !email_validator::is_valid_email(value) {
            self.push(
                field,
                ViolationCode::InvalidEmail,
                "Enter a valid email address.",
            );
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn finish(self) -> Vec<Violation> {
        self.violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::choices::DealStage;

    fn codes(checker: Checker) -> Vec<(String, ViolationCode)> {
        checker
            .finish()
            .into_iter()
            .map(|v| (v.field, v.code))
            .collect()
    }

    #[test]
    fn test_required_rejects_blank() {
        let mut c = Checker::new();
        c.required("phone", "   ");
        c.required("name", "Acme");
        assert_eq!(codes(c), vec![("phone".to_string(), ViolationCode::Required)]);
    }

    #[test]
    fn test_max_len_counts_chars() {
        let mut c = Checker::new();
        c.max_len("city", "Zürich", 6);
        assert!(c.is_empty());
        c.max_len("city", "Zürich!", 6);
        assert_eq!(codes(c), vec![("city".to_string(), ViolationCode::MaxLength)]);
    }

    #[test]
    fn test_text_reports_required_before_length() {
        let mut c = Checker::new();
        c.text("name", "", 3);
        assert_eq!(codes(c), vec![("name".to_string(), ViolationCode::Required)]);
    }

    #[test]
    fn test_choice_required_and_invalid() {
        let mut c = Checker::new();
        c.choice::<DealStage>("stage", &Choice::from("NotAStage"));
        c.choice::<DealStage>("stage", &Choice::from(""));
        c.choice::<DealStage>("stage", &Choice::from("proposal"));
        let out = c.finish();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].code, ViolationCode::InvalidChoice);
        assert!(out[0].message.contains("closed_won"));
        assert_eq!(out[1].code, ViolationCode::Required);
    }

    #[test]
    fn test_choice_opt_allows_blank() {
        let mut c = Checker::new();
        c.choice_opt::<DealStage>("stage", &None);
        c.choice_opt::<DealStage>("stage", &Some(Choice::from("")));
        assert!(c.is_empty());
        c.choice_opt::<DealStage>("stage", &Some(Choice::from("won")));
        assert_eq!(codes(c), vec![("stage".to_string(), ViolationCode::InvalidChoice)]);
    }

    #[test]
    fn test_numeric_bounds() {
        let mut c = Checker::new();
        c.non_negative("amount", Some(-0.01));
        c.non_negative("amount", Some(f64::NAN));
        c.non_negative("amount", Some(0.0));
        c.range("probability", Some(101), 0, 100);
        c.range("probability", Some(100), 0, 100);
        c.range("latitude", Some(-90.5), -90.0, 90.0);
        let out = codes(c);
        assert_eq!(out.len(), 4);
        assert!(out.iter().all(|(_, code)| *code == ViolationCode::OutOfRange));
    }

    #[test]
    fn test_ordered_marks_end_field() {
        let mut c = Checker::new();
        c.ordered("start_date", Some(5), "end_date", Some(3));
        c.ordered("start_date", Some(5), "end_date", Some(5));
        c.ordered("start_date", None, "end_date", Some(3));
        assert_eq!(
            codes(c),
            vec![("end_date".to_string(), ViolationCode::InvalidRange)]
        );
    }

    #[test]
    fn test_url_and_email() {
        let mut c = Checker::new();
        c.url("website", Some("https://acme.example"));
        c.url("website", Some(""));
        c.url("website", None);
        c.email("email", "sales@acme.example");
        assert!(c.is_empty());

        c.url("website", Some("javascript:alert(1)"));
        c.email("email", "not-an-email");
        assert_eq!(
            codes(c),
            vec![
                ("website".to_string(), ViolationCode::InvalidUrl),
                ("email".to_string(), ViolationCode::InvalidEmail),
            ]
        );
    }

    #[test]
    fn test_violation_code_serializes_snake_case() {
        let json = serde_json::to_string(&ViolationCode::InvalidChoice).unwrap();
        assert_eq!(json, "\"invalid_choice\"");
        assert_eq!(ViolationCode::NotMember.as_ref(), "not_member");
    }
}
