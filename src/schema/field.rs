use super::rules::{
    IsoDate, Max, MaxLength, Min, MinLength, OneOf, Pattern, Required, ValidationRule,
};
use crate::core::{DATE_FORMAT, FieldValue, Result};
use chrono::NaiveDate;
use regex::Regex;
use std::sync::{Arc, LazyLock};

static LEADING_FLOAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").expect("static float pattern")
});

/// Parses the longest numeric prefix of `raw`, falling back to `0`.
///
/// `"12.5kg"` reads as `12.5`, `"abc"` and `""` read as `0`.
pub fn lenient_number(raw: &str) -> f64 {
    LEADING_FLOAT
        .find(raw.trim_start())
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|n| n.is_finite())
        .unwrap_or(0.0)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Text,
    Number,
    Select { options: Vec<SelectOption> },
    Date,
}

impl FieldKind {
    /// Turns raw form input into a draft value.
    pub fn coerce(&self, raw: &str) -> FieldValue {
        match self {
            FieldKind::Text | FieldKind::Select { .. } => FieldValue::Text(raw.to_string()),
            FieldKind::Number => FieldValue::Number(lenient_number(raw)),
            FieldKind::Date => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return FieldValue::Null;
                }
                match NaiveDate::parse_from_str(trimmed, DATE_FORMAT) {
                    Ok(date) => FieldValue::Date(date),
                    Err(_) => FieldValue::Text(raw.to_string()),
                }
            }
        }
    }

    pub fn input_type(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Number => "number",
            FieldKind::Select { .. } => "select",
            FieldKind::Date => "date",
        }
    }

    fn implicit_rule(&self) -> Option<Arc<dyn ValidationRule>> {
        match self {
            FieldKind::Select { options } => Some(Arc::new(OneOf(
                options.iter().map(|o| o.value.clone()).collect(),
            ))),
            FieldKind::Date => Some(Arc::new(IsoDate)),
            _ => None,
        }
    }
}

/// One editable field: how it is labelled, what input it uses, and which
/// rules its value must satisfy.
#[derive(Debug, Clone)]
pub struct FieldSchemaEntry {
    pub key: String,
    pub label: String,
    pub kind: FieldKind,
    rules: Vec<Arc<dyn ValidationRule>>,
}

impl FieldSchemaEntry {
    pub fn new(key: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        let rules = kind.implicit_rule().into_iter().collect();
        Self {
            key: key.into(),
            label: label.into(),
            kind,
            rules,
        }
    }

    pub fn text(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(key, label, FieldKind::Text)
    }

    pub fn number(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(key, label, FieldKind::Number)
    }

    pub fn select(
        key: impl Into<String>,
        label: impl Into<String>,
        options: Vec<SelectOption>,
    ) -> Self {
        Self::new(key, label, FieldKind::Select { options })
    }

    pub fn date(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(key, label, FieldKind::Date)
    }

    /// `Required` always runs first.
    pub fn required(mut self) -> Self {
        self.rules.insert(0, Arc::new(Required));
        self
    }

    pub fn min_length(self, n: usize) -> Self {
        self.rule(MinLength(n))
    }

    pub fn max_length(self, n: usize) -> Self {
        self.rule(MaxLength(n))
    }

    pub fn min(self, n: f64) -> Self {
        self.rule(Min(n))
    }

    pub fn max(self, n: f64) -> Self {
        self.rule(Max(n))
    }

    pub fn pattern(self, pattern: &str, message: impl Into<String>) -> Result<Self> {
        Ok(self.rule(Pattern::new(pattern, message)?))
    }

    pub fn rule<R: ValidationRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    pub fn is_required(&self) -> bool {
        self.rules.iter().any(|r| r.applies_to_blank())
    }

    pub fn coerce(&self, raw: &str) -> FieldValue {
        self.kind.coerce(raw)
    }

    /// Messages for every failing rule, in rule order.
    pub fn check(&self, value: &FieldValue) -> Vec<String> {
        let blank = value.is_blank();
        self.rules
            .iter()
            .filter(|rule| !blank || rule.applies_to_blank())
            .filter_map(|rule| rule.validate(value).err())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lenient_number_matches_parse_float() {
        assert_eq!(lenient_number("abc"), 0.0);
        assert_eq!(lenient_number(""), 0.0);
        assert_eq!(lenient_number("12.5kg"), 12.5);
        assert_eq!(lenient_number("  -3"), -3.0);
        assert_eq!(lenient_number(".5"), 0.5);
        assert_eq!(lenient_number("1e3"), 1000.0);
        assert_eq!(lenient_number("1,5"), 1.0);
    }

    #[test]
    fn test_coerce_by_kind() {
        assert_eq!(FieldKind::Number.coerce("abc"), FieldValue::Number(0.0));
        assert_eq!(FieldKind::Text.coerce(" a "), FieldValue::from(" a "));
        assert_eq!(
            FieldKind::Date.coerce("2025-01-02"),
            FieldValue::Date(NaiveDate::from_ymd_opt(2025, 1, 2).unwrap())
        );
        assert_eq!(FieldKind::Date.coerce("amanhã"), FieldValue::from("amanhã"));
        assert_eq!(FieldKind::Date.coerce(" "), FieldValue::Null);
    }

    #[test]
    fn test_optional_field_skips_rules_when_blank() {
        let entry = FieldSchemaEntry::text("email", "E-mail").min_length(5);
        assert!(entry.check(&FieldValue::from("")).is_empty());
        assert_eq!(entry.check(&FieldValue::from("a@b")).len(), 1);
    }

    #[test]
    fn test_required_runs_before_other_rules() {
        let entry = FieldSchemaEntry::text("nome", "Nome")
            .min_length(2)
            .required();
        assert!(entry.is_required());
        assert_eq!(entry.check(&FieldValue::from("")), vec!["is required"]);
    }

    #[test]
    fn test_select_gets_one_of_rule() {
        let entry = FieldSchemaEntry::select(
            "payment",
            "Pagamento",
            vec![SelectOption::new("pix", "PIX"), SelectOption::new("cash", "Dinheiro")],
        );
        assert!(entry.check(&FieldValue::from("pix")).is_empty());
        assert_eq!(entry.check(&FieldValue::from("boleto")).len(), 1);
        assert_eq!(entry.kind.input_type(), "select");
    }
}
