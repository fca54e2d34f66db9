//! Field validation rules
//!
//! Each schema entry carries an ordered chain of rules. Every rule in the
//! chain runs, so a field can report more than one message at once.

use crate::core::{AdminError, DATE_FORMAT, FieldValue, Result};
use chrono::NaiveDate;
use regex::Regex;
use std::fmt;

pub type RuleResult = std::result::Result<(), String>;

/// A single check applied to one field value.
pub trait ValidationRule: Send + Sync + fmt::Debug {
    fn validate(&self, value: &FieldValue) -> RuleResult;

    /// Rules other than `Required` skip blank values so optional fields
    /// may be left empty.
    fn applies_to_blank(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, Default)]
pub struct Required;

impl ValidationRule for Required {
    fn validate(&self, value: &FieldValue) -> RuleResult {
        if value.is_blank() {
            Err("is required".to_string())
        } else {
            Ok(())
        }
    }

    fn applies_to_blank(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone)]
pub struct MinLength(pub usize);

impl ValidationRule for MinLength {
    fn validate(&self, value: &FieldValue) -> RuleResult {
        let len = value.to_string().chars().count();
        if len < self.0 {
            Err(format!("must have at least {} characters", self.0))
        } else {
            Ok(())
        }
    }
}

#[derive(Debug, Clone)]
pub struct MaxLength(pub usize);

impl ValidationRule for MaxLength {
    fn validate(&self, value: &FieldValue) -> RuleResult {
        let len = value.to_string().chars().count();
        if len > self.0 {
            Err(format!("must have at most {} characters", self.0))
        } else {
            Ok(())
        }
    }
}

#[derive(Debug, Clone)]
pub struct Min(pub f64);

impl ValidationRule for Min {
    fn validate(&self, value: &FieldValue) -> RuleResult {
        match value.as_f64() {
            Some(n) if n >= self.0 => Ok(()),
            Some(_) => Err(format!("must be at least {}", FieldValue::Number(self.0))),
            None => Err("must be a number".to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Max(pub f64);

impl ValidationRule for Max {
    fn validate(&self, value: &FieldValue) -> RuleResult {
        match value.as_f64() {
            Some(n) if n <= self.0 => Ok(()),
            Some(_) => Err(format!("must be at most {}", FieldValue::Number(self.0))),
            None => Err("must be a number".to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
    message: String,
}

impl Pattern {
    pub fn new(pattern: &str, message: impl Into<String>) -> Result<Self> {
        let regex = Regex::new(pattern)
            .map_err(|e| AdminError::Schema(format!("invalid pattern '{}': {}", pattern, e)))?;
        Ok(Self {
            regex,
            message: message.into(),
        })
    }
}

impl ValidationRule for Pattern {
    fn validate(&self, value: &FieldValue) -> RuleResult {
        if self.regex.is_match(&value.to_string()) {
            Ok(())
        } else {
            Err(self.message.clone())
        }
    }
}

/// Added automatically for select fields.
#[derive(Debug, Clone)]
pub struct OneOf(pub Vec<String>);

impl ValidationRule for OneOf {
    fn validate(&self, value: &FieldValue) -> RuleResult {
        let raw = value.to_string();
        if self.0.iter().any(|option| *option == raw) {
            Ok(())
        } else {
            Err(format!("must be one of: {}", self.0.join(", ")))
        }
    }
}

/// Added automatically for date fields.
#[derive(Debug, Clone, Default)]
pub struct IsoDate;

impl ValidationRule for IsoDate {
    fn validate(&self, value: &FieldValue) -> RuleResult {
        match value {
            FieldValue::Date(_) => Ok(()),
            FieldValue::Text(s) if NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).is_ok() => {
                Ok(())
            }
            _ => Err("must be a date (YYYY-MM-DD)".to_string()),
        }
    }
}
