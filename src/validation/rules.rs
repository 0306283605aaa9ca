//! Field validators

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

/// Why a field was rejected
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", rename_all = "camelCase")]
pub enum Rule {
    Required,
    Email,
    MinLength { min: usize },
    Min { min: i64 },
    Max { max: i64 },
    Number,
    Integer,
    Invalid,
    Date,
    Time,
    Mismatch { other: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    #[serde(flatten)]
    pub rule: Rule,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = self.field;
        match &self.rule {
            Rule::Required => write!(f, "{field} is required"),
            Rule::Email => write!(f, "{field} must be a valid email address"),
            Rule::MinLength { min } => write!(f, "{field} must be at least {min} characters"),
            Rule::Min { min } => write!(f, "{field} must be at least {min}"),
            Rule::Max { max } => write!(f, "{field} must be at most {max}"),
            Rule::Number => write!(f, "{field} must be a number"),
            Rule::Integer => write!(f, "{field} must be a whole number"),
            Rule::Invalid => write!(f, "{field} is not a valid value"),
            Rule::Date => write!(f, "{field} must be a date (YYYY-MM-DD)"),
            Rule::Time => write!(f, "{field} must be a time (HH:mm)"),
            Rule::Mismatch { other } => write!(f, "{field} does not match {other}"),
        }
    }
}

/// Every problem found in one form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &'static str, rule: Rule) {
        self.errors.push(FieldError { field, rule });
    }

    /// Run a check and keep its error, if any
    pub fn check<T>(&mut self, field: &'static str, result: Result<T, Rule>) -> &mut Self {
        if let Err(rule) = result {
            self.push(field, rule);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn has(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// Rule that rejected `field`, if any
    pub fn rule_for(&self, field: &str) -> Option<&Rule> {
        self.errors.iter().find(|e| e.field == field).map(|e| &e.rule)
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.errors.iter().map(ToString::to_string).collect();
        f.write_str(&messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*$")
        .expect("email pattern compiles")
});

pub fn required(value: &str) -> Result<(), Rule> {
    if value.trim().is_empty() {
        Err(Rule::Required)
    } else {
        Ok(())
    }
}

pub fn required_some<T>(value: &Option<T>) -> Result<(), Rule> {
    value.as_ref().map(|_| ()).ok_or(Rule::Required)
}

/// Required, then well-formed
pub fn email(value: &str) -> Result<(), Rule> {
    required(value)?;
    let value = value.trim();
    let domain_ok = value
        .rsplit_once('@')
        .is_some_and(|(local, domain)| local.len() <= 64 && domain.len() <= 255);
    if domain_ok && EMAIL_PATTERN.is_match(value) {
        Ok(())
    } else {
        Err(Rule::Email)
    }
}

pub fn min_length(value: &str, min: usize) -> Result<(), Rule> {
    if value.chars().count() < min {
        Err(Rule::MinLength { min })
    } else {
        Ok(())
    }
}

pub fn min(value: f64, min: i64) -> Result<(), Rule> {
    if value < min as f64 {
        Err(Rule::Min { min })
    } else {
        Ok(())
    }
}

pub fn max(value: f64, max: i64) -> Result<(), Rule> {
    if value > max as f64 {
        Err(Rule::Max { max })
    } else {
        Ok(())
    }
}

/// Required and parseable as a number
pub fn number(value: &str) -> Result<f64, Rule> {
    required(value)?;
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or(Rule::Number)
}

/// Required and parseable as a whole number, as ids are
pub fn integer(value: &str) -> Result<i64, Rule> {
    required(value)?;
    value.trim().parse::<i64>().map_err(|_| Rule::Integer)
}

/// Required `YYYY-MM-DD`
pub fn date(value: &str) -> Result<NaiveDate, Rule> {
    required(value)?;
    let value = value.trim();
    if value.len() != 10 {
        return Err(Rule::Date);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| Rule::Date)
}

/// Required `HH:mm`
pub fn time(value: &str) -> Result<NaiveTime, Rule> {
    required(value)?;
    let value = value.trim();
    if value.len() != 5 {
        return Err(Rule::Time);
    }
    NaiveTime::parse_from_str(value, "%H:%M").map_err(|_| Rule::Time)
}
