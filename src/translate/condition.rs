//! Ingo condition → Zimbra test clause.
//!
//! A clause renders as `<subject> <operator> "<value>" `, e.g.
//! `address "From" all is "bar@baz.com" ` or `size over "3M" `.

use std::fmt;

use crate::model::rule::Condition;
use crate::model::vocabulary::{
    ADDRESS_FIELDS, LOWER_CASE_FIELDS, MATCHER_MAP, SIZE_FIELD, UNSUPPORTED_MATCHERS,
};

/// Why a condition was left out of its rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionSkip {
    EmptyField,
    EmptyValue,
    UnsupportedMatcher(String),
    /// Relational comparison on something other than message size.
    RelationalOnHeader(String),
    /// Message size compared with something other than over/under.
    SizeMatcher(String),
    /// Size operand with an unknown unit or no usable number.
    UnrecognisedSize(String),
}

impl fmt::Display for ConditionSkip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyField => f.write_str("it has no field"),
            Self::EmptyValue => f.write_str("it has no value"),
            Self::UnsupportedMatcher(m) => {
                write!(f, "Zimbra does not support the \"{m}\" comparison")
            }
            Self::RelationalOnHeader(m) => {
                write!(f, "the \"{m}\" comparison only applies to message size")
            }
            Self::SizeMatcher(m) => {
                write!(f, "message size cannot be compared with \"{m}\"")
            }
            Self::UnrecognisedSize(v) => write!(f, "the size \"{v}\" is not understood"),
        }
    }
}

/// A condition ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionClause {
    /// `size`, `address "From" all` or `header "X-Foo" `.
    pub subject: String,
    /// Zimbra comparison keyword.
    pub operator: String,
    /// Operand, already escaped or size-normalized, without quotes.
    pub value: String,
}

impl fmt::Display for ConditionClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} \"{}\" ", self.subject, self.operator, self.value)
    }
}

/// Translate one condition, or explain why it cannot be.
pub fn translate_condition(condition: &Condition) -> Result<ConditionClause, ConditionSkip> {
    if condition.field.is_empty() {
        return Err(ConditionSkip::EmptyField);
    }
    if condition.value.is_empty() {
        return Err(ConditionSkip::EmptyValue);
    }
    let matcher = condition.match_operator.as_str();
    if UNSUPPORTED_MATCHERS.contains(&matcher) {
        return Err(ConditionSkip::UnsupportedMatcher(matcher.to_string()));
    }

    let operator = translate_operator(matcher);
    let relational = matches!(operator, "over" | "under");

    if is_size_field(&condition.field) {
        if !relational {
            return Err(ConditionSkip::SizeMatcher(matcher.to_string()));
        }
        let value = normalize_size(&condition.value)
            .ok_or_else(|| ConditionSkip::UnrecognisedSize(condition.value.clone()))?;
        return Ok(ConditionClause {
            subject: subject_clause(&condition.field),
            operator: operator.to_string(),
            value,
        });
    }

    if relational {
        return Err(ConditionSkip::RelationalOnHeader(matcher.to_string()));
    }

    Ok(ConditionClause {
        subject: subject_clause(&condition.field),
        operator: operator.to_string(),
        value: escape_quotes(&condition.value),
    })
}

/// Whether a condition would survive [`translate_condition`].
pub fn is_usable(condition: &Condition) -> bool {
    translate_condition(condition).is_ok()
}

fn is_size_field(field: &str) -> bool {
    field.eq_ignore_ascii_case(SIZE_FIELD)
}

/// Render the test subject for a field name.
pub fn subject_clause(field: &str) -> String {
    if is_size_field(field) {
        return "size".to_string();
    }

    let lower = field.to_lowercase();
    let name = if LOWER_CASE_FIELDS.contains(&lower.as_str()) {
        lower.clone()
    } else {
        escape_quotes(field)
    };

    if ADDRESS_FIELDS.contains(&lower.as_str()) {
        format!("address \"{name}\" all")
    } else {
        format!("header \"{name}\" ")
    }
}

/// Map an Ingo comparison keyword to Zimbra's.
///
/// `begins with` and `ends with` have no Zimbra equivalent and widen to
/// `contains` (`not_contains` for the negated forms). Unknown keywords pass
/// through unchanged.
pub fn translate_operator(matcher: &str) -> &str {
    if let Some((_, zimbra)) = MATCHER_MAP.iter().find(|(ingo, _)| *ingo == matcher) {
        return *zimbra;
    }
    if matcher.ends_with(" with") {
        return if matcher.starts_with("not ") {
            "not_contains"
        } else {
            "contains"
        };
    }
    matcher
}

/// Normalize an Ingo size operand for Zimbra's integer size test.
///
/// Upper-cases, drops whitespace, reduces the unit to `K`, `M` or `G` (bytes
/// have no suffix) and rounds the number up so the test never matches less
/// than Ingo did: `0.01` → `1`, `2MB` → `2M`, `2.1 mb` → `3M`.
///
/// Returns `None` for units other than bytes, kilobytes, megabytes and
/// gigabytes, or when there is no number.
pub fn normalize_size(value: &str) -> Option<String> {
    let compact: String = value
        .to_uppercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    let split = compact
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(compact.len());
    let (number, unit) = compact.split_at(split);

    let unit = match unit {
        "" | "B" | "BYTE" | "BYTES" => "",
        "K" | "KB" | "KILOBYTE" | "KILOBYTES" => "K",
        "M" | "MB" | "MEGABYTE" | "MEGABYTES" => "M",
        "G" | "GB" | "GIGABYTE" | "GIGABYTES" => "G",
        _ => return None,
    };

    let magnitude: f64 = number.parse().ok()?;
    let rounded = magnitude.ceil();
    if !rounded.is_finite() || rounded > u64::MAX as f64 {
        return None;
    }

    Some(format!("{}{unit}", rounded as u64))
}

/// Escape every double quote not already preceded by a backslash.
pub fn escape_quotes(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    let mut prev_backslash = false;
    for c in value.chars() {
        if c == '"' && !prev_backslash {
            escaped.push('\\');
        }
        escaped.push(c);
        prev_backslash = c == '\\';
    }
    escaped
}
