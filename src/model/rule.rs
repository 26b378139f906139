//! Ingo rule and condition records.

use serde::Serialize;

use crate::error::{ConvertError, Result};
use crate::serialize::PhpValue;

/// One Ingo filter rule as stored in the `rules` preference.
///
/// Codes are kept as text exactly as Ingo stored them; interpretation
/// happens in [`crate::translate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RuleRecord {
    /// Display name. Not unique within a mailbox.
    pub name: String,

    /// Ingo action code, e.g. `"2"` for "move to folder".
    pub action_code: String,

    /// Folder, address or flag the action applies to. `None` when not stored.
    pub action_value: Option<String>,

    /// `"1"` to require all conditions, `"2"` for any.
    pub combine_mode: String,

    /// Conditions in stored order.
    pub conditions: Vec<Condition>,

    /// Rendered as an inactive rule.
    pub disabled: bool,

    /// Stop evaluating further rules after this one matches.
    pub stop: bool,
}

/// A single test inside a rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Condition {
    /// Header name, or `Size` for the message size pseudo-field.
    pub field: String,

    /// Ingo comparison keyword, e.g. `"contains"` or `"greater than"`.
    pub match_operator: String,

    /// Comparison operand.
    pub value: String,
}

impl RuleRecord {
    /// The action value, or `""` when absent.
    pub fn action_value_str(&self) -> &str {
        self.action_value.as_deref().unwrap_or("")
    }

    /// Build a rule from one decoded entry of the rule list.
    pub fn from_php(value: &PhpValue, index: usize) -> Result<Self> {
        if value.as_array().is_none() {
            return Err(ConvertError::InvalidStructure(format!(
                "rule {index} is a {} instead of an array",
                value.type_name()
            )));
        }

        let conditions = match value.get("conditions") {
            None | Some(PhpValue::Null) => Vec::new(),
            Some(PhpValue::Array(entries)) => entries
                .iter()
                .enumerate()
                .map(|(i, (_, c))| Condition::from_php(c, index, i))
                .collect::<Result<Vec<_>>>()?,
            Some(other) => {
                return Err(ConvertError::InvalidStructure(format!(
                    "conditions of rule {index} are a {} instead of an array",
                    other.type_name()
                )))
            }
        };

        Ok(Self {
            name: text_field(value, "name"),
            action_code: text_field(value, "action"),
            action_value: value
                .get("action-value")
                .and_then(|v| v.as_text())
                .map(|v| v.into_owned()),
            combine_mode: text_field(value, "combine"),
            conditions,
            disabled: flag_field(value, "disable"),
            stop: flag_field(value, "stop"),
        })
    }
}

impl Condition {
    fn from_php(value: &PhpValue, rule: usize, index: usize) -> Result<Self> {
        if value.as_array().is_none() {
            return Err(ConvertError::InvalidStructure(format!(
                "condition {index} of rule {rule} is a {} instead of an array",
                value.type_name()
            )));
        }
        Ok(Self {
            field: text_field(value, "field"),
            match_operator: text_field(value, "match"),
            value: text_field(value, "value"),
        })
    }
}

/// Convert the decoded `rules` preference into rule records.
///
/// Anything other than an array at the top level is a structural error;
/// an empty array is a valid, empty rule list.
pub fn rules_from_value(value: &PhpValue) -> Result<Vec<RuleRecord>> {
    let entries = value.as_array().ok_or_else(|| {
        ConvertError::InvalidStructure(format!(
            "rule list is a {} instead of an array",
            value.type_name()
        ))
    })?;

    entries
        .iter()
        .enumerate()
        .map(|(i, (_, rule))| RuleRecord::from_php(rule, i))
        .collect()
}

fn text_field(value: &PhpValue, key: &str) -> String {
    value
        .get(key)
        .and_then(|v| v.as_text())
        .map(|v| v.into_owned())
        .unwrap_or_default()
}

/// Ingo writes flags as `b:1;`, `i:1;` or `s:1:"1";` depending on version.
fn flag_field(value: &PhpValue, key: &str) -> bool {
    match value.get(key) {
        Some(PhpValue::Bool(b)) => *b,
        Some(PhpValue::Int(i)) => *i == 1,
        Some(PhpValue::Str(s)) => s == "1",
        _ => false,
    }
}
