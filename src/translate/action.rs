//! Ingo action → Zimbra action clause.

use std::fmt;

use crate::model::vocabulary::{Action, NOTIFY_BODY_PREFIX, NOTIFY_SUBJECT};

use super::condition::escape_quotes;

/// The action part of an `afrl` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionClause {
    /// Zimbra keyword(s), e.g. `keep fileinto`.
    pub keyword: &'static str,
    /// Quoted argument list, or empty for actions without arguments.
    pub value: String,
}

impl fmt::Display for ActionClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.keyword, self.value)
    }
}

/// Build the action clause for a rule.
///
/// `notify` takes three arguments: the address, a fixed subject and a body
/// naming the rule.
pub fn translate_action(action: Action, action_value: &str, rule_name: &str) -> ActionClause {
    let value = match action {
        Action::Notify => format!(
            "\"{}\" \"{NOTIFY_SUBJECT}\" \"{NOTIFY_BODY_PREFIX} \\\"{}\\\"\"",
            escape_quotes(action_value),
            escape_quotes(rule_name)
        ),
        _ if action.takes_value() => format!("\"{}\"", escape_quotes(action_value)),
        _ => String::new(),
    };

    ActionClause {
        keyword: action.as_zimbra(),
        value,
    }
}
