//! Decides which Ingo rules are carried over to Zimbra.
//!
//! Checks run in a fixed order and the first failing check names the skip
//! reason, so the diagnostics for a given rule set are always the same.

use std::fmt;

use crate::model::rule::RuleRecord;
use crate::model::vocabulary::{
    Action, CombineMode, DEFAULT_RULE_NAMES, FLAG_ACTION_CODE, SMS_NOTIFY_ACTION_CODE,
};
use crate::script::Diagnostics;

use super::condition::is_usable;

/// Why a rule was not converted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Whitelist, Blacklist, Vacation or Forward.
    DefaultRule,
    SmsNotification,
    FlagAction,
    UnsupportedAction(String),
    MissingActionValue,
    NoValidConditions,
    /// Ingo's stock spam rule, which Zimbra already applies.
    RedundantSpam,
    UnsupportedCombine(String),
}

impl SkipReason {
    /// Operator-facing message for a rule with this name.
    pub fn describe(&self, name: &str) -> String {
        match self {
            Self::DefaultRule => format!("Skipping Ingo default rule \"{name}\""),
            Self::SmsNotification => format!("Skipping SMS notification rule \"{name}\""),
            Self::FlagAction => format!(
                "Skipping flag rule \"{name}\" because Zimbra rejects flag rules, \
                 even though they are claimed to be valid in the documentation"
            ),
            Self::UnsupportedAction(code) => {
                format!("Skipping rule \"{name}\" which requires unsupported action {code}")
            }
            Self::MissingActionValue => format!(
                "Skipping rule \"{name}\" because it requires an action value but provided none"
            ),
            Self::NoValidConditions => {
                format!("Skipping rule \"{name}\" because it has no valid conditions")
            }
            Self::RedundantSpam => format!("Skipping redundant spam rule \"{name}\""),
            Self::UnsupportedCombine(code) => {
                format!("Skipping rule \"{name}\" which uses unsupported combine mode {code}")
            }
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::DefaultRule => "Ingo default rule",
            Self::SmsNotification => "SMS notification",
            Self::FlagAction => "flag action",
            Self::UnsupportedAction(_) => "unsupported action",
            Self::MissingActionValue => "missing action value",
            Self::NoValidConditions => "no valid conditions",
            Self::RedundantSpam => "redundant spam rule",
            Self::UnsupportedCombine(_) => "unsupported combine mode",
        };
        f.write_str(text)
    }
}

/// Run every check against `rule`; `Err` carries the first failure.
pub fn check_rule(rule: &RuleRecord) -> Result<(), SkipReason> {
    if DEFAULT_RULE_NAMES.contains(&rule.name.as_str()) {
        return Err(SkipReason::DefaultRule);
    }

    match rule.action_code.as_str() {
        SMS_NOTIFY_ACTION_CODE => return Err(SkipReason::SmsNotification),
        FLAG_ACTION_CODE => return Err(SkipReason::FlagAction),
        _ => {}
    }

    let action = Action::from_code(&rule.action_code)
        .ok_or_else(|| SkipReason::UnsupportedAction(rule.action_code.clone()))?;

    if action.requires_value() && rule.action_value_str().is_empty() {
        return Err(SkipReason::MissingActionValue);
    }

    if !rule.conditions.iter().any(is_usable) {
        return Err(SkipReason::NoValidConditions);
    }

    if is_redundant_spam_rule(rule) {
        return Err(SkipReason::RedundantSpam);
    }

    if CombineMode::from_code(&rule.combine_mode).is_none() {
        return Err(SkipReason::UnsupportedCombine(rule.combine_mode.clone()));
    }

    Ok(())
}

/// [`check_rule`] as a predicate, noting the skip reason when it fails.
pub fn is_eligible(rule: &RuleRecord, diagnostics: &mut Diagnostics) -> bool {
    match check_rule(rule) {
        Ok(()) => true,
        Err(reason) => {
            tracing::debug!(rule = %rule.name, %reason, "Rule skipped");
            diagnostics.note(reason.describe(&rule.name));
            false
        }
    }
}

/// Ingo's stock "spam" rule: file `X-Spam-Flag: YES` into `INBOX.spam`.
fn is_redundant_spam_rule(rule: &RuleRecord) -> bool {
    let [condition] = rule.conditions.as_slice() else {
        return false;
    };

    rule.name == "spam"
        && rule.combine_mode == "1"
        && condition.field == "X-Spam-Flag"
        && condition.match_operator == "contains"
        && condition.value == "YES"
        && rule.action_code == "2"
        && rule.action_value_str() == "INBOX.spam"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::rule::Condition;

    fn rule(name: &str, action: &str, value: Option<&str>) -> RuleRecord {
        RuleRecord {
            name: name.to_string(),
            action_code: action.to_string(),
            action_value: value.map(str::to_string),
            combine_mode: "1".to_string(),
            conditions: vec![Condition {
                field: "From".to_string(),
                match_operator: "contains".to_string(),
                value: "example.com".to_string(),
            }],
            disabled: false,
            stop: false,
        }
    }

    fn spam_rule() -> RuleRecord {
        RuleRecord {
            name: "spam".to_string(),
            action_code: "2".to_string(),
            action_value: Some("INBOX.spam".to_string()),
            combine_mode: "1".to_string(),
            conditions: vec![Condition {
                field: "X-Spam-Flag".to_string(),
                match_operator: "contains".to_string(),
                value: "YES".to_string(),
            }],
            disabled: false,
            stop: true,
        }
    }

    #[test]
    fn test_plain_rule_is_eligible() {
        assert_eq!(check_rule(&rule("Lists", "1", None)), Ok(()));
    }

    #[test]
    fn test_default_rules_always_rejected() {
        for name in DEFAULT_RULE_NAMES {
            for action in ["1", "2", "4", "13", "99"] {
                let r = rule(name, action, Some("x"));
                assert_eq!(check_rule(&r), Err(SkipReason::DefaultRule), "{name}/{action}");
            }
        }
    }

    #[test]
    fn test_hard_excluded_actions() {
        assert_eq!(
            check_rule(&rule("txt", "14", Some("555"))),
            Err(SkipReason::SmsNotification)
        );
        assert_eq!(
            check_rule(&rule("flag", "12", Some("\\Flagged"))),
            Err(SkipReason::FlagAction)
        );
    }

    #[test]
    fn test_unknown_action() {
        assert_eq!(
            check_rule(&rule("v", "7", None)),
            Err(SkipReason::UnsupportedAction("7".to_string()))
        );
        assert_eq!(
            check_rule(&rule("v", "", None)),
            Err(SkipReason::UnsupportedAction(String::new()))
        );
    }

    #[test]
    fn test_action_value_gating() {
        for action in ["2", "4", "11"] {
            assert_eq!(
                check_rule(&rule("r", action, Some(""))),
                Err(SkipReason::MissingActionValue)
            );
            assert_eq!(
                check_rule(&rule("r", action, None)),
                Err(SkipReason::MissingActionValue)
            );
            assert_eq!(check_rule(&rule("r", action, Some("INBOX.x"))), Ok(()));
        }
        // Keep-and-redirect and notify are not gated.
        assert_eq!(check_rule(&rule("r", "5", None)), Ok(()));
    }

    #[test]
    fn test_no_valid_conditions() {
        let mut r = rule("r", "1", None);
        r.conditions.clear();
        assert_eq!(check_rule(&r), Err(SkipReason::NoValidConditions));

        r.conditions.push(Condition {
            field: "Subject".to_string(),
            match_operator: "regex".to_string(),
            value: "^x".to_string(),
        });
        r.conditions.push(Condition {
            field: "To".to_string(),
            match_operator: "contains".to_string(),
            value: String::new(),
        });
        assert_eq!(check_rule(&r), Err(SkipReason::NoValidConditions));

        r.conditions.push(Condition {
            field: "To".to_string(),
            match_operator: "contains".to_string(),
            value: "me".to_string(),
        });
        assert_eq!(check_rule(&r), Ok(()));
    }

    #[test]
    fn test_redundant_spam_rule() {
        assert_eq!(check_rule(&spam_rule()), Err(SkipReason::RedundantSpam));

        let mut other_folder = spam_rule();
        other_folder.action_value = Some("INBOX.Junk".to_string());
        assert_eq!(check_rule(&other_folder), Ok(()));

        let mut any = spam_rule();
        any.combine_mode = "2".to_string();
        assert_eq!(check_rule(&any), Ok(()));

        let mut renamed = spam_rule();
        renamed.name = "Spam".to_string();
        assert_eq!(check_rule(&renamed), Ok(()));

        let mut two_conditions = spam_rule();
        two_conditions.conditions.push(Condition {
            field: "Subject".to_string(),
            match_operator: "contains".to_string(),
            value: "[SPAM]".to_string(),
        });
        assert_eq!(check_rule(&two_conditions), Ok(()));
    }

    #[test]
    fn test_unsupported_combine_mode() {
        let mut r = rule("r", "1", None);
        r.combine_mode = "3".to_string();
        assert_eq!(
            check_rule(&r),
            Err(SkipReason::UnsupportedCombine("3".to_string()))
        );
    }

    #[test]
    fn test_check_order_is_stable() {
        // A default-named flag rule with no conditions reports the name first.
        let mut r = rule("Forward", "12", None);
        r.conditions.clear();
        assert_eq!(check_rule(&r), Err(SkipReason::DefaultRule));
    }

    #[test]
    fn test_is_eligible_notes_reason() {
        let mut diag = Diagnostics::new();
        assert!(is_eligible(&rule("Lists", "1", None), &mut diag));
        assert!(diag.is_empty());

        assert!(!is_eligible(&rule("Vacation", "1", None), &mut diag));
        assert!(!is_eligible(&rule("r", "2", Some("")), &mut diag));
        assert_eq!(
            diag.lines(),
            [
                "# Skipping Ingo default rule \"Vacation\"",
                "# Skipping rule \"r\" because it requires an action value but provided none",
            ]
        );
    }
}
