//! Assemble the `zmprov` script for one mailbox.
//!
//! ```text
//! sm user@example.com
//! afrl "Lists" active all header "List-Id"  contains "dev"  fileinto "Lists"
//! exit
//! exit
//! ```
//!
//! The first `exit` leaves the mailbox selected by `sm`, the second leaves
//! `zmprov`. Scripts for several mailboxes can be concatenated when the
//! terminators are suppressed.

use crate::translate::TranslatedRule;

/// Output switches owned by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptOptions {
    /// Append the `exit` terminator lines.
    pub write_exit: bool,
}

impl Default for ScriptOptions {
    fn default() -> Self {
        Self { write_exit: true }
    }
}

/// Render the script for a mailbox with at least one stored rule.
///
/// The header is written even when every rule was skipped.
pub fn render_script(mailbox: &str, rules: &[TranslatedRule], options: ScriptOptions) -> String {
    let mut out = format!("sm {mailbox} \n");
    for rule in rules {
        out.push_str(&rule.to_string());
        out.push('\n');
    }
    if options.write_exit {
        out.push_str("exit\nexit\n");
    }
    out
}

/// Render the script for a mailbox without stored rules: no header, a
/// single terminator.
pub fn render_empty(options: ScriptOptions) -> String {
    if options.write_exit {
        "exit\n".to_string()
    } else {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::vocabulary::CombineMode;
    use crate::translate::action::ActionClause;
    use crate::translate::condition::ConditionClause;

    fn keep_rule(name: &str) -> TranslatedRule {
        TranslatedRule {
            name: name.to_string(),
            active: true,
            combine: CombineMode::All,
            conditions: vec![ConditionClause {
                subject: "address \"From\" all".to_string(),
                operator: "is".to_string(),
                value: "bar@baz.com".to_string(),
            }],
            action: ActionClause {
                keyword: "keep",
                value: String::new(),
            },
            stop: false,
        }
    }

    #[test]
    fn test_script_with_rules() {
        let script = render_script(
            "user@example.com",
            &[keep_rule("The Rule")],
            ScriptOptions::default(),
        );
        assert_eq!(
            script,
            "sm user@example.com \n\
             afrl \"The Rule\" active all address \"From\" all is \"bar@baz.com\"  keep  \n\
             exit\nexit\n"
        );
    }

    #[test]
    fn test_script_without_exit() {
        let script = render_script(
            "user@example.com",
            &[keep_rule("a"), keep_rule("b")],
            ScriptOptions { write_exit: false },
        );
        assert_eq!(script.lines().count(), 3);
        assert!(!script.contains("exit"));
    }

    #[test]
    fn test_header_written_when_all_rules_skipped() {
        let script = render_script("user@example.com", &[], ScriptOptions::default());
        assert_eq!(script, "sm user@example.com \nexit\nexit\n");
    }

    #[test]
    fn test_empty_script() {
        assert_eq!(render_empty(ScriptOptions::default()), "exit\n");
        assert_eq!(render_empty(ScriptOptions { write_exit: false }), "");
    }
}
