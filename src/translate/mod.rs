//! Ingo rule → Zimbra `afrl` command translation.

pub mod action;
pub mod condition;
pub mod filter;
pub mod names;

use std::fmt;

use crate::model::rule::RuleRecord;
use crate::model::vocabulary::{Action, CombineMode};
use crate::script::Diagnostics;

use action::{translate_action, ActionClause};
use condition::{escape_quotes, translate_condition, ConditionClause};
use filter::is_eligible;
use names::UniqueNameAllocator;

/// One rule ready to be written as an `afrl` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedRule {
    /// Unique within the mailbox, quote-escaped.
    pub name: String,
    pub active: bool,
    pub combine: CombineMode,
    /// Usable conditions only, in stored order.
    pub conditions: Vec<ConditionClause>,
    pub action: ActionClause,
    pub stop: bool,
}

impl fmt::Display for TranslatedRule {
    /// `afrl "<name>" <active|inactive> <all|any> <conditions> <action> <value> <stop>`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "afrl \"{}\" {} {} ",
            self.name,
            if self.active { "active" } else { "inactive" },
            self.combine
        )?;
        for condition in &self.conditions {
            write!(f, "{condition}")?;
        }
        write!(
            f,
            " {} {}",
            self.action,
            if self.stop { "stop" } else { "" }
        )
    }
}

/// Translates the rules of one mailbox.
///
/// Owns the name allocator, so a fresh translator is needed per mailbox.
#[derive(Debug, Default)]
pub struct Translator {
    names: UniqueNameAllocator,
}

impl Translator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Translate every eligible rule, in order.
    pub fn translate_all(
        &mut self,
        rules: &[RuleRecord],
        diagnostics: &mut Diagnostics,
    ) -> Vec<TranslatedRule> {
        rules
            .iter()
            .filter_map(|rule| self.translate(rule, diagnostics))
            .collect()
    }

    /// Translate one rule, or `None` (with a note) when it is skipped.
    ///
    /// Conditions that cannot be translated are dropped with a note of
    /// their own.
    pub fn translate(
        &mut self,
        rule: &RuleRecord,
        diagnostics: &mut Diagnostics,
    ) -> Option<TranslatedRule> {
        if !is_eligible(rule, diagnostics) {
            return None;
        }

        // Both lookups succeed for eligible rules.
        let action = Action::from_code(&rule.action_code)?;
        let combine = CombineMode::from_code(&rule.combine_mode)?;

        let mut conditions = Vec::with_capacity(rule.conditions.len());
        for condition in &rule.conditions {
            match translate_condition(condition) {
                Ok(clause) => conditions.push(clause),
                Err(skip) => diagnostics.note(format!(
                    "Skipping condition on \"{}\" in rule \"{}\" because {skip}",
                    condition.field, rule.name
                )),
            }
        }

        let name = self.names.allocate(&escape_quotes(&rule.name));
        tracing::debug!(rule = %rule.name, allocated = %name, "Rule translated");

        Some(TranslatedRule {
            name,
            active: !rule.disabled,
            combine,
            conditions,
            action: translate_action(action, rule.action_value_str(), &rule.name),
            stop: rule.stop,
        })
    }
}
