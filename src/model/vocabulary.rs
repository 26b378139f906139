//! Fixed Ingo and Zimbra vocabulary.
//!
//! Every code and keyword the translator understands lives here, so the
//! translation modules stay declarative.

use std::fmt;

/// Ingo rules that Zimbra already provides natively.
pub const DEFAULT_RULE_NAMES: [&str; 4] = ["Whitelist", "Blacklist", "Vacation", "Forward"];

/// Ingo "flag message" action. Zimbra documents `flag` but rejects it.
pub const FLAG_ACTION_CODE: &str = "12";

/// Ingo "notify by SMS" action. Zimbra has no SMS channel.
pub const SMS_NOTIFY_ACTION_CODE: &str = "14";

/// Pseudo-field Ingo uses for message size tests. Compared case-insensitively.
pub const SIZE_FIELD: &str = "size";

/// Headers rendered as `address` tests. Compared case-insensitively.
pub const ADDRESS_FIELDS: [&str; 3] = ["from", "to", "cc"];

/// Headers whose name is lower-cased when rendered.
pub const LOWER_CASE_FIELDS: [&str; 1] = ["subject"];

/// Ingo comparisons Zimbra cannot express.
pub const UNSUPPORTED_MATCHERS: [&str; 8] = [
    "regex",
    "not regex",
    "less",
    "greater",
    "less than or equal to",
    "greater than or equal to",
    "over",
    "under",
];

/// Ingo comparison keyword to Zimbra comparison keyword.
///
/// Keywords not listed pass through unchanged, except the `… with` family
/// handled by [`crate::translate::condition::translate_operator`].
pub const MATCHER_MAP: [(&str, &str); 8] = [
    ("equal", "is"),
    ("not is", "not_is"),
    ("not contain", "not_contains"),
    ("not exist", "not_contains"),
    ("exists", "contains"),
    ("not matches", "not_matches"),
    ("greater than", "over"),
    ("less than", "under"),
];

/// Subject line of the message Zimbra sends for a notify rule.
pub const NOTIFY_SUBJECT: &str = "Delivery notification";

/// Body of the notify message; the rule name follows in escaped quotes.
pub const NOTIFY_BODY_PREFIX: &str =
    "A message has been delivered to your account which matched notification rule";

/// Ingo actions that have a Zimbra equivalent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// `1`: deliver to the inbox.
    Keep,
    /// `2`: move to a folder.
    FileInto,
    /// `3`: delete.
    Discard,
    /// `4`: forward to an address.
    Redirect,
    /// `5`: deliver and forward.
    KeepRedirect,
    /// `6`: reject. Zimbra can only discard.
    Reject,
    /// `11`: deliver and copy to a folder.
    KeepFileInto,
    /// `13`: send a notification message.
    Notify,
}

impl Action {
    /// Look up an Ingo action code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "1" => Some(Self::Keep),
            "2" => Some(Self::FileInto),
            "3" => Some(Self::Discard),
            "4" => Some(Self::Redirect),
            "5" => Some(Self::KeepRedirect),
            "6" => Some(Self::Reject),
            "11" => Some(Self::KeepFileInto),
            "13" => Some(Self::Notify),
            _ => None,
        }
    }

    /// Zimbra action keyword(s) for `zmprov afrl`.
    pub fn as_zimbra(&self) -> &'static str {
        match self {
            Self::Keep => "keep",
            Self::FileInto => "fileinto",
            Self::Discard | Self::Reject => "discard",
            Self::Redirect => "redirect",
            Self::KeepRedirect => "keep redirect",
            Self::KeepFileInto => "keep fileinto",
            Self::Notify => "notify",
        }
    }

    /// Rules with these actions are useless without an action value.
    pub fn requires_value(&self) -> bool {
        matches!(self, Self::FileInto | Self::Redirect | Self::KeepFileInto)
    }

    /// Whether the action value is rendered at all.
    pub fn takes_value(&self) -> bool {
        !matches!(self, Self::Keep | Self::Discard | Self::Reject)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_zimbra())
    }
}

/// How a rule's conditions combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombineMode {
    All,
    Any,
}

impl CombineMode {
    /// Look up an Ingo combine code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "1" => Some(Self::All),
            "2" => Some(Self::Any),
            _ => None,
        }
    }

    pub fn as_zimbra(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Any => "any",
        }
    }
}

impl fmt::Display for CombineMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_zimbra())
    }
}
