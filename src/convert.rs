//! One mailbox, end to end: fetch, repair, decode, translate, render.
//!
//! Nothing is written here. The caller receives the complete script and
//! its diagnostics only when every step succeeded, so a failure never
//! leaves half a script behind.

use crate::error::Result;
use crate::model::rule::{rules_from_value, RuleRecord};
use crate::script::{render_empty, render_script, Diagnostics, ScriptOptions};
use crate::serialize::{decode, repair_length_prefixes};
use crate::source::PreferenceSource;
use crate::translate::Translator;

/// Per-run settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertOptions {
    pub script: ScriptOptions,
    /// Look up `user@example.com` as `user`.
    pub strip_domain: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            script: ScriptOptions::default(),
            strip_domain: true,
        }
    }
}

/// The result of converting one mailbox.
#[derive(Debug, Clone)]
pub struct Conversion {
    /// Script text for `zmprov`.
    pub script: String,
    /// Notes about skipped rules and conditions.
    pub diagnostics: Diagnostics,
    /// Rules stored in Ingo.
    pub rules_found: usize,
    /// Rules written to the script.
    pub rules_written: usize,
}

/// Horde preference uid for a mailbox address.
pub fn mailbox_uid(mailbox: &str, strip_domain: bool) -> &str {
    if strip_domain {
        mailbox.split('@').next().unwrap_or(mailbox)
    } else {
        mailbox
    }
}

/// Repair and decode a stored `rules` preference.
pub fn decode_rules(stored: &str) -> Result<Vec<RuleRecord>> {
    let repaired = repair_length_prefixes(stored);
    let value = decode(&repaired)?;
    rules_from_value(&value)
}

/// Convert the mailbox's rules as found in `source`.
pub fn convert_mailbox(
    source: &dyn PreferenceSource,
    mailbox: &str,
    options: &ConvertOptions,
) -> Result<Conversion> {
    let uid = mailbox_uid(mailbox, options.strip_domain);
    tracing::info!(mailbox, uid, "Converting Ingo rules");

    match source.fetch_rules(uid)? {
        Some(stored) => convert_stored_rules(mailbox, &stored, options),
        None => {
            let mut diagnostics = Diagnostics::new();
            diagnostics.note(format!("No Ingo preferences found for {mailbox}"));
            Ok(Conversion {
                script: render_empty(options.script),
                diagnostics,
                rules_found: 0,
                rules_written: 0,
            })
        }
    }
}

/// Convert an already fetched `rules` preference value.
pub fn convert_stored_rules(
    mailbox: &str,
    stored: &str,
    options: &ConvertOptions,
) -> Result<Conversion> {
    let rules = decode_rules(stored)?;
    let mut diagnostics = Diagnostics::new();

    if rules.is_empty() {
        diagnostics.note(format!("No rules found for {mailbox}"));
        return Ok(Conversion {
            script: render_empty(options.script),
            diagnostics,
            rules_found: 0,
            rules_written: 0,
        });
    }

    let translated = Translator::new().translate_all(&rules, &mut diagnostics);
    tracing::info!(
        mailbox,
        found = rules.len(),
        written = translated.len(),
        "Rules converted"
    );

    Ok(Conversion {
        script: render_script(mailbox, &translated, options.script),
        diagnostics,
        rules_found: rules.len(),
        rules_written: translated.len(),
    })
}
