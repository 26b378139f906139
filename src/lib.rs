//! `ingo2zimbra`: convert Horde / Ingo mail filter rules to a Zimbra
//! `zmprov` script.
//!
//! The stored `rules` preference is repaired ([`serialize::repair`]),
//! decoded ([`serialize::value`]) into [`model::rule::RuleRecord`]s,
//! filtered and translated ([`translate`]), and rendered ([`script`]).
//! [`convert`] runs the whole pipeline for one mailbox.

pub mod config;
pub mod convert;
pub mod error;
pub mod model;
pub mod script;
pub mod serialize;
pub mod source;
pub mod translate;
