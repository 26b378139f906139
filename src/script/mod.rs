//! Script output: the `zmprov` command text and the `#` diagnostics that
//! accompany it.

pub mod diagnostics;
pub mod render;

pub use diagnostics::Diagnostics;
pub use render::{render_empty, render_script, ScriptOptions};
