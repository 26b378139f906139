//! Stored preference decoding: length-prefix repair and PHP `serialize()`
//! values.
//!
//! The two halves are independent. [`repair`] is a text-to-text rewrite
//! that knows nothing about values; [`value`] decodes well-formed text.

pub mod repair;
pub mod value;

pub use repair::repair_length_prefixes;
pub use value::{decode, PhpKey, PhpValue};
