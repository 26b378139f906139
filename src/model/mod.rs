//! Rule records decoded from Ingo preferences, and the fixed vocabulary
//! shared by Ingo and Zimbra.

pub mod rule;
pub mod vocabulary;
