//! Where the stored Ingo `rules` preference comes from.
//!
//! A source answers one question: the serialized rules for a Horde user,
//! or nothing when the user never saved any.

pub mod blob;
pub mod sqlite;

pub use blob::BlobSource;
pub use sqlite::SqliteSource;

use crate::error::Result;

/// Horde preference scope holding Ingo's settings.
pub const PREF_SCOPE: &str = "ingo";

/// Preference name holding the serialized rule list.
pub const PREF_NAME: &str = "rules";

/// A store of Horde preferences.
pub trait PreferenceSource {
    /// Fetch the serialized `ingo`/`rules` value for `uid`.
    ///
    /// `Ok(None)` means no preference is stored, which is not an error.
    fn fetch_rules(&self, uid: &str) -> Result<Option<String>>;
}

/// Decode stored preference bytes to a string.
///
/// Tries UTF-8 first, then falls back to Windows-1252 (which accepts every
/// byte), for databases that were written with a Latin-1 connection.
pub fn decode_preference_bytes(bytes: &[u8]) -> String {
    let bytes = if bytes.starts_with(&[0xEF, 0xBB, 0xBF]) {
        &bytes[3..]
    } else {
        bytes
    };

    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => {
            tracing::warn!("Preference value is not UTF-8, decoding as Windows-1252");
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            decoded.into_owned()
        }
    }
}
