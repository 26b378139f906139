//! Preference value read from a file or standard input.
//!
//! Useful when the Horde database is not reachable from the migration host:
//! export the `pref_value` column and feed it in directly.

use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::{ConvertError, Result};

use super::{decode_preference_bytes, PreferenceSource};

/// A single exported preference value. The uid is not consulted.
#[derive(Debug, Clone)]
pub struct BlobSource {
    /// `None` reads standard input.
    path: Option<PathBuf>,
}

impl BlobSource {
    /// Read from a file; `-` means standard input.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if path == Path::new("-") {
            Self::stdin()
        } else {
            Self {
                path: Some(path.to_path_buf()),
            }
        }
    }

    pub fn stdin() -> Self {
        Self { path: None }
    }

    fn read_bytes(&self) -> Result<Vec<u8>> {
        match &self.path {
            Some(path) => std::fs::read(path).map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ConvertError::FileNotFound(path.clone())
                } else {
                    ConvertError::io(path, e)
                }
            }),
            None => {
                let mut buf = Vec::new();
                std::io::stdin()
                    .read_to_end(&mut buf)
                    .map_err(|e| ConvertError::io("<stdin>", e))?;
                Ok(buf)
            }
        }
    }
}

impl PreferenceSource for BlobSource {
    /// An empty or whitespace-only input counts as no stored preference.
    fn fetch_rules(&self, _uid: &str) -> Result<Option<String>> {
        let text = decode_preference_bytes(&self.read_bytes()?);
        if text.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(text))
    }
}
