//! Generic values decoded from PHP's `serialize()` format.
//!
//! Parsing is done by `serde_php`; this module only provides a
//! self-describing target type that keeps PHP arrays in stored order.
//! String lengths are byte counts, so text from a character-counting writer
//! must go through [`super::repair_length_prefixes`] first.

use std::borrow::Cow;
use std::fmt;

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};

use crate::error::{ConvertError, Result};

/// Array key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhpKey {
    Int(i64),
    Str(String),
}

impl PhpKey {
    /// PHP treats `"3"` and `3` as the same key.
    fn matches(&self, name: &str) -> bool {
        match self {
            Self::Str(s) => s == name,
            Self::Int(i) => name.parse::<i64>().ok() == Some(*i),
        }
    }
}

/// A decoded PHP value. Arrays keep their insertion order.
#[derive(Debug, Clone, PartialEq)]
pub enum PhpValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Array(Vec<(PhpKey, PhpValue)>),
}

impl PhpValue {
    /// Look up an array member by key. `None` for non-arrays.
    pub fn get(&self, key: &str) -> Option<&PhpValue> {
        self.as_array()?
            .iter()
            .find(|(k, _)| k.matches(key))
            .map(|(_, v)| v)
    }

    /// The entries of an array, in stored order.
    pub fn as_array(&self) -> Option<&[(PhpKey, PhpValue)]> {
        match self {
            Self::Array(entries) => Some(entries),
            _ => None,
        }
    }

    /// Scalar value as text, the way PHP's string cast renders it.
    ///
    /// `None` for arrays.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Null => Some(Cow::Borrowed("")),
            Self::Bool(true) => Some(Cow::Borrowed("1")),
            Self::Bool(false) => Some(Cow::Borrowed("")),
            Self::Int(i) => Some(Cow::Owned(i.to_string())),
            Self::Float(f) => Some(Cow::Owned(f.to_string())),
            Self::Str(s) => Some(Cow::Borrowed(s.as_str())),
            Self::Array(_) => None,
        }
    }

    /// Short type name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Float(_) => "double",
            Self::Str(_) => "string",
            Self::Array(_) => "array",
        }
    }
}

/// Decode one serialized value. Surrounding whitespace is ignored.
pub fn decode(text: &str) -> Result<PhpValue> {
    serde_php::from_bytes::<PhpValue>(text.trim().as_bytes())
        .map_err(|e| ConvertError::Decode(e.to_string()))
}

// ── serde ───────────────────────────────────────────────────────

struct PhpValueVisitor;

impl<'de> Visitor<'de> for PhpValueVisitor {
    type Value = PhpValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a PHP serialized value")
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<PhpValue, E> {
        Ok(PhpValue::Null)
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<PhpValue, E> {
        Ok(PhpValue::Null)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<PhpValue, E> {
        Ok(PhpValue::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<PhpValue, E> {
        Ok(PhpValue::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<PhpValue, E> {
        i64::try_from(v)
            .map(PhpValue::Int)
            .map_err(|_| E::custom(format!("integer {v} out of range")))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<PhpValue, E> {
        Ok(PhpValue::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<PhpValue, E> {
        Ok(PhpValue::Str(v.to_string()))
    }

    fn visit_bytes<E: de::Error>(self, v: &[u8]) -> std::result::Result<PhpValue, E> {
        std::str::from_utf8(v)
            .map(|s| PhpValue::Str(s.to_string()))
            .map_err(|_| E::custom("string is not valid UTF-8"))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<PhpValue, A::Error> {
        let mut entries = Vec::with_capacity(seq.size_hint().unwrap_or(0).min(1024));
        let mut index = 0i64;
        while let Some(value) = seq.next_element::<PhpValue>()? {
            entries.push((PhpKey::Int(index), value));
            index += 1;
        }
        Ok(PhpValue::Array(entries))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<PhpValue, A::Error> {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0).min(1024));
        while let Some((key, value)) = map.next_entry::<PhpValue, PhpValue>()? {
            let key = match key {
                PhpValue::Int(i) => PhpKey::Int(i),
                PhpValue::Str(s) => PhpKey::Str(s),
                other => {
                    return Err(de::Error::custom(format!(
                        "invalid array key type {}",
                        other.type_name()
                    )))
                }
            };
            entries.push((key, value));
        }
        Ok(PhpValue::Array(entries))
    }
}

impl<'de> Deserialize<'de> for PhpValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(PhpValueVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_scalars() {
        assert_eq!(decode("N;").unwrap(), PhpValue::Null);
        assert_eq!(decode("b:1;").unwrap(), PhpValue::Bool(true));
        assert_eq!(decode("b:0;").unwrap(), PhpValue::Bool(false));
        assert_eq!(decode("i:-42;").unwrap(), PhpValue::Int(-42));
        assert_eq!(decode("d:0.5;").unwrap(), PhpValue::Float(0.5));
        assert_eq!(
            decode(r#"s:5:"hello";"#).unwrap(),
            PhpValue::Str("hello".to_string())
        );
    }

    #[test]
    fn test_decode_string_with_quotes_and_semicolons() {
        let value = decode(r#"s:6:"a";"b;";"#).unwrap();
        assert_eq!(value, PhpValue::Str(r#"a";"b;"#.to_string()));
    }

    #[test]
    fn test_decode_multibyte_string_by_bytes() {
        let value = decode("s:6:\"Müller\";");
        assert!(value.is_err(), "six characters but seven bytes");
        let value = decode("s:7:\"Müller\";").unwrap();
        assert_eq!(value, PhpValue::Str("Müller".to_string()));
    }

    #[test]
    fn test_decode_nested_array_preserves_order() {
        let text = r#"a:2:{i:1;a:1:{s:4:"name";s:1:"b";}i:0;a:1:{s:4:"name";s:1:"a";}}"#;
        let value = decode(text).unwrap();
        let entries = value.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, PhpKey::Int(1));
        assert_eq!(
            entries[0].1.get("name").and_then(|v| v.as_text()).as_deref(),
            Some("b")
        );
    }

    #[test]
    fn test_get_matches_numeric_string_keys() {
        let value = decode(r#"a:1:{i:3;s:1:"x";}"#).unwrap();
        assert!(value.get("3").is_some());
        assert!(value.get("x").is_none());
    }

    #[test]
    fn test_as_text_casts_like_php() {
        assert_eq!(PhpValue::Int(13).as_text().as_deref(), Some("13"));
        assert_eq!(PhpValue::Bool(true).as_text().as_deref(), Some("1"));
        assert_eq!(PhpValue::Bool(false).as_text().as_deref(), Some(""));
        assert_eq!(PhpValue::Null.as_text().as_deref(), Some(""));
        assert!(PhpValue::Array(Vec::new()).as_text().is_none());
    }

    #[test]
    fn test_decode_empty_array() {
        assert_eq!(decode("a:0:{}").unwrap(), PhpValue::Array(Vec::new()));
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        assert_eq!(decode("a:0:{}\n").unwrap(), PhpValue::Array(Vec::new()));
    }

    #[test]
    fn test_malformed_input_is_decode_error() {
        assert!(matches!(
            decode(r#"a:1:{i:0;s:9:"short";}"#),
            Err(ConvertError::Decode(_))
        ));
        assert!(decode("").is_err());
        assert!(decode("not serialized").is_err());
        assert!(decode("a:2:{i:0;N;}").is_err());
    }
}
