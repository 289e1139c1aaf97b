use crate::StorageError;
use std::fmt;

/// Stable identity of a document's annotation record
///
/// Keys double as file names, so they are limited to ASCII letters, digits,
/// `.`, `_` and `-`, and may not start with a dot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentKey(String);

impl DocumentKey {
    /// Use a caller-supplied key as-is, rejecting anything unsafe as a file name
    pub fn new(key: impl Into<String>) -> Result<Self, StorageError> {
        let key = key.into();
        let valid = !key.is_empty() && !key.starts_with('.') && key.chars().all(is_key_char);
        if !valid {
            return Err(StorageError::InvalidKey(key));
        }
        Ok(Self(key))
    }

    /// Derive a key from a file name, path or URI
    ///
    /// Takes the last path segment (ignoring any query or fragment) and
    /// replaces characters that are not allowed in keys with `_`. When that
    /// changes the segment, a digest of the original segment is appended to
    /// the stem so distinct names keep distinct keys.
    pub fn from_uri(uri: &str) -> Self {
        let without_suffix = uri.split(['?', '#']).next().unwrap_or(uri);
        let segment = without_suffix
            .trim_end_matches(['/', '\\'])
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or("");

        let mut key: String =
            segment.chars().map(|c| if is_key_char(c) { c } else { '_' }).collect();
        if key.starts_with('.') {
            key.replace_range(0..1, "_");
        }
        if key.is_empty() {
            key.push_str("untitled");
        }
        if key != segment {
            key = with_digest(&key, segment);
        }
        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `stem-<digest>.ext`, with the first 12 hex digits of the original's md5
fn with_digest(key: &str, original: &str) -> String {
    let digest = md5::compute(original.as_bytes());
    let hash_prefix = &format!("{digest:x}")[..12];
    match key.rfind('.') {
        Some(dot) if dot > 0 => format!("{}-{hash_prefix}{}", &key[..dot], &key[dot..]),
        _ => format!("{key}-{hash_prefix}"),
    }
}

fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')
}
