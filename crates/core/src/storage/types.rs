use std::collections::BTreeMap;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use super::RepositoryError;

/// Opaque pagination token.
///
/// Wraps the store's last-evaluated key (string attributes only) and
/// travels to clients as URL-safe base64 of its JSON form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCursor(BTreeMap<String, String>);

impl PageCursor {
    pub fn new(key: BTreeMap<String, String>) -> Self {
        Self(key)
    }

    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.0
    }

    pub fn get(&self, attribute: &str) -> Option<&str> {
        self.0.get(attribute).map(String::as_str)
    }

    pub fn encode(&self) -> String {
        // serde_json only fails on non-string map keys or a failing Serialize
        // impl; a BTreeMap<String, String> has neither, so this never defaults.
        let json = serde_json::to_vec(&self.0).unwrap_or_default();
        URL_SAFE_NO_PAD.encode(json)
    }

    pub fn decode(token: &str) -> Result<Self, RepositoryError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(token.trim())
            .map_err(|e| RepositoryError::InvalidData(format!("malformed cursor: {e}")))?;
        let key: BTreeMap<String, String> = serde_json::from_slice(&bytes)
            .map_err(|e| RepositoryError::InvalidData(format!("malformed cursor: {e}")))?;
        Ok(Self(key))
    }
}

impl<const N: usize> From<[(&str, &str); N]> for PageCursor {
    fn from(pairs: [(&str, &str); N]) -> Self {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

/// One page of results plus the cursor for the next page, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub last_evaluated_key: Option<PageCursor>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, last_evaluated_key: Option<PageCursor>) -> Self {
        Self {
            items,
            last_evaluated_key,
        }
    }

    /// A page with no continuation.
    pub fn last(items: Vec<T>) -> Self {
        Self::new(items, None)
    }
}
