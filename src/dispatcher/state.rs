use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Key/value store scoped to a single dispatch.
///
/// Created empty for every dispatch. Middleware writes into it (e.g. the
/// authenticated user); later middleware and the action read it back. It is
/// dropped when the dispatch returns and is never shared across requests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestState {
    values: HashMap<String, Value>,
}

impl RequestState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a stored value, or `None` if the key was never set.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Get a stored string value.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    /// Deserialize a stored value into `T`.
    ///
    /// Returns `None` when the key is absent or the value does not have the
    /// shape of `T`.
    #[must_use]
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.values
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Store a value, replacing any previous value under `key`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
