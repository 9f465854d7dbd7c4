//! # Payload threaded through a run.
//!
//! The runner treats the payload as opaque: it borrows it mutably, lends it to
//! each task in turn and hands the same reference back to the caller. The only
//! requirement is the [`Payload`] marker bound, which every
//! `Send + Sync + 'static` type satisfies.
//!
//! [`JsonPayload`] is a ready-made payload backed by a JSON object, handy for
//! pipelines whose steps exchange loosely typed intermediate results.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Marker for types that can be threaded through a [`Runner`](crate::Runner).
pub trait Payload: Send + Sync + 'static {}

impl<T: Send + Sync + 'static> Payload for T {}

/// Key/value payload backed by a JSON object.
///
/// ## Example
/// ```rust
/// use taskchain::JsonPayload;
///
/// let mut p = JsonPayload::new();
/// p.insert("rows", 42);
/// assert_eq!(p.get("rows").and_then(|v| v.as_u64()), Some(42));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JsonPayload {
    data: Map<String, Value>,
}

impl JsonPayload {
    /// Creates an empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the whole data object.
    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    /// Replaces the whole data object.
    pub fn set_data(&mut self, data: Map<String, Value>) -> &mut Self {
        self.data = data;
        self
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Returns a mutable reference to the value stored under `key`.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.data.get_mut(key)
    }

    /// Stores `value` under `key`, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.data.insert(key.into(), value.into())
    }

    /// Removes `key`, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.data.remove(key)
    }

    /// Consumes the payload and returns the data object.
    pub fn into_inner(self) -> Map<String, Value> {
        self.data
    }
}

impl From<Map<String, Value>> for JsonPayload {
    fn from(data: Map<String, Value>) -> Self {
        Self { data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn set_data_replaces_everything() {
        let mut p = JsonPayload::new();
        p.insert("a", 1);

        let mut data = Map::new();
        data.insert("b".into(), json!("two"));
        p.set_data(data);

        assert!(p.get("a").is_none());
        assert_eq!(p.get("b"), Some(&json!("two")));
    }

    #[test]
    fn serializes_as_plain_object() {
        let mut p = JsonPayload::new();
        p.insert("count", 3);
        assert_eq!(serde_json::to_value(&p).unwrap(), json!({ "count": 3 }));

        let back: JsonPayload = serde_json::from_value(json!({ "x": true })).unwrap();
        assert_eq!(back.get("x"), Some(&json!(true)));
    }
}
