// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Structured event enrichment and emission.
//!
//! The helpers here validate the identity and context fields of an activity,
//! build the canonical property bag for it, merge caller extensions without
//! letting them replace canonical keys, and hand exactly one named event to a
//! [`TelemetrySink`](crate::sink::TelemetrySink).
//!
//! - [`login`] - `UserLogin` events
//! - [`workflow`] - `WorkflowAction` events
//! - [`custom`] - free-form named events with positional attributes
//!
//! Each call is a single validate-then-emit step. Nothing is retained between
//! calls, so the helpers can be used from any number of tasks at once; only
//! the sink is shared.

pub mod custom;
pub mod login;
pub mod workflow;

use indexmap::map::Entry;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::sink::TelemetrySink;

pub use custom::{CustomEventLogger, LogLevel, INVALID_LOG_LEVEL};
pub use login::{try_track_login, LoginEvent, USER_LOGIN_EVENT};
pub use workflow::{
    try_track_workflow_action, WorkflowAction, WorkflowActionEvent, WORKFLOW_ACTION_EVENT,
};

/// Caller-supplied extension properties, in the order they were given.
pub type ExtraProperties = IndexMap<String, String>;

/// Ordered string-to-string property bag attached to an event.
///
/// Keys are unique and never overwritten: the first value written for a key
/// is the one that is emitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventProperties(IndexMap<String, String>);

impl EventProperties {
    /// Create an empty bag.
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Insert a key unless it is already present.
    ///
    /// Returns `true` when the value was stored.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
        match self.0.entry(key.into()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(value.into());
                true
            }
        }
    }

    /// Merge extension properties first-write-wins.
    ///
    /// Returns the keys that were dropped because they were already present.
    pub fn merge_extensions<I, K, V>(&mut self, extra: I) -> Vec<String>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut dropped = Vec::new();
        for (key, value) in extra {
            let key = key.into();
            if self.0.contains_key(&key) {
                dropped.push(key);
            } else {
                self.0.insert(key, value.into());
            }
        }
        dropped
    }

    /// Look up a value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Whether the key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Key/value pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EventProperties {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut properties = Self::new();
        properties.merge_extensions(iter);
        properties
    }
}

/// A named event together with the properties it was emitted with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackedEvent {
    pub name: String,
    pub properties: EventProperties,
}

impl TrackedEvent {
    pub fn new(name: impl Into<String>, properties: EventProperties) -> Self {
        Self {
            name: name.into(),
            properties,
        }
    }

    /// Hand the event to a sink. This is the only sink call the helpers make.
    pub fn emit<S: TelemetrySink + ?Sized>(&self, sink: &S) {
        sink.track_event(&self.name, Some(&self.properties), None);
    }
}

/// Whether a field is absent, empty, or whitespace only.
pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_is_first_write_wins() {
        let mut props = EventProperties::new();
        assert!(props.insert("userId", "u1"));
        assert!(!props.insert("userId", "other"));
        assert_eq!(props.get("userId"), Some("u1"));
        assert_eq!(props.len(), 1);
    }

    #[test]
    fn test_merge_extensions_keeps_existing_and_order() {
        let mut props = EventProperties::new();
        props.insert("userId", "u1");
        props.insert("action", "approve");

        let dropped = props.merge_extensions([
            ("tenant", "contoso"),
            ("userId", "hacker"),
            ("region", "eu"),
        ]);

        assert_eq!(dropped, vec!["userId".to_string()]);
        assert_eq!(props.get("userId"), Some("u1"));
        let keys: Vec<_> = props.keys().collect();
        assert_eq!(keys, vec!["userId", "action", "tenant", "region"]);
    }

    #[test]
    fn test_from_iter_keeps_first_duplicate() {
        let props: EventProperties = vec![("a", "1"), ("b", "2"), ("a", "3")]
            .into_iter()
            .collect();
        assert_eq!(props.get("a"), Some("1"));
        assert_eq!(props.len(), 2);
    }

    #[test]
    fn test_properties_serialize_in_insertion_order() {
        let mut props = EventProperties::new();
        props.insert("z", "last-letter");
        props.insert("a", "first-letter");
        let json = serde_json::to_string(&props).unwrap();
        assert_eq!(json, r#"{"z":"last-letter","a":"first-letter"}"#);
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(""));
        assert!(is_blank("   \t\n"));
        assert!(!is_blank(" u1 "));
    }
}
