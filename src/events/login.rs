// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Login activity events.

use tracing::debug;

use super::{is_blank, EventProperties, ExtraProperties, TrackedEvent};
use crate::error::ValidationError;
use crate::sink::TelemetrySink;

/// Name of the event emitted for every tracked login.
pub const USER_LOGIN_EVENT: &str = "UserLogin";

/// A login attempt as reported by a caller.
#[derive(Debug, Clone, Default)]
pub struct LoginEvent {
    /// Required; must not be blank.
    pub user_id: String,
    pub success: bool,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    /// Authentication method, e.g. `password` or `sso`.
    pub method: Option<String>,
    /// Extra properties; never replace the canonical keys.
    pub properties: ExtraProperties,
}

impl LoginEvent {
    pub fn new(user_id: impl Into<String>, success: bool) -> Self {
        Self {
            user_id: user_id.into(),
            success,
            ..Self::default()
        }
    }

    pub fn with_ip_address(mut self, ip_address: impl Into<String>) -> Self {
        self.ip_address = Some(ip_address.into());
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    fn to_properties(&self) -> EventProperties {
        let mut properties = EventProperties::new();
        properties.insert("userId", self.user_id.as_str());
        properties.insert("success", bool_label(self.success));
        properties.insert("ipAddress", self.ip_address.as_deref().unwrap_or_default());
        properties.insert("userAgent", self.user_agent.as_deref().unwrap_or_default());
        properties.insert("method", self.method.as_deref().unwrap_or_default());

        let dropped = properties.merge_extensions(
            self.properties
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str())),
        );
        if !dropped.is_empty() {
            debug!(?dropped, "ignored extension properties colliding with login fields");
        }
        properties
    }
}

/// Validate a login and emit one `UserLogin` event.
///
/// Fails with `"userId is required."` when the user id is blank, in which case
/// the sink is not called. On success the emitted event is returned.
pub fn try_track_login<S: TelemetrySink + ?Sized>(
    sink: &S,
    login: &LoginEvent,
) -> Result<TrackedEvent, ValidationError> {
    if is_blank(&login.user_id) {
        return Err(ValidationError::login_user_id());
    }

    let event = TrackedEvent::new(USER_LOGIN_EVENT, login.to_properties());
    event.emit(sink);
    Ok(event)
}

/// Boolean rendering used in property bags.
fn bool_label(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{RecordedCall, RecordingSink};

    #[test]
    fn test_login_emits_canonical_properties() {
        let sink = RecordingSink::new();
        let login = LoginEvent::new("u1", true)
            .with_ip_address("1.2.3.4")
            .with_user_agent("curl/7")
            .with_method("password")
            .with_property("userId", "hacker");

        let event = try_track_login(&sink, &login).unwrap();

        assert_eq!(event.name, "UserLogin");
        assert_eq!(event.properties.get("userId"), Some("u1"));
        assert_eq!(event.properties.get("success"), Some("True"));
        assert_eq!(event.properties.get("ipAddress"), Some("1.2.3.4"));
        assert_eq!(event.properties.get("userAgent"), Some("curl/7"));
        assert_eq!(event.properties.get("method"), Some("password"));

        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0], event);
        assert_eq!(sink.call_count(), 1);
    }

    #[test]
    fn test_login_defaults_missing_optionals_to_empty() {
        let sink = RecordingSink::new();
        let event = try_track_login(&sink, &LoginEvent::new("u2", false)).unwrap();

        let keys: Vec<_> = event.properties.keys().collect();
        assert_eq!(keys, vec!["userId", "success", "ipAddress", "userAgent", "method"]);
        assert_eq!(event.properties.get("success"), Some("False"));
        assert_eq!(event.properties.get("ipAddress"), Some(""));
        assert_eq!(event.properties.get("userAgent"), Some(""));
        assert_eq!(event.properties.get("method"), Some(""));
    }

    #[test]
    fn test_login_rejects_blank_user_id() {
        for user_id in ["", " ", "\t\n"] {
            let sink = RecordingSink::new();
            let err = try_track_login(&sink, &LoginEvent::new(user_id, true)).unwrap_err();
            assert_eq!(err.message(), "userId is required.");
            assert_eq!(sink.call_count(), 0);
        }
    }

    #[test]
    fn test_login_extensions_add_new_keys() {
        let sink = RecordingSink::new();
        let login = LoginEvent::new("u1", true)
            .with_property("tenant", "contoso")
            .with_property("success", "False");

        let event = try_track_login(&sink, &login).unwrap();
        assert_eq!(event.properties.get("tenant"), Some("contoso"));
        assert_eq!(event.properties.get("success"), Some("True"));
        assert_eq!(event.properties.len(), 6);
    }

    #[test]
    fn test_login_only_calls_track_event() {
        let sink = RecordingSink::new();
        try_track_login(&sink, &LoginEvent::new("u1", true)).unwrap();
        assert!(matches!(
            sink.calls().as_slice(),
            [RecordedCall::Event { metrics: None, .. }]
        ));
    }
}
