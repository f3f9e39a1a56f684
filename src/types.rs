use axum::http::{HeaderMap, HeaderValue};
use serde::Serialize;

use crate::orchestration::OrchestrationError;

/// Request body handed to the orchestrator
///
/// Carries the batch identifier exactly as it arrived in the URL path.
/// No format or uniqueness rule is enforced here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchRequestEnvelope {
    pub batchid: String,
}

impl BatchRequestEnvelope {
    pub fn new(batchid: impl Into<String>) -> Self {
        Self {
            batchid: batchid.into(),
        }
    }

    /// Serialize into the compact JSON form `{"batchid":"..."}`
    pub fn to_payload(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Ordered copy of the inbound request headers
///
/// Keeps the first value seen for each header name; later repeats are dropped.
/// Name lookups ignore ASCII case. Values are kept as the raw header bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderBag {
    entries: Vec<(String, HeaderValue)>,
}

impl HeaderBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy every header of an inbound request
    pub fn from_header_map(headers: &HeaderMap) -> Self {
        let mut bag = Self::new();
        for (name, value) in headers.iter() {
            bag.insert(name.as_str(), value.clone());
        }
        bag
    }

    /// Insert a header unless one with the same name is already present
    ///
    /// Returns `false` when the value was discarded.
    pub fn insert(&mut self, name: impl Into<String>, value: HeaderValue) -> bool {
        let name = name.into();
        if self.get_raw(&name).is_some() {
            return false;
        }
        self.entries.push((name, value));
        true
    }

    pub fn get_raw(&self, name: &str) -> Option<&HeaderValue> {
        self.entries
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }

    /// Header value as text; `None` when absent or not visible ASCII
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_raw(name).and_then(|value| value.to_str().ok())
    }

    /// The caller's own `Content-Type`, if it sent one
    pub fn content_type(&self) -> Option<&HeaderValue> {
        self.get_raw("content-type")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &HeaderValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Result of one retrieval, as seen at the HTTP boundary
#[derive(Debug)]
pub enum RetrievalOutcome {
    /// Orchestrator output plus the content type to answer with
    Success {
        payload: String,
        content_type: Option<HeaderValue>,
    },
    CollaboratorFailure(OrchestrationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_has_single_batchid_key() {
        let payload = BatchRequestEnvelope::new("abc123").to_payload().unwrap();
        assert_eq!(payload, r#"{"batchid":"abc123"}"#);
    }

    #[test]
    fn test_envelope_keeps_empty_id() {
        let payload = BatchRequestEnvelope::new("").to_payload().unwrap();
        assert_eq!(payload, r#"{"batchid":""}"#);
    }

    #[test]
    fn test_envelope_escapes_reserved_characters() {
        let id = "a/b?c=d&e \"quoted\"";
        let payload = BatchRequestEnvelope::new(id).to_payload().unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(parsed, serde_json::json!({ "batchid": id }));
    }

    #[test]
    fn test_header_bag_first_value_wins() {
        let mut bag = HeaderBag::new();
        assert!(bag.insert("X-Tenant", HeaderValue::from_static("first")));
        assert!(!bag.insert("x-tenant", HeaderValue::from_static("second")));

        assert_eq!(bag.get("X-TENANT"), Some("first"));
        assert_eq!(bag.len(), 1);
    }

    #[test]
    fn test_header_bag_from_repeated_headers() {
        let mut headers = HeaderMap::new();
        headers.append("accept", HeaderValue::from_static("text/plain"));
        headers.append("accept", HeaderValue::from_static("application/json"));
        headers.insert("content-type", HeaderValue::from_static("application/xml"));

        let bag = HeaderBag::from_header_map(&headers);

        assert_eq!(bag.get("Accept"), Some("text/plain"));
        assert_eq!(bag.content_type().unwrap(), "application/xml");
        assert_eq!(bag.len(), 2);
    }

    #[test]
    fn test_header_bag_preserves_insertion_order() {
        let mut bag = HeaderBag::new();
        bag.insert("b", HeaderValue::from_static("2"));
        bag.insert("a", HeaderValue::from_static("1"));
        bag.insert("c", HeaderValue::from_static("3"));

        let names: Vec<&str> = bag.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_missing_content_type() {
        let bag = HeaderBag::new();
        assert!(bag.is_empty());
        assert_eq!(bag.content_type(), None);
    }

    #[test]
    fn test_header_bag_keeps_obs_text_bytes() {
        let raw: &[u8] = b"text/plain; name=caf\xE9";
        let mut headers = HeaderMap::new();
        headers.insert("content-type", HeaderValue::from_bytes(raw).unwrap());

        let bag = HeaderBag::from_header_map(&headers);

        assert_eq!(bag.content_type().unwrap().as_bytes(), raw);
        // Not visible ASCII, so there is no text view
        assert_eq!(bag.get("content-type"), None);
    }
}
