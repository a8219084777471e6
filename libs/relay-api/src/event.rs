use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::RelayError;

fn default_spec_version() -> String {
    "1.0".to_string()
}

/// Event envelope accepted by the producer.
///
/// Follows the CloudEvents attribute naming when (de)serialized, so one JSON
/// object per line is enough to describe an event. `subject` is used verbatim
/// as the storage topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudEvent {
    pub id: String,
    pub source: String,
    #[serde(rename = "specversion", default = "default_spec_version")]
    pub spec_version: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(rename = "datacontenttype", default, skip_serializing_if = "Option::is_none")]
    pub data_content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extensions: BTreeMap<String, String>,
}

impl CloudEvent {
    pub fn new(id: impl Into<String>, source: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            spec_version: default_spec_version(),
            ty: ty.into(),
            subject: None,
            data_content_type: None,
            data: None,
            extensions: BTreeMap::new(),
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        if self.data_content_type.is_none() {
            self.data_content_type = Some("application/json".to_string());
        }
        self.data = Some(data);
        self
    }

    pub fn with_extension(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extensions.insert(key.into(), value.into());
        self
    }

    /// Subject as a topic key. A missing subject is the empty topic.
    pub fn subject(&self) -> &str {
        self.subject.as_deref().unwrap_or_default()
    }

    /// Size of the data section in bytes.
    ///
    /// String data counts its raw bytes, any other JSON value its compact
    /// serialized form.
    pub fn data_len(&self) -> usize {
        match &self.data {
            None => 0,
            Some(serde_json::Value::String(s)) => s.len(),
            Some(value) => value.to_string().len(),
        }
    }

    /// Check the required envelope attributes.
    pub fn validate(&self) -> Result<(), RelayError> {
        if self.id.is_empty() {
            return Err(RelayError::invalid_argument("event id must not be empty"));
        }
        if self.source.is_empty() {
            return Err(RelayError::invalid_argument(format!(
                "event '{}': source must not be empty",
                self.id
            )));
        }
        if self.ty.is_empty() {
            return Err(RelayError::invalid_argument(format!(
                "event '{}': type must not be empty",
                self.id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_cloudevents_json() {
        let line = r#"{"id":"e-1","source":"/orders","type":"order.created","subject":"orders","data":{"qty":3}}"#;
        let event: CloudEvent = serde_json::from_str(line).unwrap();
        assert_eq!(event.id, "e-1");
        assert_eq!(event.ty, "order.created");
        assert_eq!(event.spec_version, "1.0");
        assert_eq!(event.subject(), "orders");
        assert_eq!(event.data, Some(json!({"qty": 3})));
        assert!(event.extensions.is_empty());
    }

    #[test]
    fn missing_subject_is_empty_topic() {
        let event = CloudEvent::new("e-1", "/src", "t");
        assert_eq!(event.subject(), "");
    }

    #[test]
    fn data_len_counts_payload() {
        let event = CloudEvent::new("e-1", "/src", "t");
        assert_eq!(event.data_len(), 0);

        let event = event.with_data(json!("hello"));
        assert_eq!(event.data_len(), 5);

        let event = event.with_data(json!({"a": 1}));
        assert_eq!(event.data_len(), r#"{"a":1}"#.len());
        assert_eq!(event.data_content_type.as_deref(), Some("application/json"));
    }

    #[test]
    fn validate_rejects_missing_attributes() {
        assert!(CloudEvent::new("e-1", "/src", "t").validate().is_ok());

        for event in [
            CloudEvent::new("", "/src", "t"),
            CloudEvent::new("e-1", "", "t"),
            CloudEvent::new("e-1", "/src", ""),
        ] {
            let err = event.validate().unwrap_err();
            assert!(matches!(err, RelayError::InvalidArgument(_)), "{err}");
        }
    }

    #[test]
    fn serializes_without_empty_optionals() {
        let event = CloudEvent::new("e-1", "/src", "t").with_extension("trace", "abc");
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "e-1",
                "source": "/src",
                "specversion": "1.0",
                "type": "t",
                "extensions": {"trace": "abc"}
            })
        );
    }
}
