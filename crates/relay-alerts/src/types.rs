//! Core types for Alertmanager webhook payloads.
//!
//! This module provides the types received on the webhook endpoint:
//! - [`AlertStatus`]: The status of an alert or of a whole batch
//! - [`Severity`]: The urgency derived from the `severity` label
//! - [`Alert`]: One alert instance with labels and annotations
//! - [`AlertBatch`]: The grouped envelope Alertmanager posts

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Result;

/// Label carrying the alert name.
pub const LABEL_ALERTNAME: &str = "alertname";
/// Label carrying the alert severity.
pub const LABEL_SEVERITY: &str = "severity";
/// Label carrying the scraped instance.
pub const LABEL_INSTANCE: &str = "instance";
/// Label carrying the scrape job, rendered as the service.
pub const LABEL_JOB: &str = "job";

/// The status of an alert as reported by Alertmanager.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    /// The alert is actively firing.
    Firing,
    /// The alert was firing and has been resolved.
    Resolved,
    /// The alert condition holds but has not fired yet.
    Pending,
    /// Missing or unrecognised status.
    #[default]
    #[serde(other)]
    Unknown,
}

impl AlertStatus {
    /// Returns the status as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Firing => "firing",
            Self::Resolved => "resolved",
            Self::Pending => "pending",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Alert urgency, read from the `severity` label.
///
/// Matching is exact and case-sensitive: `Critical` is not `critical`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Requires immediate attention.
    Critical,
    /// Should be investigated.
    Warning,
    /// Informational only.
    Info,
    /// Unset or unrecognised severity.
    #[default]
    Unknown,
}

impl Severity {
    /// Parses a `severity` label value.
    #[must_use]
    pub fn from_label(value: Option<&str>) -> Self {
        match value {
            Some("critical") => Self::Critical,
            Some("warning") => Self::Warning,
            Some("info") => Self::Info,
            _ => Self::Unknown,
        }
    }

    /// Returns the severity as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single alert from an Alertmanager webhook.
///
/// Timestamps are kept verbatim so they render exactly as received.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    /// Status of the alert.
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: AlertStatus,
    /// Identifying labels (`alertname`, `severity`, `instance`, `job`, ...).
    #[serde(default, deserialize_with = "null_as_default")]
    pub labels: HashMap<String, String>,
    /// Descriptive annotations (`summary`, `description`, ...).
    #[serde(default, deserialize_with = "null_as_default")]
    pub annotations: HashMap<String, String>,
    /// When the alert started firing.
    #[serde(default, deserialize_with = "deserialize_timestamp", skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<String>,
    /// When the alert stopped firing.
    #[serde(default, deserialize_with = "deserialize_timestamp", skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<String>,
    /// Link back to the rule that generated the alert.
    #[serde(default, rename = "generatorURL", skip_serializing_if = "Option::is_none")]
    pub generator_url: Option<String>,
    /// Alertmanager fingerprint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
}

impl Alert {
    /// Creates an alert with the given status and no labels.
    #[must_use]
    pub fn new(status: AlertStatus) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    /// Adds a label to the alert.
    #[must_use]
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Adds an annotation to the alert.
    #[must_use]
    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.annotations.insert(key.into(), value.into());
        self
    }

    /// Sets the start timestamp.
    #[must_use]
    pub fn with_starts_at(mut self, at: impl Into<String>) -> Self {
        self.starts_at = Some(at.into());
        self
    }

    /// Sets the end timestamp.
    #[must_use]
    pub fn with_ends_at(mut self, at: impl Into<String>) -> Self {
        self.ends_at = Some(at.into());
        self
    }

    /// Returns a label value.
    #[must_use]
    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }

    /// Returns an annotation value.
    #[must_use]
    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.annotations.get(key).map(String::as_str)
    }

    /// Returns the `alertname` label.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.label(LABEL_ALERTNAME)
    }

    /// Returns the raw `severity` label.
    #[must_use]
    pub fn severity_label(&self) -> Option<&str> {
        self.label(LABEL_SEVERITY)
    }

    /// Returns the parsed severity.
    #[must_use]
    pub fn severity(&self) -> Severity {
        Severity::from_label(self.severity_label())
    }
}

/// The envelope Alertmanager posts to webhook receivers.
///
/// Only `alerts` drives dispatch; the group metadata is kept for logging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertBatch {
    /// Payload format version (Alertmanager sends `"4"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Key identifying the alert group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_key: Option<String>,
    /// Receiver the group was routed to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<String>,
    /// Batch-level status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AlertStatus>,
    /// Labels the group was formed on.
    #[serde(default, deserialize_with = "null_as_default")]
    pub group_labels: HashMap<String, String>,
    /// Labels shared by every alert in the batch.
    #[serde(default, deserialize_with = "null_as_default")]
    pub common_labels: HashMap<String, String>,
    /// Annotations shared by every alert in the batch.
    #[serde(default, deserialize_with = "null_as_default")]
    pub common_annotations: HashMap<String, String>,
    /// Alertmanager external URL.
    #[serde(default, rename = "externalURL", skip_serializing_if = "Option::is_none")]
    pub external_url: Option<String>,
    /// Number of alerts Alertmanager dropped from this batch.
    #[serde(default, deserialize_with = "null_as_default")]
    pub truncated_alerts: u64,
    /// The alerts, in delivery order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub alerts: Vec<Alert>,
}

impl AlertBatch {
    /// Creates a batch from a list of alerts.
    #[must_use]
    pub fn new(alerts: Vec<Alert>) -> Self {
        Self {
            alerts,
            ..Self::default()
        }
    }

    /// Parses a webhook body.
    ///
    /// # Errors
    ///
    /// Returns `AlertError::InvalidPayload` if the body is not valid JSON or
    /// does not match the webhook shape.
    pub fn from_json(body: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(body)?)
    }

    /// Returns true if the batch carries no alerts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    /// Returns the number of alerts in the batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.alerts.len()
    }
}

/// Returns true for timestamps Alertmanager uses to mean "not set".
///
/// Still-firing alerts carry `endsAt: "0001-01-01T00:00:00Z"`.
#[must_use]
pub fn is_unset_timestamp(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value.starts_with("0001-01-01")
}

/// Treats an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|value| !is_unset_timestamp(value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    const ALERTMANAGER_BODY: &str = r#"{
        "version": "4",
        "groupKey": "{}:{alertname=\"HighLatency\"}",
        "truncatedAlerts": 0,
        "status": "firing",
        "receiver": "telegram",
        "groupLabels": {"alertname": "HighLatency"},
        "commonLabels": {"alertname": "HighLatency", "severity": "warning"},
        "commonAnnotations": {},
        "externalURL": "http://alertmanager:9093",
        "alerts": [
            {
                "status": "firing",
                "labels": {"alertname": "HighLatency", "severity": "warning", "instance": "api-1:9100", "job": "api"},
                "annotations": {"summary": "p99 above 2s"},
                "startsAt": "2024-05-01T10:00:00Z",
                "endsAt": "0001-01-01T00:00:00Z",
                "generatorURL": "http://prometheus:9090/graph",
                "fingerprint": "a1b2c3"
            }
        ]
    }"#;

    #[test]
    fn parses_full_alertmanager_envelope() {
        let batch = AlertBatch::from_json(ALERTMANAGER_BODY.as_bytes()).unwrap();

        assert_eq!(batch.version.as_deref(), Some("4"));
        assert_eq!(batch.receiver.as_deref(), Some("telegram"));
        assert_eq!(batch.status, Some(AlertStatus::Firing));
        assert_eq!(batch.external_url.as_deref(), Some("http://alertmanager:9093"));
        assert_eq!(batch.len(), 1);

        let alert = &batch.alerts[0];
        assert_eq!(alert.status, AlertStatus::Firing);
        assert_eq!(alert.name(), Some("HighLatency"));
        assert_eq!(alert.severity(), Severity::Warning);
        assert_eq!(alert.annotation("summary"), Some("p99 above 2s"));
        assert_eq!(alert.starts_at.as_deref(), Some("2024-05-01T10:00:00Z"));
        assert_eq!(alert.generator_url.as_deref(), Some("http://prometheus:9090/graph"));
    }

    #[test]
    fn zero_end_timestamp_is_absent() {
        let batch = AlertBatch::from_json(ALERTMANAGER_BODY.as_bytes()).unwrap();
        assert!(batch.alerts[0].ends_at.is_none());
    }

    #[test]
    fn minimal_body_uses_defaults() {
        let batch = AlertBatch::from_json(br#"{"alerts":[{}]}"#).unwrap();

        let alert = &batch.alerts[0];
        assert_eq!(alert.status, AlertStatus::Unknown);
        assert!(alert.labels.is_empty());
        assert!(alert.annotations.is_empty());
        assert!(alert.starts_at.is_none());
        assert!(batch.status.is_none());
    }

    #[test]
    fn null_fields_use_defaults() {
        let batch = AlertBatch::from_json(
            br#"{"alerts":[{"status":null,"labels":{"severity":"critical","alertname":"X"}}]}"#,
        )
        .unwrap();
        let alert = &batch.alerts[0];
        assert_eq!(alert.status, AlertStatus::Unknown);
        assert_eq!(alert.severity(), Severity::Critical);

        let batch = AlertBatch::from_json(br#"{"alerts":[{"labels":null,"annotations":null}]}"#).unwrap();
        assert!(batch.alerts[0].labels.is_empty());
        assert!(batch.alerts[0].annotations.is_empty());
    }

    #[test]
    fn null_envelope_fields_use_defaults() {
        let batch = AlertBatch::from_json(
            br#"{"alerts":null,"groupLabels":null,"commonLabels":null,"commonAnnotations":null,"truncatedAlerts":null}"#,
        )
        .unwrap();
        assert!(batch.is_empty());
        assert!(batch.common_labels.is_empty());
        assert_eq!(batch.truncated_alerts, 0);
    }

    #[test]
    fn missing_alerts_is_empty_batch() {
        let batch = AlertBatch::from_json(b"{}").unwrap();
        assert!(batch.is_empty());
    }

    #[test]
    fn unknown_status_maps_to_unknown() {
        let batch = AlertBatch::from_json(br#"{"alerts":[{"status":"silenced"}]}"#).unwrap();
        assert_eq!(batch.alerts[0].status, AlertStatus::Unknown);
    }

    #[test]
    fn malformed_body_is_rejected() {
        assert!(AlertBatch::from_json(b"{\"alerts\": [").is_err());
        assert!(AlertBatch::from_json(br#"{"alerts": "nope"}"#).is_err());
    }

    #[test_case(Some("critical"), Severity::Critical ; "critical")]
    #[test_case(Some("warning"), Severity::Warning ; "warning")]
    #[test_case(Some("info"), Severity::Info ; "info")]
    #[test_case(Some("Critical"), Severity::Unknown ; "case sensitive")]
    #[test_case(Some("page"), Severity::Unknown ; "unrecognised")]
    #[test_case(None, Severity::Unknown ; "unset")]
    fn severity_from_label(label: Option<&str>, expected: Severity) {
        assert_eq!(Severity::from_label(label), expected);
    }

    #[test_case("", true ; "empty")]
    #[test_case("0001-01-01T00:00:00Z", true ; "go zero time")]
    #[test_case("2024-05-01T10:00:00Z", false ; "real timestamp")]
    fn unset_timestamp_detection(value: &str, unset: bool) {
        assert_eq!(is_unset_timestamp(value), unset);
    }

    #[test]
    fn status_display() {
        assert_eq!(AlertStatus::Firing.to_string(), "firing");
        assert_eq!(AlertStatus::Resolved.to_string(), "resolved");
        assert_eq!(AlertStatus::Pending.to_string(), "pending");
        assert_eq!(AlertStatus::Unknown.to_string(), "unknown");
    }

    #[test]
    fn builder_sets_fields() {
        let alert = Alert::new(AlertStatus::Resolved)
            .with_label("alertname", "X")
            .with_annotation("summary", "s")
            .with_starts_at("a")
            .with_ends_at("b");

        assert_eq!(alert.name(), Some("X"));
        assert_eq!(alert.annotation("summary"), Some("s"));
        assert_eq!(alert.starts_at.as_deref(), Some("a"));
        assert_eq!(alert.ends_at.as_deref(), Some("b"));
    }
}
