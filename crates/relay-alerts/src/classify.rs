//! Severity classification of an alert batch.

use crate::types::{Alert, Severity};

/// Alerts of one batch split by delivery class.
///
/// Every input alert lands in exactly one bucket and input order is kept
/// inside each bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeverityBuckets<'a> {
    /// `severity=critical`: sent individually, with sound.
    pub critical: Vec<&'a Alert>,
    /// `severity=warning`: sent as one silent group.
    pub warning: Vec<&'a Alert>,
    /// Everything else, including unset severity: sent individually, silent.
    pub other: Vec<&'a Alert>,
}

impl SeverityBuckets<'_> {
    /// Total number of alerts across all buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.critical.len() + self.warning.len() + self.other.len()
    }

    /// Returns true if no bucket holds an alert.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Splits alerts into critical, warning and other buckets.
#[must_use]
pub fn partition_by_severity(alerts: &[Alert]) -> SeverityBuckets<'_> {
    let mut buckets = SeverityBuckets::default();
    for alert in alerts {
        match alert.severity() {
            Severity::Critical => buckets.critical.push(alert),
            Severity::Warning => buckets.warning.push(alert),
            Severity::Info | Severity::Unknown => buckets.other.push(alert),
        }
    }
    buckets
}
