//! Alertmanager webhook model and Telegram message rendering.
//!
//! `relay-alerts` holds everything about an alert that does not involve I/O:
//!
//! - **Model**: [`Alert`] and [`AlertBatch`] deserialize the Alertmanager
//!   webhook body (version 4), tolerating missing fields
//! - **Classification**: [`partition_by_severity`] splits a batch into the
//!   critical, warning and other buckets that drive delivery
//! - **Formatting**: [`format_alert`] and [`format_group`] render
//!   HTML-escaped text for the Telegram `sendMessage` call
//!
//! # Example
//!
//! ```rust
//! use relay_alerts::{AlertBatch, format_alert, partition_by_severity};
//!
//! let body = br#"{"alerts":[{"status":"firing","labels":{"severity":"critical","alertname":"DiskFull"}}]}"#;
//! let batch = AlertBatch::from_json(body).unwrap();
//!
//! let buckets = partition_by_severity(&batch.alerts);
//! assert_eq!(buckets.critical.len(), 1);
//!
//! let text = format_alert(buckets.critical[0]);
//! assert!(text.contains("<b>DiskFull</b>"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod classify;
pub mod error;
pub mod format;
pub mod types;

// Re-export main types at crate root
pub use classify::{SeverityBuckets, partition_by_severity};
pub use error::{AlertError, Result};
pub use format::{DEFAULT_GROUP_LIMIT, escape_html, format_alert, format_group, warning_group_title};
pub use types::{Alert, AlertBatch, AlertStatus, Severity};
