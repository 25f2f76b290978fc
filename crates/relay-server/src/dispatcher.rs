//! Routing of an alert batch to notifications.
//!
//! Critical alerts are sent one by one with sound. Warnings are collapsed
//! into a single silent group message. Everything else, including alerts
//! without a `severity` label, is sent one by one silently. Sends within a
//! batch are sequential so delivery order follows the batch.

use relay_alerts::{
    Alert, AlertBatch, DEFAULT_GROUP_LIMIT, format_alert, format_group, partition_by_severity, warning_group_title,
};
use relay_telegram::{Notifier, OutboundMessage};
use tracing::{debug, info};

/// Counts for one dispatched batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    /// Critical alerts in the batch.
    pub critical: usize,
    /// Warning alerts in the batch.
    pub warning: usize,
    /// Alerts of any other severity.
    pub other: usize,
    /// Messages accepted by the notifier.
    pub sent: usize,
    /// Messages the notifier did not deliver.
    pub failed: usize,
}

impl DispatchSummary {
    /// Total messages attempted.
    #[must_use]
    pub const fn messages(&self) -> usize {
        self.sent + self.failed
    }

    fn record(&mut self, delivered: bool) {
        if delivered {
            self.sent += 1;
        } else {
            self.failed += 1;
        }
    }
}

/// Turns alert batches into notifier calls.
#[derive(Debug)]
pub struct AlertDispatcher<N> {
    notifier: N,
    max_grouped_alerts: usize,
}

impl<N: Notifier> AlertDispatcher<N> {
    /// Create a dispatcher with the default group cap.
    #[must_use]
    pub const fn new(notifier: N) -> Self {
        Self {
            notifier,
            max_grouped_alerts: DEFAULT_GROUP_LIMIT,
        }
    }

    /// Set how many warnings the group message renders.
    #[must_use]
    pub const fn with_group_limit(mut self, max_grouped_alerts: usize) -> Self {
        self.max_grouped_alerts = max_grouped_alerts;
        self
    }

    /// The wrapped notifier.
    pub const fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Deliver `batch`. Failed sends are counted, never returned.
    pub async fn dispatch(&self, batch: &AlertBatch) -> DispatchSummary {
        if batch.is_empty() {
            debug!("empty alert batch, nothing to send");
            return DispatchSummary::default();
        }

        let buckets = partition_by_severity(&batch.alerts);
        let mut summary = DispatchSummary {
            critical: buckets.critical.len(),
            warning: buckets.warning.len(),
            other: buckets.other.len(),
            ..DispatchSummary::default()
        };

        for alert in &buckets.critical {
            summary.record(self.send_individual(alert, false).await);
        }

        if !buckets.warning.is_empty() {
            let title = warning_group_title(buckets.warning.len());
            let text = format_group(&buckets.warning, &title, self.max_grouped_alerts);
            summary.record(self.notifier.deliver(&OutboundMessage::silent(text)).await);
        }

        for alert in &buckets.other {
            summary.record(self.send_individual(alert, true).await);
        }

        info!(
            critical = summary.critical,
            warning = summary.warning,
            other = summary.other,
            sent = summary.sent,
            failed = summary.failed,
            "alert batch dispatched"
        );
        summary
    }

    async fn send_individual(&self, alert: &Alert, silent: bool) -> bool {
        let message = OutboundMessage::new(format_alert(alert), silent);
        self.notifier.deliver(&message).await
    }
}
