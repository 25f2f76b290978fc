//! Telegram HTML rendering of alerts.
//!
//! Output targets `parse_mode=HTML`. Every value taken from the payload is
//! escaped before it is embedded, so labels and annotations can never
//! inject markup.

use std::borrow::Borrow;
use std::fmt::Write as _;

use crate::types::{Alert, AlertStatus, LABEL_INSTANCE, LABEL_JOB, Severity};

/// Default number of alerts rendered in a group message.
pub const DEFAULT_GROUP_LIMIT: usize = 5;

const GENERIC_ICON: &str = "📢";

/// Escapes `&`, `<`, `>` and `"` for Telegram HTML.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Blank values render as their fallback, like missing ones.
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

const fn status_icon(status: AlertStatus) -> &'static str {
    match status {
        AlertStatus::Firing => "🔴",
        AlertStatus::Resolved => "✅",
        AlertStatus::Pending => "⚠️",
        AlertStatus::Unknown => GENERIC_ICON,
    }
}

const fn severity_icon(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "🔴",
        Severity::Warning => "⚠️",
        Severity::Info => "ℹ️",
        Severity::Unknown => GENERIC_ICON,
    }
}

/// Renders one alert.
///
/// Layout: name, severity, status, summary, description, instance, service
/// (the `job` label), then `Started`/`Ended` lines when the timestamps are
/// present.
#[must_use]
pub fn format_alert(alert: &Alert) -> String {
    let severity_text = non_blank(alert.severity_label())
        .map_or_else(|| "UNKNOWN".to_string(), str::to_uppercase);

    let mut message = format!(
        "{status_icon} <b>{name}</b>\n\
         \n\
         {severity_icon} <b>Severity:</b> {severity}\n\
         📊 <b>Status:</b> {status}\n\
         \n\
         <b>Summary:</b> {summary}\n\
         <b>Description:</b> {description}\n\
         \n\
         <b>Instance:</b> {instance}\n\
         <b>Service:</b> {service}",
        status_icon = status_icon(alert.status),
        name = escape_html(non_blank(alert.name()).unwrap_or("Unknown Alert")),
        severity_icon = severity_icon(alert.severity()),
        severity = escape_html(&severity_text),
        status = alert.status.as_str().to_uppercase(),
        summary = escape_html(non_blank(alert.annotation("summary")).unwrap_or("No summary")),
        description = escape_html(non_blank(alert.annotation("description")).unwrap_or("No description")),
        instance = escape_html(non_blank(alert.label(LABEL_INSTANCE)).unwrap_or("N/A")),
        service = escape_html(non_blank(alert.label(LABEL_JOB)).unwrap_or("N/A")),
    );

    if let Some(starts_at) = &alert.starts_at {
        let _ = write!(message, "\n<b>Started:</b> {}", escape_html(starts_at));
    }
    if let Some(ends_at) = &alert.ends_at {
        let _ = write!(message, "\n<b>Ended:</b> {}", escape_html(ends_at));
    }

    message
}

/// Renders up to `max_alerts` alerts under `title`.
///
/// `title` is trusted markup and is not escaped. When the group is larger
/// than the cap a trailing line reports how many alerts were left out.
#[must_use]
pub fn format_group<A: Borrow<Alert>>(alerts: &[A], title: &str, max_alerts: usize) -> String {
    let mut message = format!("{title}\n\n");
    for alert in alerts.iter().take(max_alerts) {
        message.push_str(&format_alert(alert.borrow()));
        message.push_str("\n\n");
    }
    if alerts.len() > max_alerts {
        let _ = write!(message, "... and {} more alerts", alerts.len() - max_alerts);
    }
    message
}

/// Title used for the grouped warning message.
#[must_use]
pub fn warning_group_title(count: usize) -> String {
    format!("⚠️ <b>Warning Alerts ({count})</b>")
}
