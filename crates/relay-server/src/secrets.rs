//! Secret resolution from a direct value or a mounted file.

use std::path::Path;

use tracing::{debug, warn};

/// Resolve a secret named `name`.
///
/// A non-empty `value` wins. Otherwise `file` is read if it exists. Both
/// sources are trimmed and an empty result counts as absent. Read failures
/// are logged and treated as absent. The secret itself is never logged.
#[must_use]
pub fn resolve_secret(name: &str, value: Option<&str>, file: Option<&Path>) -> Option<String> {
    if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
        debug!(secret = name, source = "value", "resolved secret");
        return Some(value.to_string());
    }

    let path = file?;
    if !path.exists() {
        warn!(secret = name, path = %path.display(), "secret file does not exist");
        return None;
    }

    match std::fs::read_to_string(path) {
        Ok(content) => {
            let content = content.trim();
            if content.is_empty() {
                warn!(secret = name, path = %path.display(), "secret file is empty");
                None
            } else {
                debug!(secret = name, source = "file", "resolved secret");
                Some(content.to_string())
            }
        }
        Err(e) => {
            warn!(secret = name, path = %path.display(), error = %e, "failed to read secret file");
            None
        }
    }
}
