//! Desktop host backed by the system URI handler.
//!
//! Desktop systems expose no way to enumerate mail clients or to show an
//! app chooser, so [`DesktopHost`] reports no candidates and both launch
//! styles hand the `mailto:` URI to the registered handler via `opener`.
//! Attachments cannot travel in a `mailto:` URI; they are logged and left
//! out.

use std::io;
use std::time::Duration;

use notify_rust::{Notification, Timeout};

use crate::host::{HandlerCandidate, LaunchError, MailHost, Notifier};
use crate::intent::ComposeIntent;

/// How long a desktop notification stays visible.
const NOTIFICATION_TIMEOUT: Duration = Duration::from_millis(3500);

/// Launches composition requests with the desktop's default mail handler.
#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopHost;

impl DesktopHost {
    fn open(intent: &ComposeIntent) -> Result<(), LaunchError> {
        if let Some(extras) = intent.extras() {
            if !extras.streams.is_empty() {
                tracing::warn!(
                    count = extras.streams.len(),
                    "mailto: cannot carry attachments, dropping them"
                );
            }
        }

        let uri = intent.to_mailto_uri();
        tracing::debug!(%uri, "opening mail handler");
        opener::open(&uri).map_err(map_open_error)
    }
}

impl MailHost for DesktopHost {
    fn query_handlers(&self, _intent: &ComposeIntent) -> Vec<HandlerCandidate> {
        Vec::new()
    }

    fn launch(&self, intent: &ComposeIntent) -> Result<(), LaunchError> {
        Self::open(intent)
    }

    fn launch_chooser(&self, intent: &ComposeIntent, title: &str) -> Result<(), LaunchError> {
        tracing::debug!(title, "desktop has no chooser, using default handler");
        Self::open(intent)
    }
}

/// Maps `opener` failures onto launch failures.
fn map_open_error(err: opener::OpenError) -> LaunchError {
    match err {
        opener::OpenError::Io(e) | opener::OpenError::Spawn { source: e, .. } => map_io_error(&e),
        // The launcher ran but found nothing to open the URI with.
        other => LaunchError::NoHandler(other.to_string()),
    }
}

fn map_io_error(err: &io::Error) -> LaunchError {
    match err.kind() {
        io::ErrorKind::PermissionDenied => LaunchError::AccessDenied(err.to_string()),
        io::ErrorKind::NotFound => LaunchError::NoHandler(err.to_string()),
        _ => LaunchError::Failed(err.to_string()),
    }
}

/// Shows notifications through the desktop notification service.
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    app_name: String,
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self::new(env!("CARGO_PKG_NAME"))
    }
}

impl DesktopNotifier {
    /// Creates a notifier that shows notifications under `app_name`.
    #[must_use]
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
        }
    }
}

impl Notifier for DesktopNotifier {
    #[allow(clippy::cast_possible_truncation)]
    fn notify(&self, text: &str) {
        let result = Notification::new()
            .appname(&self.app_name)
            .summary(&self.app_name)
            .body(text)
            .timeout(Timeout::Milliseconds(NOTIFICATION_TIMEOUT.as_millis() as u32))
            .show();

        if let Err(e) = result {
            tracing::warn!(?e, text, "failed to show notification");
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::unreadable_literal,
    clippy::used_underscore_items,
    clippy::similar_names
)]
mod tests {
    use super::*;
    use crate::EmailRequest;

    #[test]
    fn test_io_error_mapping() {
        let denied = io::Error::from(io::ErrorKind::PermissionDenied);
        assert!(matches!(map_io_error(&denied), LaunchError::AccessDenied(_)));

        let missing = io::Error::from(io::ErrorKind::NotFound);
        assert!(matches!(map_io_error(&missing), LaunchError::NoHandler(_)));

        let other = io::Error::from(io::ErrorKind::Interrupted);
        assert!(matches!(map_io_error(&other), LaunchError::Failed(_)));
    }

    #[test]
    fn test_open_error_mapping() {
        let err = opener::OpenError::Io(io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(map_open_error(err), LaunchError::AccessDenied(_)));
    }

    #[test]
    fn test_desktop_reports_no_candidates() {
        let intent = ComposeIntent::from_request(&EmailRequest::to("a@b.com")).unwrap();
        assert!(DesktopHost.query_handlers(&intent).is_empty());
        assert!(DesktopHost.resolve(&intent).is_none());
    }
}
