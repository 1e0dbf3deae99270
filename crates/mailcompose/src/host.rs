//! Host abstraction for testability.
//!
//! The dispatcher never talks to an operating system directly. It asks a
//! [`MailHost`] which apps can take a request and to launch it, and tells a
//! [`Notifier`] when a launch fails in an expected way.
//!
//! In production, use the `desktop` host (or an embedding's own host). In
//! tests, use [`MockHost`] and [`RecordingNotifier`] to script the host's
//! answers and inspect what was launched.
//!
//! # Example
//!
//! ```
//! use mailcompose::host::{HandlerCandidate, HostCall, MockHost, MockOutcome};
//! use mailcompose::{ComposeIntent, EmailRequest, MailHost};
//!
//! let host = MockHost::new()
//!     .with_candidates([HandlerCandidate::new("com.fsck.k9", "MessageCompose")])
//!     .with_launch_outcome(MockOutcome::Deny);
//!
//! let intent = ComposeIntent::from_request(&EmailRequest::to("a@b.com")).unwrap();
//! assert!(host.resolve(&intent).is_some());
//! assert!(host.launch(&intent).is_err());
//! assert!(matches!(host.calls()[0], HostCall::Launch(_)));
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use crate::intent::ComposeIntent;

/// An installed application able to service a composition request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HandlerCandidate {
    /// Package (application) identifier.
    pub package: String,
    /// Component (activity) name within the package.
    pub component: String,
}

impl HandlerCandidate {
    /// Creates a new candidate.
    #[must_use]
    pub fn new(package: impl Into<String>, component: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            component: component.into(),
        }
    }

    /// Checks whether the package or component name contains `needle`,
    /// ignoring case.
    #[must_use]
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.package.to_lowercase().contains(&needle)
            || self.component.to_lowercase().contains(&needle)
    }
}

/// Why the host could not launch a request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LaunchError {
    /// The host's access-control layer refused the launch.
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// No application could take the request at launch time.
    #[error("No handler found: {0}")]
    NoHandler(String),

    /// Any other failure.
    #[error("{0}")]
    Failed(String),
}

impl LaunchError {
    /// Returns `true` for the failures the dispatcher reports to the user
    /// instead of propagating.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::AccessDenied(_) | Self::NoHandler(_))
    }
}

/// Activity resolution and launch facilities of the host system.
pub trait MailHost: Send + Sync {
    /// Lists every installed application able to take `intent`.
    fn query_handlers(&self, intent: &ComposeIntent) -> Vec<HandlerCandidate>;

    /// Returns the application the host would launch for `intent`, if any.
    fn resolve(&self, intent: &ComposeIntent) -> Option<HandlerCandidate> {
        self.query_handlers(intent).into_iter().next()
    }

    /// Launches `intent` directly.
    ///
    /// # Errors
    ///
    /// Returns a [`LaunchError`] if the host refuses or cannot launch it.
    fn launch(&self, intent: &ComposeIntent) -> Result<(), LaunchError>;

    /// Presents the host's app chooser for `intent` under `title`.
    ///
    /// # Errors
    ///
    /// Returns a [`LaunchError`] if the host refuses or cannot launch it.
    fn launch_chooser(&self, intent: &ComposeIntent, title: &str) -> Result<(), LaunchError>;
}

impl<T: MailHost + ?Sized> MailHost for &T {
    fn query_handlers(&self, intent: &ComposeIntent) -> Vec<HandlerCandidate> {
        (**self).query_handlers(intent)
    }

    fn resolve(&self, intent: &ComposeIntent) -> Option<HandlerCandidate> {
        (**self).resolve(intent)
    }

    fn launch(&self, intent: &ComposeIntent) -> Result<(), LaunchError> {
        (**self).launch(intent)
    }

    fn launch_chooser(&self, intent: &ComposeIntent, title: &str) -> Result<(), LaunchError> {
        (**self).launch_chooser(intent, title)
    }
}

impl<T: MailHost + ?Sized> MailHost for Arc<T> {
    fn query_handlers(&self, intent: &ComposeIntent) -> Vec<HandlerCandidate> {
        (**self).query_handlers(intent)
    }

    fn resolve(&self, intent: &ComposeIntent) -> Option<HandlerCandidate> {
        (**self).resolve(intent)
    }

    fn launch(&self, intent: &ComposeIntent) -> Result<(), LaunchError> {
        (**self).launch(intent)
    }

    fn launch_chooser(&self, intent: &ComposeIntent, title: &str) -> Result<(), LaunchError> {
        (**self).launch_chooser(intent, title)
    }
}

/// Fire-and-forget, auto-dismissing user notification.
pub trait Notifier: Send + Sync {
    /// Shows `text` to the user. Must not block.
    fn notify(&self, text: &str);
}

impl<T: Notifier + ?Sized> Notifier for &T {
    fn notify(&self, text: &str) {
        (**self).notify(text);
    }
}

impl<T: Notifier + ?Sized> Notifier for Arc<T> {
    fn notify(&self, text: &str) {
        (**self).notify(text);
    }
}

/// A notifier that logs notifications using tracing.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingNotifier;

impl Notifier for LoggingNotifier {
    fn notify(&self, text: &str) {
        tracing::info!(text, "notification");
    }
}

/// A notifier that keeps every notification for later inspection.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    shown: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    /// Creates an empty recording notifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every notification shown so far, oldest first.
    #[must_use]
    pub fn shown(&self) -> Vec<String> {
        self.shown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, text: &str) {
        self.shown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(text.to_string());
    }
}

/// Scripted result of a mock launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MockOutcome {
    /// The launch succeeds.
    #[default]
    Succeed,
    /// The host denies the launch.
    Deny,
    /// No handler exists at launch time.
    NoHandler,
    /// An unexpected host failure.
    Fail,
}

impl MockOutcome {
    fn into_result(self) -> Result<(), LaunchError> {
        match self {
            Self::Succeed => Ok(()),
            Self::Deny => Err(LaunchError::AccessDenied("mock denial".to_string())),
            Self::NoHandler => Err(LaunchError::NoHandler("mock has no handler".to_string())),
            Self::Fail => Err(LaunchError::Failed("mock failure".to_string())),
        }
    }
}

/// A launch recorded by [`MockHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    /// Direct launch.
    Launch(ComposeIntent),
    /// Chooser launch.
    Chooser {
        /// The wrapped request.
        intent: ComposeIntent,
        /// Chooser title.
        title: String,
    },
}

/// A mock host for testing dispatch logic.
///
/// Query results and launch outcomes are fixed at construction; every
/// launch attempt is recorded.
#[derive(Debug, Default)]
pub struct MockHost {
    candidates: Vec<HandlerCandidate>,
    resolvable: Option<bool>,
    launch_outcome: MockOutcome,
    chooser_outcome: MockOutcome,
    calls: Mutex<Vec<HostCall>>,
}

impl MockHost {
    /// Creates a host with no handlers whose launches succeed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the handlers reported by [`MailHost::query_handlers`].
    #[must_use]
    pub fn with_candidates(
        mut self,
        candidates: impl IntoIterator<Item = HandlerCandidate>,
    ) -> Self {
        self.candidates = candidates.into_iter().collect();
        self
    }

    /// Forces [`MailHost::resolve`] to succeed or fail regardless of the
    /// candidate list.
    #[must_use]
    pub const fn with_resolvable(mut self, resolvable: bool) -> Self {
        self.resolvable = Some(resolvable);
        self
    }

    /// Sets the outcome of direct launches.
    #[must_use]
    pub const fn with_launch_outcome(mut self, outcome: MockOutcome) -> Self {
        self.launch_outcome = outcome;
        self
    }

    /// Sets the outcome of chooser launches.
    #[must_use]
    pub const fn with_chooser_outcome(mut self, outcome: MockOutcome) -> Self {
        self.chooser_outcome = outcome;
        self
    }

    /// Returns every launch attempt so far, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<HostCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, call: HostCall) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }
}

impl MailHost for MockHost {
    fn query_handlers(&self, _intent: &ComposeIntent) -> Vec<HandlerCandidate> {
        self.candidates.clone()
    }

    fn resolve(&self, _intent: &ComposeIntent) -> Option<HandlerCandidate> {
        match self.resolvable {
            Some(false) => None,
            Some(true) => Some(self.candidates.first().cloned().unwrap_or_else(|| {
                HandlerCandidate::new("android", "com.android.internal.app.ResolverActivity")
            })),
            None => self.candidates.first().cloned(),
        }
    }

    fn launch(&self, intent: &ComposeIntent) -> Result<(), LaunchError> {
        self.record(HostCall::Launch(intent.clone()));
        self.launch_outcome.into_result()
    }

    fn launch_chooser(&self, intent: &ComposeIntent, title: &str) -> Result<(), LaunchError> {
        self.record(HostCall::Chooser {
            intent: intent.clone(),
            title: title.to_string(),
        });
        self.chooser_outcome.into_result()
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

    fn intent() -> ComposeIntent {
        ComposeIntent::from_request(&EmailRequest::to("a@b.com")).unwrap()
    }

    #[test]
    fn test_candidate_matches_ignoring_case() {
        let candidate = HandlerCandidate::new("Com.Google.Android.GM", "ComposeActivityGmail");
        assert!(candidate.matches("com.google.android.gm"));
        assert!(candidate.matches("COMPOSEACTIVITY"));
        assert!(!candidate.matches("com.fsck.k9"));
    }

    #[test]
    fn test_recoverable_errors() {
        assert!(LaunchError::AccessDenied(String::new()).is_recoverable());
        assert!(LaunchError::NoHandler(String::new()).is_recoverable());
        assert!(!LaunchError::Failed(String::new()).is_recoverable());
    }

    #[test]
    fn test_mock_resolve_defaults_to_candidates() {
        let intent = intent();
        assert!(MockHost::new().resolve(&intent).is_none());

        let host = MockHost::new().with_candidates([HandlerCandidate::new("a", "b")]);
        assert_eq!(host.resolve(&intent), Some(HandlerCandidate::new("a", "b")));
        assert!(host.with_resolvable(false).resolve(&intent).is_none());
        assert!(MockHost::new().with_resolvable(true).resolve(&intent).is_some());
    }

    #[test]
    fn test_mock_records_calls() {
        let intent = intent();
        let host = MockHost::new().with_chooser_outcome(MockOutcome::NoHandler);

        assert!(host.launch(&intent).is_ok());
        assert_eq!(
            host.launch_chooser(&intent, "Pick"),
            Err(LaunchError::NoHandler("mock has no handler".to_string()))
        );
        assert_eq!(
            host.calls(),
            vec![
                HostCall::Launch(intent.clone()),
                HostCall::Chooser {
                    intent,
                    title: "Pick".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_host_through_reference_and_arc() {
        let host = Arc::new(MockHost::new().with_launch_outcome(MockOutcome::Fail));
        let by_ref: &dyn MailHost = &*host;
        assert!(by_ref.launch(&intent()).is_err());
        assert!(host.clone().launch(&intent()).is_err());
        assert_eq!(host.calls().len(), 2);
    }

    #[test]
    fn test_recording_notifier() {
        let notifier = RecordingNotifier::new();
        (&notifier).notify("one");
        notifier.notify("two");
        assert_eq!(notifier.shown(), vec!["one".to_string(), "two".to_string()]);
    }
}
