//! Mail composer dispatch.
//!
//! Turns an [`EmailRequest`] into a [`ComposeIntent`] and walks the launch
//! fallback chain:
//!
//! - Without attachments: launch directly if the host resolves the request,
//!   otherwise show the chooser.
//! - With attachments: if the known-handler heuristic picks a package,
//!   show the chooser targeted at it. Otherwise fall back as above.
//!
//! Access-denied and no-handler failures are reported through the
//! [`Notifier`] and yield `Ok(false)`. Other host failures propagate.

use crate::config::{DispatcherConfig, ResolvedTexts};
use crate::error::Result;
use crate::host::{LaunchError, MailHost, Notifier};
use crate::intent::{ComposeAction, ComposeIntent};
use crate::known::select_known_handler;
use crate::request::EmailRequest;

/// How a single launch attempt reaches the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LaunchMode {
    Direct,
    Chooser,
}

/// Dispatches composition requests to a host.
#[derive(Debug)]
pub struct Dispatcher<H, N> {
    host: H,
    notifier: N,
    config: DispatcherConfig,
}

impl<H: MailHost, N: Notifier> Dispatcher<H, N> {
    /// Creates a dispatcher with the default configuration.
    #[must_use]
    pub fn new(host: H, notifier: N) -> Self {
        Self::with_config(host, notifier, DispatcherConfig::default())
    }

    /// Creates a dispatcher with the given configuration.
    #[must_use]
    pub const fn with_config(host: H, notifier: N, config: DispatcherConfig) -> Self {
        Self {
            host,
            notifier,
            config,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Returns the host.
    #[must_use]
    pub const fn host(&self) -> &H {
        &self.host
    }

    /// Opens a mail composer pre-filled from `request`.
    ///
    /// Returns `Ok(true)` once the host accepts a launch, `Ok(false)` if the
    /// launch was denied or no mail app was found (the user is notified).
    ///
    /// # Errors
    ///
    /// Returns an error if an attachment cannot be expressed as a file URL,
    /// or if the host fails in any other way.
    pub fn send_email(&self, request: &EmailRequest) -> Result<bool> {
        let texts = request.texts.resolve(&self.config.texts);
        let intent = ComposeIntent::from_request(request)?;

        match intent.action() {
            ComposeAction::View => self.dispatch_resolved(&intent, &texts),
            ComposeAction::SendMultiple => self.dispatch_with_attachments(intent, &texts),
        }
    }

    /// Prefers a known mail client, then falls back to the generic chain.
    fn dispatch_with_attachments(
        &self,
        intent: ComposeIntent,
        texts: &ResolvedTexts,
    ) -> Result<bool> {
        let candidates = self.host.query_handlers(&intent);
        tracing::debug!(count = candidates.len(), "mail handlers found");

        let selected = select_known_handler(
            &candidates,
            &self.config.known_clients,
            self.config.match_policy,
        );
        if let Some(package) = selected {
            tracing::debug!(package = package.as_str(), "targeting known mail client");
            let intent = intent.with_package(package);
            return self.attempt(LaunchMode::Chooser, &intent, texts);
        }

        self.dispatch_resolved(&intent, texts)
    }

    /// Launches directly if the host resolves the request, otherwise shows
    /// the chooser.
    fn dispatch_resolved(&self, intent: &ComposeIntent, texts: &ResolvedTexts) -> Result<bool> {
        let mode = if self.host.resolve(intent).is_some() {
            LaunchMode::Direct
        } else {
            LaunchMode::Chooser
        };
        self.attempt(mode, intent, texts)
    }

    fn attempt(
        &self,
        mode: LaunchMode,
        intent: &ComposeIntent,
        texts: &ResolvedTexts,
    ) -> Result<bool> {
        tracing::debug!(?mode, data = intent.data(), "launching mail composer");
        let result = match mode {
            LaunchMode::Direct => self.host.launch(intent),
            LaunchMode::Chooser => self.host.launch_chooser(intent, &texts.picker_title),
        };

        match result {
            Ok(()) => Ok(true),
            Err(LaunchError::AccessDenied(reason)) => {
                tracing::warn!(%reason, ?mode, "mail composer launch denied");
                self.notifier.notify(&texts.denied_message);
                Ok(false)
            }
            Err(LaunchError::NoHandler(reason)) => {
                tracing::warn!(%reason, ?mode, "no mail composer available");
                self.notifier.notify(&texts.no_handler_message);
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Opens a mail composer with the default configuration.
///
/// Shorthand for [`Dispatcher::new`] followed by [`Dispatcher::send_email`].
///
/// # Errors
///
/// See [`Dispatcher::send_email`].
pub fn send_email<H: MailHost, N: Notifier>(
    host: H,
    notifier: N,
    request: &EmailRequest,
) -> Result<bool> {
    Dispatcher::new(host, notifier).send_email(request)
}
