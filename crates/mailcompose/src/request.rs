//! Email composition requests.

use std::path::PathBuf;

use crate::config::UiTexts;
use crate::validation::is_valid_email;

/// Everything needed to pre-fill a mail composer.
///
/// Recipients are passed to the host as given; call
/// [`EmailRequest::invalid_recipients`] to check them first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailRequest {
    /// Recipient addresses, in order.
    pub recipients: Vec<String>,
    /// Subject line.
    pub subject: Option<String>,
    /// Plain text body.
    pub body: Option<String>,
    /// Files to attach, in order.
    pub attachments: Vec<PathBuf>,
    /// Per-request overrides of user-facing texts.
    pub texts: UiTexts,
}

impl EmailRequest {
    /// Creates an empty request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a request for a single recipient. An empty address leaves the
    /// recipient list empty.
    #[must_use]
    pub fn to(recipient: impl Into<String>) -> Self {
        Self::new().recipient(recipient)
    }

    /// Adds a recipient. Empty addresses are ignored.
    #[must_use]
    pub fn recipient(mut self, recipient: impl Into<String>) -> Self {
        let recipient = recipient.into();
        if !recipient.is_empty() {
            self.recipients.push(recipient);
        }
        self
    }

    /// Adds several recipients.
    #[must_use]
    pub fn recipients<I, S>(self, recipients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        recipients
            .into_iter()
            .fold(self, |request, recipient| request.recipient(recipient))
    }

    /// Sets the subject.
    #[must_use]
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Adds an attachment.
    #[must_use]
    pub fn attach(mut self, path: impl Into<PathBuf>) -> Self {
        self.attachments.push(path.into());
        self
    }

    /// Adds several attachments.
    #[must_use]
    pub fn attachments<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.attachments.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Overrides the chooser title.
    #[must_use]
    pub fn picker_title(mut self, title: impl Into<String>) -> Self {
        self.texts.picker_title = Some(title.into());
        self
    }

    /// Overrides the access-denied notification.
    #[must_use]
    pub fn denied_message(mut self, message: impl Into<String>) -> Self {
        self.texts.denied_message = Some(message.into());
        self
    }

    /// Overrides the no-handler notification.
    #[must_use]
    pub fn no_handler_message(mut self, message: impl Into<String>) -> Self {
        self.texts.no_handler_message = Some(message.into());
        self
    }

    /// Returns `true` if the request carries attachments.
    #[must_use]
    pub fn has_attachments(&self) -> bool {
        !self.attachments.is_empty()
    }

    /// Returns the recipients that do not look like valid addresses.
    #[must_use]
    pub fn invalid_recipients(&self) -> Vec<&str> {
        self.recipients
            .iter()
            .map(String::as_str)
            .filter(|r| !is_valid_email(r))
            .collect()
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

    #[test]
    fn test_single_recipient() {
        let request = EmailRequest::to("a@b.com");
        assert_eq!(request.recipients, vec!["a@b.com".to_string()]);
        assert!(EmailRequest::to("").recipients.is_empty());
    }

    #[test]
    fn test_builder() {
        let request = EmailRequest::new()
            .recipients(["a@b.com", "", "c@d.org"])
            .subject("Hi")
            .body("Hello")
            .attach("/tmp/a.txt")
            .attachments(["/tmp/b.txt"])
            .picker_title("Pick")
            .denied_message("Denied")
            .no_handler_message("Nothing");

        assert_eq!(request.recipients, vec!["a@b.com", "c@d.org"]);
        assert_eq!(request.subject.as_deref(), Some("Hi"));
        assert_eq!(request.body.as_deref(), Some("Hello"));
        assert_eq!(
            request.attachments,
            vec![PathBuf::from("/tmp/a.txt"), PathBuf::from("/tmp/b.txt")]
        );
        assert!(request.has_attachments());
        assert_eq!(request.texts.picker_title.as_deref(), Some("Pick"));
        assert_eq!(request.texts.denied_message.as_deref(), Some("Denied"));
        assert_eq!(request.texts.no_handler_message.as_deref(), Some("Nothing"));
    }

    #[test]
    fn test_invalid_recipients() {
        let request = EmailRequest::new().recipients(["a@b.com", "nope", "x@.y.com"]);
        assert_eq!(request.invalid_recipients(), vec!["nope", "x@.y.com"]);
    }
}
