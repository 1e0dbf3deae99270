//! Platform-native composition requests.
//!
//! A request without attachments travels entirely inside a `mailto:` URI.
//! A request with attachments cannot, so it becomes a structured
//! "send multiple" request: the data is the bare scheme, the MIME type is
//! `message/rfc822`, and recipients, subject, body and file URLs ride along
//! as extras. The two shapes are never mixed.

use std::path::Path;

use url::Url;

use crate::error::{Error, Result};
use crate::mailto::{MAILTO_SCHEME, mailto_uri};
use crate::request::EmailRequest;

/// MIME type of a request with attachments.
pub const MESSAGE_MIME_TYPE: &str = "message/rfc822";

/// The host action a composition request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeAction {
    /// Open a `mailto:` URI.
    View,
    /// Share content with several attachments.
    SendMultiple,
}

/// Structured content of a request with attachments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailExtras {
    /// Recipient addresses.
    pub recipients: Vec<String>,
    /// Subject, if non-empty.
    pub subject: Option<String>,
    /// Body, if non-empty.
    pub body: Option<String>,
    /// Attachments as `file://` URLs.
    pub streams: Vec<Url>,
}

/// A composition request ready to hand to a [`MailHost`](crate::MailHost).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposeIntent {
    /// Plain request carried by a `mailto:` URI.
    View {
        /// The full `mailto:` URI.
        uri: String,
    },
    /// Request with attachments.
    SendMultiple {
        /// Recipients, subject, body and attachments.
        extras: MailExtras,
        /// Application the request is targeted at, if any.
        package: Option<String>,
    },
}

impl ComposeIntent {
    /// Builds the intent for `request`.
    ///
    /// Any attachment selects [`ComposeAction::SendMultiple`]; otherwise the
    /// result is a [`ComposeAction::View`] of a `mailto:` URI. Relative
    /// attachment paths are made absolute against the working directory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Attachment`] if an attachment path cannot be turned
    /// into a file URL.
    pub fn from_request(request: &EmailRequest) -> Result<Self> {
        let subject = non_empty(request.subject.as_deref());
        let body = non_empty(request.body.as_deref());

        if !request.has_attachments() {
            return Ok(Self::View {
                uri: mailto_uri(&request.recipients, subject, body),
            });
        }

        let streams = request
            .attachments
            .iter()
            .map(|path| file_url(path))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::SendMultiple {
            extras: MailExtras {
                recipients: request.recipients.clone(),
                subject: subject.map(str::to_string),
                body: body.map(str::to_string),
                streams,
            },
            package: None,
        })
    }

    /// Returns the host action.
    #[must_use]
    pub const fn action(&self) -> ComposeAction {
        match self {
            Self::View { .. } => ComposeAction::View,
            Self::SendMultiple { .. } => ComposeAction::SendMultiple,
        }
    }

    /// Returns the data URI: the full `mailto:` URI, or the bare scheme when
    /// the content travels as extras.
    #[must_use]
    pub fn data(&self) -> &str {
        match self {
            Self::View { uri } => uri,
            Self::SendMultiple { .. } => MAILTO_SCHEME,
        }
    }

    /// Returns the MIME type, set only for requests with attachments.
    #[must_use]
    pub const fn mime_type(&self) -> Option<&'static str> {
        match self {
            Self::View { .. } => None,
            Self::SendMultiple { .. } => Some(MESSAGE_MIME_TYPE),
        }
    }

    /// Returns the structured extras of a request with attachments.
    #[must_use]
    pub const fn extras(&self) -> Option<&MailExtras> {
        match self {
            Self::View { .. } => None,
            Self::SendMultiple { extras, .. } => Some(extras),
        }
    }

    /// Returns the targeted application, if any.
    #[must_use]
    pub fn package(&self) -> Option<&str> {
        match self {
            Self::View { .. } => None,
            Self::SendMultiple { package, .. } => package.as_deref(),
        }
    }

    /// Targets a request with attachments at one application. Plain
    /// requests are returned unchanged.
    #[must_use]
    pub fn with_package(self, target: impl Into<String>) -> Self {
        match self {
            Self::SendMultiple { extras, .. } => Self::SendMultiple {
                extras,
                package: Some(target.into()),
            },
            view @ Self::View { .. } => view,
        }
    }

    /// Renders the request as a `mailto:` URI. Attachments cannot be
    /// expressed in one and are left out.
    #[must_use]
    pub fn to_mailto_uri(&self) -> String {
        match self {
            Self::View { uri } => uri.clone(),
            Self::SendMultiple { extras, .. } => mailto_uri(
                &extras.recipients,
                extras.subject.as_deref(),
                extras.body.as_deref(),
            ),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn file_url(path: &Path) -> Result<Url> {
    let absolute =
        std::path::absolute(path).map_err(|e| Error::attachment(path, e.to_string()))?;
    Url::from_file_path(&absolute)
        .map_err(|()| Error::attachment(path, "not representable as a file URL"))
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
    fn test_plain_request_is_view() {
        let request = EmailRequest::to("a@b.com").subject("Hi").body("Hello");
        let intent = ComposeIntent::from_request(&request).unwrap();

        assert_eq!(intent.action(), ComposeAction::View);
        assert_eq!(intent.data(), "mailto:a@b.com?subject=Hi&body=Hello");
        assert_eq!(intent.mime_type(), None);
        assert_eq!(intent.extras(), None);
        assert_eq!(intent.package(), None);
    }

    #[test]
    fn test_view_is_deterministic() {
        let request = EmailRequest::new()
            .recipients(["a@b.com", "c@d.org"])
            .subject("Quarterly report: Q1 & Q2")
            .body("See you at 10:00");
        let first = ComposeIntent::from_request(&request).unwrap();
        let second = ComposeIntent::from_request(&request).unwrap();
        assert_eq!(first.data(), second.data());
    }

    #[test]
    fn test_empty_subject_and_body_dropped() {
        let request = EmailRequest::to("a@b.com").subject("").body("");
        let intent = ComposeIntent::from_request(&request).unwrap();
        assert_eq!(intent.data(), "mailto:a@b.com");
    }

    #[cfg(unix)]
    #[test]
    fn test_attachments_make_send_multiple() {
        let request = EmailRequest::new()
            .recipients(["a@b.com", "c@d.org"])
            .subject("Report")
            .body("")
            .attach("/tmp/report 1.pdf")
            .attach("/tmp/data.csv");
        let intent = ComposeIntent::from_request(&request).unwrap();

        assert_eq!(intent.action(), ComposeAction::SendMultiple);
        assert_eq!(intent.data(), "mailto:");
        assert_eq!(intent.mime_type(), Some("message/rfc822"));

        let extras = intent.extras().unwrap();
        assert_eq!(extras.recipients, vec!["a@b.com", "c@d.org"]);
        assert_eq!(extras.subject.as_deref(), Some("Report"));
        assert_eq!(extras.body, None);
        let streams: Vec<&str> = extras.streams.iter().map(Url::as_str).collect();
        assert_eq!(
            streams,
            vec!["file:///tmp/report%201.pdf", "file:///tmp/data.csv"]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_relative_attachment_made_absolute() {
        let intent =
            ComposeIntent::from_request(&EmailRequest::to("a@b.com").attach("notes.txt")).unwrap();
        let url = &intent.extras().unwrap().streams[0];
        assert_eq!(url.scheme(), "file");
        assert!(url.path().ends_with("/notes.txt"));
    }

    #[test]
    fn test_empty_attachment_path_rejected() {
        let result = ComposeIntent::from_request(&EmailRequest::to("a@b.com").attach(""));
        assert!(matches!(result, Err(Error::Attachment { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_with_package() {
        let intent = ComposeIntent::from_request(&EmailRequest::new().attach("/tmp/a.txt"))
            .unwrap()
            .with_package("com.fsck.k9");
        assert_eq!(intent.package(), Some("com.fsck.k9"));

        let view = ComposeIntent::from_request(&EmailRequest::to("a@b.com"))
            .unwrap()
            .with_package("com.fsck.k9");
        assert_eq!(view.package(), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_to_mailto_uri_drops_attachments() {
        let request = EmailRequest::to("a@b.com").subject("Hi").attach("/tmp/a.txt");
        let intent = ComposeIntent::from_request(&request).unwrap();
        assert_eq!(intent.to_mailto_uri(), "mailto:a@b.com?subject=Hi");
    }
}
