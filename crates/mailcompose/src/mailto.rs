//! `mailto:` URI construction.

/// The mail-transfer URI scheme, including the colon.
pub const MAILTO_SCHEME: &str = "mailto:";

/// Builds a `mailto:` URI.
///
/// Recipients are joined with commas into the opaque part as given.
/// `subject` and `body` become query parameters when non-empty, percent
/// encoded so that spaces read `%20` rather than `+`.
///
/// ```
/// use mailcompose::mailto::mailto_uri;
///
/// assert_eq!(
///     mailto_uri(&["a@b.com"], Some("Hi"), Some("Hello")),
///     "mailto:a@b.com?subject=Hi&body=Hello"
/// );
/// ```
#[must_use]
pub fn mailto_uri<S: AsRef<str>>(
    recipients: &[S],
    subject: Option<&str>,
    body: Option<&str>,
) -> String {
    let mut uri = String::from(MAILTO_SCHEME);
    for (i, recipient) in recipients.iter().enumerate() {
        if i > 0 {
            uri.push(',');
        }
        uri.push_str(recipient.as_ref());
    }

    let mut separator = '?';
    for (name, value) in [("subject", subject), ("body", body)] {
        let Some(value) = value.filter(|v| !v.is_empty()) else {
            continue;
        };
        uri.push(separator);
        uri.push_str(name);
        uri.push('=');
        uri.push_str(&urlencoding::encode(value));
        separator = '&';
    }

    uri
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
    fn test_simple_uri() {
        assert_eq!(
            mailto_uri(&["a@b.com"], Some("Hi"), Some("Hello")),
            "mailto:a@b.com?subject=Hi&body=Hello"
        );
    }

    #[test]
    fn test_multiple_recipients() {
        assert_eq!(
            mailto_uri(&["a@b.com", "c@d.org"], None, None),
            "mailto:a@b.com,c@d.org"
        );
    }

    #[test]
    fn test_no_recipients() {
        let empty: [&str; 0] = [];
        assert_eq!(mailto_uri(&empty, Some("Hi"), None), "mailto:?subject=Hi");
        assert_eq!(mailto_uri(&empty, None, None), "mailto:");
    }

    #[test]
    fn test_empty_parameters_are_skipped() {
        assert_eq!(
            mailto_uri(&["a@b.com"], Some(""), Some("Body")),
            "mailto:a@b.com?body=Body"
        );
    }

    #[test]
    fn test_parameters_are_percent_encoded() {
        assert_eq!(
            mailto_uri(&["a@b.com"], Some("Hello world & more"), Some("line 1\nline=2?")),
            "mailto:a@b.com?subject=Hello%20world%20%26%20more&body=line%201%0Aline%3D2%3F"
        );
        assert_eq!(
            mailto_uri(&["a@b.com"], Some("Grüße"), None),
            "mailto:a@b.com?subject=Gr%C3%BC%C3%9Fe"
        );
    }

    #[test]
    fn test_idempotent() {
        let recipients = vec!["a@b.com".to_string()];
        let first = mailto_uri(&recipients, Some("Same"), Some("Input"));
        let second = mailto_uri(&recipients, Some("Same"), Some("Input"));
        assert_eq!(first, second);
    }
}
