//! Heuristic email address validation.
//!
//! [`is_valid_email`] answers "does this look like something a mail client
//! can deliver to". It is deliberately loose: no RFC 5322 grammar, no DNS.
//! Addresses with non-ASCII characters get a second chance after being
//! converted to their ASCII-compatible (punycode) form.
//!
//! # Example
//!
//! ```
//! use mailcompose::is_valid_email;
//!
//! assert!(is_valid_email("user@example.com"));
//! assert!(is_valid_email("user@bücher.de"));
//! assert!(!is_valid_email("user@.example.com"));
//! ```

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

/// Maximum length of a single domain label.
const MAX_LABEL_LENGTH: usize = 63;

/// Domains must be strictly shorter than this.
const MAX_DOMAIN_LENGTH: usize = 254;

/// Domains must have strictly fewer labels than this.
const MAX_LABELS: usize = 127;

/// Prefix of a punycode-encoded label.
const ACE_PREFIX: &str = "xn--";

#[allow(clippy::expect_used)] // Literal pattern
static PRIMARY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,63}$")
        .expect("valid primary email pattern")
});

/// Same shape, but the top-level label may hold digits and hyphens so that
/// punycode TLDs (`xn--p1ai`) pass.
#[allow(clippy::expect_used)] // Literal pattern
static ENCODED_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z0-9-]{2,63}$")
        .expect("valid encoded email pattern")
});

/// Checks whether `address` might be a valid email address.
///
/// Empty addresses, addresses starting or ending with `.` and addresses
/// containing `..` are rejected before any pattern is evaluated.
#[must_use]
pub fn is_valid_email(address: &str) -> bool {
    if address.is_empty()
        || address.starts_with('.')
        || address.ends_with('.')
        || address.contains("..")
    {
        return false;
    }

    if PRIMARY_PATTERN.is_match(address) {
        return has_valid_domain(address);
    }

    if !is_probably_international(address) {
        return false;
    }

    match to_ascii_address(address) {
        Ok(encoded) => encoded != address && ENCODED_PATTERN.is_match(&encoded),
        Err(e) => {
            tracing::trace!(%e, "address has no ASCII-compatible form");
            false
        }
    }
}

/// Converts an address to its ASCII-compatible encoding.
///
/// The domain (after the last `@`) is processed with UTS #46 using the STD3
/// rules, so spaces and other non-hostname characters fail. Each non-ASCII
/// dot-separated label of the local part is punycode-encoded and prefixed
/// with `xn--`; ASCII labels are kept as they are.
///
/// # Errors
///
/// Returns [`Error::Idna`] if the domain is rejected by UTS #46 or a label
/// cannot be punycode-encoded.
pub fn to_ascii_address(address: &str) -> Result<String> {
    let Some((local, domain)) = address.rsplit_once('@') else {
        return domain_to_ascii(address);
    };

    let local = local
        .split('.')
        .map(encode_label)
        .collect::<Result<Vec<_>>>()?
        .join(".");
    let domain = domain_to_ascii(domain)?;

    Ok(format!("{local}@{domain}"))
}

/// True if the address holds anything outside the ASCII mail-safe set.
fn is_probably_international(address: &str) -> bool {
    address.chars().any(|c| {
        !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '%' | '+' | '-' | '@'))
    })
}

/// Structural checks on the domain part of an address the primary pattern
/// already accepted.
fn has_valid_domain(address: &str) -> bool {
    let Some((_, domain)) = address.rsplit_once('@') else {
        return false;
    };

    domain.len() < MAX_DOMAIN_LENGTH
        && domain.split('.').count() < MAX_LABELS
        && domain
            .split('.')
            .all(|label| (1..=MAX_LABEL_LENGTH).contains(&label.len()))
}

fn domain_to_ascii(domain: &str) -> Result<String> {
    idna::domain_to_ascii_strict(domain).map_err(|e| Error::Idna(format!("{e:?}")))
}

fn encode_label(label: &str) -> Result<Cow<'_, str>> {
    if label.is_ascii() {
        return Ok(Cow::Borrowed(label));
    }
    idna::punycode::encode_str(label)
        .map(|encoded| Cow::Owned(format!("{ACE_PREFIX}{encoded}")))
        .ok_or_else(|| Error::Idna(format!("cannot punycode-encode label {label:?}")))
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
    use proptest::prelude::*;

    #[test]
    fn test_valid_email() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("user.name+tag@sub.example.co.uk"));
        assert!(is_valid_email("USER_1%x@EXAMPLE.COM"));
        assert!(is_valid_email("a-b@my-host.io"));
    }

    #[test]
    fn test_short_circuit_on_dots() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email(".user@example.com"));
        assert!(!is_valid_email("user@example.com."));
        assert!(!is_valid_email("user..name@example.com"));
        assert!(!is_valid_email("user@example..com"));
    }

    #[test]
    fn test_empty_domain_label() {
        assert!(PRIMARY_PATTERN.is_match("user@.example.com"));
        assert!(!is_valid_email("user@.example.com"));
        assert!(!has_valid_domain("user@a..com"));
    }

    #[test]
    fn test_invalid_ascii_shapes() {
        assert!(!is_valid_email("user"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("user@example"));
        assert!(!is_valid_email("user@example.c"));
        assert!(!is_valid_email("user@@example.com"));
        assert!(!is_valid_email("user@example.c0m"));
    }

    #[test]
    fn test_label_too_long() {
        let address = format!("user@{}.com", "a".repeat(64));
        assert!(PRIMARY_PATTERN.is_match(&address));
        assert!(!is_valid_email(&address));

        let address = format!("user@{}.com", "a".repeat(63));
        assert!(is_valid_email(&address));
    }

    #[test]
    fn test_domain_too_long() {
        let label = "a".repeat(63);
        let ok = format!("user@{label}.{label}.{label}.com");
        assert!(is_valid_email(&ok));

        let too_long = format!("user@{label}.{label}.{label}.{label}.com");
        assert!(too_long.len() - "user@".len() >= MAX_DOMAIN_LENGTH);
        assert!(!is_valid_email(&too_long));
    }

    #[test]
    fn test_international_addresses() {
        assert!(is_valid_email("user@bücher.de"));
        assert!(is_valid_email("jürgen@bücher.de"));
        assert!(is_valid_email("user@пример.рф"));
        assert!(is_valid_email("user@例え.jp"));
    }

    #[test]
    fn test_non_ascii_that_encodes_to_itself() {
        // Space is not mail-safe, but nothing about it gets encoded.
        assert!(is_probably_international("user name@example.com"));
        assert!(!is_valid_email("user name@example.com"));
        assert!(!is_valid_email("user!@example.com"));
    }

    #[test]
    fn test_non_ascii_that_fails_to_encode() {
        assert!(!is_valid_email("üser@exa mple.com"));
        assert!(!is_valid_email("user@bü cher.de"));
    }

    #[test]
    fn test_probably_international() {
        assert!(!is_probably_international("user.name+tag%x@example-host.com"));
        assert!(is_probably_international("user@bücher.de"));
        assert!(is_probably_international("user,other@example.com"));
    }

    #[test]
    fn test_to_ascii_address() {
        assert_eq!(
            to_ascii_address("user@bücher.de").unwrap(),
            "user@xn--bcher-kva.de"
        );

        let encoded = to_ascii_address("jürgen.smith@example.com").unwrap();
        assert!(encoded.starts_with("xn--j"));
        assert!(encoded.ends_with(".smith@example.com"));
        assert!(encoded.is_ascii());
    }

    #[test]
    fn test_to_ascii_address_rejects_bad_domain() {
        assert!(matches!(
            to_ascii_address("user@exa mple.com"),
            Err(Error::Idna(_))
        ));
    }

    proptest! {
        #[test]
        fn generated_addresses_are_valid(
            local in "[a-z0-9_%+-]{1,16}(\\.[a-z0-9]{1,8}){0,2}",
            host in "[a-z0-9]{1,20}(\\.[a-z0-9-]{0,18}[a-z0-9]){0,3}",
            tld in "[a-z]{2,12}",
        ) {
            let address = format!("{local}@{host}.{tld}");
            prop_assert!(is_valid_email(&address), "{address}");
        }

        #[test]
        fn leading_dot_is_rejected(rest in ".*") {
            let address = format!(".{rest}");
            prop_assert!(!is_valid_email(&address));
        }

        #[test]
        fn double_dot_is_rejected(head in "[a-z@]{0,10}", tail in "[a-z@.]{0,10}") {
            let address = format!("{head}..{tail}");
            prop_assert!(!is_valid_email(&address));
        }

        #[test]
        fn mail_safe_mismatch_skips_fallback(address in "[A-Za-z0-9._%+@-]{0,40}") {
            prop_assume!(!PRIMARY_PATTERN.is_match(&address));
            prop_assert!(!is_probably_international(&address));
            prop_assert!(!is_valid_email(&address));
        }
    }
}
