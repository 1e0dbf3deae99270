//! # mailcompose
//!
//! Email address validation and mail-composer dispatch.
//!
//! ## Features
//!
//! - **Address validation**: Quick heuristic check with a punycode fallback
//!   for internationalized addresses
//! - **Composer dispatch**: Pre-filled recipients, subject, body and
//!   attachments handed to whichever mail app the host can resolve
//! - **Known clients**: Skips the host chooser when exactly one well-known
//!   mail client is available
//! - **Pluggable hosts**: Host and notification facilities are traits, with a
//!   scripted mock for tests and a desktop backend (`desktop` feature)
//!
//! ## Quick Start
//!
//! ### Validating Addresses
//!
//! ```
//! use mailcompose::is_valid_email;
//!
//! assert!(is_valid_email("user@example.com"));
//! assert!(is_valid_email("jürgen@bücher.de"));
//! assert!(!is_valid_email("user@.example.com"));
//! ```
//!
//! ### Opening a Composer
//!
//! ```ignore
//! use mailcompose::desktop::{DesktopHost, DesktopNotifier};
//! use mailcompose::{Dispatcher, EmailRequest};
//!
//! let dispatcher = Dispatcher::new(DesktopHost, DesktopNotifier::default());
//! let request = EmailRequest::to("support@example.com")
//!     .subject("Bug report")
//!     .body("Steps to reproduce:")
//!     .picker_title("Report with:");
//!
//! if !dispatcher.send_email(&request)? {
//!     // The user has already been told why.
//! }
//! ```
//!
//! ### Testing Dispatch Logic
//!
//! ```
//! use mailcompose::host::{HostCall, MockHost, RecordingNotifier};
//! use mailcompose::{Dispatcher, EmailRequest};
//!
//! let host = MockHost::new().with_resolvable(true);
//! let notifier = RecordingNotifier::new();
//! let dispatcher = Dispatcher::new(&host, &notifier);
//!
//! let sent = dispatcher
//!     .send_email(&EmailRequest::to("a@b.com").subject("Hi"))
//!     .unwrap();
//! assert!(sent);
//! assert!(matches!(host.calls()[0], HostCall::Launch(_)));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod config;
mod dispatch;
mod error;
mod intent;
mod known;
mod request;
mod validation;

#[cfg(feature = "desktop")]
pub mod desktop;
pub mod host;
pub mod mailto;

pub use config::{
    DEFAULT_DENIED_MESSAGE, DEFAULT_NO_HANDLER_MESSAGE, DEFAULT_PICKER_TITLE, DispatcherConfig,
    ResolvedTexts, UiTexts,
};
pub use dispatch::{Dispatcher, send_email};
pub use error::{Error, Result};
pub use host::{HandlerCandidate, LaunchError, MailHost, Notifier};
pub use intent::{ComposeAction, ComposeIntent, MESSAGE_MIME_TYPE, MailExtras};
pub use known::{KNOWN_MAIL_CLIENTS, MatchPolicy, select_known_handler};
pub use request::EmailRequest;
pub use validation::{is_valid_email, to_ascii_address};
