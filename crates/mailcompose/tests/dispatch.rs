//! Integration tests for the dispatcher.
//!
//! These tests drive the dispatcher against a scripted mock host so the
//! launch fallback chain can be checked without a real operating system.

use std::sync::Arc;
use std::thread;

use mailcompose::host::{HostCall, MockHost, MockOutcome, RecordingNotifier};
use mailcompose::{
    ComposeAction, DEFAULT_DENIED_MESSAGE, DEFAULT_NO_HANDLER_MESSAGE, DEFAULT_PICKER_TITLE,
    Dispatcher, DispatcherConfig, EmailRequest, Error, HandlerCandidate, LaunchError,
    MatchPolicy, UiTexts, send_email,
};

fn candidate(package: &str) -> HandlerCandidate {
    HandlerCandidate::new(package, format!("{package}.ComposeActivity"))
}

fn with_attachment() -> EmailRequest {
    EmailRequest::to("a@b.com")
        .subject("Report")
        .body("Attached.")
        .attach("/tmp/report.pdf")
}

/// Unwraps the single recorded call.
fn only_call(host: &MockHost) -> HostCall {
    let mut calls = host.calls();
    assert_eq!(calls.len(), 1, "expected exactly one launch: {calls:?}");
    calls.remove(0)
}

#[test]
fn test_plain_request_launches_directly_when_resolvable() {
    let host = MockHost::new().with_resolvable(true);
    let notifier = RecordingNotifier::new();
    let dispatcher = Dispatcher::new(&host, &notifier);

    let request = EmailRequest::to("a@b.com").subject("Hi").body("Hello");
    assert!(dispatcher.send_email(&request).unwrap());

    match only_call(&host) {
        HostCall::Launch(intent) => {
            assert_eq!(intent.action(), ComposeAction::View);
            assert_eq!(intent.data(), "mailto:a@b.com?subject=Hi&body=Hello");
        }
        other => panic!("expected direct launch, got {other:?}"),
    }
    assert!(notifier.shown().is_empty());
}

#[test]
fn test_plain_request_uses_chooser_when_unresolvable() {
    let host = MockHost::new();
    let notifier = RecordingNotifier::new();

    assert!(send_email(&host, &notifier, &EmailRequest::to("a@b.com")).unwrap());

    match only_call(&host) {
        HostCall::Chooser { intent, title } => {
            assert_eq!(intent.data(), "mailto:a@b.com");
            assert_eq!(title, DEFAULT_PICKER_TITLE);
        }
        other => panic!("expected chooser, got {other:?}"),
    }
}

#[test]
fn test_request_title_overrides_config_title() {
    let config = DispatcherConfig::default().with_texts(UiTexts {
        picker_title: Some("Configured title".to_string()),
        ..UiTexts::default()
    });

    let host = MockHost::new();
    let dispatcher = Dispatcher::with_config(&host, RecordingNotifier::new(), config);
    dispatcher
        .send_email(&EmailRequest::to("a@b.com").picker_title("Per-call title"))
        .unwrap();
    dispatcher.send_email(&EmailRequest::to("a@b.com")).unwrap();

    let titles: Vec<String> = host
        .calls()
        .into_iter()
        .map(|call| match call {
            HostCall::Chooser { title, .. } => title,
            HostCall::Launch(_) => panic!("expected chooser"),
        })
        .collect();
    assert_eq!(titles, vec!["Per-call title", "Configured title"]);
}

#[test]
fn test_access_denied_notifies_and_returns_false() {
    let host = MockHost::new()
        .with_resolvable(true)
        .with_launch_outcome(MockOutcome::Deny);
    let notifier = RecordingNotifier::new();

    let sent = send_email(&host, &notifier, &EmailRequest::to("a@b.com")).unwrap();

    assert!(!sent);
    assert_eq!(notifier.shown(), vec![DEFAULT_DENIED_MESSAGE]);
}

#[test]
fn test_no_handler_notifies_configured_message() {
    let config = DispatcherConfig::default().with_texts(UiTexts {
        no_handler_message: Some("Install a mail app first".to_string()),
        ..UiTexts::default()
    });
    let host = MockHost::new().with_chooser_outcome(MockOutcome::NoHandler);
    let notifier = RecordingNotifier::new();
    let dispatcher = Dispatcher::with_config(&host, &notifier, config);

    assert!(!dispatcher.send_email(&EmailRequest::to("a@b.com")).unwrap());
    assert_eq!(notifier.shown(), vec!["Install a mail app first"]);
}

#[test]
fn test_empty_override_falls_back_to_default() {
    let host = MockHost::new().with_chooser_outcome(MockOutcome::NoHandler);
    let notifier = RecordingNotifier::new();

    let request = EmailRequest::to("a@b.com").no_handler_message("");
    assert!(!send_email(&host, &notifier, &request).unwrap());
    assert_eq!(notifier.shown(), vec![DEFAULT_NO_HANDLER_MESSAGE]);
}

#[test]
fn test_unexpected_failure_propagates() {
    let host = MockHost::new()
        .with_resolvable(true)
        .with_launch_outcome(MockOutcome::Fail);
    let notifier = RecordingNotifier::new();

    let result = send_email(&host, &notifier, &EmailRequest::to("a@b.com"));

    assert!(matches!(
        result,
        Err(Error::Launch(LaunchError::Failed(_)))
    ));
    assert!(notifier.shown().is_empty());
}

#[test]
fn test_single_handler_is_targeted() {
    let host = MockHost::new().with_candidates([candidate("org.example.notes")]);
    let notifier = RecordingNotifier::new();

    assert!(send_email(&host, &notifier, &with_attachment()).unwrap());

    match only_call(&host) {
        HostCall::Chooser { intent, title } => {
            assert_eq!(intent.action(), ComposeAction::SendMultiple);
            assert_eq!(intent.package(), Some("org.example.notes"));
            assert_eq!(intent.mime_type(), Some("message/rfc822"));
            assert_eq!(intent.data(), "mailto:");
            assert_eq!(title, DEFAULT_PICKER_TITLE);
        }
        other => panic!("expected targeted chooser, got {other:?}"),
    }
}

#[test]
fn test_known_client_among_many_is_targeted() {
    let host = MockHost::new().with_candidates([
        candidate("org.example.drive"),
        candidate("com.google.android.gm"),
        candidate("org.example.notes"),
    ]);

    assert!(send_email(&host, RecordingNotifier::new(), &with_attachment()).unwrap());

    match only_call(&host) {
        HostCall::Chooser { intent, .. } => {
            assert_eq!(intent.package(), Some("com.google.android.gm"));
            let extras = intent.extras().unwrap();
            assert_eq!(extras.recipients, vec!["a@b.com"]);
            assert_eq!(extras.subject.as_deref(), Some("Report"));
            assert_eq!(extras.body.as_deref(), Some("Attached."));
            assert_eq!(extras.streams.len(), 1);
        }
        other => panic!("expected targeted chooser, got {other:?}"),
    }
}

#[test]
fn test_unknown_handlers_fall_back_to_direct_launch() {
    let host = MockHost::new().with_candidates([
        candidate("org.example.drive"),
        candidate("org.example.notes"),
    ]);

    assert!(send_email(&host, RecordingNotifier::new(), &with_attachment()).unwrap());

    match only_call(&host) {
        HostCall::Launch(intent) => {
            assert_eq!(intent.action(), ComposeAction::SendMultiple);
            assert_eq!(intent.package(), None);
        }
        other => panic!("expected direct launch, got {other:?}"),
    }
}

#[test]
fn test_unknown_unresolvable_handlers_fall_back_to_chooser() {
    let host = MockHost::new()
        .with_candidates([candidate("org.example.drive"), candidate("org.example.notes")])
        .with_resolvable(false);

    assert!(send_email(&host, RecordingNotifier::new(), &with_attachment()).unwrap());

    match only_call(&host) {
        HostCall::Chooser { intent, .. } => assert_eq!(intent.package(), None),
        other => panic!("expected unfiltered chooser, got {other:?}"),
    }
}

#[test]
fn test_no_handlers_with_attachments_uses_chooser() {
    let host = MockHost::new().with_chooser_outcome(MockOutcome::NoHandler);
    let notifier = RecordingNotifier::new();

    assert!(!send_email(&host, &notifier, &with_attachment()).unwrap());

    match only_call(&host) {
        HostCall::Chooser { intent, .. } => assert_eq!(intent.package(), None),
        other => panic!("expected unfiltered chooser, got {other:?}"),
    }
    assert_eq!(notifier.shown(), vec![DEFAULT_NO_HANDLER_MESSAGE]);
}

#[test]
fn test_targeted_chooser_denied() {
    let host = MockHost::new()
        .with_candidates([candidate("com.fsck.k9")])
        .with_chooser_outcome(MockOutcome::Deny);
    let notifier = RecordingNotifier::new();

    let request = with_attachment().denied_message("Not allowed");
    assert!(!send_email(&host, &notifier, &request).unwrap());
    assert_eq!(notifier.shown(), vec!["Not allowed"]);
}

#[test]
fn test_match_policy_changes_selection() {
    let candidates = [
        HandlerCandidate::new("com.google.android.gm", "ComposeActivityGmail"),
        HandlerCandidate::new("com.google.android.gm", "ComposeActivityGmailExternal"),
        candidate("org.example.notes"),
    ];

    let host = MockHost::new().with_candidates(candidates.clone());
    send_email(&host, RecordingNotifier::new(), &with_attachment()).unwrap();
    assert!(matches!(
        only_call(&host),
        HostCall::Chooser { intent, .. } if intent.package() == Some("com.google.android.gm")
    ));

    let host = MockHost::new().with_candidates(candidates);
    let config = DispatcherConfig::default().with_match_policy(MatchPolicy::MatchEvents);
    Dispatcher::with_config(&host, RecordingNotifier::new(), config)
        .send_email(&with_attachment())
        .unwrap();
    assert!(matches!(
        only_call(&host),
        HostCall::Launch(intent) if intent.package().is_none()
    ));
}

#[test]
fn test_custom_known_clients() {
    let host = MockHost::new().with_candidates([
        candidate("org.example.drive"),
        candidate("org.example.mail"),
    ]);
    let config = DispatcherConfig::default().with_known_clients(["org.example.mail"]);

    Dispatcher::with_config(&host, RecordingNotifier::new(), config)
        .send_email(&with_attachment())
        .unwrap();

    assert!(matches!(
        only_call(&host),
        HostCall::Chooser { intent, .. } if intent.package() == Some("org.example.mail")
    ));
}

#[test]
fn test_attachment_presence_selects_request_shape() {
    let host = MockHost::new().with_resolvable(true);
    let dispatcher = Dispatcher::new(&host, RecordingNotifier::new());

    dispatcher.send_email(&EmailRequest::to("a@b.com")).unwrap();
    dispatcher.send_email(&with_attachment()).unwrap();
    dispatcher
        .send_email(&EmailRequest::to("a@b.com").attachments(Vec::<String>::new()))
        .unwrap();

    let actions: Vec<ComposeAction> = host
        .calls()
        .into_iter()
        .map(|call| match call {
            HostCall::Launch(intent) | HostCall::Chooser { intent, .. } => intent.action(),
        })
        .collect();
    assert_eq!(
        actions,
        vec![
            ComposeAction::View,
            ComposeAction::SendMultiple,
            ComposeAction::View
        ]
    );
}

#[test]
fn test_bad_attachment_is_an_error() {
    let host = MockHost::new();
    let request = EmailRequest::to("a@b.com").attach("");
    let result = send_email(&host, RecordingNotifier::new(), &request);

    assert!(matches!(result, Err(Error::Attachment { .. })));
    assert!(host.calls().is_empty());
}

#[test]
fn test_recipients_are_not_validated() {
    let host = MockHost::new().with_resolvable(true);
    let request = EmailRequest::new().recipients(["not an address", "b@c.com"]);

    assert!(send_email(&host, RecordingNotifier::new(), &request).unwrap());
    assert!(matches!(
        only_call(&host),
        HostCall::Launch(intent) if intent.data() == "mailto:not an address,b@c.com"
    ));
}

#[test]
fn test_dispatcher_shared_across_threads() {
    let host = Arc::new(MockHost::new().with_resolvable(true));
    let notifier = Arc::new(RecordingNotifier::new());
    let dispatcher = Arc::new(Dispatcher::new(Arc::clone(&host), Arc::clone(&notifier)));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let dispatcher = Arc::clone(&dispatcher);
            thread::spawn(move || {
                dispatcher
                    .send_email(&EmailRequest::to(format!("user{i}@example.com")))
                    .unwrap()
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap());
    }
    assert_eq!(host.calls().len(), 4);
    assert!(notifier.shown().is_empty());
}
