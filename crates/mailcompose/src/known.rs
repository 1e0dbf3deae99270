//! Known mail clients and handler pre-selection.
//!
//! When several apps can take a composition request, pre-selecting a
//! well-known mail client lets the host skip the generic chooser. The
//! identifiers below are matched as case-insensitive substrings of a
//! candidate's package and component names.

use serde::{Deserialize, Serialize};

use crate::host::HandlerCandidate;

/// Package identifiers of well-known mail clients.
pub const KNOWN_MAIL_CLIENTS: &[&str] = &[
    "com.google.android.gm",
    "com.google.android.apps.inbox",
    "com.appple.app.email",
    "ru.mail.mailapp",
    "com.microsoft.office.outlook",
    "com.my.mail",
    "com.yahoo.mobile.client.android.mail",
    "com.cloudmagic.mail",
    "cz.seznam.email",
    "com.email.email",
    "com.trtf.blue",
    "me.bluemail.mail",
    "com.fsck.k9",
    "com.mailboxapp",
    "com.syntomo.email",
    "org.kman.aquamail",
    "com.mobincube.android.sc_15ibz",
    "ru.yandex.mail",
    "net.daum.android.solmail",
    "com.boxer.email",
    "com.aol.mobile.aolapp",
    "com.mobincube.android.sc_gaz7l",
    "com.xiaomistudio.tools.finalmail",
    "com.mail.emails",
    "co.itspace.emailproviders",
    "de.gmx.mobile.android.mail",
    "com.yahoo.mobile.client.android.im",
    "com.mail.mobile.android.mail",
    "com.asus.email",
    "com.maildroid",
    "com.wemail",
    "de.web.mobile.android.mail",
    "com.onegravity.k10.free",
    "com.dicklucifer.email",
    "de.freenet.mail",
    "com.qs.enhancedemail",
    "com.feistapps.anonymousemail",
    "com.onegravity.k10.pro2",
    "com.gloxandro.birdmail",
    "com.kaitenmail",
    "com.android.email",
    "com.sec.android.email",
    "com.htc.android.mail",
];

/// How allow-list hits are counted when several handlers are available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// Count distinct matching packages. A package that hits several
    /// allow-list entries, or exposes several matching components, counts
    /// once.
    #[default]
    DistinctCandidates,
    /// Count every (candidate, entry) hit. A candidate whose names contain two
    /// entries counts twice and defeats pre-selection, as do two components
    /// of the same package.
    MatchEvents,
}

/// Picks the package to target for a composition request.
///
/// - No candidates: nothing is selected.
/// - One candidate: it is selected, whatever the allow-list says.
/// - Several: a package is selected only if exactly one match is counted
///   under `policy`.
#[must_use]
pub fn select_known_handler<K: AsRef<str>>(
    candidates: &[HandlerCandidate],
    known: &[K],
    policy: MatchPolicy,
) -> Option<String> {
    match candidates {
        [] => None,
        [only] => Some(only.package.clone()),
        _ => match policy {
            MatchPolicy::DistinctCandidates => select_distinct(candidates, known),
            MatchPolicy::MatchEvents => select_by_events(candidates, known),
        },
    }
}

fn select_distinct<K: AsRef<str>>(
    candidates: &[HandlerCandidate],
    known: &[K],
) -> Option<String> {
    let mut matched: Vec<&str> = Vec::new();
    for candidate in candidates {
        if known.iter().any(|entry| candidate.matches(entry.as_ref()))
            && !matched.contains(&candidate.package.as_str())
        {
            matched.push(&candidate.package);
        }
    }

    match matched.as_slice() {
        [package] => Some((*package).to_string()),
        _ => None,
    }
}

fn select_by_events<K: AsRef<str>>(
    candidates: &[HandlerCandidate],
    known: &[K],
) -> Option<String> {
    let mut count = 0usize;
    let mut target = None;
    for candidate in candidates {
        for entry in known {
            if candidate.matches(entry.as_ref()) {
                target = Some(&candidate.package);
                count += 1;
            }
        }
    }

    if count == 1 { target.cloned() } else { None }
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

    fn candidate(package: &str) -> HandlerCandidate {
        HandlerCandidate::new(package, format!("{package}.ComposeActivity"))
    }

    #[test]
    fn test_no_candidates() {
        assert_eq!(
            select_known_handler(&[], KNOWN_MAIL_CLIENTS, MatchPolicy::default()),
            None
        );
    }

    #[test]
    fn test_single_candidate_always_selected() {
        let candidates = [candidate("org.example.notes")];
        for policy in [MatchPolicy::DistinctCandidates, MatchPolicy::MatchEvents] {
            assert_eq!(
                select_known_handler(&candidates, KNOWN_MAIL_CLIENTS, policy).as_deref(),
                Some("org.example.notes")
            );
        }
    }

    #[test]
    fn test_no_known_match_among_many() {
        let candidates = [candidate("org.example.notes"), candidate("org.example.drive")];
        for policy in [MatchPolicy::DistinctCandidates, MatchPolicy::MatchEvents] {
            assert_eq!(select_known_handler(&candidates, KNOWN_MAIL_CLIENTS, policy), None);
        }
    }

    #[test]
    fn test_single_known_match_among_many() {
        let candidates = [
            candidate("org.example.drive"),
            candidate("com.google.android.gm"),
            candidate("org.example.notes"),
        ];
        for policy in [MatchPolicy::DistinctCandidates, MatchPolicy::MatchEvents] {
            assert_eq!(
                select_known_handler(&candidates, KNOWN_MAIL_CLIENTS, policy).as_deref(),
                Some("com.google.android.gm")
            );
        }
    }

    #[test]
    fn test_two_known_matches() {
        let candidates = [candidate("com.google.android.gm"), candidate("com.fsck.k9")];
        assert_eq!(
            select_known_handler(&candidates, KNOWN_MAIL_CLIENTS, MatchPolicy::default()),
            None
        );
    }

    #[test]
    fn test_match_is_case_insensitive_and_checks_component() {
        let candidates = [
            HandlerCandidate::new("org.example.drive", "org.example.drive.Upload"),
            HandlerCandidate::new("net.vendor.app", "COM.FSCK.K9.activity.MessageCompose"),
        ];
        assert_eq!(
            select_known_handler(&candidates, KNOWN_MAIL_CLIENTS, MatchPolicy::default())
                .as_deref(),
            Some("net.vendor.app")
        );
    }

    #[test]
    fn test_multi_entry_hit_differs_by_policy() {
        let known = ["com.example.mail", "example.mail"];
        let candidates = [candidate("com.example.mail"), candidate("org.example.notes")];

        assert_eq!(
            select_known_handler(&candidates, &known, MatchPolicy::DistinctCandidates).as_deref(),
            Some("com.example.mail")
        );
        assert_eq!(
            select_known_handler(&candidates, &known, MatchPolicy::MatchEvents),
            None
        );
    }

    #[test]
    fn test_same_package_two_components_counts_once() {
        let candidates = [
            HandlerCandidate::new("com.google.android.gm", "ComposeActivityGmail"),
            HandlerCandidate::new("com.google.android.gm", "ComposeActivityGmailExternal"),
            candidate("org.example.notes"),
        ];
        assert_eq!(
            select_known_handler(&candidates, KNOWN_MAIL_CLIENTS, MatchPolicy::DistinctCandidates)
                .as_deref(),
            Some("com.google.android.gm")
        );
        assert_eq!(
            select_known_handler(&candidates, KNOWN_MAIL_CLIENTS, MatchPolicy::MatchEvents),
            None
        );
    }
}
