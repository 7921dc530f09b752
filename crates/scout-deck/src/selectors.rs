//! Ordered CSS selector lists and the pure decision logic that picks among
//! matched candidates, grounded on `docsend_client.py`'s form-handling
//! block. Kept separate from the browser driver so the picking logic is
//! unit-testable without a real page.

pub const EMAIL_SELECTORS: &[&str] = &[
    "input[name='link_auth_form[email]']",
    "input[id='link_auth_form_email']",
    "input[type='email']",
    "input[name='email']",
    "input[placeholder*='email' i]",
];

pub const PASSWORD_SELECTORS: &[&str] = &[
    "input[name='link_auth_form[passcode]']",
    "input[type='password']",
    "input[name*='password']",
    "input[id*='password']",
    "input[placeholder*='password' i]",
    "input[name*='passcode']",
    "input[id*='passcode']",
];

pub const SUBMIT_SELECTORS: &[&str] = &[
    "input[value='Continue']",
    "input[type='submit'][value='Continue']",
    "input[value='Submit']",
    "input[type='submit'][value='Submit']",
    "input[name='commit'][value='Continue']",
    "input[name='commit'][value='Submit']",
    "input[name='commit']",
    "button[type='submit']",
    "input[type='submit']",
    ".submit-button",
    ".continue-button",
];

pub const SUBMIT_TEXT_FALLBACK_KEYWORDS: &[&str] = &["continue", "submit", "access", "view"];

pub const NEXT_SLIDE_SELECTORS: &[&str] = &[
    "[aria-label*='next' i]",
    "[class*='next' i]",
    "[class*='forward' i]",
    "[data-testid*='next' i]",
];

pub const SLIDE_CONTAINER_SELECTORS: &[&str] = &[".page", ".slide", "[data-page]", ".document-page"];

/// A visibility/interactability snapshot of one DOM element, captured so
/// the field/button-picking logic below can run without a live page.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub displayed: bool,
    pub enabled: bool,
    pub text: &'a str,
}

/// First visible, enabled candidate, selector-list order preserved by the
/// caller (each selector's matches appear contiguously in `candidates`).
pub fn first_visible_enabled<'a>(candidates: &[Candidate<'a>]) -> Option<usize> {
    candidates.iter().position(|c| c.displayed && c.enabled)
}

/// Fallback submit search: any displayed, enabled button/input whose text
/// contains one of the keyword set, case-insensitively.
pub fn find_submit_by_text<'a>(candidates: &[Candidate<'a>]) -> Option<usize> {
    candidates.iter().position(|c| {
        c.displayed && c.enabled && SUBMIT_TEXT_FALLBACK_KEYWORDS.iter().any(|kw| c.text.to_lowercase().contains(kw))
    })
}

/// Tokens indicating a non-content access-denied page, scanned against
/// lower-cased page source (spec §4.4 CONTENT state).
pub const ACCESS_DENIED_TOKENS: &[(&str, scout_types::AccessDeniedKind)] = &[
    ("awaiting approval", scout_types::AccessDeniedKind::Approval),
    ("pending approval", scout_types::AccessDeniedKind::Approval),
    ("verify your email", scout_types::AccessDeniedKind::Verification),
    ("verification", scout_types::AccessDeniedKind::Verification),
    ("incorrect passcode", scout_types::AccessDeniedKind::WrongPassword),
    ("wrong password", scout_types::AccessDeniedKind::WrongPassword),
    ("invalid email", scout_types::AccessDeniedKind::InvalidEmail),
    ("not a valid email", scout_types::AccessDeniedKind::InvalidEmail),
    ("restricted", scout_types::AccessDeniedKind::Restricted),
    ("this document is private", scout_types::AccessDeniedKind::Private),
    ("document is no longer available", scout_types::AccessDeniedKind::Private),
];

/// Classify a lower-cased page source against [`ACCESS_DENIED_TOKENS`];
/// `None` if no token is found (caller should treat that as `Unknown`, not
/// as "content present").
pub fn classify_access_denied(lowercase_source: &str) -> Option<scout_types::AccessDeniedKind> {
    ACCESS_DENIED_TOKENS.iter().find(|(token, _)| lowercase_source.contains(token)).map(|(_, kind)| *kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scout_types::AccessDeniedKind;

    #[test]
    fn picks_first_visible_enabled_candidate() {
        let candidates = [
            Candidate { displayed: false, enabled: true, text: "" },
            Candidate { displayed: true, enabled: false, text: "" },
            Candidate { displayed: true, enabled: true, text: "match" },
        ];
        assert_eq!(first_visible_enabled(&candidates), Some(2));
    }

    #[test]
    fn submit_by_text_matches_keyword_case_insensitively() {
        let candidates = [Candidate { displayed: true, enabled: true, text: "CONTINUE" }];
        assert_eq!(find_submit_by_text(&candidates), Some(0));
    }

    #[test]
    fn submit_by_text_skips_hidden_button() {
        let candidates = [Candidate { displayed: false, enabled: true, text: "Submit" }];
        assert_eq!(find_submit_by_text(&candidates), None);
    }

    #[test]
    fn classifies_wrong_password_token() {
        let source = "sorry, that was an incorrect passcode, try again";
        assert_eq!(classify_access_denied(source), Some(AccessDeniedKind::WrongPassword));
    }

    #[test]
    fn unrecognized_source_yields_none() {
        assert_eq!(classify_access_denied("this is a perfectly normal deck"), None);
    }
}
