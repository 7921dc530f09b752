//! Bot-challenge body detection (spec §4.1).

/// Tokens that, if present (case-insensitively) in a 403 response body,
/// classify the response as a bot-challenge rather than a genuine
/// access-denied. Carried verbatim from the original bot-protection helper.
pub const CHALLENGE_TOKENS: [&str; 14] = [
    "cloudflare",
    "just a moment",
    "checking your browser",
    "ddos protection",
    "access denied",
    "blocked",
    "security check",
    "captcha",
    "ray id",
    "cf-ray",
    "please wait",
    "verifying",
    "challenge",
    "protection",
];

/// True if the (already-lowercased-by-caller-or-not) body contains any
/// challenge token. Case-insensitive regardless.
pub fn is_challenge_body(body: &str) -> bool {
    let lower = body.to_lowercase();
    CHALLENGE_TOKENS.iter().any(|tok| lower.contains(tok))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_cloudflare_challenge() {
        assert!(is_challenge_body("Just a Moment... Checking your browser"));
    }

    #[test]
    fn ordinary_body_is_not_a_challenge() {
        assert!(!is_challenge_body("<html><body>Welcome to Acme</body></html>"));
    }
}
