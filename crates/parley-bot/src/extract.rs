// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text scanning: email addresses, URLs, and the control tokens the model
//! is instructed to emit.

use std::sync::LazyLock;

use regex::Regex;

/// Keyword the model appends when escalating to a human operator.
pub const REALTIME_TOKEN: &str = "(realtime)";

/// Keyword the model appends when asking a qualification question.
pub const COMPLETE_TOKEN: &str = "(complete)";

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("email regex")
});

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s"<>]+"#).expect("url regex"));

/// First email address found in the text, if any.
pub fn first_email(text: &str) -> Option<&str> {
    EMAIL_RE.find(text).map(|m| m.as_str())
}

/// First URL found in the text, if any.
pub fn first_url(text: &str) -> Option<&str> {
    URL_RE.find(text).map(|m| m.as_str())
}

/// Strips trailing punctuation a model reply commonly glues onto a link.
pub fn sanitize_link(link: &str) -> &str {
    link.trim_end_matches([')', ']', '.', ','])
}

/// True when the reply carries the escalation keyword.
pub fn has_realtime_token(text: &str) -> bool {
    text.contains(REALTIME_TOKEN)
}

/// Removes the first occurrence of the escalation keyword.
pub fn strip_realtime_token(text: &str) -> String {
    text.replacen(REALTIME_TOKEN, "", 1)
}

/// True when the turn carries the question keyword.
pub fn has_complete_token(text: &str) -> bool {
    text.contains(COMPLETE_TOKEN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_first_email_in_prose() {
        assert_eq!(
            first_email("hi, I'm bob@x.com and my friend is amy@y.org"),
            Some("bob@x.com")
        );
        assert_eq!(first_email("no address here"), None);
    }

    #[test]
    fn finds_url_and_sanitizes_trailing_punctuation() {
        let reply = "Follow this link: https://x.test/y).";
        let url = first_url(reply).unwrap();
        assert_eq!(url, "https://x.test/y).");
        assert_eq!(sanitize_link(url), "https://x.test/y");
    }

    #[test]
    fn sanitize_strips_mixed_trailing_runs() {
        assert_eq!(sanitize_link("https://x.test/a].,"), "https://x.test/a");
        assert_eq!(sanitize_link("https://x.test/a"), "https://x.test/a");
        // Interior punctuation is untouched.
        assert_eq!(
            sanitize_link("https://x.test/a,b/c."),
            "https://x.test/a,b/c"
        );
    }

    #[test]
    fn realtime_token_stripped_once() {
        let reply = "Sure, connecting you now (realtime)";
        assert!(has_realtime_token(reply));
        assert_eq!(strip_realtime_token(reply), "Sure, connecting you now ");
    }

    #[test]
    fn complete_token_detected() {
        assert!(has_complete_token("What is your budget? (complete)"));
        assert!(!has_complete_token("What is your budget?"));
    }
}
