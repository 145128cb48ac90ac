use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

#[allow(clippy::unwrap_used)]
static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{1,}\b").unwrap());

/// Compact JWS: three base64url segments joined by dots.
#[allow(clippy::unwrap_used)]
static BEARER_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Za-z0-9_-]{8,}\.[A-Za-z0-9_-]{8,}\.[A-Za-z0-9_-]{8,}\b").unwrap()
});

/// Masks emails (first character of the local part is kept) and bearer
/// tokens in free text destined for logs.
///
/// Tokens go first so an email inside a decoded-looking segment cannot
/// leave half a token behind.
pub fn redact(input: &str) -> String {
    let without_tokens = BEARER_TOKEN.replace_all(input, "[REDACTED_TOKEN]");

    EMAIL
        .replace_all(&without_tokens, |caps: &regex::Captures| {
            let full = &caps[0];
            match full.split_once('@') {
                Some((local, domain)) => match local.chars().next() {
                    Some(first) => format!("{first}***@{domain}"),
                    None => format!("@{domain}"),
                },
                None => full.to_string(),
            }
        })
        .into_owned()
}

/// Display/Debug wrapper that redacts on format, for use in log fields.
pub struct Redacted<'a>(pub &'a str);

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}

impl fmt::Debug for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}
