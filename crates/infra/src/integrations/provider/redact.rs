//! Body shortening for logs and the audit trail
//!
//! Upload payloads embed whole PDFs as base64 strings. Those are cut down
//! before anything is logged or stored.

use std::borrow::Cow;

use esignbridge_domain::constants::{AUDIT_BODY_LIMIT, BASE64_LOG_PREFIX, LOG_BODY_LIMIT};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static BASE64_VALUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""([A-Za-z0-9+/=]{100,})""#).expect("base64 pattern is valid")
});

/// Replace every JSON string value of at least 100 base64 characters with
/// its first 100 characters and the original length.
pub fn redact_base64(body: &str) -> Cow<'_, str> {
    BASE64_VALUE.replace_all(body, |caps: &Captures<'_>| {
        let content = &caps[1];
        if content.len() > BASE64_LOG_PREFIX {
            format!(
                "\"{}... [base64 truncated, total {} chars]\"",
                &content[..BASE64_LOG_PREFIX],
                content.len()
            )
        } else {
            caps[0].to_string()
        }
    })
}

/// Redacted body capped for a log line.
pub fn for_log(body: &str) -> String {
    let redacted = redact_base64(body);
    match prefix(&redacted, LOG_BODY_LIMIT) {
        Some(head) => format!("{head}... [truncated, total {} chars]", redacted.len()),
        None => redacted.into_owned(),
    }
}

/// Redacted body capped for the audit log.
pub fn for_audit(body: &str) -> String {
    let redacted = redact_base64(body);
    match prefix(&redacted, AUDIT_BODY_LIMIT) {
        Some(head) => format!("{head}... [truncated]"),
        None => redacted.into_owned(),
    }
}

/// First `limit` bytes of `s` (backed off to a char boundary), or `None`
/// when `s` already fits.
fn prefix(s: &str, limit: usize) -> Option<&str> {
    if s.len() <= limit {
        return None;
    }
    let mut end = limit;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    Some(&s[..end])
}
