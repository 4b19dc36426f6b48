//! Sensitive data masking for logs.
//!
//! Masks caller tokens, API keys, secrets and passphrases in free text
//! (request URIs, error messages) before it is written to a log line.
//! Matched values are replaced whole; no part of a secret is kept.

use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::LazyLock;

/// Replacement for every masked value.
pub const MASK: &str = "***";

/// Query parameter key whose value is always masked in request URIs.
const TOKEN_QUERY_KEY: &str = "token";

/// Patterns for detecting sensitive data.
static PATTERNS: LazyLock<Vec<SensitivePattern>> = LazyLock::new(|| {
    vec![
        // Caller token in a query string
        SensitivePattern {
            name: "token_param",
            regex: Regex::new(r"(?i)([?&]token=)([^&\s#]+)").unwrap(),
            group: 2,
        },
        // Caller token header
        SensitivePattern {
            name: "token_header",
            regex: Regex::new(r#"(?i)(x-fwd-token)["\s:=]+["']?([^\s"',}]+)"#).unwrap(),
            group: 2,
        },
        // Exchange credentials and signatures
        SensitivePattern {
            name: "credential",
            regex: Regex::new(
                r#"(?i)(api[_-]?key|api[_-]?secret|secret[_-]?key|passphrase|access-key|access-sign)["\s:=]+["']?([^\s"'&,}]{4,})"#,
            )
            .unwrap(),
            group: 2,
        },
        // Bearer tokens
        SensitivePattern {
            name: "bearer_token",
            regex: Regex::new(r#"(?i)(bearer\s+)([^\s"',]+)"#).unwrap(),
            group: 2,
        },
    ]
});

struct SensitivePattern {
    #[allow(dead_code)]
    name: &'static str,
    regex: Regex,
    group: usize,
}

/// Masks sensitive data in strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct SensitiveDataMasker;

impl SensitiveDataMasker {
    /// Create a new masker.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Mask every sensitive value found in a string.
    ///
    /// # Example
    ///
    /// ```
    /// use relay_telemetry::masking::SensitiveDataMasker;
    ///
    /// let masker = SensitiveDataMasker::new();
    /// let masked = masker.mask_string("/order?token=s3cr3t-caller-token");
    /// assert_eq!(masked, "/order?token=***");
    /// ```
    #[must_use]
    pub fn mask_string<'a>(&self, input: &'a str) -> Cow<'a, str> {
        let mut result = Cow::Borrowed(input);

        for pattern in PATTERNS.iter() {
            if !pattern.regex.is_match(&result) {
                continue;
            }
            let replaced = pattern
                .regex
                .replace_all(&result, |caps: &Captures<'_>| mask_group(caps, pattern.group))
                .into_owned();
            result = Cow::Owned(replaced);
        }

        result
    }

    /// Mask a request URI for an access log.
    ///
    /// Query keys are compared after form-urlencoded decoding, so an encoded
    /// key such as `%74oken` is masked like `token`. The rest of the URI goes
    /// through [`mask_string`](Self::mask_string).
    #[must_use]
    pub fn mask_uri<'a>(&self, uri: &'a str) -> Cow<'a, str> {
        let Some((path, query)) = uri.split_once('?') else {
            return self.mask_string(uri);
        };
        if !query.split('&').any(is_token_pair) {
            return self.mask_string(uri);
        }

        let query = query
            .split('&')
            .map(|pair| {
                if is_token_pair(pair) {
                    let key = pair.split_once('=').map_or(pair, |(key, _)| key);
                    format!("{key}={MASK}")
                } else {
                    pair.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("&");

        let masked = format!("{path}?{query}");
        Cow::Owned(self.mask_string(&masked).into_owned())
    }
}

fn is_token_pair(pair: &str) -> bool {
    url::form_urlencoded::parse(pair.as_bytes())
        .next()
        .is_some_and(|(key, _)| key == TOKEN_QUERY_KEY)
}

fn mask_group(caps: &Captures<'_>, group: usize) -> String {
    let (Some(whole), Some(secret)) = (caps.get(0), caps.get(group)) else {
        return caps.get(0).map_or_else(String::new, |m| m.as_str().to_string());
    };
    let text = whole.as_str();
    let from = secret.start() - whole.start();
    let to = secret.end() - whole.start();
    format!("{}{MASK}{}", &text[..from], &text[to..])
}
