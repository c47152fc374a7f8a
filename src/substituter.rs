use std::collections::BTreeMap;

/// Characters that count as token boundaries. All ASCII, so boundary checks
/// can work on bytes without risking a split inside a multibyte character.
const DELIMITERS: &[u8] = b" \t\n\r\x08()[]{}";

/// Core engine for boundary-aware token substitution.
///
/// A `Substituter` holds a token -> replacement mapping and applies it to
/// text blobs. Tokens are applied sequentially in sorted order, and each
/// token's output feeds the next, so a replacement that matches a later
/// token will itself be substituted. That makes chained substitution
/// order-sensitive and non-idempotent, which is deliberate; the sorted order
/// keeps results reproducible.
pub struct Substituter {
    tokens: BTreeMap<String, String>,
}

impl Substituter {
    /// Creates a new `Substituter` from a token -> replacement mapping.
    pub fn new(tokens: BTreeMap<String, String>) -> Self {
        Self { tokens }
    }

    /// Applies every token substitution to `text` and returns the result.
    ///
    /// Pure and deterministic. An occurrence of a token is replaced when it
    /// sits at the very start or very end of the text, or when it is
    /// immediately flanked by delimiter characters on both sides. Interior
    /// occurrences embedded in other identifiers are left alone.
    pub fn substitute(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }
        let mut current = text.to_string();
        for (token, replacement) in &self.tokens {
            if token.is_empty() || !current.contains(token.as_str()) {
                continue;
            }
            current = substitute_token(&current, token, replacement);
        }
        current
    }
}

/// Replaces every boundary-qualified occurrence of `token` in one linear scan.
fn substitute_token(text: &str, token: &str, replacement: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;

    while let Some(rel) = text[pos..].find(token) {
        let start = pos + rel;
        let end = start + token.len();
        let qualified = start == 0
            || end == bytes.len()
            || (is_delimiter(bytes[start - 1]) && is_delimiter(bytes[end]));

        if qualified {
            out.push_str(&text[pos..start]);
            out.push_str(replacement);
            pos = end;
        } else {
            // Step over one character and keep scanning.
            let step = text[start..]
                .chars()
                .next()
                .map(char::len_utf8)
                .unwrap_or(1);
            out.push_str(&text[pos..start + step]);
            pos = start + step;
        }
    }

    out.push_str(&text[pos..]);
    out
}

fn is_delimiter(byte: u8) -> bool {
    DELIMITERS.contains(&byte)
}
