//! Token value sanitizer.
//!
//! Metric names travel through StatsD, where `:` `|` `@` and whitespace carry
//! meaning. Every maximal run of characters outside `[A-Za-z0-9]` (plus `.`
//! when dots are allowed) collapses into one copy of the replacement text.
//! Non-ASCII letters are outside the allowed set.

/// Sanitizer settings, compiled once from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sanitizer {
    allow_dots: bool,
    replacement: String,
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new(false, "_")
    }
}

impl Sanitizer {
    pub fn new(allow_dots: bool, replacement: impl Into<String>) -> Self {
        Self {
            allow_dots,
            replacement: replacement.into(),
        }
    }

    pub fn allow_dots(&self) -> bool {
        self.allow_dots
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    pub fn sanitize(&self, raw: &str) -> String {
        sanitize(raw, self.allow_dots, &self.replacement)
    }
}

#[inline]
fn is_allowed(c: char, allow_dots: bool) -> bool {
    c.is_ascii_alphanumeric() || (allow_dots && c == '.')
}

/// Replace every run of disallowed characters in `raw` with `replacement`.
pub fn sanitize(raw: &str, allow_dots: bool, replacement: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_run = false;

    for c in raw.chars() {
        if is_allowed(c, allow_dots) {
            out.push(c);
            in_run = false;
        } else if !in_run {
            out.push_str(replacement);
            in_run = true;
        }
    }

    out
}
