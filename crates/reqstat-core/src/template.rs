//! Metric-name templates (`%token%` substitution).
//!
//! A template is parsed once at configuration time so the finish path knows
//! which tokens it actually needs. Only those tokens are ever resolved against
//! the request context.

use std::fmt;

use crate::context::FinishContext;
use crate::sanitize::Sanitizer;
use crate::token::{self, Token, TokenTransform, TokenValues};

/// A parsed metric-name template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricTemplate {
    raw: String,
    tokens: Vec<Token>,
}

impl MetricTemplate {
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let mut tokens = Vec::new();

        for name in placeholders(&raw) {
            match Token::from_name(name) {
                Some(t) => {
                    if !tokens.contains(&t) {
                        tokens.push(t);
                    }
                }
                None => {
                    tracing::warn!(
                        template = %raw,
                        placeholder = %name,
                        "unknown token left as literal text"
                    );
                }
            }
        }

        Self { raw, tokens }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Known tokens referenced by this template, in order of first appearance.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn references(&self, token: Token) -> bool {
        self.tokens.contains(&token)
    }

    pub fn render(&self, values: &TokenValues) -> String {
        render(&self.raw, values)
    }
}

/// Substitute every resolved token in `template`.
///
/// Placeholders without a value in `values` stay untouched.
pub fn render(template: &str, values: &TokenValues) -> String {
    let mut out = template.to_string();
    for (token, value) in values.iter() {
        let ph = token.placeholder();
        if out.contains(ph) {
            out = out.replace(ph, value);
        }
    }
    out
}

/// Every `%name%` segment in `raw` whose name looks like a token
/// (`[a-z0-9-]+`). Unmatched `%` are skipped.
fn placeholders(raw: &str) -> Vec<&str> {
    let mut found = Vec::new();
    let mut rest = raw;

    while let Some(open) = rest.find('%') {
        let after = &rest[open + 1..];
        let Some(close) = after.find('%') else { break };
        let name = &after[..close];

        let looks_like_token = !name.is_empty()
            && name
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-');

        if looks_like_token {
            found.push(name);
            rest = &after[close + 1..];
        } else {
            // the closing '%' may open the next placeholder
            rest = &after[close..];
        }
    }

    found
}

/// The two rendered names for one finish cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricNames {
    pub memory: String,
    pub timer: String,
}

/// Memory/timer templates plus the token pipeline that feeds them.
#[derive(Clone)]
pub struct MetricNamer {
    memory: MetricTemplate,
    timer: MetricTemplate,
    sanitizer: Sanitizer,
    transform: Option<TokenTransform>,
}

impl MetricNamer {
    pub fn new(memory: MetricTemplate, timer: MetricTemplate, sanitizer: Sanitizer) -> Self {
        Self {
            memory,
            timer,
            sanitizer,
            transform: None,
        }
    }

    /// Install a transform applied to every sanitized token value.
    pub fn with_transform(mut self, transform: Option<TokenTransform>) -> Self {
        self.transform = transform;
        self
    }

    pub fn memory_template(&self) -> &MetricTemplate {
        &self.memory
    }

    pub fn timer_template(&self) -> &MetricTemplate {
        &self.timer
    }

    pub fn sanitizer(&self) -> &Sanitizer {
        &self.sanitizer
    }

    /// Tokens referenced by at least one template.
    pub fn referenced_tokens(&self) -> Vec<Token> {
        Token::ALL
            .into_iter()
            .filter(|t| self.memory.references(*t) || self.timer.references(*t))
            .collect()
    }

    /// Resolve, sanitize and transform the referenced tokens only.
    pub fn resolve_tokens(&self, ctx: &dyn FinishContext) -> TokenValues {
        self.referenced_tokens()
            .into_iter()
            .map(|t| (t, self.clean(&token::resolve(t, ctx))))
            .collect()
    }

    /// Sanitize a value, then run it through the transform if one is set.
    pub fn clean(&self, raw: &str) -> String {
        let v = self.sanitizer.sanitize(raw);
        match &self.transform {
            Some(f) => f(&v),
            None => v,
        }
    }

    pub fn render(&self, ctx: &dyn FinishContext) -> MetricNames {
        let values = self.resolve_tokens(ctx);
        MetricNames {
            memory: self.memory.render(&values),
            timer: self.timer.render(&values),
        }
    }
}

impl fmt::Debug for MetricNamer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricNamer")
            .field("memory", &self.memory.as_str())
            .field("timer", &self.timer.as_str())
            .field("sanitizer", &self.sanitizer)
            .field("transform", &self.transform.is_some())
            .finish()
    }
}
