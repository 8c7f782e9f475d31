//! Token vocabulary and resolution against a finish context.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

use crate::context::FinishContext;

/// Well-known request/response metadata that can appear in a metric template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Token {
    Controller,
    HttpMethod,
    HttpCode,
    RequestContentType,
    ResponseContentType,
}

impl Token {
    /// The fixed vocabulary, in resolution order.
    pub const ALL: [Token; 5] = [
        Token::Controller,
        Token::HttpMethod,
        Token::HttpCode,
        Token::RequestContentType,
        Token::ResponseContentType,
    ];

    /// Name used between `%` delimiters in templates.
    pub fn as_str(self) -> &'static str {
        match self {
            Token::Controller => "controller",
            Token::HttpMethod => "http-method",
            Token::HttpCode => "http-code",
            Token::RequestContentType => "request-content-type",
            Token::ResponseContentType => "response-content-type",
        }
    }

    pub fn from_name(name: &str) -> Option<Token> {
        Token::ALL.into_iter().find(|t| t.as_str() == name)
    }

    /// `%name%` as written in a template.
    pub fn placeholder(self) -> &'static str {
        match self {
            Token::Controller => "%controller%",
            Token::HttpMethod => "%http-method%",
            Token::HttpCode => "%http-code%",
            Token::RequestContentType => "%request-content-type%",
            Token::ResponseContentType => "%response-content-type%",
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extract the raw (unsanitized) value of `token` from `ctx`.
///
/// Missing fields resolve to an empty string.
pub fn resolve(token: Token, ctx: &dyn FinishContext) -> String {
    match token {
        Token::Controller => ctx.controller().unwrap_or_default().to_string(),
        Token::HttpMethod => ctx
            .request()
            .map(|r| r.method().to_string())
            .unwrap_or_default(),
        Token::HttpCode => ctx
            .response()
            .map(|r| r.status_code().to_string())
            .unwrap_or_default(),
        Token::RequestContentType => ctx
            .request()
            .and_then(|r| r.header("content-type"))
            .unwrap_or_default()
            .to_string(),
        Token::ResponseContentType => ctx
            .response()
            .and_then(|r| r.header("content-type"))
            .unwrap_or_default()
            .to_string(),
    }
}

/// Resolved (sanitized, transformed) token values for one finish cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenValues(BTreeMap<Token, String>);

impl TokenValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, token: Token, value: impl Into<String>) {
        self.0.insert(token, value.into());
    }

    pub fn get(&self, token: Token) -> Option<&str> {
        self.0.get(&token).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Token, &str)> {
        self.0.iter().map(|(t, v)| (*t, v.as_str()))
    }
}

impl FromIterator<(Token, String)> for TokenValues {
    fn from_iter<I: IntoIterator<Item = (Token, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// User-supplied transform applied to every sanitized token value.
pub type TokenTransform = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Transforms that can be named from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformKind {
    #[default]
    None,
    Lowercase,
    Uppercase,
}

impl TransformKind {
    pub fn into_transform(self) -> Option<TokenTransform> {
        match self {
            TransformKind::None => None,
            TransformKind::Lowercase => Some(Arc::new(|v: &str| v.to_ascii_lowercase())),
            TransformKind::Uppercase => Some(Arc::new(|v: &str| v.to_ascii_uppercase())),
        }
    }
}
