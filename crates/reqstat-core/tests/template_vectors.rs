//! Template rendering vector tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use reqstat_core::template::{render, MetricTemplate};
use reqstat_core::token::{Token, TokenValues};

use vector_loader::RenderVector;

#[test]
fn render_vectors() {
    let vectors: Vec<RenderVector> = vector_loader::load("render.json");
    assert!(!vectors.is_empty());

    for v in vectors {
        let values: TokenValues = v
            .values
            .iter()
            .map(|(k, val)| {
                let t = Token::from_name(k).unwrap_or_else(|| panic!("unknown token {k}"));
                (t, val.clone())
            })
            .collect();

        assert_eq!(render(&v.template, &values), v.expect, "vector={}", v.description);
        assert_eq!(
            MetricTemplate::parse(v.template.clone()).render(&values),
            v.expect,
            "vector={}",
            v.description
        );
    }
}

#[test]
fn parse_collects_known_tokens_once() {
    let t = MetricTemplate::parse("%controller%.%http-code%.%bogus%.%http-code%");
    assert_eq!(t.tokens(), &[Token::Controller, Token::HttpCode]);
    assert!(t.references(Token::Controller));
    assert!(!t.references(Token::HttpMethod));
}

#[test]
fn stray_percent_does_not_hide_next_placeholder() {
    let t = MetricTemplate::parse("50% of %http-method%");
    assert_eq!(t.tokens(), &[Token::HttpMethod]);
}

#[test]
fn no_tokens_renders_unchanged_for_any_values() {
    let mut values = TokenValues::new();
    for t in Token::ALL {
        values.insert(t, "x");
    }
    for tpl in ["", "plain", "a.b.c", "100%", "%%", "%not a token%"] {
        assert_eq!(render(tpl, &values), tpl);
    }
}
