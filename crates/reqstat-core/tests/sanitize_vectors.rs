//! Sanitizer vector tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use reqstat_core::sanitize::{sanitize, Sanitizer};

use vector_loader::SanitizeVector;

#[test]
fn sanitize_vectors() {
    let vectors: Vec<SanitizeVector> = vector_loader::load("sanitize.json");
    assert!(!vectors.is_empty());

    for v in vectors {
        let out = sanitize(&v.raw, v.allow_dots, &v.replacement);
        assert_eq!(out, v.expect, "vector={}", v.description);

        let s = Sanitizer::new(v.allow_dots, v.replacement.clone());
        assert_eq!(s.sanitize(&v.raw), v.expect, "vector={}", v.description);
    }
}

#[test]
fn output_only_allowed_chars_and_idempotent() {
    let inputs = [
        "application/json; charset=utf-8",
        "  spaced   out  ",
        "a__b--c..d",
        "Ünïcödé/Pätх",
        "%http-code%",
        "already_clean_123",
        "___",
    ];

    for allow_dots in [false, true] {
        for raw in inputs {
            let once = sanitize(raw, allow_dots, "_");

            assert!(
                once.chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || (allow_dots && c == '.')),
                "raw={raw:?} out={once:?}"
            );
            assert!(!once.contains("__"), "adjacent runs in {once:?}");
            assert_eq!(sanitize(&once, allow_dots, "_"), once, "not idempotent for {raw:?}");
        }
    }
}
