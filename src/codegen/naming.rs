//! Identifier sanitization for generated client source.
//!
//! All functions here are total: any input yields a valid Python identifier.

use once_cell::sync::Lazy;
use regex::Regex;

static NON_ALNUM_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9]+").expect("static regex is valid"));

const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try",
    "while", "with", "yield",
];

/// Names a generated method body already binds.
const RESERVED_LOCALS: &[&str] = &["self", "body", "url", "params", "response"];

/// Collapse every run of non-alphanumeric characters to `_` and trim the ends.
pub fn sanitize(raw: &str) -> String {
    NON_ALNUM_RUN
        .replace_all(raw, "_")
        .trim_matches('_')
        .to_string()
}

/// Method name for an endpoint: lower-cased HTTP method + sanitized path.
///
/// `GET /api/users?x=1` -> `get_api_users`; `GET /` -> `get_root`.
/// A method token that starts with a digit is prefixed with `m_`.
pub fn method_name(method: &str, path: &str) -> String {
    let clean = sanitize(
        path.trim_start_matches('/')
            .split('?')
            .next()
            .unwrap_or_default(),
    );
    let prefix = match sanitize(method).to_lowercase() {
        p if p.is_empty() => "call".to_string(),
        p if p.starts_with(|c: char| c.is_ascii_digit()) => format!("m_{}", p),
        p => p,
    };
    if clean.is_empty() {
        format!("{}_root", prefix)
    } else {
        format!("{}_{}", prefix, clean)
    }
}

/// Argument name for a query parameter.
/// Keywords and locals used by the method body get a trailing `_`.
pub fn param_identifier(name: &str) -> String {
    let mut ident = sanitize(name);
    if ident.is_empty() {
        ident = "param".to_string();
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident = format!("p_{}", ident);
    }
    if PYTHON_KEYWORDS.contains(&ident.as_str()) || RESERVED_LOCALS.contains(&ident.as_str()) {
        ident.push('_');
    }
    ident
}

/// Return `candidate`, or `candidate_N` for the smallest N >= 2 not in `taken`.
pub fn disambiguate(candidate: &str, taken: &[String]) -> String {
    if !taken.iter().any(|t| t == candidate) {
        return candidate.to_string();
    }
    (2..)
        .map(|n| format!("{}_{}", candidate, n))
        .find(|name| !taken.iter().any(|t| t == name))
        .unwrap_or_else(|| candidate.to_string())
}
