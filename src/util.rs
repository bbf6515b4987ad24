//! Shared utilities for the harskill codebase

use sha2::{Digest, Sha256};

/// Marker appended to a truncated response preview.
pub const TRUNCATION_MARKER: &str = "...";

/// Truncate `s` to at most `limit` characters (not bytes).
/// Returns the kept prefix and whether anything was cut off.
pub fn truncate_chars(s: &str, limit: usize) -> (&str, bool) {
    match s.char_indices().nth(limit) {
        Some((byte_idx, _)) => (&s[..byte_idx], true),
        None => (s, false),
    }
}

/// Mask a credential for display or redacted export.
/// Long values keep a 4-character prefix so different tokens stay distinguishable.
pub fn mask_secret(value: &str) -> String {
    if value.chars().count() > 12 {
        let (prefix, _) = truncate_chars(value, 4);
        format!("{}***", prefix)
    } else {
        "***".to_string()
    }
}

/// Count occurrences while preserving first-seen order.
/// Ties and output order are therefore reproducible across runs.
pub fn tally<I, K>(items: I) -> Vec<(K, usize)>
where
    I: IntoIterator<Item = K>,
    K: PartialEq,
{
    let mut counts: Vec<(K, usize)> = Vec::new();
    for item in items {
        match counts.iter_mut().find(|(k, _)| *k == item) {
            Some((_, n)) => *n += 1,
            None => counts.push((item, 1)),
        }
    }
    counts
}

/// Lower-case hex SHA-256 of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}
