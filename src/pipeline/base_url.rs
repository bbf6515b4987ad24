//! Base-URL inference: the most frequent `scheme://host` across endpoints.

use super::extractor::Endpoint;
use crate::util::tally;

/// Dominant origin, ties broken by first appearance. `None` for no endpoints.
pub fn infer_base_url(endpoints: &[Endpoint]) -> Option<String> {
    let counts = tally(endpoints.iter().filter_map(Endpoint::origin));

    let mut best: Option<(String, usize)> = None;
    for (origin, count) in counts {
        // strictly greater keeps the earliest origin on a tie
        if best.as_ref().is_none_or(|(_, n)| count > *n) {
            best = Some((origin, count));
        }
    }
    best.map(|(origin, _)| origin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::CaptureEntry;
    use crate::pipeline::extractor::Extractor;

    fn endpoints(urls: &[&str]) -> Vec<Endpoint> {
        let extractor = Extractor::default();
        urls.iter()
            .map(|url| {
                let mut entry = CaptureEntry::default();
                entry.request.url = Some(url.to_string());
                extractor.extract(&entry)
            })
            .collect()
    }

    #[test]
    fn test_empty_is_none() {
        assert_eq!(infer_base_url(&[]), None);
    }

    #[test]
    fn test_single_endpoint() {
        let eps = endpoints(&["https://example.com/api/users?active=true"]);
        assert_eq!(infer_base_url(&eps).as_deref(), Some("https://example.com"));
    }

    #[test]
    fn test_most_frequent_wins() {
        let eps = endpoints(&[
            "https://cdn.example.com/api/a",
            "https://api.example.com/v1/a",
            "https://api.example.com/v1/b",
        ]);
        assert_eq!(infer_base_url(&eps).as_deref(), Some("https://api.example.com"));
    }

    #[test]
    fn test_tie_goes_to_first_seen() {
        let eps = endpoints(&[
            "https://b.example.com/api/1",
            "https://a.example.com/api/1",
            "https://a.example.com/api/2",
            "https://b.example.com/api/2",
        ]);
        assert_eq!(infer_base_url(&eps).as_deref(), Some("https://b.example.com"));
    }

    #[test]
    fn test_scheme_distinguishes_origins() {
        let eps = endpoints(&[
            "http://example.com/api/1",
            "https://example.com/api/1",
            "https://example.com/api/2",
        ]);
        assert_eq!(infer_base_url(&eps).as_deref(), Some("https://example.com"));
    }

    #[test]
    fn test_hostless_urls_ignored() {
        let eps = endpoints(&["/relative/api/x", ""]);
        assert_eq!(infer_base_url(&eps), None);
    }
}
