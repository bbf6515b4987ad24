//! Endpoint classifier: decides whether a capture entry is an API call.
//!
//! The decision is an ordered rule list; the first rule whose predicate matches
//! decides. Rejections for data URLs and static assets come first so that a
//! script served with a JSON content type is still dropped.

use url::Url;

use crate::capture::CaptureEntry;
use crate::config::AnalysisConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    Reject,
}

pub struct Rule {
    pub name: &'static str,
    pub verdict: Verdict,
    matches: fn(&Classifier, &CaptureEntry) -> bool,
}

impl Rule {
    pub fn matches(&self, classifier: &Classifier, entry: &CaptureEntry) -> bool {
        (self.matches)(classifier, entry)
    }
}

/// Rules in precedence order.
pub const RULES: &[Rule] = &[
    Rule {
        name: "data-url",
        verdict: Verdict::Reject,
        matches: |_, entry| is_data_url(entry.url()),
    },
    Rule {
        name: "static-asset",
        verdict: Verdict::Reject,
        matches: |c, entry| c.is_static_asset(entry.url()),
    },
    Rule {
        name: "structured-content-type",
        verdict: Verdict::Accept,
        matches: |_, entry| {
            let mime = entry.mime_type().to_ascii_lowercase();
            mime.contains("json") || mime.contains("xml")
        },
    },
    Rule {
        name: "api-path-marker",
        verdict: Verdict::Accept,
        matches: |c, entry| c.has_api_marker(entry.url()),
    },
    Rule {
        name: "xhr-header",
        verdict: Verdict::Accept,
        matches: |_, entry| {
            entry
                .header("x-requested-with")
                .is_some_and(|v| v.eq_ignore_ascii_case("XMLHttpRequest"))
        },
    },
    Rule {
        name: "accepts-json",
        verdict: Verdict::Accept,
        matches: |_, entry| {
            entry
                .header("accept")
                .is_some_and(|v| v.contains("application/json"))
        },
    },
];

/// Outcome of classifying one entry, with the rule that decided it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub verdict: Verdict,
    /// `None` when no rule matched and the default rejection applied.
    pub rule: Option<&'static str>,
}

impl Decision {
    pub fn is_accept(&self) -> bool {
        self.verdict == Verdict::Accept
    }
}

#[derive(Debug, Clone)]
pub struct Classifier {
    static_extensions: Vec<String>,
    api_path_markers: Vec<String>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(&AnalysisConfig::default())
    }
}

impl Classifier {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            static_extensions: config
                .static_extensions
                .iter()
                .map(|e| e.to_ascii_lowercase())
                .collect(),
            api_path_markers: config
                .api_path_markers
                .iter()
                .map(|m| m.to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn classify(&self, entry: &CaptureEntry) -> Decision {
        RULES
            .iter()
            .find(|rule| rule.matches(self, entry))
            .map(|rule| Decision {
                verdict: rule.verdict,
                rule: Some(rule.name),
            })
            .unwrap_or(Decision {
                verdict: Verdict::Reject,
                rule: None,
            })
    }

    pub fn is_api_call(&self, entry: &CaptureEntry) -> bool {
        self.classify(entry).is_accept()
    }

    fn is_static_asset(&self, url: &str) -> bool {
        let path = url_path(url).to_ascii_lowercase();
        self.static_extensions.iter().any(|ext| path.ends_with(ext))
    }

    fn has_api_marker(&self, url: &str) -> bool {
        let url = url.to_ascii_lowercase();
        self.api_path_markers.iter().any(|m| url.contains(m))
    }
}

fn is_data_url(url: &str) -> bool {
    url.trim_start()
        .get(..5)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("data:"))
}

/// Path component of `url`; for unparsable URLs, everything before `?`/`#`.
fn url_path(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    }
}
