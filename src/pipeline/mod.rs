//! Capture analysis pipeline.
//!
//! One pass over the loaded entries: the auth profile is folded from every entry,
//! while the classifier and extractor turn accepted entries into endpoints. The
//! base URL is inferred from the endpoints afterwards. All stages keep capture order.

pub mod base_url;
pub mod classifier;
pub mod extractor;

use std::fmt;

use tracing::{debug, info, warn};

use crate::auth::{AuthKind, AuthProfile};
use crate::capture::Capture;
use crate::config::AnalysisConfig;
use crate::util::tally;
use classifier::Classifier;
use extractor::{Endpoint, Extractor};

/// Non-fatal conditions worth surfacing to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisWarning {
    /// The capture has no entries at all.
    EmptyCapture,
    /// Entries were present but none looked like an API call.
    NoApiEndpoints { entries: usize },
}

impl fmt::Display for AnalysisWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisWarning::EmptyCapture => write!(f, "capture contains no entries"),
            AnalysisWarning::NoApiEndpoints { entries } => write!(
                f,
                "none of the {} captured requests looked like an API call",
                entries
            ),
        }
    }
}

/// Result of analysing one capture.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub entry_count: usize,
    pub endpoints: Vec<Endpoint>,
    pub auth: AuthProfile,
    pub base_url: Option<String>,
    pub capture_sha256: String,
    pub warnings: Vec<AnalysisWarning>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaptureSummary {
    pub total_endpoints: usize,
    pub base_url: Option<String>,
    /// Per-method counts, first-seen order.
    pub methods: Vec<(String, usize)>,
    /// Per-status counts, first-seen order.
    pub status_codes: Vec<(i64, usize)>,
    pub has_auth: bool,
    pub auth_type: AuthKind,
}

impl Analysis {
    pub fn summary(&self) -> CaptureSummary {
        CaptureSummary {
            total_endpoints: self.endpoints.len(),
            base_url: self.base_url.clone(),
            methods: tally(self.endpoints.iter().map(|ep| ep.method.clone())),
            status_codes: tally(self.endpoints.iter().map(|ep| ep.response_status)),
            has_auth: self.auth.has_auth(),
            auth_type: self.auth.kind(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Replace the auth profile with its masked form.
    pub fn redact(&mut self) {
        self.auth = self.auth.redacted();
    }
}

pub struct Analyzer {
    classifier: Classifier,
    extractor: Extractor,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(&AnalysisConfig::default())
    }
}

impl Analyzer {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            classifier: Classifier::new(config),
            extractor: Extractor::new(config.preview_limit),
        }
    }

    pub fn analyze(&self, capture: &Capture) -> Analysis {
        info!("Analyzing {} captured requests", capture.entries.len());

        let auth = AuthProfile::reconstruct(&capture.entries);

        let mut endpoints = Vec::new();
        for entry in &capture.entries {
            let decision = self.classifier.classify(entry);
            debug!(
                "{} {} -> {:?} ({})",
                entry.method(),
                entry.url(),
                decision.verdict,
                decision.rule.unwrap_or("no matching rule")
            );
            if decision.is_accept() {
                endpoints.push(self.extractor.extract(entry));
            }
        }

        let base_url = base_url::infer_base_url(&endpoints);

        let mut warnings = Vec::new();
        if capture.entries.is_empty() {
            warnings.push(AnalysisWarning::EmptyCapture);
        } else if endpoints.is_empty() {
            warnings.push(AnalysisWarning::NoApiEndpoints {
                entries: capture.entries.len(),
            });
        }
        for warning in &warnings {
            warn!("{}", warning);
        }

        info!("Found {} API endpoints", endpoints.len());
        info!(
            "Base URL: {}",
            base_url.as_deref().unwrap_or("(none)")
        );
        info!("Auth type: {}", auth.kind());

        Analysis {
            entry_count: capture.entries.len(),
            endpoints,
            auth,
            base_url,
            capture_sha256: capture.sha256.clone(),
            warnings,
        }
    }
}
