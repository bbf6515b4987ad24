//! Capture loader: reads a browser network capture (HAR) into memory.
//!
//! Only the document shape is checked here (valid JSON, top-level object).
//! Everything below `log.entries` is optional and defaulted by [`har`].

pub mod har;

pub use har::{CaptureEntry, CaptureRequest, CaptureResponse, NameValue};

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info};

use crate::error::{Result, SkillError};
use crate::util::sha256_hex;
use har::CaptureDocument;

/// A fully loaded capture document.
#[derive(Debug, Clone, Default)]
pub struct Capture {
    pub source: PathBuf,
    pub entries: Vec<CaptureEntry>,
    /// SHA-256 of the raw document bytes.
    pub sha256: String,
}

impl Capture {
    /// Load and parse the capture file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Reading capture file {}", path.display());
        let bytes = fs::read(path).map_err(|source| SkillError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_slice(path, &bytes)
    }

    /// Parse an in-memory capture. `source` is only used for diagnostics.
    pub fn from_slice(source: impl AsRef<Path>, bytes: &[u8]) -> Result<Self> {
        let source = source.as_ref().to_path_buf();

        let value: Value = serde_json::from_slice(bytes).map_err(|e| SkillError::MalformedInput {
            path: source.clone(),
            reason: format!("invalid JSON at line {} column {}", e.line(), e.column()),
            source: Some(e),
        })?;

        if !value.is_object() {
            return Err(SkillError::MalformedInput {
                path: source,
                reason: format!("top-level value is {}, expected an object", json_kind(&value)),
                source: None,
            });
        }

        let document: CaptureDocument =
            serde_json::from_value(value).map_err(|e| SkillError::MalformedInput {
                path: source.clone(),
                reason: "unexpected document structure".to_string(),
                source: Some(e),
            })?;

        info!(
            "Loaded {} entries from {}",
            document.log.entries.len(),
            source.display()
        );

        Ok(Self {
            source,
            entries: document.log.entries,
            sha256: sha256_hex(bytes),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_from_slice_reads_entries() {
        let json = br#"{"log": {"entries": [
            {"request": {"method": "GET", "url": "https://example.com/api/a"}},
            {"request": {"method": "GET", "url": "https://example.com/api/b"}}
        ]}}"#;
        let capture = Capture::from_slice("mem.har", json).unwrap();
        assert_eq!(capture.entries.len(), 2);
        assert_eq!(capture.entries[1].url(), "https://example.com/api/b");
        assert_eq!(capture.sha256.len(), 64);
    }

    #[test]
    fn test_missing_log_defaults_to_empty() {
        let capture = Capture::from_slice("mem.har", b"{}").unwrap();
        assert!(capture.is_empty());

        let capture = Capture::from_slice("mem.har", br#"{"log": {}}"#).unwrap();
        assert!(capture.is_empty());

        let capture = Capture::from_slice("mem.har", br#"{"log": {"entries": null}}"#).unwrap();
        assert!(capture.is_empty());
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        let err = Capture::from_slice("bad.har", b"{\"log\": ").unwrap_err();
        match err {
            SkillError::MalformedInput { path, source, .. } => {
                assert_eq!(path, PathBuf::from("bad.har"));
                assert!(source.is_some());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_non_object_is_malformed() {
        let err = Capture::from_slice("list.har", b"[1, 2, 3]").unwrap_err();
        assert!(matches!(err, SkillError::MalformedInput { .. }));
        assert!(err.to_string().contains("an array"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("capture.har");
        let mut f = fs::File::create(&path).unwrap();
        write!(f, r#"{{"log": {{"entries": [{{}}]}}}}"#).unwrap();

        let capture = Capture::load(&path).unwrap();
        assert_eq!(capture.entries.len(), 1);
        assert_eq!(capture.source, path);
    }

    #[test]
    fn test_load_missing_file_is_read_error() {
        let err = Capture::load("/nonexistent/harskill/capture.har").unwrap_err();
        assert!(matches!(err, SkillError::Read { .. }));
        assert!(err.to_string().contains("/nonexistent/harskill/capture.har"));
    }

    #[test]
    fn test_same_bytes_same_digest() {
        let a = Capture::from_slice("a.har", b"{}").unwrap();
        let b = Capture::from_slice("b.har", b"{}").unwrap();
        assert_eq!(a.sha256, b.sha256);
    }
}
