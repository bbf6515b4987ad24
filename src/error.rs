//! Error taxonomy for the capture-to-skill pipeline.
//!
//! Only fatal conditions live here. An empty capture is reported through
//! [`crate::pipeline::AnalysisWarning`] instead, since the pipeline still
//! produces a (placeholder) bundle for it.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SkillError {
    /// The capture file could not be opened or read.
    #[error("Failed to read capture file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The capture is not JSON, or its top level is not an object.
    #[error("Malformed capture document {}: {reason}", path.display())]
    MalformedInput {
        path: PathBuf,
        reason: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// The destination directory or one of the bundle files could not be written.
    #[error("Failed to write skill bundle at {}: {source}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to serialize {artifact}: {source}")]
    Serialize {
        artifact: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T, E = SkillError> = std::result::Result<T, E>;
