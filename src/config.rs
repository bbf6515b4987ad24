use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Characters of response body kept in an endpoint preview (default: 500)
    #[serde(default = "default_preview_limit")]
    pub preview_limit: usize,

    /// URL path suffixes that mark static assets (matched case-insensitively)
    #[serde(default = "default_static_extensions")]
    pub static_extensions: Vec<String>,

    /// URL substrings that mark conventional API routes (matched case-insensitively)
    #[serde(default = "default_api_path_markers")]
    pub api_path_markers: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            preview_limit: default_preview_limit(),
            static_extensions: default_static_extensions(),
            api_path_markers: default_api_path_markers(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Mask credential values in every exported artifact (default: false)
    #[serde(default)]
    pub redact_secrets: bool,

    /// File name of the generated client inside the bundle (default: "client.py")
    #[serde(default = "default_client_file")]
    pub client_file: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            redact_secrets: false,
            client_file: default_client_file(),
        }
    }
}

fn default_preview_limit() -> usize {
    500
}

fn default_static_extensions() -> Vec<String> {
    [
        ".js", ".css", ".png", ".jpg", ".jpeg", ".gif", ".svg", ".woff", ".woff2", ".ttf", ".ico",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_api_path_markers() -> Vec<String> {
    [
        "/api/", "/v1/", "/v2/", "/graphql", "/rest/", "/_api/", "/ajax/",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_client_file() -> String {
    "client.py".to_string()
}

impl Config {
    /// Load configuration from a specific path, or use default search paths
    pub fn load_with_path(path: Option<String>) -> Result<Self> {
        // If explicit path provided, use it
        if let Some(config_path) = path {
            debug!("Loading config from explicit path: {}", config_path);
            return Self::load_from_path(&config_path)
                .with_context(|| format!("Failed to load config from {}", config_path));
        }

        // Try working directory first (per-project config)
        if let Ok(config) = Self::load_from_path("harskill.toml") {
            debug!("Loaded config from ./harskill.toml");
            return Ok(config);
        }

        // Try user config directory
        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("harskill").join("config.toml");
            if let Ok(config) = Self::load_from_path(&config_path) {
                debug!("Loaded config from {:?}", config_path);
                return Ok(config);
            }
        }

        debug!("Using default config");
        Ok(Self::default())
    }

    fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}
