//! Skill bundle export.
//!
//! A bundle is four files in one directory: the generated client, `auth.json`,
//! `endpoints.json` and `SKILL.md`. Every artifact is rendered in memory and
//! staged as a temp file in the destination before any of them is moved into
//! place, so a failure leaves no partial bundle behind.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::SecondsFormat;
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{info, warn};
use url::Url;

use crate::auth::AuthKind;
use crate::codegen::{self, GenerationContext};
use crate::config::ExportConfig;
use crate::error::{Result, SkillError};
use crate::pipeline::extractor::Endpoint;
use crate::pipeline::Analysis;

pub const AUTH_FILE: &str = "auth.json";
pub const ENDPOINTS_FILE: &str = "endpoints.json";
pub const SKILL_FILE: &str = "SKILL.md";
const DEFAULT_CLIENT_FILE: &str = "client.py";

#[derive(Serialize)]
struct AuthRecord<'a> {
    cookies: &'a BTreeMap<String, String>,
    bearer_token: Option<&'a str>,
    api_key: Option<&'a str>,
    csrf_token: Option<&'a str>,
    custom_headers: &'a BTreeMap<String, String>,
    base_url: Option<&'a str>,
    captured_at: String,
    capture_sha256: &'a str,
}

#[derive(Serialize)]
struct EndpointIndexEntry<'a> {
    method: &'a str,
    path: &'a str,
    query_params: Vec<&'a str>,
    response_status: i64,
    response_content_type: &'a str,
    timing_ms: f64,
}

/// Rendered bundle contents, keyed by file name, in write order.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillBundle {
    pub files: Vec<(String, String)>,
}

impl SkillBundle {
    pub fn build(analysis: &Analysis, ctx: GenerationContext, config: &ExportConfig) -> Result<Self> {
        let client_file = client_file_name(&config.client_file);
        let module = Path::new(&client_file)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("client")
            .to_string();

        Ok(Self {
            files: vec![
                (client_file, codegen::generate_client(analysis, ctx)),
                (AUTH_FILE.to_string(), render_auth_record(analysis, ctx)?),
                (
                    ENDPOINTS_FILE.to_string(),
                    render_endpoint_index(&analysis.endpoints)?,
                ),
                (SKILL_FILE.to_string(), render_skill_md(analysis, &module)),
            ],
        })
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.files
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, content)| content.as_str())
    }

    /// Write every file into `dir`, creating it if needed.
    /// Returns the written paths in bundle order.
    pub fn write_to(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(dir).map_err(|source| SkillError::OutputWrite {
            path: dir.to_path_buf(),
            source,
        })?;

        // Stage everything first; dropped temp files clean themselves up on error.
        let mut staged = Vec::with_capacity(self.files.len());
        for (name, content) in &self.files {
            let target = dir.join(name);
            let tmp = stage(dir, content).map_err(|source| SkillError::OutputWrite {
                path: target.clone(),
                source,
            })?;
            staged.push((tmp, target));
        }

        // Refuse up front when a target is occupied by a directory or other non-file.
        for (_, target) in &staged {
            ensure_replaceable(target)?;
        }

        let mut written: Vec<PathBuf> = Vec::with_capacity(staged.len());
        for (tmp, target) in staged {
            if let Err(e) = tmp.persist(&target) {
                roll_back(&written);
                return Err(SkillError::OutputWrite {
                    path: target,
                    source: e.error,
                });
            }
            info!("Saved {}", target.display());
            written.push(target);
        }
        Ok(written)
    }
}

/// A target may be absent or a regular file; anything else would fail mid-bundle.
fn ensure_replaceable(target: &Path) -> Result<()> {
    match fs::symlink_metadata(target) {
        Ok(meta) if !meta.is_file() => Err(SkillError::OutputWrite {
            path: target.to_path_buf(),
            source: io::Error::new(
                io::ErrorKind::AlreadyExists,
                "exists and is not a regular file",
            ),
        }),
        _ => Ok(()),
    }
}

/// Remove bundle files already moved into place by a failed export.
fn roll_back(written: &[PathBuf]) {
    for path in written {
        if let Err(e) = fs::remove_file(path) {
            warn!("Could not remove partial output {}: {}", path.display(), e);
        }
    }
}

fn stage(dir: &Path, content: &str) -> std::io::Result<NamedTempFile> {
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    Ok(tmp)
}

/// Render and write the full bundle for `analysis` into `dir`.
pub fn export_skill(
    dir: &Path,
    analysis: &Analysis,
    ctx: GenerationContext,
    config: &ExportConfig,
) -> Result<Vec<PathBuf>> {
    info!("Exporting skill bundle to {}", dir.display());
    SkillBundle::build(analysis, ctx, config)?.write_to(dir)
}

/// Bare file name for the client; anything path-like is reduced to its last component.
/// Names that would collide with another bundle file fall back to `client.py`.
fn client_file_name(configured: &str) -> String {
    let name = Path::new(configured)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .unwrap_or(DEFAULT_CLIENT_FILE);
    if [AUTH_FILE, ENDPOINTS_FILE, SKILL_FILE]
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(name))
    {
        warn!(
            "client_file {} collides with a bundle file, using {}",
            name, DEFAULT_CLIENT_FILE
        );
        return DEFAULT_CLIENT_FILE.to_string();
    }
    name.to_string()
}

pub fn render_auth_record(analysis: &Analysis, ctx: GenerationContext) -> Result<String> {
    let auth = &analysis.auth;
    let record = AuthRecord {
        cookies: &auth.cookies,
        bearer_token: auth.bearer_token.as_deref(),
        api_key: auth.api_key.as_deref(),
        csrf_token: auth.csrf_token.as_deref(),
        custom_headers: &auth.custom_headers,
        base_url: analysis.base_url.as_deref(),
        captured_at: ctx.generated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        capture_sha256: &analysis.capture_sha256,
    };
    serde_json::to_string_pretty(&record).map_err(|source| SkillError::Serialize {
        artifact: AUTH_FILE,
        source,
    })
}

/// Every endpoint in capture order; no deduplication.
pub fn render_endpoint_index(endpoints: &[Endpoint]) -> Result<String> {
    let index: Vec<EndpointIndexEntry<'_>> = endpoints
        .iter()
        .map(|ep| EndpointIndexEntry {
            method: &ep.method,
            path: &ep.path,
            query_params: ep.query_param_names(),
            response_status: ep.response_status,
            response_content_type: &ep.response_content_type,
            timing_ms: ep.timing_ms,
        })
        .collect();
    serde_json::to_string_pretty(&index).map_err(|source| SkillError::Serialize {
        artifact: ENDPOINTS_FILE,
        source,
    })
}

fn table_cell(s: &str) -> String {
    s.replace(['\n', '\r'], " ").replace('|', "\\|")
}

/// Inline code span that survives backticks inside `s`.
fn code_span(s: &str) -> String {
    if s.contains('`') {
        format!("`` {} ``", s)
    } else {
        format!("`{}`", s)
    }
}

fn host_of(base_url: Option<&str>) -> String {
    base_url
        .and_then(|u| Url::parse(u).ok())
        .and_then(|u| {
            u.host_str().map(|h| match u.port() {
                Some(port) => format!("{}:{}", h, port),
                None => h.to_string(),
            })
        })
        .unwrap_or_else(|| "Unknown".to_string())
}

pub fn render_skill_md(analysis: &Analysis, client_module: &str) -> String {
    let summary = analysis.summary();
    let auth = &analysis.auth;

    let methods = if summary.methods.is_empty() {
        "none".to_string()
    } else {
        summary
            .methods
            .iter()
            .map(|(m, n)| format!("{}: {}", m, n))
            .collect::<Vec<_>>()
            .join(", ")
    };
    let statuses = if summary.status_codes.is_empty() {
        "none".to_string()
    } else {
        summary
            .status_codes
            .iter()
            .map(|(s, n)| format!("{}: {}", s, n))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut md = format!(
        "# API Skill: {}\n\nAuto-generated from HAR capture.\n\n",
        host_of(summary.base_url.as_deref())
    );

    for warning in &analysis.warnings {
        md.push_str(&format!(
            "> **Notice:** {}. The generated client has no endpoint methods.\n\n",
            warning
        ));
    }

    md.push_str(&format!(
        "## Summary\n\n\
         - **Base URL:** {}\n\
         - **Auth Type:** {}\n\
         - **Total Endpoints:** {}\n\
         - **Methods:** {}\n\
         - **Status Codes:** {}\n\
         - **Capture SHA-256:** `{}`\n\n",
        summary.base_url.as_deref().unwrap_or("(none)"),
        summary.auth_type,
        summary.total_endpoints,
        methods,
        statuses,
        analysis.capture_sha256
    ));

    md.push_str("## Endpoints\n\n");
    md.push_str("| Method | Path | Status | Response Type |\n");
    md.push_str("|--------|------|--------|---------------|\n");
    for ep in &analysis.endpoints {
        md.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            table_cell(&ep.method),
            code_span(&table_cell(&ep.path)),
            ep.response_status,
            table_cell(&ep.response_content_type)
        ));
    }

    md.push_str(&format!(
        "\n## Usage\n\n```python\nfrom {} import APIClient\n\nclient = APIClient()\n# Call endpoints using generated methods\n```\n\n",
        client_module
    ));

    md.push_str("## Auth Notes\n\n");
    match summary.auth_type {
        AuthKind::Bearer => {
            md.push_str("- Uses **Bearer Token** authentication\n");
            md.push_str("- Token may expire - refresh by re-capturing HAR\n");
            if let Some(expiry) = auth.bearer_expiry() {
                md.push_str(&format!(
                    "- Token expiry (JWT `exp`): {}\n",
                    expiry.to_rfc3339_opts(SecondsFormat::Secs, true)
                ));
            }
        }
        AuthKind::ApiKey => md.push_str("- Uses a raw **API Key** in the `Authorization` header\n"),
        AuthKind::SessionCookie | AuthKind::None => {}
    }
    if !auth.cookies.is_empty() {
        md.push_str(&format!(
            "- Uses **Session Cookies** ({} cookies)\n",
            auth.cookies.len()
        ));
    }
    if auth.csrf_token.is_some() {
        md.push_str("- Includes **CSRF Token** protection\n");
    }
    if !auth.custom_headers.is_empty() {
        let names: Vec<&str> = auth.custom_headers.keys().map(String::as_str).collect();
        md.push_str(&format!("- Sends auth headers: {}\n", names.join(", ")));
    }
    if auth.is_empty() {
        md.push_str("- No authentication detected\n");
    }

    md
}
