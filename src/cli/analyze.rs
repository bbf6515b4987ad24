use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use crate::capture::Capture;
use crate::codegen::{self, GenerationContext};
use crate::config::Config;
use crate::export;
use crate::pipeline::{Analysis, Analyzer};

/// Endpoints listed in the console summary before truncating.
const SUMMARY_ENDPOINT_LIMIT: usize = 10;

pub fn run(
    capture_path: String,
    output: Option<String>,
    config_path: Option<String>,
    redact: bool,
) -> Result<()> {
    let config = Config::load_with_path(config_path)?;
    let redact = redact || config.export.redact_secrets;

    info!("Loading capture: {}", capture_path);
    let capture = Capture::load(&capture_path)
        .with_context(|| format!("Failed to load capture {}", capture_path))?;

    let mut analysis = Analyzer::new(&config.analysis).analyze(&capture);
    if redact {
        info!("Redacting credentials");
        analysis.redact();
    }

    print!("{}", format_summary(&analysis));

    let ctx = GenerationContext::now();
    match output {
        Some(dir) => {
            let written = export::export_skill(Path::new(&dir), &analysis, ctx, &config.export)
                .with_context(|| format!("Failed to export skill bundle to {}", dir))?;
            println!();
            println!("Skill exported to {} ({} files)", dir, written.len());
        }
        None => {
            println!();
            print!("{}", codegen::generate_client(&analysis, ctx));
        }
    }

    Ok(())
}

/// Human-readable summary printed before the client or export.
pub fn format_summary(analysis: &Analysis) -> String {
    let summary = analysis.summary();
    let rule = "=".repeat(50);

    let mut out = String::new();
    out.push_str(&format!("{}\nHAR Analysis Summary\n{}\n", rule, rule));
    out.push_str(&format!(
        "Base URL: {}\n",
        summary.base_url.as_deref().unwrap_or("(none)")
    ));
    out.push_str(&format!("Auth Type: {}\n", summary.auth_type));
    out.push_str(&format!("Total Endpoints: {}\n", summary.total_endpoints));

    for warning in &analysis.warnings {
        out.push_str(&format!("Warning: {}\n", warning));
    }

    if !summary.methods.is_empty() {
        out.push_str("\nMethods:\n");
        for (method, count) in &summary.methods {
            out.push_str(&format!("  {}: {}\n", method, count));
        }
    }
    if !summary.status_codes.is_empty() {
        out.push_str("\nStatus Codes:\n");
        for (status, count) in &summary.status_codes {
            out.push_str(&format!("  {}: {}\n", status, count));
        }
    }

    if !analysis.endpoints.is_empty() {
        out.push_str("\nEndpoints:\n");
        for ep in analysis.endpoints.iter().take(SUMMARY_ENDPOINT_LIMIT) {
            out.push_str(&format!(
                "  {:6} {} -> {}\n",
                ep.method, ep.path, ep.response_status
            ));
        }
        if analysis.endpoints.len() > SUMMARY_ENDPOINT_LIMIT {
            out.push_str(&format!(
                "  ... and {} more\n",
                analysis.endpoints.len() - SUMMARY_ENDPOINT_LIMIT
            ));
        }
    }

    out
}
