//! Client code generation.
//!
//! Endpoints and the auth profile are first lowered into a [`ClientSpec`]
//! (method names, parameters, auth setup steps), which [`python::render`]
//! turns into source in a single pass. Naming lives in [`naming`].

pub mod naming;
pub mod python;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::auth::{AuthKind, AuthProfile, Credential};
use crate::pipeline::extractor::Endpoint;
use crate::pipeline::Analysis;

/// Origin used when no endpoint yielded a base URL.
pub const PLACEHOLDER_BASE_URL: &str = "https://example.com";

/// Methods whose generated callable may take a request body.
pub const MUTATING_METHODS: &[&str] = &["POST", "PUT", "PATCH"];

/// Inputs that are not derived from the capture.
#[derive(Debug, Clone, Copy)]
pub struct GenerationContext {
    pub generated_at: DateTime<Utc>,
}

impl GenerationContext {
    pub fn now() -> Self {
        Self {
            generated_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthSetup {
    /// Pre-populate the session cookie jar.
    Cookies(BTreeMap<String, String>),
    /// Set a default session header.
    Header { name: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
    /// Query parameter name as sent on the wire.
    pub name: String,
    /// Argument name in the generated signature.
    pub ident: String,
    /// First value observed in the capture.
    pub default: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientMethod {
    pub name: String,
    /// Set when `name` had to be suffixed to avoid an earlier method's name.
    pub renamed_from: Option<String>,
    pub http_method: String,
    pub path: String,
    pub status: i64,
    pub content_type: String,
    pub params: Vec<ParamSpec>,
    pub takes_body: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientSpec {
    pub base_url: String,
    pub base_url_inferred: bool,
    pub auth_type: AuthKind,
    pub generated_at: DateTime<Utc>,
    pub auth_setup: Vec<AuthSetup>,
    pub methods: Vec<ClientMethod>,
}

impl ClientSpec {
    /// First GET method, used for the example call in the generated entry point.
    pub fn sample_get(&self) -> Option<&ClientMethod> {
        self.methods.iter().find(|m| m.http_method == "GET")
    }
}

/// Lower endpoints + auth into the client IR.
/// One method per distinct (method, path); the first occurrence wins.
pub fn build_client(
    endpoints: &[Endpoint],
    base_url: Option<&str>,
    auth: &AuthProfile,
    ctx: GenerationContext,
) -> ClientSpec {
    let mut seen: Vec<(&str, &str)> = Vec::new();
    let mut names: Vec<String> = Vec::new();
    let mut methods = Vec::new();

    for ep in endpoints {
        let key = (ep.method.as_str(), ep.path.as_str());
        if seen.contains(&key) {
            debug!("Skipping duplicate endpoint {} {}", ep.method, ep.path);
            continue;
        }
        seen.push(key);

        let base_name = naming::method_name(&ep.method, &ep.path);
        let name = naming::disambiguate(&base_name, &names);
        let renamed_from = if name != base_name {
            warn!(
                "Method name {} for {} {} collides with an earlier endpoint, using {}",
                base_name, ep.method, ep.path, name
            );
            Some(base_name)
        } else {
            None
        };
        names.push(name.clone());

        methods.push(ClientMethod {
            name,
            renamed_from,
            http_method: ep.method.clone(),
            path: ep.path.clone(),
            status: ep.response_status,
            content_type: ep.response_content_type.clone(),
            params: param_specs(ep),
            takes_body: MUTATING_METHODS.contains(&ep.method.as_str()) && ep.has_request_body(),
        });
    }

    ClientSpec {
        base_url: base_url.unwrap_or(PLACEHOLDER_BASE_URL).to_string(),
        base_url_inferred: base_url.is_some(),
        auth_type: auth.kind(),
        generated_at: ctx.generated_at,
        auth_setup: auth_setup(auth),
        methods,
    }
}

fn param_specs(ep: &Endpoint) -> Vec<ParamSpec> {
    let mut idents: Vec<String> = Vec::new();
    ep.query_params
        .iter()
        .map(|param| {
            let ident = naming::disambiguate(&naming::param_identifier(&param.name), &idents);
            idents.push(ident.clone());
            ParamSpec {
                name: param.name.clone(),
                ident,
                default: param.first_value().to_string(),
            }
        })
        .collect()
}

/// Auth steps applied once at client construction.
/// Order: cookies, `Authorization` (bearer before API key), CSRF, other headers.
pub fn auth_setup(auth: &AuthProfile) -> Vec<AuthSetup> {
    let mut steps = Vec::new();

    if !auth.cookies.is_empty() {
        steps.push(AuthSetup::Cookies(auth.cookies.clone()));
    }

    match auth.active_credential() {
        Some(Credential::Bearer(token)) => steps.push(AuthSetup::Header {
            name: "Authorization".to_string(),
            value: format!("Bearer {}", token),
        }),
        Some(Credential::ApiKey(key)) => steps.push(AuthSetup::Header {
            name: "Authorization".to_string(),
            value: key.to_string(),
        }),
        None => {}
    }

    if let Some(csrf) = &auth.csrf_token {
        steps.push(AuthSetup::Header {
            name: "X-CSRF-Token".to_string(),
            value: csrf.clone(),
        });
    }

    for (name, value) in &auth.custom_headers {
        steps.push(AuthSetup::Header {
            name: name.clone(),
            value: value.clone(),
        });
    }

    steps
}

/// Build and render the client for a finished analysis.
pub fn generate_client(analysis: &Analysis, ctx: GenerationContext) -> String {
    let spec = build_client(
        &analysis.endpoints,
        analysis.base_url.as_deref(),
        &analysis.auth,
        ctx,
    );
    python::render(&spec)
}
