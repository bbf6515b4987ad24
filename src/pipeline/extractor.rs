//! Endpoint extraction: turns an accepted capture entry into an [`Endpoint`].
//!
//! Extraction never fails. Absent source data becomes the neutral value for the
//! field (empty string, empty map, zero).

use std::collections::BTreeMap;

use serde::Serialize;
use url::{form_urlencoded, Url};

use crate::capture::CaptureEntry;
use crate::util::{truncate_chars, TRUNCATION_MARKER};

/// One query parameter with every value observed for it, in URL order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryParam {
    pub name: String,
    pub values: Vec<String>,
}

impl QueryParam {
    pub fn first_value(&self) -> &str {
        self.values.first().map(String::as_str).unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Endpoint {
    pub method: String,
    pub url: String,
    pub path: String,
    pub query_params: Vec<QueryParam>,
    pub request_headers: BTreeMap<String, String>,
    pub request_body: Option<String>,
    pub response_status: i64,
    pub response_content_type: String,
    pub response_body_preview: Option<String>,
    pub response_size: i64,
    pub timing_ms: f64,
}

impl Endpoint {
    /// `scheme://host[:port]` of the endpoint URL, if it has a host.
    pub fn origin(&self) -> Option<String> {
        let url = Url::parse(&self.url).ok()?;
        let host = url.host_str()?;
        Some(match url.port() {
            Some(port) => format!("{}://{}:{}", url.scheme(), host, port),
            None => format!("{}://{}", url.scheme(), host),
        })
    }

    pub fn query_param(&self, name: &str) -> Option<&QueryParam> {
        self.query_params.iter().find(|p| p.name == name)
    }

    pub fn query_param_names(&self) -> Vec<&str> {
        self.query_params.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn has_request_body(&self) -> bool {
        self.request_body.as_deref().is_some_and(|b| !b.is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct Extractor {
    preview_limit: usize,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(500)
    }
}

impl Extractor {
    pub fn new(preview_limit: usize) -> Self {
        Self { preview_limit }
    }

    pub fn extract(&self, entry: &CaptureEntry) -> Endpoint {
        let url = entry.url().to_string();
        let (path, query_params) = split_url(&url);

        let mut request_headers = BTreeMap::new();
        for header in &entry.request.headers {
            request_headers.insert(header.name.clone(), header.value.clone());
        }

        Endpoint {
            method: entry.method(),
            path,
            query_params,
            request_headers,
            request_body: entry.request_body().map(str::to_string),
            response_status: entry.response.status.unwrap_or(0),
            response_content_type: entry.mime_type().to_string(),
            response_body_preview: entry
                .response_text()
                .filter(|body| !body.is_empty())
                .map(|body| preview(body, self.preview_limit)),
            response_size: entry.response_size(),
            timing_ms: entry.time.unwrap_or(0.0),
            url,
        }
    }
}

/// First `limit` characters of `body`, plus the truncation marker if cut.
pub fn preview(body: &str, limit: usize) -> String {
    match truncate_chars(body, limit) {
        (head, true) => format!("{}{}", head, TRUNCATION_MARKER),
        (whole, false) => whole.to_string(),
    }
}

/// Split a URL into its path and decoded query parameters.
/// The path is taken verbatim: no percent-encoding and no dot-segment removal.
fn split_url(raw: &str) -> (String, Vec<QueryParam>) {
    let without_fragment = raw.split('#').next().unwrap_or_default();
    let (target, query) = without_fragment
        .split_once('?')
        .unwrap_or((without_fragment, ""));
    (raw_path(target).to_string(), parse_query(query))
}

/// Strip `scheme://authority` from an absolute URL; relative URLs pass through.
fn raw_path(target: &str) -> &str {
    match target.split_once("://") {
        Some((_, rest)) => rest.find('/').map_or("", |i| &rest[i..]),
        None => target,
    }
}

/// Decode a query string, grouping repeated names. Blank values are dropped.
fn parse_query(query: &str) -> Vec<QueryParam> {
    let mut params: Vec<QueryParam> = Vec::new();
    for (name, value) in form_urlencoded::parse(query.as_bytes()) {
        if value.is_empty() {
            continue;
        }
        match params.iter_mut().find(|p| p.name == name) {
            Some(param) => param.values.push(value.into_owned()),
            None => params.push(QueryParam {
                name: name.into_owned(),
                values: vec![value.into_owned()],
            }),
        }
    }
    params
}
