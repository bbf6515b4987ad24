//! HAR (HTTP Archive) schema, modelled leniently.
//!
//! Browser captures are untrusted and frequently incomplete, so every field is
//! optional and a value of the wrong JSON type is treated as absent rather than
//! failing the whole document.

use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;

/// Deserialize `T`, falling back to `T::default()` on any type mismatch.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Like [`lenient`] but per element, so one broken item does not drop the rest.
fn lenient_seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).unwrap_or_default())
            .collect(),
        _ => Vec::new(),
    })
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CaptureDocument {
    #[serde(default, deserialize_with = "lenient")]
    pub log: CaptureLog,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CaptureLog {
    #[serde(default, deserialize_with = "lenient_seq")]
    pub entries: Vec<CaptureEntry>,
}

/// One recorded request/response exchange.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CaptureEntry {
    #[serde(default, deserialize_with = "lenient")]
    pub request: CaptureRequest,
    #[serde(default, deserialize_with = "lenient")]
    pub response: CaptureResponse,
    /// Elapsed time in milliseconds.
    #[serde(default, deserialize_with = "lenient")]
    pub time: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CaptureRequest {
    #[serde(default, deserialize_with = "lenient")]
    pub method: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub headers: Vec<NameValue>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub cookies: Vec<NameValue>,
    #[serde(rename = "postData", default, deserialize_with = "lenient")]
    pub post_data: Option<PostData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CaptureResponse {
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub content: Option<ResponseContent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseContent {
    #[serde(rename = "mimeType", default, deserialize_with = "lenient")]
    pub mime_type: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub size: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostData {
    #[serde(default, deserialize_with = "lenient")]
    pub text: Option<String>,
}

/// A header or cookie pair. Entries missing a name are kept with an empty one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NameValue {
    #[serde(default, deserialize_with = "lenient")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient")]
    pub value: String,
}

impl NameValue {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl CaptureEntry {
    pub fn url(&self) -> &str {
        self.request.url.as_deref().unwrap_or("")
    }

    /// Upper-cased request method, `GET` when the capture omits it.
    pub fn method(&self) -> String {
        match self.request.method.as_deref().map(str::trim) {
            Some(m) if !m.is_empty() => m.to_ascii_uppercase(),
            _ => "GET".to_string(),
        }
    }

    /// Case-insensitive header lookup. With repeated names the last one wins.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.request
            .headers
            .iter()
            .rev()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }

    pub fn mime_type(&self) -> &str {
        self.response
            .content
            .as_ref()
            .and_then(|c| c.mime_type.as_deref())
            .unwrap_or("")
    }

    pub fn response_text(&self) -> Option<&str> {
        self.response.content.as_ref().and_then(|c| c.text.as_deref())
    }

    pub fn response_size(&self) -> i64 {
        self.response
            .content
            .as_ref()
            .and_then(|c| c.size)
            .unwrap_or(0)
    }

    pub fn request_body(&self) -> Option<&str> {
        self.request.post_data.as_ref().and_then(|p| p.text.as_deref())
    }
}
