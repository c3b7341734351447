//! Typed settings parsed from the loosely-typed JSON document.
//!
//! The settings file is validated and converted into strongly-typed
//! structs at the boundary; nothing downstream ever touches untyped
//! request or pagination data. The document accepts either a nested
//! `request` object or flat `url`/`method`/`headers`/`payload` keys,
//! plus the original key aliases (`param` for `paramName`, `start`
//! for `startPage`).

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use crate::retry::RetryPolicy;
use crate::serialize::OutputFormat;
use crate::transform::{FilterRule, MappingRule};

/// Request body: a JSON value serialized into the body, or raw bytes
/// passed through untouched. Settings documents always produce the
/// JSON variant; the raw variant exists for library callers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub enum Payload {
    Json(Value),
    Raw(Vec<u8>),
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Payload::Json(value)
    }
}

/// One HTTP request, immutable per attempt. The paginator derives
/// per-page variants by rewriting a single query parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    pub url: String,
    pub method: String,
    pub headers: HashMap<String, String>,
    pub payload: Option<Payload>,
}

impl RequestSpec {
    /// A plain GET request with no headers or payload.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: "GET".to_string(),
            headers: HashMap::new(),
            payload: None,
        }
    }

    /// The same request aimed at a different URL.
    pub fn with_url(&self, url: String) -> Self {
        Self {
            url,
            ..self.clone()
        }
    }
}

/// Page-based pagination settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaginationSpec {
    pub enabled: bool,
    #[serde(alias = "param")]
    pub param_name: String,
    #[serde(alias = "start")]
    pub start_page: u32,
    pub max_pages: u32,
    pub stop_when_empty: bool,
}

impl Default for PaginationSpec {
    fn default() -> Self {
        Self {
            enabled: false,
            param_name: "page".to_string(),
            start_page: 1,
            max_pages: 50,
            stop_when_empty: true,
        }
    }
}

/// Output target settings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub file_path: Option<String>,
}

/// Fully validated scrape settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub request: RequestSpec,
    pub pagination: PaginationSpec,
    pub retry: RetryPolicy,
    pub mapping: Vec<MappingRule>,
    pub filters: Vec<FilterRule>,
    pub response_path: Option<String>,
    pub output: OutputConfig,
}

#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error("Invalid settings document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Missing request.url in settings")]
    MissingUrl,
}

/// Raw request shape before URL validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RequestDoc {
    url: Option<String>,
    method: Option<String>,
    headers: Option<HashMap<String, String>>,
    payload: Option<Payload>,
}

/// Raw top-level document shape. `request` and the flat request keys
/// are both accepted; the nested object wins when present.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SettingsDoc {
    request: Option<RequestDoc>,
    url: Option<String>,
    method: Option<String>,
    headers: Option<HashMap<String, String>>,
    payload: Option<Payload>,
    pagination: Option<PaginationSpec>,
    retry: RetryPolicy,
    mapping: Vec<MappingRule>,
    filters: Vec<FilterRule>,
    response_path: Option<String>,
    output: OutputConfig,
}

impl Default for SettingsDoc {
    fn default() -> Self {
        Self {
            request: None,
            url: None,
            method: None,
            headers: None,
            payload: None,
            pagination: None,
            retry: RetryPolicy::default(),
            mapping: Vec::new(),
            filters: Vec::new(),
            response_path: None,
            output: OutputConfig::default(),
        }
    }
}

impl Settings {
    /// Parse and validate a settings document from raw JSON text.
    pub fn from_json_str(raw: &str) -> Result<Self, SettingsError> {
        Self::from_value(serde_json::from_str(raw)?)
    }

    /// Validate and convert an already-parsed settings document.
    pub fn from_value(value: Value) -> Result<Self, SettingsError> {
        let doc: SettingsDoc = serde_json::from_value(value)?;

        let request_doc = doc.request.unwrap_or(RequestDoc {
            url: doc.url,
            method: doc.method,
            headers: doc.headers,
            payload: doc.payload,
        });

        let url = match request_doc.url {
            Some(url) if !url.is_empty() => url,
            _ => return Err(SettingsError::MissingUrl),
        };

        Ok(Self {
            request: RequestSpec {
                url,
                method: request_doc.method.unwrap_or_else(|| "GET".to_string()),
                headers: request_doc.headers.unwrap_or_default(),
                payload: request_doc.payload,
            },
            pagination: doc.pagination.unwrap_or_default(),
            retry: doc.retry,
            mapping: doc.mapping,
            filters: doc.filters,
            response_path: doc.response_path,
            output: doc.output,
        })
    }
}
