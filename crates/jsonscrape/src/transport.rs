//! The HTTP transport boundary.
//!
//! The core pipeline depends only on [`HttpTransport`], so tests
//! inject scripted transports and never open a socket. The real
//! implementation wraps a shared `reqwest::Client`.

use std::future::Future;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};

use jsonscrape_core::retry;
use jsonscrape_core::settings::{Payload, RequestSpec};

use crate::error::Error;

/// Status and raw body of one HTTP exchange. The body stays unparsed
/// so non-2xx responses never go through the JSON parser.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }
}

/// Minimal capability the fetch loop needs from an HTTP client.
pub trait HttpTransport {
    fn send(
        &self,
        request: &RequestSpec,
    ) -> impl Future<Output = Result<TransportResponse, Error>> + Send;
}

/// Production transport backed by reqwest.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Build the outgoing request: method, headers, and body. A JSON
    /// payload is serialized into the body with `Content-Type:
    /// application/json` added only when the caller did not set one;
    /// raw payloads pass through untouched.
    fn build_request(&self, request: &RequestSpec) -> Result<reqwest::Request, Error> {
        let method = reqwest::Method::from_bytes(request.method.to_uppercase().as_bytes())
            .map_err(|_| Error::Config(format!("Invalid HTTP method: {}", request.method)))?;

        let mut headers = HeaderMap::new();
        for (name, value) in &request.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| Error::Config(format!("Invalid header name: {name}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|_| Error::Config(format!("Invalid header value for {name}")))?;
            headers.insert(name, value);
        }

        let mut builder = self.client.request(method, &request.url);

        match &request.payload {
            Some(Payload::Json(value)) => {
                if !headers.contains_key(CONTENT_TYPE) {
                    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                }
                let body = serde_json::to_vec(value)
                    .map_err(|e| Error::Config(format!("Invalid JSON payload: {e}")))?;
                builder = builder.body(body);
            }
            Some(Payload::Raw(bytes)) => {
                builder = builder.body(bytes.clone());
            }
            None => {}
        }

        builder
            .headers(headers)
            .build()
            .map_err(|e| Error::Config(format!("Invalid request for {}: {e}", request.url)))
    }
}

impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: &RequestSpec) -> Result<TransportResponse, Error> {
        let built = self.build_request(request)?;

        let response = self
            .client
            .execute(built)
            .await
            .map_err(network_error)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(network_error)?;

        Ok(TransportResponse { status, body })
    }
}

/// reqwest's top-level `Display` keeps the underlying cause out of the
/// message ("error sending request for url (...)"), so the retryable
/// classifier would never see "connection refused" or "dns error".
/// Walk the source chain and fold every cause into the message.
fn network_error(err: reqwest::Error) -> Error {
    let mut message = err.to_string();
    append_causes(&mut message, &err);
    // Timeouts bubble up as "deadline has elapsed", which names nothing
    // the classifier recognizes.
    if err.is_timeout() && !retry::is_transient(&message) {
        message.push_str(": timed out");
    }
    Error::Network(message)
}

fn append_causes(message: &mut String, err: &dyn std::error::Error) {
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn spec_with_payload(payload: Option<Payload>) -> RequestSpec {
        RequestSpec {
            url: "https://api.example.com/items".to_string(),
            method: "POST".to_string(),
            headers: Default::default(),
            payload,
        }
    }

    #[test]
    fn test_json_payload_sets_content_type() {
        let transport = ReqwestTransport::new();
        let spec = spec_with_payload(Some(Payload::Json(json!({"q": "rust"}))));

        let built = transport.build_request(&spec).unwrap();

        assert_eq!(
            built.headers().get(CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert!(built.body().is_some());
    }

    #[test]
    fn test_existing_content_type_is_kept() {
        let transport = ReqwestTransport::new();
        let mut spec = spec_with_payload(Some(Payload::Json(json!({"q": "rust"}))));
        spec.headers
            .insert("Content-Type".to_string(), "text/plain".to_string());

        let built = transport.build_request(&spec).unwrap();

        assert_eq!(built.headers().get(CONTENT_TYPE).unwrap(), "text/plain");
    }

    #[test]
    fn test_raw_payload_has_no_content_type() {
        let transport = ReqwestTransport::new();
        let spec = spec_with_payload(Some(Payload::Raw(b"raw-bytes".to_vec())));

        let built = transport.build_request(&spec).unwrap();

        assert!(built.headers().get(CONTENT_TYPE).is_none());
        assert!(built.body().is_some());
    }

    #[test]
    fn test_custom_headers_are_applied() {
        let transport = ReqwestTransport::new();
        let mut spec = RequestSpec::get("https://api.example.com/items");
        spec.headers
            .insert("X-Api-Key".to_string(), "secret".to_string());

        let built = transport.build_request(&spec).unwrap();

        assert_eq!(built.headers().get("x-api-key").unwrap(), "secret");
        assert_eq!(built.method(), &reqwest::Method::GET);
    }

    #[test]
    fn test_method_is_uppercased() {
        let transport = ReqwestTransport::new();
        let mut spec = RequestSpec::get("https://api.example.com/items");
        spec.method = "post".to_string();

        let built = transport.build_request(&spec).unwrap();
        assert_eq!(built.method(), &reqwest::Method::POST);
    }

    #[test]
    fn test_invalid_method_is_config_error() {
        let transport = ReqwestTransport::new();
        let mut spec = RequestSpec::get("https://api.example.com/items");
        spec.method = "NOT A METHOD".to_string();

        assert!(matches!(
            transport.build_request(&spec),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_invalid_header_is_config_error() {
        let transport = ReqwestTransport::new();
        let mut spec = RequestSpec::get("https://api.example.com/items");
        spec.headers
            .insert("bad header".to_string(), "value".to_string());

        assert!(matches!(
            transport.build_request(&spec),
            Err(Error::Config(_))
        ));
    }

    #[derive(Debug, thiserror::Error)]
    #[error("client error (Connect)")]
    struct FakeConnectError {
        #[source]
        cause: std::io::Error,
    }

    #[test]
    fn test_append_causes_walks_the_chain() {
        let outer = FakeConnectError {
            cause: std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "Connection refused (os error 111)",
            ),
        };

        let mut message = String::from("error sending request for url (http://localhost/)");
        append_causes(&mut message, &outer);

        assert!(message.contains("Connection refused"), "{message}");
        assert!(retry::is_transient(&message), "{message}");
    }

    #[tokio::test]
    async fn test_connect_failure_is_retryable() {
        let transport = ReqwestTransport::new();
        // Port 9 (discard) is not listening; the connect is refused
        // straight away without leaving the loopback interface.
        let spec = RequestSpec::get("http://127.0.0.1:9/");

        let err = transport.send(&spec).await.unwrap_err();

        let Error::Network(message) = &err else {
            panic!("expected a network error, got {err}");
        };
        assert!(retry::is_transient(message), "not transient: {message}");
        assert!(retry::is_retryable(err.status(), &err.to_string()));
    }
}
