//! # HTTP Transport Clients
//!
//! [`HttpDwnRpcClient`] sends DWN requests. [`HttpWeb5RpcClient`] wraps one and adds the DID
//! requests on top, sharing the same [`HttpService`].
//!
//! ## DWN responses
//!
//! A DWN server answers in one of two shapes:
//!
//! 1. The JSON-RPC envelope is the whole HTTP body.
//! 2. The envelope is stringified in the `dwn-response` header, and the HTTP body is the raw
//!    record data. The body is attached untouched to the reply at `record.data`, replacing
//!    whatever the reply carried there.
use super::service::HttpService;
use crate::{
    client::{DidRpcRequest, DidRpcResponse, DwnRpcRequest, DwnRpcResponse},
    error::RpcClientError,
    json_rpc::{JsonRpcError, JsonRpcRequest, JsonRpcResponse},
    transport::{DidRpc, DwnRpc, RpcTransport},
};
use async_trait::async_trait;
use bytes::Bytes;
use http::{
    HeaderMap, Method,
    header::{CONTENT_LENGTH, CONTENT_TYPE},
};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

/// Request header carrying the DWN JSON-RPC request envelope.
pub const DWN_REQUEST_HEADER: &str = "dwn-request";

/// Response header carrying the DWN JSON-RPC response envelope when the body is record data.
pub const DWN_RESPONSE_HEADER: &str = "dwn-response";

/// JSON-RPC method of every DWN request.
pub const DWN_PROCESS_MESSAGE: &str = "dwn.processMessage";

const HTTP_SCHEMES: [&str; 2] = ["http:", "https:"];

/// Sends DWN requests over HTTP(S).
#[derive(Debug)]
pub struct HttpDwnRpcClient<S = reqwest::Client> {
    service: Arc<S>,
}

impl HttpDwnRpcClient<reqwest::Client> {
    /// Creates a client backed by a default `reqwest::Client`.
    pub fn new() -> Self {
        Self::from_service(reqwest::Client::new())
    }
}

impl Default for HttpDwnRpcClient<reqwest::Client> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Clone for HttpDwnRpcClient<S> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
        }
    }
}

impl<S> HttpDwnRpcClient<S>
where
    S: HttpService,
{
    /// Creates a client performing its round trips with the given service.
    pub fn from_service(service: S) -> Self {
        Self::from_shared_service(Arc::new(service))
    }

    /// Creates a client sharing an already wrapped service.
    pub fn from_shared_service(service: Arc<S>) -> Self {
        Self { service }
    }
}

impl<S> RpcTransport for HttpDwnRpcClient<S>
where
    S: HttpService,
{
    fn transport_protocols(&self) -> Vec<String> {
        HTTP_SCHEMES.iter().map(|s| s.to_string()).collect()
    }
}

#[async_trait]
impl<S> DwnRpc for HttpDwnRpcClient<S>
where
    S: HttpService + 'static,
{
    async fn send_dwn_request(
        &self,
        request: DwnRpcRequest,
    ) -> Result<DwnRpcResponse, RpcClientError> {
        let DwnRpcRequest {
            dwn_url,
            target_did,
            message,
            data,
        } = request;

        let envelope = JsonRpcRequest::with_random_id(
            DWN_PROCESS_MESSAGE,
            json!({ "target": target_did, "message": message }),
        );
        let envelope_json =
            serde_json::to_string(&envelope).map_err(|e| RpcClientError::transport(&dwn_url, e))?;

        let mut builder = http::Request::builder()
            .method(Method::POST)
            .uri(request_uri(&dwn_url)?)
            .header(DWN_REQUEST_HEADER, envelope_json);

        let body = match data {
            Some(data) => {
                builder = builder.header(CONTENT_TYPE, "application/octet-stream");
                data
            }
            None => Bytes::new(),
        };

        let http_request = builder
            .body(body)
            .map_err(|e| RpcClientError::transport(&dwn_url, e))?;

        debug!(request_id = %envelope.id, url = %dwn_url, "Sending DWN request");

        let response = self
            .service
            .call(http_request)
            .await
            .map_err(|e| RpcClientError::transport(&dwn_url, e))?;

        let (parts, body) = response.into_parts();

        // The envelope is looked up in the header first: if it is there, the body is record data.
        let (envelope, data_stream) = match parts.headers.get(DWN_RESPONSE_HEADER) {
            Some(header) => {
                // Header values may carry UTF-8 beyond visible ASCII, so parse the raw bytes.
                let envelope = JsonRpcResponse::from_slice(header.as_bytes())
                    .map_err(|e| RpcClientError::envelope_parse(&dwn_url, e))
                    .inspect_err(|e| warn!(url = %dwn_url, "Invalid {DWN_RESPONSE_HEADER} header: {e}"))?;

                let data_stream = (!declares_empty_body(&parts.headers)).then_some(body);
                debug!(
                    url = %dwn_url,
                    streamed = data_stream.is_some(),
                    "Received DWN response envelope in header"
                );
                (envelope, data_stream)
            }
            None => {
                let bytes = body
                    .into_bytes()
                    .await
                    .map_err(|e| RpcClientError::transport(&dwn_url, e))?;

                let envelope = JsonRpcResponse::from_slice(&bytes)
                    .map_err(|e| RpcClientError::envelope_parse(&dwn_url, e))
                    .inspect_err(|e| warn!(url = %dwn_url, "Invalid DWN response body: {e}"))?;

                debug!(url = %dwn_url, "Received DWN response envelope in body");
                (envelope, None)
            }
        };

        let result = envelope.into_result().map_err(rpc_error)?;
        let mut reply = extract_reply(&dwn_url, result)?;

        if let Some(stream) = data_stream {
            reply.attach_record_data(stream);
        }

        Ok(reply)
    }
}

/// Sends both DID and DWN requests over HTTP(S).
///
/// DWN requests and the served schemes are delegated to the wrapped [`HttpDwnRpcClient`].
#[derive(Debug)]
pub struct HttpWeb5RpcClient<S = reqwest::Client> {
    dwn: HttpDwnRpcClient<S>,
}

impl HttpWeb5RpcClient<reqwest::Client> {
    /// Creates a client backed by a default `reqwest::Client`.
    pub fn new() -> Self {
        Self::from_service(reqwest::Client::new())
    }
}

impl Default for HttpWeb5RpcClient<reqwest::Client> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Clone for HttpWeb5RpcClient<S> {
    fn clone(&self) -> Self {
        Self {
            dwn: self.dwn.clone(),
        }
    }
}

impl<S> HttpWeb5RpcClient<S>
where
    S: HttpService,
{
    /// Creates a client performing its round trips with the given service.
    pub fn from_service(service: S) -> Self {
        Self::from_shared_service(Arc::new(service))
    }

    /// Creates a client sharing an already wrapped service.
    pub fn from_shared_service(service: Arc<S>) -> Self {
        Self {
            dwn: HttpDwnRpcClient::from_shared_service(service),
        }
    }

    /// Wraps an existing DWN client, reusing its service for DID requests.
    pub fn from_dwn_client(dwn: HttpDwnRpcClient<S>) -> Self {
        Self { dwn }
    }

    async fn did_round_trip(
        &self,
        request: DidRpcRequest,
    ) -> Result<DidRpcResponse, RpcClientError> {
        let url = request.url;
        let envelope = JsonRpcRequest::with_random_id(
            request.method.as_str(),
            json!({ "data": request.data }),
        );
        let body = serde_json::to_vec(&envelope).map_err(|e| RpcClientError::transport(&url, e))?;

        let http_request = http::Request::builder()
            .method(Method::POST)
            .uri(request_uri(&url)?)
            .header(CONTENT_TYPE, "application/json")
            .body(Bytes::from(body))
            .map_err(|e| RpcClientError::transport(&url, e))?;

        debug!(request_id = %envelope.id, url = %url, method = %request.method, "Sending DID request");

        let response = self
            .dwn
            .service
            .call(http_request)
            .await
            .map_err(|e| RpcClientError::transport(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RpcClientError::Http {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let bytes = response
            .into_body()
            .into_bytes()
            .await
            .map_err(|e| RpcClientError::transport(&url, e))?;

        let envelope = JsonRpcResponse::from_slice(&bytes)
            .map_err(|e| RpcClientError::envelope_parse(&url, e))?;
        let result = envelope.into_result().map_err(rpc_error)?;

        serde_json::from_value(result).map_err(|e| RpcClientError::envelope_parse(&url, e))
    }
}

impl<S> RpcTransport for HttpWeb5RpcClient<S>
where
    S: HttpService,
{
    fn transport_protocols(&self) -> Vec<String> {
        self.dwn.transport_protocols()
    }
}

#[async_trait]
impl<S> DwnRpc for HttpWeb5RpcClient<S>
where
    S: HttpService + 'static,
{
    async fn send_dwn_request(
        &self,
        request: DwnRpcRequest,
    ) -> Result<DwnRpcResponse, RpcClientError> {
        self.dwn.send_dwn_request(request).await
    }
}

#[async_trait]
impl<S> DidRpc for HttpWeb5RpcClient<S>
where
    S: HttpService + 'static,
{
    async fn send_did_request(
        &self,
        request: DidRpcRequest,
    ) -> Result<DidRpcResponse, RpcClientError> {
        let url = request.url.clone();

        self.did_round_trip(request)
            .await
            .map_err(|source| RpcClientError::DidRequest {
                url,
                source: Box::new(source),
            })
    }
}

// `url` normalizes what `http::Uri` would reject outright, e.g. percent-encoding spaces.
fn request_uri(url: &str) -> Result<String, RpcClientError> {
    Url::parse(url)
        .map(String::from)
        .map_err(|source| RpcClientError::InvalidUrl {
            url: url.to_string(),
            source,
        })
}

fn rpc_error(error: JsonRpcError) -> RpcClientError {
    RpcClientError::Rpc {
        code: error.code,
        message: error.message,
    }
}

fn extract_reply(url: &str, result: Value) -> Result<DwnRpcResponse, RpcClientError> {
    let reply = match result {
        Value::Object(mut result) => result.remove("reply"),
        _ => None,
    }
    .ok_or_else(|| RpcClientError::envelope_parse(url, "response has no result.reply"))?;

    serde_json::from_value(reply).map_err(|e| RpcClientError::envelope_parse(url, e))
}

// An explicit zero length means the server streamed nothing.
fn declares_empty_body(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        == Some(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::DwnReplyStatus;

    #[test]
    fn test_extract_reply() {
        let reply = extract_reply(
            "http://localhost",
            json!({"reply": {"status": {"code": 202, "detail": "Accepted"}}}),
        )
        .unwrap();

        assert_eq!(reply.status, Some(DwnReplyStatus::new(202, "Accepted")));
    }

    #[test]
    fn test_extract_reply_requires_reply() {
        let err = extract_reply("http://localhost", json!({"other": 1})).unwrap_err();
        assert!(matches!(err, RpcClientError::EnvelopeParse { .. }));

        let err = extract_reply("http://localhost", Value::Null).unwrap_err();
        assert!(matches!(err, RpcClientError::EnvelopeParse { .. }));
    }

    #[test]
    fn test_declares_empty_body() {
        let mut headers = HeaderMap::new();
        assert!(!declares_empty_body(&headers));

        headers.insert(CONTENT_LENGTH, "12".parse().unwrap());
        assert!(!declares_empty_body(&headers));

        headers.insert(CONTENT_LENGTH, "0".parse().unwrap());
        assert!(declares_empty_body(&headers));
    }

    #[test]
    fn test_http_clients_serve_http_and_https() {
        let client = HttpWeb5RpcClient::new();
        assert_eq!(client.transport_protocols(), vec!["http:", "https:"]);
    }

    #[test]
    fn test_request_uri_is_normalized() {
        assert_eq!(
            request_uri("http://localhost:3000/records read").unwrap(),
            "http://localhost:3000/records%20read"
        );
        assert!(matches!(
            request_uri("http://[::1"),
            Err(RpcClientError::InvalidUrl { .. })
        ));
    }
}
