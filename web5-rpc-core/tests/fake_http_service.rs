use bytes::Bytes;
use std::sync::{Arc, Mutex};
use web5_rpc_core::{BoxError, DataStream, HttpService};

type Responder =
    dyn Fn(&http::Request<Bytes>) -> Result<http::Response<DataStream>, BoxError> + Send + Sync;

/// A request as seen by the fake server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: http::Method,
    pub uri: String,
    pub headers: http::HeaderMap,
    pub body: Bytes,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn header_json(&self, name: &str) -> serde_json::Value {
        serde_json::from_str(self.header(name).expect("header is missing")).unwrap()
    }

    pub fn body_json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

/// An in-process HTTP server: answers every request with `responder` and records it.
#[derive(Clone)]
pub struct FakeHttpService {
    responder: Arc<Responder>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl FakeHttpService {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&http::Request<Bytes>) -> Result<http::Response<DataStream>, BoxError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            responder: Arc::new(responder),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Answers every request with a JSON body.
    pub fn json(status: u16, body: serde_json::Value) -> Self {
        Self::new(move |_| {
            Ok(http::Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(DataStream::from(body.to_string()))?)
        })
    }

    /// Answers every request with the envelope in the `dwn-response` header and `data` as body.
    pub fn streamed(envelope: serde_json::Value, data: &'static [u8]) -> Self {
        Self::new(move |_| {
            Ok(http::Response::builder()
                .status(200)
                .header(
                    "dwn-response",
                    http::HeaderValue::from_bytes(envelope.to_string().as_bytes())?,
                )
                .header("content-length", data.len().to_string())
                .body(DataStream::from(Bytes::from_static(data)))?)
        })
    }

    /// Fails every request before any response is received.
    pub fn unreachable() -> Self {
        Self::new(|_| Err("connection refused".into()))
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl HttpService for FakeHttpService {
    async fn call(
        &self,
        request: http::Request<Bytes>,
    ) -> Result<http::Response<DataStream>, BoxError> {
        let response = (self.responder)(&request);
        let (parts, body) = request.into_parts();
        self.requests.lock().unwrap().push(RecordedRequest {
            method: parts.method,
            uri: parts.uri.to_string(),
            headers: parts.headers,
            body,
        });
        response
    }
}
