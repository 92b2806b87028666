use async_trait::async_trait;
use fake_http_service::FakeHttpService;
use serde_json::json;
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};
use web5_rpc_core::{
    DidRpc, DidRpcMethod, DidRpcRequest, DidRpcResponse, DwnReplyStatus, DwnRpc, DwnRpcRequest,
    DwnRpcResponse, RpcClientError, RpcStatus, RpcTransport, Web5Rpc, Web5RpcClient,
};

mod fake_http_service;

/// A transport client answering with canned replies and counting the calls it receives.
struct RecordingTransport {
    name: &'static str,
    schemes: Vec<&'static str>,
    did_calls: AtomicUsize,
    dwn_calls: AtomicUsize,
}

impl RecordingTransport {
    fn new(name: &'static str, schemes: &[&'static str]) -> Arc<Self> {
        Arc::new(Self {
            name,
            schemes: schemes.to_vec(),
            did_calls: AtomicUsize::new(0),
            dwn_calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.did_calls.load(Ordering::SeqCst) + self.dwn_calls.load(Ordering::SeqCst)
    }
}

impl RpcTransport for RecordingTransport {
    fn transport_protocols(&self) -> Vec<String> {
        self.schemes.iter().map(|s| s.to_string()).collect()
    }
}

#[async_trait]
impl DidRpc for RecordingTransport {
    async fn send_did_request(
        &self,
        request: DidRpcRequest,
    ) -> Result<DidRpcResponse, RpcClientError> {
        self.did_calls.fetch_add(1, Ordering::SeqCst);
        Ok(DidRpcResponse {
            ok: true,
            status: RpcStatus {
                code: 200,
                message: self.name.to_string(),
            },
            data: Some(request.data),
        })
    }
}

#[async_trait]
impl DwnRpc for RecordingTransport {
    async fn send_dwn_request(
        &self,
        request: DwnRpcRequest,
    ) -> Result<DwnRpcResponse, RpcClientError> {
        self.dwn_calls.fetch_add(1, Ordering::SeqCst);
        let mut reply = DwnRpcResponse::with_status(DwnReplyStatus::new(200, self.name));
        reply.other.insert("target".to_string(), json!(request.target_did));
        Ok(reply)
    }
}

fn did_request(url: &str) -> DidRpcRequest {
    DidRpcRequest {
        method: DidRpcMethod::Resolve,
        url: url.to_string(),
        data: "did:example:alice".to_string(),
    }
}

fn dwn_request(url: &str) -> DwnRpcRequest {
    DwnRpcRequest::new(url, "did:example:alice", json!({ "descriptor": {} }))
}

#[test]
fn test_transport_protocols_are_unique() {
    let first = RecordingTransport::new("first", &["memory:", "ws:"]);
    let second = RecordingTransport::new("second", &["ws:", "wss:", "http:"]);

    let router = Web5RpcClient::with_http_service(
        FakeHttpService::unreachable(),
        vec![first as Arc<dyn Web5Rpc>, second as Arc<dyn Web5Rpc>],
    );

    assert_eq!(
        router.transport_protocols(),
        vec!["http:", "https:", "memory:", "ws:", "wss:"]
    );
}

#[tokio::test]
async fn test_last_registration_wins() {
    let first = RecordingTransport::new("first", &["ws:"]);
    let second = RecordingTransport::new("second", &["ws:"]);

    let router = Web5RpcClient::with_http_service(
        FakeHttpService::unreachable(),
        vec![first.clone() as Arc<dyn Web5Rpc>, second.clone()],
    );

    let response = router
        .send_did_request(did_request("ws://localhost:8080"))
        .await
        .unwrap();

    assert_eq!(response.status.message, "second");
    assert_eq!(first.calls(), 0);
    assert_eq!(second.calls(), 1);
}

#[tokio::test]
async fn test_custom_http_client_overrides_the_default() {
    let http = FakeHttpService::unreachable();
    let custom = RecordingTransport::new("custom", &["http:"]);

    let router = Web5RpcClient::with_http_service(
        http.clone(),
        vec![custom.clone() as Arc<dyn Web5Rpc>],
    );

    let did = router
        .send_did_request(did_request("http://localhost:8080/did"))
        .await
        .unwrap();
    let dwn = router
        .send_dwn_request(dwn_request("http://localhost:3000"))
        .await
        .unwrap();

    assert_eq!(did.status.message, "custom");
    assert_eq!(dwn.status.unwrap().detail, "custom");
    assert_eq!(custom.did_calls.load(Ordering::SeqCst), 1);
    assert_eq!(custom.dwn_calls.load(Ordering::SeqCst), 1);
    assert_eq!(http.request_count(), 0);

    // https: is still served by the built-in client.
    let err = router
        .send_did_request(did_request("https://localhost:8080/did"))
        .await
        .unwrap_err();
    assert!(matches!(err.cause(), RpcClientError::Transport { .. }));
    assert_eq!(http.request_count(), 1);
}

#[tokio::test]
async fn test_unknown_scheme_fails_without_network_call() {
    let http = FakeHttpService::unreachable();
    let memory = RecordingTransport::new("memory", &["memory:"]);
    let router = Web5RpcClient::with_http_service(
        http.clone(),
        vec![memory.clone() as Arc<dyn Web5Rpc>],
    );

    let did_err = router
        .send_did_request(did_request("ipfs://bafy/did"))
        .await
        .unwrap_err();
    let dwn_err = router
        .send_dwn_request(dwn_request("wss://dwn.example.test"))
        .await
        .unwrap_err();

    match did_err {
        RpcClientError::NoTransportClient(scheme) => assert_eq!(scheme, "ipfs:"),
        other => panic!("Expected NoTransportClient, got {other:?}"),
    }
    match dwn_err {
        RpcClientError::NoTransportClient(scheme) => assert_eq!(scheme, "wss:"),
        other => panic!("Expected NoTransportClient, got {other:?}"),
    }
    assert_eq!(http.request_count(), 0);
    assert_eq!(memory.calls(), 0);
}

#[tokio::test]
async fn test_malformed_url_fails_before_lookup() {
    let http = FakeHttpService::unreachable();
    let memory = RecordingTransport::new("memory", &["memory:"]);
    let router = Web5RpcClient::with_http_service(
        http.clone(),
        vec![memory.clone() as Arc<dyn Web5Rpc>],
    );

    let did_err = router
        .send_did_request(did_request("::not a url::"))
        .await
        .unwrap_err();
    let dwn_err = router
        .send_dwn_request(dwn_request("http://[::1"))
        .await
        .unwrap_err();

    match did_err {
        RpcClientError::InvalidUrl { url, .. } => assert_eq!(url, "::not a url::"),
        other => panic!("Expected InvalidUrl, got {other:?}"),
    }
    assert!(matches!(dwn_err, RpcClientError::InvalidUrl { .. }));
    assert_eq!(http.request_count(), 0);
    assert_eq!(memory.calls(), 0);
}

#[tokio::test]
async fn test_responses_are_forwarded_unchanged() {
    let memory = RecordingTransport::new("memory", &["memory:"]);
    let router = Web5RpcClient::with_http_service(
        FakeHttpService::unreachable(),
        vec![memory.clone() as Arc<dyn Web5Rpc>],
    );

    let did = router
        .send_did_request(did_request("memory://node/did"))
        .await
        .unwrap();
    let dwn = router
        .send_dwn_request(dwn_request("memory://node/dwn"))
        .await
        .unwrap();

    assert_eq!(did.data.as_deref(), Some("did:example:alice"));
    assert_eq!(dwn.other["target"], "did:example:alice");
}

#[tokio::test]
async fn test_router_can_be_registered_in_another_router() {
    let memory = RecordingTransport::new("memory", &["memory:"]);
    let inner = Web5RpcClient::with_http_service(
        FakeHttpService::unreachable(),
        vec![memory.clone() as Arc<dyn Web5Rpc>],
    );

    let outer = Web5RpcClient::with_http_service(
        FakeHttpService::unreachable(),
        vec![Arc::new(inner) as Arc<dyn Web5Rpc>],
    );

    let response = outer
        .send_did_request(did_request("memory://node/did"))
        .await
        .unwrap();

    assert_eq!(response.status.message, "memory");
    assert_eq!(memory.calls(), 1);
}

#[tokio::test]
async fn test_end_to_end_did_resolve_through_default_client() {
    let http = FakeHttpService::json(
        200,
        json!({ "jsonrpc": "2.0", "id": "1", "result": { "ok": true, "status": { "code": 200, "message": "OK" } } }),
    );
    let router = Web5RpcClient::with_http_service(http.clone(), vec![]);

    let response = router
        .send_did_request(did_request("https://example.test/did"))
        .await
        .unwrap();

    assert_eq!(
        response,
        DidRpcResponse {
            ok: true,
            status: RpcStatus {
                code: 200,
                message: "OK".to_string()
            },
            data: None,
        }
    );
    assert_eq!(http.requests()[0].uri, "https://example.test/did");
}
