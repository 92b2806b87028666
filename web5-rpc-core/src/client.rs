//! # Web5 RPC Client
//!
//! This module implements the router that dispatches DID and DWN requests to transport
//! clients.
//!
//! The [`Web5RpcClient`] holds a registry mapping URL schemes (`"http:"`, `"https:"`, ...) to
//! [`Web5Rpc`] transport clients. The registry is built once, at construction, and never
//! changes afterwards, so a client can be shared across tasks without locking.
//!
//! ## Registration
//!
//! An [`HttpWeb5RpcClient`] is always registered first, then the caller's clients in order.
//! For every scheme a client declares, the client replaces whatever was registered for that
//! scheme before it: the last registration wins. Registering a client for `http:` or
//! `https:` therefore overrides the built-in one.
//!
//! ## Example
//!
//! ```rust,no_run
//! use web5_rpc_core::{DidRpc, DidRpcMethod, DidRpcRequest, Web5RpcClient};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Web5RpcClient::default();
//!
//! let response = client
//!     .send_did_request(DidRpcRequest {
//!         method: DidRpcMethod::Resolve,
//!         url: "https://example.test/did".to_string(),
//!         data: "did:example:alice".to_string(),
//!     })
//!     .await?;
//!
//! assert!(response.ok);
//! # Ok(())
//! # }
//! ```
mod types;

pub use types::*;

use crate::{
    error::RpcClientError,
    http_transport::{client::HttpWeb5RpcClient, service::HttpService},
    transport::{DidRpc, DwnRpc, RpcTransport, Web5Rpc},
};
use async_trait::async_trait;
use std::{collections::BTreeMap, fmt::Debug, sync::Arc};
use url::Url;

/// Routes DID and DWN requests to the transport client registered for their URL scheme.
#[derive(Clone)]
pub struct Web5RpcClient {
    transport_clients: BTreeMap<String, Arc<dyn Web5Rpc>>,
}

impl Web5RpcClient {
    /// Creates a router with the built-in HTTP client followed by `clients`.
    pub fn new(clients: Vec<Arc<dyn Web5Rpc>>) -> Self {
        Self::with_default_client(Arc::new(HttpWeb5RpcClient::new()), clients)
    }

    /// Creates a router whose built-in HTTP client performs its round trips with `service`.
    pub fn with_http_service<S>(service: S, clients: Vec<Arc<dyn Web5Rpc>>) -> Self
    where
        S: HttpService + 'static,
    {
        Self::with_default_client(Arc::new(HttpWeb5RpcClient::from_service(service)), clients)
    }

    fn with_default_client(default: Arc<dyn Web5Rpc>, clients: Vec<Arc<dyn Web5Rpc>>) -> Self {
        let mut transport_clients = BTreeMap::new();

        for client in std::iter::once(default).chain(clients) {
            for scheme in client.transport_protocols() {
                transport_clients.insert(scheme, client.clone());
            }
        }

        Self { transport_clients }
    }

    /// Returns the client registered for `scheme` (e.g. `"https:"`).
    pub fn transport_client(&self, scheme: &str) -> Option<&Arc<dyn Web5Rpc>> {
        self.transport_clients.get(scheme)
    }

    fn resolve(&self, url: &str) -> Result<&Arc<dyn Web5Rpc>, RpcClientError> {
        let url = Url::parse(url).map_err(|source| RpcClientError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;

        let scheme = format!("{}:", url.scheme());

        self.transport_clients
            .get(&scheme)
            .ok_or(RpcClientError::NoTransportClient(scheme))
    }
}

impl Default for Web5RpcClient {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Debug for Web5RpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Web5RpcClient")
            .field("transport_protocols", &self.transport_protocols())
            .finish()
    }
}

impl RpcTransport for Web5RpcClient {
    /// Every registered scheme, in sorted order.
    fn transport_protocols(&self) -> Vec<String> {
        self.transport_clients.keys().cloned().collect()
    }
}

#[async_trait]
impl DidRpc for Web5RpcClient {
    async fn send_did_request(
        &self,
        request: DidRpcRequest,
    ) -> Result<DidRpcResponse, RpcClientError> {
        let transport_client = self.resolve(&request.url)?;
        transport_client.send_did_request(request).await
    }
}

#[async_trait]
impl DwnRpc for Web5RpcClient {
    async fn send_dwn_request(
        &self,
        request: DwnRpcRequest,
    ) -> Result<DwnRpcResponse, RpcClientError> {
        let transport_client = self.resolve(&request.dwn_url)?;
        transport_client.send_dwn_request(request).await
    }
}
