//! # Transport Capabilities
//!
//! A transport client is anything able to carry DID and/or DWN requests over some transport
//! (HTTP, in-memory, ...). It declares the URL schemes it serves through [`RpcTransport`], and
//! provides one or both request groups:
//!
//! * [`DidRpc`]: DID requests (`did.create`, `did.resolve`).
//! * [`DwnRpc`]: DWN requests (`dwn.processMessage`).
//!
//! [`Web5Rpc`] is the union of both and is what the [`Web5RpcClient`](crate::Web5RpcClient)
//! registry holds. It is implemented automatically for every type providing both groups.
use crate::{
    client::{DidRpcRequest, DidRpcResponse, DwnRpcRequest, DwnRpcResponse},
    error::RpcClientError,
};
use async_trait::async_trait;

/// The URL schemes a transport client serves, e.g. `["http:", "https:"]`.
///
/// Schemes are written with their trailing colon.
pub trait RpcTransport: Send + Sync {
    fn transport_protocols(&self) -> Vec<String>;
}

/// Sends DID requests.
#[async_trait]
pub trait DidRpc: RpcTransport {
    async fn send_did_request(
        &self,
        request: DidRpcRequest,
    ) -> Result<DidRpcResponse, RpcClientError>;
}

/// Sends DWN requests to a DWN server.
#[async_trait]
pub trait DwnRpc: RpcTransport {
    async fn send_dwn_request(
        &self,
        request: DwnRpcRequest,
    ) -> Result<DwnRpcResponse, RpcClientError>;
}

/// A transport client able to send both DID and DWN requests.
pub trait Web5Rpc: DidRpc + DwnRpc {}

impl<T> Web5Rpc for T where T: DidRpc + DwnRpc {}
