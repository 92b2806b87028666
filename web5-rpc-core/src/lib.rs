//! # Web5 RPC Core
//!
//! `web5-rpc-core` is the library powering the `web5-rpc` CLI. It sends decentralized
//! identifier (DID) and decentralized web node (DWN) requests over JSON-RPC, picking the
//! transport for each request from the scheme of its target URL.
//!
//! ## Key Components
//!
//! * **[`Web5RpcClient`]:** The main entry point. It owns a registry of transport clients keyed
//!   by URL scheme (`"http:"`, `"https:"`, ...) and forwards every request to the client
//!   registered for the scheme of its URL.
//! * **[`DidRpcRequest`] & [`DwnRpcRequest`]:** The two request kinds, with their
//!   [`DidRpcResponse`] and [`DwnRpcResponse`] counterparts.
//! * **[`transport`]:** The capability traits ([`DidRpc`], [`DwnRpc`], [`Web5Rpc`]) a transport
//!   client implements to be registered in the router.
//!
//! ## HTTP transport
//!
//! The router always registers an [`HttpWeb5RpcClient`] for `http:` and `https:`. Callers
//! can replace it by registering their own client for those schemes.
//!
//! DWN requests carry their JSON-RPC envelope in the `dwn-request` header so the HTTP body
//! is free to carry raw record data. Replies come back either as a JSON body, or as a
//! `dwn-response` header with the body streaming the record data, which is attached to the
//! reply at `record.data` without being buffered.
//!
//! The network itself sits behind the [`HttpService`] trait. It is implemented for
//! `reqwest::Client`, and any other implementation can be injected, which is how the tests
//! run without a network stack.
//!
//! ## Re-exports
//!
//! This crate re-exports `bytes`, `http` and `reqwest` so consumers use compatible versions
//! when implementing [`HttpService`].
pub mod client;
pub mod error;
pub mod http_transport;
pub mod json_rpc;
pub mod transport;

pub use client::{
    DidRpcMethod, DidRpcRequest, DidRpcResponse, DwnRecord, DwnReplyStatus, DwnRpcRequest,
    DwnRpcResponse, RecordData, RpcStatus, Web5RpcClient,
};
pub use error::RpcClientError;
pub use http_transport::{
    client::{HttpDwnRpcClient, HttpWeb5RpcClient},
    service::{DataStream, HttpService},
};
pub use transport::{DidRpc, DwnRpc, RpcTransport, Web5Rpc};

// Re-exports
pub use bytes;
pub use http;
pub use reqwest;

/// Type alias for the standard boxed error used in generic bounds.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;
