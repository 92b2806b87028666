//! # HTTP Transport
//!
//! This module contains the transport clients that carry DID and DWN requests over plain
//! HTTP(S), and the [`service::HttpService`] abstraction they perform their round trips with.
//!
//! * **DWN requests** are `POST`ed with the JSON-RPC envelope in the `dwn-request` header and
//!   the optional record data as an `application/octet-stream` body.
//! * **DID requests** are `POST`ed as a regular JSON-RPC body with `application/json`.
pub mod client;
pub mod service;
