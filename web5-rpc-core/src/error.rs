//! # Errors
//!
//! Every operation in this crate fails with [`RpcClientError`]. Transport clients plugged into
//! the router return it too, so the router can hand their failures back unchanged.
use crate::BoxError;

/// Errors that can occur while routing or performing a DID/DWN request.
#[derive(Debug, thiserror::Error)]
pub enum RpcClientError {
    /// The target URL of the request could not be parsed.
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    /// No transport client is registered for the scheme of the target URL.
    #[error("no {0} transport client available")]
    NoTransportClient(String),
    /// The JSON-RPC response envelope could not be parsed.
    #[error("failed to parse json rpc response. url: {url}: {reason}")]
    EnvelopeParse { url: String, reason: String },
    /// The server answered with a JSON-RPC error object.
    #[error("({code}) - {message}")]
    Rpc { code: i64, message: String },
    /// The server answered with a non-success HTTP status.
    #[error("HTTP ({status}) - {status_text}")]
    Http { status: u16, status_text: String },
    /// The HTTP exchange itself failed.
    #[error("Transport failure for '{url}': {source}")]
    Transport {
        url: String,
        #[source]
        source: BoxError,
    },
    /// Wraps any failure of a DID request with the URL it was sent to.
    #[error("Error encountered while processing response from {url}: {}", did_cause(.source))]
    DidRequest {
        url: String,
        #[source]
        source: Box<RpcClientError>,
    },
}

impl RpcClientError {
    pub(crate) fn transport(url: &str, source: impl Into<BoxError>) -> Self {
        Self::Transport {
            url: url.to_string(),
            source: source.into(),
        }
    }

    pub(crate) fn envelope_parse(url: &str, reason: impl ToString) -> Self {
        Self::EnvelopeParse {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Returns the underlying error, looking through [`RpcClientError::DidRequest`] wrappers.
    pub fn cause(&self) -> &RpcClientError {
        match self {
            Self::DidRequest { source, .. } => source.cause(),
            other => other,
        }
    }
}

// JSON-RPC errors on the DID path are reported with their protocol named.
fn did_cause(source: &RpcClientError) -> String {
    match source {
        RpcClientError::Rpc { code, message } => format!("JSON RPC ({code}) - {message}"),
        other => other.to_string(),
    }
}
