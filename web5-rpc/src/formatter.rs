use colored::*;
use web5_rpc_core::{DidRpcResponse, DwnRpcResponse, RpcClientError};

/// A wrapper struct for a formatted, colored string.
///
/// Implements `Display` so it can be printed directly.
pub struct FormattedString(pub String);

/// Where streamed record data ended up, and how much of it there was.
pub struct RecordDataSummary {
    pub bytes: u64,
    pub path: Option<std::path::PathBuf>,
}

impl std::fmt::Display for FormattedString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f)?;
        writeln!(f, "{}", self.0)?;
        Ok(())
    }
}

impl From<serde_json::Value> for FormattedString {
    fn from(value: serde_json::Value) -> Self {
        FormattedString(serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string()))
    }
}

impl From<DidRpcResponse> for FormattedString {
    fn from(response: DidRpcResponse) -> Self {
        let header = if response.ok {
            format!("{} {}", "OK".green().bold(), response.status.code)
        } else {
            format!("{} {}", "Failed".red().bold(), response.status.code)
        };

        let mut out = format!("{header} {}", response.status.message);
        if let Some(data) = response.data {
            // DID payloads are usually JSON documents encoded as strings.
            let data = serde_json::from_str::<serde_json::Value>(&data)
                .map(|value| FormattedString::from(value).0)
                .unwrap_or(data);
            out.push_str("\n\n");
            out.push_str(&data);
        }
        FormattedString(out)
    }
}

impl From<DwnRpcResponse> for FormattedString {
    fn from(reply: DwnRpcResponse) -> Self {
        let status = match &reply.status {
            Some(status) if (200..300).contains(&status.code) => format!(
                "{} {}",
                status.code.to_string().green().bold(),
                status.detail
            ),
            Some(status) => format!(
                "{} {}",
                status.code.to_string().yellow().bold(),
                status.detail
            ),
            None => "no status".yellow().to_string(),
        };

        let body = serde_json::to_value(&reply)
            .map(|value| FormattedString::from(value).0)
            .unwrap_or_else(|e| format!("<unprintable reply: {e}>"));

        FormattedString(format!("{} {}\n\n{}", "DWN reply:".cyan(), status, body))
    }
}

impl From<RecordDataSummary> for FormattedString {
    fn from(summary: RecordDataSummary) -> Self {
        match summary.path {
            Some(path) => FormattedString(format!(
                "{} {} bytes written to {}",
                "Record data:".cyan(),
                summary.bytes,
                path.display()
            )),
            None => FormattedString(format!(
                "{} {} bytes streamed (use --output to keep them)",
                "Record data:".cyan(),
                summary.bytes
            )),
        }
    }
}

impl From<RpcClientError> for FormattedString {
    fn from(err: RpcClientError) -> Self {
        let title = match err.cause() {
            RpcClientError::InvalidUrl { .. } => "Invalid URL:",
            RpcClientError::NoTransportClient(_) => "Unsupported URL scheme:",
            RpcClientError::Rpc { .. } => "JSON-RPC Error:",
            RpcClientError::Http { .. } => "HTTP Error:",
            RpcClientError::Transport { .. } => "Connection Error:",
            _ => "Request Failed:",
        };

        FormattedString(format!("{}\n\n'{}'", title.red().bold(), err))
    }
}

impl From<std::io::Error> for FormattedString {
    fn from(err: std::io::Error) -> Self {
        FormattedString(format!(
            "{}\n\n'{}'",
            "Failed to access file:".red().bold(),
            err
        ))
    }
}

impl From<anyhow::Error> for FormattedString {
    fn from(err: anyhow::Error) -> Self {
        FormattedString(format!("{}\n\n'{:#}'", "Failed to read record data:".red().bold(), err))
    }
}
