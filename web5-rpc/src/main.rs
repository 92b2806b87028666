//! # Web5 RPC CLI Entry Point
//!
//! The main executable for the `web5-rpc` tool. This file drives the application lifecycle:
//!
//! 1. **Initialization**: Installs the log subscriber and parses arguments using [`cli::Cli`].
//! 2. **Routing**: Builds a `Web5RpcClient`, which picks the transport from the URL scheme.
//! 3. **Execution**: Sends the DID or DWN request.
//! 4. **Presentation**: Formats and prints the reply, or the error, to standard output/error.

mod cli;
mod formatter;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands, DidMethodArg};
use formatter::{FormattedString, RecordDataSummary};
use futures_util::StreamExt;
use std::{path::PathBuf, process};
use tokio::io::AsyncWriteExt;
use tracing::info;
use tracing_subscriber::EnvFilter;
use web5_rpc_core::{
    DataStream, DidRpc, DidRpcRequest, DwnRpc, DwnRpcRequest, RecordData, Web5RpcClient,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "web5_rpc=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();
    let client = Web5RpcClient::default();

    match args.command {
        Commands::Did { method, url, data } => run_did(&client, method, url, data).await,
        Commands::Dwn {
            dwn_url,
            target_did,
            message,
            data_file,
            output,
        } => run_dwn(&client, dwn_url, target_did, message, data_file, output).await,
    }
}

async fn run_did(client: &Web5RpcClient, method: DidMethodArg, url: String, data: String) {
    let request = DidRpcRequest {
        method: method.into(),
        url,
        data,
    };

    match client.send_did_request(request).await {
        Ok(response) => println!("{}", FormattedString::from(response)),
        Err(err) => {
            eprintln!("{}", FormattedString::from(err));
            process::exit(1);
        }
    }
}

async fn run_dwn(
    client: &Web5RpcClient,
    dwn_url: String,
    target_did: String,
    message: serde_json::Value,
    data_file: Option<PathBuf>,
    output: Option<PathBuf>,
) {
    let mut request = DwnRpcRequest::new(dwn_url, target_did, message);

    if let Some(path) = data_file {
        match tokio::fs::read(&path).await {
            Ok(data) => request = request.with_data(data),
            Err(err) => {
                eprintln!("{}", FormattedString::from(err));
                process::exit(1);
            }
        }
    }

    let mut reply = match client.send_dwn_request(request).await {
        Ok(reply) => reply,
        Err(err) => {
            eprintln!("{}", FormattedString::from(err));
            process::exit(1);
        }
    };

    let streamed = reply
        .record
        .as_ref()
        .and_then(|record| record.data.as_ref())
        .is_some_and(RecordData::is_stream);

    let stream = if streamed {
        reply.take_record_data().and_then(RecordData::into_stream)
    } else {
        None
    };

    println!("{}", FormattedString::from(reply));

    if let Some(stream) = stream {
        let drained = drain_record_data(stream, output.as_ref()).await;

        match drained {
            Ok(bytes) => println!(
                "{}",
                FormattedString::from(RecordDataSummary {
                    bytes,
                    path: output
                })
            ),
            Err(err) => {
                eprintln!("{}", FormattedString::from(err));
                process::exit(1);
            }
        }
    }
}

/// Reads the record data to the end, writing it to `output` when given.
async fn drain_record_data(
    mut stream: DataStream,
    output: Option<&PathBuf>,
) -> anyhow::Result<u64> {
    let mut file = match output {
        Some(path) => Some(
            tokio::fs::File::create(path)
                .await
                .with_context(|| format!("creating {}", path.display()))?,
        ),
        None => None,
    };

    let mut total = 0u64;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| anyhow::anyhow!(e))?;
        total += chunk.len() as u64;

        if let Some(file) = file.as_mut() {
            file.write_all(&chunk).await.context("writing record data")?;
        }
    }

    if let Some(mut file) = file {
        file.flush().await.context("writing record data")?;
    }

    match output {
        Some(path) => info!(bytes = total, path = %path.display(), "Record data written"),
        None => info!(bytes = total, "Record data drained without --output"),
    }

    Ok(total)
}
