//! # CLI
//!
//! This module defines the command-line interface of `web5-rpc` using `clap`.
//!
//! It is responsible for parsing user input and validating it (e.g. ensuring the DWN message is
//! a JSON object).
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use web5_rpc_core::DidRpcMethod;

#[derive(Parser)]
#[command(name = "web5-rpc", version, about = "JSON-RPC client for DID and DWN endpoints")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Send a DID request to a DID endpoint
    ///
    /// ## Examples:
    ///
    /// ```bash
    /// web5-rpc did resolve https://dids.example.test --data did:example:alice
    /// ```
    Did {
        /// DID operation to perform
        method: DidMethodArg,
        /// Endpoint URL (e.g. https://dids.example.test)
        url: String,
        /// Request payload, passed through untouched
        #[arg(long, default_value = "")]
        data: String,
    },

    /// Send a DWN message to a Decentralized Web Node
    ///
    /// ## Examples:
    ///
    /// ```bash
    /// web5-rpc dwn http://localhost:3000 --target did:example:alice --message '{"descriptor": {}}'
    /// ```
    Dwn {
        /// DWN endpoint URL (e.g. http://localhost:3000)
        dwn_url: String,
        /// DID of the tenant the message is addressed to
        #[arg(long = "target")]
        target_did: String,
        /// DWN message (JSON object)
        #[arg(long, value_parser = parse_message)]
        message: serde_json::Value,
        /// File whose contents are sent as the record data
        #[arg(long)]
        data_file: Option<PathBuf>,
        /// File streamed record data is written to
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DidMethodArg {
    Create,
    Resolve,
}

impl From<DidMethodArg> for DidRpcMethod {
    fn from(method: DidMethodArg) -> Self {
        match method {
            DidMethodArg::Create => DidRpcMethod::Create,
            DidMethodArg::Resolve => DidRpcMethod::Resolve,
        }
    }
}

fn parse_message(value: &str) -> Result<serde_json::Value, String> {
    let message: serde_json::Value =
        serde_json::from_str(value).map_err(|e| format!("Invalid JSON: {e}"))?;

    if !message.is_object() {
        return Err("The DWN message must be a JSON object".to_string());
    }

    Ok(message)
}
