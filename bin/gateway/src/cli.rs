//! This module contains all CLI-specific code for the gateway binary.

use clap::{ArgAction, Parser};

/// The gateway binary CLI application arguments.
#[derive(Debug, Clone, Parser)]
#[command(about = "CCIP-Read gateway serving storage proofs for finalized L2 state")]
pub(crate) struct Cli {
    /// Verbosity level (0-4)
    #[arg(long, short, help = "Verbosity level (0-4)", action = ArgAction::Count)]
    pub(crate) v: u8,
    /// URL of the L1 execution JSON-RPC endpoint (eth namespace).
    #[arg(long, env = "L1_RPC_URL")]
    pub(crate) l1_rpc_url: Option<String>,
    /// URL of the L2 execution JSON-RPC endpoint; must serve historical
    /// state for checkpointed blocks.
    #[arg(long, env = "L2_RPC_URL")]
    pub(crate) l2_rpc_url: Option<String>,
    /// Address of the output oracle contract on L1.
    #[arg(long, env = "ORACLE_ADDRESS")]
    pub(crate) oracle_address: Option<String>,
    /// Safety delay in L1 blocks between checkpoint submission and serving
    /// proofs against it.
    #[arg(long, env = "DELAY", default_value_t = 5)]
    pub(crate) delay: u64,
    /// Listen address for the HTTP server.
    #[arg(long, default_value = "0.0.0.0")]
    pub(crate) addr: String,
    /// Listen port for the HTTP server.
    #[arg(long, default_value_t = 8080)]
    pub(crate) port: u16,
    /// Timeout for each upstream RPC call, in seconds.
    #[arg(long, default_value_t = 10)]
    pub(crate) rpc_timeout_secs: u64,
    /// End-to-end deadline for one gateway request, in seconds.
    #[arg(long, default_value_t = 30)]
    pub(crate) request_timeout_secs: u64,
    /// Bound on concurrent storage reads within one request.
    #[arg(long, default_value_t = 8)]
    pub(crate) max_concurrent_reads: usize,
    /// Retry budget for transport-level upstream failures.
    #[arg(long, default_value_t = 3)]
    pub(crate) max_retries: usize,
}
