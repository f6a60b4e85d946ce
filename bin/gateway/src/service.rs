//! The per-request proof pipeline.

use crate::{
    config::GatewayConfig,
    envelope::{self, GatewayRequest},
    errors::GatewayError,
};
use alloy_primitives::Bytes;
use alloy_provider::{Provider, ReqwestProvider};
use alloy_rpc_client::RpcClient;
use alloy_transport_http::Http;
use anyhow::Result;
use reqwest::{Client, Url};
use spyglass_oracle::{AlloyCheckpointReader, FinalityResolver};
use spyglass_proof::{AlloyProofFetcher, ProofAssembler};
use std::time::Duration;
use tracing::{debug, info};

/// Executes gateway requests against fixed upstream endpoints.
///
/// Stateless across requests: the L1 head and the oracle are re-read for
/// every request, so no served finality can go stale. The provable block is
/// fixed once per request, before any storage fetch, and never changes
/// mid-flight.
#[derive(Debug, Clone)]
pub(crate) struct ProofService {
    /// L1 provider, used only for the current head number.
    l1: ReqwestProvider,
    /// Finality resolution against the output oracle.
    resolver: FinalityResolver<AlloyCheckpointReader>,
    /// Proof assembly against the L2 node.
    assembler: ProofAssembler<AlloyProofFetcher>,
    /// End-to-end deadline for one request.
    request_timeout: Duration,
}

impl ProofService {
    /// Constructs all components from validated configuration.
    pub(crate) fn new(cfg: &GatewayConfig) -> Result<Self> {
        let l1 = http_provider(cfg.l1_rpc_url.clone(), cfg.rpc_timeout)?;
        let l2 = http_provider(cfg.l2_rpc_url.clone(), cfg.rpc_timeout)?;

        let reader = AlloyCheckpointReader::new(l1.clone(), cfg.oracle_address, cfg.max_retries);
        let resolver = FinalityResolver::new(reader, cfg.delay);
        let fetcher = AlloyProofFetcher::new(l2, cfg.max_retries);
        let assembler = ProofAssembler::new(fetcher, cfg.max_concurrent_reads);

        info!(
            target: "gateway",
            l1 = %cfg.l1_rpc_url,
            l2 = %cfg.l2_rpc_url,
            "upstream providers initialized"
        );
        Ok(Self { l1, resolver, assembler, request_timeout: cfg.request_timeout })
    }

    /// Runs one decoded request to a callback payload under the end-to-end
    /// deadline.
    pub(crate) async fn execute(&self, request: GatewayRequest) -> Result<Bytes, GatewayError> {
        match tokio::time::timeout(self.request_timeout, self.run(request)).await {
            Ok(result) => result,
            Err(_) => Err(GatewayError::Deadline(self.request_timeout)),
        }
    }

    async fn run(&self, request: GatewayRequest) -> Result<Bytes, GatewayError> {
        let l1_head = self
            .l1
            .get_block_number()
            .await
            .map_err(|e| GatewayError::L1Transport(e.to_string()))?;
        let block = self.resolver.resolve_provable_block(l1_head).await?;

        match request {
            GatewayRequest::GetStorageSlots { target, commands, constants } => {
                debug!(
                    target: "gateway",
                    block = block.number,
                    checkpoint = block.checkpoint_index,
                    %target,
                    commands = commands.len(),
                    "assembling proof"
                );
                let proof =
                    self.assembler.assemble(block.number, target, &commands, &constants).await?;
                Ok(envelope::encode_witness(block.number, &proof))
            }
        }
    }
}

/// Builds a provider whose underlying HTTP client enforces the per-RPC
/// timeout.
fn http_provider(url: Url, timeout: Duration) -> Result<ReqwestProvider> {
    let client = Client::builder().timeout(timeout).build()?;
    let http = Http::with_client(client, url);
    Ok(ReqwestProvider::new(RpcClient::new(http, false)))
}
