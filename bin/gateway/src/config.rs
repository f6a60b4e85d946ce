//! Validated gateway configuration.

use crate::cli::Cli;
use alloy_primitives::Address;
use reqwest::Url;
use std::time::Duration;
use thiserror::Error;

/// Errors produced while validating the gateway configuration.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    /// One or more required values were supplied neither by flag nor by
    /// environment variable.
    #[error("missing required configuration: {}", .0.join(", "))]
    Missing(Vec<&'static str>),
    /// A supplied value failed to parse.
    #[error("invalid {field}: {reason}")]
    Invalid {
        /// The offending field.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

/// Validated configuration, built once at startup.
#[derive(Debug, Clone)]
pub(crate) struct GatewayConfig {
    /// L1 execution RPC endpoint.
    pub(crate) l1_rpc_url: Url,
    /// L2 execution RPC endpoint (historical state required).
    pub(crate) l2_rpc_url: Url,
    /// Output oracle contract address on L1.
    pub(crate) oracle_address: Address,
    /// Safety delay in L1 blocks.
    pub(crate) delay: u64,
    /// HTTP listen address.
    pub(crate) addr: String,
    /// HTTP listen port.
    pub(crate) port: u16,
    /// Per-RPC timeout.
    pub(crate) rpc_timeout: Duration,
    /// End-to-end request deadline.
    pub(crate) request_timeout: Duration,
    /// Bound on concurrent storage reads within one request.
    pub(crate) max_concurrent_reads: usize,
    /// Retry budget for transport-level upstream failures.
    pub(crate) max_retries: usize,
}

impl GatewayConfig {
    /// Validates the CLI arguments into a complete configuration.
    ///
    /// Required values are checked together so an operator sees every
    /// missing field in one pass rather than one failure at a time.
    pub(crate) fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        let mut missing = Vec::new();
        if cli.l1_rpc_url.is_none() {
            missing.push("--l1-rpc-url / L1_RPC_URL");
        }
        if cli.l2_rpc_url.is_none() {
            missing.push("--l2-rpc-url / L2_RPC_URL");
        }
        if cli.oracle_address.is_none() {
            missing.push("--oracle-address / ORACLE_ADDRESS");
        }
        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        let l1_rpc_url = parse_url("l1-rpc-url", cli.l1_rpc_url.as_deref().unwrap_or_default())?;
        let l2_rpc_url = parse_url("l2-rpc-url", cli.l2_rpc_url.as_deref().unwrap_or_default())?;
        let oracle_address = cli
            .oracle_address
            .as_deref()
            .unwrap_or_default()
            .parse::<Address>()
            .map_err(|e| ConfigError::Invalid { field: "oracle-address", reason: e.to_string() })?;

        Ok(Self {
            l1_rpc_url,
            l2_rpc_url,
            oracle_address,
            delay: cli.delay,
            addr: cli.addr,
            port: cli.port,
            rpc_timeout: Duration::from_secs(cli.rpc_timeout_secs),
            request_timeout: Duration::from_secs(cli.request_timeout_secs),
            max_concurrent_reads: cli.max_concurrent_reads,
            max_retries: cli.max_retries,
        })
    }
}

fn parse_url(field: &'static str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|e| ConfigError::Invalid { field, reason: e.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from([&["spyglass"], args].concat()).unwrap()
    }

    #[test]
    fn all_missing_fields_are_reported_together() {
        let err = GatewayConfig::from_cli(cli(&[])).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("L1_RPC_URL"));
        assert!(message.contains("L2_RPC_URL"));
        assert!(message.contains("ORACLE_ADDRESS"));
    }

    #[test]
    fn valid_arguments_produce_a_config() {
        let cfg = GatewayConfig::from_cli(cli(&[
            "--l1-rpc-url",
            "http://localhost:8545",
            "--l2-rpc-url",
            "http://localhost:9545",
            "--oracle-address",
            "0xdfe97868233d1aa22e815a266982f2cf17685a27",
            "--delay",
            "12",
        ]))
        .unwrap();
        assert_eq!(cfg.delay, 12);
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.rpc_timeout, Duration::from_secs(10));
    }

    #[test]
    fn bad_oracle_address_is_rejected() {
        let err = GatewayConfig::from_cli(cli(&[
            "--l1-rpc-url",
            "http://localhost:8545",
            "--l2-rpc-url",
            "http://localhost:9545",
            "--oracle-address",
            "not-an-address",
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("oracle-address"));
    }
}
