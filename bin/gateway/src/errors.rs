//! Request-failure classification at the protocol boundary.
//!
//! Internal components return typed failures; this module is the single
//! place where they are mapped onto the HTTP statuses the CCIP-Read client
//! understands: 4xx means the request itself can never succeed, 5xx means
//! the client may retry (possibly against another gateway URL from the
//! contract's configured list).

use crate::envelope::EnvelopeError;
use actix_web::http::StatusCode;
use spyglass_oracle::{FinalityError, OracleError};
use spyglass_proof::ProofError;
use std::time::Duration;

/// Every failure a gateway request can surface.
#[derive(Debug, thiserror::Error)]
pub(crate) enum GatewayError {
    /// The off-chain lookup request did not decode.
    #[error(transparent)]
    Envelope(#[from] EnvelopeError),
    /// Finality resolution failed.
    #[error(transparent)]
    Finality(#[from] FinalityError),
    /// Proof assembly failed.
    #[error(transparent)]
    Proof(#[from] ProofError),
    /// Reading the current L1 head failed.
    #[error("transport failure talking to the L1 node: {0}")]
    L1Transport(String),
    /// The end-to-end request deadline elapsed.
    #[error("request deadline of {0:?} elapsed")]
    Deadline(Duration),
}

impl GatewayError {
    /// The HTTP status representing this failure.
    pub(crate) fn status(&self) -> StatusCode {
        match self {
            Self::Envelope(_) | Self::Proof(ProofError::Command(_)) => StatusCode::BAD_REQUEST,
            Self::Proof(ProofError::Transport(_)) | Self::L1Transport(_) => {
                StatusCode::BAD_GATEWAY
            }
            Self::Proof(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Finality(FinalityError::NotYetFinalized { .. }) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::Finality(FinalityError::Oracle(OracleError::Transport(_))) => {
                StatusCode::BAD_GATEWAY
            }
            Self::Finality(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Deadline(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}
