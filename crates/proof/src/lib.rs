#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod errors;
pub use errors::{CommandError, ProofError, ProofResult};

mod types;
pub use types::StateProof;

mod slots;
pub use slots::{Command, PathElement, MAX_VALUE_SLOTS};

mod fetcher;
pub use fetcher::{AlloyProofFetcher, ProofFetcher};

mod assembler;
pub use assembler::{ProofAssembler, DEFAULT_MAX_CONCURRENT_READS};

#[cfg(test)]
mod test_utils;
