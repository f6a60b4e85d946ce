#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod errors;
pub use errors::{FinalityError, OracleError};

mod types;
pub use types::{Checkpoint, ProvableBlock};

mod bindings;
pub use bindings::ICheckpointOracle;

mod reader;
pub use reader::{AlloyCheckpointReader, CheckpointReader};

mod resolver;
pub use resolver::FinalityResolver;

#[cfg(test)]
mod test_utils;
