//! # croc-ops - CrocSwap deployment and governance tooling
//!
//! Drives the multi-step rollout of the CrocSwap dex (CREATE2 dispatcher,
//! proxy callpaths, policy and timelocks) and produces the multisig/timelock
//! instructions used to administer it afterwards.

pub mod cli;
pub mod codec;
pub mod config;
pub mod constants;
pub mod contracts;
pub mod deploy;
pub mod errors;
pub mod output;
pub mod registry;
pub mod resolution;
pub mod rpc;
pub mod status;
pub mod timelock;
