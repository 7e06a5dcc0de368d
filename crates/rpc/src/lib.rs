//! Campaign RPC
//!
//! Solana JSON-RPC 2.0 over HTTP. [`Cluster`] is the seam the rest of the
//! client talks through; [`RpcClient`] is the network implementation and
//! [`confirm_transaction`] polls a submitted signature to the requested
//! commitment.

pub mod client;
pub mod cluster;
pub mod confirm;
pub mod protocol;

pub use client::RpcClient;
pub use cluster::{AccountData, Cluster, ClusterError, RecentBlockhash, Result, SignatureStatus};
pub use confirm::confirm_transaction;
pub use protocol::{RpcError, RpcRequest, RpcResponse};
