//! The cluster seam: what the client needs from a Solana node.

use campaign_core::{Commitment, Pubkey};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClusterError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("RPC error {code}: {message}")]
    Rpc {
        code: i64,
        message: String,
        data: Option<serde_json::Value>,
    },
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Transaction {signature} failed: {err}")]
    TransactionFailed {
        signature: String,
        err: serde_json::Value,
    },
    #[error("Blockhash expired before {signature} reached {commitment}")]
    BlockhashExpired {
        signature: String,
        commitment: Commitment,
    },
}

pub type Result<T> = std::result::Result<T, ClusterError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecentBlockhash {
    pub blockhash: [u8; 32],
    pub last_valid_block_height: u64,
}

/// A decoded account as returned by `getProgramAccounts`/`getAccountInfo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountData {
    pub pubkey: Pubkey,
    pub lamports: u64,
    pub owner: Pubkey,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignatureStatus {
    pub slot: u64,
    pub err: Option<serde_json::Value>,
    pub confirmation_status: Option<Commitment>,
}

impl SignatureStatus {
    /// Whether the transaction is at least as deep as `commitment`.
    pub fn satisfies(&self, commitment: Commitment) -> bool {
        self.confirmation_status
            .map(|status| status >= commitment)
            .unwrap_or(false)
    }
}

/// Operations the client performs against a cluster, all at the commitment
/// the implementation was built with.
#[async_trait::async_trait]
pub trait Cluster: Send + Sync {
    fn commitment(&self) -> Commitment;

    async fn latest_blockhash(&self) -> Result<RecentBlockhash>;

    /// Submit a serialized, signed transaction. Returns its signature.
    async fn send_transaction(&self, transaction: &[u8]) -> Result<String>;

    async fn signature_status(&self, signature: &str) -> Result<Option<SignatureStatus>>;

    async fn block_height(&self) -> Result<u64>;

    /// Every account owned by `program_id`, in the order the node returns them.
    async fn program_accounts(&self, program_id: &Pubkey) -> Result<Vec<AccountData>>;

    async fn account(&self, address: &Pubkey) -> Result<Option<AccountData>>;
}
