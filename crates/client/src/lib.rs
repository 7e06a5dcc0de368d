//! Campaign Client
//!
//! Binds the crowdfunding program interface to a cluster connection and the
//! wallet's signing capability ([`ProgramHandle`]), and exposes the four
//! campaign actions on top of it ([`CampaignClient`]).
//!
//! A handle is built fresh for every action through a [`Connector`]; nothing
//! about the connection is cached between actions.

pub mod actions;
pub mod connector;
pub mod handle;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;

pub use actions::{CampaignClient, CreatedCampaign};
pub use connector::{Connector, HttpConnector};
pub use handle::{get_program_handle, ProgramHandle};

use campaign_program::ProgramError;
use campaign_rpc::ClusterError;
use campaign_wallet::WalletError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("wallet is not connected")]
    WalletNotConnected,
    #[error("wallet error: {0}")]
    Wallet(#[from] WalletError),
    #[error("program error: {0}")]
    Program(#[from] ProgramError),
    #[error("cluster error: {0}")]
    Cluster(#[from] ClusterError),
}

pub type Result<T> = std::result::Result<T, ClientError>;
