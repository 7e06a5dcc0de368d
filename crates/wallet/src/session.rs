//! The connected wallet address.

use campaign_core::Pubkey;
use tracing::{info, warn};

use crate::adapter::{ConnectOptions, Result};
use crate::provider::WalletProvider;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalletSession {
    pub address: Option<Pubkey>,
}

impl WalletSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_connected(&self) -> bool {
        self.address.is_some()
    }

    /// Reconnect without prompting if the user approved this wallet before.
    ///
    /// Every failure is logged and leaves the session unset.
    pub async fn check_silent_connect(&mut self, provider: &WalletProvider) -> Option<Pubkey> {
        let adapter = match provider {
            WalletProvider::Absent => {
                warn!("No wallet found, install one to continue");
                return None;
            }
            WalletProvider::Unknown { name, .. } => {
                warn!(provider = %name, "Unsupported wallet provider");
                return None;
            }
            WalletProvider::Expected(adapter) => adapter,
        };
        info!(provider = adapter.provider_name(), "Wallet found");

        match adapter.connect(ConnectOptions::silent()).await {
            Ok(pubkey) => {
                info!(%pubkey, "Connected with public key");
                self.address = Some(pubkey);
                Some(pubkey)
            }
            Err(e) => {
                warn!(error = %e, "Silent wallet connect failed");
                None
            }
        }
    }

    /// Explicit connect through whichever wallet is installed. Without one
    /// this is a no-op.
    pub async fn connect(&mut self, provider: &WalletProvider) -> Result<Option<Pubkey>> {
        let Some(adapter) = provider.adapter() else {
            return Ok(None);
        };
        let pubkey = adapter.connect(ConnectOptions::default()).await?;
        info!(%pubkey, "Connected with public key");
        self.address = Some(pubkey);
        Ok(Some(pubkey))
    }
}
