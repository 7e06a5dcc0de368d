//! Wallet backed by a local keypair file.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use campaign_core::Pubkey;
use campaign_crypto::{sign_data, SigningKeypair};
use tracing::debug;

use crate::adapter::{ConnectOptions, Result, WalletAdapter, WalletError};

pub const KEYPAIR_PROVIDER: &str = "keypair";

/// Signs with an in-process keypair. Approval is remembered through a trust
/// marker next to the keypair file, so a silent connect works on the next run.
pub struct KeypairWallet {
    keypair: SigningKeypair,
    keypair_path: Option<PathBuf>,
    trusted: AtomicBool,
    connected: AtomicBool,
}

impl KeypairWallet {
    /// Wallet for a keypair on disk; trust is read from its marker.
    pub fn from_file(keypair: SigningKeypair, keypair_path: PathBuf) -> Self {
        let trusted = campaign_keystore::is_trusted(&keypair_path);
        Self {
            keypair,
            keypair_path: Some(keypair_path),
            trusted: AtomicBool::new(trusted),
            connected: AtomicBool::new(false),
        }
    }

    /// In-memory wallet with explicit initial trust.
    pub fn ephemeral(keypair: SigningKeypair, trusted: bool) -> Self {
        Self {
            keypair,
            keypair_path: None,
            trusted: AtomicBool::new(trusted),
            connected: AtomicBool::new(false),
        }
    }

    pub fn is_trusted(&self) -> bool {
        self.trusted.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl WalletAdapter for KeypairWallet {
    fn provider_name(&self) -> &str {
        KEYPAIR_PROVIDER
    }

    fn public_key(&self) -> Option<Pubkey> {
        self.connected
            .load(Ordering::SeqCst)
            .then(|| self.keypair.pubkey())
    }

    async fn connect(&self, options: ConnectOptions) -> Result<Pubkey> {
        if options.only_if_trusted && !self.is_trusted() {
            return Err(WalletError::NotTrusted);
        }
        if !self.is_trusted() {
            if let Some(path) = &self.keypair_path {
                campaign_keystore::mark_trusted(path)?;
            }
            self.trusted.store(true, Ordering::SeqCst);
        }
        self.connected.store(true, Ordering::SeqCst);
        let pubkey = self.keypair.pubkey();
        debug!(%pubkey, silent = options.only_if_trusted, "keypair wallet connected");
        Ok(pubkey)
    }

    async fn sign_message(&self, message: &[u8]) -> Result<[u8; 64]> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(WalletError::NotConnected);
        }
        Ok(sign_data(&self.keypair, message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campaign_crypto::verify_signature;

    #[tokio::test]
    async fn test_silent_connect_requires_trust() {
        let wallet = KeypairWallet::ephemeral(SigningKeypair::generate(), false);
        assert!(matches!(
            wallet.connect(ConnectOptions::silent()).await,
            Err(WalletError::NotTrusted)
        ));
        assert!(wallet.public_key().is_none());
    }

    #[tokio::test]
    async fn test_explicit_connect_grants_trust() {
        let keypair = SigningKeypair::generate();
        let expected = keypair.pubkey();
        let wallet = KeypairWallet::ephemeral(keypair, false);

        assert_eq!(wallet.connect(ConnectOptions::default()).await.unwrap(), expected);
        assert!(wallet.is_trusted());
        assert_eq!(wallet.public_key(), Some(expected));
        assert_eq!(wallet.connect(ConnectOptions::silent()).await.unwrap(), expected);
    }

    #[tokio::test]
    async fn test_sign_requires_connect() {
        let keypair = SigningKeypair::generate();
        let pubkey = keypair.public_key_bytes();
        let wallet = KeypairWallet::ephemeral(keypair, true);
        assert!(matches!(
            wallet.sign_message(b"msg").await,
            Err(WalletError::NotConnected)
        ));

        wallet.connect(ConnectOptions::silent()).await.unwrap();
        let sig = wallet.sign_message(b"msg").await.unwrap();
        assert!(verify_signature(&pubkey, b"msg", &sig));
    }

    #[tokio::test]
    async fn test_trust_persists_across_instances() {
        let dir = std::env::temp_dir().join("campaign-wallet-trust");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("id.json");
        let keypair = campaign_keystore::load_or_generate_keypair(&path).unwrap();

        let first = KeypairWallet::from_file(keypair, path.clone());
        assert!(!first.is_trusted());
        first.connect(ConnectOptions::default()).await.unwrap();

        let reloaded = campaign_keystore::load_keypair(&path).unwrap();
        let second = KeypairWallet::from_file(reloaded, path);
        assert!(second.is_trusted());
        assert!(second.connect(ConnectOptions::silent()).await.is_ok());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
