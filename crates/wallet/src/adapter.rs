use campaign_core::Pubkey;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WalletError {
    #[error("connection not previously approved")]
    NotTrusted,
    #[error("wallet is not connected")]
    NotConnected,
    #[error("keystore error: {0}")]
    Keystore(#[from] campaign_keystore::KeystoreError),
}

pub type Result<T> = std::result::Result<T, WalletError>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnectOptions {
    /// Succeed only if the user approved this wallet before; never prompt.
    pub only_if_trusted: bool,
}

impl ConnectOptions {
    pub fn silent() -> Self {
        Self {
            only_if_trusted: true,
        }
    }
}

/// A wallet the client can connect to and sign with.
#[async_trait::async_trait]
pub trait WalletAdapter: Send + Sync {
    /// Identifies the wallet implementation, compared against the expected
    /// provider at startup.
    fn provider_name(&self) -> &str;

    /// Connected public key, `None` before a successful connect.
    fn public_key(&self) -> Option<Pubkey>;

    async fn connect(&self, options: ConnectOptions) -> Result<Pubkey>;

    /// Sign a serialized transaction message.
    async fn sign_message(&self, message: &[u8]) -> Result<[u8; 64]>;
}
