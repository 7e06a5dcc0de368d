use campaign_core::Pubkey;
use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum KeyError {
    #[error("invalid keypair length: expected 64, got {0}")]
    InvalidLength(usize),
    #[error("public key half does not match secret key")]
    PublicKeyMismatch,
}

/// ed25519 signing keypair.
pub struct SigningKeypair {
    pub(crate) signing_key: SigningKey,
}

impl SigningKeypair {
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    pub fn from_secret_bytes(secret: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(secret),
        }
    }

    /// Load the 64-byte `secret || public` layout used by Solana keypair files.
    pub fn from_keypair_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        if bytes.len() != 64 {
            return Err(KeyError::InvalidLength(bytes.len()));
        }
        let mut secret = [0u8; 32];
        secret.copy_from_slice(&bytes[..32]);
        let keypair = Self::from_secret_bytes(&secret);
        if keypair.public_key_bytes()[..] != bytes[32..] {
            return Err(KeyError::PublicKeyMismatch);
        }
        Ok(keypair)
    }

    pub fn secret_key_bytes(&self) -> [u8; 32] {
        self.signing_key.to_bytes()
    }

    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    pub fn pubkey(&self) -> Pubkey {
        Pubkey::new(self.public_key_bytes())
    }

    /// `secret || public`, the layout Solana tooling writes to disk.
    pub fn to_keypair_bytes(&self) -> [u8; 64] {
        self.signing_key.to_keypair_bytes()
    }
}

impl std::fmt::Debug for SigningKeypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKeypair")
            .field("pubkey", &self.pubkey())
            .finish_non_exhaustive()
    }
}
