//! Campaign Crypto
//!
//! ed25519 keypairs used to sign transactions. No dependency on any
//! program-specific types.

pub mod keys;
pub mod sign;

pub use keys::{KeyError, SigningKeypair};
pub use sign::{sign_data, verify_signature};
