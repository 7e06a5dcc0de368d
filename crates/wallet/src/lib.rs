//! Campaign Wallet
//!
//! The wallet is the only holder of signing authority. Everything else sees
//! it through [`WalletAdapter`]: connect, report a public key, sign a message.
//! [`WalletProvider`] is what startup detection found, and [`WalletSession`]
//! is the connected address the view renders from.

pub mod adapter;
pub mod keypair;
pub mod provider;
pub mod session;

pub use adapter::{ConnectOptions, WalletAdapter, WalletError};
pub use keypair::KeypairWallet;
pub use provider::WalletProvider;
pub use session::WalletSession;
