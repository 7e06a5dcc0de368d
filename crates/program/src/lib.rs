//! Campaign Program
//!
//! Client-side binding for the crowdfunding Solana program: the interface
//! descriptor, PDA derivation, instruction builders, campaign account
//! decoding and the legacy transaction wire format.
//!
//! This crate does NOT contain the on-chain program itself. It only builds
//! the bytes the program expects and decodes the bytes it stores.

pub mod accounts;
pub mod amount;
pub mod error;
pub mod idl;
pub mod instruction;
pub mod message;
pub mod pda;

pub use accounts::Campaign;
pub use amount::DONATION_LAMPORTS;
pub use error::{ProgramError, Result};
pub use idl::ProgramInterface;
pub use instruction::{AccountMeta, Instruction, SYSTEM_PROGRAM_ID};
pub use message::{Message, Transaction};
pub use pda::{campaign_address, find_program_address, CAMPAIGN_SEED};
