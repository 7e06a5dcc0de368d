use campaign_core::Pubkey;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProgramError {
    #[error("invalid program interface: {0}")]
    InvalidInterface(String),
    #[error("instruction `{0}` is not part of the program interface")]
    UnknownInstruction(String),
    #[error("instruction `{instruction}` is missing account `{account}`")]
    MissingAccount {
        instruction: String,
        account: String,
    },
    #[error("encoding failed: {0}")]
    Encode(#[from] std::io::Error),
    #[error("account discriminator mismatch: expected {expected}, found {found}")]
    DiscriminatorMismatch { expected: String, found: String },
    #[error("account data too short: {0} bytes")]
    AccountDataTooShort(usize),
    #[error("failed to decode account data: {0}")]
    Decode(String),
    #[error("seed longer than {max} bytes", max = crate::pda::MAX_SEED_LEN)]
    MaxSeedLengthExceeded,
    #[error("more than {max} seeds", max = crate::pda::MAX_SEEDS)]
    TooManySeeds,
    #[error("derived address is on the ed25519 curve")]
    InvalidSeeds,
    #[error("no bump seed yields an off-curve address")]
    NoViableBump,
    #[error("malformed transaction: {0}")]
    MalformedTransaction(String),
    #[error("{0} is not a required signer of this message")]
    UnknownSigner(Pubkey),
}

pub type Result<T> = std::result::Result<T, ProgramError>;
