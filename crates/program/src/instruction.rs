//! Instruction builders for the crowdfunding program.
//!
//! Instruction data is Anchor-encoded: `sha256("global:<name>")[..8]`
//! followed by the borsh-serialized arguments.

use borsh::{BorshDeserialize, BorshSerialize};
use campaign_core::Pubkey;
use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::idl::ProgramInterface;

/// The system program, required by instructions that create or fund accounts.
pub const SYSTEM_PROGRAM_ID: Pubkey = Pubkey::new([0u8; 32]);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountMeta {
    pub pubkey: Pubkey,
    pub is_signer: bool,
    pub is_writable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub program_id: Pubkey,
    pub accounts: Vec<AccountMeta>,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct CreateArgs {
    pub name: String,
    pub description: String,
}

/// Arguments of both `donate` and `withdraw`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct AmountArgs {
    pub amount: u64,
}

/// First 8 bytes of `sha256("<namespace>:<name>")`.
pub(crate) fn sighash(namespace: &str, name: &str) -> [u8; 8] {
    let digest = Sha256::digest(format!("{namespace}:{name}").as_bytes());
    let mut out = [0u8; 8];
    out.copy_from_slice(&digest[..8]);
    out
}

/// Discriminator of a global instruction.
pub fn instruction_discriminator(name: &str) -> [u8; 8] {
    sighash("global", name)
}

/// `discriminator ++ borsh(args)`.
pub fn encode<T: BorshSerialize>(name: &str, args: &T) -> Result<Vec<u8>> {
    let mut data = instruction_discriminator(name).to_vec();
    args.serialize(&mut data)?;
    Ok(data)
}

/// `create(name, description)` against the creator's campaign PDA.
pub fn create(
    program: &ProgramInterface,
    campaign: Pubkey,
    user: Pubkey,
    name: &str,
    description: &str,
) -> Result<Instruction> {
    let data = encode(
        "create",
        &CreateArgs {
            name: name.to_string(),
            description: description.to_string(),
        },
    )?;
    program.build_instruction(
        "create",
        &[
            ("campaign", campaign),
            ("user", user),
            ("systemProgram", SYSTEM_PROGRAM_ID),
        ],
        data,
    )
}

/// `donate(amount)` from `user` into `campaign`.
pub fn donate(
    program: &ProgramInterface,
    campaign: Pubkey,
    user: Pubkey,
    amount: u64,
) -> Result<Instruction> {
    let data = encode("donate", &AmountArgs { amount })?;
    program.build_instruction(
        "donate",
        &[
            ("campaign", campaign),
            ("user", user),
            ("systemProgram", SYSTEM_PROGRAM_ID),
        ],
        data,
    )
}

/// `withdraw(amount)` from `campaign` to its admin `user`.
pub fn withdraw(
    program: &ProgramInterface,
    campaign: Pubkey,
    user: Pubkey,
    amount: u64,
) -> Result<Instruction> {
    let data = encode("withdraw", &AmountArgs { amount })?;
    program.build_instruction("withdraw", &[("campaign", campaign), ("user", user)], data)
}
