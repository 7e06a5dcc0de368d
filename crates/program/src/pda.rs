//! PDA (Program Derived Address) derivation.
//!
//! Mirrors the runtime's `create_program_address` / `find_program_address`
//! so the client derives the same campaign address the program checks.

use campaign_core::Pubkey;
use curve25519_dalek::edwards::CompressedEdwardsY;
use sha2::{Digest, Sha256};

use crate::error::{ProgramError, Result};

/// Maximum length of a single seed.
pub const MAX_SEED_LEN: usize = 32;

/// Maximum number of seeds, bump included.
pub const MAX_SEEDS: usize = 16;

const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";

/// Seed prefix of every campaign account.
pub const CAMPAIGN_SEED: &[u8] = b"CAMPAIGN_DEMO";

/// Whether 32 bytes decode to a point on the ed25519 curve.
pub fn is_on_curve(bytes: &[u8; 32]) -> bool {
    CompressedEdwardsY(*bytes).decompress().is_some()
}

/// Hash seeds into an address, failing if the result is on the curve.
pub fn create_program_address(seeds: &[&[u8]], program_id: &Pubkey) -> Result<Pubkey> {
    if seeds.len() > MAX_SEEDS {
        return Err(ProgramError::TooManySeeds);
    }
    if seeds.iter().any(|s| s.len() > MAX_SEED_LEN) {
        return Err(ProgramError::MaxSeedLengthExceeded);
    }

    let mut hasher = Sha256::new();
    for seed in seeds {
        hasher.update(seed);
    }
    hasher.update(program_id.as_bytes());
    hasher.update(PDA_MARKER);
    let mut out = [0u8; 32];
    out.copy_from_slice(&hasher.finalize());

    if is_on_curve(&out) {
        return Err(ProgramError::InvalidSeeds);
    }
    Ok(Pubkey::new(out))
}

/// Search bumps from 255 down and return the first off-curve address.
pub fn find_program_address(seeds: &[&[u8]], program_id: &Pubkey) -> Result<(Pubkey, u8)> {
    if seeds.len() >= MAX_SEEDS {
        return Err(ProgramError::TooManySeeds);
    }
    for bump in (0..=u8::MAX).rev() {
        let bump_seed = [bump];
        let mut with_bump: Vec<&[u8]> = seeds.to_vec();
        with_bump.push(&bump_seed);
        match create_program_address(&with_bump, program_id) {
            Ok(address) => return Ok((address, bump)),
            Err(ProgramError::InvalidSeeds) => {}
            Err(e) => return Err(e),
        }
    }
    Err(ProgramError::NoViableBump)
}

/// Campaign account of `creator`: seeds `["CAMPAIGN_DEMO", creator]`.
pub fn campaign_address(program_id: &Pubkey, creator: &Pubkey) -> Result<(Pubkey, u8)> {
    find_program_address(&[CAMPAIGN_SEED, creator.as_ref()], program_id)
}
