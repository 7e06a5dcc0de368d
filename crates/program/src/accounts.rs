//! Campaign account decoding.
//!
//! Layout (Anchor, borsh):
//! `discriminator[8] || admin[32] || name(u32 len + utf8) ||
//! description(u32 len + utf8) || amount_donated(u64 LE)`, followed by the
//! zero padding of the fixed-size allocation.

use borsh::{BorshDeserialize, BorshSerialize};
use campaign_core::{lamports_to_sol, Pubkey};
use serde::{Deserialize, Serialize};

use crate::error::{ProgramError, Result};

/// Stored fields of a campaign account.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
struct CampaignData {
    admin: Pubkey,
    name: String,
    description: String,
    amount_donated: u64,
}

/// A campaign as read from the chain.
///
/// PDA seeds: `[b"CAMPAIGN_DEMO", admin]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    /// Account address.
    pub address: Pubkey,
    /// Creator; the only key allowed to withdraw.
    pub admin: Pubkey,
    pub name: String,
    pub description: String,
    /// Lamports donated and not yet withdrawn, as the program accounts them.
    pub amount_donated: u64,
}

impl Campaign {
    /// `sha256("account:Campaign")[..8]`.
    pub const DISCRIMINATOR: [u8; 8] = [50, 40, 49, 11, 157, 220, 229, 192];

    /// Decode raw account data. Trailing bytes are ignored.
    pub fn decode(address: Pubkey, data: &[u8]) -> Result<Self> {
        if data.len() < Self::DISCRIMINATOR.len() {
            return Err(ProgramError::AccountDataTooShort(data.len()));
        }
        let (disc, mut body) = data.split_at(Self::DISCRIMINATOR.len());
        if disc != Self::DISCRIMINATOR {
            return Err(ProgramError::DiscriminatorMismatch {
                expected: hex::encode(Self::DISCRIMINATOR),
                found: hex::encode(disc),
            });
        }

        let stored = CampaignData::deserialize(&mut body)
            .map_err(|e| ProgramError::Decode(e.to_string()))?;
        Ok(Self {
            address,
            admin: stored.admin,
            name: stored.name,
            description: stored.description,
            amount_donated: stored.amount_donated,
        })
    }

    /// Encode as account data, padded with zeros to `space` bytes.
    pub fn encode(&self, space: usize) -> Result<Vec<u8>> {
        let mut data = Self::DISCRIMINATOR.to_vec();
        CampaignData {
            admin: self.admin,
            name: self.name.clone(),
            description: self.description.clone(),
            amount_donated: self.amount_donated,
        }
        .serialize(&mut data)?;
        if data.len() < space {
            data.resize(space, 0);
        }
        Ok(data)
    }

    /// Donated balance in SOL.
    pub fn balance_sol(&self) -> f64 {
        lamports_to_sol(self.amount_donated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::sighash;

    fn sample() -> Campaign {
        Campaign {
            address: Pubkey::new([1u8; 32]),
            admin: Pubkey::new([2u8; 32]),
            name: "Well".to_string(),
            description: "Clean water".to_string(),
            amount_donated: 400_000_000,
        }
    }

    #[test]
    fn test_discriminator_matches_account_name() {
        assert_eq!(Campaign::DISCRIMINATOR, sighash("account", "Campaign"));
    }

    #[test]
    fn test_decode_ignores_padding() {
        let campaign = sample();
        let data = campaign.encode(9000).unwrap();
        assert_eq!(data.len(), 9000);
        assert_eq!(Campaign::decode(campaign.address, &data).unwrap(), campaign);
    }

    #[test]
    fn test_decode_byte_layout() {
        let mut data = Campaign::DISCRIMINATOR.to_vec();
        data.extend_from_slice(&[7u8; 32]);
        data.extend_from_slice(&[1, 0, 0, 0, b'n']);
        data.extend_from_slice(&[0, 0, 0, 0]);
        data.extend_from_slice(&42u64.to_le_bytes());

        let decoded = Campaign::decode(Pubkey::default(), &data).unwrap();
        assert_eq!(decoded.admin, Pubkey::new([7u8; 32]));
        assert_eq!(decoded.name, "n");
        assert_eq!(decoded.description, "");
        assert_eq!(decoded.amount_donated, 42);
    }

    #[test]
    fn test_wrong_discriminator_rejected() {
        let mut data = sample().encode(0).unwrap();
        data[0] ^= 1;
        assert!(matches!(
            Campaign::decode(Pubkey::default(), &data),
            Err(ProgramError::DiscriminatorMismatch { .. })
        ));
    }

    #[test]
    fn test_truncated_data_rejected() {
        assert!(matches!(
            Campaign::decode(Pubkey::default(), &[1, 2, 3]),
            Err(ProgramError::AccountDataTooShort(3))
        ));
        let data = sample().encode(0).unwrap();
        assert!(matches!(
            Campaign::decode(Pubkey::default(), &data[..20]),
            Err(ProgramError::Decode(_))
        ));
    }

    #[test]
    fn test_balance_sol() {
        assert_eq!(sample().balance_sol(), 0.4);
    }
}
