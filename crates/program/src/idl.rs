//! Program interface descriptor.
//!
//! The crowdfunding program publishes an Anchor IDL. The client embeds it and
//! resolves instruction account lists from it, the same way an Anchor client
//! maps a named `accounts` object onto the ordered list the program expects.

use std::collections::BTreeMap;

use campaign_core::Pubkey;
use serde::Deserialize;

use crate::error::{ProgramError, Result};
use crate::instruction::{AccountMeta, Instruction};

/// The crowdfunding program IDL, as deployed.
pub const CROWDFUNDING_IDL: &str = include_str!("../idl/crowdfunding.json");

#[derive(Debug, Clone, Deserialize)]
struct RawIdl {
    name: String,
    instructions: Vec<IdlInstruction>,
    #[serde(default)]
    accounts: Vec<IdlAccountDef>,
    metadata: Option<RawMetadata>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawMetadata {
    address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdlAccountItem {
    pub name: String,
    pub is_mut: bool,
    pub is_signer: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IdlField {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdlInstruction {
    pub name: String,
    pub accounts: Vec<IdlAccountItem>,
    pub args: Vec<IdlField>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdlAccountDef {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: IdlTypeDef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdlTypeDef {
    pub kind: String,
    #[serde(default)]
    pub fields: Vec<IdlField>,
}

/// Instructions the client calls, with the argument types it encodes.
const REQUIRED_INSTRUCTIONS: &[(&str, &[&str])] = &[
    ("create", &["string", "string"]),
    ("donate", &["u64"]),
    ("withdraw", &["u64"]),
];

/// Campaign fields the decoder reads, in on-chain order.
const CAMPAIGN_FIELDS: &[(&str, &str)] = &[
    ("admin", "publicKey"),
    ("name", "string"),
    ("description", "string"),
    ("amountDonated", "u64"),
];

/// A validated program interface bound to a program address.
#[derive(Debug, Clone)]
pub struct ProgramInterface {
    pub name: String,
    pub program_id: Pubkey,
    instructions: BTreeMap<String, IdlInstruction>,
    accounts: Vec<IdlAccountDef>,
}

impl ProgramInterface {
    /// The embedded crowdfunding interface.
    pub fn crowdfunding() -> Result<Self> {
        Self::from_json(CROWDFUNDING_IDL)
    }

    /// Parse and validate an IDL document.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawIdl =
            serde_json::from_str(json).map_err(|e| ProgramError::InvalidInterface(e.to_string()))?;

        let address = raw
            .metadata
            .and_then(|m| m.address)
            .ok_or_else(|| ProgramError::InvalidInterface("missing metadata.address".into()))?;
        let program_id = address
            .parse()
            .map_err(|e| ProgramError::InvalidInterface(format!("metadata.address: {e}")))?;

        let instructions = raw
            .instructions
            .into_iter()
            .map(|ix| (ix.name.clone(), ix))
            .collect();

        let interface = Self {
            name: raw.name,
            program_id,
            instructions,
            accounts: raw.accounts,
        };
        interface.validate()?;
        Ok(interface)
    }

    /// Point the interface at a different deployment of the same program.
    pub fn with_program_id(mut self, program_id: Pubkey) -> Self {
        self.program_id = program_id;
        self
    }

    pub fn instruction(&self, name: &str) -> Option<&IdlInstruction> {
        self.instructions.get(name)
    }

    pub fn account(&self, name: &str) -> Option<&IdlAccountDef> {
        self.accounts.iter().find(|a| a.name == name)
    }

    fn validate(&self) -> Result<()> {
        for (name, arg_types) in REQUIRED_INSTRUCTIONS {
            let ix = self
                .instruction(name)
                .ok_or_else(|| ProgramError::InvalidInterface(format!("missing instruction `{name}`")))?;
            let declared: Vec<&str> = ix.args.iter().filter_map(|a| a.ty.as_str()).collect();
            if declared != *arg_types {
                return Err(ProgramError::InvalidInterface(format!(
                    "instruction `{name}` takes {declared:?}, expected {arg_types:?}"
                )));
            }
        }

        let campaign = self
            .account("Campaign")
            .ok_or_else(|| ProgramError::InvalidInterface("missing account `Campaign`".into()))?;
        let fields: Vec<(&str, &str)> = campaign
            .ty
            .fields
            .iter()
            .map(|f| (f.name.as_str(), f.ty.as_str().unwrap_or_default()))
            .collect();
        if campaign.ty.kind != "struct" || fields != CAMPAIGN_FIELDS {
            return Err(ProgramError::InvalidInterface(format!(
                "account `Campaign` has layout {fields:?}"
            )));
        }
        Ok(())
    }

    /// Build an instruction by mapping named accounts onto the declared list.
    ///
    /// `data` is the already-encoded instruction data, discriminator included.
    pub fn build_instruction(
        &self,
        name: &str,
        accounts: &[(&str, Pubkey)],
        data: Vec<u8>,
    ) -> Result<Instruction> {
        let ix = self
            .instruction(name)
            .ok_or_else(|| ProgramError::UnknownInstruction(name.to_string()))?;

        let metas = ix
            .accounts
            .iter()
            .map(|item| {
                let pubkey = accounts
                    .iter()
                    .find(|(n, _)| *n == item.name)
                    .map(|(_, key)| *key)
                    .ok_or_else(|| ProgramError::MissingAccount {
                        instruction: name.to_string(),
                        account: item.name.clone(),
                    })?;
                Ok(AccountMeta {
                    pubkey,
                    is_signer: item.is_signer,
                    is_writable: item.is_mut,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Instruction {
            program_id: self.program_id,
            accounts: metas,
            data,
        })
    }
}
