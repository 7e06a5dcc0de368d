//! Legacy transaction wire format.
//!
//! ```text
//! transaction = compact_u16(n) || signature[64] * n || message
//! message     = header[3] || compact_u16(k) || key[32] * k
//!               || recent_blockhash[32] || compact_u16(i) || instruction * i
//! instruction = program_index u8 || compact_u16(a) || index u8 * a
//!               || compact_u16(d) || data[d]
//! ```
//!
//! Account keys are ordered writable signers, read-only signers, writable
//! non-signers, read-only non-signers, with the fee payer first.

use campaign_core::Pubkey;

use crate::error::{ProgramError, Result};
use crate::instruction::Instruction;

/// Largest serialized transaction a node accepts.
pub const PACKET_DATA_SIZE: usize = 1232;

/// Encode a length as Solana's compact-u16 (1-3 bytes, 7 bits per byte).
pub fn encode_compact_u16(mut value: u16, out: &mut Vec<u8>) {
    loop {
        let mut byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return;
        }
        byte |= 0x80;
        out.push(byte);
    }
}

/// Encode a collection length, rejecting lengths compact-u16 cannot hold.
fn encode_len(len: usize, what: &str, out: &mut Vec<u8>) -> Result<()> {
    let value = u16::try_from(len).map_err(|_| {
        ProgramError::MalformedTransaction(format!("{what} length {len} exceeds {}", u16::MAX))
    })?;
    encode_compact_u16(value, out);
    Ok(())
}

/// Decode a compact-u16, returning the value and bytes consumed.
pub fn decode_compact_u16(bytes: &[u8]) -> Result<(u16, usize)> {
    let mut value: u32 = 0;
    for (i, byte) in bytes.iter().take(3).enumerate() {
        value |= ((byte & 0x7f) as u32) << (7 * i);
        if byte & 0x80 == 0 {
            return u16::try_from(value)
                .map(|v| (v, i + 1))
                .map_err(|_| ProgramError::MalformedTransaction("compact-u16 overflow".into()));
        }
    }
    Err(ProgramError::MalformedTransaction(
        "truncated compact-u16".into(),
    ))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MessageHeader {
    pub num_required_signatures: u8,
    pub num_readonly_signed_accounts: u8,
    pub num_readonly_unsigned_accounts: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledInstruction {
    pub program_id_index: u8,
    pub accounts: Vec<u8>,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub header: MessageHeader,
    pub account_keys: Vec<Pubkey>,
    pub recent_blockhash: [u8; 32],
    pub instructions: Vec<CompiledInstruction>,
}

#[derive(Clone, Copy)]
struct KeyFlags {
    key: Pubkey,
    signer: bool,
    writable: bool,
}

impl Message {
    /// Compile instructions into a message paid for by `payer`.
    pub fn compile(payer: &Pubkey, instructions: &[Instruction], recent_blockhash: [u8; 32]) -> Result<Self> {
        let mut keys: Vec<KeyFlags> = vec![KeyFlags {
            key: *payer,
            signer: true,
            writable: true,
        }];
        let mut upsert = |key: Pubkey, signer: bool, writable: bool| {
            match keys.iter_mut().find(|k| k.key == key) {
                Some(existing) => {
                    existing.signer |= signer;
                    existing.writable |= writable;
                }
                None => keys.push(KeyFlags { key, signer, writable }),
            }
        };
        for ix in instructions {
            for meta in &ix.accounts {
                upsert(meta.pubkey, meta.is_signer, meta.is_writable);
            }
            upsert(ix.program_id, false, false);
        }

        // Stable partition keeps the payer first and insertion order within groups.
        let rank = |k: &KeyFlags| match (k.signer, k.writable) {
            (true, true) => 0,
            (true, false) => 1,
            (false, true) => 2,
            (false, false) => 3,
        };
        keys.sort_by_key(rank);

        if keys.len() > u8::MAX as usize {
            return Err(ProgramError::MalformedTransaction(format!(
                "{} account keys exceed the per-message limit",
                keys.len()
            )));
        }
        let count = |signer: bool, writable: bool| {
            keys.iter()
                .filter(|k| k.signer == signer && k.writable == writable)
                .count() as u8
        };
        let header = MessageHeader {
            num_required_signatures: count(true, true) + count(true, false),
            num_readonly_signed_accounts: count(true, false),
            num_readonly_unsigned_accounts: count(false, false),
        };

        let account_keys: Vec<Pubkey> = keys.iter().map(|k| k.key).collect();
        let index_of = |key: &Pubkey| {
            account_keys
                .iter()
                .position(|k| k == key)
                .map(|i| i as u8)
                .ok_or_else(|| ProgramError::MalformedTransaction(format!("key {key} not compiled")))
        };
        let compiled = instructions
            .iter()
            .map(|ix| {
                Ok(CompiledInstruction {
                    program_id_index: index_of(&ix.program_id)?,
                    accounts: ix
                        .accounts
                        .iter()
                        .map(|m| index_of(&m.pubkey))
                        .collect::<Result<Vec<_>>>()?,
                    data: ix.data.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let message = Self {
            header,
            account_keys,
            recent_blockhash,
            instructions: compiled,
        };
        let size = message.transaction_size()?;
        if size > PACKET_DATA_SIZE {
            return Err(ProgramError::MalformedTransaction(format!(
                "transaction would be {size} bytes, limit is {PACKET_DATA_SIZE}"
            )));
        }
        Ok(message)
    }

    /// Keys that must sign, in signature order.
    pub fn signer_keys(&self) -> &[Pubkey] {
        &self.account_keys[..self.header.num_required_signatures as usize]
    }

    pub fn is_writable(&self, index: usize) -> bool {
        let h = &self.header;
        let signers = h.num_required_signatures as usize;
        if index < signers {
            index < signers - h.num_readonly_signed_accounts as usize
        } else {
            index < self.account_keys.len() - h.num_readonly_unsigned_accounts as usize
        }
    }

    /// Resolve a compiled instruction back to its program id, accounts and data.
    pub fn decompile(&self, index: usize) -> Option<Instruction> {
        let ix = self.instructions.get(index)?;
        let signers = self.header.num_required_signatures as usize;
        let accounts = ix
            .accounts
            .iter()
            .map(|&i| {
                let i = i as usize;
                Some(crate::instruction::AccountMeta {
                    pubkey: *self.account_keys.get(i)?,
                    is_signer: i < signers,
                    is_writable: self.is_writable(i),
                })
            })
            .collect::<Option<Vec<_>>>()?;
        Some(Instruction {
            program_id: *self.account_keys.get(ix.program_id_index as usize)?,
            accounts,
            data: ix.data.clone(),
        })
    }

    pub fn serialize(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(3 + 1 + 32 * self.account_keys.len() + 32 + 64);
        out.push(self.header.num_required_signatures);
        out.push(self.header.num_readonly_signed_accounts);
        out.push(self.header.num_readonly_unsigned_accounts);

        encode_len(self.account_keys.len(), "account key", &mut out)?;
        for key in &self.account_keys {
            out.extend_from_slice(key.as_bytes());
        }
        out.extend_from_slice(&self.recent_blockhash);

        encode_len(self.instructions.len(), "instruction", &mut out)?;
        for ix in &self.instructions {
            out.push(ix.program_id_index);
            encode_len(ix.accounts.len(), "instruction account", &mut out)?;
            out.extend_from_slice(&ix.accounts);
            encode_len(ix.data.len(), "instruction data", &mut out)?;
            out.extend_from_slice(&ix.data);
        }
        Ok(out)
    }

    /// Size of the signed transaction carrying this message.
    pub fn transaction_size(&self) -> Result<usize> {
        let signatures = self.header.num_required_signatures as usize;
        let mut prefix = Vec::new();
        encode_len(signatures, "signature", &mut prefix)?;
        Ok(prefix.len() + 64 * signatures + self.serialize()?.len())
    }

    /// Parse a serialized message, returning it and the bytes consumed.
    pub fn deserialize(bytes: &[u8]) -> Result<(Self, usize)> {
        let mut reader = Reader { bytes, pos: 0 };
        let header = MessageHeader {
            num_required_signatures: reader.byte()?,
            num_readonly_signed_accounts: reader.byte()?,
            num_readonly_unsigned_accounts: reader.byte()?,
        };

        let key_count = reader.compact()?;
        let account_keys = (0..key_count)
            .map(|_| reader.array::<32>().map(Pubkey::new))
            .collect::<Result<Vec<_>>>()?;
        let recent_blockhash = reader.array::<32>()?;

        let ix_count = reader.compact()?;
        let instructions = (0..ix_count)
            .map(|_| {
                let program_id_index = reader.byte()?;
                let n = reader.compact()?;
                let accounts = reader.take(n)?.to_vec();
                let d = reader.compact()?;
                let data = reader.take(d)?.to_vec();
                Ok(CompiledInstruction {
                    program_id_index,
                    accounts,
                    data,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let message = Self {
            header,
            account_keys,
            recent_blockhash,
            instructions,
        };
        Ok((message, reader.pos))
    }
}

/// A message plus one signature per required signer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub signatures: Vec<[u8; 64]>,
    pub message: Message,
}

impl Transaction {
    /// Zero-filled signatures, one per required signer.
    pub fn new_unsigned(message: Message) -> Self {
        let n = message.header.num_required_signatures as usize;
        Self {
            signatures: vec![[0u8; 64]; n],
            message,
        }
    }

    /// Place `signature` in the slot of `signer`.
    pub fn add_signature(&mut self, signer: &Pubkey, signature: [u8; 64]) -> Result<()> {
        let slot = self
            .message
            .signer_keys()
            .iter()
            .position(|k| k == signer)
            .ok_or(ProgramError::UnknownSigner(*signer))?;
        self.signatures[slot] = signature;
        Ok(())
    }

    pub fn is_fully_signed(&self) -> bool {
        self.signatures.iter().all(|s| s.iter().any(|&b| b != 0))
    }

    /// Transaction id: base58 of the first signature.
    pub fn signature(&self) -> Option<String> {
        self.signatures
            .first()
            .map(|s| bs58::encode(s).into_string())
    }

    /// Wire bytes. Fails if the result would not fit in one packet.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        encode_len(self.signatures.len(), "signature", &mut out)?;
        for sig in &self.signatures {
            out.extend_from_slice(sig);
        }
        out.extend_from_slice(&self.message.serialize()?);
        if out.len() > PACKET_DATA_SIZE {
            return Err(ProgramError::MalformedTransaction(format!(
                "transaction is {} bytes, limit is {PACKET_DATA_SIZE}",
                out.len()
            )));
        }
        Ok(out)
    }

    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        let mut reader = Reader { bytes, pos: 0 };
        let n = reader.compact()?;
        let signatures = (0..n)
            .map(|_| reader.array::<64>())
            .collect::<Result<Vec<_>>>()?;
        let (message, used) = Message::deserialize(&bytes[reader.pos..])?;
        if reader.pos + used != bytes.len() {
            return Err(ProgramError::MalformedTransaction("trailing bytes".into()));
        }
        Ok(Self {
            signatures,
            message,
        })
    }
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.bytes.len())
            .ok_or_else(|| ProgramError::MalformedTransaction(format!("need {n} bytes at offset {}", self.pos)))?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn byte(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn compact(&mut self) -> Result<usize> {
        let (value, used) = decode_compact_u16(&self.bytes[self.pos..])?;
        self.pos += used;
        Ok(value as usize)
    }
}
