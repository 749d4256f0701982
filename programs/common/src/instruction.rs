//! Instruction payload parsing
//!
//! Sequential little-endian reader over the instruction data that follows
//! the one-byte discriminator. Every read is bounds-checked and fails with
//! `InvalidInstruction` on truncated input.

use crate::error::GvTokenError;
use pinocchio::pubkey::Pubkey;

/// Cursor over instruction data
pub struct Payload<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Payload<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], GvTokenError> {
        let end = self
            .pos
            .checked_add(n)
            .ok_or(GvTokenError::InvalidInstruction)?;
        if end > self.data.len() {
            return Err(GvTokenError::InvalidInstruction);
        }
        let out = &self.data[self.pos..end];
        self.pos = end;
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, GvTokenError> {
        Ok(self.take(1)?[0])
    }

    pub fn read_bool(&mut self) -> Result<bool, GvTokenError> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(GvTokenError::InvalidInstruction),
        }
    }

    pub fn read_u32(&mut self) -> Result<u32, GvTokenError> {
        let mut buf = [0u8; 4];
        buf.copy_from_slice(self.take(4)?);
        Ok(u32::from_le_bytes(buf))
    }

    pub fn read_u64(&mut self) -> Result<u64, GvTokenError> {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(self.take(8)?);
        Ok(u64::from_le_bytes(buf))
    }

    pub fn read_u128(&mut self) -> Result<u128, GvTokenError> {
        let mut buf = [0u8; 16];
        buf.copy_from_slice(self.take(16)?);
        Ok(u128::from_le_bytes(buf))
    }

    pub fn read_pubkey(&mut self) -> Result<Pubkey, GvTokenError> {
        let mut buf = [0u8; 32];
        buf.copy_from_slice(self.take(32)?);
        Ok(Pubkey::from(buf))
    }

    pub fn read_hash(&mut self) -> Result<[u8; 32], GvTokenError> {
        let mut buf = [0u8; 32];
        buf.copy_from_slice(self.take(32)?);
        Ok(buf)
    }

    /// Bytes left unread
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }
}
