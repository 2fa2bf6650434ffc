// Wire encoding helpers for protocol structures

use crate::core::Hash256;

/// Append a variable-length integer (VarInt)
/// Bitcoin uses a compact format for integers
pub fn write_varint(buf: &mut Vec<u8>, value: u64) {
    match value {
        0..=0xfc => buf.push(value as u8),
        0xfd..=0xffff => {
            buf.push(0xfd);
            buf.extend_from_slice(&(value as u16).to_le_bytes());
        }
        0x10000..=0xffffffff => {
            buf.push(0xfe);
            buf.extend_from_slice(&(value as u32).to_le_bytes());
        }
        _ => {
            buf.push(0xff);
            buf.extend_from_slice(&value.to_le_bytes());
        }
    }
}

/// Forward-only reader over a byte slice.
///
/// Every read returns `None` once the input is exhausted; the position is
/// left untouched on a failed read.
pub struct WireReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> WireReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes consumed so far
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left to read
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn read_bytes(&mut self, len: usize) -> Option<&'a [u8]> {
        if self.remaining() < len {
            return None;
        }
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Some(slice)
    }

    pub fn read_array<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes = self.read_bytes(N)?;
        bytes.try_into().ok()
    }

    pub fn read_u8(&mut self) -> Option<u8> {
        self.read_array::<1>().map(|b| b[0])
    }

    pub fn read_u32_le(&mut self) -> Option<u32> {
        self.read_array::<4>().map(u32::from_le_bytes)
    }

    /// Read a 32-byte hash in internal byte order
    pub fn read_hash(&mut self) -> Option<Hash256> {
        self.read_array::<32>().map(Hash256::new)
    }

    /// Read a variable-length integer (VarInt)
    pub fn read_varint(&mut self) -> Option<u64> {
        let start = self.pos;
        let value = match self.read_u8()? {
            prefix @ 0..=0xfc => Some(prefix as u64),
            0xfd => self.read_array::<2>().map(|b| u16::from_le_bytes(b) as u64),
            0xfe => self.read_array::<4>().map(|b| u32::from_le_bytes(b) as u64),
            0xff => self.read_array::<8>().map(u64::from_le_bytes),
        };
        if value.is_none() {
            self.pos = start;
        }
        value
    }
}
