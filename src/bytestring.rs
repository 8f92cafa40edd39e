//! Length-prefixed byte buffer used by every serializer in this crate.
//!
//! All wire framing goes through [`ByteString::smart_pack`] and
//! [`ByteString::smart_unpack`]; nothing else writes or interprets length
//! prefixes.

use std::fmt;

use crate::error::{Error, Result};

/// An owned, resizable byte buffer with big-endian length framing.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct ByteString(Vec<u8>);

impl ByteString {
    pub fn new() -> Self {
        ByteString(Vec::new())
    }

    pub fn with_capacity(n: usize) -> Self {
        ByteString(Vec::with_capacity(n))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }

    pub fn append(&mut self, bytes: &[u8]) {
        self.0.extend_from_slice(bytes);
    }

    pub fn push(&mut self, byte: u8) {
        self.0.push(byte);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Writes a 4-byte big-endian length followed by `inner`'s bytes.
    pub fn smart_pack(&mut self, inner: &ByteString) {
        self.pack_slice(inner.as_slice());
    }

    /// `smart_pack` over a raw slice.
    pub fn pack_slice(&mut self, inner: &[u8]) {
        self.0.extend_from_slice(&(inner.len() as u32).to_be_bytes());
        self.0.extend_from_slice(inner);
    }

    /// Reads a 4-byte big-endian length, then that many bytes, advancing
    /// `index` past both.
    pub fn smart_unpack(&self, index: &mut usize) -> Result<ByteString> {
        let start = *index;
        if self.0.len() < start + 4 {
            return Err(Error::DeserializationFailed);
        }
        let len = u32::from_be_bytes(self.0[start..start + 4].try_into().unwrap()) as usize;
        let end = start
            .checked_add(4)
            .and_then(|i| i.checked_add(len))
            .ok_or(Error::DeserializationFailed)?;
        if self.0.len() < end {
            return Err(Error::DeserializationFailed);
        }
        *index = end;
        Ok(ByteString(self.0[start + 4..end].to_vec()))
    }

    /// Big-endian 2-byte append.
    pub fn pack16(&mut self, v: u16) {
        self.0.extend_from_slice(&v.to_be_bytes());
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self> {
        hex::decode(s)
            .map(ByteString)
            .map_err(|_| Error::InvalidInput)
    }
}

impl fmt::Debug for ByteString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ByteString({})", self.to_hex())
    }
}

impl From<Vec<u8>> for ByteString {
    fn from(v: Vec<u8>) -> Self {
        ByteString(v)
    }
}

impl From<&[u8]> for ByteString {
    fn from(v: &[u8]) -> Self {
        ByteString(v.to_vec())
    }
}

impl AsRef<[u8]> for ByteString {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_unpack_roundtrip() {
        let mut outer = ByteString::new();
        outer.pack_slice(b"hello");
        outer.pack_slice(b"");
        outer.pack_slice(&[0u8; 300]);

        let mut index = 0;
        assert_eq!(outer.smart_unpack(&mut index).unwrap().as_slice(), b"hello");
        assert!(outer.smart_unpack(&mut index).unwrap().is_empty());
        assert_eq!(outer.smart_unpack(&mut index).unwrap().len(), 300);
        assert_eq!(index, outer.len());
    }

    #[test]
    fn unpack_rejects_truncated_input() {
        let mut buf = ByteString::new();
        buf.pack_slice(b"abcdef");
        let truncated = ByteString::from(&buf.as_slice()[..7]);
        let mut index = 0;
        assert_eq!(
            truncated.smart_unpack(&mut index),
            Err(Error::DeserializationFailed)
        );
        // Index is left untouched on failure.
        assert_eq!(index, 0);
    }

    #[test]
    fn unpack_rejects_length_overflow() {
        let mut buf = ByteString::new();
        buf.append(&u32::MAX.to_be_bytes());
        buf.append(b"xy");
        let mut index = 0;
        assert!(buf.smart_unpack(&mut index).is_err());
    }

    #[test]
    fn pack16_is_big_endian() {
        let mut buf = ByteString::new();
        buf.pack16(0x0102);
        assert_eq!(buf.as_slice(), &[0x01, 0x02]);
    }

    #[test]
    fn hex_roundtrip() {
        let b = ByteString::from(vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(b.to_hex(), "deadbeef");
        assert_eq!(ByteString::from_hex("deadbeef").unwrap(), b);
        assert!(ByteString::from_hex("zz").is_err());
    }
}
