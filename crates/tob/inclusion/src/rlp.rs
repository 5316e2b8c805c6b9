//! Positional access to raw RLP lists.

use alloy_primitives::B256;
use alloy_rlp::{Decodable, Error, Header};

/// One item of an RLP list, borrowed from the encoding it was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RlpItem<'a> {
    /// Whether the item is itself a list.
    pub(crate) list: bool,
    /// The item's payload, header stripped.
    pub(crate) payload: &'a [u8],
    /// The item's full encoding, header included.
    pub(crate) raw: &'a [u8],
}

impl<'a> RlpItem<'a> {
    /// Returns the payload of a string item.
    pub(crate) const fn bytes(&self) -> Result<&'a [u8], Error> {
        if self.list {
            return Err(Error::UnexpectedList);
        }
        Ok(self.payload)
    }

    /// Decodes a 32 byte string item.
    pub(crate) fn b256(&self) -> Result<B256, Error> {
        let bytes = self.bytes()?;
        if bytes.len() != 32 {
            return Err(Error::UnexpectedLength);
        }
        Ok(B256::from_slice(bytes))
    }

    /// Decodes a canonical scalar item.
    pub(crate) fn u64(&self) -> Result<u64, Error> {
        u64::decode(&mut &self.raw[..])
    }
}

/// Splits `data` into the items of the single RLP list it encodes.
pub(crate) fn list_items(data: &[u8]) -> Result<Vec<RlpItem<'_>>, Error> {
    let mut buf = data;
    let header = Header::decode(&mut buf)?;
    if !header.list {
        return Err(Error::UnexpectedString);
    }
    if buf.len() < header.payload_length {
        return Err(Error::InputTooShort);
    }
    if buf.len() > header.payload_length {
        return Err(Error::UnexpectedLength);
    }

    let mut items = Vec::new();
    while !buf.is_empty() {
        let start = buf;
        let item = Header::decode(&mut buf)?;
        if buf.len() < item.payload_length {
            return Err(Error::InputTooShort);
        }
        let header_len = start.len() - buf.len();
        let (payload, rest) = buf.split_at(item.payload_length);
        items.push(RlpItem {
            list: item.list,
            payload,
            raw: &start[..header_len + item.payload_length],
        });
        buf = rest;
    }
    Ok(items)
}
