use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::io::{Read, Seek, SeekFrom};
use std::str::FromStr;

/// Size of a plain box header: 32-bit size followed by the 4-byte tag.
pub const HEADER_SIZE: u64 = 8;

/// Raw 4-byte atom tag. Not guaranteed to be valid text.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    pub fn is_printable(&self) -> bool {
        self.0.iter().all(|c| (32..=126).contains(c))
    }
}

impl fmt::Display for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_printable() {
            self.0.iter().try_for_each(|&c| write!(f, "{}", c as char))
        } else {
            write!(f, "0x{}", hex::encode(self.0))
        }
    }
}

impl fmt::Debug for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("invalid atom tag {0:?}: expected 4 bytes or 0x followed by 8 hex digits")]
pub struct InvalidTag(pub String);

impl FromStr for FourCC {
    type Err = InvalidTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(digits) = s.strip_prefix("0x") {
            let mut tag = [0u8; 4];
            hex::decode_to_slice(digits, &mut tag).map_err(|_| InvalidTag(s.to_string()))?;
            return Ok(FourCC(tag));
        }
        let b = s.as_bytes();
        <[u8; 4]>::try_from(b)
            .map(FourCC)
            .map_err(|_| InvalidTag(s.to_string()))
    }
}

impl Serialize for FourCC {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}

/// Top-level atoms (or the children of one atom), keyed by tag.
///
/// Sibling atoms sharing a tag collapse to the one parsed last.
pub type AtomTree = BTreeMap<FourCC, Atom>;

/// One parsed atom. Offsets are absolute positions in the source stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Atom {
    pub tag: FourCC,
    /// Offset of the first payload byte, right after the 8-byte header.
    pub data_start_pos: u64,
    /// Declared box size minus the header.
    pub data_len: u64,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub children: AtomTree,
}

impl Atom {
    pub fn header_pos(&self) -> u64 {
        self.data_start_pos - HEADER_SIZE
    }

    pub fn end_pos(&self) -> u64 {
        self.data_start_pos + self.data_len
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Read the whole payload of this atom from `r`.
    pub fn read_data<R: Read + Seek>(&self, r: &mut R) -> std::io::Result<Vec<u8>> {
        r.seek(SeekFrom::Start(self.data_start_pos))?;
        let mut v = vec![0u8; self.data_len as usize];
        r.read_exact(&mut v)?;
        Ok(v)
    }
}
