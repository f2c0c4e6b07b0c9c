use crate::boxes::{Atom, AtomTree, FourCC, HEADER_SIZE};
use crate::registry::{ContainerRegistry, default_registry};
use byteorder::{BigEndian, ByteOrder};
use std::io::{ErrorKind, Read, Seek, SeekFrom};

#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("truncated atom header at offset {offset:#x}")]
    MalformedHeader { offset: u64 },
    #[error("atom {tag} at offset {offset:#x} declares size {size}, smaller than its header")]
    UnderflowLength { tag: FourCC, size: u32, offset: u64 },
}

pub type Result<T> = std::result::Result<T, ParseError>;

/// Single-pass atom tree builder.
///
/// Atoms whose tag is registered in the [`ContainerRegistry`] are descended
/// into after skipping their fixed prefix; everything else is skipped as
/// opaque payload.
pub struct AtomReader<'a> {
    registry: &'a ContainerRegistry,
}

impl<'a> AtomReader<'a> {
    pub fn new(registry: &'a ContainerRegistry) -> Self {
        Self { registry }
    }

    /// Parse the atom starting at the current stream position.
    ///
    /// Returns `Ok(None)` when the stream is exhausted exactly at a header
    /// boundary.
    pub fn parse_atom<R: Read + Seek>(&self, r: &mut R) -> Result<Option<Atom>> {
        let offset = r.stream_position()?;
        let Some((size, tag)) = read_header(r, offset)? else {
            return Ok(None);
        };
        if u64::from(size) < HEADER_SIZE {
            return Err(ParseError::UnderflowLength { tag, size, offset });
        }

        let data_start_pos = offset + HEADER_SIZE;
        let data_len = u64::from(size) - HEADER_SIZE;
        let end = data_start_pos + data_len;
        tracing::debug!(%tag, offset, data_len, "atom");

        let mut children = AtomTree::new();
        // A prefix that swallows the whole payload leaves no room for children.
        if let Some(skip) = self.registry.skip_bytes(&tag).filter(|&skip| skip < data_len) {
            r.seek(SeekFrom::Start(data_start_pos + skip))?;
            while r.stream_position()? < end {
                let child_offset = r.stream_position()?;
                let child = self.parse_atom(r)?.ok_or(ParseError::MalformedHeader {
                    offset: child_offset,
                })?;
                insert(&mut children, child);
            }
        }
        // Skip to end of atom; a child overrunning it must not eat our siblings.
        r.seek(SeekFrom::Start(end))?;

        Ok(Some(Atom {
            tag,
            data_start_pos,
            data_len,
            children,
        }))
    }

    /// Parse top-level atoms until the stream ends.
    pub fn parse_all<R: Read + Seek>(&self, r: &mut R) -> Result<AtomTree> {
        let mut atoms = AtomTree::new();
        while let Some(atom) = self.parse_atom(r)? {
            insert(&mut atoms, atom);
        }
        Ok(atoms)
    }
}

/// [`AtomReader::parse_atom`] with the default registry.
pub fn parse_atom<R: Read + Seek>(r: &mut R) -> Result<Option<Atom>> {
    AtomReader::new(default_registry()).parse_atom(r)
}

/// [`AtomReader::parse_all`] with the default registry.
pub fn parse_all<R: Read + Seek>(r: &mut R) -> Result<AtomTree> {
    AtomReader::new(default_registry()).parse_all(r)
}

fn insert(tree: &mut AtomTree, atom: Atom) {
    if let Some(prev) = tree.insert(atom.tag, atom) {
        tracing::debug!(tag = %prev.tag, offset = prev.header_pos(), "duplicate sibling tag, keeping later atom");
    }
}

// Reads size + tag. Zero bytes before the size field is a clean end of stream.
fn read_header<R: Read>(r: &mut R, offset: u64) -> Result<Option<(u32, FourCC)>> {
    let mut buf = [0u8; HEADER_SIZE as usize];
    let mut filled = 0;
    while filled < buf.len() {
        match r.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }

    match filled {
        0 => Ok(None),
        8 => {
            let size = BigEndian::read_u32(&buf[..4]);
            let tag = FourCC([buf[4], buf[5], buf[6], buf[7]]);
            Ok(Some((size, tag)))
        }
        _ => Err(ParseError::MalformedHeader { offset }),
    }
}
