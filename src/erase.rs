use crate::boxes::{Atom, FourCC};
use crate::error::Result;
use crate::locate::find_all;
use crate::parser::AtomReader;
use crate::registry::{ContainerRegistry, default_registry};
use serde::Serialize;
use std::io::{self, Read, Seek, SeekFrom, Write};

/// iTunes purchase/ownership atoms.
pub const DRM_TAGS: [FourCC; 4] = [
    FourCC(*b"pinf"),
    FourCC(*b"apID"),
    FourCC(*b"purd"),
    FourCC(*b"ownr"),
];

pub const DEFAULT_TAGS: [FourCC; 1] = [FourCC(*b"pinf")];

/// A payload region that was overwritten with zeros.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErasedAtom {
    pub tag: FourCC,
    pub offset: u64,
    pub len: u64,
}

impl From<&Atom> for ErasedAtom {
    fn from(atom: &Atom) -> Self {
        Self {
            tag: atom.tag,
            offset: atom.data_start_pos,
            len: atom.data_len,
        }
    }
}

/// Overwrite the payload of `atom` with zeros.
///
/// The header stays as is, so no size field anywhere in the file changes and
/// the stream length is preserved. A payload reaching past the end of the
/// stream fails with `UnexpectedEof` before anything is written.
pub fn destroy<W: Write + Seek>(atom: &Atom, w: &mut W) -> io::Result<()> {
    check_bounds(atom, stream_len(w)?)?;
    w.seek(SeekFrom::Start(atom.data_start_pos))?;
    let written = io::copy(&mut io::repeat(0).take(atom.data_len), w)?;
    if written != atom.data_len {
        return Err(io::Error::new(
            io::ErrorKind::WriteZero,
            format!("wrote {} of {} bytes for {}", written, atom.data_len, atom.tag),
        ));
    }
    w.flush()
}

/// Parse `stream` once, then zero the payload of every atom in `targets`.
///
/// All targets are resolved before the first write: if any tag is missing,
/// [`Error::AtomNotFound`](crate::Error::AtomNotFound) is returned and the
/// stream is left untouched. Erasure happens in `targets` order.
pub fn erase_atoms<S: Read + Write + Seek>(
    stream: &mut S,
    targets: &[FourCC],
) -> Result<Vec<ErasedAtom>> {
    erase_atoms_with(default_registry(), stream, targets)
}

/// [`erase_atoms`] with a caller-supplied container registry.
pub fn erase_atoms_with<S: Read + Write + Seek>(
    registry: &ContainerRegistry,
    stream: &mut S,
    targets: &[FourCC],
) -> Result<Vec<ErasedAtom>> {
    stream.seek(SeekFrom::Start(0))?;
    let tree = AtomReader::new(registry).parse_all(stream)?;
    let found = find_all(&tree, targets)?;
    let len = stream_len(stream)?;
    for atom in &found {
        check_bounds(atom, len)?;
    }

    let mut erased = Vec::with_capacity(found.len());
    for atom in found {
        destroy(atom, stream)?;
        tracing::info!(tag = %atom.tag, offset = atom.data_start_pos, len = atom.data_len, "erased");
        erased.push(ErasedAtom::from(atom));
    }
    Ok(erased)
}

fn stream_len<S: Seek>(s: &mut S) -> io::Result<u64> {
    s.seek(SeekFrom::End(0))
}

fn check_bounds(atom: &Atom, len: u64) -> io::Result<()> {
    if atom.end_pos() > len {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!(
                "{} payload ends at {:#x}, past end of stream at {:#x}",
                atom.tag,
                atom.end_pos(),
                len
            ),
        ));
    }
    Ok(())
}
