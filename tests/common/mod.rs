#![allow(dead_code)]

use mp4erase::{Atom, AtomTree, FourCC};

// schi is a registered container, so its payload is itself an (empty) atom.
pub const SCHI_PAYLOAD: [u8; 8] = [0, 0, 0, 8, b'u', b's', b'e', b'r'];

/// Plain box: size, tag, payload.
pub fn atom(tag: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut v = Vec::new();
    v.extend_from_slice(&(payload.len() as u32 + 8).to_be_bytes());
    v.extend_from_slice(tag);
    v.extend_from_slice(payload);
    v
}

/// Box whose payload is `prefix` followed by the concatenated children.
pub fn container(tag: &[u8; 4], prefix: &[u8], children: &[Vec<u8>]) -> Vec<u8> {
    let mut payload = prefix.to_vec();
    for c in children {
        payload.extend_from_slice(c);
    }
    atom(tag, &payload)
}

/// ftyp, moov (one audio track with a pinf inside mp4a, plus udta/meta/ilst
/// holding `items`), mdat.
pub fn drm_file(items: &[(&[u8; 4], &[u8])]) -> Vec<u8> {
    let pinf = container(b"pinf", &[], &[atom(b"schi", &SCHI_PAYLOAD)]);
    let mp4a = container(b"mp4a", &[0x11; 28], &[atom(b"esds", &[0x22; 12]), pinf]);
    let stsd = container(b"stsd", &[0, 0, 0, 0, 0, 0, 0, 1], &[mp4a]);
    let stbl = container(b"stbl", &[], &[stsd, atom(b"stco", &[0; 8])]);
    let minf = container(b"minf", &[], &[atom(b"smhd", &[0; 8]), stbl]);
    let mdia = container(b"mdia", &[], &[atom(b"mdhd", &[0; 24]), minf]);
    let trak = container(b"trak", &[], &[atom(b"tkhd", &[0; 84]), mdia]);

    let ilst_items: Vec<Vec<u8>> = items.iter().map(|(t, p)| atom(t, p)).collect();
    let ilst = container(b"ilst", &[], &ilst_items);
    let meta = container(b"meta", &[0; 4], &[atom(b"hdlr", &[0; 25]), ilst]);
    let udta = container(b"udta", &[], &[meta]);

    let moov = container(b"moov", &[], &[atom(b"mvhd", &[0; 100]), trak, udta]);

    let mut file = atom(b"ftyp", b"M4A \x00\x00\x02\x00isomM4A ");
    file.extend(moov);
    file.extend(atom(b"mdat", &[0x5a; 64]));
    file
}

pub fn full_drm_file() -> Vec<u8> {
    drm_file(&[
        (b"apID", b"someone@example.com"),
        (b"purd", b"2011-05-02 11:22:33"),
        (b"ownr", b"Some One"),
        (b"\xa9nam", b"Track Title"),
    ])
}

pub fn tag(s: &[u8; 4]) -> FourCC {
    FourCC(*s)
}

/// Every atom in the tree, depth first.
pub fn all_atoms(tree: &AtomTree) -> Vec<&Atom> {
    let mut out = Vec::new();
    for a in tree.values() {
        out.push(a);
        out.extend(all_atoms(&a.children));
    }
    out
}

/// Bytes of `atom`'s 8-byte header.
pub fn header_bytes<'a>(bytes: &'a [u8], atom: &Atom) -> &'a [u8] {
    let start = atom.header_pos() as usize;
    &bytes[start..start + 8]
}
