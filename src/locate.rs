use crate::boxes::{Atom, AtomTree, FourCC};
use crate::error::{Error, Result};

/// Outcome of a tag lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    Found(&'a Atom),
    NotFound,
}

impl<'a> Lookup<'a> {
    pub fn found(self) -> Option<&'a Atom> {
        match self {
            Lookup::Found(atom) => Some(atom),
            Lookup::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }
}

/// Depth-first search for `target` anywhere in `tree`.
///
/// Each atom is checked before its subtree, and a subtree that comes up
/// empty moves the search on to the next sibling.
pub fn find(tree: &AtomTree, target: FourCC) -> Lookup<'_> {
    for atom in tree.values() {
        if atom.tag == target {
            return Lookup::Found(atom);
        }
        if let Lookup::Found(hit) = find(&atom.children, target) {
            return Lookup::Found(hit);
        }
    }
    Lookup::NotFound
}

/// Resolve every tag in `targets`, in order. Fails on the first missing tag.
pub fn find_all<'a>(tree: &'a AtomTree, targets: &[FourCC]) -> Result<Vec<&'a Atom>> {
    targets
        .iter()
        .map(|&tag| find(tree, tag).found().ok_or(Error::AtomNotFound(tag)))
        .collect()
}
