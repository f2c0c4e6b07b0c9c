pub mod boxes;
pub mod erase;
pub mod error;
pub mod locate;
pub mod parser;
pub mod registry;
pub mod util;

pub use boxes::{Atom, AtomTree, FourCC};
pub use erase::{DEFAULT_TAGS, DRM_TAGS, ErasedAtom, destroy, erase_atoms, erase_atoms_with};
pub use error::{Error, Result};
pub use locate::{Lookup, find, find_all};
pub use parser::{AtomReader, ParseError, parse_all, parse_atom};
pub use registry::{ContainerRegistry, default_registry};
