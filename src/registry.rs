use crate::boxes::FourCC;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Container atoms and the number of prefix bytes (version, flags, reserved
/// fields) between the header and the first child.
///
/// The registry is immutable once constructed; use
/// [`ContainerRegistry::with_container`] to build it fluently. Anything not
/// listed is treated as an opaque payload by the reader.
#[derive(Debug, Clone, Default)]
pub struct ContainerRegistry {
    map: HashMap<FourCC, u64>,
}

impl ContainerRegistry {
    /// Create an empty registry. Every atom parsed with it is opaque.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a new registry with `tag` registered as a container whose
    /// children start `skip` bytes into its payload.
    pub fn with_container(mut self, tag: FourCC, skip: u64) -> Self {
        self.map.insert(tag, skip);
        self
    }

    /// Skip bytes for `tag`, or `None` if it is not a container.
    pub fn skip_bytes(&self, tag: &FourCC) -> Option<u64> {
        self.map.get(tag).copied()
    }

    pub fn is_container(&self, tag: &FourCC) -> bool {
        self.map.contains_key(tag)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

static DEFAULT: LazyLock<ContainerRegistry> = LazyLock::new(|| {
    ContainerRegistry::new()
        .with_container(FourCC(*b"moov"), 0)
        .with_container(FourCC(*b"trak"), 0)
        .with_container(FourCC(*b"mdia"), 0)
        .with_container(FourCC(*b"minf"), 0)
        // full box header + entry count
        .with_container(FourCC(*b"stsd"), 8)
        .with_container(FourCC(*b"stbl"), 0)
        // audio sample entry fields before the extension boxes
        .with_container(FourCC(*b"mp4a"), 28)
        .with_container(FourCC(*b"pinf"), 0)
        .with_container(FourCC(*b"schi"), 0)
        .with_container(FourCC(*b"udta"), 0)
        // full box header
        .with_container(FourCC(*b"meta"), 4)
        .with_container(FourCC(*b"ilst"), 0)
});

/// The built-in table covering the path from `moov` down to the iTunes
/// purchase atoms (`pinf`, `apID`, `purd`, `ownr`).
pub fn default_registry() -> &'static ContainerRegistry {
    &DEFAULT
}
