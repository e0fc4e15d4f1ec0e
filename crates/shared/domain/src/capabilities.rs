use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// The state slots and operations a content type gets.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
    pub struct SliceCapabilities: u8 {
        const ITEM = 1 << 0;
        const COLLECTION = 1 << 1;
        const STATIC = 1 << 2;

        const SINGLE = Self::ITEM.bits();
        const ALL = Self::ITEM.bits() | Self::COLLECTION.bits() | Self::STATIC.bits();
    }
}

impl SliceCapabilities {
    #[must_use]
    pub const fn for_type(single: bool) -> Self {
        if single { Self::SINGLE } else { Self::ALL }
    }
}
