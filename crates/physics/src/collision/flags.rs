//! Content flags for collision filtering.
//!
//! A brush carries one set of flags. Queries pass a mask and only see
//! brushes whose contents intersect it.

use serde::{Deserialize, Serialize};

/// What a brush is made of.
///
/// The crouch stand-up probe looks at [`ContentFlags::MASK_PLAYER_SOLID`],
/// the submersion probe at the character's configured water mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ContentFlags(pub u32);

impl ContentFlags {
    pub const EMPTY: Self = Self(0);

    /// Walls, floors, ceilings.
    pub const SOLID: Self = Self(1 << 0);

    /// Swimmable volume.
    pub const WATER: Self = Self(1 << 1);

    /// Invisible wall that only stops characters.
    pub const PLAYER_CLIP: Self = Self(1 << 2);

    /// Volume reported by overlaps that opt into triggers; never blocks.
    pub const TRIGGER: Self = Self(1 << 3);

    /// Everything that blocks a character capsule.
    pub const MASK_PLAYER_SOLID: Self = Self(Self::SOLID.0 | Self::PLAYER_CLIP.0);

    #[inline]
    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    #[inline]
    pub fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    /// Whether a character can be inside this brush (water or trigger).
    ///
    /// Queries run with [`TriggerInteraction::Ignore`](crate::motor::TriggerInteraction)
    /// skip these.
    #[inline]
    pub fn is_trigger_volume(self) -> bool {
        self.intersects(Self::WATER | Self::TRIGGER)
    }
}

impl std::ops::BitOr for ContentFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitAnd for ContentFlags {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}
