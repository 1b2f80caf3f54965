// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};

macro_rules! slot_handle {
    ($(#[$meta:meta])* $name:ident, $tag:literal) => {
        $(#[$meta])*
        #[repr(transparent)]
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(i32);

        impl $name {
            /// Sentinel that never refers to a live slot.
            pub const INVALID: Self = Self(-1);

            /// Wraps a raw slot index. Negative values are invalid.
            #[must_use]
            pub const fn new(raw: i32) -> Self {
                Self(raw)
            }

            /// Builds a handle for `index`, or [`Self::INVALID`] when the index
            /// does not fit the handle's range.
            #[must_use]
            pub fn from_index(index: usize) -> Self {
                i32::try_from(index).map_or(Self::INVALID, Self)
            }

            /// Raw slot index, `-1` for the sentinel.
            #[must_use]
            pub const fn raw(self) -> i32 {
                self.0
            }

            /// Slot index when the handle is not the sentinel.
            #[must_use]
            pub fn index(self) -> Option<usize> {
                usize::try_from(self.0).ok()
            }

            /// `true` unless this is a negative sentinel.
            #[must_use]
            pub const fn is_valid(self) -> bool {
                self.0 >= 0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($tag, "#{}"), self.0)
            }
        }
    };
}

slot_handle!(
    /// Index of a body slot inside a world.
    ///
    /// Handles are plain values: copying one never keeps a body alive, and a
    /// handle whose slot was freed and reused refers to the new occupant.
    BodyHandle,
    "body"
);

slot_handle!(
    /// Index of a collider slot inside a world.
    ColliderHandle,
    "collider"
);

slot_handle!(
    /// Index of a shape payload inside the store for its shape kind.
    ShapeHandle,
    "shape"
);

/// Unordered pair of colliders.
///
/// `{a, b}` and `{b, a}` compare and hash equal, so either orientation finds
/// the same manifold entry. The stored orientation is kept for reporting:
/// listeners see the pair the way the broad phase produced it.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColliderPair {
    /// First collider as emitted.
    pub first: ColliderHandle,
    /// Second collider as emitted.
    pub second: ColliderHandle,
}

impl ColliderPair {
    /// Creates a pair in the given orientation.
    #[must_use]
    pub const fn new(first: ColliderHandle, second: ColliderHandle) -> Self {
        Self { first, second }
    }

    /// The two handles ordered ascending.
    #[must_use]
    pub fn canonical(self) -> (ColliderHandle, ColliderHandle) {
        if self.first <= self.second {
            (self.first, self.second)
        } else {
            (self.second, self.first)
        }
    }

    /// `true` when either side is `collider`.
    #[must_use]
    pub fn contains(self, collider: ColliderHandle) -> bool {
        self.first == collider || self.second == collider
    }

    /// The side opposite `collider`, if `collider` is part of the pair.
    #[must_use]
    pub fn other(self, collider: ColliderHandle) -> Option<ColliderHandle> {
        if self.first == collider {
            Some(self.second)
        } else if self.second == collider {
            Some(self.first)
        } else {
            None
        }
    }
}

impl PartialEq for ColliderPair {
    fn eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }
}

impl Eq for ColliderPair {}

impl Hash for ColliderPair {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

impl PartialOrd for ColliderPair {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ColliderPair {
    fn cmp(&self, other: &Self) -> Ordering {
        self.canonical().cmp(&other.canonical())
    }
}

impl fmt::Display for ColliderPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.first, self.second)
    }
}
