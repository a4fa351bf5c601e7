//! Street traversal permissions and travel modes.

use serde::{Deserialize, Serialize};

/// A way of moving along a street.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TraverseMode {
    Walk,
    Bicycle,
    Car,
}

/// Fixed flag set describing which modes may traverse a street segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Permission(u8);

impl Permission {
    pub const NONE: Permission = Permission(0);
    pub const PEDESTRIAN: Permission = Permission(0b001);
    pub const BICYCLE: Permission = Permission(0b010);
    pub const CAR: Permission = Permission(0b100);
    pub const ALL: Permission = Permission(0b111);

    #[must_use]
    pub const fn union(self, other: Permission) -> Permission {
        Permission(self.0 | other.0)
    }

    #[must_use]
    pub const fn intersect(self, other: Permission) -> Permission {
        Permission(self.0 & other.0)
    }

    pub const fn allows(self, mode: TraverseMode) -> bool {
        let flag = match mode {
            TraverseMode::Walk => Permission::PEDESTRIAN.0,
            TraverseMode::Bicycle => Permission::BICYCLE.0,
            TraverseMode::Car => Permission::CAR.0,
        };
        self.0 & flag != 0
    }

    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl Default for Permission {
    fn default() -> Self {
        Permission::ALL
    }
}
