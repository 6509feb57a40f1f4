use std::ops::{Add, AddAssign};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::host::LevelManager;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorType {
    CubeShard,
    GoldenCube,
    AntiCube,
    PieceOfHeart,
    SkeletonKey,
    Owl,
    Other,
}

/// A group of pickups the level manager tracks together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickupGroup {
    pub actor_type: ActorType,
}

impl PickupGroup {
    pub fn new(actor_type: ActorType) -> Self {
        Self { actor_type }
    }
}

/// Running tally of what a level (or a set of levels) holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollectibleInfo {
    pub golden_cubes: u32,
    pub anti_cubes: u32,
    pub heart_pieces: u32,
    pub bits: u32,
    pub keys: u32,
    pub owls: u32,
    pub water_lower: bool,
    pub other: String,
}

impl CollectibleInfo {
    pub fn from_pickups(groups: &[PickupGroup]) -> Self {
        let mut info = Self::default();
        for group in groups {
            match group.actor_type {
                ActorType::CubeShard => info.bits += 1,
                ActorType::GoldenCube => info.golden_cubes += 1,
                ActorType::AntiCube => info.anti_cubes += 1,
                ActorType::PieceOfHeart => info.heart_pieces += 1,
                ActorType::SkeletonKey => info.keys += 1,
                ActorType::Owl => info.owls += 1,
                ActorType::Other => {}
            }
        }
        info
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Eight bits make a cube.
    pub fn total_cubes(&self) -> u32 {
        self.golden_cubes + self.anti_cubes + self.bits / 8
    }
}

impl AddAssign<&CollectibleInfo> for CollectibleInfo {
    fn add_assign(&mut self, rhs: &CollectibleInfo) {
        self.golden_cubes += rhs.golden_cubes;
        self.anti_cubes += rhs.anti_cubes;
        self.heart_pieces += rhs.heart_pieces;
        self.bits += rhs.bits;
        self.keys += rhs.keys;
        self.owls += rhs.owls;
        self.water_lower |= rhs.water_lower;
        if !rhs.other.is_empty() {
            if !self.other.is_empty() {
                self.other.push_str(", ");
            }
            self.other.push_str(&rhs.other);
        }
    }
}

impl Add for CollectibleInfo {
    type Output = CollectibleInfo;

    fn add(mut self, rhs: CollectibleInfo) -> Self::Output {
        self += &rhs;
        self
    }
}

/// Logs every cube-bit pickup group in the current level and returns the count.
pub fn report_cube_bits(level_manager: Option<&dyn LevelManager>) -> usize {
    let Some(level_manager) = level_manager else {
        warn!("No level manager.");
        return 0;
    };
    let mut found = 0;
    for group in level_manager.pickup_groups() {
        if group.actor_type == ActorType::CubeShard {
            info!("Found bit.");
            found += 1;
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    struct PickupLevel(Vec<PickupGroup>);

    impl LevelManager for PickupLevel {
        fn name(&self) -> String {
            "NATURE_HUB".to_string()
        }

        fn set_destination_volume_id(&self, _volume_id: u32) {}

        fn set_destination_is_far_away(&self, _far_away: bool) {}

        fn pickup_groups(&self) -> Vec<PickupGroup> {
            self.0.clone()
        }
    }

    #[test]
    fn sums_counts_and_joins_notes() {
        let a = CollectibleInfo {
            golden_cubes: 1,
            bits: 5,
            other: "map".to_string(),
            ..Default::default()
        };
        let b = CollectibleInfo {
            anti_cubes: 2,
            bits: 3,
            water_lower: true,
            other: "tome".to_string(),
            ..Default::default()
        };
        let total = a + b;
        assert_eq!(total.golden_cubes, 1);
        assert_eq!(total.anti_cubes, 2);
        assert_eq!(total.bits, 8);
        assert!(total.water_lower);
        assert_eq!(total.other, "map, tome");
        assert_eq!(total.total_cubes(), 4);
    }

    #[test]
    fn empty_notes_do_not_add_a_separator() {
        let noted = CollectibleInfo {
            other: "map".to_string(),
            ..Default::default()
        };
        assert_eq!((CollectibleInfo::default() + noted.clone()).other, "map");
        assert_eq!((noted + CollectibleInfo::default()).other, "map");
    }

    #[test]
    fn default_info_is_empty() {
        assert!(CollectibleInfo::default().is_empty());
        let keyed = CollectibleInfo {
            keys: 1,
            ..Default::default()
        };
        assert!(!keyed.is_empty());
    }

    #[test]
    fn counts_pickups_by_type() {
        let groups = [
            PickupGroup::new(ActorType::CubeShard),
            PickupGroup::new(ActorType::CubeShard),
            PickupGroup::new(ActorType::SkeletonKey),
            PickupGroup::new(ActorType::Other),
        ];
        let info = CollectibleInfo::from_pickups(&groups);
        assert_eq!(info.bits, 2);
        assert_eq!(info.keys, 1);
        assert_eq!(info.total_cubes(), 0);
    }

    #[test]
    fn reports_only_cube_bits() {
        let level = PickupLevel(vec![
            PickupGroup::new(ActorType::CubeShard),
            PickupGroup::new(ActorType::Owl),
            PickupGroup::new(ActorType::CubeShard),
        ]);
        assert_eq!(report_cube_bits(Some(&level)), 2);
        assert_eq!(report_cube_bits(None), 0);
    }
}
