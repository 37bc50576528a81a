use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::gate::GateType;

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, EnumIter)]
pub enum Direction {
    #[default]
    None,
    Bottom,
    Top,
    East,
    West,
    South,
    North,
}

impl Direction {
    pub fn inverse(&self) -> Self {
        match self {
            Direction::None => Direction::None,
            Direction::Bottom => Direction::Top,
            Direction::Top => Direction::Bottom,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
            Direction::South => Direction::North,
            Direction::North => Direction::South,
        }
    }
}

// 게이트가 바라볼 수 있는 방향, 시계 방향 순서
pub const ROTATION_ORDER: [Facing; 4] = [Facing::North, Facing::East, Facing::South, Facing::West];

#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Facing {
    North,
    #[default]
    East,
    South,
    West,
}

impl Facing {
    fn index(self) -> usize {
        self as usize
    }

    pub fn rotate_cw(self) -> Self {
        ROTATION_ORDER[(self.index() + 1) % 4]
    }

    pub fn rotate_ccw(self) -> Self {
        ROTATION_ORDER[(self.index() + 3) % 4]
    }

    pub fn opposite(self) -> Self {
        ROTATION_ORDER[(self.index() + 2) % 4]
    }
}

impl From<Facing> for Direction {
    fn from(value: Facing) -> Self {
        match value {
            Facing::North => Direction::North,
            Facing::East => Direction::East,
            Facing::South => Direction::South,
            Facing::West => Direction::West,
        }
    }
}

// 블럭의 종류
#[derive(Default, Clone, Debug, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BlockKind {
    #[default]
    Air,
    // 신호를 전달하지 않는 일반 블럭
    Cobble,
    // 게이트 몸체 (투명 블럭)
    Glass,
    // 게이트 종류를 나타내는 활성화 표식, 몸체 위에 놓임
    Carpet { gate_type: GateType },
    Redstone { strength: u8 },
    Torch { is_on: bool },
    Lamp { is_on: bool },
    Switch { is_on: bool },
    // 방향이 있는 소자, facing은 신호를 내보내는 쪽
    Repeater { is_on: bool, facing: Facing },
    Comparator { is_on: bool, facing: Facing },
    RedstoneBlock,
}

impl BlockKind {
    pub fn is_air(&self) -> bool {
        matches!(self, BlockKind::Air)
    }

    pub fn is_carpet(&self) -> bool {
        matches!(self, BlockKind::Carpet { .. })
    }

    pub fn is_glass(&self) -> bool {
        matches!(self, BlockKind::Glass)
    }

    pub fn is_powered(&self) -> bool {
        match self {
            BlockKind::Redstone { strength } => *strength > 0,
            BlockKind::Torch { is_on }
            | BlockKind::Lamp { is_on }
            | BlockKind::Switch { is_on }
            | BlockKind::Repeater { is_on, .. }
            | BlockKind::Comparator { is_on, .. } => *is_on,
            BlockKind::RedstoneBlock => true,
            BlockKind::Air | BlockKind::Cobble | BlockKind::Glass | BlockKind::Carpet { .. } => {
                false
            }
        }
    }

    // 붉은 돌 가루가 이어 붙는 블럭
    pub fn is_redstone_component(&self) -> bool {
        matches!(
            self,
            BlockKind::Redstone { .. }
                | BlockKind::Torch { .. }
                | BlockKind::Switch { .. }
                | BlockKind::Repeater { .. }
                | BlockKind::Comparator { .. }
                | BlockKind::RedstoneBlock
        )
    }

    // 출력이 반영된 블럭을 돌려줌, 출력을 받을 수 없는 블럭은 그대로
    pub fn powered(self, on: bool) -> Self {
        match self {
            BlockKind::Redstone { .. } => BlockKind::Redstone {
                strength: if on { 15 } else { 0 },
            },
            BlockKind::Torch { .. } => BlockKind::Torch { is_on: on },
            BlockKind::Lamp { .. } => BlockKind::Lamp { is_on: on },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn unittest_facing_rotation_cycle() {
        assert_eq!(Facing::North.rotate_cw(), Facing::East);
        assert_eq!(Facing::West.rotate_cw(), Facing::North);
        assert_eq!(Facing::North.rotate_ccw(), Facing::West);
        assert_eq!(Facing::East.opposite(), Facing::West);

        for facing in Facing::iter() {
            assert_eq!(facing.rotate_cw().rotate_ccw(), facing);
            assert_eq!(facing.opposite().opposite(), facing);
            assert_eq!(facing.rotate_cw().rotate_cw(), facing.opposite());
        }
    }

    #[test]
    fn unittest_facing_parse() {
        assert_eq!("north".parse::<Facing>().unwrap(), Facing::North);
        assert_eq!("WEST".parse::<Facing>().unwrap(), Facing::West);
        assert!("UP".parse::<Facing>().is_err());
    }

    #[test]
    fn unittest_block_powered() {
        let wire = BlockKind::Redstone { strength: 0 }.powered(true);
        assert_eq!(wire, BlockKind::Redstone { strength: 15 });
        assert!(wire.is_powered());
        assert_eq!(BlockKind::Cobble.powered(true), BlockKind::Cobble);
        assert!(!BlockKind::Lamp { is_on: true }.powered(false).is_powered());

        let repeater = BlockKind::Repeater {
            is_on: true,
            facing: Facing::West,
        };
        assert!(repeater.is_powered());
        assert!(repeater.is_redstone_component());
        // 중계기에는 출력을 쓰지 않음
        assert_eq!(repeater.powered(false), repeater);
        assert!(!BlockKind::Lamp { is_on: true }.is_redstone_component());
    }
}
