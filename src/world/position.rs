use serde::{Deserialize, Serialize};

use super::block::{Direction, Facing};

// 위치 (x, y, z), z는 높이
#[derive(
    Debug, Default, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Position(pub i32, pub i32, pub i32);

impl Position {
    pub fn cardinal(&self) -> Vec<Position> {
        vec![
            Position(self.0 + 1, self.1, self.2),
            Position(self.0 - 1, self.1, self.2),
            Position(self.0, self.1 + 1, self.2),
            Position(self.0, self.1 - 1, self.2),
        ]
    }

    pub fn up(&self) -> Position {
        Position(self.0, self.1, self.2 + 1)
    }

    pub fn down(&self) -> Position {
        Position(self.0, self.1, self.2 - 1)
    }

    pub fn walk(&self, dir: Direction) -> Position {
        match dir {
            Direction::None => *self,
            Direction::Bottom => self.down(),
            Direction::Top => self.up(),
            Direction::East => Position(self.0 + 1, self.1, self.2),
            Direction::West => Position(self.0 - 1, self.1, self.2),
            Direction::South => Position(self.0, self.1 - 1, self.2),
            Direction::North => Position(self.0, self.1 + 1, self.2),
        }
    }

    pub fn step(&self, facing: Facing) -> Position {
        self.walk(facing.into())
    }
}

// 영역, 두 꼭짓점을 포함하는 직육면체
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Region {
    pub min: Position,
    pub max: Position,
}

impl Region {
    pub fn new(a: Position, b: Position) -> Self {
        Self {
            min: Position(a.0.min(b.0), a.1.min(b.1), a.2.min(b.2)),
            max: Position(a.0.max(b.0), a.1.max(b.1), a.2.max(b.2)),
        }
    }

    pub fn bound_on(&self, pos: Position) -> bool {
        (self.min.0..=self.max.0).contains(&pos.0)
            && (self.min.1..=self.max.1).contains(&pos.1)
            && (self.min.2..=self.max.2).contains(&pos.2)
    }

    pub fn iter_pos(&self) -> Vec<Position> {
        let mut result = Vec::new();

        for z in self.min.2..=self.max.2 {
            for y in self.min.1..=self.max.1 {
                for x in self.min.0..=self.max.0 {
                    result.push(Position(x, y, z));
                }
            }
        }

        result
    }
}
