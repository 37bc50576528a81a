use std::collections::HashMap;
use std::fmt::Debug;
use std::fs;
use std::ops::Index;
use std::path::Path;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use super::block::{BlockKind, Direction, Facing};
use super::position::{Position, Region};
use super::{OutputSink, SignalProbe, StructureValidator};
use crate::engine::queue::UpdateSender;
use crate::gate::GateType;

const AIR: BlockKind = BlockKind::Air;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SceneBlock {
    pub pos: Position,
    pub block: BlockKind,
}

// 희소 블럭 맵, 없는 위치는 공기
#[derive(Clone, Default)]
pub struct GridWorld {
    blocks: HashMap<Position, BlockKind>,
    notifier: Option<UpdateSender>,
    redstone_compatibility: bool,
    writes: usize,
}

impl GridWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_blocks(blocks: impl IntoIterator<Item = (Position, BlockKind)>) -> Self {
        let mut world = Self::new();
        for (pos, block) in blocks {
            world.put(pos, block);
        }
        world
    }

    pub fn load(path: &Path) -> eyre::Result<Self> {
        let text = fs::read_to_string(path)?;
        let scene: Vec<SceneBlock> = serde_json::from_str(&text)?;

        tracing::info!("loaded scene {:?} with {} blocks", path, scene.len());

        Ok(Self::from_blocks(
            scene.into_iter().map(|block| (block.pos, block.block)),
        ))
    }

    // set_block으로 신호가 바뀌면 notifier에 알림
    pub fn with_notifier(mut self, notifier: UpdateSender) -> Self {
        self.notifier = Some(notifier);
        self
    }

    // 켜면 가루는 게이트 쪽으로 이어진 경우만, 중계기와 비교기는 게이트를 향한 경우만 신호로 읽음
    pub fn with_redstone_compatibility(mut self, enabled: bool) -> Self {
        self.redstone_compatibility = enabled;
        self
    }

    // 알림 없이 블럭을 놓음
    pub fn put(&mut self, pos: Position, block: BlockKind) {
        if block.is_air() {
            self.blocks.remove(&pos);
        } else {
            self.blocks.insert(pos, block);
        }
    }

    // 외부 편집처럼 블럭을 놓고, 신호가 바뀌면 이웃에 알림
    pub fn set_block(&mut self, pos: Position, block: BlockKind) {
        let was_powered = self[pos].is_powered();
        self.put(pos, block);

        if was_powered != block.is_powered() {
            if let Some(notifier) = &self.notifier {
                notifier.notify_neighbors(pos);
            }
        }
    }

    pub fn iter_block(&self) -> Vec<(Position, &BlockKind)> {
        self.blocks
            .iter()
            .map(|(pos, block)| (*pos, block))
            .sorted_by_key(|(pos, _)| *pos)
            .collect_vec()
    }

    pub fn bounds(&self) -> Option<Region> {
        let (min, max) = self.blocks.keys().fold(None, |acc, &pos| match acc {
            None => Some((pos, pos)),
            Some((min, max)) => Some((
                Position(min.0.min(pos.0), min.1.min(pos.1), min.2.min(pos.2)),
                Position(max.0.max(pos.0), max.1.max(pos.1), max.2.max(pos.2)),
            )),
        })?;

        Some(Region::new(min, max))
    }

    // 지금까지 받은 출력 쓰기 횟수
    pub fn writes(&self) -> usize {
        self.writes
    }

    // 가루가 toward 쪽으로 이어져 있는지
    // 이어진 곳이 없으면 십자 모양, 하나면 반대쪽까지 이어진 직선
    fn wire_connects(&self, wire: Position, toward: Direction) -> bool {
        let connections = Facing::iter()
            .filter(|&facing| match self[wire.step(facing)] {
                BlockKind::Repeater { facing: f, .. } | BlockKind::Comparator { facing: f, .. } => {
                    f == facing || f == facing.opposite()
                }
                block => block.is_redstone_component(),
            })
            .collect_vec();

        match connections[..] {
            [] => true,
            [only] => toward == Direction::from(only) || toward == Direction::from(only.opposite()),
            _ => connections.iter().any(|&facing| toward == Direction::from(facing)),
        }
    }
}

impl Index<Position> for GridWorld {
    type Output = BlockKind;

    fn index(&self, index: Position) -> &Self::Output {
        self.blocks.get(&index).unwrap_or(&AIR)
    }
}

impl SignalProbe for GridWorld {
    fn read(&self, pos: Position, dir: Direction) -> bool {
        let target = pos.walk(dir);
        let block = self[target];

        if !self.redstone_compatibility {
            return block.is_powered();
        }

        match block {
            BlockKind::Redstone { strength } => {
                strength > 0 && self.wire_connects(target, dir.inverse())
            }
            BlockKind::Repeater { is_on, facing } | BlockKind::Comparator { is_on, facing } => {
                is_on && Direction::from(facing) == dir.inverse()
            }
            other => other.is_powered(),
        }
    }

    fn is_powered(&self, pos: Position) -> bool {
        self[pos].is_powered()
    }

    fn is_empty(&self, pos: Position) -> bool {
        self[pos].is_air()
    }
}

impl OutputSink for GridWorld {
    fn write(&mut self, pos: Position, on: bool) -> eyre::Result<()> {
        self.writes += 1;

        let block = self[pos];
        let next = block.powered(on);
        if next != block {
            self.put(pos, next);
        }

        Ok(())
    }
}

impl StructureValidator for GridWorld {
    fn is_valid_gate_body(&self, pos: Position) -> bool {
        self[pos].is_glass()
    }

    fn has_activation_marker(&self, pos: Position) -> bool {
        self[pos.up()].is_carpet()
    }

    fn marker_type(&self, pos: Position) -> Option<GateType> {
        match self[pos.up()] {
            BlockKind::Carpet { gate_type } => Some(gate_type),
            _ => None,
        }
    }

    fn is_marker_block(&self, pos: Position) -> bool {
        self[pos].is_carpet()
    }
}

impl Debug for GridWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Some(region) = self.bounds() else {
            return writeln!(f, "(empty)");
        };

        for height in (region.min.2..=region.max.2).rev() {
            writeln!(f, "h={height:?}")?;

            for y in (region.min.1..=region.max.1).rev() {
                writeln!(
                    f,
                    "  {}",
                    (region.min.0..=region.max.0)
                        .map(|x| match self[Position(x, y, height)] {
                            BlockKind::Air => ".",
                            BlockKind::Cobble => "c",
                            BlockKind::Glass => "g",
                            BlockKind::Carpet { .. } => "m",
                            BlockKind::Redstone { strength } if strength > 0 => "R",
                            BlockKind::Redstone { .. } => "r",
                            BlockKind::Torch { .. } => "t",
                            BlockKind::Lamp { is_on: true } => "L",
                            BlockKind::Lamp { .. } => "l",
                            BlockKind::Switch { .. } => "s",
                            BlockKind::Repeater { .. } => "p",
                            BlockKind::Comparator { .. } => "q",
                            BlockKind::RedstoneBlock => "b",
                        })
                        .join("")
                )?;
            }
        }

        Ok(())
    }
}
