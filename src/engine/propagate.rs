use itertools::Itertools;

use super::queue::UpdateSender;
use super::registry::GateRegistry;
use crate::world::{Facing, Position, StructureValidator};

// 게이트 앞 칸이 표식이면 한 칸 더 앞이 출력 칸
pub fn output_cell(body: Position, facing: Facing, validator: &impl StructureValidator) -> Position {
    let front = body.step(facing);

    if validator.is_marker_block(front) {
        front.step(facing)
    } else {
        front
    }
}

#[derive(Debug, Clone)]
pub struct DependencyPropagator {
    sender: UpdateSender,
}

impl DependencyPropagator {
    pub fn new(sender: UpdateSender) -> Self {
        Self { sender }
    }

    // 앞, 뒤, 양 옆 네 방향 모두 검사하여 옆에서 읽는 게이트도 포함
    // 출력 칸 바로 뒤의 게이트 자신도 다시 예약됨
    pub fn dependents(registry: &GateRegistry, output: Position, facing: Facing) -> Vec<Position> {
        [
            facing,
            facing.opposite(),
            facing.rotate_cw(),
            facing.rotate_ccw(),
        ]
        .into_iter()
        .map(|dir| output.step(dir))
        .filter(|&pos| registry.contains(pos))
        .collect_vec()
    }

    pub fn schedule(&self, registry: &GateRegistry, output: Position, facing: Facing) -> usize {
        let dependents = Self::dependents(registry, output, facing);

        for &pos in &dependents {
            self.sender.enqueue(pos);
        }

        dependents.len()
    }
}
