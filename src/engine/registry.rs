use std::collections::HashMap;
use std::sync::Arc;

use itertools::Itertools;
use parking_lot::RwLock;

use crate::gate::{GateState, GateType};
use crate::world::{Facing, Position};

#[derive(Debug, Default)]
pub struct GateRegistry {
    gates: RwLock<HashMap<Position, GateState>>,
}

impl GateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &self,
        pos: Position,
        gate_type: GateType,
        facing: Facing,
        now_ms: u64,
    ) -> GateState {
        let state = GateState::new(gate_type, facing, now_ms);
        self.insert(pos, state.clone());
        state
    }

    pub fn insert(&self, pos: Position, state: GateState) -> Option<GateState> {
        self.gates.write().insert(pos, state)
    }

    pub fn get(&self, pos: Position) -> Option<GateState> {
        self.gates.read().get(&pos).cloned()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.gates.read().contains_key(&pos)
    }

    pub fn remove(&self, pos: Position) -> Option<GateState> {
        self.gates.write().remove(&pos)
    }

    pub fn modify<R>(&self, pos: Position, f: impl FnOnce(&mut GateState) -> R) -> Option<R> {
        self.gates.write().get_mut(&pos).map(f)
    }

    // 같은 종류의 게이트가 아직 있을 때만 저장
    pub fn replace_existing(&self, pos: Position, state: GateState) -> bool {
        let mut gates = self.gates.write();

        match gates.get_mut(&pos) {
            Some(current) if current.gate_type() == state.gate_type() => {
                *current = state;
                true
            }
            _ => false,
        }
    }

    // 복사본을 돌기 때문에 f 안에서 registry를 써도 됨
    pub fn for_each(&self, mut f: impl FnMut(Position, &GateState)) {
        for (pos, state) in self.snapshot() {
            f(pos, &state);
        }
    }

    pub fn snapshot(&self) -> Vec<(Position, GateState)> {
        self.gates
            .read()
            .iter()
            .map(|(pos, state)| (*pos, state.clone()))
            .sorted_by_key(|(pos, _)| *pos)
            .collect_vec()
    }

    pub fn positions_of(&self, gate_type: GateType) -> Vec<Position> {
        self.gates
            .read()
            .iter()
            .filter(|(_, state)| state.gate_type() == gate_type)
            .map(|(pos, _)| *pos)
            .sorted()
            .collect_vec()
    }

    pub fn len(&self) -> usize {
        self.gates.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.gates.read().is_empty()
    }
}

// 다른 스레드에 넘겨주는 읽기 전용 핸들, 게이트 변경은 엔진만 함
#[derive(Debug, Clone)]
pub struct GateView {
    registry: Arc<GateRegistry>,
}

impl GateView {
    pub(crate) fn new(registry: Arc<GateRegistry>) -> Self {
        Self { registry }
    }

    pub fn get(&self, pos: Position) -> Option<GateState> {
        self.registry.get(pos)
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.registry.contains(pos)
    }

    pub fn snapshot(&self) -> Vec<(Position, GateState)> {
        self.registry.snapshot()
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }
}
