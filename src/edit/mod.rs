// 영역 단위 편집: stash -> 세계 변경 -> scan_region -> apply_candidates

use std::collections::HashMap;

use itertools::Itertools;
use rayon::prelude::*;

use crate::engine::Engine;
use crate::gate::GateType;
use crate::world::{Facing, Position, Region, StructureValidator};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct GateCandidate {
    pub position: Position,
    pub facing: Facing,
    pub gate_type: GateType,
}

// 편집 전후로 보존하는 게이트 정보
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct GateMetadata {
    pub gate_type: GateType,
    pub facing: Facing,
    pub three_input_enabled: bool,
    pub output_state: bool,
    pub interval: Option<u64>,
}

pub type Stash = HashMap<Position, GateMetadata>;

// 영역 안의 게이트 구조를 모두 찾음, 방향은 동쪽으로 둠
pub fn scan_region<V>(region: &Region, world: &V) -> Vec<GateCandidate>
where
    V: StructureValidator + Sync,
{
    region
        .iter_pos()
        .into_par_iter()
        .filter(|&pos| world.is_valid_gate_body(pos))
        .filter_map(|pos| {
            world.marker_type(pos).map(|gate_type| GateCandidate {
                position: pos,
                facing: Facing::default(),
                gate_type,
            })
        })
        .collect::<Vec<_>>()
        .into_iter()
        .sorted_by_key(|candidate| candidate.position)
        .collect_vec()
}

pub fn stash(engine: &Engine, region: &Region) -> Stash {
    engine
        .registry()
        .snapshot()
        .into_iter()
        .filter(|(pos, _)| region.bound_on(*pos))
        .map(|(pos, state)| {
            let metadata = GateMetadata {
                gate_type: state.gate_type(),
                facing: state.facing,
                three_input_enabled: state.three_input_enabled(),
                output_state: state.output_state,
                interval: state.interval(),
            };
            (pos, metadata)
        })
        .collect()
}

// 구조가 사라진 게이트는 지움
pub fn apply_candidates(engine: &mut Engine, candidates: &[GateCandidate], stash: &Stash) -> usize {
    for pos in stash.keys().sorted() {
        if !candidates.iter().any(|candidate| candidate.position == *pos) {
            engine.remove(*pos);
        }
    }

    for candidate in candidates {
        let metadata = stash.get(&candidate.position);
        let facing = metadata.map_or(candidate.facing, |metadata| metadata.facing);

        engine.register(candidate.position, candidate.gate_type, facing);

        // 종류가 바뀐 게이트는 방향만 이어받음
        if let Some(metadata) = metadata.filter(|m| m.gate_type == candidate.gate_type) {
            engine.registry().modify(candidate.position, |state| {
                state.output_state = metadata.output_state;
                if state.gate_type().supports_three_input() {
                    let _ = state.set_three_input(metadata.three_input_enabled);
                }
                if let Some(interval) = metadata.interval {
                    let _ = state.set_interval(interval);
                }
            });
        }

        engine.enqueue(candidate.position);
    }

    tracing::info!(
        "applied {} gate candidates ({} stashed)",
        candidates.len(),
        stash.len()
    );
    candidates.len()
}
