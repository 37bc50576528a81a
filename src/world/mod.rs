use crate::gate::GateType;

pub mod block;
pub mod position;
pub mod world;

pub use block::{BlockKind, Direction, Facing};
pub use position::{Position, Region};
pub use world::GridWorld;

pub trait SignalProbe {
    // pos에서 dir 쪽 이웃 칸의 신호, 읽을 수 없으면 false
    fn read(&self, pos: Position, dir: Direction) -> bool;

    // 방향 규칙 없이 칸 자체가 켜져 있는지
    fn is_powered(&self, pos: Position) -> bool;

    fn is_empty(&self, pos: Position) -> bool;
}

pub trait OutputSink {
    // 이미 같은 값이면 세계를 바꾸지 않아야 함
    fn write(&mut self, pos: Position, on: bool) -> eyre::Result<()>;
}

pub trait StructureValidator {
    fn is_valid_gate_body(&self, pos: Position) -> bool;

    fn has_activation_marker(&self, pos: Position) -> bool;

    fn marker_type(&self, pos: Position) -> Option<GateType>;

    fn is_marker_block(&self, pos: Position) -> bool;
}

pub trait GateWorld: SignalProbe + OutputSink + StructureValidator {}

impl<T: SignalProbe + OutputSink + StructureValidator> GateWorld for T {}
