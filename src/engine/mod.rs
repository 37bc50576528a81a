// 게이트 상태는 엔진을 가진 스레드에서만 바뀜
// 다른 스레드는 UpdateSender로 위치를 넣거나 GateView로 읽기만 함

use std::collections::HashSet;
use std::sync::Arc;

use crate::config::{EngineConfig, NotInput};
use crate::gate::{evaluate, GateInputs, GateState, GateType};
use crate::world::{Facing, GateWorld, Position, SignalProbe, StructureValidator};

pub mod clock;
pub mod cooldown;
pub mod propagate;
pub mod queue;
pub mod registry;

use self::clock::Clock;
use self::cooldown::CooldownGate;
use self::propagate::{output_cell, DependencyPropagator};
use self::queue::{Batch, UpdateQueue, UpdateSender};
use self::registry::{GateRegistry, GateView};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub tick: u64,
    pub timers: usize,
    pub drained: usize,
    pub evaluated: usize,
    pub writes: usize,
    // 쿨다운에 걸려 다음 틱으로 넘긴 수
    pub deferred: usize,
    // 쿨다운에 걸렸지만 출력이 바뀌지 않아 버린 수
    pub throttled: usize,
    pub skipped: usize,
    pub faults: usize,
}

impl TickReport {
    pub fn merge(&mut self, other: &TickReport) {
        self.tick = other.tick;
        self.timers += other.timers;
        self.drained += other.drained;
        self.evaluated += other.evaluated;
        self.writes += other.writes;
        self.deferred += other.deferred;
        self.throttled += other.throttled;
        self.skipped += other.skipped;
        self.faults += other.faults;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inspection {
    pub gate_type: GateType,
    pub facing: Facing,
    pub three_input: bool,
    pub inputs: GateInputs,
    pub output_state: bool,
    // 지금 평가하면 나올 출력
    pub output: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Outcome {
    Skipped,
    Deferred,
    Throttled,
    Evaluated { wrote: bool },
}

pub struct Engine {
    config: EngineConfig,
    clock: Clock,
    cooldown: CooldownGate,
    registry: Arc<GateRegistry>,
    queue: UpdateQueue,
    propagator: DependencyPropagator,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        let queue = UpdateQueue::new();

        Self {
            clock: Clock::new(config.tick_millis),
            cooldown: CooldownGate::new(config.cooldown_ticks()),
            registry: Arc::new(GateRegistry::new()),
            propagator: DependencyPropagator::new(queue.sender()),
            queue,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub(crate) fn registry(&self) -> &GateRegistry {
        &self.registry
    }

    pub fn view(&self) -> GateView {
        GateView::new(Arc::clone(&self.registry))
    }

    pub fn sender(&self) -> UpdateSender {
        self.queue.sender()
    }

    pub fn set_fast_mode(&mut self, fast_mode: bool) {
        self.config.fast_mode = fast_mode;
        self.cooldown.set_min_ticks(self.config.cooldown_ticks());
    }

    pub fn set_not_gate_input(&mut self, not_input: NotInput) {
        self.config.not_gate_input = not_input;
    }

    pub fn get(&self, pos: Position) -> Option<GateState> {
        self.registry.get(pos)
    }

    // 이미 있던 게이트는 덮어씀
    pub fn register(&mut self, pos: Position, gate_type: GateType, facing: Facing) -> GateState {
        let mut state = GateState::new(gate_type, facing, self.clock.millis());
        if state.is_timer() {
            if let Err(err) = state.set_interval(self.config.default_interval_ms) {
                tracing::warn!("timer at {:?} keeps the built-in interval: {:#}", pos, err);
            }
        }

        self.registry.insert(pos, state.clone());
        self.cooldown.forget(pos);

        tracing::info!("registered {} gate at {:?} facing {}", gate_type, pos, facing);
        state
    }

    pub fn place(
        &mut self,
        pos: Position,
        facing: Facing,
        world: &impl StructureValidator,
    ) -> eyre::Result<GateState> {
        eyre::ensure!(
            world.is_valid_gate_body(pos),
            "no gate body at {:?}",
            pos
        );
        let Some(gate_type) = world.marker_type(pos) else {
            eyre::bail!("no activation marker on top of {:?}", pos);
        };

        let state = self.register(pos, gate_type, facing);
        self.enqueue(pos);

        Ok(state)
    }

    pub fn remove(&mut self, pos: Position) -> Option<GateState> {
        let removed = self.registry.remove(pos);
        self.cooldown.forget(pos);

        if let Some(state) = &removed {
            tracing::info!("removed {} gate at {:?}", state.gate_type(), pos);
        }

        removed
    }

    // 시계 방향으로 한 칸
    pub fn rotate(&mut self, pos: Position) -> eyre::Result<Facing> {
        let Some(facing) = self.registry.modify(pos, |state| {
            state.facing = state.facing.rotate_cw();
            state.facing
        }) else {
            eyre::bail!("no gate at {:?}", pos);
        };

        self.enqueue(pos);
        Ok(facing)
    }

    pub fn toggle_three_input(&mut self, pos: Position) -> eyre::Result<bool> {
        let Some(result) = self.registry.modify(pos, |state| {
            let enabled = !state.three_input_enabled();
            state.set_three_input(enabled).map(|_| enabled)
        }) else {
            eyre::bail!("no gate at {:?}", pos);
        };

        let enabled = result?;
        self.enqueue(pos);
        Ok(enabled)
    }

    pub fn set_interval(&mut self, pos: Position, ms: u64) -> eyre::Result<()> {
        let Some(result) = self.registry.modify(pos, |state| state.set_interval(ms)) else {
            eyre::bail!("no gate at {:?}", pos);
        };

        result
    }

    pub fn enqueue(&self, pos: Position) {
        self.queue.enqueue(pos);
    }

    pub fn drain(&self) -> Batch {
        self.queue.drain()
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    // 몸체가 사라진 게이트는 건너뜀
    pub fn restore(
        &mut self,
        gates: impl IntoIterator<Item = (Position, GateState)>,
        world: &impl StructureValidator,
    ) -> usize {
        let now_ms = self.clock.millis();
        let mut restored = 0;

        for (pos, mut state) in gates {
            if !world.is_valid_gate_body(pos) {
                tracing::warn!("skipping saved gate at {:?}: body is missing", pos);
                continue;
            }

            // 이전 실행의 시각이 현재 시계보다 앞서면 지금으로 당김
            if state.last_toggle_time().is_some_and(|last| last > now_ms) {
                state.set_last_toggle_time(now_ms);
            }

            self.registry.insert(pos, state);
            self.cooldown.forget(pos);
            self.enqueue(pos);
            restored += 1;
        }

        tracing::info!("restored {} gates", restored);
        restored
    }

    // 상태를 바꾸지 않음
    pub fn inspect<W>(&self, pos: Position, world: &W) -> Option<Inspection>
    where
        W: SignalProbe + StructureValidator,
    {
        let state = self.registry.get(pos)?;
        let inputs = sample_inputs(world, pos, &state, self.config.not_gate_input);

        let mut trial = state.clone();
        let output = evaluate(&mut trial, inputs, self.clock.millis());

        Some(Inspection {
            gate_type: state.gate_type(),
            facing: state.facing,
            three_input: state.three_input_enabled(),
            inputs,
            output_state: state.output_state,
            output,
        })
    }

    // 타이머를 먼저 돌리고 큐에 쌓인 위치를 처리
    pub fn tick(&mut self, world: &mut impl GateWorld) -> TickReport {
        let now_tick = self.clock.advance();
        let mut report = TickReport {
            tick: now_tick,
            ..Default::default()
        };
        let mut visited = HashSet::new();

        for pos in self.registry.positions_of(GateType::Timer) {
            report.timers += 1;
            visited.insert(pos);
            self.run(pos, world, true, &mut report);
        }

        let batch = self.queue.drain();
        report.drained = batch.len();

        for pos in batch {
            // 한 틱에 게이트 하나는 한 번만 평가
            if !visited.insert(pos) {
                continue;
            }
            self.run(pos, world, false, &mut report);
        }

        tracing::trace!("{:?}", report);
        report
    }

    fn run(
        &mut self,
        pos: Position,
        world: &mut impl GateWorld,
        time_triggered: bool,
        report: &mut TickReport,
    ) {
        match self.process(pos, world, time_triggered) {
            Ok(Outcome::Skipped) => report.skipped += 1,
            Ok(Outcome::Deferred) => report.deferred += 1,
            Ok(Outcome::Throttled) => report.throttled += 1,
            Ok(Outcome::Evaluated { wrote }) => {
                report.evaluated += 1;
                if wrote {
                    report.writes += 1;
                }
            }
            Err(err) => {
                report.faults += 1;
                tracing::warn!("failed to update gate at {:?}: {:#}", pos, err);
            }
        }
    }

    fn process(
        &mut self,
        pos: Position,
        world: &mut impl GateWorld,
        time_triggered: bool,
    ) -> eyre::Result<Outcome> {
        if !world.is_valid_gate_body(pos) || !world.has_activation_marker(pos) {
            return Ok(Outcome::Skipped);
        }
        let Some(mut state) = self.registry.get(pos) else {
            return Ok(Outcome::Skipped);
        };

        let facing = state.facing;
        let output = output_cell(pos, facing, world);
        let forced = state.output_state != world.is_powered(output);

        let inputs = sample_inputs(world, pos, &state, self.config.not_gate_input);

        let now_tick = self.clock.tick();
        if !self.cooldown.may_update(pos, forced || time_triggered, now_tick) {
            // 출력이 바뀔 때만 다음 틱에 다시 시도, 아니면 버림
            let mut trial = state.clone();
            if evaluate(&mut trial, inputs, self.clock.millis()) != state.output_state {
                self.enqueue(pos);
                return Ok(Outcome::Deferred);
            }
            return Ok(Outcome::Throttled);
        }

        let previous = state.output_state;
        let candidate = evaluate(&mut state, inputs, self.clock.millis());

        let needs_write =
            matches!(state.gate_type(), GateType::RsLatch) || forced || candidate != previous;

        if needs_write {
            world.write(output, candidate)?;
        }
        state.output_state = candidate;

        tracing::debug!(
            "{} gate at {:?} facing {}: {:?} -> {}{}",
            state.gate_type(),
            pos,
            facing,
            inputs,
            candidate,
            if forced { " (forced)" } else { "" }
        );

        self.registry.replace_existing(pos, state);
        self.propagator.schedule(&self.registry, output, facing);

        Ok(Outcome::Evaluated { wrote: needs_write })
    }
}

// 비어 있는 칸은 항상 꺼진 입력
pub fn sample_inputs(
    world: &impl SignalProbe,
    pos: Position,
    state: &GateState,
    not_input: NotInput,
) -> GateInputs {
    let facing = state.facing;
    let read = |face: Facing| !world.is_empty(pos.step(face)) && world.read(pos, face.into());

    let mut inputs = GateInputs::new(read(facing.rotate_ccw()), read(facing.rotate_cw()), false);

    if state.gate_type() == GateType::Not && not_input == NotInput::Opposite {
        inputs.left = read(facing.opposite());
    }

    if state.three_input_enabled() {
        inputs.back = read(facing.opposite());
    }

    inputs
}
