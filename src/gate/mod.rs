use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::world::Facing;

pub mod eval;

pub use eval::{evaluate, GateInputs};

pub const DEFAULT_INTERVAL_MS: u64 = 1000;

#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GateType {
    And,
    Or,
    Not,
    Nand,
    Nor,
    Xor,
    Xnor,
    Implication,
    RsLatch,
    Timer,
}

impl GateType {
    pub fn supports_three_input(&self) -> bool {
        !matches!(self, GateType::Not | GateType::Timer | GateType::RsLatch)
    }
}

// 순수 조합 논리 게이트의 연산
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LogicOp {
    And,
    Or,
    Not,
    Nand,
    Nor,
    Xor,
    Xnor,
    Implication,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Behavior {
    Logic(LogicOp),
    // 출력 자체가 래치의 기억
    RsLatch,
    Timer {
        interval: u64,
        last_toggle_time: u64,
    },
}

impl Behavior {
    fn new(gate_type: GateType, now_ms: u64) -> Self {
        match gate_type {
            GateType::And => Behavior::Logic(LogicOp::And),
            GateType::Or => Behavior::Logic(LogicOp::Or),
            GateType::Not => Behavior::Logic(LogicOp::Not),
            GateType::Nand => Behavior::Logic(LogicOp::Nand),
            GateType::Nor => Behavior::Logic(LogicOp::Nor),
            GateType::Xor => Behavior::Logic(LogicOp::Xor),
            GateType::Xnor => Behavior::Logic(LogicOp::Xnor),
            GateType::Implication => Behavior::Logic(LogicOp::Implication),
            GateType::RsLatch => Behavior::RsLatch,
            GateType::Timer => Behavior::Timer {
                interval: DEFAULT_INTERVAL_MS,
                last_toggle_time: now_ms,
            },
        }
    }

    pub fn gate_type(&self) -> GateType {
        match self {
            Behavior::Logic(op) => match op {
                LogicOp::And => GateType::And,
                LogicOp::Or => GateType::Or,
                LogicOp::Not => GateType::Not,
                LogicOp::Nand => GateType::Nand,
                LogicOp::Nor => GateType::Nor,
                LogicOp::Xor => GateType::Xor,
                LogicOp::Xnor => GateType::Xnor,
                LogicOp::Implication => GateType::Implication,
            },
            Behavior::RsLatch => GateType::RsLatch,
            Behavior::Timer { .. } => GateType::Timer,
        }
    }
}

// 게이트 종류는 만들 때 정해지고 바뀌지 않음
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateState {
    behavior: Behavior,
    pub facing: Facing,
    pub output_state: bool,
    three_input_enabled: bool,
}

impl GateState {
    pub fn new(gate_type: GateType, facing: Facing, now_ms: u64) -> Self {
        Self {
            behavior: Behavior::new(gate_type, now_ms),
            facing,
            output_state: false,
            three_input_enabled: false,
        }
    }

    pub fn gate_type(&self) -> GateType {
        self.behavior.gate_type()
    }

    pub fn behavior(&self) -> &Behavior {
        &self.behavior
    }

    pub fn is_timer(&self) -> bool {
        matches!(self.behavior, Behavior::Timer { .. })
    }

    pub fn three_input_enabled(&self) -> bool {
        self.three_input_enabled
    }

    pub fn set_three_input(&mut self, enabled: bool) -> eyre::Result<()> {
        let gate_type = self.gate_type();
        eyre::ensure!(
            !enabled || gate_type.supports_three_input(),
            "{gate_type} gate cannot take a third input"
        );

        self.three_input_enabled = enabled;
        Ok(())
    }

    pub fn interval(&self) -> Option<u64> {
        match self.behavior {
            Behavior::Timer { interval, .. } => Some(interval),
            _ => None,
        }
    }

    pub fn last_toggle_time(&self) -> Option<u64> {
        match self.behavior {
            Behavior::Timer {
                last_toggle_time, ..
            } => Some(last_toggle_time),
            _ => None,
        }
    }

    pub fn set_interval(&mut self, ms: u64) -> eyre::Result<()> {
        eyre::ensure!(ms >= 1, "timer interval must be at least 1 ms");

        let Behavior::Timer {
            ref mut interval, ..
        } = self.behavior
        else {
            eyre::bail!("{} gate has no interval", self.gate_type());
        };

        *interval = ms;
        Ok(())
    }

    pub fn set_last_toggle_time(&mut self, ms: u64) {
        if let Behavior::Timer {
            ref mut last_toggle_time,
            ..
        } = self.behavior
        {
            *last_toggle_time = ms;
        }
    }
}
