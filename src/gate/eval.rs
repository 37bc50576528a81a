use super::{Behavior, GateState, LogicOp};

// 게이트가 바라보는 방향 기준 왼쪽, 오른쪽, 뒤의 입력
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct GateInputs {
    pub left: bool,
    pub right: bool,
    pub back: bool,
}

impl GateInputs {
    pub fn new(left: bool, right: bool, back: bool) -> Self {
        Self { left, right, back }
    }
}

fn logic_output(op: LogicOp, inputs: GateInputs, three_input: bool) -> bool {
    let GateInputs { left, right, back } = inputs;

    match op {
        LogicOp::Not => !left,
        LogicOp::And if three_input => left && right && back,
        LogicOp::And => left && right,
        LogicOp::Or if three_input => left || right || back,
        LogicOp::Or => left || right,
        LogicOp::Nand if three_input => !(left && right && back),
        LogicOp::Nand => !(left && right),
        LogicOp::Nor if three_input => !(left || right || back),
        LogicOp::Nor => !(left || right),
        // 홀수 개의 입력이 켜져 있으면 참
        LogicOp::Xor if three_input => left ^ right ^ back,
        LogicOp::Xor => left != right,
        LogicOp::Xnor if three_input => left == right && right == back,
        LogicOp::Xnor => left == right,
        LogicOp::Implication if three_input => !left || !right || back,
        LogicOp::Implication => !left || right,
    }
}

// RS_LATCH와 TIMER는 여기서 자기 상태를 갱신함
// 반환값을 output_state에 저장하는 것은 호출하는 쪽
pub fn evaluate(state: &mut GateState, inputs: GateInputs, now_ms: u64) -> bool {
    let three_input = state.three_input_enabled;

    match state.behavior {
        Behavior::Logic(op) => logic_output(op, inputs, three_input),
        Behavior::RsLatch => {
            let (set, reset) = (inputs.left, inputs.right);

            // 둘 다 켜져 있으면 이전 상태 유지
            if set && !reset {
                state.output_state = true;
            } else if reset && !set {
                state.output_state = false;
            }

            state.output_state
        }
        Behavior::Timer {
            interval,
            ref mut last_toggle_time,
        } => {
            if now_ms.saturating_sub(*last_toggle_time) >= interval {
                state.output_state = !state.output_state;
                *last_toggle_time = now_ms;
            }

            state.output_state
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use rstest::rstest;

    use super::*;
    use crate::gate::GateType;
    use crate::world::Facing;

    fn eval_once(gate_type: GateType, three_input: bool, inputs: (bool, bool, bool)) -> bool {
        let mut state = GateState::new(gate_type, Facing::North, 0);
        state.set_three_input(three_input).unwrap();
        evaluate(&mut state, GateInputs::new(inputs.0, inputs.1, inputs.2), 0)
    }

    #[rstest]
    #[case(GateType::And, [false, false, false, true])]
    #[case(GateType::Or, [false, true, true, true])]
    #[case(GateType::Nand, [true, true, true, false])]
    #[case(GateType::Nor, [true, false, false, false])]
    #[case(GateType::Xor, [false, true, true, false])]
    #[case(GateType::Xnor, [true, false, false, true])]
    #[case(GateType::Implication, [true, true, false, true])]
    fn unittest_two_input_truth_table(#[case] gate_type: GateType, #[case] expected: [bool; 4]) {
        let rows = [(false, false), (false, true), (true, false), (true, true)];

        for ((left, right), expected) in rows.into_iter().zip(expected) {
            // 2입력 모드에서는 back이 무시됨
            for back in [false, true] {
                assert_eq!(
                    eval_once(gate_type, false, (left, right, back)),
                    expected,
                    "{gate_type} left={left} right={right} back={back}"
                );
            }
        }
    }

    #[rstest]
    #[case(GateType::And)]
    #[case(GateType::Or)]
    #[case(GateType::Nand)]
    #[case(GateType::Nor)]
    #[case(GateType::Xor)]
    #[case(GateType::Xnor)]
    #[case(GateType::Implication)]
    fn unittest_three_input_truth_table(#[case] gate_type: GateType) {
        for bits in 0..8u8 {
            let (l, r, b) = (bits & 1 != 0, bits & 2 != 0, bits & 4 != 0);
            let ones = bits.count_ones();

            let expected = match gate_type {
                GateType::And => ones == 3,
                GateType::Or => ones > 0,
                GateType::Nand => ones != 3,
                GateType::Nor => ones == 0,
                GateType::Xor => ones % 2 == 1,
                GateType::Xnor => ones == 0 || ones == 3,
                GateType::Implication => !l || !r || b,
                _ => unreachable!(),
            };

            assert_eq!(
                eval_once(gate_type, true, (l, r, b)),
                expected,
                "{gate_type} left={l} right={r} back={b}"
            );
        }
    }

    #[test]
    fn unittest_not_ignores_right_and_back() {
        for bits in 0..8u8 {
            let (l, r, b) = (bits & 1 != 0, bits & 2 != 0, bits & 4 != 0);
            assert_eq!(eval_once(GateType::Not, false, (l, r, b)), !l);
        }
    }

    #[test]
    fn unittest_rs_latch_sequence() {
        let mut latch = GateState::new(GateType::RsLatch, Facing::East, 0);

        let outputs = [(true, false), (false, false), (false, true), (true, true)]
            .into_iter()
            .map(|(set, reset)| evaluate(&mut latch, GateInputs::new(set, reset, false), 0))
            .collect::<Vec<_>>();

        assert_eq!(outputs, vec![true, true, false, false]);
    }

    #[test]
    fn unittest_rs_latch_holds_on_conflict_when_high() {
        let mut latch = GateState::new(GateType::RsLatch, Facing::East, 0);

        assert!(evaluate(&mut latch, GateInputs::new(true, false, false), 0));
        assert!(evaluate(&mut latch, GateInputs::new(true, true, false), 0));
        assert!(latch.output_state);
    }

    #[test]
    fn unittest_rs_latch_against_reference_model() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut latch = GateState::new(GateType::RsLatch, Facing::East, 0);
        let mut model = false;

        for _ in 0..1000 {
            let (set, reset, back): (bool, bool, bool) = rng.gen();

            model = match (set, reset) {
                (true, false) => true,
                (false, true) => false,
                _ => model,
            };

            assert_eq!(
                evaluate(&mut latch, GateInputs::new(set, reset, back), 0),
                model
            );
        }
    }

    #[test]
    fn unittest_timer_toggles_on_interval() {
        let mut timer = GateState::new(GateType::Timer, Facing::East, 0);

        assert!(!evaluate(&mut timer, GateInputs::new(true, true, true), 999));
        assert!(evaluate(&mut timer, GateInputs::default(), 1000));
        assert_eq!(timer.last_toggle_time(), Some(1000));
        assert!(evaluate(&mut timer, GateInputs::default(), 1999));
        assert!(!evaluate(&mut timer, GateInputs::default(), 2000));
    }

    #[test]
    fn unittest_timer_clock_behind_last_toggle() {
        let mut timer = GateState::new(GateType::Timer, Facing::East, 5000);

        assert!(!evaluate(&mut timer, GateInputs::default(), 0));
        assert_eq!(timer.last_toggle_time(), Some(5000));
    }
}
