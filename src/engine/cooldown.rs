use std::collections::HashMap;

use crate::world::Position;

#[derive(Debug, Clone)]
pub struct CooldownGate {
    min_ticks: u64,
    last_update: HashMap<Position, u64>,
}

impl CooldownGate {
    pub fn new(min_ticks: u64) -> Self {
        Self {
            min_ticks: min_ticks.max(1),
            last_update: HashMap::new(),
        }
    }

    pub fn min_ticks(&self) -> u64 {
        self.min_ticks
    }

    pub fn set_min_ticks(&mut self, min_ticks: u64) {
        self.min_ticks = min_ticks.max(1);
    }

    // forced면 간격 검사는 건너뛰지만 시각은 기록함
    pub fn may_update(&mut self, pos: Position, forced: bool, now_tick: u64) -> bool {
        if !forced {
            if let Some(&last) = self.last_update.get(&pos) {
                if now_tick.saturating_sub(last) < self.min_ticks {
                    return false;
                }
            }
        }

        self.last_update.insert(pos, now_tick);
        true
    }

    pub fn forget(&mut self, pos: Position) {
        self.last_update.remove(&pos);
    }

    pub fn len(&self) -> usize {
        self.last_update.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_update.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POS: Position = Position(3, 4, 5);

    #[test]
    fn unittest_first_update_always_passes() {
        let mut cooldown = CooldownGate::new(2);
        assert!(cooldown.may_update(POS, false, 0));
        assert_eq!(cooldown.len(), 1);
    }

    #[test]
    fn unittest_consecutive_ticks_are_throttled() {
        let mut cooldown = CooldownGate::new(2);

        assert!(cooldown.may_update(POS, false, 10));
        assert!(!cooldown.may_update(POS, false, 11));
        assert!(cooldown.may_update(POS, false, 12));

        // 다른 위치는 독립적
        assert!(cooldown.may_update(Position(0, 0, 0), false, 12));
    }

    #[test]
    fn unittest_forced_updates_bypass() {
        let mut cooldown = CooldownGate::new(2);

        assert!(cooldown.may_update(POS, true, 10));
        assert!(cooldown.may_update(POS, true, 11));
        // 강제 갱신도 기록은 남김
        assert!(!cooldown.may_update(POS, false, 12));
        assert!(cooldown.may_update(POS, false, 13));
    }

    #[test]
    fn unittest_fast_mode() {
        let mut cooldown = CooldownGate::new(2);
        cooldown.set_min_ticks(1);

        assert!(cooldown.may_update(POS, false, 1));
        assert!(cooldown.may_update(POS, false, 2));
        assert!(!cooldown.may_update(POS, false, 2));

        cooldown.set_min_ticks(0);
        assert_eq!(cooldown.min_ticks(), 1);
    }

    #[test]
    fn unittest_forget() {
        let mut cooldown = CooldownGate::new(2);

        assert!(cooldown.may_update(POS, false, 1));
        cooldown.forget(POS);
        assert!(cooldown.is_empty());
        assert!(cooldown.may_update(POS, false, 2));
    }
}
