#[derive(Debug, Clone, Copy)]
pub struct Clock {
    tick: u64,
    tick_millis: u64,
}

impl Clock {
    pub fn new(tick_millis: u64) -> Self {
        Self {
            tick: 0,
            tick_millis,
        }
    }

    pub fn advance(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    // 경과 시간 (ms), 틱 단위로만 증가
    pub fn millis(&self) -> u64 {
        self.tick * self.tick_millis
    }
}
