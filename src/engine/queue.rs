use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::world::Position;

#[derive(Debug, Clone, Default, PartialEq, Eq, derive_more::Deref)]
pub struct Batch {
    #[deref]
    positions: Vec<Position>,
}

impl IntoIterator for Batch {
    type Item = Position;
    type IntoIter = std::vec::IntoIter<Position>;

    fn into_iter(self) -> Self::IntoIter {
        self.positions.into_iter()
    }
}

// 다른 스레드에서 위치를 넣을 때 쓰는 쪽
#[derive(Debug, Clone)]
pub struct UpdateSender {
    sender: Sender<Position>,
}

impl UpdateSender {
    pub fn enqueue(&self, pos: Position) {
        tracing::trace!("enqueue {:?}", pos);

        // 받는 쪽이 사라졌으면 엔진이 종료된 것이므로 무시
        let _ = self.sender.send(pos);
    }

    pub fn notify_neighbors(&self, pos: Position) {
        for neighbor in pos.cardinal() {
            self.enqueue(neighbor);
        }
    }
}

// 순서 없음, 중복 허용
#[derive(Debug)]
pub struct UpdateQueue {
    sender: UpdateSender,
    receiver: Receiver<Position>,
}

impl Default for UpdateQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateQueue {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();

        Self {
            sender: UpdateSender { sender },
            receiver,
        }
    }

    pub fn sender(&self) -> UpdateSender {
        self.sender.clone()
    }

    pub fn enqueue(&self, pos: Position) {
        self.sender.enqueue(pos);
    }

    // 꺼내는 도중 들어온 것은 다음 묶음으로
    pub fn drain(&self) -> Batch {
        let pending = self.receiver.len();

        Batch {
            positions: self.receiver.try_iter().take(pending).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use itertools::Itertools;

    use super::*;

    #[test]
    fn unittest_drain_empties_queue() {
        let queue = UpdateQueue::new();
        queue.enqueue(Position(1, 0, 0));
        queue.enqueue(Position(1, 0, 0));
        queue.enqueue(Position(2, 0, 0));

        let batch = queue.drain();
        assert_eq!(batch.len(), 3);
        assert!(queue.is_empty());
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn unittest_multiple_producers() {
        let queue = UpdateQueue::new();

        let handles = (0..4)
            .map(|t| {
                let sender = queue.sender();
                thread::spawn(move || {
                    for x in 0..50 {
                        sender.enqueue(Position(x, t, 0));
                    }
                })
            })
            .collect_vec();

        for handle in handles {
            handle.join().unwrap();
        }

        let batch = queue.drain();
        assert_eq!(batch.len(), 200);
        assert_eq!(batch.iter().unique().count(), 200);
    }

    #[test]
    fn unittest_notify_neighbors() {
        let queue = UpdateQueue::new();
        queue.sender().notify_neighbors(Position(0, 0, 0));

        let batch = queue.drain().into_iter().sorted().collect_vec();
        assert_eq!(
            batch,
            vec![
                Position(-1, 0, 0),
                Position(0, -1, 0),
                Position(0, 1, 0),
                Position(1, 0, 0),
            ]
        );
    }
}
