//! Host input buffering: one command per tick

use std::collections::VecDeque;

use crate::sim::{Command, Direction, TickInput};

/// Commands buffered beyond this are dropped
const QUEUE_CAPACITY: usize = 16;

/// FIFO of pending commands; each tick consumes at most one
#[derive(Debug, Default)]
pub struct CommandQueue {
    pending: VecDeque<Command>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: Command) {
        if self.pending.len() >= QUEUE_CAPACITY {
            log::warn!("Input queue full, dropping {:?}", command);
            return;
        }
        self.pending.push_back(command);
    }

    /// Input for the next tick
    pub fn next_input(&mut self) -> TickInput {
        TickInput {
            command: self.pending.pop_front(),
        }
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_command_per_tick() {
        let mut queue = CommandQueue::new();
        queue.push(Command::Confirm);
        queue.push(Command::Move(Direction::Left));

        assert_eq!(queue.next_input().command, Some(Command::Confirm));
        assert_eq!(
            queue.next_input().command,
            Some(Command::Move(Direction::Left))
        );
        assert_eq!(queue.next_input().command, None);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_queue_is_bounded() {
        let mut queue = CommandQueue::new();
        for _ in 0..QUEUE_CAPACITY + 5 {
            queue.push(Command::Move(Direction::Up));
        }
        assert_eq!(queue.len(), QUEUE_CAPACITY);
        queue.clear();
        assert!(queue.is_empty());
    }
}
