//! Snapshot stack backing undo

use crate::game::GameState;

/// Full-state snapshots, most recent last
#[derive(Clone, Debug, Default)]
pub struct History {
    snapshots: Vec<GameState>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, snapshot: GameState) {
        self.snapshots.push(snapshot);
    }

    pub fn pop(&mut self) -> Option<GameState> {
        self.snapshots.pop()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
