//! Undo and redo over whole-scene snapshots

use tracing::debug;

use crate::error::EngineError;
use crate::scene::{Effect, Scene, SceneStore};

/// Snapshot stacks for undo/redo.
///
/// Each entry is the full scene as it was before one batch changed it.
#[derive(Debug, Clone, Default)]
pub struct History {
    undo_stack: Vec<Scene>,
    redo_stack: Vec<Scene>,
    /// Maximum undo depth; `None` keeps everything
    limit: Option<usize>,
}

impl History {
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            limit,
        }
    }

    /// Push the state before a change. Any pending redo is discarded.
    pub fn record(&mut self, before: Scene) {
        self.undo_stack.push(before);
        self.redo_stack.clear();
        if let Some(limit) = self.limit {
            let excess = self.undo_stack.len().saturating_sub(limit);
            if excess > 0 {
                self.undo_stack.drain(..excess);
            }
        }
    }

    /// Drop pending redo entries after an edit that reuses the batch's entry
    pub fn clear_redo(&mut self) {
        self.redo_stack.clear();
    }

    /// Restore the most recent snapshot and re-solve
    pub fn undo(&mut self, store: &mut SceneStore) -> Result<Effect, EngineError> {
        let previous = self.undo_stack.pop().ok_or(EngineError::UndoEmpty)?;
        self.redo_stack.push(store.scene().clone());
        store.restore(previous);
        resolve(store);
        debug!(undo = self.undo_stack.len(), redo = self.redo_stack.len(), "undo");
        Ok(Effect::Changed)
    }

    /// Re-apply the most recently undone snapshot
    pub fn redo(&mut self, store: &mut SceneStore) -> Result<Effect, EngineError> {
        let next = self.redo_stack.pop().ok_or(EngineError::RedoEmpty)?;
        self.undo_stack.push(store.scene().clone());
        store.restore(next);
        resolve(store);
        debug!(undo = self.undo_stack.len(), redo = self.redo_stack.len(), "redo");
        Ok(Effect::Changed)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

fn resolve(store: &mut SceneStore) {
    let iterations = store.config().solver_iterations;
    crate::solver::solve(store, iterations);
}
