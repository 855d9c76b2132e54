use std::cell::RefCell;

use super::TaskStore;
use crate::error::Result;
use crate::task::TaskMap;

/// Task store that lives only in memory. Useful for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryTaskStore {
    tasks: RefCell<TaskMap>,
    saves: RefCell<usize>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times `save_all` has been called.
    pub fn save_count(&self) -> usize {
        *self.saves.borrow()
    }
}

impl TaskStore for MemoryTaskStore {
    fn load_all(&self) -> Result<TaskMap> {
        Ok(self.tasks.borrow().clone())
    }

    fn save_all(&self, tasks: &TaskMap) -> Result<()> {
        *self.tasks.borrow_mut() = tasks.clone();
        *self.saves.borrow_mut() += 1;
        Ok(())
    }
}
