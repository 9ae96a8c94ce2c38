use std::fmt;

use super::memory::{BlockHandle, Memory, MemoryBlock};

use crate::error::{KernelError, Result};

/// Index of a bound process slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProcessId(pub usize);

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fixed pool of process slots, each owning at most one RAM block.
pub(crate) struct ProcessTable {
    slots: Vec<Option<BlockHandle>>,
}

impl ProcessTable {
    pub fn new(capacity: usize) -> ProcessTable {
        ProcessTable {
            slots: vec![None; capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Binds the first empty slot to a fresh block of `size` cells. Memory is
    /// not touched when every slot is taken.
    pub fn acquire(&mut self, memory: &mut Memory, size: usize) -> Result<ProcessId> {
        let id = self
            .slots
            .iter()
            .position(Option::is_none)
            .ok_or(KernelError::TooManyProcesses {
                capacity: self.capacity(),
            })?;

        let handle = memory.allocate(size)?;
        self.slots[id] = Some(handle);

        Ok(ProcessId(id))
    }

    /// Empties the slot and hands its block back to memory. The slot is
    /// freed even when memory no longer knows the block.
    pub fn release(&mut self, memory: &mut Memory, id: ProcessId) -> Result<()> {
        let handle = self.handle_for(id)?;
        self.slots[id.0] = None;
        memory.deallocate(handle)?;
        Ok(())
    }

    pub fn block_for(&self, memory: &Memory, id: ProcessId) -> Result<MemoryBlock> {
        memory.block(self.handle_for(id)?)
    }

    fn handle_for(&self, id: ProcessId) -> Result<BlockHandle> {
        self.slots
            .get(id.0)
            .copied()
            .flatten()
            .ok_or(KernelError::UnknownProcess(id))
    }
}
