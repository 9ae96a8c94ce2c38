use std::collections::VecDeque;

use super::{ProcessControlBlock, ProcessId};

/// Round-robin order over runnable processes. The front is the next process
/// to run; rotating moves it behind every other ready process.
#[derive(Default)]
pub(crate) struct ReadyQueue {
    queue: VecDeque<ProcessControlBlock>,
}

impl ReadyQueue {
    pub fn new() -> ReadyQueue {
        ReadyQueue {
            queue: VecDeque::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn enqueue(&mut self, pcb: ProcessControlBlock) {
        self.queue.push_back(pcb);
    }

    pub fn head_mut(&mut self) -> Option<&mut ProcessControlBlock> {
        self.queue.front_mut()
    }

    pub fn dequeue_head(&mut self) -> Option<ProcessControlBlock> {
        self.queue.pop_front()
    }

    pub fn rotate_head_to_tail(&mut self) {
        if !self.queue.is_empty() {
            self.queue.rotate_left(1);
        }
    }

    pub fn remove_by_id(&mut self, id: ProcessId) -> Option<ProcessControlBlock> {
        let idx = self.queue.iter().position(|pcb| pcb.get_id() == id)?;
        self.queue.remove(idx)
    }

    /// Empties the queue, handing back every PCB so its resources can be
    /// released.
    pub fn drain(&mut self) -> Vec<ProcessControlBlock> {
        self.queue.drain(..).collect()
    }

    pub fn ids(&self) -> Vec<ProcessId> {
        self.queue.iter().map(ProcessControlBlock::get_id).collect()
    }
}
