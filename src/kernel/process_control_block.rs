use super::ProcessId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProcessState {
    Ready,
    Running,
}

/// Per-process run state. The program counter is relative to the start of
/// the process's RAM block.
#[derive(Debug)]
pub struct ProcessControlBlock {
    pub program_counter: usize,
    pub state: ProcessState,

    id: ProcessId,
    name: String,

    slices: usize,
    instructions: usize,
}

impl ProcessControlBlock {
    pub fn new(id: ProcessId, name: impl Into<String>) -> ProcessControlBlock {
        ProcessControlBlock {
            program_counter: 0,
            state: ProcessState::Ready,
            id,
            name: name.into(),
            slices: 0,
            instructions: 0,
        }
    }

    pub fn get_id(&self) -> ProcessId {
        self.id
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_slices(&self) -> usize {
        self.slices
    }

    pub fn get_instructions(&self) -> usize {
        self.instructions
    }

    pub(crate) fn record_slice(&mut self, executed: usize) {
        self.slices += 1;
        self.instructions += executed;
    }
}
