//! Errors raised by the kernel while loading and managing processes.
//!
//! Instruction failures are not errors here: the CPU reports them as a
//! [`CommandStatus`](crate::shell::CommandStatus) and the scheduler retires
//! the offending process.

use std::io;

use crate::kernel::ProcessId;

pub type Result<T> = std::result::Result<T, KernelError>;

#[derive(Debug, thiserror::Error)]
pub enum KernelError {
    /// Every process slot is bound.
    #[error("too many programs running concurrently (limit is {capacity})")]
    TooManyProcesses { capacity: usize },

    /// No single free block can hold the request.
    #[error("not enough RAM: requested {requested} cells, {free} free, largest free block is {largest_free}")]
    OutOfMemory {
        requested: usize,
        free: usize,
        largest_free: usize,
    },

    #[error("cannot allocate an empty block")]
    ZeroSizedAllocation,

    #[error("script '{name}' is empty")]
    EmptyProgram { name: String },

    #[error("script '{name}' already loaded")]
    DuplicateProgramName { name: String },

    #[error("exec expects between 1 and {max} programs, received {requested}")]
    TooManyPrograms { requested: usize, max: usize },

    #[error("exec expects at least one program")]
    NoPrograms,

    #[error("'{path}' is not a script file")]
    InvalidProgramPath { path: String },

    #[error("script '{path}' not found")]
    ProgramNotFound {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("no process bound to id {0}")]
    UnknownProcess(ProcessId),

    #[error("no allocated block starts at address {start}")]
    UnknownBlock { start: usize },

    #[error("invalid kernel configuration: {0}")]
    InvalidConfig(String),
}

impl KernelError {
    /// True when enough total RAM is free but it is split across blocks that
    /// are each too small.
    pub fn is_fragmentation(&self) -> bool {
        match self {
            KernelError::OutOfMemory {
                requested, free, ..
            } => free >= requested,
            _ => false,
        }
    }
}
