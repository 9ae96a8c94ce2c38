mod cpu;
mod long_term_scheduler;
mod memory;
mod process_control_block;
mod process_table;
mod ready_queue;
mod short_term_scheduler;
mod system;

pub use cpu::CpuStatus;
pub use memory::{BlockHandle, Memory, MemoryBlock};
pub use process_control_block::{ProcessControlBlock, ProcessState};
pub use process_table::ProcessId;
pub use short_term_scheduler::{ProcessOutcome, ProcessReport, SchedulerState};
pub use system::Kernel;
