use super::cpu::{Cpu, CpuStatus};
use super::memory::Memory;
use super::process_table::ProcessTable;
use super::ready_queue::ReadyQueue;
use super::{ProcessControlBlock, ProcessId};

use crate::console::SharedConsole;
use crate::shell::CommandExecutor;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// Ran every line of its program.
    Completed,
    /// An instruction failed; the rest of the program was skipped.
    Failed,
    /// Removed from the ready queue before it finished.
    Purged,
}

/// What happened to a process between load and retirement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessReport {
    pub id: ProcessId,
    pub name: String,
    pub slices: usize,
    pub instructions: usize,
    pub outcome: ProcessOutcome,
}

/// Round-robin time sharing of the CPU among ready processes.
pub(crate) struct ShortTermScheduler {
    ready_queue: ReadyQueue,
    cpu: Cpu,
    state: SchedulerState,
    console: SharedConsole,
    verbose: bool,
}

impl ShortTermScheduler {
    pub fn new(quantum: usize, console: SharedConsole, verbose: bool) -> ShortTermScheduler {
        ShortTermScheduler {
            ready_queue: ReadyQueue::new(),
            cpu: Cpu::new(quantum, console.clone()),
            state: SchedulerState::Idle,
            console,
            verbose,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn ready_ids(&self) -> Vec<ProcessId> {
        self.ready_queue.ids()
    }

    pub fn ready_len(&self) -> usize {
        self.ready_queue.len()
    }

    pub fn schedule_process(&mut self, pcb: ProcessControlBlock) {
        self.ready_queue.enqueue(pcb);
    }

    /// Hands the head process to the CPU one quantum at a time until the
    /// ready queue is empty. A process that fails, or that reaches the end
    /// of its program, is retired; any other process goes to the back.
    pub fn run(
        &mut self,
        memory: &mut Memory,
        processes: &mut ProcessTable,
        executor: &mut dyn CommandExecutor,
    ) -> Vec<ProcessReport> {
        let mut reports = Vec::new();

        while let Some(id) = self.ready_queue.head_mut().map(|pcb| pcb.get_id()) {
            self.state = SchedulerState::Running;

            let block = match processes.block_for(memory, id) {
                Ok(block) => block,
                Err(err) => {
                    self.print(&format!("kernel: dropping process {}: {}", id, err));
                    if let Some(pcb) = self.ready_queue.dequeue_head() {
                        reports.push(self.retire(memory, processes, pcb, ProcessOutcome::Failed));
                    }
                    continue;
                }
            };

            let quantum = self.cpu.quantum();
            let outcome = {
                let Some(pcb) = self.ready_queue.head_mut() else {
                    break;
                };

                let remaining = block.length - pcb.program_counter;
                let final_slice = remaining <= quantum;
                let limit = if final_slice { remaining } else { quantum };
                let started_at = pcb.program_counter;

                self.cpu.move_in(pcb, &block);
                if self.verbose {
                    let line = format!(
                        "kernel: process {} ('{}') {:?} from line {}",
                        id,
                        pcb.get_name(),
                        pcb.state,
                        pcb.program_counter + 1
                    );
                    self.console.borrow_mut().print(&line);
                }
                let status = self.cpu.run_quantum(limit, memory, executor);
                self.cpu.move_out(pcb, &block);

                let mut executed = pcb.program_counter - started_at;
                if status == CpuStatus::Failed {
                    executed += 1;
                }
                pcb.record_slice(executed);

                if self.verbose {
                    let line = format!(
                        "kernel: process {} ('{}') ran {} of {} instructions",
                        id,
                        pcb.get_name(),
                        executed,
                        limit
                    );
                    self.console.borrow_mut().print(&line);
                }

                match status {
                    CpuStatus::Failed => {
                        let line = format!(
                            "kernel: process {} ('{}') failed at line {}",
                            id,
                            pcb.get_name(),
                            pcb.program_counter + 1
                        );
                        self.console.borrow_mut().print(&line);
                        Some(ProcessOutcome::Failed)
                    }
                    CpuStatus::Completed if final_slice => Some(ProcessOutcome::Completed),
                    CpuStatus::Completed => None,
                }
            };

            match outcome {
                Some(outcome) => {
                    if let Some(pcb) = self.ready_queue.dequeue_head() {
                        reports.push(self.retire(memory, processes, pcb, outcome));
                    }
                }
                None => self.ready_queue.rotate_head_to_tail(),
            }
        }

        self.state = SchedulerState::Idle;
        reports
    }

    /// Retires the listed processes without running them.
    pub fn purge(
        &mut self,
        memory: &mut Memory,
        processes: &mut ProcessTable,
        ids: &[ProcessId],
    ) -> Vec<ProcessReport> {
        let mut reports = Vec::new();
        for &id in ids {
            if let Some(pcb) = self.ready_queue.remove_by_id(id) {
                reports.push(self.retire(memory, processes, pcb, ProcessOutcome::Purged));
            }
        }
        reports
    }

    pub fn purge_all(
        &mut self,
        memory: &mut Memory,
        processes: &mut ProcessTable,
    ) -> Vec<ProcessReport> {
        let pcbs = self.ready_queue.drain();
        pcbs.into_iter()
            .map(|pcb| self.retire(memory, processes, pcb, ProcessOutcome::Purged))
            .collect()
    }

    fn retire(
        &mut self,
        memory: &mut Memory,
        processes: &mut ProcessTable,
        pcb: ProcessControlBlock,
        outcome: ProcessOutcome,
    ) -> ProcessReport {
        let id = pcb.get_id();

        if let Err(err) = processes.release(memory, id) {
            self.print(&format!("kernel: could not release process {}: {}", id, err));
        } else if self.verbose {
            self.print(&format!(
                "kernel: retired process {} ('{}'): {:?}",
                id,
                pcb.get_name(),
                outcome
            ));
        }

        ProcessReport {
            id,
            name: pcb.get_name().to_string(),
            slices: pcb.get_slices(),
            instructions: pcb.get_instructions(),
            outcome,
        }
    }

    fn print(&self, line: &str) {
        self.console.borrow_mut().print(line);
    }
}
