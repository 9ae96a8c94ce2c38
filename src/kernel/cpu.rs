use super::memory::{Memory, MemoryBlock};
use super::{ProcessControlBlock, ProcessState};

use crate::console::SharedConsole;
use crate::shell::{tokenize, Command, CommandExecutor};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CpuStatus {
    Completed,
    Failed,
}

/// The single simulated CPU. The instruction pointer is an absolute RAM
/// address and only means something between `move_in` and `move_out`.
pub(crate) struct Cpu {
    instruction_pointer: usize,
    instruction_register: String,
    quantum: usize,
    console: SharedConsole,
}

impl Cpu {
    pub fn new(quantum: usize, console: SharedConsole) -> Cpu {
        Cpu {
            instruction_pointer: 0,
            instruction_register: String::new(),
            quantum,
            console,
        }
    }

    pub fn quantum(&self) -> usize {
        self.quantum
    }

    pub fn move_in(&mut self, pcb: &mut ProcessControlBlock, block: &MemoryBlock) {
        self.instruction_pointer = block.start + pcb.program_counter;
        pcb.state = ProcessState::Running;
    }

    pub fn move_out(&mut self, pcb: &mut ProcessControlBlock, block: &MemoryBlock) {
        pcb.program_counter = self.instruction_pointer - block.start;
        pcb.state = ProcessState::Ready;
    }

    /// Fetches and executes up to `limit` instructions. Stops at the first
    /// instruction the executor reports as failed, leaving the instruction
    /// pointer on it.
    pub fn run_quantum(
        &mut self,
        limit: usize,
        memory: &Memory,
        executor: &mut dyn CommandExecutor,
    ) -> CpuStatus {
        for _ in 0..limit {
            self.instruction_register.clear();
            self.instruction_register
                .push_str(memory.read_line(self.instruction_pointer));

            match tokenize(&self.instruction_register) {
                Ok(tokens) => {
                    if let Some(command) = Command::from_tokens(tokens) {
                        if executor.execute(&command).is_failure() {
                            return CpuStatus::Failed;
                        }
                    }
                }
                Err(err) => self.console.borrow_mut().print(&err.to_string()),
            }

            self.instruction_pointer += 1;
        }

        CpuStatus::Completed
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::console::BufferConsole;
    use crate::kernel::ProcessId;
    use crate::shell::CommandStatus;

    struct Recorder {
        seen: Vec<String>,
        fail_on: Option<&'static str>,
    }

    impl CommandExecutor for Recorder {
        fn execute(&mut self, command: &Command) -> CommandStatus {
            self.seen.push(command.verb.clone());
            if self.fail_on == Some(command.verb.as_str()) {
                CommandStatus::FAILED
            } else {
                CommandStatus::Success
            }
        }
    }

    fn setup(lines: &[&str]) -> (Cpu, Memory, MemoryBlock, Rc<RefCell<BufferConsole>>) {
        let console = Rc::new(RefCell::new(BufferConsole::new()));
        let mut memory = Memory::new(lines.len() + 4);
        memory.allocate(4).unwrap();
        let handle = memory.allocate(lines.len()).unwrap();
        memory.write_block_to(handle.start(), lines);
        let block = memory.block(handle).unwrap();
        (Cpu::new(20, console.clone()), memory, block, console)
    }

    #[test]
    fn test_cpu_move_in_and_out() {
        let (mut cpu, _memory, block, _) = setup(&["a", "b", "c"]);
        let mut pcb = ProcessControlBlock::new(ProcessId(1), "p");
        pcb.program_counter = 2;

        cpu.move_in(&mut pcb, &block);
        assert_eq!(cpu.instruction_pointer, 6);
        assert_eq!(pcb.state, ProcessState::Running);

        cpu.instruction_pointer += 1;
        cpu.move_out(&mut pcb, &block);
        assert_eq!(pcb.program_counter, 3);
        assert_eq!(pcb.state, ProcessState::Ready);
    }

    #[test]
    fn test_cpu_run_quantum_respects_limit() {
        let (mut cpu, memory, block, _) = setup(&["a", "b", "c", "d"]);
        let mut pcb = ProcessControlBlock::new(ProcessId(0), "p");
        let mut recorder = Recorder {
            seen: Vec::new(),
            fail_on: None,
        };

        cpu.move_in(&mut pcb, &block);
        let status = cpu.run_quantum(3, &memory, &mut recorder);
        cpu.move_out(&mut pcb, &block);

        assert_eq!(status, CpuStatus::Completed);
        assert_eq!(recorder.seen, vec!["a", "b", "c"]);
        assert_eq!(pcb.program_counter, 3);
    }

    #[test]
    fn test_cpu_run_quantum_stops_on_failure() {
        let (mut cpu, memory, block, _) = setup(&["a", "bad", "c"]);
        let mut pcb = ProcessControlBlock::new(ProcessId(0), "p");
        let mut recorder = Recorder {
            seen: Vec::new(),
            fail_on: Some("bad"),
        };

        cpu.move_in(&mut pcb, &block);
        let status = cpu.run_quantum(3, &memory, &mut recorder);
        cpu.move_out(&mut pcb, &block);

        assert_eq!(status, CpuStatus::Failed);
        assert_eq!(recorder.seen, vec!["a", "bad"]);
        assert_eq!(pcb.program_counter, 1);
    }

    #[test]
    fn test_cpu_skips_blank_and_unparsable_lines() {
        let (mut cpu, memory, block, console) = setup(&["", "echo \"open", "z"]);
        let mut pcb = ProcessControlBlock::new(ProcessId(0), "p");
        let mut recorder = Recorder {
            seen: Vec::new(),
            fail_on: None,
        };

        cpu.move_in(&mut pcb, &block);
        let status = cpu.run_quantum(3, &memory, &mut recorder);
        cpu.move_out(&mut pcb, &block);

        assert_eq!(status, CpuStatus::Completed);
        assert_eq!(recorder.seen, vec!["z"]);
        assert_eq!(pcb.program_counter, 3);
        assert!(console.borrow().contains("Open quotation marks"));
    }
}
