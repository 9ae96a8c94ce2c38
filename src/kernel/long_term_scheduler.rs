use super::memory::Memory;
use super::process_table::ProcessTable;
use super::short_term_scheduler::ShortTermScheduler;
use super::{ProcessControlBlock, ProcessId};

use crate::console::SharedConsole;
use crate::error::{KernelError, Result};
use crate::io::loader::{program_name, read_program};
use crate::io::Program;

/// Admits programs: reserves a process slot and RAM, copies the script in
/// and hands the new PCB to the short-term scheduler.
pub(crate) struct LongTermScheduler {
    max_batch: usize,
    console: SharedConsole,
    verbose: bool,
}

impl LongTermScheduler {
    pub fn new(max_batch: usize, console: SharedConsole, verbose: bool) -> LongTermScheduler {
        LongTermScheduler {
            max_batch,
            console,
            verbose,
        }
    }

    pub fn load(
        &self,
        program: &Program,
        memory: &mut Memory,
        processes: &mut ProcessTable,
        sts: &mut ShortTermScheduler,
    ) -> Result<ProcessId> {
        if program.is_empty() {
            return Err(KernelError::EmptyProgram {
                name: program.name.clone(),
            });
        }

        let id = processes.acquire(memory, program.len())?;
        let block = processes.block_for(memory, id)?;
        memory.write_block_to(block.start, &program.lines);
        sts.schedule_process(ProcessControlBlock::new(id, program.name.as_str()));

        if self.verbose {
            self.console.borrow_mut().print(&format!(
                "kernel: loaded '{}' as process {} at {}..{}",
                program.name,
                id,
                block.start,
                block.end()
            ));
        }

        Ok(id)
    }

    /// Checks the batch size and that no two scripts share a base name.
    pub fn validate_batch<S: AsRef<str>>(&self, paths: &[S]) -> Result<()> {
        if paths.is_empty() {
            return Err(KernelError::NoPrograms);
        }
        if paths.len() > self.max_batch {
            return Err(KernelError::TooManyPrograms {
                requested: paths.len(),
                max: self.max_batch,
            });
        }

        for (idx, path) in paths.iter().enumerate() {
            let name = program_name(path.as_ref());
            if paths[..idx]
                .iter()
                .any(|earlier| program_name(earlier.as_ref()) == name)
            {
                return Err(KernelError::DuplicateProgramName {
                    name: path.as_ref().to_string(),
                });
            }
        }

        Ok(())
    }

    /// Loads every script or none of them: when a load fails, processes
    /// admitted earlier in the same batch are purged again.
    pub fn load_batch<S: AsRef<str>>(
        &self,
        paths: &[S],
        memory: &mut Memory,
        processes: &mut ProcessTable,
        sts: &mut ShortTermScheduler,
    ) -> Result<Vec<ProcessId>> {
        self.validate_batch(paths)?;

        let mut loaded = Vec::with_capacity(paths.len());
        for (idx, path) in paths.iter().enumerate() {
            let result = read_program(path.as_ref())
                .and_then(|program| self.load(&program, memory, processes, sts));

            match result {
                Ok(id) => loaded.push(id),
                Err(err) => {
                    self.console
                        .borrow_mut()
                        .print(&format!("could not load program{}!", idx + 1));
                    sts.purge(memory, processes, &loaded);
                    return Err(err);
                }
            }
        }

        Ok(loaded)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::console::BufferConsole;

    struct Machine {
        memory: Memory,
        processes: ProcessTable,
        sts: ShortTermScheduler,
        lts: LongTermScheduler,
    }

    fn machine(ram: usize, slots: usize) -> Machine {
        let console = Rc::new(RefCell::new(BufferConsole::new()));
        Machine {
            memory: Memory::new(ram),
            processes: ProcessTable::new(slots),
            sts: ShortTermScheduler::new(20, console.clone(), false),
            lts: LongTermScheduler::new(3, console, false),
        }
    }

    impl Machine {
        fn load(&mut self, program: &Program) -> Result<ProcessId> {
            self.lts
                .load(program, &mut self.memory, &mut self.processes, &mut self.sts)
        }
    }

    #[test]
    fn test_lts_load_copies_lines_and_enqueues() {
        let mut m = machine(100, 5);
        m.load(&Program::new("pad", ["x"; 3])).unwrap();

        let id = m.load(&Program::new("p", ["echo a", "echo b"])).unwrap();

        assert_eq!(id, ProcessId(1));
        assert_eq!(m.memory.read_line(3), "echo a");
        assert_eq!(m.memory.read_line(4), "echo b");
        assert_eq!(m.sts.ready_ids(), vec![ProcessId(0), ProcessId(1)]);
        assert_eq!(m.memory.free_capacity(), 95);
    }

    #[test]
    fn test_lts_rejects_empty_program_before_reserving() {
        let mut m = machine(100, 5);
        let empty: [&str; 0] = [];
        let result = m.load(&Program::new("empty.txt", empty));

        assert!(matches!(result, Err(KernelError::EmptyProgram { .. })));
        assert_eq!(m.processes.active_count(), 0);
        assert_eq!(m.sts.ready_len(), 0);
    }

    #[test]
    fn test_lts_too_many_processes() {
        let mut m = machine(100, 5);
        for idx in 0..5 {
            m.load(&Program::new(format!("p{}", idx), ["echo"])).unwrap();
        }
        let blocks_before = m.memory.blocks().to_vec();

        let result = m.load(&Program::new("p5", ["echo"]));

        assert!(matches!(
            result,
            Err(KernelError::TooManyProcesses { capacity: 5 })
        ));
        assert_eq!(m.memory.blocks(), blocks_before.as_slice());
        assert_eq!(m.sts.ready_len(), 5);
    }

    #[test]
    fn test_lts_out_of_memory_enqueues_nothing() {
        let mut m = machine(10, 5);
        let result = m.load(&Program::new("big", ["echo"; 11]));

        assert!(matches!(result, Err(KernelError::OutOfMemory { .. })));
        assert_eq!(m.sts.ready_len(), 0);
        assert_eq!(m.processes.active_count(), 0);
    }

    #[test]
    fn test_lts_validate_batch_duplicate_names() {
        let m = machine(100, 5);
        let result = m.lts.validate_batch(&["a/foo.txt", "b/foo.txt"]);

        match result {
            Err(KernelError::DuplicateProgramName { name }) => assert_eq!(name, "b/foo.txt"),
            other => panic!("expected duplicate name, got {:?}", other),
        }
    }

    #[test]
    fn test_lts_validate_batch_size() {
        let m = machine(100, 5);
        let none: [&str; 0] = [];
        assert!(matches!(
            m.lts.validate_batch(&none),
            Err(KernelError::NoPrograms)
        ));
        assert!(matches!(
            m.lts.validate_batch(&["a", "b", "c", "d"]),
            Err(KernelError::TooManyPrograms { requested: 4, max: 3 })
        ));
        assert!(m.lts.validate_batch(&["a", "b", "c"]).is_ok());
    }

    #[test]
    fn test_lts_load_batch_duplicate_loads_nothing() {
        let mut m = machine(100, 5);
        let result = m.lts.load_batch(
            &["a/foo.txt", "b/foo.txt"],
            &mut m.memory,
            &mut m.processes,
            &mut m.sts,
        );

        assert!(matches!(
            result,
            Err(KernelError::DuplicateProgramName { .. })
        ));
        assert_eq!(m.processes.active_count(), 0);
    }

    #[test]
    fn test_lts_load_batch_missing_second_rolls_back() {
        let dir = std::env::temp_dir().join(format!("ossim-lts-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let first = dir.join("first.txt");
        std::fs::write(&first, "echo 1\necho 2\n").unwrap();
        let missing = dir.join("missing.txt");

        let mut m = machine(100, 5);
        m.load(&Program::new("resident", ["echo r"])).unwrap();
        let ready_before = m.sts.ready_ids();

        let paths = [
            first.to_str().unwrap().to_string(),
            missing.to_str().unwrap().to_string(),
        ];
        let result = m
            .lts
            .load_batch(&paths, &mut m.memory, &mut m.processes, &mut m.sts);

        assert!(matches!(result, Err(KernelError::ProgramNotFound { .. })));
        assert_eq!(m.sts.ready_ids(), ready_before);
        assert_eq!(m.processes.active_count(), 1);
        assert_eq!(m.memory.free_capacity(), 99);
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
