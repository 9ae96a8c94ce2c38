use super::long_term_scheduler::LongTermScheduler;
use super::memory::Memory;
use super::process_table::ProcessTable;
use super::short_term_scheduler::{ProcessReport, SchedulerState, ShortTermScheduler};
use super::ProcessId;

use crate::config::{KernelConfig, MAX_EXEC_PROGRAMS};
use crate::console::SharedConsole;
use crate::error::Result;
use crate::io::Program;
use crate::shell::CommandExecutor;

/// The simulated machine: RAM, the process table and both schedulers.
///
/// Everything the kernel reports goes to the shared console. Errors are
/// printed once here and then returned to the caller.
pub struct Kernel {
    config: KernelConfig,
    memory: Memory,
    processes: ProcessTable,
    lts: LongTermScheduler,
    sts: ShortTermScheduler,
    console: SharedConsole,
}

impl Kernel {
    pub fn new(config: KernelConfig, console: SharedConsole) -> Result<Kernel> {
        config.validate()?;

        Ok(Kernel {
            memory: Memory::new(config.ram_size),
            processes: ProcessTable::new(config.max_processes),
            lts: LongTermScheduler::new(MAX_EXEC_PROGRAMS, console.clone(), config.verbose),
            sts: ShortTermScheduler::new(config.quantum, console.clone(), config.verbose),
            config,
            console,
        })
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn free_memory(&self) -> usize {
        self.memory.free_capacity()
    }

    pub fn active_processes(&self) -> usize {
        self.processes.active_count()
    }

    pub fn ready_ids(&self) -> Vec<ProcessId> {
        self.sts.ready_ids()
    }

    pub fn ready_len(&self) -> usize {
        self.sts.ready_len()
    }

    pub fn scheduler_state(&self) -> SchedulerState {
        self.sts.state()
    }

    /// Admits one program into RAM and the ready queue without running it.
    pub fn load(&mut self, program: &Program) -> Result<ProcessId> {
        let result = self
            .lts
            .load(program, &mut self.memory, &mut self.processes, &mut self.sts);
        self.report(result)
    }

    /// Loads up to three scripts as one batch and runs the scheduler until
    /// the ready queue drains. If any script fails to load, nothing from the
    /// batch stays queued and nothing runs.
    pub fn exec<S: AsRef<str>>(
        &mut self,
        paths: &[S],
        executor: &mut dyn CommandExecutor,
    ) -> Result<Vec<ProcessReport>> {
        let result =
            self.lts
                .load_batch(paths, &mut self.memory, &mut self.processes, &mut self.sts);
        self.report(result)?;

        Ok(self.run(executor))
    }

    /// Runs ready processes until none are left.
    pub fn run(&mut self, executor: &mut dyn CommandExecutor) -> Vec<ProcessReport> {
        self.sts.run(&mut self.memory, &mut self.processes, executor)
    }

    /// Retires every queued process without running it.
    pub fn purge(&mut self) -> Vec<ProcessReport> {
        self.sts.purge_all(&mut self.memory, &mut self.processes)
    }

    pub fn shutdown(&mut self) {
        self.purge();
        self.memory.clear();
    }

    fn report<T>(&self, result: Result<T>) -> Result<T> {
        if let Err(err) = &result {
            let mut console = self.console.borrow_mut();
            console.print(&format!("Error: {}", err));
            if err.is_fragmentation() {
                console.print("RAM is fragmented: no single free block is large enough");
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::console::BufferConsole;
    use crate::error::KernelError;

    fn kernel(config: KernelConfig) -> (Kernel, Rc<RefCell<BufferConsole>>) {
        let console = Rc::new(RefCell::new(BufferConsole::new()));
        (Kernel::new(config, console.clone()).unwrap(), console)
    }

    #[test]
    fn test_kernel_rejects_invalid_config() {
        let config = KernelConfig {
            ram_size: 0,
            ..KernelConfig::default()
        };
        let console = Rc::new(RefCell::new(BufferConsole::new()));
        assert!(matches!(
            Kernel::new(config, console),
            Err(KernelError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_kernel_load_error_is_printed() {
        let (mut kernel, console) = kernel(KernelConfig::default());
        let result = kernel.load(&Program::new("huge", vec!["echo"; 1001]));

        assert!(result.is_err());
        assert!(console.borrow().contains("not enough RAM"));
    }

    #[test]
    fn test_kernel_fragmentation_hint() {
        let config = KernelConfig {
            ram_size: 30,
            ..KernelConfig::default()
        };
        let (mut kernel, console) = kernel(config);
        kernel.load(&Program::new("a", vec!["x"; 10])).unwrap();
        kernel.load(&Program::new("b", vec!["x"; 10])).unwrap();
        kernel.load(&Program::new("c", vec!["x"; 10])).unwrap();
        let ids = kernel.ready_ids();
        kernel
            .sts
            .purge(&mut kernel.memory, &mut kernel.processes, &[ids[0], ids[2]]);

        let err = kernel.load(&Program::new("d", vec!["x"; 15])).unwrap_err();
        assert!(err.is_fragmentation());
        assert!(console.borrow().contains("fragmented"));
    }

    #[test]
    fn test_kernel_shutdown_releases_everything() {
        let (mut kernel, _) = kernel(KernelConfig::default());
        kernel.load(&Program::new("a", ["echo a"])).unwrap();
        kernel.load(&Program::new("b", ["echo b"])).unwrap();

        kernel.shutdown();

        assert_eq!(kernel.ready_len(), 0);
        assert_eq!(kernel.active_processes(), 0);
        assert_eq!(kernel.free_memory(), 1000);
        assert_eq!(kernel.memory().read_line(0), "");
    }
}
