use std::io::BufRead;

use crate::config::KernelConfig;
use crate::console::SharedConsole;
use crate::error::Result;
use crate::kernel::Kernel;
use crate::shell::{CommandStatus, Interpreter};

/// Boots the kernel and feeds input lines to the shell until `quit` or the
/// end of input, then releases every process still loaded.
pub struct Driver {
    interpreter: Interpreter,
    console: SharedConsole,
}

impl Driver {
    pub fn new(config: KernelConfig, console: SharedConsole) -> Result<Driver> {
        let kernel = Kernel::new(config, console.clone())?;

        Ok(Driver {
            interpreter: Interpreter::new(kernel, console.clone()),
            console,
        })
    }

    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    pub fn start<R: BufRead>(&mut self, mut input: R) {
        self.print("Kernel 1.0 loaded!");
        self.print("Welcome to the shell!");
        self.print("Shell version 2.0 Updated February 2021");

        let mut buf = Vec::new();
        loop {
            buf.clear();
            match input.read_until(b'\n', &mut buf) {
                Ok(0) => break,
                Ok(_) => {}
                Err(err) => {
                    self.print(&format!("Failed to read input: {}", err));
                    break;
                }
            }
            if buf.last() == Some(&b'\n') {
                buf.pop();
                if buf.last() == Some(&b'\r') {
                    buf.pop();
                }
            }

            let line = String::from_utf8_lossy(&buf);
            if self.interpreter.interpret_line(&line) == CommandStatus::Terminate {
                break;
            }
        }

        self.interpreter.shutdown();
    }

    fn print(&self, line: &str) {
        self.console.borrow_mut().print(line);
    }
}
