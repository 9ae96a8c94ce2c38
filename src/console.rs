//! Text output shared by the kernel and the interpreter.

use std::cell::RefCell;
use std::rc::Rc;

pub trait Console {
    fn print(&mut self, line: &str);
}

pub type SharedConsole = Rc<RefCell<dyn Console>>;

/// Writes every line to stdout.
#[derive(Default)]
pub struct StdoutConsole;

impl Console for StdoutConsole {
    fn print(&mut self, line: &str) {
        println!("{}", line);
    }
}

/// Keeps printed lines in memory.
#[derive(Default)]
pub struct BufferConsole {
    lines: Vec<String>,
}

impl BufferConsole {
    pub fn new() -> BufferConsole {
        BufferConsole { lines: Vec::new() }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|line| line.contains(needle))
    }

    pub fn take(&mut self) -> Vec<String> {
        std::mem::take(&mut self.lines)
    }
}

impl Console for BufferConsole {
    fn print(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}

pub fn stdout() -> SharedConsole {
    Rc::new(RefCell::new(StdoutConsole))
}
