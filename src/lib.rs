//! A single-CPU operating system simulator: a shell whose `exec` command
//! loads scripts into a simulated RAM and time-shares them round-robin.

pub mod config;
pub mod console;
pub mod driver;
pub mod error;
pub mod io;
pub mod kernel;
pub mod shell;

pub use config::KernelConfig;
pub use driver::Driver;
pub use error::{KernelError, Result};
pub use kernel::Kernel;
