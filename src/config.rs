use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{KernelError, Result};

/// Number of cells in the simulated RAM. One cell holds one script line.
pub const RAM_SIZE: usize = 1000;

/// Number of process slots, i.e. programs that may be loaded at once.
pub const MAX_CONCURRENT_PROCS: usize = 5;

/// Instructions a process runs before it is rotated to the back of the queue.
pub const QUANTUM: usize = 20;

/// Programs a single `exec` may load.
pub const MAX_EXEC_PROGRAMS: usize = 3;

/// Shell variables the interpreter can hold.
pub const MAX_VARIABLES: usize = 1000;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    pub ram_size: usize,
    pub max_processes: usize,
    pub quantum: usize,
    /// Trace loads, slices and retirements on the console.
    pub verbose: bool,
}

impl Default for KernelConfig {
    fn default() -> Self {
        KernelConfig {
            ram_size: RAM_SIZE,
            max_processes: MAX_CONCURRENT_PROCS,
            quantum: QUANTUM,
            verbose: false,
        }
    }
}

impl KernelConfig {
    pub fn from_json_str(json: &str) -> Result<KernelConfig> {
        let config: KernelConfig =
            serde_json::from_str(json).map_err(|err| KernelError::InvalidConfig(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<KernelConfig> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|err| {
            KernelError::InvalidConfig(format!("cannot read {}: {}", path.display(), err))
        })?;
        KernelConfig::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.ram_size == 0 {
            return Err(KernelError::InvalidConfig("ram_size must be positive".into()));
        }
        if self.max_processes == 0 {
            return Err(KernelError::InvalidConfig("max_processes must be positive".into()));
        }
        if self.quantum == 0 {
            return Err(KernelError::InvalidConfig("quantum must be positive".into()));
        }
        Ok(())
    }
}
