use std::fs::File;
use std::io::BufReader;

use super::Program;

use crate::error::{KernelError, Result};

/// Base name of a script path: everything after the last `/`.
pub fn program_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Opens the script at `path` and reads it into a [`Program`] named after
/// the file's base name.
pub fn read_program(path: &str) -> Result<Program> {
    if path.is_empty() || path.ends_with('/') {
        return Err(KernelError::InvalidProgramPath {
            path: path.to_string(),
        });
    }

    let not_found = |source| KernelError::ProgramNotFound {
        path: path.to_string(),
        source,
    };

    let file = File::open(path).map_err(not_found)?;
    Program::from_reader(program_name(path), BufReader::new(file)).map_err(not_found)
}
