pub mod loader;
pub mod program;

pub use program::Program;
