mod command;
mod interpreter;
mod tokenizer;
mod variables;

pub use command::{Command, CommandExecutor, CommandStatus};
pub use interpreter::Interpreter;
pub use tokenizer::{tokenize, ParseError, MAX_TOKENS, MAX_TOKEN_LEN};
pub use variables::{VariableError, VariableStore};
