/// One decoded instruction: a verb and its arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Command {
    pub verb: String,
    pub args: Vec<String>,
}

impl Command {
    /// Builds a command from tokens. An empty token list is no command at all.
    pub fn from_tokens(mut tokens: Vec<String>) -> Option<Command> {
        if tokens.is_empty() {
            return None;
        }
        let verb = tokens.remove(0);
        Some(Command { verb, args: tokens })
    }

    pub fn arg(&self, idx: usize) -> Option<&str> {
        self.args.get(idx).map(String::as_str)
    }

    /// Number of tokens including the verb.
    pub fn token_count(&self) -> usize {
        self.args.len() + 1
    }
}

/// Outcome of executing one command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandStatus {
    Success,
    /// `depth` counts how many nested scripts the failure travelled through.
    Failed { depth: u32 },
    /// The command asked the shell to stop.
    Terminate,
}

impl CommandStatus {
    pub const FAILED: CommandStatus = CommandStatus::Failed { depth: 1 };

    pub fn is_failure(&self) -> bool {
        !matches!(self, CommandStatus::Success)
    }
}

/// Whatever runs decoded instructions on behalf of the CPU.
pub trait CommandExecutor {
    fn execute(&mut self, command: &Command) -> CommandStatus;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|word| word.to_string()).collect()
    }

    #[test]
    fn test_command_from_tokens() {
        let command = Command::from_tokens(tokens(&["set", "x", "10"])).unwrap();
        assert_eq!(command.verb, "set");
        assert_eq!(command.arg(1), Some("10"));
        assert_eq!(command.arg(2), None);
        assert_eq!(command.token_count(), 3);
    }

    #[test]
    fn test_command_from_no_tokens() {
        assert!(Command::from_tokens(Vec::new()).is_none());
    }

    #[test]
    fn test_command_status_failures() {
        assert!(CommandStatus::Terminate.is_failure());
        assert!(CommandStatus::FAILED.is_failure());
        assert!(!CommandStatus::Success.is_failure());
    }
}
