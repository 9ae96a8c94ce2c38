//! The shell's built-in commands.
//!
//! The interpreter runs lines typed at the prompt, lines of a `run` script
//! and, through [`CommandExecutor`], the instructions of loaded programs.

use super::command::{Command, CommandExecutor, CommandStatus};
use super::tokenizer::tokenize;
use super::variables::VariableStore;

use crate::config::MAX_EXEC_PROGRAMS;
use crate::console::SharedConsole;
use crate::io::loader::read_program;
use crate::kernel::{Kernel, ProcessReport};

/// Nested `run` calls allowed before a script is refused.
const MAX_RUN_DEPTH: usize = 64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Builtin {
    Clear,
    Echo,
    Exec,
    Help,
    Print,
    Quit,
    Run,
    Set,
}

const BUILTINS: [Builtin; 8] = [
    Builtin::Clear,
    Builtin::Echo,
    Builtin::Exec,
    Builtin::Help,
    Builtin::Print,
    Builtin::Quit,
    Builtin::Run,
    Builtin::Set,
];

impl Builtin {
    fn from_verb(verb: &str) -> Option<Builtin> {
        BUILTINS.iter().copied().find(|builtin| builtin.name() == verb)
    }

    fn name(self) -> &'static str {
        match self {
            Builtin::Clear => "clear",
            Builtin::Echo => "echo",
            Builtin::Exec => "exec",
            Builtin::Help => "help",
            Builtin::Print => "print",
            Builtin::Quit => "quit",
            Builtin::Run => "run",
            Builtin::Set => "set",
        }
    }

    fn usage(self) -> &'static str {
        match self {
            Builtin::Clear => "clear",
            Builtin::Echo => "echo STRING",
            Builtin::Exec => "exec program1 [program2] [program3]",
            Builtin::Help => "help [COMMAND]",
            Builtin::Print => "print VAR",
            Builtin::Quit => "quit",
            Builtin::Run => "run SCRIPT.TXT",
            Builtin::Set => "set VAR STRING",
        }
    }

    fn description(self) -> &'static str {
        match self {
            Builtin::Clear => "Clears the terminal screen",
            Builtin::Echo => "Print STRING on a new line",
            Builtin::Exec => "run programs concurrently",
            Builtin::Help => "Displays all the commands - prints out details about [COMMAND]",
            Builtin::Print => "Displays the value assigned to VAR",
            Builtin::Quit => "Exits / terminates the shell",
            Builtin::Run => "Executes the file SCRIPT.TXT",
            Builtin::Set => "Assigns value STRING to shell variable VAR",
        }
    }

    /// Accepted token counts, verb included.
    fn arity(self) -> (usize, usize) {
        match self {
            Builtin::Clear | Builtin::Quit => (1, 1),
            Builtin::Echo | Builtin::Print | Builtin::Run => (2, 2),
            Builtin::Set => (3, 3),
            Builtin::Help => (1, 2),
            Builtin::Exec => (2, MAX_EXEC_PROGRAMS + 1),
        }
    }
}

pub struct Interpreter {
    variables: VariableStore,
    /// Taken out while `exec` runs programs, so a nested `exec` sees `None`.
    kernel: Option<Kernel>,
    console: SharedConsole,
    reports: Vec<ProcessReport>,
    run_depth: usize,
}

impl Interpreter {
    pub fn new(kernel: Kernel, console: SharedConsole) -> Interpreter {
        Interpreter {
            variables: VariableStore::default(),
            kernel: Some(kernel),
            console,
            reports: Vec::new(),
            run_depth: 0,
        }
    }

    pub fn kernel(&self) -> Option<&Kernel> {
        self.kernel.as_ref()
    }

    pub fn variables(&self) -> &VariableStore {
        &self.variables
    }

    /// Reports from the most recent successful `exec`.
    pub fn last_reports(&self) -> &[ProcessReport] {
        &self.reports
    }

    /// Tokenizes and executes one line. Blank lines succeed and a line that
    /// cannot be tokenized fails.
    pub fn interpret_line(&mut self, line: &str) -> CommandStatus {
        match tokenize(line) {
            Ok(tokens) => match Command::from_tokens(tokens) {
                Some(command) => self.execute(&command),
                None => CommandStatus::Success,
            },
            Err(err) => {
                self.print(&err.to_string());
                CommandStatus::FAILED
            }
        }
    }

    pub fn shutdown(&mut self) {
        if let Some(kernel) = self.kernel.as_mut() {
            kernel.shutdown();
        }
    }

    fn print(&self, line: &str) {
        self.console.borrow_mut().print(line);
    }

    fn check_arity(&self, builtin: Builtin, command: &Command) -> bool {
        let (min, max) = builtin.arity();
        let received = command.token_count();
        let plural = |count: usize| if count == 2 { "" } else { "s" };

        let message = if min == max && received != min {
            format!(
                "Error: '{}' expected {} argument{}, but received {}",
                builtin.name(),
                min - 1,
                plural(min),
                received - 1
            )
        } else if received > max {
            format!(
                "Error: '{}' expected at most {} argument{}, but received {}",
                builtin.name(),
                max - 1,
                plural(max),
                received - 1
            )
        } else if received < min {
            format!(
                "Error: '{}' expected a minimum of {} argument{}, but received {}",
                builtin.name(),
                min - 1,
                plural(min),
                received - 1
            )
        } else {
            return true;
        };

        self.print(&message);
        self.print(&format!("'{}' valid format:", builtin.name()));
        self.print(&format!("> {}", builtin.usage()));
        self.print(&format!("Type 'help {}' for more information", builtin.name()));
        false
    }

    fn help(&mut self, command: &Command) -> CommandStatus {
        let topic = match command.arg(0) {
            Some(topic) => topic,
            None => {
                for builtin in BUILTINS {
                    self.print(&format!("{:>35}    {}", builtin.usage(), builtin.description()));
                }
                return CommandStatus::Success;
            }
        };

        match Builtin::from_verb(topic) {
            Some(builtin) => {
                self.print(&format!("      {}    {}", builtin.usage(), builtin.description()));
                CommandStatus::Success
            }
            None => {
                self.print(&format!("Unknown command '{}'", topic));
                CommandStatus::FAILED
            }
        }
    }

    fn set(&mut self, command: &Command) -> CommandStatus {
        let name = command.arg(0).unwrap_or_default();
        let value = command.arg(1).unwrap_or_default();

        match self.variables.set(name, value) {
            Ok(()) => {
                self.print(&format!("{} = {}", name, value));
                CommandStatus::Success
            }
            Err(err) => {
                self.print(&err.to_string());
                CommandStatus::FAILED
            }
        }
    }

    fn print_variable(&mut self, command: &Command) -> CommandStatus {
        let name = command.arg(0).unwrap_or_default();
        let line = match self.variables.get(name) {
            Some(value) => value.to_string(),
            None => {
                self.print("Variable does not exist");
                return CommandStatus::FAILED;
            }
        };
        self.print(&line);
        CommandStatus::Success
    }

    /// Runs a script line by line. The first failing line stops the script
    /// and is reported indented by how deep the failure started.
    fn run(&mut self, command: &Command) -> CommandStatus {
        let path = command.arg(0).unwrap_or_default();
        if self.run_depth == MAX_RUN_DEPTH {
            self.print(&format!("run: Script '{}' nested too deeply", path));
            return CommandStatus::FAILED;
        }

        let program = match read_program(path) {
            Ok(program) => program,
            Err(_) => {
                self.print(&format!("run: Script '{}' not found", path));
                return CommandStatus::FAILED;
            }
        };

        self.run_depth += 1;
        let mut status = CommandStatus::Success;
        for (idx, line) in program.lines.iter().enumerate() {
            match self.interpret_line(line) {
                CommandStatus::Success => {}
                CommandStatus::Terminate => break,
                CommandStatus::Failed { depth } => {
                    self.print(&format!(
                        "{}at '{}':line {}: {}",
                        "  ".repeat(depth as usize),
                        path,
                        idx + 1,
                        line
                    ));
                    status = CommandStatus::Failed { depth: depth + 1 };
                    break;
                }
            }
        }
        self.run_depth -= 1;

        status
    }

    fn exec(&mut self, command: &Command) -> CommandStatus {
        let mut kernel = match self.kernel.take() {
            Some(kernel) => kernel,
            None => {
                self.print("exec: programs are already running");
                return CommandStatus::FAILED;
            }
        };

        let result = kernel.exec(command.args.as_slice(), self);
        let verbose = kernel.config().verbose;
        self.kernel = Some(kernel);

        match result {
            Ok(reports) => {
                if verbose {
                    self.print_reports(&reports);
                }
                self.reports = reports;
                CommandStatus::Success
            }
            Err(_) => CommandStatus::FAILED,
        }
    }

    fn print_reports(&self, reports: &[ProcessReport]) {
        self.print("... ID | Program          | Slices | Instructions | Outcome");
        self.print("...----|------------------|--------|--------------|----------");
        for report in reports {
            self.print(&format!(
                "... {:02} | {:<16} | {:>6} | {:>12} | {:?}",
                report.id.0, report.name, report.slices, report.instructions, report.outcome
            ));
        }
    }
}

impl CommandExecutor for Interpreter {
    fn execute(&mut self, command: &Command) -> CommandStatus {
        let builtin = match Builtin::from_verb(&command.verb) {
            Some(builtin) => builtin,
            None => {
                self.print(&format!("Unknown command '{}'", command.verb));
                return CommandStatus::FAILED;
            }
        };

        if !self.check_arity(builtin, command) {
            return CommandStatus::FAILED;
        }

        match builtin {
            Builtin::Clear => {
                self.print("\x1b[2J\x1b[H");
                CommandStatus::Success
            }
            Builtin::Echo => {
                self.print(command.arg(0).unwrap_or_default());
                CommandStatus::Success
            }
            Builtin::Exec => self.exec(command),
            Builtin::Help => self.help(command),
            Builtin::Print => self.print_variable(command),
            Builtin::Quit => {
                self.print("bye!");
                CommandStatus::Terminate
            }
            Builtin::Run => self.run(command),
            Builtin::Set => self.set(command),
        }
    }
}
