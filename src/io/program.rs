use std::io::{self, BufRead, ErrorKind};

/// A script ready to be copied into RAM, one instruction per line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Program {
    pub name: String,
    pub lines: Vec<String>,
}

impl Program {
    pub fn new<S: Into<String>>(name: impl Into<String>, lines: impl IntoIterator<Item = S>) -> Program {
        Program {
            name: name.into(),
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Reads every line from `reader`. Line terminators are stripped. A line
    /// that fails to read or is not valid UTF-8 becomes an empty instruction;
    /// a second read error in a row ends the program there.
    pub fn from_reader<R: BufRead>(name: impl Into<String>, mut reader: R) -> io::Result<Program> {
        let mut lines = Vec::new();
        let mut buf = Vec::new();
        let mut last_failed = false;

        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) => break,
                Ok(_) => last_failed = false,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(_) if last_failed => break,
                Err(_) => {
                    last_failed = true;
                    lines.push(String::new());
                    continue;
                }
            }
            if buf.last() == Some(&b'\n') {
                buf.pop();
                if buf.last() == Some(&b'\r') {
                    buf.pop();
                }
            }
            lines.push(String::from_utf8(std::mem::take(&mut buf)).unwrap_or_default());
        }

        Ok(Program {
            name: name.into(),
            lines,
        })
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
