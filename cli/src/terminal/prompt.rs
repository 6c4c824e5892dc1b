use std::io::{self, BufRead, IsTerminal};

use console::{Term, style};
use proxyup_core::input::Prompter;

/// Prompts on stdout and reads answers from stdin.
///
/// Secrets are read without echo when stdin is a terminal; piped input is
/// read line by line so the wizard can be scripted.
pub struct TermPrompter {
    term: Term,
}

impl TermPrompter {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }

    fn show(&self, message: &str) -> io::Result<()> {
        self.term
            .write_str(&format!("{} ", style(message.trim_end()).bold()))?;
        self.term.flush()
    }
}

impl Prompter for TermPrompter {
    fn ask(&mut self, message: &str) -> io::Result<Option<String>> {
        self.show(message)?;
        read_stdin_line()
    }

    fn ask_secret(&mut self, message: &str) -> io::Result<Option<String>> {
        self.show(message)?;
        if io::stdin().is_terminal() {
            return self.term.read_secure_line().map(Some);
        }
        read_stdin_line()
    }

    fn notice(&mut self, message: &str) -> io::Result<()> {
        self.term.write_line(message)
    }

    fn confirm(&mut self, message: &str) -> io::Result<bool> {
        let answer: Option<String> = self.ask(&format!("{} [y/N]", message.trim_end()))?;
        Ok(answer.is_some_and(|a| is_yes(&a)))
    }
}

fn read_stdin_line() -> io::Result<Option<String>> {
    read_answer(&mut io::stdin().lock())
}

/// Reads one answer without its line terminator, `None` once input is closed.
fn read_answer<R: BufRead>(reader: &mut R) -> io::Result<Option<String>> {
    let mut line: String = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let trimmed_len: usize = line.trim_end_matches(['\r', '\n']).len();
    line.truncate(trimmed_len);
    Ok(Some(line))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
