use std::io::{self, BufRead, Stderr, StdinLock, Write};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PromptError {
    #[error("Failed to read confirmation: {0}")]
    Io(#[from] io::Error),
}

/// Asks the user to approve a destructive action.
pub trait Confirm {
    fn confirm(&mut self, question: &str) -> Result<bool, PromptError>;
}

/// Line-based yes/no prompt. Anything but an explicit "y" or "yes" is a refusal.
pub struct TerminalPrompt<R, W> {
    input: R,
    output: W,
}

impl TerminalPrompt<StdinLock<'static>, Stderr> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Confirm for TerminalPrompt<R, W> {
    fn confirm(&mut self, question: &str) -> Result<bool, PromptError> {
        write!(self.output, "{} [y/N] ", question)?;
        self.output.flush()?;

        let mut answer = String::new();
        if self.input.read_line(&mut answer)? == 0 {
            // EOF
            writeln!(self.output)?;
            return Ok(false);
        }

        Ok(is_affirmative(&answer))
    }
}

pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
