//! Terminal confirmation prompt.

use eventscout_domain::Confirmation;
use std::io::{self, BufRead, Write};

/// Asks on `output` and reads the answer from `input`.
///
/// Only `y`, `Y`, `n` and `N` are accepted; anything else asks again.
/// End of input counts as no.
pub struct PromptConfirmation<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptConfirmation<R, W> {
    /// Create a prompt over the given streams.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl PromptConfirmation<io::StdinLock<'static>, io::Stdout> {
    /// Prompt on the terminal.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Confirmation for PromptConfirmation<R, W> {
    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        loop {
            writeln!(self.output, "⚠ {} (y/n)", question)?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(false);
            }

            match line.trim_end_matches(['\r', '\n']) {
                "y" | "Y" => return Ok(true),
                "n" | "N" => return Ok(false),
                _ => continue,
            }
        }
    }
}
