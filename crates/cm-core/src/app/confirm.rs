//! Yes/no confirmation gate for destructive actions.

use std::io::{self, BufRead, Write};

use tracing::warn;

/// Asks the user to approve an action.
pub trait Confirm {
    /// Show `message` and return whether the user agreed.
    fn confirm(&mut self, message: &str) -> bool;
}

impl<T: Confirm + ?Sized> Confirm for &mut T {
    fn confirm(&mut self, message: &str) -> bool {
        (**self).confirm(message)
    }
}

/// Approves everything without asking (`--yes`).
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self, _message: &str) -> bool {
        true
    }
}

/// Prompts on a writer and reads the answer from a reader.
///
/// Only `y` or `yes` (any case) approves; anything else, including end of
/// input or a read error, declines.
pub struct PromptConfirm<R, W> {
    input: R,
    output: W,
}

impl PromptConfirm<io::StdinLock<'static>, io::Stderr> {
    /// Prompt on stderr so stdout stays reserved for command payloads.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> PromptConfirm<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn ask(&mut self, message: &str) -> io::Result<bool> {
        write!(self.output, "{} [y/N] ", message)?;
        self.output.flush()?;

        let mut answer = String::new();
        self.input.read_line(&mut answer)?;
        let answer = answer.trim().to_ascii_lowercase();
        Ok(answer == "y" || answer == "yes")
    }
}

impl<R: BufRead, W: Write> Confirm for PromptConfirm<R, W> {
    fn confirm(&mut self, message: &str) -> bool {
        match self.ask(message) {
            Ok(answer) => answer,
            Err(e) => {
                warn!(error = %e, "Confirmation prompt failed; treating as declined");
                false
            }
        }
    }
}
