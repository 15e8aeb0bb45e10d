//! Asking the user before a destructive operation.

use std::io::{BufRead, Write};
use tracing::debug;

/// Something that can ask the user a yes/no question.
pub trait Confirm {
    /// Returns `true` only when the user agreed.
    fn confirm(&self, prompt: &str) -> bool;
}

/// Agrees to everything, used for `--yes`.
#[derive(Debug, Default, Clone, Copy)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, prompt: &str) -> bool {
        debug!("Assuming yes for '{prompt}'");
        true
    }
}

/// Asks on stderr and reads the answer from stdin. Anything other than `y` or `yes` declines.
#[derive(Debug, Default, Clone, Copy)]
pub struct PromptConfirm;

impl Confirm for PromptConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        let mut stderr = std::io::stderr();
        if write!(stderr, "{prompt} [y/N] ").and_then(|_| stderr.flush()).is_err() {
            return false;
        }
        let mut answer = String::new();
        match std::io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(e) => {
                debug!("Unable to read confirmation: {e}");
                false
            }
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// A `Confirm` that always gives the same answer and remembers what it was asked.
#[cfg(test)]
pub(crate) struct FixedAnswer {
    answer: bool,
    asked: std::cell::RefCell<Vec<String>>,
}

#[cfg(test)]
impl FixedAnswer {
    pub(crate) fn new(answer: bool) -> Self {
        Self {
            answer,
            asked: Default::default(),
        }
    }

    pub(crate) fn asked(&self) -> Vec<String> {
        self.asked.borrow().clone()
    }
}

#[cfg(test)]
impl Confirm for FixedAnswer {
    fn confirm(&self, prompt: &str) -> bool {
        self.asked.borrow_mut().push(prompt.to_string());
        self.answer
    }
}
