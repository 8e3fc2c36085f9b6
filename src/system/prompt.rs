// src/system/prompt.rs

//! Yes/no confirmation capability consumed by the installer.

use dialoguer::{Confirm as DialoguerPrompt, theme::ColorfulTheme};
use std::fmt;
use std::io;

pub trait Confirm: Send + Sync + fmt::Debug {
    /// Asks `message` and returns the answer. A negative answer is not an error.
    fn confirm(&self, message: &str) -> io::Result<bool>;
}

/// Terminal prompt. Defaults to "no".
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&self, message: &str) -> io::Result<bool> {
        DialoguerPrompt::with_theme(&ColorfulTheme::default())
            .with_prompt(message)
            .default(false)
            .interact()
            .map_err(io::Error::other)
    }
}

/// Always gives the same answer. For non-interactive callers and tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

impl Confirm for FixedAnswer {
    fn confirm(&self, _message: &str) -> io::Result<bool> {
        Ok(self.0)
    }
}
