//! The terminal's command set.
//!
//! Each command implements [`Command`]. Content-only commands (skills,
//! projects, ...) are data-driven from configuration; the rest carry their
//! own small logic.

/// Animated bonsai tree generator.
pub mod bonsai;
/// Virtual files: `ls`, `cat`, `pwd`.
pub mod files;
/// Help listing and config-driven content panels.
pub mod info;
/// Screen control: `clear`.
pub mod screen;
/// Free-text commands: `echo`, `cowsay`, `fortune`.
pub mod text;

use async_trait::async_trait;
use thiserror::Error;

use crate::eval::{CommandContext, Output};

/// Command-local failures. Rendered inline; the command produces nothing else.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("{command}: {path}: No such file or directory")]
    NoSuchFile { command: &'static str, path: String },

    #[error("{command}: missing {what} operand")]
    MissingOperand {
        command: &'static str,
        what: &'static str,
    },

    #[error("{command}: invalid value '{value}' for -{flag}: {reason}")]
    InvalidFlagValue {
        command: &'static str,
        flag: &'static str,
        value: String,
        reason: String,
    },
}

/// A named terminal command.
///
/// `execute` may suspend (animations); the evaluator awaits it before moving
/// to the next link, so no two commands ever run at once.
#[async_trait(?Send)]
pub trait Command {
    /// One-line description shown by `help`.
    fn description(&self) -> &str;

    /// Whether the command can be the right-hand side of `|`.
    fn accepts_piped_input(&self) -> bool {
        false
    }

    /// Whether the command's output can be captured as the left-hand side of `|`.
    fn pipeable(&self) -> bool {
        true
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<Output, CommandError>;
}
