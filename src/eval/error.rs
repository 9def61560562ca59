use thiserror::Error;

use crate::commands::CommandError;

/// Chain-level failures. Each one renders as a single error line.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("command not found: {0}")]
    UnknownCommand(String),

    /// A command other than a pipe sink received piped input.
    #[error("{0}: does not support piped input")]
    UnsupportedPipeTarget(String),

    /// A producer whose output cannot be captured was used as a pipe source.
    #[error("'{0}' does not support piping")]
    NotPipeable(String),

    #[error("{subject}: {message}")]
    Restricted {
        subject: String,
        message: &'static str,
    },

    #[error(transparent)]
    Command(#[from] CommandError),
}

impl EvalError {
    /// Whether the error ends the rest of the line.
    ///
    /// Pipe misuse always does. An unknown command does only when a pipe is
    /// open on its link. Restricted commands and command-local errors never
    /// do: they are the link's result and the next link runs with its own
    /// args.
    pub fn ends_chain(&self, pipe_open: bool) -> bool {
        match self {
            EvalError::UnsupportedPipeTarget(_) | EvalError::NotPipeable(_) => true,
            EvalError::UnknownCommand(_) => pipe_open,
            EvalError::Restricted { .. } | EvalError::Command(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(
            EvalError::UnknownCommand("badcmd".into()).to_string(),
            "command not found: badcmd"
        );
        assert_eq!(
            EvalError::UnsupportedPipeTarget("cat".into()).to_string(),
            "cat: does not support piped input"
        );
        assert_eq!(
            EvalError::NotPipeable("bonsai".into()).to_string(),
            "'bonsai' does not support piping"
        );
        assert_eq!(
            EvalError::Restricted {
                subject: "rm".into(),
                message: "Nice try! But you can't do that here.",
            }
            .to_string(),
            "rm: Nice try! But you can't do that here."
        );
    }

    #[test]
    fn command_error_is_transparent() {
        let err: EvalError = CommandError::NoSuchFile {
            command: "cat",
            path: "nofile.md".into(),
        }
        .into();
        assert_eq!(err.to_string(), "cat: nofile.md: No such file or directory");
        assert!(!err.ends_chain(false));
        assert!(!err.ends_chain(true));
    }

    #[test]
    fn which_errors_end_the_chain() {
        let restricted = EvalError::Restricted {
            subject: "rm".into(),
            message: "Nice try! But you can't do that here.",
        };
        assert!(!restricted.ends_chain(true));
        assert!(!restricted.ends_chain(false));

        let unknown = EvalError::UnknownCommand("nope".into());
        assert!(unknown.ends_chain(true));
        assert!(!unknown.ends_chain(false));

        assert!(EvalError::NotPipeable("bonsai".into()).ends_chain(false));
        assert!(EvalError::UnsupportedPipeTarget("pwd".into()).ends_chain(false));
    }
}
