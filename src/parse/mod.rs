pub mod shell;
pub mod tokenize;
pub mod types;

pub use shell::{has_redirection, parse_command_line};
pub use tokenize::{parse_command, tokenize};
pub use types::{ChainLink, CommandChain, FlagValue, Operator, ParsedCommand};
