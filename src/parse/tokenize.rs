use std::collections::HashMap;

use super::types::{FlagValue, ParsedCommand};

/// Split a segment into words on runs of whitespace.
///
/// No quoting or escaping: `echo "a b"` yields `["echo", "\"a", "b\""]`.
pub fn tokenize(segment: &str) -> Vec<&str> {
    segment.split_whitespace().collect()
}

/// Parse one segment (no control operators) into a [`ParsedCommand`].
///
/// The first word is the command name, lowercased. A word starting with `-`
/// is a flag and consumes the next word as its value unless that word is
/// itself a flag. Everything else is a positional arg.
pub fn parse_command(segment: &str) -> ParsedCommand {
    let words = tokenize(segment);
    let Some((first, rest)) = words.split_first() else {
        return ParsedCommand::default();
    };

    let mut args = Vec::new();
    let mut flags = HashMap::new();

    let mut i = 0;
    while i < rest.len() {
        let word = rest[i];
        if word.starts_with('-') {
            let name = word.trim_start_matches('-').to_string();
            match rest.get(i + 1) {
                Some(next) if !next.starts_with('-') => {
                    flags.insert(name, FlagValue::Value((*next).to_string()));
                    i += 2;
                }
                _ => {
                    flags.insert(name, FlagValue::Set);
                    i += 1;
                }
            }
        } else {
            args.push(word.to_string());
            i += 1;
        }
    }

    ParsedCommand {
        command: first.to_lowercase(),
        args,
        flags,
    }
}
