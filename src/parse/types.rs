//! Types produced by the command-line parser and consumed by the eval layer.

use std::collections::HashMap;

/// Control operator following a chain link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `|`: feed this link's output to the next link
    Pipe,
    /// `&&`: run next (no exit status is modelled, so always)
    And,
    /// `||`: run next (no exit status is modelled, so always)
    Or,
    /// `;`: run next unconditionally
    Semi,
}

impl Operator {
    /// The operator's shell syntax.
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Pipe => "|",
            Operator::And => "&&",
            Operator::Or => "||",
            Operator::Semi => ";",
        }
    }
}

/// Value attached to a flag token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagValue {
    /// `-s 42`: the flag consumed the following token.
    Value(String),
    /// `-a`: bare flag (last token, or followed by another flag).
    Set,
}

impl FlagValue {
    /// The consumed value, if any.
    pub fn as_value(&self) -> Option<&str> {
        match self {
            FlagValue::Value(v) => Some(v),
            FlagValue::Set => None,
        }
    }
}

/// One sub-command: lowercased name, positional args, flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCommand {
    /// Command name, lowercased. Empty for an empty segment.
    pub command: String,
    /// Positional arguments in input order.
    pub args: Vec<String>,
    /// Flags keyed by name with leading dashes removed.
    pub flags: HashMap<String, FlagValue>,
}

impl ParsedCommand {
    /// Whether this is an empty segment (e.g. after a trailing `;`).
    pub fn is_empty(&self) -> bool {
        self.command.is_empty()
    }

    /// Check whether a flag is present, with or without a value.
    pub fn has_flag(&self, name: &str) -> bool {
        self.flags.contains_key(name)
    }

    /// Look up a flag by name.
    pub fn flag(&self, name: &str) -> Option<&FlagValue> {
        self.flags.get(name)
    }

    /// All positional args joined with single spaces.
    pub fn joined_args(&self) -> String {
        self.args.join(" ")
    }
}

/// A sub-command plus the operator that follows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainLink {
    pub command: ParsedCommand,
    /// `None` for the last link of the line.
    pub operator: Option<Operator>,
}

/// A fully decomposed input line.
///
/// A line with N operators always has N+1 links, empty segments included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandChain {
    pub links: Vec<ChainLink>,
}

impl CommandChain {
    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Operators between links, in order.
    pub fn operators(&self) -> impl Iterator<Item = Operator> + '_ {
        self.links.iter().filter_map(|l| l.operator)
    }
}
