use super::tokenize::parse_command;
use super::types::{ChainLink, CommandChain, Operator};

/// Split a line at control operators (`&&`, `||`, `;`, `|`).
///
/// Two-char operators are matched before single-char ones, so `||` is never
/// read as two pipes. A lone `&` is ordinary text. Empty segments are kept:
/// the result always has exactly one more segment than operators.
fn split_chain(line: &str) -> (Vec<String>, Vec<Operator>) {
    let mut parts = Vec::new();
    let mut operators = Vec::new();
    let mut buf = String::new();

    let chars: Vec<char> = line.chars().collect();
    let len = chars.len();
    let mut i = 0;

    while i < len {
        let c = chars[i];

        // Two-char operators
        if i + 1 < len {
            let op = match (c, chars[i + 1]) {
                ('&', '&') => Some(Operator::And),
                ('|', '|') => Some(Operator::Or),
                _ => None,
            };
            if let Some(op) = op {
                parts.push(buf.trim().to_string());
                operators.push(op);
                buf.clear();
                i += 2;
                continue;
            }
        }

        // Single-char operators
        let op = match c {
            '|' => Some(Operator::Pipe),
            ';' => Some(Operator::Semi),
            _ => None,
        };
        if let Some(op) = op {
            parts.push(buf.trim().to_string());
            operators.push(op);
            buf.clear();
            i += 1;
            continue;
        }

        buf.push(c);
        i += 1;
    }

    parts.push(buf.trim().to_string());
    (parts, operators)
}

/// Blunt line-level check for redirection characters.
///
/// Not token-aware: `echo a>b` and `echo <3` both match.
pub fn has_redirection(line: &str) -> bool {
    line.contains(['<', '>'])
}

/// Parse a full input line into a [`CommandChain`].
///
/// Every link carries the operator that follows it; the last link has none.
pub fn parse_command_line(line: &str) -> CommandChain {
    let (parts, operators) = split_chain(line.trim());
    let mut ops = operators.into_iter();

    let links: Vec<ChainLink> = parts
        .iter()
        .map(|part| ChainLink {
            command: parse_command(part),
            operator: ops.next(),
        })
        .collect();

    log::debug!(
        "parsed {} link(s): {}",
        links.len(),
        links
            .iter()
            .map(|l| match l.operator {
                Some(op) => format!("[{}] {}", l.command.command, op.as_str()),
                None => format!("[{}]", l.command.command),
            })
            .collect::<Vec<_>>()
            .join(" ")
    );

    CommandChain { links }
}
