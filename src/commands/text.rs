use async_trait::async_trait;
use rand::seq::IndexedRandom;

use crate::commands::{Command, CommandError};
use crate::eval::{CommandContext, Output};

/// Bubble width before cowsay wraps a line.
const COWSAY_WIDTH: usize = 40;

const COW: &str = r"        \   ^__^
         \  (oo)\_______
            (__)\       )\/\
                ||----w |
                ||     ||";

/// `echo [text...]`: args joined with single spaces.
pub struct Echo;

#[async_trait(?Send)]
impl Command for Echo {
    fn description(&self) -> &str {
        "Print text"
    }

    fn accepts_piped_input(&self) -> bool {
        true
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<Output, CommandError> {
        Ok(Output::Text(ctx.parsed.joined_args()))
    }
}

/// `cowsay [message...]`: the classic talking cow.
pub struct Cowsay;

#[async_trait(?Send)]
impl Command for Cowsay {
    fn description(&self) -> &str {
        "Have a cow say something"
    }

    fn accepts_piped_input(&self) -> bool {
        true
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<Output, CommandError> {
        let message = ctx.parsed.joined_args();
        let message = if message.trim().is_empty() {
            "Moo!"
        } else {
            message.as_str()
        };
        Ok(Output::Art(cowsay(message, COWSAY_WIDTH)))
    }
}

/// `fortune`: a random quote from the configured list.
pub struct Fortune {
    quotes: Vec<String>,
}

impl Fortune {
    pub fn new(quotes: Vec<String>) -> Self {
        Self { quotes }
    }
}

#[async_trait(?Send)]
impl Command for Fortune {
    fn description(&self) -> &str {
        "Get a random fortune"
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<Output, CommandError> {
        Ok(match self.quotes.choose(ctx.rng()) {
            Some(quote) => Output::Text(quote.clone()),
            None => Output::Silent,
        })
    }
}

/// Word-wrap `text` to `width` columns. Existing newlines are kept; words
/// longer than `width` are split.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    for line in text.lines() {
        let mut current = String::new();
        let mut current_len = 0;
        for word in line.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > width {
                if current_len > 0 {
                    out.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                let rest = word.split_off(width);
                out.push(word.into_iter().collect());
                word = rest;
            }
            let needed = if current_len == 0 {
                word.len()
            } else {
                current_len + 1 + word.len()
            };
            if needed > width {
                out.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.extend(word.iter());
            current_len += word.len();
        }
        if current_len > 0 {
            out.push(current);
        }
    }
    out
}

/// Draw `message` in a speech bubble above the cow.
pub fn cowsay(message: &str, width: usize) -> String {
    let lines = wrap(message, width.max(1));
    let lines = if lines.is_empty() {
        vec![String::new()]
    } else {
        lines
    };
    let max = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);

    let mut out = Vec::with_capacity(lines.len() + 7);
    out.push(format!(" {}", "_".repeat(max + 2)));
    let last = lines.len() - 1;
    for (i, line) in lines.iter().enumerate() {
        let (open, close) = match (i, lines.len()) {
            (_, 1) => ('<', '>'),
            (0, _) => ('/', '\\'),
            (i, _) if i == last => ('\\', '/'),
            _ => ('|', '|'),
        };
        let pad = max - line.chars().count();
        out.push(format!("{open} {line}{} {close}", " ".repeat(pad)));
    }
    out.push(format!(" {}", "-".repeat(max + 2)));
    out.push(COW.to_string());
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_short() {
        assert_eq!(wrap("hello world", 40), vec!["hello world"]);
    }

    #[test]
    fn wrap_at_width() {
        assert_eq!(
            wrap("the quick brown fox jumps", 10),
            vec!["the quick", "brown fox", "jumps"]
        );
    }

    #[test]
    fn wrap_keeps_newlines() {
        assert_eq!(wrap("one\ntwo", 40), vec!["one", "two"]);
    }

    #[test]
    fn wrap_splits_long_word() {
        assert_eq!(wrap("abcdefghij xy", 4), vec!["abcd", "efgh", "ij", "xy"]);
    }

    #[test]
    fn cowsay_single_line() {
        let art = cowsay("hi", 40);
        let lines: Vec<&str> = art.lines().collect();
        assert_eq!(lines[0], " ____");
        assert_eq!(lines[1], "< hi >");
        assert_eq!(lines[2], " ----");
        assert_eq!(lines[3], "        \\   ^__^");
        assert_eq!(lines.len(), 8);
    }

    #[test]
    fn cowsay_multi_line() {
        let art = cowsay("a\nbbb\ncc", 40);
        let lines: Vec<&str> = art.lines().collect();
        assert_eq!(lines[1], "/ a   \\");
        assert_eq!(lines[2], "| bbb |");
        assert_eq!(lines[3], "\\ cc  /");
    }
}
