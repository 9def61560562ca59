use serde::{Deserialize, Serialize};

/// A hyperlink inside a rich block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub label: String,
    pub href: String,
}

/// A block-level panel: optional heading and hint, body lines, trailing links.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    #[serde(default)]
    pub heading: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
    #[serde(default)]
    pub lines: Vec<String>,
    #[serde(default)]
    pub links: Vec<Link>,
}

impl Block {
    /// Each block-level element of this panel as its own text line, unprocessed.
    fn text_lines(&self) -> impl Iterator<Item = &str> {
        self.heading
            .iter()
            .chain(self.hint.iter())
            .chain(self.lines.iter())
            .map(String::as_str)
            .chain(self.links.iter().map(|l| l.label.as_str()))
    }
}

/// Result of a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Output {
    /// Nothing to render (e.g. `clear`).
    Silent,
    /// Plain text, possibly multi-line.
    Text(String),
    /// Structured panels.
    Rich(Vec<Block>),
    /// Preformatted ASCII art; whitespace is significant when rendered.
    Art(String),
}

impl Output {
    pub fn is_silent(&self) -> bool {
        matches!(self, Output::Silent)
    }

    /// Flatten to plain text for piping.
    ///
    /// One line per block-level element, split further on `\n`; each line
    /// trimmed, empty lines dropped, joined with a single `\n`.
    pub fn to_piped_text(&self) -> String {
        let raw: Vec<&str> = match self {
            Output::Silent => Vec::new(),
            Output::Text(s) | Output::Art(s) => vec![s.as_str()],
            Output::Rich(blocks) => blocks.iter().flat_map(Block::text_lines).collect(),
        };
        raw.iter()
            .flat_map(|s| s.split('\n'))
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// One event handed to the renderer, in completion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RenderEvent {
    /// Echo of the submitted line next to the prompt.
    Prompt { prompt: String, line: String },
    /// A command's rendered output.
    Output { output: Output },
    /// An error line.
    Error { message: String },
    /// An animation frame; replaces the previous frame of the same run.
    Frame { art: String },
}
