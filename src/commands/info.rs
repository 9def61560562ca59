use async_trait::async_trait;

use crate::commands::{Command, CommandError};
use crate::eval::{Block, CommandContext, Output};

/// A content command that renders fixed panels from configuration.
pub struct Panel {
    description: String,
    blocks: Vec<Block>,
}

impl Panel {
    pub fn new(description: impl Into<String>, blocks: Vec<Block>) -> Self {
        Self {
            description: description.into(),
            blocks,
        }
    }
}

#[async_trait(?Send)]
impl Command for Panel {
    fn description(&self) -> &str {
        &self.description
    }

    async fn execute(&self, _ctx: &mut CommandContext<'_>) -> Result<Output, CommandError> {
        if self.blocks.is_empty() {
            return Ok(Output::Silent);
        }
        Ok(Output::Rich(self.blocks.clone()))
    }
}

/// `help`: every registered command with its description.
pub struct Help {
    entries: Vec<(String, String)>,
}

impl Help {
    /// Build from (name, description) pairs; sorted by name.
    pub fn new(mut entries: Vec<(String, String)>) -> Self {
        entries.sort();
        Self { entries }
    }
}

#[async_trait(?Send)]
impl Command for Help {
    fn description(&self) -> &str {
        "Display available commands"
    }

    async fn execute(&self, _ctx: &mut CommandContext<'_>) -> Result<Output, CommandError> {
        let width = self.entries.iter().map(|(n, _)| n.len()).max().unwrap_or(0);
        let lines = self
            .entries
            .iter()
            .map(|(name, desc)| format!("{name:<width$} - {desc}"))
            .collect();
        Ok(Output::Rich(vec![Block {
            heading: Some("Available commands:".into()),
            lines,
            ..Default::default()
        }]))
    }
}
