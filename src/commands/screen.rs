use async_trait::async_trait;

use crate::commands::{Command, CommandError};
use crate::eval::{CommandContext, Output};

/// `clear`: wipes the screen; renders nothing itself.
pub struct Clear;

#[async_trait(?Send)]
impl Command for Clear {
    fn description(&self) -> &str {
        "Clear the terminal"
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<Output, CommandError> {
        ctx.screen.clear();
        Ok(Output::Silent)
    }
}
