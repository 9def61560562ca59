use rand::rngs::StdRng;

use crate::parse::ParsedCommand;
use crate::render::Renderer;
use crate::session::Session;

/// Everything a command sees while it executes.
///
/// Capabilities (input lock, pacing, screen) are reached only through this
/// context, never through globals.
pub struct CommandContext<'a> {
    /// The parsed sub-command. For a pipe sink, `args` holds the piped text
    /// as its sole element.
    pub parsed: ParsedCommand,
    /// Stripped output of the previous link, when this link is a pipe sink.
    pub piped: Option<String>,
    pub session: &'a mut Session,
    pub screen: &'a mut dyn Renderer,
}

impl<'a> CommandContext<'a> {
    pub fn new(parsed: ParsedCommand, session: &'a mut Session, screen: &'a mut dyn Renderer) -> Self {
        Self {
            parsed,
            piped: None,
            session,
            screen,
        }
    }

    /// Positional arguments.
    pub fn args(&self) -> &[String] {
        &self.parsed.args
    }

    /// Session random source.
    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.session.rng
    }
}
