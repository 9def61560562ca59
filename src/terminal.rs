//! The terminal front: owns the session, the registry and the renderer, and
//! turns submitted lines into render events.

use crate::config::Config;
use crate::eval::{CommandRegistry, RenderEvent};
use crate::render::Renderer;
use crate::session::{self, Completion, Session};

pub struct Terminal<R: Renderer> {
    registry: CommandRegistry,
    session: Session,
    renderer: R,
    prompt: String,
}

impl<R: Renderer> Terminal<R> {
    pub fn new(config: &Config, session: Session, renderer: R) -> Self {
        Self {
            registry: CommandRegistry::from_config(config),
            session,
            renderer,
            prompt: config.settings.prompt.clone(),
        }
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Submit one input line.
    ///
    /// Blank lines are ignored. Otherwise the raw line is recorded in
    /// history, echoed next to the prompt, and evaluated.
    pub async fn submit(&mut self, line: &str) {
        if line.trim().is_empty() {
            return;
        }
        log::info!("submit: {}", line.chars().take(200).collect::<String>());

        self.session.history.push(line);
        self.renderer.render(RenderEvent::Prompt {
            prompt: self.prompt.clone(),
            line: line.to_string(),
        });
        self.registry
            .evaluate(line, &mut self.session, &mut self.renderer)
            .await;
    }

    /// Arrow up: an older history entry, if any.
    pub fn history_previous(&mut self) -> Option<String> {
        self.session.history.older().map(String::from)
    }

    /// Arrow down: a newer history entry, or the empty line.
    pub fn history_next(&mut self) -> String {
        self.session.history.newer().to_string()
    }

    /// Tab: complete a partial command name.
    pub fn complete(&self, partial: &str) -> Completion {
        session::complete(partial, self.registry.names())
    }
}
