//! portfolio-term: the command-line interpreter behind a terminal-style
//! portfolio site.
//!
//! A submitted line is split at control operators (`;`, `&&`, `||`, `|`)
//! into a [`CommandChain`](parse::CommandChain). Each link is dispatched
//! against a [`CommandRegistry`](eval::CommandRegistry) built from
//! configuration, and every result is handed to a
//! [`Renderer`](render::Renderer) as it completes.
//!
//! # Architecture
//!
//! - **[`parse`]**: Tokenizer: operator splitting, flag/arg classification, chain types.
//! - **[`eval`]**: Chain evaluator: registry, pipe data flow, structured output, errors.
//! - **[`commands`]**: The command set (help, panels, echo, cowsay, fortune, bonsai, files).
//! - **[`session`]**: Per-terminal state: history, autocomplete, input lock, pacing.
//! - **[`terminal`]**: Front end tying session, registry and renderer together.
//! - **[`render`]**: Renderers: ANSI terminal, HTML, JSON lines, in-memory.
//! - **[`config`]**: Configuration loading: embedded defaults + user overlay merge.
//! - **[`logging`]**: File logging via `simplelog`.

/// Command trait and the terminal's commands.
pub mod commands;
/// Configuration types, loading, and overlay merge logic.
pub mod config;
/// Evaluation engine: registry, chain walking, output and error types.
pub mod eval;
/// File-based logging setup.
pub mod logging;
/// Command-line parsing: operator splitting, tokenizer, chain types.
pub mod parse;
/// Render event sinks.
pub mod render;
/// Session state and injected capabilities.
pub mod session;
/// Terminal front end.
pub mod terminal;

use eval::RenderEvent;
use render::RecordingRenderer;

/// Build the registry from default config and evaluate one line.
///
/// Animations do not wait and the random source is seeded from the OS.
/// This is the main entry point for tests and simple usage; interactive
/// front ends should hold a [`terminal::Terminal`].
pub fn evaluate(line: &str) -> Vec<RenderEvent> {
    let config = config::Config::default_config();
    let registry = eval::CommandRegistry::from_config(&config);
    let mut session = session::Session::new(
        config.settings.history_limit,
        Box::new(session::InputGate::default()),
        Box::new(session::InstantPacer),
    );
    let mut screen = RecordingRenderer::default();
    futures::executor::block_on(registry.evaluate(line, &mut session, &mut screen));
    screen.events
}
