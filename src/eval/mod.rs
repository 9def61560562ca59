pub mod context;
pub mod error;
pub mod output;
pub mod restricted;

pub use context::CommandContext;
pub use error::EvalError;
pub use output::{Block, Link, Output, RenderEvent};

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::commands::Command;
use crate::config::Config;
use crate::parse::{self, Operator, ParsedCommand};
use crate::render::Renderer;
use crate::session::Session;

/// Registry of all commands, keyed by lowercase name, plus the restricted set.
pub struct CommandRegistry {
    commands: HashMap<String, Box<dyn Command>>,
    restricted: HashSet<String>,
}

impl CommandRegistry {
    /// Build the registry from configuration.
    pub fn from_config(config: &Config) -> Self {
        use crate::commands::{
            bonsai::Bonsai,
            files::{Cat, Ls, Pwd, VirtualFs},
            info::{Help, Panel},
            screen::Clear,
            text::{Cowsay, Echo, Fortune},
        };

        let mut commands: HashMap<String, Box<dyn Command>> = HashMap::new();

        // Content panels
        let panels = &config.panels;
        commands.insert(
            "skills".into(),
            Box::new(Panel::new("View technical skills", panels.skills.clone())),
        );
        commands.insert(
            "projects".into(),
            Box::new(Panel::new("See projects", panels.projects.clone())),
        );
        commands.insert(
            "experience".into(),
            Box::new(Panel::new("View work experience", panels.experience.clone())),
        );
        commands.insert(
            "contact".into(),
            Box::new(Panel::new("Get contact information", panels.contact.clone())),
        );

        // Files
        let fs = Rc::new(VirtualFs::new(config.files.clone()));
        commands.insert("ls".into(), Box::new(Ls::new(fs.clone())));
        commands.insert("cat".into(), Box::new(Cat::new(fs)));
        commands.insert("pwd".into(), Box::new(Pwd::new(config.settings.home.clone())));

        // Text and art
        commands.insert("echo".into(), Box::new(Echo));
        commands.insert("cowsay".into(), Box::new(Cowsay));
        commands.insert(
            "fortune".into(),
            Box::new(Fortune::new(config.fortune.quotes.clone())),
        );
        commands.insert(
            "bonsai".into(),
            Box::new(Bonsai::new(config.bonsai.frames, config.bonsai.frame_ms)),
        );
        commands.insert("clear".into(), Box::new(Clear));

        // Help lists everything registered so far, itself included
        let help = Help::new(
            commands
                .iter()
                .map(|(name, cmd)| (name.clone(), cmd.description().to_string()))
                .chain(std::iter::once((
                    "help".to_string(),
                    "Display available commands".to_string(),
                )))
                .collect(),
        );
        commands.insert("help".into(), Box::new(help));

        let restricted = config
            .restricted
            .commands
            .iter()
            .map(|c| c.to_lowercase())
            .collect();

        Self {
            commands,
            restricted,
        }
    }

    /// Look up a command by exact (lowercase) name.
    fn get(&self, name: &str) -> Option<&dyn Command> {
        self.commands.get(name).map(|b| b.as_ref())
    }

    /// Registered command names, sorted. Restricted names are not included.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn is_restricted(&self, name: &str) -> bool {
        self.restricted.contains(name)
    }

    /// Evaluate a full input line, rendering every result as it completes.
    ///
    /// Links run strictly in order. `;`, `&&` and `||` always continue. `|`
    /// hands the stripped output of one link to the next instead of
    /// rendering it. Which errors end the line is decided by
    /// [`EvalError::ends_chain`]; after any other error the next link runs
    /// with its own args.
    pub async fn evaluate(&self, line: &str, session: &mut Session, screen: &mut dyn Renderer) {
        if parse::has_redirection(line) {
            let err = EvalError::Restricted {
                subject: restricted::REDIRECTION.to_string(),
                message: restricted::pick_message(&mut session.rng),
            };
            log::warn!("rejected redirection: {line}");
            screen.render(RenderEvent::Error {
                message: err.to_string(),
            });
            return;
        }

        let chain = parse::parse_command_line(line);
        let mut previous: Option<Output> = None;
        let mut after_pipe = false;

        for (index, link) in chain.links.into_iter().enumerate() {
            let will_be_piped = link.operator == Some(Operator::Pipe);
            let piped = if after_pipe {
                previous.take().filter(|o| !o.is_silent())
            } else {
                None
            };
            let is_sink = piped.is_some();

            match self
                .run_link(link.command, piped, will_be_piped, session, screen)
                .await
            {
                Ok(output) if will_be_piped => previous = Some(output),
                Ok(output) => {
                    if !output.is_silent() {
                        screen.render(RenderEvent::Output { output });
                    }
                    previous = None;
                }
                Err(err) => {
                    let fatal = err.ends_chain(will_be_piped || is_sink);
                    screen.render(RenderEvent::Error {
                        message: err.to_string(),
                    });
                    if fatal {
                        log::warn!("chain terminated at link {index}: {err}");
                        break;
                    }
                    log::debug!("link {index} failed: {err}");
                    previous = None;
                }
            }
            after_pipe = will_be_piped;
        }
    }

    /// Resolve and run one link. `piped` is the previous link's output when
    /// this link is a pipe sink.
    async fn run_link(
        &self,
        mut parsed: ParsedCommand,
        piped: Option<Output>,
        will_be_piped: bool,
        session: &mut Session,
        screen: &mut dyn Renderer,
    ) -> Result<Output, EvalError> {
        if parsed.is_empty() {
            return Ok(Output::Silent);
        }
        let name = parsed.command.clone();

        if self.is_restricted(&name) {
            return Err(EvalError::Restricted {
                subject: name,
                message: restricted::pick_message(&mut session.rng),
            });
        }

        let command = self.get(&name);

        let piped_text = match piped {
            Some(previous) => {
                if !command.is_some_and(|c| c.accepts_piped_input()) {
                    return Err(EvalError::UnsupportedPipeTarget(name));
                }
                let text = previous.to_piped_text();
                parsed.args = vec![text.clone()];
                Some(text)
            }
            None => None,
        };

        let Some(command) = command else {
            return Err(EvalError::UnknownCommand(name));
        };

        if piped_text.is_none() && will_be_piped && !command.pipeable() {
            return Err(EvalError::NotPipeable(name));
        }

        log::debug!(
            "dispatch {name} args={:?} piped={}",
            parsed.args,
            piped_text.is_some()
        );
        let mut ctx = CommandContext::new(parsed, session, screen);
        ctx.piped = piped_text;
        Ok(command.execute(&mut ctx).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RecordingRenderer;
    use futures::executor::block_on;

    fn run(line: &str) -> RecordingRenderer {
        let registry = CommandRegistry::from_config(&Config::default_config());
        let mut session = Session::for_tests(11);
        let mut screen = RecordingRenderer::default();
        block_on(registry.evaluate(line, &mut session, &mut screen));
        screen
    }

    fn text(s: &str) -> RenderEvent {
        RenderEvent::Output {
            output: Output::Text(s.into()),
        }
    }

    #[test]
    fn registry_has_every_command() {
        let registry = CommandRegistry::from_config(&Config::default_config());
        assert_eq!(
            registry.names(),
            vec![
                "bonsai",
                "cat",
                "clear",
                "contact",
                "cowsay",
                "echo",
                "experience",
                "fortune",
                "help",
                "ls",
                "projects",
                "pwd",
                "skills",
            ]
        );
        assert!(registry.is_restricted("sudo"));
        assert!(!registry.is_restricted("echo"));
    }

    #[test]
    fn echo_renders_text() {
        assert_eq!(run("echo hello   world").events, vec![text("hello world")]);
    }

    #[test]
    fn semicolon_runs_both() {
        assert_eq!(
            run("echo a; echo b").events,
            vec![text("a"), text("b")]
        );
    }

    #[test]
    fn and_or_do_not_branch() {
        assert_eq!(
            run("nope && echo a || echo b").events,
            vec![
                RenderEvent::Error {
                    message: "command not found: nope".into()
                },
                text("a"),
                text("b"),
            ]
        );
    }

    #[test]
    fn pipe_suppresses_source_output() {
        assert_eq!(run("echo hi | echo").events, vec![text("hi")]);
    }

    #[test]
    fn pipe_replaces_sink_args() {
        assert_eq!(run("echo piped | echo literal").events, vec![text("piped")]);
    }

    #[test]
    fn pipe_chain_of_three() {
        assert_eq!(run("echo x | echo | echo").events, vec![text("x")]);
    }

    #[test]
    fn silent_source_is_not_piped() {
        // `clear` yields nothing, so `echo` runs with its own args
        let screen = run("clear | echo own");
        assert_eq!(screen.events, vec![text("own")]);
        assert_eq!(screen.clears, 1);
    }

    #[test]
    fn unsupported_sink_terminates() {
        assert_eq!(
            run("echo hi | pwd ; echo after").errors(),
            vec!["pwd: does not support piped input"]
        );
        assert!(run("echo hi | pwd ; echo after").outputs().is_empty());
    }

    #[test]
    fn unknown_sink_terminates() {
        assert_eq!(
            run("echo hi | nope; echo after").events,
            vec![RenderEvent::Error {
                message: "nope: does not support piped input".into()
            }]
        );
    }

    #[test]
    fn unknown_pipe_source_terminates() {
        assert_eq!(
            run("nope | cowsay; echo after").events,
            vec![RenderEvent::Error {
                message: "command not found: nope".into()
            }]
        );
    }

    #[test]
    fn restricted_in_sequence_continues() {
        let screen = run("sudo ls; echo after");
        assert_eq!(screen.errors().len(), 1);
        assert!(screen.errors()[0].starts_with("sudo: "));
        assert_eq!(screen.outputs(), vec![&Output::Text("after".into())]);
    }

    #[test]
    fn restricted_sink_continues() {
        let screen = run("echo hi | rm; echo after");
        assert_eq!(screen.errors().len(), 1);
        assert!(screen.errors()[0].starts_with("rm: "));
        assert_eq!(screen.outputs(), vec![&Output::Text("after".into())]);
    }

    #[test]
    fn restricted_source_leaves_next_link_unpiped() {
        // `echo` gets nothing from `sudo` and echoes its own args
        let screen = run("sudo ls | echo own; echo after");
        assert!(screen.errors()[0].starts_with("sudo: "));
        assert_eq!(
            screen.outputs(),
            vec![&Output::Text("own".into()), &Output::Text("after".into())]
        );
    }

    #[test]
    fn restricted_name_is_case_insensitive() {
        let screen = run("SUDO whoami");
        assert!(screen.errors()[0].starts_with("sudo: "));
    }

    #[test]
    fn redirection_rejected_before_parsing() {
        let screen = run("echo hi > out.txt; echo never");
        assert_eq!(screen.events.len(), 1);
        let err = screen.errors()[0];
        assert!(err.starts_with("redirection: "));
        let message = err.trim_start_matches("redirection: ");
        assert!(restricted::MESSAGES.contains(&message));
    }

    #[test]
    fn empty_links_are_noops() {
        assert_eq!(run("echo a ;; echo b ;").events, vec![text("a"), text("b")]);
        assert!(run(";").events.is_empty());
    }

    #[test]
    fn bonsai_cannot_be_piped() {
        let screen = run("bonsai | cat");
        assert_eq!(
            screen.events,
            vec![RenderEvent::Error {
                message: "'bonsai' does not support piping".into()
            }]
        );
    }

    #[test]
    fn bonsai_cannot_be_a_sink() {
        assert_eq!(
            run("echo 1 | bonsai").errors(),
            vec!["bonsai: does not support piped input"]
        );
    }

    #[test]
    fn command_error_in_sequence_continues() {
        let screen = run("cat nofile.md; echo after");
        assert_eq!(
            screen.errors(),
            vec!["cat: nofile.md: No such file or directory"]
        );
        assert_eq!(screen.outputs(), vec![&Output::Text("after".into())]);
    }

    #[test]
    fn command_error_as_pipe_source_continues() {
        let screen = run("cat nofile.md | cowsay; echo after");
        assert_eq!(
            screen.errors(),
            vec!["cat: nofile.md: No such file or directory"]
        );
        let outputs = screen.outputs();
        assert_eq!(outputs.len(), 2);
        assert!(matches!(outputs[0], Output::Art(art) if art.contains("Moo!")));
        assert_eq!(outputs[1], &Output::Text("after".into()));
    }

    #[test]
    fn flags_survive_pipe() {
        // `-x` is kept as a flag; only positional args are replaced
        assert_eq!(run("echo hi | echo -x").events, vec![text("hi")]);
    }
}
