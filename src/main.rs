//! portfolio-term: interactive terminal for the portfolio command set.
//!
//! Reads lines from stdin, or evaluates the single line given with `-c`.
//! Color is used only when stdout is a terminal.

use std::io::{BufRead, IsTerminal, Write};

use clap::Parser;
use futures::executor::block_on;
use portfolio_term::config::Config;
use portfolio_term::render::{HtmlRenderer, JsonRenderer, Renderer, TerminalRenderer};
use portfolio_term::session::{InputGate, Session, ThreadPacer};
use portfolio_term::terminal::Terminal;

#[derive(Parser)]
#[command(name = "portfolio-term", version)]
#[command(about = "Terminal-style portfolio command interpreter", long_about = None)]
struct Cli {
    /// Evaluate one line and exit
    #[arg(short = 'c', long = "command", value_name = "LINE")]
    line: Option<String>,

    /// Render events as JSON lines
    #[arg(long, conflicts_with = "html")]
    json: bool,

    /// Render events as HTML output lines
    #[arg(long)]
    html: bool,

    /// Print the merged configuration as TOML and exit
    #[arg(long)]
    dump_config: bool,
}

/// ANSI color only when the output is a terminal.
fn terminal_renderer<W: Write + IsTerminal>(out: W, interactive: bool) -> TerminalRenderer<W> {
    let color = out.is_terminal();
    TerminalRenderer::new(out, color).with_prompt_echo(!interactive)
}

fn run<R: Renderer>(config: &Config, renderer: R, line: Option<String>, interactive: bool) {
    let session = Session::new(
        config.settings.history_limit,
        Box::new(InputGate::default()),
        Box::new(ThreadPacer),
    );
    let mut terminal = Terminal::new(config, session, renderer);

    if let Some(line) = line {
        block_on(terminal.submit(&line));
        return;
    }

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut buf = String::new();
    loop {
        if interactive {
            print!("{} ", terminal.prompt());
            if let Err(e) = std::io::stdout().flush() {
                log::warn!("prompt flush failed: {e}");
            }
        }
        buf.clear();
        match input.read_line(&mut buf) {
            Ok(0) => break,
            Ok(_) => block_on(terminal.submit(buf.trim_end_matches(['\r', '\n']))),
            Err(e) => {
                eprintln!("failed to read stdin: {e}");
                std::process::exit(1);
            }
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let config = Config::load();

    if cli.dump_config {
        match toml::to_string_pretty(&config) {
            Ok(s) => print!("{s}"),
            Err(e) => {
                eprintln!("portfolio-term: cannot serialize config: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    portfolio_term::logging::init(&config.settings);

    let stdout = std::io::stdout();
    if cli.json {
        run(&config, JsonRenderer::new(stdout), cli.line, false);
    } else if cli.html {
        run(&config, HtmlRenderer::new(stdout), cli.line, false);
    } else {
        // The REPL draws the prompt itself
        let interactive = cli.line.is_none();
        run(&config, terminal_renderer(stdout, interactive), cli.line, interactive);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_one_shot_line() {
        let cli = Cli::try_parse_from(["portfolio-term", "-c", "fortune | cowsay", "--json"]).unwrap();
        assert_eq!(cli.line.as_deref(), Some("fortune | cowsay"));
        assert!(cli.json);
        assert!(!cli.html);
        assert!(!cli.dump_config);
    }

    #[test]
    fn json_and_html_conflict() {
        assert!(Cli::try_parse_from(["portfolio-term", "--json", "--html"]).is_err());
    }

    #[test]
    fn unknown_argument_is_rejected() {
        let err = Cli::try_parse_from(["portfolio-term", "--bogus"]).err().unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }

    #[test]
    fn redirected_output_has_no_color() {
        use portfolio_term::eval::RenderEvent;

        let path = std::env::temp_dir().join(format!("portfolio-term-color-{}.txt", std::process::id()));
        let file = std::fs::File::create(&path).unwrap();
        let mut renderer = terminal_renderer(file, false);
        renderer.render(RenderEvent::Error {
            message: "command not found: x".into(),
        });
        drop(renderer);
        let written = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(written, "command not found: x\n");
    }

    #[test]
    fn command_requires_a_line() {
        assert!(Cli::try_parse_from(["portfolio-term", "-c"]).is_err());
    }
}
