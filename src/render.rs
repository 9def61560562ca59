//! Output renderers: where [`RenderEvent`]s end up.
//!
//! Rendering is best-effort. Write failures are logged, never propagated,
//! so a broken pipe on stdout cannot abort a chain mid-way.

use std::io::Write;

use crate::eval::{Block, Output, RenderEvent};

fn report(result: std::io::Result<()>) {
    if let Err(e) = result {
        log::warn!("render failed: {e}");
    }
}

/// Sink for render events, consumed in emission order.
pub trait Renderer {
    fn render(&mut self, event: RenderEvent);
    /// Wipe everything rendered so far.
    fn clear(&mut self);
}

// ── Recording ──

/// Keeps every event in memory. `clear` drops what was recorded so far.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub events: Vec<RenderEvent>,
    pub clears: usize,
}

impl RecordingRenderer {
    /// Messages of all recorded error events.
    pub fn errors(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                RenderEvent::Error { message } => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }

    /// All recorded command outputs.
    pub fn outputs(&self) -> Vec<&Output> {
        self.events
            .iter()
            .filter_map(|e| match e {
                RenderEvent::Output { output } => Some(output),
                _ => None,
            })
            .collect()
    }

    /// Number of animation frames recorded.
    pub fn frames(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, RenderEvent::Frame { .. }))
            .count()
    }
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, event: RenderEvent) {
        self.events.push(event);
    }

    fn clear(&mut self) {
        self.events.clear();
        self.clears += 1;
    }
}

// ── Terminal (ANSI) ──

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const CYAN: &str = "\x1b[36m";

/// Plain-text renderer for a real terminal, optionally colored.
pub struct TerminalRenderer<W: Write> {
    out: W,
    color: bool,
    /// Whether `Prompt` events are printed. Off when the REPL already drew the prompt.
    echo_prompt: bool,
    /// Height of the last animation frame, so the next one can overwrite it.
    frame_height: usize,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self {
            out,
            color,
            echo_prompt: true,
            frame_height: 0,
        }
    }

    pub fn with_prompt_echo(mut self, echo: bool) -> Self {
        self.echo_prompt = echo;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, style: &str, text: &str) -> String {
        if self.color {
            format!("{style}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn block_text(&self, block: &Block) -> String {
        let mut lines = Vec::new();
        if let Some(h) = &block.heading {
            lines.push(self.paint(BOLD, h));
        }
        if let Some(h) = &block.hint {
            lines.push(self.paint(DIM, h));
        }
        lines.extend(block.lines.iter().cloned());
        for link in &block.links {
            lines.push(format!("{} <{}>", link.label, self.paint(CYAN, &link.href)));
        }
        lines.join("\n")
    }

    fn format(&self, event: &RenderEvent) -> Option<String> {
        match event {
            RenderEvent::Prompt { .. } if !self.echo_prompt => None,
            RenderEvent::Prompt { prompt, line } => {
                Some(format!("{} {line}", self.paint(GREEN, prompt)))
            }
            RenderEvent::Output { output } => match output {
                Output::Silent => None,
                Output::Text(s) | Output::Art(s) => Some(s.clone()),
                Output::Rich(blocks) => Some(
                    blocks
                        .iter()
                        .map(|b| self.block_text(b))
                        .collect::<Vec<_>>()
                        .join("\n\n"),
                ),
            },
            RenderEvent::Error { message } => Some(self.paint(RED, message)),
            RenderEvent::Frame { art } => Some(art.clone()),
        }
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render(&mut self, event: RenderEvent) {
        let Some(text) = self.format(&event) else {
            return;
        };
        if matches!(event, RenderEvent::Frame { .. }) {
            if self.color && self.frame_height > 0 {
                // Move back over the previous frame and redraw in place
                report(write!(self.out, "\x1b[{}A\x1b[J", self.frame_height));
            }
            self.frame_height = text.lines().count();
        } else {
            self.frame_height = 0;
        }
        report(writeln!(self.out, "{text}").and_then(|_| self.out.flush()));
    }

    fn clear(&mut self) {
        self.frame_height = 0;
        if self.color {
            report(write!(self.out, "\x1b[2J\x1b[H").and_then(|_| self.out.flush()));
        }
    }
}

// ── HTML ──

/// Escape text for inclusion in HTML content or attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Markup for one output, using the page's CSS classes.
pub fn output_html(output: &Output) -> Option<String> {
    match output {
        Output::Silent => None,
        Output::Text(s) => Some(escape_html(s).replace('\n', "<br>")),
        Output::Art(s) => Some(format!("<pre class=\"ascii-art\">{}</pre>", escape_html(s))),
        Output::Rich(blocks) => Some(blocks.iter().map(block_html).collect()),
    }
}

fn block_html(block: &Block) -> String {
    let mut parts = Vec::new();
    if let Some(h) = &block.heading {
        parts.push(format!(
            "<span class=\"section-heading\">{}</span>",
            escape_html(h)
        ));
    }
    if let Some(h) = &block.hint {
        parts.push(format!("<span class=\"tab-hint\">{}</span>", escape_html(h)));
    }
    parts.extend(block.lines.iter().map(|l| escape_html(l)));
    parts.extend(block.links.iter().map(|l| {
        format!(
            "<a href=\"{}\" target=\"_blank\">{}</a>",
            escape_html(&l.href),
            escape_html(&l.label)
        )
    }));
    format!("<div class=\"panel-box\">{}</div>", parts.join("<br>"))
}

/// Writes one `<div class="output-line">` per event.
pub struct HtmlRenderer<W: Write> {
    out: W,
}

impl<W: Write> HtmlRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for HtmlRenderer<W> {
    fn render(&mut self, event: RenderEvent) {
        let inner = match &event {
            RenderEvent::Prompt { prompt, line } => Some(format!(
                "<span class=\"prompt\">{}</span>{}",
                escape_html(prompt),
                escape_html(line)
            )),
            RenderEvent::Output { output } => output_html(output),
            RenderEvent::Error { message } => Some(format!(
                "<span class=\"error\">{}</span>",
                escape_html(message)
            )),
            RenderEvent::Frame { art } => Some(format!(
                "<pre class=\"ascii-art frame\">{}</pre>",
                escape_html(art)
            )),
        };
        if let Some(inner) = inner {
            report(writeln!(self.out, "<div class=\"output-line\">{inner}</div>"));
        }
    }

    fn clear(&mut self) {
        report(writeln!(self.out, "<!-- clear -->"));
    }
}

// ── JSON lines ──

/// Writes each event as one JSON object per line.
pub struct JsonRenderer<W: Write> {
    out: W,
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for JsonRenderer<W> {
    fn render(&mut self, event: RenderEvent) {
        report(
            serde_json::to_string(&event)
                .map_err(std::io::Error::other)
                .and_then(|line| writeln!(self.out, "{line}")),
        );
    }

    fn clear(&mut self) {
        report(writeln!(self.out, "{}", serde_json::json!({ "event": "clear" })));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::Link;

    fn text(s: &str) -> RenderEvent {
        RenderEvent::Output {
            output: Output::Text(s.into()),
        }
    }

    #[test]
    fn recording_clear_drops_events() {
        let mut r = RecordingRenderer::default();
        r.render(text("a"));
        r.clear();
        r.render(text("b"));
        assert_eq!(r.events, vec![text("b")]);
        assert_eq!(r.clears, 1);
    }

    #[test]
    fn terminal_plain() {
        let mut r = TerminalRenderer::new(Vec::new(), false);
        r.render(RenderEvent::Prompt {
            prompt: "visitor@portfolio:~$".into(),
            line: "echo hi".into(),
        });
        r.render(text("hi"));
        r.render(RenderEvent::Output {
            output: Output::Silent,
        });
        r.render(RenderEvent::Error {
            message: "command not found: x".into(),
        });
        let out = String::from_utf8(r.into_inner()).unwrap();
        assert_eq!(
            out,
            "visitor@portfolio:~$ echo hi\nhi\ncommand not found: x\n"
        );
    }

    #[test]
    fn terminal_without_prompt_echo() {
        let mut r = TerminalRenderer::new(Vec::new(), false).with_prompt_echo(false);
        r.render(RenderEvent::Prompt {
            prompt: "$".into(),
            line: "pwd".into(),
        });
        r.render(text("/home/visitor"));
        assert_eq!(String::from_utf8(r.into_inner()).unwrap(), "/home/visitor\n");
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe))
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe))
        }
    }

    #[test]
    fn write_failures_are_swallowed() {
        let frame = || RenderEvent::Frame { art: "&\n|".into() };
        let mut term = TerminalRenderer::new(Broken, true);
        term.render(frame());
        term.render(frame());
        term.clear();
        term.render(text("x"));

        let mut html = HtmlRenderer::new(Broken);
        html.render(text("x"));
        html.clear();

        let mut json = JsonRenderer::new(Broken);
        json.render(text("x"));
        json.clear();
    }

    #[test]
    fn colored_frames_redraw_in_place() {
        let mut r = TerminalRenderer::new(Vec::new(), true);
        r.render(RenderEvent::Frame { art: "a\nb".into() });
        r.render(RenderEvent::Frame { art: "c\nd".into() });
        let out = String::from_utf8(r.into_inner()).unwrap();
        assert_eq!(out, "a\nb\n\x1b[2A\x1b[Jc\nd\n");
    }

    #[test]
    fn html_escapes() {
        assert_eq!(escape_html("<b>&\"'"), "&lt;b&gt;&amp;&quot;&#39;");
    }

    #[test]
    fn html_block() {
        let out = Output::Rich(vec![Block {
            heading: Some("Tools:".into()),
            hint: None,
            lines: vec!["Git, Docker".into()],
            links: vec![Link {
                label: "GitHub".into(),
                href: "https://github.com/x".into(),
            }],
        }]);
        assert_eq!(
            output_html(&out).unwrap(),
            "<div class=\"panel-box\"><span class=\"section-heading\">Tools:</span><br>\
             Git, Docker<br><a href=\"https://github.com/x\" target=\"_blank\">GitHub</a></div>"
        );
    }

    #[test]
    fn html_error_line() {
        let mut r = HtmlRenderer::new(Vec::new());
        r.render(RenderEvent::Error {
            message: "cat: <x>: No such file or directory".into(),
        });
        let out = String::from_utf8(r.into_inner()).unwrap();
        assert_eq!(
            out,
            "<div class=\"output-line\"><span class=\"error\">cat: &lt;x&gt;: No such file or directory</span></div>\n"
        );
    }

    #[test]
    fn json_lines() {
        let mut r = JsonRenderer::new(Vec::new());
        r.render(text("hi"));
        r.clear();
        let out = String::from_utf8(r.into_inner()).unwrap();
        let lines: Vec<serde_json::Value> = out
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines[0]["event"], "output");
        assert_eq!(lines[1]["event"], "clear");
    }
}
