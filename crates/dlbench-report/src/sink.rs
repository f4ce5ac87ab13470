use std::io::{self, Stdout, Write};

use console::{Style, Term};

/// How a line should look when styling is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Header,
    Info,
    Success,
    Failure,
}

impl Tone {
    fn style(self) -> Style {
        match self {
            Tone::Plain => Style::new(),
            Tone::Header => Style::new().magenta().bold(),
            Tone::Info => Style::new().blue(),
            Tone::Success => Style::new().green(),
            Tone::Failure => Style::new().red(),
        }
    }
}

/// Destination of user-facing report lines.
pub trait Sink {
    fn emit(&mut self, line: &str, tone: Tone);
}

impl<S: Sink + ?Sized> Sink for &mut S {
    fn emit(&mut self, line: &str, tone: Tone) {
        (**self).emit(line, tone);
    }
}

/// Writes lines to a writer, styled only when asked to.
#[derive(Debug)]
pub struct ConsoleSink<W> {
    out: W,
    styled: bool,
}

impl ConsoleSink<Stdout> {
    /// Stdout, styled when it is a terminal.
    pub fn stdout() -> Self {
        Self::new(io::stdout(), Term::stdout().is_term())
    }
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W, styled: bool) -> Self {
        Self { out, styled }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Sink for ConsoleSink<W> {
    fn emit(&mut self, line: &str, tone: Tone) {
        // A closed stdout must not abort the campaign.
        let _ = if self.styled && tone != Tone::Plain {
            writeln!(
                self.out,
                "{}",
                tone.style().force_styling(true).apply_to(line)
            )
        } else {
            writeln!(self.out, "{line}")
        };
    }
}

/// Keeps every line in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub lines: Vec<(String, Tone)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|(line, _)| line.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Sink for MemorySink {
    fn emit(&mut self, line: &str, tone: Tone) {
        self.lines.push((line.to_string(), tone));
    }
}
