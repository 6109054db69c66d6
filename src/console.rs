//! Line-oriented terminal I/O used by the menu.

use crossterm::{
    cursor::MoveTo,
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use std::{
    collections::VecDeque,
    io::{self, BufRead, Stdin, Stdout, Write},
    thread,
    time::Duration,
};

/// What a piece of text is for; terminals map this to a color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Heading,
    Listing,
    Prompt,
    Success,
    Error,
}

impl Tone {
    fn color(self) -> Color {
        match self {
            Tone::Plain => Color::Reset,
            Tone::Heading | Tone::Listing => Color::Yellow,
            Tone::Prompt => Color::Blue,
            Tone::Success => Color::Green,
            Tone::Error => Color::Red,
        }
    }
}

pub trait Console {
    /// Writes `text` without a trailing newline.
    fn print(&mut self, tone: Tone, text: &str) -> io::Result<()>;

    fn println(&mut self, tone: Tone, text: &str) -> io::Result<()> {
        self.print(tone, text)?;
        self.print(Tone::Plain, "\n")
    }

    fn clear(&mut self) -> io::Result<()>;

    /// Cosmetic delay. Implementations may ignore it.
    fn pause(&mut self, duration: Duration);

    /// Reads one line without its line ending, or `None` once input is closed.
    fn read_line(&mut self) -> io::Result<Option<String>>;
}

/// Console on the process' stdin/stdout, colored with crossterm.
pub struct TerminalConsole {
    stdout: Stdout,
    stdin: Stdin,
    pacing: bool,
}

impl TerminalConsole {
    pub fn new(pacing: bool) -> Self {
        Self {
            stdout: io::stdout(),
            stdin: io::stdin(),
            pacing,
        }
    }
}

impl Console for TerminalConsole {
    fn print(&mut self, tone: Tone, text: &str) -> io::Result<()> {
        queue!(
            self.stdout,
            SetForegroundColor(tone.color()),
            Print(text),
            ResetColor
        )?;
        self.stdout.flush()
    }

    fn clear(&mut self) -> io::Result<()> {
        execute!(self.stdout, Clear(ClearType::All), MoveTo(0, 0))
    }

    fn pause(&mut self, duration: Duration) {
        if self.pacing {
            thread::sleep(duration);
        }
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        read_lossy_line(&mut self.stdin.lock())
    }
}

/// Reads one line, replacing invalid UTF-8 instead of failing on it.
fn read_lossy_line<R: BufRead>(reader: &mut R) -> io::Result<Option<String>> {
    let mut bytes = Vec::new();
    if reader.read_until(b'\n', &mut bytes)? == 0 {
        return Ok(None);
    }
    let line = String::from_utf8_lossy(&bytes);
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_owned()))
}

/// Console fed from a fixed list of input lines; records everything printed.
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    inputs: VecDeque<String>,
    transcript: String,
    clears: usize,
}

impl ScriptedConsole {
    pub fn new<I, L>(inputs: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        Self {
            inputs: inputs.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Everything printed so far, without colors.
    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    pub fn remaining_inputs(&self) -> usize {
        self.inputs.len()
    }

    pub fn clears(&self) -> usize {
        self.clears
    }
}

impl Console for ScriptedConsole {
    fn print(&mut self, _tone: Tone, text: &str) -> io::Result<()> {
        self.transcript.push_str(text);
        Ok(())
    }

    fn clear(&mut self) -> io::Result<()> {
        self.clears += 1;
        Ok(())
    }

    fn pause(&mut self, _duration: Duration) {}

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let line = self.inputs.pop_front();
        if let Some(line) = &line {
            self.transcript.push_str(line);
            self.transcript.push('\n');
        }
        Ok(line)
    }
}
