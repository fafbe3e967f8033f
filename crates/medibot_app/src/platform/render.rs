use std::io::{self, Write};

use engine_logging::engine_trace;
use medibot_core::{
    AppViewModel, Effect, Message, Role, BOOKING_LABEL, DISCLAIMER, PAGE_TITLE,
};

/// Append-only transcript renderer for a terminal.
///
/// Only what changed since the previous call is printed, so the output reads
/// like a chat log.
pub struct TerminalRenderer<W: Write> {
    out: W,
    booking_url: String,
    printed: usize,
    was_busy: bool,
    was_recording: bool,
    showed_cta: bool,
    prompt_open: bool,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, booking_url: impl Into<String>) -> Self {
        Self {
            out,
            booking_url: booking_url.into(),
            printed: 0,
            was_busy: false,
            was_recording: false,
            showed_cta: false,
            prompt_open: false,
        }
    }

    pub fn render_header(&mut self) -> io::Result<()> {
        writeln!(self.out, "{PAGE_TITLE}")?;
        writeln!(self.out, "{DISCLAIMER}")?;
        writeln!(self.out, "(/voice 音声入力, /stop 停止, /quit 終了, 行末の \\ で改行)")?;
        self.out.flush()
    }

    pub fn render(&mut self, view: &AppViewModel) -> io::Result<()> {
        if std::mem::take(&mut self.prompt_open) {
            writeln!(self.out)?;
        }
        for message in view.messages.iter().skip(self.printed) {
            write_message(&mut self.out, message)?;
        }
        self.printed = view.messages.len();

        if view.recording != self.was_recording {
            let label = if view.recording { "● 録音中" } else { "録音終了" };
            writeln!(self.out, "[{label}]")?;
            self.was_recording = view.recording;
        }

        if view.busy && !self.was_busy {
            writeln!(self.out, "AI> …")?;
        }
        self.was_busy = view.busy;

        // The link follows the latest message, so it may disappear again.
        if view.show_booking_cta && !self.showed_cta {
            writeln!(self.out, "[{BOOKING_LABEL}] {}", self.booking_url)?;
        }
        self.showed_cta = view.show_booking_cta;

        if !view.closed {
            if !view.draft.is_empty() {
                write!(self.out, "[{}] ", view.draft.replace('\n', " / "))?;
            }
            write!(self.out, "{} ", view.placeholder)?;
            self.prompt_open = true;
        }
        self.out.flush()
    }

    /// Carries out presentation-only effects.
    pub fn apply(&mut self, effect: &Effect) -> io::Result<()> {
        match effect {
            Effect::NotifyUser { text } => {
                if std::mem::take(&mut self.prompt_open) {
                    writeln!(self.out)?;
                }
                writeln!(self.out, "!! {text}")?;
                self.out.flush()
            }
            // A terminal transcript always scrolls and keeps focus.
            other => {
                engine_trace!("Presentation effect {:?} has no terminal action", other);
                Ok(())
            }
        }
    }
}

fn write_message(out: &mut impl Write, message: &Message) -> io::Result<()> {
    let speaker = match message.role() {
        Role::User => "あなた",
        Role::Assistant => "AI",
    };
    let mut lines = message.content().lines();
    writeln!(out, "{speaker}> {}", lines.next().unwrap_or_default())?;
    for line in lines {
        writeln!(out, "    {line}")?;
    }
    Ok(())
}
