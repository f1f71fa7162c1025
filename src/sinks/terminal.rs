use std::io::{IsTerminal, Stderr, Write};

use crossterm::{
    cursor, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use tracing::debug;

use crate::controller::{RunSummary, RunView};

const PROGRESS_BAR_WIDTH: usize = 30;

/// Terminal front-end: log lines on `out`, a progress bar redrawn on stderr.
pub struct ConsoleView<W: Write> {
    out: W,
    bar: Option<ProgressBar>,
}

impl ConsoleView<std::io::Stdout> {
    /// Writes lines to stdout; the progress bar is shown only when stderr is
    /// a terminal.
    #[must_use]
    pub fn stdout(no_color: bool) -> Self {
        let bar = std::io::stderr()
            .is_terminal()
            .then(|| ProgressBar::new(no_color));
        Self {
            out: std::io::stdout(),
            bar,
        }
    }
}

impl<W: Write> ConsoleView<W> {
    /// View without a progress bar, writing everything to `out`.
    pub const fn plain(out: W) -> Self {
        Self { out, bar: None }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_out(&mut self, text: &str) {
        if let Some(bar) = self.bar.as_mut()
            && let Err(err) = bar.clear_line()
        {
            debug!("Progress bar clear failed: {}", err);
        }
        if let Err(err) = writeln!(self.out, "{}", text).and_then(|()| self.out.flush()) {
            debug!("Console write failed: {}", err);
        }
        if let Some(bar) = self.bar.as_mut()
            && let Err(err) = bar.redraw()
        {
            debug!("Progress bar redraw failed: {}", err);
        }
    }
}

impl<W: Write> RunView for ConsoleView<W> {
    fn clear(&mut self) {
        if let Some(bar) = self.bar.as_mut() {
            bar.reset();
        }
    }

    fn log_line(&mut self, line: &str) {
        self.write_out(line);
    }

    fn progress(&mut self, percent: u8) {
        if let Some(bar) = self.bar.as_mut()
            && let Err(err) = bar.set(percent)
        {
            debug!("Progress bar render failed: {}", err);
        }
    }

    fn validation_error(&mut self, message: &str) {
        self.write_out(message);
    }

    fn finished(&mut self, summary: &RunSummary) {
        if let Some(bar) = self.bar.as_mut()
            && let Err(err) = bar.finish()
        {
            debug!("Progress bar finish failed: {}", err);
        }
        self.bar = None;
        let line = summary_line(summary);
        self.write_out(&line);
    }
}

pub(super) fn summary_line(summary: &RunSummary) -> String {
    let secs = summary.elapsed.as_secs();
    let tenths = summary.elapsed.subsec_millis().checked_div(100).unwrap_or(0);
    if summary.cancelled {
        format!(
            "Cancelled after {}/{} requests: {} succeeded, {} failed in {}.{}s",
            summary.completed, summary.total, summary.succeeded, summary.failed, secs, tenths
        )
    } else {
        format!(
            "Done: {} requests, {} succeeded, {} failed in {}.{}s (peak {} workers)",
            summary.completed, summary.succeeded, summary.failed, secs, tenths, summary.peak_in_flight
        )
    }
}

struct ProgressBar {
    out: Stderr,
    percent: u8,
    drawn: bool,
    no_color: bool,
}

impl ProgressBar {
    fn new(no_color: bool) -> Self {
        Self {
            out: std::io::stderr(),
            percent: 0,
            drawn: false,
            no_color,
        }
    }

    fn reset(&mut self) {
        self.percent = 0;
    }

    fn set(&mut self, percent: u8) -> Result<(), std::io::Error> {
        if self.drawn && percent == self.percent {
            return Ok(());
        }
        self.percent = percent.min(100);
        self.redraw()
    }

    fn clear_line(&mut self) -> Result<(), std::io::Error> {
        if !self.drawn {
            return Ok(());
        }
        queue!(self.out, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine))?;
        self.out.flush()
    }

    fn redraw(&mut self) -> Result<(), std::io::Error> {
        let (bar, percent_text) = build_progress_line(self.percent, PROGRESS_BAR_WIDTH);
        queue!(self.out, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine))?;
        queue!(self.out, Print(&bar))?;
        if self.no_color {
            queue!(self.out, Print(&percent_text))?;
        } else {
            queue!(
                self.out,
                SetForegroundColor(Color::Cyan),
                Print(&percent_text),
                ResetColor
            )?;
        }
        self.out.flush()?;
        self.drawn = true;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), std::io::Error> {
        if !self.drawn {
            return Ok(());
        }
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        self.drawn = false;
        Ok(())
    }
}

/// Bar and percentage text for a whole-percent value.
pub(super) fn build_progress_line(percent: u8, width: usize) -> (String, String) {
    let width = width.max(1);
    let percent = usize::from(percent.min(100));
    let complete = percent
        .saturating_mul(width)
        .checked_div(100)
        .unwrap_or(0)
        .min(width);
    let incomplete = width.saturating_sub(complete);
    (
        format!("[{}{}]", "#".repeat(complete), "-".repeat(incomplete)),
        format!(" {}%", percent),
    )
}
