//! Log sink for the tracing subscriber.
//!
//! Log lines go to stderr, which is also where the spinner draws. While a
//! spinner is tracked, each line is written with the spinner suspended so the
//! two never interleave on the same terminal row.

use indicatif::ProgressBar;
use std::io::{self, Write};
use std::sync::Mutex;
use tracing_subscriber::fmt::MakeWriter;

static ACTIVE_SPINNER: Mutex<Option<ProgressBar>> = Mutex::new(None);

/// `MakeWriter` handed to the fmt subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogWriter;

impl<'a> MakeWriter<'a> for LogWriter {
    type Writer = LogLine<io::Stderr>;

    fn make_writer(&'a self) -> Self::Writer {
        LogLine::new(active_spinner(), io::stderr())
    }
}

/// One formatted event on its way to `sink`.
pub struct LogLine<W> {
    spinner: Option<ProgressBar>,
    sink: W,
}

impl<W: Write> LogLine<W> {
    pub fn new(spinner: Option<ProgressBar>, sink: W) -> Self {
        Self { spinner, sink }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.sink
    }
}

impl<W: Write> Write for LogLine<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &self.spinner {
            Some(spinner) => spinner.suspend(|| self.sink.write(buf)),
            None => self.sink.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        self.sink.flush()
    }
}

/// Keeps `spinner` tracked by the log sink until dropped.
#[must_use = "the spinner is untracked as soon as the guard is dropped"]
pub struct SpinnerGuard(());

impl Drop for SpinnerGuard {
    fn drop(&mut self) {
        if let Ok(mut active) = ACTIVE_SPINNER.lock() {
            *active = None;
        }
    }
}

/// Routes log lines around `spinner` while the returned guard lives.
pub fn track_spinner(spinner: &ProgressBar) -> SpinnerGuard {
    if let Ok(mut active) = ACTIVE_SPINNER.lock() {
        *active = Some(spinner.clone());
    }
    SpinnerGuard(())
}

fn active_spinner() -> Option<ProgressBar> {
    ACTIVE_SPINNER.lock().ok().and_then(|active| active.clone())
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
