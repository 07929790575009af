//! Explicit diagnostic sink for checks.
//!
//! Verification and audits write their per-token lines into a [`Reporter`]
//! handed to them by the caller instead of printing. The caller decides what
//! reaches the terminal: on failure everything buffered is flushed so the
//! context around a broken token is visible; on success the detail is
//! dropped unless the run is verbose.

use std::io::{self, Write};

/// How much a [`Reporter`] lets through on success.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// Failures only.
    Quiet,
    /// Failures, plus the summary line the caller prints itself.
    #[default]
    Normal,
    /// Every buffered line, pass or fail.
    Verbose,
}

#[derive(Debug, Default)]
pub struct Reporter {
    verbosity: Verbosity,
    lines: Vec<Line>,
    failures: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Line {
    failure: bool,
    text: String,
}

impl Reporter {
    #[must_use]
    pub const fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            lines: Vec::new(),
            failures: 0,
        }
    }

    #[must_use]
    pub const fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Buffer an informational line.
    pub fn detail(&mut self, text: impl Into<String>) {
        let text = text.into();
        tracing::trace!("{text}");
        self.lines.push(Line { failure: false, text });
    }

    /// Buffer a failure line and count it.
    pub fn failure(&mut self, text: impl Into<String>) {
        let text = text.into();
        tracing::debug!("{text}");
        self.failures += 1;
        self.lines.push(Line { failure: true, text });
    }

    #[must_use]
    pub const fn has_failures(&self) -> bool {
        self.failures > 0
    }

    #[must_use]
    pub const fn failure_count(&self) -> usize {
        self.failures
    }

    /// Buffered lines not yet flushed.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|line| line.text.as_str())
    }

    /// Write the buffer to `out` if anything failed (or the reporter is
    /// verbose), then clear it. Returns whether anything was written.
    ///
    /// On a clean, non-verbose run the buffer is discarded.
    ///
    /// # Errors
    ///
    /// Propagates write errors from `out`.
    pub fn flush_on_error(&mut self, out: &mut impl Write) -> io::Result<bool> {
        let lines = std::mem::take(&mut self.lines);
        let show_all = self.verbosity == Verbosity::Verbose;
        if !self.has_failures() && !show_all {
            return Ok(false);
        }

        let mut wrote = false;
        for line in lines.iter().filter(|line| line.failure || self.verbosity > Verbosity::Quiet) {
            writeln!(out, "{}", line.text)?;
            wrote = true;
        }
        out.flush()?;
        Ok(wrote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn flushed(reporter: &mut Reporter) -> (bool, String) {
        let mut out = Vec::new();
        let wrote = reporter.flush_on_error(&mut out).unwrap();
        (wrote, String::from_utf8(out).unwrap())
    }

    #[test]
    fn clean_run_discards_detail() {
        let mut reporter = Reporter::new(Verbosity::Normal);
        reporter.detail("ok light.accentSubtle");
        assert!(!reporter.has_failures());
        assert_eq!(flushed(&mut reporter), (false, String::new()));
        assert_eq!(reporter.lines().count(), 0);
    }

    #[test]
    fn failure_flushes_context() {
        let mut reporter = Reporter::new(Verbosity::Normal);
        reporter.detail("ok light.accent");
        reporter.failure("FAIL light.accentSubtle");
        assert_eq!(reporter.failure_count(), 1);
        assert_eq!(
            flushed(&mut reporter),
            (true, "ok light.accent\nFAIL light.accentSubtle\n".to_owned())
        );
    }

    #[test]
    fn quiet_failure_shows_only_failures() {
        let mut reporter = Reporter::new(Verbosity::Quiet);
        reporter.detail("ok dark.bg");
        reporter.failure("FAIL dark.onInfo");
        assert_eq!(flushed(&mut reporter), (true, "FAIL dark.onInfo\n".to_owned()));
    }

    #[test]
    fn verbose_clean_run_shows_everything() {
        let mut reporter = Reporter::new(Verbosity::Verbose);
        reporter.detail("ok dark.bg");
        assert_eq!(flushed(&mut reporter), (true, "ok dark.bg\n".to_owned()));
    }
}
