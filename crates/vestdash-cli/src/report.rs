//! Terminal reporter for dashboard notices.

use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};

use vestdash_core::{Notice, NoticeLevel, Reporter};

use crate::format::format_notice;

/// Writes notices to stderr and counts errors.
///
/// Success notices are hidden in quiet mode; warnings and errors always show.
#[derive(Debug, Default)]
pub struct ConsoleReporter {
    no_color: bool,
    quiet: bool,
    errors: AtomicUsize,
}

impl ConsoleReporter {
    pub fn new(no_color: bool, quiet: bool) -> Self {
        Self {
            no_color,
            quiet,
            errors: AtomicUsize::new(0),
        }
    }

    /// Number of error notices seen so far.
    pub fn error_count(&self) -> usize {
        self.errors.load(Ordering::Relaxed)
    }
}

impl Reporter for ConsoleReporter {
    fn report(&self, notice: Notice) {
        tracing::debug!(operation = %notice.operation, "{}", notice.message);
        if notice.level == NoticeLevel::Error {
            self.errors.fetch_add(1, Ordering::Relaxed);
        }
        if self.quiet && notice.level == NoticeLevel::Success {
            return;
        }
        let mut stderr = io::stderr().lock();
        let _ = writeln!(stderr, "{}", format_notice(&notice, self.no_color));
    }
}
