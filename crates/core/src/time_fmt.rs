// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Human-readable durations for reports.

use std::fmt;
use std::time::Duration;

/// Runtimes longer than this are highlighted in reports.
pub const LONG_RUNTIME_THRESHOLD: Duration = Duration::from_secs(2 * 60 * 60);

/// Format a duration as e.g. `"1h 04m 09s"`, `"4m 09s"`, or `"9s"`.
pub fn format_duration(d: Duration) -> String {
    let total = d.as_secs();
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    if h > 0 {
        format!("{}h {:02}m {:02}s", h, m, s)
    } else if m > 0 {
        format!("{}m {:02}s", m, s)
    } else {
        format!("{}s", s)
    }
}

/// A measured runtime, flagged when it exceeds a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elapsed {
    pub duration: Duration,
    pub flagged: bool,
}

impl Elapsed {
    pub fn new(duration: Duration, threshold: Duration) -> Self {
        Self { duration, flagged: duration > threshold }
    }

    /// Elapsed time against the default two-hour threshold.
    pub fn with_default_threshold(duration: Duration) -> Self {
        Self::new(duration, LONG_RUNTIME_THRESHOLD)
    }

    /// HTML fragment; flagged runtimes are wrapped in red.
    pub fn to_html(&self) -> String {
        if self.flagged {
            format!("<font color=red>{}</font>", self)
        } else {
            self.to_string()
        }
    }
}

impl fmt::Display for Elapsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_duration(self.duration))
    }
}

#[cfg(test)]
#[path = "time_fmt_tests.rs"]
mod tests;
