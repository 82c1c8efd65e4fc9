//! Single-line progress bar
//!
//! Each update rewrites the current terminal line:
//!
//! ```text
//! [████████░░░░░░░░░░░░]  40.0%   12.3s  61/152 mr-mime
//! ```

use std::io::Write;
use std::sync::LazyLock;
use std::time::{Duration, Instant};

/// Process start, for elapsed time display
static START: LazyLock<Instant> = LazyLock::new(Instant::now);

/// Pin the start time. Call early in `main`.
pub fn start_clock() {
    LazyLock::force(&START);
}

/// Time since [`start_clock`] or the first progress update
pub fn elapsed() -> Duration {
    START.elapsed()
}

/// Default bar width in characters
pub const BAR_WIDTH: usize = 30;

const FILLED: char = '█';
const EMPTY: char = '░';

/// Format one progress line (without the leading carriage return)
pub fn format_line(
    done: usize,
    total: usize,
    width: usize,
    elapsed: Duration,
    note: Option<&str>,
) -> String {
    let ratio = if total == 0 {
        1.0
    } else {
        (done.min(total) as f64) / (total as f64)
    };
    let filled = ((ratio * width as f64).round() as usize).min(width);

    let mut line = String::with_capacity(width * 3 + 32);
    line.push('[');
    line.extend(std::iter::repeat(FILLED).take(filled));
    line.extend(std::iter::repeat(EMPTY).take(width - filled));
    line.push(']');
    line.push_str(&format!(
        " {:5.1}% {:7.1}s",
        ratio * 100.0,
        elapsed.as_secs_f64()
    ));
    if let Some(note) = note {
        line.push(' ');
        line.push_str(note);
    }
    line
}

/// Progress reporter writing to a terminal-like sink
pub struct Progress<W: Write> {
    out: W,
    width: usize,
    enabled: bool,
    drawn: bool,
}

impl<W: Write> Progress<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            width: BAR_WIDTH,
            enabled: true,
            drawn: false,
        }
    }

    /// Reporter that writes nothing
    pub fn hidden(out: W) -> Self {
        Self {
            enabled: false,
            ..Self::new(out)
        }
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Redraw the line. Write failures are ignored; progress is cosmetic.
    pub fn update(&mut self, done: usize, total: usize, note: Option<&str>) {
        if !self.enabled {
            return;
        }
        let line = format_line(done, total, self.width, elapsed(), note);
        // \x1b[K clears leftovers from a longer previous line
        let _ = write!(self.out, "\r{line}\x1b[K");
        let _ = self.out.flush();
        self.drawn = true;
    }

    /// Move past the progress line
    pub fn finish(&mut self) {
        if self.enabled && self.drawn {
            let _ = writeln!(self.out);
            let _ = self.out.flush();
            self.drawn = false;
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
