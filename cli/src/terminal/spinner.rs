use std::io::{self, Write};
use std::sync::Mutex;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

static SPINNER: Mutex<Option<ProgressBar>> = Mutex::new(None);

const TICKS: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
];

/// Clears the spinner when dropped.
pub struct SpinnerGuard;

impl Drop for SpinnerGuard {
    fn drop(&mut self) {
        if let Some(pb) = SPINNER.lock().ok().and_then(|mut s| s.take()) {
            pb.finish_and_clear();
        }
    }
}

pub fn start(message: &str) -> SpinnerGuard {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(TICKS);

    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));

    if let Ok(mut slot) = SPINNER.lock() {
        *slot = Some(pb);
    }
    SpinnerGuard
}

/// Writes log lines to stderr without tearing the active spinner.
pub struct SpinnerWriter;

impl Write for SpinnerWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let active = SPINNER.lock().ok().and_then(|s| s.clone());
        match active {
            Some(pb) => pb.suspend(|| io::stderr().write_all(buf))?,
            None => io::stderr().write_all(buf)?,
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}
