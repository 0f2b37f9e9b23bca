// ABOUTME: Output formatting for CLI feedback.
// ABOUTME: Supports normal, quiet (CI), and JSON output modes for publish and tagging results.

use serde::Serialize;
use std::time::Instant;

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Progress lines plus the result
    Normal,
    /// Only the final result, for CI logs
    Quiet,
    /// One JSON object per line
    Json,
}

impl OutputMode {
    /// JSON wins over quiet when both are set.
    pub fn from_flags(quiet: bool, json: bool) -> Self {
        match (quiet, json) {
            (_, true) => OutputMode::Json,
            (true, false) => OutputMode::Quiet,
            (false, false) => OutputMode::Normal,
        }
    }
}

/// Writes command feedback in the selected mode.
pub struct Output {
    mode: OutputMode,
    started: Option<Instant>,
}

#[derive(Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            started: None,
        }
    }

    pub fn start_timer(&mut self) {
        self.started = Some(Instant::now());
    }

    /// Seconds since `start_timer`, or zero if it was never called.
    pub fn elapsed_secs(&self) -> f64 {
        self.duration().unwrap_or(0.0)
    }

    fn duration(&self) -> Option<f64> {
        self.started.map(|t| t.elapsed().as_secs_f64())
    }

    /// Shown in normal mode only.
    pub fn progress(&self, message: &str) {
        if self.mode == OutputMode::Normal {
            println!("{message}");
        }
    }

    pub fn success(&self, message: &str) {
        self.finish("success", message, None::<&()>);
    }

    /// Print the result of a command.
    ///
    /// JSON mode emits `value` as the event payload next to the message.
    pub fn result<T: Serialize>(&self, message: &str, value: &T) {
        self.finish("result", message, Some(value));
    }

    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Json => self.emit(Stream::Stderr, "error", message, None::<&()>),
            OutputMode::Normal | OutputMode::Quiet => eprintln!("Error: {message}"),
        }
    }

    fn finish<T: Serialize>(&self, kind: &str, message: &str, data: Option<&T>) {
        match (self.mode, self.duration()) {
            (OutputMode::Json, _) => self.emit(Stream::Stdout, kind, message, data),
            (OutputMode::Normal, Some(secs)) => println!("{message} ({secs:.1}s)"),
            (OutputMode::Normal, None) | (OutputMode::Quiet, _) => println!("{message}"),
        }
    }

    fn emit<T: Serialize>(&self, stream: Stream, kind: &str, message: &str, data: Option<&T>) {
        let event = Event {
            event: kind,
            message,
            data,
            duration_secs: self.duration(),
        };
        let Ok(line) = serde_json::to_string(&event) else {
            return;
        };
        match stream {
            Stream::Stdout => println!("{line}"),
            Stream::Stderr => eprintln!("{line}"),
        }
    }
}

#[derive(Serialize)]
struct Event<'a, T: Serialize> {
    event: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
}
