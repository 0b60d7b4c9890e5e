//! Progress output with colored module prefixes.
//!
//! Every conversion owns its own [`Logger`]; nothing here is global.
//! The logger is the "debug channel" of a run: it reports which template and
//! stylesheet are in use, non-fatal warnings and the final byte count. It is
//! never used for errors, those travel as [`crate::ConvertError`].
//!
//! # Example
//!
//! ```ignore
//! let logger = Logger::from_quiet(options.quiet);
//! log!(logger, "css"; "using CSS file {}", path.display());
//! ```

use owo_colors::OwoColorize;
use std::cell::RefCell;
use std::io::{Write, stdout};

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix.
///
/// The message is only formatted when the logger is enabled.
///
/// # Usage
/// ```ignore
/// log!(logger, "module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $module:expr; $($arg:tt)*) => {{
        let logger: &$crate::logger::Logger = &$logger;
        if logger.is_enabled() {
            logger.log($module, &format!($($arg)*));
        }
    }};
}

// ============================================================================
// Logger
// ============================================================================

#[derive(Debug)]
enum Sink {
    Stdout,
    Silent,
    Buffer(RefCell<Vec<String>>),
}

/// Suppressible progress channel for one conversion run.
#[derive(Debug)]
pub struct Logger {
    sink: Sink,
}

impl Default for Logger {
    fn default() -> Self {
        Self::stdout()
    }
}

impl Logger {
    /// Print to stdout.
    pub const fn stdout() -> Self {
        Self { sink: Sink::Stdout }
    }

    /// Drop every message.
    pub const fn silent() -> Self {
        Self { sink: Sink::Silent }
    }

    /// Keep messages in memory, see [`Logger::messages`].
    pub fn buffered() -> Self {
        Self {
            sink: Sink::Buffer(RefCell::new(Vec::new())),
        }
    }

    /// Logger honoring the `quiet` option.
    pub const fn from_quiet(quiet: bool) -> Self {
        if quiet { Self::silent() } else { Self::stdout() }
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        !matches!(self.sink, Sink::Silent)
    }

    /// Log a message with a colored module prefix.
    pub fn log(&self, module: &str, message: &str) {
        match &self.sink {
            Sink::Silent => {}
            Sink::Buffer(lines) => lines.borrow_mut().push(format!("[{module}] {message}")),
            Sink::Stdout => {
                let prefix = colorize_prefix(module);
                let mut stdout = stdout().lock();
                writeln!(stdout, "{prefix} {message}").ok();
                stdout.flush().ok();
            }
        }
    }

    /// Messages captured by a buffered logger (empty for the other sinks).
    pub fn messages(&self) -> Vec<String> {
        match &self.sink {
            Sink::Buffer(lines) => lines.borrow().clone(),
            _ => Vec::new(),
        }
    }
}

/// Apply color to a module prefix based on module type
#[inline]
fn colorize_prefix(module: &str) -> String {
    let prefix = format!("[{module}]");
    match module.to_ascii_lowercase().as_str() {
        "write" => prefix.bright_green().bold().to_string(),
        "warning" => prefix.bright_red().bold().to_string(),
        "render" => prefix.bright_blue().bold().to_string(),
        _ => prefix.bright_yellow().bold().to_string(),
    }
}
