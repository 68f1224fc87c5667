//! Colored terminal output.
//!
//! Results go to stdout, warnings, errors and usage text to stderr. In quiet
//! mode only [`OutputManager::result`], warnings and errors are printed.

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use std::io::{self, Write};

/// Output manager for colored terminal output
#[derive(Debug, Clone, Copy)]
pub struct OutputManager {
    verbose: bool,
    quiet: bool,
}

impl OutputManager {
    /// Creates an output manager.
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    /// Whether informational output is suppressed.
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// Prints an informational line unless quiet.
    pub fn info(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let mut stdout = StandardStream::stdout(ColorChoice::Auto);
        writeln!(stdout, "{message}")
    }

    /// Prints a green success line unless quiet.
    pub fn success(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let mut stdout = StandardStream::stdout(ColorChoice::Auto);
        write_tagged(&mut stdout, Color::Green, "✓ ", message)
    }

    /// Prints a dimmed line only in verbose mode.
    pub fn verbose(&self, message: &str) -> io::Result<()> {
        if !self.verbose || self.quiet {
            return Ok(());
        }
        let mut stdout = StandardStream::stdout(ColorChoice::Auto);
        stdout.set_color(ColorSpec::new().set_dimmed(true))?;
        writeln!(stdout, "{message}")?;
        stdout.reset()
    }

    /// Prints a line regardless of quiet mode.
    pub fn result(&self, message: &str) -> io::Result<()> {
        let mut stdout = StandardStream::stdout(ColorChoice::Auto);
        writeln!(stdout, "{message}")
    }

    /// Prints a yellow warning to stderr.
    pub fn warn(&self, message: &str) -> io::Result<()> {
        let mut stderr = StandardStream::stderr(ColorChoice::Auto);
        write_tagged(&mut stderr, Color::Yellow, "warning: ", message)
    }

    /// Prints an error or usage text to stderr.
    pub fn error(&self, message: &str) -> io::Result<()> {
        let mut stderr = StandardStream::stderr(ColorChoice::Auto);
        writeln!(stderr, "{message}")
    }

    /// Prints a red `error:` line to stderr.
    pub fn failure(&self, message: &str) -> io::Result<()> {
        let mut stderr = StandardStream::stderr(ColorChoice::Auto);
        write_tagged(&mut stderr, Color::Red, "error: ", message)
    }
}

fn write_tagged<W: WriteColor>(
    out: &mut W,
    color: Color,
    tag: &str,
    message: &str,
) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
    write!(out, "{tag}")?;
    out.reset()?;
    writeln!(out, "{message}")
}
