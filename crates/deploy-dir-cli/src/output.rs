//! Status lines for the bundler, written to stderr.
//!
//! stdout is reserved for the generated script when no `--output` is given,
//! so build summaries and errors never go there.

use std::io::Write;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Pick the color mode for status lines.
///
/// A set `NO_COLOR` turns color off whatever `--color` says.
pub fn resolve_color_choice(flag: Option<&str>) -> ColorChoice {
    color_choice(std::env::var_os("NO_COLOR").is_some(), flag)
}

fn color_choice(no_color: bool, flag: Option<&str>) -> ColorChoice {
    match flag {
        _ if no_color => ColorChoice::Never,
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}

/// Writes status lines to stderr.
pub struct StatusOutput {
    stderr: StandardStream,
}

impl StatusOutput {
    pub fn new(choice: ColorChoice) -> Self {
        Self {
            stderr: StandardStream::stderr(choice),
        }
    }

    fn write_styled(&mut self, text: &str, color: Option<Color>, bold: bool) {
        let mut spec = ColorSpec::new();
        spec.set_fg(color).set_bold(bold);
        let _ = self.stderr.set_color(&spec);
        let _ = write!(self.stderr, "{}", text);
        let _ = self.stderr.reset();
    }

    /// Green bold text.
    pub fn success(&mut self, text: &str) {
        self.write_styled(text, Some(Color::Green), true);
    }

    /// Red bold text.
    pub fn error(&mut self, text: &str) {
        self.write_styled(text, Some(Color::Red), true);
    }

    /// Cyan text.
    pub fn info(&mut self, text: &str) {
        self.write_styled(text, Some(Color::Cyan), false);
    }

    /// Plain text followed by a newline.
    pub fn line(&mut self, text: &str) {
        let _ = writeln!(self.stderr, "{}", text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_flag() {
        assert_eq!(color_choice(false, Some("always")), ColorChoice::Always);
        assert_eq!(color_choice(false, Some("never")), ColorChoice::Never);
        assert_eq!(color_choice(false, Some("auto")), ColorChoice::Auto);
        assert_eq!(color_choice(false, None), ColorChoice::Auto);
    }

    #[test]
    fn test_no_color_wins() {
        assert_eq!(color_choice(true, Some("always")), ColorChoice::Never);
        assert_eq!(color_choice(true, None), ColorChoice::Never);
    }
}
