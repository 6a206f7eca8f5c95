//! Colour and width detection for table output

use owo_colors::{OwoColorize, colors::css};

/// Below this many columns, tables are printed as stacked lists.
const NARROW_COLUMNS: u16 = 60;

/// Whether stdout accepts colour codes.
fn colour_enabled() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

/// Whether the terminal is too narrow for a multi-column table.
///
/// Output that is not a terminal is never narrow.
pub fn is_narrow() -> bool {
    terminal_size::terminal_size().is_some_and(|(width, _)| width.0 < NARROW_COLUMNS)
}

/// Styling for report text. Styles are dropped when colour is unsupported.
pub trait Colorize {
    /// A satisfied requirement (green).
    fn success(&self) -> String;
    /// An outstanding requirement (orange).
    fn warning(&self) -> String;
    /// Secondary detail such as rules and course lists.
    fn dim(&self) -> String;
}

impl<T: AsRef<str> + ?Sized> Colorize for T {
    fn success(&self) -> String {
        paint(self.as_ref(), |text| text.fg::<css::Green>().to_string())
    }

    fn warning(&self) -> String {
        paint(self.as_ref(), |text| text.fg::<css::Orange>().to_string())
    }

    fn dim(&self) -> String {
        paint(self.as_ref(), |text| text.dimmed().to_string())
    }
}

fn paint(text: &str, style: impl FnOnce(&str) -> String) -> String {
    if colour_enabled() {
        style(text)
    } else {
        text.to_string()
    }
}
