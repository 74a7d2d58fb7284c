//! Text rendering settings shared by the unified list and the tree view.

use crate::{tree::Highlight, ChangeKind};

/// Configuration toggles for text rendering.
#[derive(Clone, Copy, Debug, Default)]
pub struct RenderConfig {
    color: bool,
}

impl RenderConfig {
    /// Constructs a configuration with default settings (no ANSI color).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables ANSI color output.
    #[must_use]
    pub fn with_color(mut self, enabled: bool) -> Self {
        self.color = enabled;
        self
    }

    /// Indicates whether color output is enabled.
    #[must_use]
    pub fn color_enabled(self) -> bool {
        self.color
    }

    /// Convenience constructor enabling color output.
    #[must_use]
    pub fn color(enabled: bool) -> Self {
        Self::new().with_color(enabled)
    }

    pub(crate) fn paint(self, line: &str, color: Option<&str>) -> String {
        match color {
            Some(color) if self.color => format!("{color}{line}{COLOR_RESET}"),
            _ => line.to_owned(),
        }
    }
}

const COLOR_RESET: &str = "\u{1b}[0m";
const COLOR_RED: &str = "\u{1b}[31m";
const COLOR_GREEN: &str = "\u{1b}[32m";
const COLOR_YELLOW: &str = "\u{1b}[33m";

pub(crate) fn kind_color(kind: ChangeKind) -> &'static str {
    match kind {
        ChangeKind::Added => COLOR_GREEN,
        ChangeKind::Removed => COLOR_RED,
        ChangeKind::Modified => COLOR_YELLOW,
    }
}

pub(crate) fn highlight_color(highlight: Highlight) -> Option<&'static str> {
    match highlight {
        Highlight::None => None,
        Highlight::Added => Some(COLOR_GREEN),
        Highlight::Removed => Some(COLOR_RED),
        Highlight::Modified => Some(COLOR_YELLOW),
    }
}

pub(crate) fn kind_marker(kind: ChangeKind) -> char {
    match kind {
        ChangeKind::Added => '+',
        ChangeKind::Removed => '-',
        ChangeKind::Modified => '~',
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paint_is_noop_without_color() {
        assert_eq!(RenderConfig::default().paint("x", Some(COLOR_RED)), "x");
    }

    #[test]
    fn paint_wraps_with_reset() {
        let painted = RenderConfig::color(true).paint("x", Some(kind_color(ChangeKind::Added)));
        assert_eq!(painted, "\u{1b}[32mx\u{1b}[0m");
        assert_eq!(RenderConfig::color(true).paint("x", highlight_color(Highlight::None)), "x");
    }
}
