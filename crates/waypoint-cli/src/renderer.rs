//! Terminal rendering for markdown output.
//!
//! Uses termimad for rich display, with a plain-text fallback for
//! `--no-color` and for output that is piped or scripted.

use std::io::{self, Write};

use termimad::{crossterm::style::Color, MadSkin};

/// Renders markdown either richly or as plain text.
pub struct TerminalRenderer {
    rich_enabled: bool,
    skin: MadSkin,
}

impl TerminalRenderer {
    pub fn new(rich_enabled: bool) -> Self {
        let mut skin = MadSkin::default();
        skin.set_headers_fg(Color::Blue);
        skin.bold.set_fg(Color::Yellow);
        skin.italic.set_fg(Color::Magenta);
        skin.inline_code.set_bg(Color::AnsiValue(238));

        Self { rich_enabled, skin }
    }

    /// Render markdown text to `out`.
    pub fn render(&self, out: &mut dyn Write, markdown: &str) -> io::Result<()> {
        if !self.rich_enabled {
            write!(out, "{markdown}")?;
            return out.flush();
        }

        for line in markdown.lines() {
            if line.starts_with('#') {
                writeln!(out, "\x1b[34m{line}\x1b[0m")?;
            } else {
                writeln!(out, "{}", self.skin.inline(line))?;
            }
        }
        out.flush()
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_renderer_passes_markdown_through() {
        let renderer = TerminalRenderer::new(false);
        let mut out = Vec::new();

        renderer.render(&mut out, "# Demo\n\n- Status: completed\n").unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "# Demo\n\n- Status: completed\n"
        );
    }

    #[test]
    fn test_rich_renderer_colors_headers() {
        let renderer = TerminalRenderer::new(true);
        let mut out = Vec::new();

        renderer.render(&mut out, "# Demo").unwrap();

        assert!(String::from_utf8(out).unwrap().starts_with("\x1b[34m# Demo"));
    }

    #[test]
    fn test_default_is_rich() {
        assert!(TerminalRenderer::default().rich_enabled);
    }
}
