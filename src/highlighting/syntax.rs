use syntect::easy::HighlightLines;
use syntect::highlighting::{Style, Theme, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::{as_24_bit_terminal_escaped, LinesWithEndings};

const FALLBACK_THEME: &str = "base16-ocean.dark";

/// Syntax highlighter using syntect, emitting 24-bit terminal escapes.
pub struct SyntaxHighlighter {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
}

impl SyntaxHighlighter {
    pub fn new(theme: &str) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: theme.to_string(),
        }
    }

    fn theme(&self) -> &Theme {
        self.theme_set
            .themes
            .get(&self.theme_name)
            .unwrap_or_else(|| &self.theme_set.themes[FALLBACK_THEME])
    }

    /// Highlight `code` line by line, keyed off the file extension.
    ///
    /// Returns one escaped string per input line, each ending with a style
    /// reset and without the trailing newline. Unknown extensions fall back
    /// to plain text.
    pub fn highlight_lines(&self, code: &str, file_path: &str) -> Vec<String> {
        let extension = file_path.rsplit('.').next().unwrap_or("");

        let syntax = self
            .syntax_set
            .find_syntax_by_extension(extension)
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let mut highlighter = HighlightLines::new(syntax, self.theme());

        let mut result = Vec::new();
        for line in LinesWithEndings::from(code) {
            let ranges: Vec<(Style, &str)> = highlighter
                .highlight_line(line, &self.syntax_set)
                .unwrap_or_default();

            let mut escaped = as_24_bit_terminal_escaped(&ranges, false);
            while escaped.ends_with('\n') || escaped.ends_with('\r') {
                escaped.pop();
            }
            escaped.push_str("\x1b[0m");
            result.push(escaped);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_output_line_per_input_line() {
        let highlighter = SyntaxHighlighter::new(FALLBACK_THEME);
        let lines = highlighter.highlight_lines("fn main() {\n    let x = 1;\n}\n", "main.rs");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn unknown_extension_falls_back_to_plain_text() {
        let highlighter = SyntaxHighlighter::new(FALLBACK_THEME);
        let lines = highlighter.highlight_lines("whatever\n", "file.zzz");
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("whatever"));
    }

    #[test]
    fn unknown_theme_falls_back() {
        let highlighter = SyntaxHighlighter::new("no-such-theme");
        let lines = highlighter.highlight_lines("x\n", "a.rs");
        assert_eq!(lines.len(), 1);
    }
}
