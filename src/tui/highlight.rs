//! Source → ratatui `Line` highlighter.
//!
//! Thin wrapper around `syntect` keyed by a surface's language tag. Always
//! returns exactly one `Line` per `\n`-separated line of the input so the
//! editor can index lines by cursor row.

use std::sync::LazyLock;

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::{SyntaxReference, SyntaxSet};

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

const THEME: &str = "base16-ocean.dark";

/// Map a surface language tag to a bundled syntax.
///
/// The default syntax set has no TypeScript grammar; JavaScript is close
/// enough for annotations to render without garbling.
fn syntax_for(language: &str) -> Option<&'static SyntaxReference> {
    let token = match language {
        "javascript" | "typescript" => "js",
        "python" => "py",
        other => other,
    };
    SYNTAX_SET.find_syntax_by_token(token)
}

/// Highlight `text` as `language`, falling back to plain lines in `base_fg`.
pub fn highlight(text: &str, language: Option<&str>, base_fg: Color) -> Vec<Line<'static>> {
    let plain = |line: &str| Line::from(Span::styled(expand_tabs(line), Style::default().fg(base_fg)));

    let (Some(syntax), Some(theme)) = (
        language.and_then(syntax_for),
        THEME_SET.themes.get(THEME),
    ) else {
        return text.split('\n').map(plain).collect();
    };

    let mut highlighter = HighlightLines::new(syntax, theme);
    text.split('\n')
        .map(|line| {
            let with_newline = format!("{line}\n");
            match highlighter.highlight_line(&with_newline, &SYNTAX_SET) {
                Ok(ranges) => Line::from(
                    ranges
                        .into_iter()
                        .filter_map(|(hl_style, frag)| {
                            let content = expand_tabs(frag.trim_end_matches('\n'));
                            if content.is_empty() {
                                return None;
                            }
                            let fg = Color::Rgb(
                                hl_style.foreground.r,
                                hl_style.foreground.g,
                                hl_style.foreground.b,
                            );
                            Some(Span::styled(content, Style::default().fg(fg)))
                        })
                        .collect::<Vec<_>>(),
                ),
                Err(_) => plain(line),
            }
        })
        .collect()
}

/// Tabs render as zero-width in ratatui.
pub fn expand_tabs(text: &str) -> String {
    if text.contains('\t') {
        text.replace('\t', "    ")
    } else {
        text.to_string()
    }
}
