//! Markdown rendering with syntax highlighting

use anyhow::Result;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::config::HighlightConfig;

/// Markdown renderer with syntax highlighting
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme: Theme,
    line_numbers: bool,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer with default highlighting
    pub fn new() -> Self {
        Self::with_options(&HighlightConfig::default())
    }

    /// Create with highlight settings from the site config.
    /// The theme is resolved once here; an unknown theme name falls back to
    /// whatever the default set offers first.
    pub fn with_options(highlight: &HighlightConfig) -> Self {
        let mut theme_set = ThemeSet::load_defaults();
        let theme = theme_set
            .themes
            .remove(&highlight.theme)
            .or_else(|| {
                let fallback = theme_set.themes.keys().next().cloned()?;
                tracing::warn!(
                    "Unknown highlight theme {:?}, falling back to {:?}",
                    highlight.theme,
                    fallback
                );
                theme_set.themes.remove(&fallback)
            })
            .expect("No themes available");

        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme,
            line_numbers: highlight.line_numbers,
        }
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> Result<String> {
        // Front-matter is stripped before rendering, so YAML metadata
        // blocks stay disabled here
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION
            | Options::ENABLE_HEADING_ATTRIBUTES
            | Options::ENABLE_GFM;

        let mut events: Vec<Event> = Vec::new();
        // Some(lang) while inside a fenced or indented code block
        let mut code_lang: Option<Option<String>> = None;
        let mut code_buf = String::new();

        for event in Parser::new_ext(markdown, options) {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(lang) if !lang.is_empty() => Some(lang.to_string()),
                        _ => None,
                    };
                    code_lang = Some(lang);
                    code_buf.clear();
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some(lang) = code_lang.take() {
                        let block = self.highlight_block(&code_buf, lang.as_deref());
                        events.push(Event::Html(CowStr::from(block)));
                    }
                }
                Event::Text(text) if code_lang.is_some() => {
                    code_buf.push_str(&text);
                }
                other => events.push(other),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        Ok(html_output)
    }

    /// Highlight one code block
    fn highlight_block(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.unwrap_or("text");

        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let Ok(highlighted) = highlighted_html_for_string(code, &self.syntax_set, syntax, &self.theme)
        else {
            // Plain escaped block when highlighting fails
            return format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                lang,
                html_escape(code)
            );
        };

        if self.line_numbers {
            with_line_numbers(&highlighted, lang)
        } else {
            format!(r#"<div class="highlight {}">{}</div>"#, lang, highlighted)
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Wrap highlighted code in a two-column gutter/code table
fn with_line_numbers(code: &str, lang: &str) -> String {
    let gutter: Vec<String> = (1..=code.lines().count())
        .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
        .collect();
    let code_lines: Vec<&str> = code.lines().collect();

    format!(
        r#"<figure class="highlight {}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code"><pre>{}</pre></td></tr></table></figure>"#,
        lang,
        gutter.join("\n"),
        code_lines.join("\n")
    )
}

/// Simple HTML escaping
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_basic_markdown() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("# Hello World\n\nThis is a test.").unwrap();
        assert!(html.contains("<h1>Hello World</h1>"));
        assert!(html.contains("<p>This is a test.</p>"));
    }

    #[test]
    fn test_render_code_block() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("```rust\nfn main() {}\n```").unwrap();
        assert!(html.contains("highlight"));
    }

    #[test]
    fn test_line_numbers_gutter() {
        let renderer = MarkdownRenderer::with_options(&HighlightConfig {
            theme: "base16-ocean.dark".to_string(),
            line_numbers: true,
        });
        let html = renderer
            .render("```rust\nlet a = 1;\nlet b = 2;\n```")
            .unwrap();
        assert!(html.contains("line-number"));
    }

    #[test]
    fn test_unknown_theme_falls_back() {
        let renderer = MarkdownRenderer::with_options(&HighlightConfig {
            theme: "no-such-theme".to_string(),
            line_numbers: false,
        });
        let html = renderer.render("plain text").unwrap();
        assert!(html.contains("plain text"));
    }

    #[test]
    fn test_render_table() {
        let renderer = MarkdownRenderer::new();
        let html = renderer
            .render("| a | b |\n|---|---|\n| 1 | 2 |\n")
            .unwrap();
        assert!(html.contains("<table>"));
    }
}
