//! Inline markdown styling for task text.
//!
//! Maps emphasis spans of a single line to terminal attributes so `**bold**`,
//! `*italic*` and `` `code` `` read as such in the list. Full markdown
//! rendering (wrapping, block elements, themes) is out of scope.

use crossterm::style::{Attribute, Color, ResetColor, SetForegroundColor};
use pulldown_cmark::{Event, Parser, Tag, TagEnd};

pub fn style_inline(raw: &str) -> String {
    let mut styled = String::new();
    for event in Parser::new(raw) {
        match event {
            Event::Start(Tag::Strong) => styled.push_str(&format!("{}", Attribute::Bold)),
            Event::End(TagEnd::Strong) => {
                styled.push_str(&format!("{}", Attribute::NormalIntensity));
            }
            Event::Start(Tag::Emphasis) => styled.push_str(&format!("{}", Attribute::Italic)),
            Event::End(TagEnd::Emphasis) => styled.push_str(&format!("{}", Attribute::NoItalic)),
            Event::Code(code) => {
                styled.push_str(&format!(
                    "{}{}{}",
                    SetForegroundColor(Color::Yellow),
                    code,
                    ResetColor
                ));
            }
            Event::Text(text) => styled.push_str(&text),
            Event::SoftBreak | Event::HardBreak => styled.push(' '),
            _ => {}
        }
    }
    styled
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(style_inline("buy milk"), "buy milk");
    }

    #[test]
    fn bold_spans_are_bracketed_by_attributes() {
        let styled = style_inline("a **big** deal");
        assert!(styled.contains(&format!("{}", Attribute::Bold)));
        assert!(styled.contains("big"));
        assert!(styled.starts_with("a "));
        assert!(styled.ends_with(" deal"));
    }

    #[test]
    fn code_spans_keep_their_text() {
        let styled = style_inline("run `cargo check` twice");
        assert!(styled.contains("cargo check"));
        assert!(styled.contains(&format!("{}", SetForegroundColor(Color::Yellow))));
    }
}
