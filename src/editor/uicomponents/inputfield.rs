use unicode_segmentation::UnicodeSegmentation;

use crate::editor::DraftEdit;

/// Grapheme-aware single-line input for the draft under edit. The view draws
/// it inline inside the checklist row, so it carries no prompt and no size of
/// its own; the visible window is computed against whatever width the row
/// has left.
#[derive(Default, Clone)]
pub struct InputField {
    value: String,
    cursor: usize,
}

impl InputField {
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
        self.cursor = self.value.graphemes(true).count();
    }

    pub fn reset(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    pub fn handle(&mut self, edit: DraftEdit) {
        match edit {
            DraftEdit::Insert(character) => {
                let mut graphemes: Vec<String> =
                    self.value.graphemes(true).map(|g| g.to_string()).collect();
                graphemes.insert(self.cursor, character.to_string());
                self.value = graphemes.concat();
                self.cursor += 1;
            }
            DraftEdit::Delete => {
                let mut graphemes: Vec<String> =
                    self.value.graphemes(true).map(|g| g.to_string()).collect();
                if self.cursor < graphemes.len() {
                    graphemes.remove(self.cursor);
                    self.value = graphemes.concat();
                }
            }
            DraftEdit::DeleteBackward => {
                let mut graphemes: Vec<String> =
                    self.value.graphemes(true).map(|g| g.to_string()).collect();
                if self.cursor > 0 {
                    self.cursor -= 1;
                    graphemes.remove(self.cursor);
                    self.value = graphemes.concat();
                }
            }
            DraftEdit::MoveLeft => self.cursor = self.cursor.saturating_sub(1),
            DraftEdit::MoveRight => {
                let count = self.value.graphemes(true).count();
                if self.cursor < count {
                    self.cursor += 1;
                }
            }
            DraftEdit::MoveStart => self.cursor = 0,
            DraftEdit::MoveEnd => self.cursor = self.value.graphemes(true).count(),
        }
    }

    /// The window of the value that fits in `width` columns, scrolled so the
    /// caret stays visible, plus the caret offset inside that window.
    pub fn visible(&self, width: usize) -> (String, usize) {
        if width == 0 {
            return (String::new(), 0);
        }
        let scroll = if self.cursor >= width {
            self.cursor - width + 1
        } else {
            0
        };
        let window: String = self
            .value
            .graphemes(true)
            .skip(scroll)
            .take(width)
            .collect();
        (window, self.cursor - scroll)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn editing_keeps_the_caret_consistent() {
        let mut input = InputField::default();
        for c in "milk".chars() {
            input.handle(DraftEdit::Insert(c));
        }
        input.handle(DraftEdit::MoveStart);
        input.handle(DraftEdit::Insert('~'));
        assert_eq!(input.value(), "~milk");

        input.handle(DraftEdit::MoveEnd);
        input.handle(DraftEdit::DeleteBackward);
        assert_eq!(input.value(), "~mil");

        input.handle(DraftEdit::MoveStart);
        input.handle(DraftEdit::Delete);
        assert_eq!(input.value(), "mil");
    }

    #[test]
    fn set_value_places_caret_at_the_end() {
        let mut input = InputField::default();
        input.set_value("pay rent");
        input.handle(DraftEdit::Insert('!'));
        assert_eq!(input.value(), "pay rent!");
    }

    #[test]
    fn visible_window_scrolls_with_the_caret() {
        let mut input = InputField::default();
        input.set_value("abcdefgh");
        // The caret sits past the end, so the window shows the last three
        // graphemes and leaves the final column for the caret.
        let (window, caret) = input.visible(4);
        assert_eq!(window, "fgh");
        assert_eq!(caret, 3);

        input.handle(DraftEdit::MoveStart);
        let (window, caret) = input.visible(4);
        assert_eq!(window, "abcd");
        assert_eq!(caret, 0);
    }

    #[test]
    fn multibyte_graphemes_count_as_one() {
        let mut input = InputField::default();
        input.set_value("héllo");
        input.handle(DraftEdit::DeleteBackward);
        input.handle(DraftEdit::DeleteBackward);
        input.handle(DraftEdit::DeleteBackward);
        input.handle(DraftEdit::DeleteBackward);
        assert_eq!(input.value(), "h");
    }
}
