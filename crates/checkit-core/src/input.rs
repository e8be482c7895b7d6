//! Single-line text field used by the search box and the form popups.

/// Editable line of text with a character-indexed cursor.
///
/// A locked field keeps its value but ignores every edit, which is how the
/// export form shows the configured display name.
#[derive(Debug, Clone, Default)]
pub struct TextField {
    chars: Vec<char>,
    cursor: usize,
    locked: bool,
}

impl TextField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: &str) -> Self {
        let mut field = Self::new();
        field.set(text);
        field
    }

    pub fn locked(text: &str) -> Self {
        let mut field = Self::with_text(text);
        field.locked = true;
        field
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Returns true when the value changed.
    pub fn insert_char(&mut self, c: char) -> bool {
        if self.locked || c.is_control() {
            return false;
        }
        self.chars.insert(self.cursor, c);
        self.cursor += 1;
        true
    }

    pub fn backspace(&mut self) -> bool {
        if self.locked || self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        self.chars.remove(self.cursor);
        true
    }

    pub fn delete(&mut self) -> bool {
        if self.locked || self.cursor >= self.chars.len() {
            return false;
        }
        self.chars.remove(self.cursor);
        true
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.chars.len());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.chars.len();
    }

    pub fn clear(&mut self) {
        if self.locked {
            return;
        }
        self.chars.clear();
        self.cursor = 0;
    }

    pub fn set(&mut self, text: &str) {
        if self.locked {
            return;
        }
        self.chars = text.chars().collect();
        self.cursor = self.chars.len();
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// True when the field holds nothing but whitespace.
    pub fn is_blank(&self) -> bool {
        self.chars.iter().all(|c| c.is_whitespace())
    }

    pub fn value(&self) -> String {
        self.chars.iter().collect()
    }

    /// Cursor position in characters, for placing the terminal cursor.
    pub fn cursor_pos(&self) -> usize {
        self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typing_and_cursor() {
        let mut field = TextField::new();
        for c in "audt".chars() {
            field.insert_char(c);
        }
        field.move_left();
        field.insert_char('i');
        assert_eq!(field.value(), "audit");
        assert_eq!(field.cursor_pos(), 4);
    }

    #[test]
    fn test_multibyte_editing() {
        let mut field = TextField::with_text("café");
        assert_eq!(field.cursor_pos(), 4);
        field.backspace();
        assert_eq!(field.value(), "caf");
        field.move_home();
        field.delete();
        assert_eq!(field.value(), "af");
    }

    #[test]
    fn test_edges_are_noops() {
        let mut field = TextField::new();
        assert!(!field.backspace());
        assert!(!field.delete());
        field.move_left();
        assert_eq!(field.cursor_pos(), 0);
        field.insert_char('a');
        field.move_right();
        assert_eq!(field.cursor_pos(), 1);
    }

    #[test]
    fn test_control_chars_are_rejected() {
        let mut field = TextField::new();
        assert!(!field.insert_char('\n'));
        assert!(field.is_empty());
    }

    #[test]
    fn test_locked_field_ignores_edits() {
        let mut field = TextField::locked("Alex");
        assert!(!field.insert_char('x'));
        assert!(!field.backspace());
        field.clear();
        field.set("Sam");
        assert_eq!(field.value(), "Alex");
        assert!(field.is_locked());
    }

    #[test]
    fn test_blank() {
        assert!(TextField::with_text("   ").is_blank());
        assert!(TextField::new().is_blank());
        assert!(!TextField::with_text(" a ").is_blank());
    }
}
