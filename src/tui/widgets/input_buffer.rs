//! Shared single-line text input with cursor management.
//!
//! Used by the asset/location search fields and the wizard's description
//! and attach-path inputs.

/// A text input buffer with cursor positioning.
pub struct InputBuffer {
    content: String,
    cursor: usize,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self {
            content: String::new(),
            cursor: 0,
        }
    }

    pub fn insert_char(&mut self, c: char) {
        self.content.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            let prev = self.content[..self.cursor]
                .char_indices()
                .next_back()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.content.drain(prev..self.cursor);
            self.cursor = prev;
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.content.len() {
            let next = self.content[self.cursor..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor + i)
                .unwrap_or(self.content.len());
            self.content.drain(self.cursor..next);
        }
    }

    pub fn move_left(&mut self) {
        if self.cursor > 0 {
            self.cursor = self.content[..self.cursor]
                .char_indices()
                .next_back()
                .map(|(i, _)| i)
                .unwrap_or(0);
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.content.len() {
            self.cursor = self.content[self.cursor..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor + i)
                .unwrap_or(self.content.len());
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.content.len();
    }

    /// Replace the whole content, cursor at the end.
    pub fn set_text(&mut self, text: &str) {
        self.content = text.to_string();
        self.cursor = self.content.len();
    }

    /// Take the content out, resetting the buffer.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.content)
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }

    pub fn text(&self) -> &str {
        &self.content
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor
    }
}

impl Default for InputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_cursor() {
        let mut buf = InputBuffer::new();
        buf.insert_char('h');
        buf.insert_char('i');
        assert_eq!(buf.text(), "hi");
        assert_eq!(buf.cursor_position(), 2);
    }

    #[test]
    fn test_backspace_at_start_is_noop() {
        let mut buf = InputBuffer::new();
        buf.backspace();
        assert_eq!(buf.text(), "");
    }

    #[test]
    fn test_mid_string_editing() {
        let mut buf = InputBuffer::new();
        buf.set_text("room");
        buf.move_home();
        buf.move_right();
        buf.insert_char('o');
        assert_eq!(buf.text(), "rooom");
        buf.delete();
        assert_eq!(buf.text(), "room");
    }

    #[test]
    fn test_multibyte_navigation() {
        let mut buf = InputBuffer::new();
        buf.insert_char('م');
        buf.insert_char('ض');
        buf.move_left();
        buf.backspace();
        assert_eq!(buf.text(), "ض");
    }

    #[test]
    fn test_take_resets() {
        let mut buf = InputBuffer::new();
        buf.set_text("pump");
        assert_eq!(buf.take(), "pump");
        assert_eq!(buf.text(), "");
        assert_eq!(buf.cursor_position(), 0);
    }

    #[test]
    fn test_is_blank_on_whitespace() {
        let mut buf = InputBuffer::new();
        buf.set_text("   ");
        assert!(buf.is_blank());
    }
}
