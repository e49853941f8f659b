/// Single-line text field with a byte-offset cursor (UTF-8 safe).
///
/// Multi-line memo fields use `tui_textarea::TextArea`; this covers the short
/// ones (name, icon, base price) where a full textarea is overkill.
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineInput {
    text: String,
    cursor: usize,
}

impl LineInput {
    #[cfg(test)]
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.len();
        Self { text, cursor }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn insert(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let prev = prev_char_boundary(&self.text, self.cursor);
        self.text.drain(prev..self.cursor);
        self.cursor = prev;
    }

    pub fn delete_forward(&mut self) {
        if self.cursor >= self.text.len() {
            return;
        }
        let next = next_char_boundary(&self.text, self.cursor);
        self.text.drain(self.cursor..next);
    }

    /// Ctrl+W: drop the word before the cursor.
    pub fn delete_word(&mut self) {
        let start = word_left(&self.text, self.cursor);
        self.text.drain(start..self.cursor);
        self.cursor = start;
    }

    pub fn left(&mut self) {
        self.cursor = prev_char_boundary(&self.text, self.cursor);
    }

    pub fn right(&mut self) {
        self.cursor = next_char_boundary(&self.text, self.cursor);
    }

    /// Apply an editing key. Returns false for keys this field doesn't handle.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('w') if ctrl => self.delete_word(),
            KeyCode::Char('a') if ctrl => self.cursor = 0,
            KeyCode::Char('e') if ctrl => self.cursor = self.text.len(),
            KeyCode::Char('u') if ctrl => {
                self.text.drain(..self.cursor);
                self.cursor = 0;
            }
            KeyCode::Char(_) if ctrl => return false,
            KeyCode::Char(c) => self.insert(c),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete_forward(),
            KeyCode::Left => self.left(),
            KeyCode::Right => self.right(),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.text.len(),
            _ => return false,
        }
        true
    }
}

fn prev_char_boundary(s: &str, pos: usize) -> usize {
    s[..pos].char_indices().next_back().map(|(i, _)| i).unwrap_or(0)
}

fn next_char_boundary(s: &str, pos: usize) -> usize {
    s[pos..].chars().next().map(|c| pos + c.len_utf8()).unwrap_or(s.len())
}

/// Start of the word before `pos` (skips trailing whitespace first).
fn word_left(s: &str, pos: usize) -> usize {
    let before = &s[..pos];
    let trimmed = before.trim_end();
    trimmed
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_insert_and_backspace_multibyte() {
        let mut input = LineInput::default();
        for c in "牛乳🥛".chars() {
            input.insert(c);
        }
        assert_eq!(input.text(), "牛乳🥛");
        input.backspace();
        assert_eq!(input.text(), "牛乳");
        input.left();
        input.delete_forward();
        assert_eq!(input.text(), "牛");
        assert_eq!(input.cursor(), "牛".len());
    }

    #[test]
    fn test_delete_word() {
        let mut input = LineInput::new("fresh whole milk  ");
        input.delete_word();
        assert_eq!(input.text(), "fresh whole ");
        input.delete_word();
        assert_eq!(input.text(), "fresh ");
    }

    #[test]
    fn test_handle_key_reports_unhandled() {
        let mut input = LineInput::new("ab");
        assert!(input.handle_key(key(KeyCode::Home)));
        assert!(input.handle_key(key(KeyCode::Char('x'))));
        assert_eq!(input.text(), "xab");
        assert!(!input.handle_key(key(KeyCode::Tab)));
        assert!(!input.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL)));
    }
}
