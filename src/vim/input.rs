use zeroize::Zeroize;

/// Single-line text field with a character cursor.
///
/// Masked buffers are used for the dashboard password and are wiped on drop.
#[derive(Default, Clone)]
pub struct InputBuffer {
    content: String,
    cursor: usize,
    masked: bool,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn masked() -> Self {
        let mut buffer = Self::new();
        buffer.masked = true;
        buffer
    }

    pub fn with_value(value: &str) -> Self {
        let mut buffer = Self::new();
        buffer.set(value);
        buffer
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn trimmed(&self) -> &str {
        self.content.trim()
    }

    /// Comma separated entries, trimmed, empties dropped
    pub fn list_values(&self) -> Vec<String> {
        self.content
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn is_masked(&self) -> bool {
        self.masked
    }

    pub fn len(&self) -> usize {
        self.content.chars().count()
    }

    pub fn display(&self, mask_char: char) -> String {
        if self.masked {
            mask_char.to_string().repeat(self.len())
        } else {
            self.content.clone()
        }
    }

    pub fn insert(&mut self, c: char) {
        let byte_pos = self.byte_offset(self.cursor);
        self.content.insert(byte_pos, c);
        self.cursor += 1;
    }

    pub fn delete_back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        self.remove_at(self.cursor);
        true
    }

    pub fn delete_forward(&mut self) -> bool {
        if self.cursor >= self.len() {
            return false;
        }
        self.remove_at(self.cursor);
        true
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.len());
    }

    pub fn move_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.len();
    }

    pub fn clear(&mut self) {
        self.content.zeroize();
        self.cursor = 0;
    }

    pub fn set(&mut self, value: &str) {
        self.content.zeroize();
        self.content.push_str(value);
        self.cursor = self.len();
    }

    fn remove_at(&mut self, char_idx: usize) {
        let start = self.byte_offset(char_idx);
        let end = self.byte_offset(char_idx + 1);
        self.content.drain(start..end);
    }

    fn byte_offset(&self, char_idx: usize) -> usize {
        self.content
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.content.len())
    }
}

impl Drop for InputBuffer {
    fn drop(&mut self) {
        if self.masked {
            self.content.zeroize();
        }
    }
}

impl std::fmt::Debug for InputBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputBuffer")
            .field("content", &self.display('*'))
            .field("cursor", &self.cursor)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_multibyte() {
        let mut buf = InputBuffer::with_value("oSD-ü");
        buf.move_left();
        buf.insert('x');
        assert_eq!(buf.content(), "oSD-xü");
        assert!(buf.delete_forward());
        assert_eq!(buf.content(), "oSD-x");
        assert!(!buf.delete_forward());
        buf.move_start();
        assert!(!buf.delete_back());
    }

    #[test]
    fn test_list_values() {
        let buf = InputBuffer::with_value(" mon, ,osd ,_admin");
        assert_eq!(buf.list_values(), vec!["mon", "osd", "_admin"]);
    }

    #[test]
    fn test_masked_display_and_debug() {
        let mut buf = InputBuffer::masked();
        assert!(buf.is_masked());
        assert!(buf.is_empty());
        assert_eq!(buf.cursor(), 0);
        buf.set("secret");
        assert_eq!(buf.display('*'), "******");
        assert!(!format!("{buf:?}").contains("secret"));
    }
}
