//! Output edits and a reference text buffer that applies them.
//!
//! Every event the engine processes yields one `OutputEdit`: delete some
//! trailing characters, then insert text. Lengths are in chars, not bytes.

use serde::{Deserialize, Serialize};

/// Delete `delete` trailing chars, then append `insert`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OutputEdit {
    pub delete: usize,
    pub insert: String,
}

impl OutputEdit {
    pub fn new(delete: usize, insert: impl Into<String>) -> Self {
        Self {
            delete,
            insert: insert.into(),
        }
    }

    /// True when applying the edit changes nothing.
    pub fn is_noop(&self) -> bool {
        self.delete == 0 && self.insert.is_empty()
    }
}

/// In-memory text that edits are applied to, keeping at most `max_chars`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBuffer {
    text: String,
    chars: usize,
    max_chars: usize,
}

impl TextBuffer {
    /// An unbounded buffer.
    pub fn new() -> Self {
        Self::bounded(usize::MAX)
    }

    /// A buffer that forgets text beyond the last `max_chars` chars.
    pub fn bounded(max_chars: usize) -> Self {
        Self {
            text: String::new(),
            chars: 0,
            max_chars,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in chars.
    pub fn len(&self) -> usize {
        self.chars
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.chars = 0;
    }

    /// Apply an edit. Returns how many chars were actually deleted, which is
    /// less than requested only when the buffer has forgotten that text.
    pub fn apply(&mut self, edit: &OutputEdit) -> usize {
        let deleted = self.delete_chars(edit.delete);
        if deleted < edit.delete {
            tracing::debug!(
                "edit deletes {} chars but only {} are buffered",
                edit.delete,
                deleted
            );
        }
        self.push_str(&edit.insert);
        deleted
    }

    /// Shrink an edit to its minimal form by dropping the common prefix of
    /// the deleted and inserted text.
    pub fn minimize(&self, edit: &OutputEdit) -> OutputEdit {
        if edit.delete > self.chars {
            return edit.clone();
        }
        let start = self.byte_offset_from_end(edit.delete);
        let deleted = &self.text[start..];
        let common: usize = deleted
            .chars()
            .zip(edit.insert.chars())
            .take_while(|(a, b)| a == b)
            .count();
        let skip = edit
            .insert
            .char_indices()
            .nth(common)
            .map_or(edit.insert.len(), |(i, _)| i);
        OutputEdit::new(edit.delete - common, &edit.insert[skip..])
    }

    fn delete_chars(&mut self, count: usize) -> usize {
        let count = count.min(self.chars);
        let start = self.byte_offset_from_end(count);
        self.text.truncate(start);
        self.chars -= count;
        count
    }

    fn push_str(&mut self, s: &str) {
        self.text.push_str(s);
        self.chars += s.chars().count();
        if self.chars > self.max_chars {
            let excess = self.chars - self.max_chars;
            let cut = self
                .text
                .char_indices()
                .nth(excess)
                .map_or(self.text.len(), |(i, _)| i);
            self.text.drain(..cut);
            self.chars = self.max_chars;
        }
    }

    /// Byte index where the last `count` chars begin.
    fn byte_offset_from_end(&self, count: usize) -> usize {
        if count == 0 {
            return self.text.len();
        }
        self.text
            .char_indices()
            .rev()
            .nth(count - 1)
            .map_or(0, |(i, _)| i)
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_edits() {
        let mut buffer = TextBuffer::new();
        buffer.apply(&OutputEdit::new(0, "cat"));
        buffer.apply(&OutputEdit::new(3, "cats"));
        assert_eq!(buffer.text(), "cats");
        buffer.apply(&OutputEdit::new(4, "café"));
        assert_eq!(buffer.text(), "café");
        assert_eq!(buffer.len(), 4);
        buffer.apply(&OutputEdit::new(1, "e"));
        assert_eq!(buffer.text(), "cafe");
    }

    #[test]
    fn over_delete_is_clamped() {
        let mut buffer = TextBuffer::new();
        buffer.apply(&OutputEdit::new(0, "ab"));
        assert_eq!(buffer.apply(&OutputEdit::new(5, "x")), 2);
        assert_eq!(buffer.text(), "x");
    }

    #[test]
    fn minimize_drops_common_prefix() {
        let mut buffer = TextBuffer::new();
        buffer.apply(&OutputEdit::new(0, "the cat"));
        assert_eq!(buffer.minimize(&OutputEdit::new(3, "cats")), OutputEdit::new(0, "s"));
        assert_eq!(buffer.minimize(&OutputEdit::new(3, "dog")), OutputEdit::new(3, "dog"));
        assert_eq!(buffer.minimize(&OutputEdit::new(3, "ca")), OutputEdit::new(1, ""));
        assert!(buffer.minimize(&OutputEdit::new(3, "cat")).is_noop());
        assert_eq!(buffer.minimize(&OutputEdit::new(9, "x")), OutputEdit::new(9, "x"));
    }

    #[test]
    fn bounded_buffer_forgets_old_text() {
        let mut buffer = TextBuffer::bounded(4);
        buffer.apply(&OutputEdit::new(0, "hello"));
        assert_eq!(buffer.text(), "ello");
        buffer.apply(&OutputEdit::new(0, "ö"));
        assert_eq!(buffer.text(), "lloö");
        assert_eq!(buffer.len(), 4);
    }
}
