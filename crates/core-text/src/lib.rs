//! Single-line, capacity-bounded byte buffer with an edit cursor.
//!
//! The buffer stores raw bytes exactly as the host translated them. Cursor
//! movement and deletion work on single bytes, so a multi-byte character can
//! be split by a backspace or by arrow movement; consumers that display the
//! buffer decode it lossily.
//!
//! Invariants (checked by `debug_assert` after every mutation):
//! * `len() < capacity()`: one slot stays reserved for the terminator
//!   position, so the longest storable text is `capacity - 2` bytes.
//! * `cursor() <= len()`.
//!
//! Mutations that would break a bound are silent no-ops reported through the
//! `bool` return value; they are routine interaction edges, not errors.

use std::borrow::Cow;
use tracing::trace;

/// Default capacity matching the stock launcher configuration.
pub const DEFAULT_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineBuffer {
    content: Vec<u8>,
    cursor: usize,
    capacity: usize,
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl LineBuffer {
    /// Create an empty buffer holding at most `capacity - 2` bytes of text.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            content: Vec::with_capacity(capacity),
            cursor: 0,
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Valid text bytes `[0, len)`.
    pub fn as_bytes(&self) -> &[u8] {
        &self.content
    }

    /// Bytes left of the cursor, used for cursor extent measurement.
    pub fn before_cursor(&self) -> &[u8] {
        &self.content[..self.cursor]
    }

    /// Lossy UTF-8 view of the text (split characters become U+FFFD).
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }

    /// Whether `additional` more bytes fit without touching the reserved slot.
    pub fn fits(&self, additional: usize) -> bool {
        self.content.len() + additional < self.capacity.saturating_sub(1)
    }

    /// Insert `bytes` at the cursor and advance past them.
    ///
    /// Returns `false` (and leaves the buffer untouched) when `bytes` is empty
    /// or `len + bytes.len() >= capacity - 1`.
    pub fn insert(&mut self, bytes: &[u8]) -> bool {
        if bytes.is_empty() || !self.fits(bytes.len()) {
            trace!(
                target: "buffer",
                len = self.content.len(),
                incoming = bytes.len(),
                capacity = self.capacity,
                "insert_rejected"
            );
            return false;
        }
        let at = self.cursor;
        self.content.splice(at..at, bytes.iter().copied());
        self.cursor += bytes.len();
        self.check_invariants();
        true
    }

    /// Remove the single byte left of the cursor.
    pub fn delete_backward(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        self.content.remove(self.cursor);
        self.check_invariants();
        true
    }

    pub fn move_left(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    pub fn move_right(&mut self) -> bool {
        if self.cursor >= self.content.len() {
            return false;
        }
        self.cursor += 1;
        true
    }

    pub fn move_home(&mut self) -> bool {
        let moved = self.cursor != 0;
        self.cursor = 0;
        moved
    }

    pub fn move_end(&mut self) -> bool {
        let end = self.content.len();
        let moved = self.cursor != end;
        self.cursor = end;
        moved
    }

    /// Drop all text and reset the cursor.
    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    #[inline]
    fn check_invariants(&self) {
        debug_assert!(
            self.cursor <= self.content.len(),
            "cursor {} beyond length {}",
            self.cursor,
            self.content.len()
        );
        debug_assert!(
            self.content.is_empty() || self.content.len() < self.capacity,
            "length {} reached capacity {}",
            self.content.len(),
            self.capacity
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buf(capacity: usize, text: &str) -> LineBuffer {
        let mut b = LineBuffer::with_capacity(capacity);
        assert!(b.insert(text.as_bytes()));
        b
    }

    #[test]
    fn insert_hello_then_x_scenario() {
        let mut b = LineBuffer::with_capacity(10);
        assert!(b.insert(b"hello"));
        assert_eq!(b.as_bytes(), b"hello");
        assert_eq!(b.cursor(), 5);
        assert_eq!(b.len(), 5);

        assert!(b.insert(b"X"));
        assert_eq!(b.as_bytes(), b"helloX");

        assert!(b.move_home());
        assert_eq!(b.cursor(), 0);

        assert!(!b.delete_backward());
        assert_eq!(b.as_bytes(), b"helloX");
        assert_eq!(b.cursor(), 0);
    }

    #[test]
    fn insert_in_middle_shifts_tail() {
        let mut b = buf(32, "ac");
        b.move_left();
        assert!(b.insert(b"b"));
        assert_eq!(b.as_bytes(), b"abc");
        assert_eq!(b.cursor(), 2);
    }

    #[test]
    fn capacity_boundary_rejects_reserved_slot() {
        // capacity 10: longest text is 8 bytes.
        let mut b = buf(10, "1234567");
        assert!(b.insert(b"8"), "7 + 1 < 9 fits");
        assert_eq!(b.len(), 8);
        let before = b.clone();
        assert!(!b.insert(b"9"), "8 + 1 >= 9 rejected");
        assert_eq!(b, before);
    }

    #[test]
    fn multibyte_insert_rejected_as_a_whole() {
        let mut b = buf(10, "1234567");
        let before = b.clone();
        assert!(!b.insert("é".as_bytes()));
        assert_eq!(b, before);
    }

    #[test]
    fn empty_insert_is_noop() {
        let mut b = buf(10, "ab");
        assert!(!b.insert(b""));
        assert_eq!(b.cursor(), 2);
    }

    #[test]
    fn capacity_two_holds_nothing_and_three_holds_one_byte() {
        assert!(!LineBuffer::with_capacity(2).insert(b"a"));
        let mut b = LineBuffer::with_capacity(3);
        assert!(b.insert(b"a"));
        assert!(!b.insert(b"b"));
        assert_eq!(b.as_bytes(), b"a");
    }

    #[test]
    fn zero_capacity_never_accepts() {
        let mut b = LineBuffer::with_capacity(0);
        assert!(!b.insert(b"a"));
        assert!(b.is_empty());
    }

    #[test]
    fn delete_backward_removes_one_byte_of_multibyte_char() {
        let mut b = buf(32, "aé");
        assert_eq!(b.len(), 3);
        assert!(b.delete_backward());
        assert_eq!(b.as_bytes(), &[b'a', 0xC3]);
        assert_eq!(b.to_string_lossy(), "a\u{FFFD}");
    }

    #[test]
    fn moves_clamp_at_bounds() {
        let mut b = buf(32, "ab");
        assert!(!b.move_right());
        assert_eq!(b.cursor(), 2);
        assert!(b.move_left());
        assert!(b.move_left());
        assert!(!b.move_left());
        assert_eq!(b.cursor(), 0);
    }

    #[test]
    fn home_end_report_change() {
        let mut b = buf(32, "abc");
        assert!(!b.move_end());
        assert!(b.move_home());
        assert!(!b.move_home());
        assert!(b.move_end());
        assert_eq!(b.cursor(), 3);
    }

    #[test]
    fn clear_resets_length_and_cursor() {
        let mut b = buf(32, "abc");
        b.move_left();
        b.clear();
        assert!(b.is_empty());
        assert_eq!(b.cursor(), 0);
        assert_eq!(b.before_cursor(), b"");
    }
}
