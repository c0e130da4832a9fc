//! Byte cursor over a single input line.
//!
//! Lines never contain newlines; the driver splits them off first.
//! Matchers probe by copying the cursor and committing the copy back
//! only on a match, so a failed probe costs nothing.

/// A cursor over one line of input.
///
/// Cheap to copy; block matchers clone it to probe ahead and write the
/// clone back over the original to commit.
#[derive(Clone, Copy, Debug)]
pub struct LineCursor<'a> {
    line: &'a str,
    pos: usize,
}

impl<'a> LineCursor<'a> {
    #[inline]
    pub fn new(line: &'a str) -> Self {
        debug_assert!(!line.contains('\n'), "cursor lines are newline-free");
        Self { line, pos: 0 }
    }

    /// The whole underlying line.
    #[inline]
    pub fn line(&self) -> &'a str {
        self.line
    }

    /// Current byte offset from the start of the line.
    #[inline]
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// The unconsumed remainder of the line.
    #[inline]
    pub fn rest(&self) -> &'a str {
        &self.line[self.pos..]
    }

    #[inline]
    pub fn is_eol(&self) -> bool {
        self.pos >= self.line.len()
    }

    /// Peek the current byte without advancing.
    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.line.as_bytes().get(self.pos).copied()
    }

    /// Check if the current byte matches.
    #[inline]
    pub fn at(&self, b: u8) -> bool {
        self.peek() == Some(b)
    }

    /// Advance by one byte.
    #[inline]
    pub fn bump(&mut self) {
        debug_assert!(!self.is_eol());
        self.pos += 1;
    }

    /// Advance by `n` bytes.
    #[inline]
    pub fn advance(&mut self, n: usize) {
        debug_assert!(self.pos + n <= self.line.len());
        self.pos += n;
    }

    /// Consume everything remaining.
    #[inline]
    pub fn consume_to_eol(&mut self) {
        self.pos = self.line.len();
    }

    /// Consume a run of byte `b`, returning its length.
    #[inline]
    pub fn eat_run(&mut self, b: u8) -> usize {
        let bytes = self.line.as_bytes();
        let start = self.pos;
        while self.pos < bytes.len() && bytes[self.pos] == b {
            self.pos += 1;
        }
        self.pos - start
    }

    /// Consume leading spaces and tabs, returning the column width
    /// skipped. A tab advances to the next multiple-of-4 column.
    pub fn skip_indent(&mut self) -> usize {
        let bytes = self.line.as_bytes();
        let mut col = 0;
        while self.pos < bytes.len() {
            match bytes[self.pos] {
                b' ' => col += 1,
                b'\t' => col += 4 - col % 4,
                _ => break,
            }
            self.pos += 1;
        }
        col
    }

    /// Consume at most `max` columns of leading whitespace. A tab that
    /// would overshoot is left in place.
    pub fn skip_spaces_up_to(&mut self, max: usize) {
        let bytes = self.line.as_bytes();
        let mut col = 0;
        while self.pos < bytes.len() && col < max {
            let width = match bytes[self.pos] {
                b' ' => 1,
                b'\t' => 4 - col % 4,
                _ => break,
            };
            if col + width > max {
                break;
            }
            col += width;
            self.pos += 1;
        }
    }

    /// Whether nothing but spaces and tabs remain.
    #[inline]
    pub fn rest_is_blank(&self) -> bool {
        self.line.as_bytes()[self.pos..]
            .iter()
            .all(|&b| b == b' ' || b == b'\t')
    }
}
