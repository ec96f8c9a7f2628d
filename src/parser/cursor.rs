//! Indexable line stream with an explicit read position.
//!
//! The whole source is split into lines up front; lookahead scans save the
//! position, read forward, and restore it.

#[derive(Debug, Clone)]
pub struct LineCursor<'a> {
    lines: Vec<&'a str>,
    pos: usize,
}

impl<'a> LineCursor<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            lines: source.lines().collect(),
            pos: 0,
        }
    }

    /// Index of the next line to be read.
    pub fn checkpoint(&self) -> usize {
        self.pos
    }

    /// Restore a position previously returned by [`LineCursor::checkpoint`].
    pub fn restore(&mut self, pos: usize) {
        self.pos = pos.min(self.lines.len());
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.lines.len()
    }
}

impl<'a> Iterator for LineCursor<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let line = self.lines.get(self.pos).copied()?;
        self.pos += 1;
        Some(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_lines_in_order() {
        let mut cursor = LineCursor::new("a\r\nb\nc");
        assert_eq!(cursor.next(), Some("a"));
        assert_eq!(cursor.next(), Some("b"));
        assert_eq!(cursor.next(), Some("c"));
        assert_eq!(cursor.next(), None);
        assert!(cursor.is_at_end());
    }

    #[test]
    fn restore_returns_to_checkpoint() {
        let mut cursor = LineCursor::new("a\nb\nc\n");
        cursor.next();
        let mark = cursor.checkpoint();
        assert_eq!(cursor.by_ref().count(), 2);
        cursor.restore(mark);
        assert_eq!(cursor.next(), Some("b"));
    }

    // Scanners only ever see `&mut LineCursor`, where `Iterator` methods
    // are also in scope.
    fn skip_one_and_rewind(cursor: &mut LineCursor<'_>) -> usize {
        let mark = cursor.checkpoint();
        cursor.next();
        cursor.restore(mark);
        mark
    }

    #[test]
    fn checkpoint_through_mutable_reference() {
        let mut cursor = LineCursor::new("a\nb");
        cursor.next();
        assert_eq!(skip_one_and_rewind(&mut cursor), 1);
        assert_eq!(cursor.next(), Some("b"));
    }

    #[test]
    fn restore_past_end_is_clamped() {
        let mut cursor = LineCursor::new("a");
        cursor.restore(10);
        assert_eq!(cursor.checkpoint(), 1);
        assert_eq!(cursor.next(), None);
    }
}
