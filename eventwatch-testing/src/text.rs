use std::io::Cursor;

/// String helpers for building test inputs.
pub trait StrExt {
    /// In-memory reader over the string's UTF-8 bytes, positioned at the start.
    fn as_reader(&self) -> Cursor<Vec<u8>>;

    /// The first `count` characters, or the whole string when it is shorter.
    fn left(&self, count: usize) -> &str;
}

impl StrExt for str {
    fn as_reader(&self) -> Cursor<Vec<u8>> {
        Cursor::new(self.as_bytes().to_vec())
    }

    fn left(&self, count: usize) -> &str {
        self.char_indices()
            .nth(count)
            .map_or(self, |(end, _)| &self[..end])
    }
}
