use std::ops::Range;

/// A byte view into the text a scan ran over.
///
/// Spans never copy text; the bytes are only read back when the rewritten
/// output is assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenSpan {
    pub start: usize,
    pub len: usize,
}

impl TokenSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            len: end.saturating_sub(start),
        }
    }

    pub fn end(&self) -> usize {
        self.start + self.len
    }

    pub fn to_range(self) -> Range<usize> {
        self.start..self.end()
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The spanned text, or `None` if the span no longer fits `text`.
    pub fn slice<'a>(&self, text: &'a str) -> Option<&'a str> {
        text.get(self.to_range())
    }
}
