//! Turning a scanned token list into linked text.
//!
//! The growth of every token is known before any byte is written, so the
//! budget check happens up front and a rewrite that would not fit is skipped
//! entirely.

use std::borrow::Cow;

use crate::span::TokenSpan;
use crate::token::{Token, TokenKind, TokenList};

/// The result of scanning one block of text.
#[derive(Debug, Clone)]
pub struct LinkPlan<'a> {
    text: &'a str,
    tokens: TokenList,
}

impl<'a> LinkPlan<'a> {
    pub fn new(text: &'a str, tokens: TokenList) -> Self {
        Self { text, tokens }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn tokens(&self) -> &TokenList {
        &self.tokens
    }

    pub fn into_tokens(self) -> TokenList {
        self.tokens
    }

    pub fn total_growth(&self) -> usize {
        self.tokens.total_growth()
    }

    /// Length of the text once every token is wrapped.
    pub fn projected_len(&self) -> usize {
        self.text.len() + self.total_growth()
    }

    pub fn fits(&self, max_total_bytes: usize) -> bool {
        self.projected_len() <= max_total_bytes
    }

    /// Build the linked text into a buffer sized exactly for it.
    ///
    /// Returns the input text, borrowed, when there is nothing to link or
    /// the linked text would exceed `max_total_bytes`.
    pub fn apply(&self, max_total_bytes: usize) -> Cow<'a, str> {
        if self.tokens.is_empty() {
            return Cow::Borrowed(self.text);
        }
        if !self.fits(max_total_bytes) {
            tracing::debug!(
                target: "weaver::autolink",
                len = self.text.len(),
                growth = self.total_growth(),
                max_total_bytes,
                "links would exceed budget, text left unchanged"
            );
            return Cow::Borrowed(self.text);
        }

        let mut out = String::with_capacity(self.projected_len());
        let mut last = 0;
        for token in &self.tokens {
            out.push_str(&self.text[last..token.span.start]);
            write_token(&mut out, token, self.text);
            last = token.span.end();
        }
        out.push_str(&self.text[last..]);

        debug_assert_eq!(out.len(), self.projected_len());
        tracing::debug!(
            target: "weaver::autolink",
            links = self.tokens.len(),
            len = out.len(),
            "links inserted"
        );
        Cow::Owned(out)
    }
}

fn write_token(out: &mut String, token: &Token, text: &str) {
    let fragments = token.fragments();
    out.push_str(fragments.open);
    out.push_str(token.source(text));
    out.push_str(fragments.middle);
    out.push_str(token.display(text));
    out.push_str(fragments.close);
}

/// Wrap every token of `tokens` in place, growing `buf` by exactly the
/// tokens' total growth.
///
/// `tokens` must come from scanning the current contents of `buf`. Tokens are
/// processed from last to first: each step moves the text after the token to
/// its final position and then writes, from the end backwards, the closing
/// markup, the visible text, the middle markup, the literal token text and
/// the opening markup. Every move is a `copy_within`, which tolerates the
/// overlapping source and destination that growing in place produces.
///
/// Returns the new length, or the old one if nothing was linked because the
/// list is empty, its spans reach past the end of `buf`, or the result would
/// exceed `max_total_bytes`.
pub(crate) fn splice_in_place(
    buf: &mut Vec<u8>,
    tokens: &TokenList,
    max_total_bytes: usize,
) -> usize {
    let old_len = buf.len();
    let growth = tokens.total_growth();
    if growth == 0 {
        return old_len;
    }
    if tokens.tail().is_some_and(|t| t.span.end() > old_len) {
        tracing::warn!(
            target: "weaver::autolink",
            len = old_len,
            "token spans do not fit the buffer, buffer left unchanged"
        );
        return old_len;
    }
    if old_len + growth > max_total_bytes {
        tracing::debug!(
            target: "weaver::autolink",
            len = old_len,
            growth,
            max_total_bytes,
            "links would exceed budget, buffer left unchanged"
        );
        return old_len;
    }

    buf.resize(old_len + growth, 0);

    // End of the not-yet-moved text following the current token.
    let mut tail_end = old_len;
    for token in tokens.iter().rev() {
        let span = token.span;
        let shift = token.cumulative_growth;
        let fragments = token.fragments();

        buf.copy_within(span.end()..tail_end, span.end() + shift);
        let mut cursor = span.end() + shift;

        cursor = put_before(buf, cursor, fragments.close.as_bytes());
        cursor = match &token.kind {
            TokenKind::Address {
                display: Some(short),
            } => put_before(buf, cursor, short.as_bytes()),
            _ => move_before(buf, cursor, span),
        };
        cursor = put_before(buf, cursor, fragments.middle.as_bytes());
        cursor = move_before(buf, cursor, span);
        cursor = put_before(buf, cursor, fragments.open.as_bytes());

        debug_assert_eq!(cursor, span.start + token.preceding_growth());
        tail_end = span.start;
    }

    tracing::debug!(
        target: "weaver::autolink",
        links = tokens.len(),
        len = buf.len(),
        "links inserted in place"
    );
    buf.len()
}

/// Write `bytes` so they end at `cursor`; returns where they start.
fn put_before(buf: &mut [u8], cursor: usize, bytes: &[u8]) -> usize {
    let start = cursor - bytes.len();
    buf[start..cursor].copy_from_slice(bytes);
    start
}

/// Copy the bytes under `span` so they end at `cursor`; returns where they
/// start. Source and destination may overlap.
fn move_before(buf: &mut [u8], cursor: usize, span: TokenSpan) -> usize {
    let start = cursor - span.len;
    buf.copy_within(span.to_range(), start);
    start
}
