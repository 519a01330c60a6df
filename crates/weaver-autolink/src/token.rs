use crate::markup::{ADDRESS_CLOSE, ADDRESS_MIDDLE, ADDRESS_OPEN, NameMarkup};
use crate::span::TokenSpan;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// A `http://` or `https://` address.
    ///
    /// `display` holds the shortened on-screen text when the address was too
    /// long to show in full; `None` means the address itself is displayed.
    Address { display: Option<String> },
    /// An `@name` that resolved to a profile, with its per-occurrence markup.
    NameReference(NameMarkup),
}

/// The three markup pieces spliced around a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragments<'a> {
    pub open: &'a str,
    pub middle: &'a str,
    pub close: &'a str,
}

impl Fragments<'_> {
    pub fn len(&self) -> usize {
        self.open.len() + self.middle.len() + self.close.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub span: TokenSpan,
    pub kind: TokenKind,
    /// Bytes this token's markup adds on top of its own text.
    pub growth: usize,
    /// Growth of every token up to and including this one.
    pub cumulative_growth: usize,
}

impl Token {
    pub fn is_address(&self) -> bool {
        matches!(self.kind, TokenKind::Address { .. })
    }

    pub fn fragments(&self) -> Fragments<'_> {
        match &self.kind {
            TokenKind::Address { .. } => Fragments {
                open: ADDRESS_OPEN,
                middle: ADDRESS_MIDDLE,
                close: ADDRESS_CLOSE,
            },
            TokenKind::NameReference(markup) => Fragments {
                open: &markup.prefix,
                middle: &markup.middle,
                close: &markup.suffix,
            },
        }
    }

    /// The token's literal text as it appears in `text`.
    pub fn source<'a>(&self, text: &'a str) -> &'a str {
        &text[self.span.to_range()]
    }

    /// The visible label: the shortened address if there is one, otherwise
    /// the literal text.
    pub fn display<'a>(&'a self, text: &'a str) -> &'a str {
        match &self.kind {
            TokenKind::Address {
                display: Some(short),
            } => short,
            _ => self.source(text),
        }
    }

    /// Byte length of the visible label without needing the source text.
    pub fn display_len(&self) -> usize {
        match &self.kind {
            TokenKind::Address {
                display: Some(short),
            } => short.len(),
            _ => self.span.len,
        }
    }

    /// Growth accumulated by the tokens before this one.
    pub fn preceding_growth(&self) -> usize {
        self.cumulative_growth - self.growth
    }
}

/// Detected tokens in text order.
///
/// Tokens are only ever appended at the tail while scanning. Neighbours are
/// found by index, so the list can be walked head-to-tail to build output and
/// tail-to-head to splice in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenList {
    tokens: Vec<Token>,
}

impl TokenList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a token, deriving its cumulative growth from the current tail.
    /// Returns the new token's index.
    pub fn push(&mut self, span: TokenSpan, kind: TokenKind, growth: usize) -> usize {
        debug_assert!(
            self.tail().is_none_or(|t| t.span.end() <= span.start),
            "tokens must be appended in text order without overlap"
        );
        let cumulative_growth = self.total_growth() + growth;
        self.tokens.push(Token {
            span,
            kind,
            growth,
            cumulative_growth,
        });
        self.tokens.len() - 1
    }

    pub fn head(&self) -> Option<&Token> {
        self.tokens.first()
    }

    pub fn tail(&self) -> Option<&Token> {
        self.tokens.last()
    }

    pub fn get(&self, idx: usize) -> Option<&Token> {
        self.tokens.get(idx)
    }

    pub fn prev(&self, idx: usize) -> Option<&Token> {
        idx.checked_sub(1).and_then(|i| self.tokens.get(i))
    }

    pub fn next(&self, idx: usize) -> Option<&Token> {
        self.tokens.get(idx + 1)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Total bytes the full rewrite adds; zero for an empty list.
    pub fn total_growth(&self) -> usize {
        self.tail().map_or(0, |t| t.cumulative_growth)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }
}

impl<'a> IntoIterator for &'a TokenList {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
