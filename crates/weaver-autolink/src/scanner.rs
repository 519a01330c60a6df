//! Single left-to-right pass that finds addresses and `@name` references.
//!
//! Nothing here fails. A candidate that does not fully match (a bare `http`,
//! a name that is too short or unknown) stays ordinary text and scanning
//! moves on one character past where the candidate began.

use crate::config::AutolinkConfig;
use crate::markup::{ADDRESS_OVERHEAD, NameMarkup};
use crate::resolver::NameResolver;
use crate::shorten::DisplayShortener;
use crate::span::TokenSpan;
use crate::token::{TokenKind, TokenList};

/// Punctuation that is dropped from the end of an address when the character
/// after it ends the address too.
const TRAILING_PUNCTUATION: &[char] = &[',', '.', ';', ':', ')', ']', '}'];

pub struct LinkScanner<'a, R: ?Sized, S: ?Sized> {
    config: &'a AutolinkConfig,
    resolver: &'a R,
    shortener: &'a S,
    max_display_chars: usize,
}

impl<'a, R, S> LinkScanner<'a, R, S>
where
    R: NameResolver + ?Sized,
    S: DisplayShortener + ?Sized,
{
    pub fn new(config: &'a AutolinkConfig, resolver: &'a R, shortener: &'a S) -> Self {
        Self {
            config,
            resolver,
            shortener,
            max_display_chars: config.max_display_chars,
        }
    }

    pub fn max_display_chars(mut self, max_display_chars: usize) -> Self {
        self.max_display_chars = max_display_chars;
        self
    }

    /// Find every token in `text`, in text order, with its growth computed.
    pub fn scan(&self, text: &str) -> TokenList {
        let mut tokens = TokenList::new();
        let mut pos = 0;

        while pos < text.len() {
            let prev = text[..pos].chars().next_back();

            if let Some(end) = self.check_address(text, pos, prev, &mut tokens) {
                pos = end;
                continue;
            }
            if let Some(end) = self.check_name(text, pos, prev, &mut tokens) {
                pos = end;
                continue;
            }

            pos += text[pos..].chars().next().map_or(1, char::len_utf8);
        }

        tokens
    }

    /// Try to read an address starting at `pos`. Returns the position right
    /// after it when one was recorded.
    fn check_address(
        &self,
        text: &str,
        pos: usize,
        prev: Option<char>,
        tokens: &mut TokenList,
    ) -> Option<usize> {
        if prev.is_some_and(is_word_char) {
            return None;
        }
        let scheme_len = scheme_len(&text[pos..])?;

        let mut cursor = pos + scheme_len;
        let end = loop {
            let (ch, len) = next_address_char(text, cursor);
            if ends_address(ch) {
                break cursor;
            }
            if TRAILING_PUNCTUATION.contains(&ch) {
                let (next, next_len) = next_address_char(text, cursor + len);
                if ends_address(next) {
                    break cursor;
                }
                cursor += len + next_len;
            } else {
                cursor += len;
            }
        };

        let span = TokenSpan::new(pos, end);
        let address = &text[span.to_range()];
        let display = (address.chars().count() > self.max_display_chars)
            .then(|| self.shortener.shorten(address, self.max_display_chars))
            .filter(|short| short != address);
        let display_len = display.as_ref().map_or(span.len, String::len);
        let growth = ADDRESS_OVERHEAD + display_len;
        let shortened = display.is_some();

        tracing::trace!(
            target: "weaver::autolink",
            start = span.start,
            len = span.len,
            shortened,
            growth,
            "address detected"
        );
        tokens.push(span, TokenKind::Address { display }, growth);
        Some(end)
    }

    /// Try to read a resolvable `@name` starting at `pos`. Returns the
    /// position right after it when one was recorded.
    fn check_name(
        &self,
        text: &str,
        pos: usize,
        prev: Option<char>,
        tokens: &mut TokenList,
    ) -> Option<usize> {
        if !text[pos..].starts_with('@') || prev.is_some_and(is_word_char) {
            return None;
        }

        let name_start = pos + 1;
        let name_len = text[name_start..]
            .char_indices()
            .find(|(_, c)| !is_word_char(*c))
            .map_or(text.len() - name_start, |(i, _)| i);
        if name_len == 0 {
            return None;
        }

        let name = &text[name_start..name_start + name_len];
        let chars = name.chars().count();
        if !self.config.name_bounds.contains(chars) {
            tracing::trace!(
                target: "weaver::autolink",
                reference = name,
                chars,
                "name length out of bounds"
            );
            return None;
        }

        let Some(profile) = self.resolver.resolve(name) else {
            tracing::trace!(target: "weaver::autolink", reference = name, "name not resolved");
            return None;
        };

        let markup = NameMarkup::build(&self.config.profile_form, &profile);
        let span = TokenSpan::new(pos, name_start + name_len);
        let growth = markup.overhead() + span.len;

        tracing::trace!(
            target: "weaver::autolink",
            start = span.start,
            reference = name,
            growth,
            "name reference detected"
        );
        tokens.push(span, TokenKind::NameReference(markup), growth);
        Some(span.end())
    }
}

/// Letters, digits and `_`.
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Length of a case-insensitive `http://` or `https://` prefix.
fn scheme_len(rest: &str) -> Option<usize> {
    let after_http = rest
        .get(..4)
        .filter(|s| s.eq_ignore_ascii_case("http"))
        .map(|_| &rest[4..])?;

    if after_http.starts_with("://") {
        Some(7)
    } else if after_http.get(..1).is_some_and(|s| s.eq_ignore_ascii_case("s"))
        && after_http[1..].starts_with("://")
    {
        Some(8)
    } else {
        None
    }
}

/// ASCII controls, space, `<` and `"`. Anything above U+0020 other than
/// those two stays inside the address, non-ASCII spaces included.
fn ends_address(c: char) -> bool {
    c <= ' ' || c == '<' || c == '"'
}

/// Read the character at `at` the way address detection sees it, returning
/// it with the number of bytes it occupies.
///
/// Text arrives HTML-escaped, so numeric references like `&#34;` are read as
/// the character they stand for. Only ASCII punctuation survives decoding;
/// any other code point reads as a space and so ends the address. An `&` not
/// followed by `#` reads as the character after it. End of text reads as NUL.
fn next_address_char(text: &str, at: usize) -> (char, usize) {
    let rest = &text[at..];
    let mut chars = rest.chars();
    let Some(first) = chars.next() else {
        return ('\0', 0);
    };
    if first != '&' {
        return (first, first.len_utf8());
    }

    match chars.next() {
        None => ('\0', 1),
        Some('#') => {
            let digits = rest[2..].bytes().take_while(u8::is_ascii_digit).count();
            let after = 2 + digits;
            match rest[after..].chars().next() {
                Some(';') => (decode_reference(&rest[2..after]), after + 1),
                other => (other.unwrap_or('\0'), after),
            }
        }
        Some(next) => (next, 1 + next.len_utf8()),
    }
}

fn decode_reference(digits: &str) -> char {
    let code = if digits.is_empty() {
        0
    } else {
        digits.parse::<u32>().unwrap_or(u32::MAX)
    };
    match code {
        32..=47 | 58 | 59 | 61 | 63 | 64 | 91..=96 | 123..=126 => {
            char::from_u32(code).unwrap_or(' ')
        }
        _ => ' ',
    }
}
