//! weaver-autolink: link addresses and `@name` references in plain text.
//!
//! The text is scanned once, left to right, for `http://`/`https://`
//! addresses and for `@name` references that a [`NameResolver`] knows about.
//! Each token records how many bytes its markup adds, so the caller's byte
//! budget is checked before anything is written. If the linked text would not
//! fit, the input comes back untouched.
//!
//! ```
//! use weaver_autolink::{AutolinkConfig, Autolinker};
//!
//! let linker = Autolinker::addresses_only(AutolinkConfig::default());
//! let out = linker.rewrite("See https://example.com/path for details", 4096);
//! assert_eq!(
//!     out,
//!     "See <a href=\"https://example.com/path\" target=\"_blank\">https://example.com/path</a> for details"
//! );
//! ```
//!
//! Running the linker twice over the same text is not supported: addresses
//! inside the inserted markup would be linked again.

mod config;
mod error;
mod markup;
mod resolver;
mod rewrite;
mod scanner;
mod shorten;
mod span;
mod token;

use std::borrow::Cow;

use rewrite::splice_in_place;

pub use config::{AutolinkConfig, NameBounds, ProfileFormConfig};
pub use error::{AutolinkError, Result};
pub use markup::{ADDRESS_CLOSE, ADDRESS_MIDDLE, ADDRESS_OPEN, ADDRESS_OVERHEAD, NameMarkup};
pub use resolver::{NameResolver, NoNames, ResolveWith, ResolvedProfile};
pub use rewrite::LinkPlan;
pub use scanner::{LinkScanner, is_word_char};
pub use shorten::{DisplayShortener, EllipsisShortener, on_screen_chars};
pub use span::TokenSpan;
pub use token::{Fragments, Token, TokenKind, TokenList};

/// Scans text and wraps what it finds in link markup.
#[derive(Debug, Clone)]
pub struct Autolinker<R, S = EllipsisShortener> {
    config: AutolinkConfig,
    resolver: R,
    shortener: S,
    max_display_chars: usize,
}

impl Autolinker<NoNames> {
    /// A linker that only links addresses and leaves every `@name` alone.
    pub fn addresses_only(config: AutolinkConfig) -> Self {
        Self::new(config, NoNames)
    }
}

impl<R: NameResolver> Autolinker<R> {
    pub fn new(config: AutolinkConfig, resolver: R) -> Self {
        let max_display_chars = config.max_display_chars;
        Self {
            config,
            resolver,
            shortener: EllipsisShortener,
            max_display_chars,
        }
    }
}

impl<R: NameResolver, S: DisplayShortener> Autolinker<R, S> {
    pub fn with_shortener<S2: DisplayShortener>(self, shortener: S2) -> Autolinker<R, S2> {
        Autolinker {
            config: self.config,
            resolver: self.resolver,
            shortener,
            max_display_chars: self.max_display_chars,
        }
    }

    /// Override the configured on-screen limit for addresses.
    pub fn with_max_display_chars(mut self, max_display_chars: usize) -> Self {
        self.max_display_chars = max_display_chars;
        self
    }

    pub fn config(&self) -> &AutolinkConfig {
        &self.config
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    fn scanner(&self) -> LinkScanner<'_, R, S> {
        LinkScanner::new(&self.config, &self.resolver, &self.shortener)
            .max_display_chars(self.max_display_chars)
    }

    /// Find the tokens in `text` without rewriting anything.
    pub fn scan<'a>(&self, text: &'a str) -> LinkPlan<'a> {
        LinkPlan::new(text, self.scanner().scan(text))
    }

    /// Link every token in `text`, provided the result fits in
    /// `max_total_bytes`.
    ///
    /// The current length is always `text.len()`; the new length is the
    /// length of the returned text.
    ///
    /// The input is returned borrowed when nothing was found or the result
    /// would be too long; compare lengths to tell the two apart from a
    /// rewrite.
    #[tracing::instrument(
        level = "debug",
        target = "weaver::autolink",
        skip_all,
        fields(len = text.len(), max = max_total_bytes)
    )]
    pub fn rewrite<'a>(&self, text: &'a str, max_total_bytes: usize) -> Cow<'a, str> {
        self.scan(text).apply(max_total_bytes)
    }

    /// Link every token in `buf` in place, growing it without a second
    /// full-size buffer. Returns the new length.
    ///
    /// A buffer that is not valid UTF-8 is left as it is.
    #[tracing::instrument(
        level = "debug",
        target = "weaver::autolink",
        skip_all,
        fields(len = buf.len(), max = max_total_bytes)
    )]
    pub fn rewrite_in_place(&self, buf: &mut Vec<u8>, max_total_bytes: usize) -> usize {
        let tokens = match std::str::from_utf8(buf.as_slice()) {
            Ok(text) => self.scanner().scan(text),
            Err(err) => {
                tracing::warn!(target: "weaver::autolink", %err, "text is not UTF-8, not linking");
                return buf.len();
            }
        };
        splice_in_place(buf, &tokens, max_total_bytes)
    }
}
