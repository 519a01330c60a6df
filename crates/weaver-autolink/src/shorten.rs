/// Produces the on-screen text for an address that is too long to show.
///
/// The scanner calls this once per long address and stores the result in the
/// token, so the bytes counted as growth are exactly the bytes written.
pub trait DisplayShortener {
    fn shorten(&self, address: &str, max_chars: usize) -> String;
}

impl<S: DisplayShortener + ?Sized> DisplayShortener for &S {
    fn shorten(&self, address: &str, max_chars: usize) -> String {
        (**self).shorten(address, max_chars)
    }
}

const ELLIPSIS: &str = "...";

/// Longest entity body (between `&` and `;`) treated as a single character.
const MAX_ENTITY_LEN: usize = 10;

/// Keeps the first `max_chars - 3` on-screen characters and appends `...`.
///
/// A character reference such as `&amp;` or `&#47;` counts as one on-screen
/// character and is never cut in half.
#[derive(Debug, Clone, Copy, Default)]
pub struct EllipsisShortener;

impl DisplayShortener for EllipsisShortener {
    fn shorten(&self, address: &str, max_chars: usize) -> String {
        let max_chars = max_chars.max(ELLIPSIS.len());
        if on_screen_chars(address) <= max_chars {
            return address.to_string();
        }

        let keep = max_chars - ELLIPSIS.len();
        let mut cut = 0;
        for _ in 0..keep {
            cut += unit_len(&address[cut..]);
        }

        let mut short = String::with_capacity(cut + ELLIPSIS.len());
        short.push_str(&address[..cut]);
        short.push_str(ELLIPSIS);
        short
    }
}

/// Number of characters `text` takes on screen.
pub fn on_screen_chars(text: &str) -> usize {
    let mut pos = 0;
    let mut count = 0;
    while pos < text.len() {
        pos += unit_len(&text[pos..]);
        count += 1;
    }
    count
}

/// Byte length of the on-screen character at the start of `text`.
fn unit_len(text: &str) -> usize {
    let Some(first) = text.chars().next() else {
        return 0;
    };
    if first == '&' {
        let body = &text[1..];
        let entity_end = body
            .char_indices()
            .take(MAX_ENTITY_LEN + 1)
            .take_while(|(_, c)| c.is_ascii_alphanumeric() || *c == '#' || *c == ';')
            .find(|(_, c)| *c == ';')
            .filter(|(semi, _)| *semi > 0);
        if let Some((semi, _)) = entity_end {
            return semi + 2;
        }
    }
    first.len_utf8()
}
