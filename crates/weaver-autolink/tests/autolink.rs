//! End-to-end tests for linking through the public `Autolinker` API.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::LazyLock;

use proptest::prelude::*;
use regex::Regex;
use weaver_autolink::{
    ADDRESS_OVERHEAD, AutolinkConfig, Autolinker, DisplayShortener, NameBounds, NoNames,
    ResolveWith, ResolvedProfile,
};

fn profile(id: &str, label: &str, photo: &str) -> ResolvedProfile {
    ResolvedProfile::new(
        id,
        format!("<span class=\"caption\">{label}</span>"),
        format!("<img src=\"/photo/{photo}.jpg\" alt=\"\">"),
    )
}

fn directory() -> HashMap<String, ResolvedProfile> {
    let mut names = HashMap::new();
    names.insert("alice".to_string(), profile("QWxp", "Alice", "alice"));
    names.insert("bob".to_string(), profile("Ym9i", "Bob", "bob"));
    names
}

fn linker() -> Autolinker<HashMap<String, ResolvedProfile>> {
    Autolinker::new(AutolinkConfig::default(), directory())
}

static ADDRESS_MARKUP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<a href="([^"]*)" target="_blank">[^<]*</a>"#).unwrap()
});

static NAME_MARKUP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"<form method="post" action="/profile">"#,
        r#"<input type="hidden" name="otr" value="[^"]*">"#,
        r#"<input type="hidden" name="usr" value="([^"]*)">"#,
        r#"<button type="submit" class="NICK_WHITE">[^<]*</button></form>"#,
        r#"<span class="caption">[^<]*</span><img src="[^"]*" alt="">"#,
    ))
    .unwrap()
});

/// Remove every piece of markup the linker inserts, keeping the linked text.
fn strip_links(html: &str) -> String {
    let without_names = NAME_MARKUP.replace_all(html, "$1");
    ADDRESS_MARKUP.replace_all(&without_names, "$1").into_owned()
}

#[test]
fn test_address_in_sentence() {
    let out = linker().rewrite("See https://example.com/path for details", 4096);
    insta::assert_snapshot!(out, @r#"See <a href="https://example.com/path" target="_blank">https://example.com/path</a> for details"#);
}

#[test]
fn test_unknown_name_untouched() {
    let text = "Hi @unknownuser!";
    let out = linker().rewrite(text, 4096);
    assert!(matches!(out, Cow::Borrowed(t) if t == text));
}

#[test]
fn test_adjacent_short_name_and_address() {
    let config = AutolinkConfig {
        name_bounds: NameBounds { min: 1, max: 16 },
        ..AutolinkConfig::default()
    };
    let mut names = HashMap::new();
    names.insert("a".to_string(), profile("QTE", "A", "a"));
    let linker = Autolinker::new(config, names);

    let text = "@a https://x.com";
    let out = linker.rewrite(text, 4096);
    insta::assert_snapshot!(out, @r#"<form method="post" action="/profile"><input type="hidden" name="otr" value="QTE"><input type="hidden" name="usr" value="@a"><button type="submit" class="NICK_WHITE">@a</button></form><span class="caption">A</span><img src="/photo/a.jpg" alt=""> <a href="https://x.com" target="_blank">https://x.com</a>"#);

    let mut buf = text.as_bytes().to_vec();
    linker.rewrite_in_place(&mut buf, 4096);
    assert_eq!(String::from_utf8(buf).unwrap(), out);
}

#[test]
fn test_name_reference_appears_twice() {
    let text = "Thanks @alice for the review";
    let out = linker().rewrite(text, 4096);
    assert_eq!(out.matches("@alice").count(), 2);
    assert!(out.contains("value=\"@alice\"><button"));
    assert!(out.contains(">@alice</button>"));
    assert!(out.starts_with("Thanks <form "));
    assert!(out.ends_with("alt=\"\"> for the review"));
}

#[test]
fn test_single_address_length() {
    let text = "docs: http://docs.example.org/start";
    let out = linker().rewrite(text, 4096);
    let address = "http://docs.example.org/start";
    assert_eq!(out.len(), text.len() + ADDRESS_OVERHEAD + address.len());
    assert_eq!(out.matches(address).count(), 2);
}

#[test]
fn test_long_address_shortened_on_screen() {
    let linker = linker().with_max_display_chars(24);
    let text = "https://example.com/a/rather/long/path/to/a/page";
    let out = linker.rewrite(text, 4096);
    insta::assert_snapshot!(out, @r#"<a href="https://example.com/a/rather/long/path/to/a/page" target="_blank">https://example.com/a...</a>"#);
    assert_eq!(out.len(), text.len() + ADDRESS_OVERHEAD + 24);
}

#[test]
fn test_over_budget_is_a_no_op() {
    let text = "@alice and @bob read https://example.com";
    let linker = linker();
    let plan = linker.scan(text);
    assert_eq!(plan.tokens().len(), 3);

    let out = linker.rewrite(text, plan.projected_len() - 1);
    assert!(matches!(out, Cow::Borrowed(t) if t == text));

    let mut buf = text.as_bytes().to_vec();
    let len = linker.rewrite_in_place(&mut buf, plan.projected_len() - 1);
    assert_eq!(len, text.len());
    assert_eq!(buf, text.as_bytes());
}

#[test]
fn test_invalid_utf8_left_alone() {
    let mut buf = b"see http://a.org \xff".to_vec();
    let len = linker().rewrite_in_place(&mut buf, 4096);
    assert_eq!(len, buf.len());
    assert_eq!(buf, b"see http://a.org \xff");
}

#[test]
fn test_addresses_only_ignores_names() {
    let linker = Autolinker::addresses_only(AutolinkConfig::default());
    let out = linker.rewrite("@alice posted http://a.org", 4096);
    assert!(out.starts_with("@alice posted <a href="));
}

#[test]
fn test_config_from_json_drives_markup() {
    let config = AutolinkConfig::from_json_str(
        r#"{
            "max_display_chars": 12,
            "profile_form": {
                "action_url": "https://weaver.example/en",
                "button_class": "NICK_BLACK"
            }
        }"#,
    )
    .unwrap();
    let linker = Autolinker::new(config, directory());
    let out = linker.rewrite("@bob https://example.com/x", 4096);
    assert!(out.contains("action=\"https://weaver.example/en\""));
    assert!(out.contains("class=\"NICK_BLACK\""));
    assert!(out.contains(">https://e...</a>"));
}

#[test]
fn test_closure_resolver_links_names() {
    let linker = Autolinker::new(
        AutolinkConfig::default(),
        ResolveWith(|name: &str| {
            (name == "carol").then(|| profile("Y2Fy", "Carol", "carol"))
        }),
    );
    let out = linker.rewrite("ping @carol and @dave", 4096);
    assert_eq!(out.matches("@carol").count(), 2);
    assert!(out.ends_with(" and @dave"));
}

#[test]
fn test_non_ascii_space_stays_in_address() {
    let text = "see https://a.org/x\u{a0}y now";
    let out = Autolinker::addresses_only(AutolinkConfig::default()).rewrite(text, 4096);
    assert!(out.contains("href=\"https://a.org/x\u{a0}y\""));
    assert!(out.ends_with("</a> now"));
}

struct Truncate;

impl DisplayShortener for Truncate {
    fn shorten(&self, address: &str, max_chars: usize) -> String {
        address.chars().take(max_chars).collect()
    }
}

#[test]
fn test_custom_shortener() {
    let linker = Autolinker::addresses_only(AutolinkConfig::default())
        .with_shortener(Truncate)
        .with_max_display_chars(10);
    let text = "go https://example.com/page";
    let out = linker.rewrite(text, 4096);
    assert!(out.contains("target=\"_blank\">https://ex</a>"));
    assert_eq!(out.len(), text.len() + ADDRESS_OVERHEAD + 10);

    let mut buf = text.as_bytes().to_vec();
    linker.rewrite_in_place(&mut buf, 4096);
    assert_eq!(String::from_utf8(buf).unwrap(), out);
}

fn linkable_text() -> impl Strategy<Value = String> {
    let piece = prop_oneof![
        Just("http://"),
        Just("https://"),
        Just("HTTP://"),
        Just("@alice"),
        Just("@bob"),
        Just("@carol"),
        Just("@"),
        Just("example"),
        Just("org"),
        Just("x1"),
        Just("_"),
        Just("é"),
        Just("/"),
        Just("."),
        Just(","),
        Just(":"),
        Just(")"),
        Just(" "),
        Just("\n"),
        Just("&amp;"),
        Just("&#34;"),
    ];
    prop::collection::vec(piece, 0..24).prop_map(|pieces| pieces.concat())
}

proptest! {
    #[test]
    fn prop_stripping_markup_restores_input(text in linkable_text(), max_chars in 3usize..40) {
        let linker = linker().with_max_display_chars(max_chars);
        let out = linker.rewrite(&text, usize::MAX);
        prop_assert_eq!(strip_links(&out), text);
    }

    #[test]
    fn prop_in_place_matches_fresh_build(text in linkable_text(), max_chars in 3usize..40) {
        let linker = linker().with_max_display_chars(max_chars);
        let plan = linker.scan(&text);
        let out = linker.rewrite(&text, usize::MAX);
        prop_assert_eq!(out.len(), plan.projected_len());

        let mut buf = text.as_bytes().to_vec();
        let len = linker.rewrite_in_place(&mut buf, usize::MAX);
        prop_assert_eq!(len, out.len());
        prop_assert_eq!(String::from_utf8(buf).unwrap(), out.into_owned());
    }

    #[test]
    fn prop_over_budget_returns_input(text in linkable_text()) {
        let linker = linker();
        let plan = linker.scan(&text);
        prop_assume!(!plan.tokens().is_empty());
        let out = linker.rewrite(&text, plan.projected_len() - 1);
        prop_assert_eq!(out.as_ref(), text.as_str());
    }

    #[test]
    fn prop_plain_text_unchanged(text in "[a-z0-9 ,.;:()\n]{0,80}") {
        let out = Autolinker::new(AutolinkConfig::default(), NoNames).rewrite(&text, usize::MAX);
        prop_assert!(matches!(out, Cow::Borrowed(_)));
        prop_assert_eq!(out.as_ref(), text.as_str());
    }
}
