use crate::error::Result;
use regex::{Captures, Regex};
use std::borrow::Cow;

/// Code points the XML 1.0 `Char` production rejects, minus tab, LF and CR,
/// plus the C1 block that commonly leaks in from Windows-1252 exports.
const CONTROL_CHARS: &str = r"[\x00-\x08\x0B\x0C\x0E-\x1F\x7F-\x9F]+";

/// An ampersand, optionally followed by something shaped like a reference.
/// Only the shape is checked: 1 to 8 of `[A-Za-z0-9#]` and a closing `;`.
const AMPERSAND: &str = r"&(?:[a-zA-Z0-9#]{1,8};)?";

const ESCAPED_AMPERSAND: &str = "&amp;";

/// Result of one cleanup pass over a text buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedText {
    pub text: String,
    pub removed_controls: usize,
    pub escaped_ampersands: usize,
}

/// Applies the two cleanup transformations: control character removal,
/// then escaping of ampersands that do not start a reference.
#[derive(Debug, Clone)]
pub struct TextCleaner {
    control_chars: Regex,
    ampersand: Regex,
}

impl TextCleaner {
    pub fn new() -> Result<Self> {
        Ok(Self {
            control_chars: Regex::new(CONTROL_CHARS)?,
            ampersand: Regex::new(AMPERSAND)?,
        })
    }

    pub fn strip_control_chars<'t>(&self, text: &'t str) -> Cow<'t, str> {
        self.control_chars.replace_all(text, "")
    }

    pub fn escape_ampersands<'t>(&self, text: &'t str) -> Cow<'t, str> {
        self.ampersand.replace_all(text, |caps: &Captures| {
            let matched = &caps[0];
            if matched.len() == 1 {
                ESCAPED_AMPERSAND.to_string()
            } else {
                matched.to_string()
            }
        })
    }

    pub fn clean(&self, text: &str) -> String {
        let stripped = self.strip_control_chars(text);
        self.escape_ampersands(&stripped).into_owned()
    }

    /// Same as [`clean`](Self::clean), also counting what was changed.
    pub fn clean_with_summary(&self, text: &str) -> CleanedText {
        let stripped = self.strip_control_chars(text);
        let removed_controls = text.chars().count() - stripped.chars().count();

        let escaped_ampersands = self
            .ampersand
            .find_iter(&stripped)
            .filter(|m| m.len() == 1)
            .count();

        CleanedText {
            text: self.escape_ampersands(&stripped).into_owned(),
            removed_controls,
            escaped_ampersands,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn cleaner() -> TextCleaner {
        TextCleaner::new().unwrap()
    }

    fn is_disallowed(c: char) -> bool {
        matches!(c as u32, 0x00..=0x08 | 0x0B..=0x0C | 0x0E..=0x1F | 0x7F..=0x9F)
    }

    /// Straightforward scanner used as an oracle for the regex version.
    fn reference_escape(text: &str) -> String {
        let chars: Vec<char> = text.chars().collect();
        let mut out = String::with_capacity(text.len());

        for (i, &c) in chars.iter().enumerate() {
            if c != '&' {
                out.push(c);
                continue;
            }

            let token_len = chars[i + 1..]
                .iter()
                .take_while(|t| t.is_ascii_alphanumeric() || **t == '#')
                .count();
            let well_formed = (1..=8).contains(&token_len)
                && chars.get(i + 1 + token_len) == Some(&';');

            if well_formed {
                out.push('&');
            } else {
                out.push_str("&amp;");
            }
        }

        out
    }

    #[test]
    fn test_strips_nul_inside_element() {
        assert_eq!(cleaner().clean("<a>\x00bad</a>"), "<a>bad</a>");
    }

    #[test]
    fn test_escapes_bare_ampersand() {
        assert_eq!(cleaner().clean("<a>A & B</a>"), "<a>A &amp; B</a>");
    }

    #[test]
    fn test_keeps_existing_entity() {
        assert_eq!(cleaner().clean("<a>&amp;</a>"), "<a>&amp;</a>");
    }

    #[test]
    fn test_keeps_whitespace_controls() {
        let input = "<a>\tone\r\ntwo\n</a>";
        assert_eq!(cleaner().clean(input), input);
    }

    #[test]
    fn test_strips_every_disallowed_range() {
        let input = "a\u{1}b\u{8}c\u{b}d\u{c}e\u{e}f\u{1f}g\u{7f}h\u{85}i\u{9f}j";
        assert_eq!(cleaner().clean(input), "abcdefghij");
    }

    #[test]
    fn test_keeps_characters_just_outside_ranges() {
        let input = "\u{20}\u{7e}\u{a0}\u{fffd}";
        assert_eq!(cleaner().clean(input), input);
    }

    #[test]
    fn test_reference_shapes() {
        let c = cleaner();
        assert_eq!(c.escape_ampersands("&lt;&gt;&quot;"), "&lt;&gt;&quot;");
        assert_eq!(c.escape_ampersands("&#169;&#x00A9;"), "&#169;&#x00A9;");
        assert_eq!(c.escape_ampersands("&12345678;"), "&12345678;");
        assert_eq!(c.escape_ampersands("&123456789;"), "&amp;123456789;");
        assert_eq!(c.escape_ampersands("&;"), "&amp;;");
        assert_eq!(c.escape_ampersands("&amp"), "&amp;amp");
        assert_eq!(c.escape_ampersands("AT&T"), "AT&amp;T");
        assert_eq!(c.escape_ampersands("&&lt;"), "&amp;&lt;");
        assert_eq!(c.escape_ampersands("&"), "&amp;");
        assert_eq!(c.escape_ampersands("&na-me;"), "&amp;na-me;");
    }

    #[test]
    fn test_shape_check_does_not_validate_numeric_range() {
        assert_eq!(cleaner().escape_ampersands("&#xFFFFFF;"), "&#xFFFFFF;");
    }

    #[test]
    fn test_strip_runs_before_escape() {
        // removing the control char joins the reference back together
        assert_eq!(cleaner().clean("&lt\u{1};"), "&lt;");
    }

    #[test]
    fn test_unchanged_text_is_borrowed() {
        let c = cleaner();
        assert!(matches!(c.strip_control_chars("<a/>"), Cow::Borrowed(_)));
        assert!(matches!(c.escape_ampersands("<a/>"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_summary_counts() {
        let summary = cleaner().clean_with_summary("<a>\x00\x01 & &amp; &x</a>");
        assert_eq!(summary.text, "<a> &amp; &amp; &amp;x</a>");
        assert_eq!(summary.removed_controls, 2);
        assert_eq!(summary.escaped_ampersands, 2);
    }

    fn tricky_text() -> impl Strategy<Value = String> {
        let alphabet = prop::sample::select(vec![
            '&', ';', '#', 'a', 'Z', '0', '9', 'x', ' ', '<', '>', '\t', '\n', '\r', '\u{0}',
            '\u{b}', '\u{1f}', '\u{7f}', '\u{85}', '\u{9f}', '\u{a0}', '\u{e9}',
        ]);
        prop::collection::vec(alphabet, 0..96).prop_map(|chars| chars.into_iter().collect())
    }

    proptest! {
        #[test]
        fn prop_no_disallowed_chars_remain(chars in prop::collection::vec(any::<char>(), 0..128)) {
            let input: String = chars.into_iter().collect();
            let cleaned = cleaner().clean(&input);
            prop_assert!(!cleaned.chars().any(is_disallowed));
        }

        #[test]
        fn prop_whitespace_controls_preserved(input in tricky_text()) {
            let cleaned = cleaner().clean(&input);
            for ws in ['\t', '\n', '\r'] {
                prop_assert_eq!(
                    input.chars().filter(|c| *c == ws).count(),
                    cleaned.chars().filter(|c| *c == ws).count()
                );
            }
        }

        #[test]
        fn prop_escape_matches_reference_scanner(input in tricky_text()) {
            let c = cleaner();
            let stripped = c.strip_control_chars(&input).into_owned();
            prop_assert_eq!(c.escape_ampersands(&stripped).into_owned(), reference_escape(&stripped));
        }

        #[test]
        fn prop_cleanup_is_idempotent(input in tricky_text()) {
            let c = cleaner();
            let once = c.clean(&input);
            prop_assert_eq!(c.clean(&once), once);
        }
    }
}
