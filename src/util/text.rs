use std::borrow::Cow;
use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Ellipsis string used for truncation
const ELLIPSIS: &str = "...";

/// Tags, plus named, decimal and hex character references.
const MARKUP_PATTERN: &str = r"(?i)<.*?>|&(?:[a-z0-9]+|#[0-9]{1,6}|#x[0-9a-f]{1,6});";

fn markup_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(MARKUP_PATTERN).expect("markup pattern is a valid regex"))
}

/// Strips HTML tags and character references from feed-supplied markup.
///
/// Tags are removed outright. Character references (`&nbsp;`, `&#8217;`,
/// `&#x2014;`) become a single space so words they separated stay separated.
/// The result is trimmed.
///
/// ```
/// use feedcast::util::clean_markup;
///
/// assert_eq!(clean_markup("<p>Hello&nbsp;World</p>"), "Hello World");
/// assert_eq!(clean_markup("  plain  "), "plain");
/// ```
pub fn clean_markup(raw: &str) -> String {
    let stripped = markup_regex().replace_all(raw, |caps: &Captures<'_>| {
        if caps[0].starts_with('&') {
            " "
        } else {
            ""
        }
    });
    stripped.trim().to_string()
}

/// Truncates to at most `max_chars` characters, appending `...` when cut.
///
/// Counts Unicode scalar values, not bytes or display columns, so a cut
/// never lands inside a multi-byte character. Returns `Cow::Borrowed` when
/// the input already fits.
///
/// ```
/// use feedcast::util::truncate_chars;
///
/// assert_eq!(truncate_chars("Short", 10), "Short");
/// assert_eq!(truncate_chars("Hello World", 5), "Hello...");
/// ```
pub fn truncate_chars(s: &str, max_chars: usize) -> Cow<'_, str> {
    match s.char_indices().nth(max_chars) {
        None => Cow::Borrowed(s),
        Some((cut, _)) => Cow::Owned(format!("{}{}", &s[..cut], ELLIPSIS)),
    }
}

/// Builds the channel hashtag for a source name.
///
/// Whitespace becomes `_` and parentheses are dropped:
/// `"MKBHD (YouTube)"` → `"#MKBHD_YouTube"`.
pub fn hashtag(name: &str) -> String {
    let mut tag = String::with_capacity(name.len() + 1);
    tag.push('#');
    for c in name.chars() {
        match c {
            '(' | ')' => {}
            c if c.is_whitespace() => tag.push('_'),
            c => tag.push(c),
        }
    }
    tag
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    // ========================================================================
    // clean_markup tests
    // ========================================================================

    #[test]
    fn test_clean_paragraph_with_nbsp() {
        assert_eq!(clean_markup("<p>Hello&nbsp;World</p>"), "Hello World");
    }

    #[test]
    fn test_clean_numeric_and_hex_references() {
        assert_eq!(clean_markup("It&#8217;s a&#x2014;test"), "It s a test");
    }

    #[test]
    fn test_clean_tags_with_attributes() {
        let raw = r#"<div class="x"><a href="https://e.com">Link</a> <img src="a.png"/>text</div>"#;
        assert_eq!(clean_markup(raw), "Link text");
    }

    #[test]
    fn test_clean_uppercase_tags_and_entities() {
        assert_eq!(clean_markup("<B>Bold</B>&AMP;"), "Bold");
    }

    #[test]
    fn test_clean_leaves_bare_ampersand() {
        assert_eq!(clean_markup("AT&T earnings"), "AT&T earnings");
    }

    #[test]
    fn test_clean_tag_spanning_lines_is_kept() {
        // `.` does not cross newlines, so a tag broken over two lines survives
        assert_eq!(clean_markup("<a\nhref=x>hi"), "<a\nhref=x>hi");
    }

    #[test]
    fn test_clean_empty_and_whitespace() {
        assert_eq!(clean_markup(""), "");
        assert_eq!(clean_markup("  <br/>  "), "");
    }

    // ========================================================================
    // truncate_chars tests
    // ========================================================================

    #[test]
    fn test_truncate_fits_returns_borrowed() {
        let result = truncate_chars("Short", 10);
        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(result, "Short");
    }

    #[test]
    fn test_truncate_exact_fit() {
        assert_eq!(truncate_chars("12345", 5), "12345");
    }

    #[test]
    fn test_truncate_cuts_and_appends_ellipsis() {
        assert_eq!(truncate_chars("123456", 5), "12345...");
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate_chars("日本語テキスト", 3), "日本語...");
        assert_eq!(truncate_chars("🎬🎬🎬", 2), "🎬🎬...");
    }

    #[test]
    fn test_truncate_zero() {
        assert_eq!(truncate_chars("abc", 0), "...");
        assert_eq!(truncate_chars("", 0), "");
    }

    // ========================================================================
    // hashtag tests
    // ========================================================================

    #[test]
    fn test_hashtag_simple() {
        assert_eq!(hashtag("TechCrunch"), "#TechCrunch");
    }

    #[test]
    fn test_hashtag_spaces_and_parens() {
        assert_eq!(hashtag("MKBHD (YouTube)"), "#MKBHD_YouTube");
        assert_eq!(hashtag("BBC News"), "#BBC_News");
    }

    #[test]
    fn test_hashtag_each_whitespace_char_replaced() {
        assert_eq!(hashtag("a  b\tc"), "#a__b_c");
    }

    proptest! {
        #[test]
        fn prop_truncate_bounds_length(s in "\\PC{0,80}", max in 0usize..60) {
            let out = truncate_chars(&s, max);
            let len = s.chars().count();
            if len <= max {
                prop_assert_eq!(&*out, s.as_str());
            } else {
                prop_assert_eq!(out.chars().count(), max + ELLIPSIS.len());
                prop_assert!(out.ends_with(ELLIPSIS));
                let kept: String = s.chars().take(max).collect();
                prop_assert!(out.starts_with(&kept));
            }
        }

        #[test]
        fn prop_clean_output_is_trimmed(s in "\\PC{0,80}") {
            let out = clean_markup(&s);
            prop_assert_eq!(out.trim(), out.as_str());
        }

        #[test]
        fn prop_hashtag_has_no_spaces_or_parens(s in "\\PC{0,40}") {
            let tag = hashtag(&s);
            prop_assert!(tag.starts_with('#'));
            prop_assert!(!tag.chars().any(|c| c.is_whitespace() || c == '(' || c == ')'));
        }
    }
}
