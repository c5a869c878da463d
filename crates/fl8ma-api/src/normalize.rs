//! Text normalization for catalog fields that carry markup.

use std::sync::LazyLock;

use regex::Regex;

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"));

/// Entities AniList descriptions are known to contain. `&amp;` must stay last
/// so `&amp;lt;` decodes to the literal text `&lt;`.
const ENTITIES: &[(&str, &str)] = &[
    ("&nbsp;", " "),
    ("&quot;", "\""),
    ("&#039;", "'"),
    ("&#39;", "'"),
    ("&apos;", "'"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&mdash;", "\u{2014}"),
    ("&ndash;", "\u{2013}"),
    ("&amp;", "&"),
];

/// Remove every tag-like substring, decode basic entities, and trim.
///
/// ```
/// use fl8ma_api::normalize::strip_markup;
/// assert_eq!(strip_markup("<p>Hello <b>world</b></p>"), "Hello world");
/// ```
pub fn strip_markup(s: &str) -> String {
    let stripped = TAG_RE.replace_all(s, "");
    let mut text = stripped.into_owned();
    for (entity, replacement) in ENTITIES {
        if text.contains(entity) {
            text = text.replace(entity, replacement);
        }
    }
    text.trim().to_string()
}

/// Sanitize an optional description; blank results collapse to `None`.
pub fn clean_description(s: Option<String>) -> Option<String> {
    s.map(|d| strip_markup(&d)).filter(|d| !d.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_nested_tags() {
        assert_eq!(strip_markup("<p>Hello <b>world</b></p>"), "Hello world");
    }

    #[test]
    fn test_strip_line_breaks_and_attributes() {
        let input = r#"Line one<br><br>
<i class="spoiler">Line two</i>"#;
        assert_eq!(strip_markup(input), "Line one\nLine two");
    }

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(strip_markup("No markup here."), "No markup here.");
    }

    #[test]
    fn test_entities_decoded_after_stripping() {
        assert_eq!(
            strip_markup("Tom &amp; Jerry &quot;classic&quot; &lt;b&gt;"),
            "Tom & Jerry \"classic\" <b>"
        );
        assert_eq!(strip_markup("&amp;lt;"), "&lt;");
    }

    #[test]
    fn test_unclosed_angle_bracket_kept() {
        assert_eq!(strip_markup("a < b"), "a < b");
    }

    #[test]
    fn test_clean_description_blank() {
        assert_eq!(clean_description(Some("<br>".into())), None);
        assert_eq!(clean_description(None), None);
        assert_eq!(
            clean_description(Some("<p>Pirates!</p>".into())).as_deref(),
            Some("Pirates!")
        );
    }
}
