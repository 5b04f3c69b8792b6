//! Transform step: markup stripping and word counting.

use fancy_regex::Regex;

use crate::error::Result;
use crate::models::WordCounts;

/// Compiled patterns for turning markup into word frequencies.
#[derive(Debug, Clone)]
pub struct Transformer {
    tag: Regex,
    whitespace: Regex,
    word: Regex,
}

impl Transformer {
    pub fn new() -> Result<Self> {
        Ok(Self {
            tag: Regex::new(r"<[^>]+>")?,
            whitespace: Regex::new(r"\s+")?,
            word: Regex::new(r"\w+")?,
        })
    }

    /// Replaces every tag with a space, collapses whitespace runs and trims.
    pub fn clean(&self, markup: &str) -> String {
        let text = self.tag.replace_all(markup, " ");
        let text = self.whitespace.replace_all(&text, " ");
        text.trim().to_string()
    }

    /// Counts lowercase tokens, where a token is a maximal run of word
    /// characters (letters, digits, underscore).
    pub fn count_words(&self, text: &str) -> WordCounts {
        let lowered = text.to_lowercase();
        self.word
            .find_iter(&lowered)
            .filter_map(|m| m.ok())
            .map(|m| m.as_str())
            .collect()
    }

    /// `clean` followed by `count_words`.
    pub fn transform(&self, markup: &str) -> WordCounts {
        self.count_words(&self.clean(markup))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transformer() -> Transformer {
        Transformer::new().unwrap()
    }

    #[test]
    fn test_clean_strips_tags_and_whitespace() {
        let html = "<html>\n  <body><h1>Hello</h1>\t<p>big   world</p></body>\n</html>";
        assert_eq!(transformer().clean(html), "Hello big world");
    }

    #[test]
    fn test_clean_separates_adjacent_elements() {
        assert_eq!(transformer().clean("<b>one</b><i>two</i>"), "one two");
    }

    #[test]
    fn test_clean_empty_and_tag_only() {
        assert_eq!(transformer().clean(""), "");
        assert_eq!(transformer().clean("<br/><hr>"), "");
    }

    #[test]
    fn test_count_words_is_case_insensitive() {
        let counts = transformer().count_words("Rust rust RUST go");
        assert_eq!(counts.get("rust"), 3);
        assert_eq!(counts.get("go"), 1);
        assert_eq!(counts.unique_words(), 2);
    }

    #[test]
    fn test_count_words_tokenization() {
        let counts = transformer().count_words("snake_case, v2.0 don't");
        assert_eq!(counts.get("snake_case"), 1);
        assert_eq!(counts.get("v2"), 1);
        assert_eq!(counts.get("0"), 1);
        assert_eq!(counts.get("don"), 1);
        assert_eq!(counts.get("t"), 1);
        assert_eq!(counts.unique_words(), 5);
    }

    #[test]
    fn test_transform_end_to_end() {
        let counts =
            transformer().transform("<p>Example Domain</p><p>This domain is for use</p>");
        assert_eq!(counts.get("domain"), 2);
        assert_eq!(counts.get("example"), 1);
        assert_eq!(counts.total_words(), 7);
    }
}
