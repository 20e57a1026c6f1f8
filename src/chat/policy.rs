//! Content policy applied to chat messages.
//!
//! Accepted text is masked for profanity, rendered from markdown to HTML and
//! then sanitized against ammonia's allow-list.

use pulldown_cmark::{html, Options, Parser};
use regex::Regex;

use crate::{HyperChatError, Result};

/// Words masked by default.
pub const DEFAULT_BLOCKED_WORDS: &[&str] = &[
    "arse",
    "arsehole",
    "asshole",
    "bastard",
    "bitch",
    "bollocks",
    "bullshit",
    "cock",
    "crap",
    "cunt",
    "dick",
    "dickhead",
    "fuck",
    "fucked",
    "fucker",
    "fucking",
    "motherfucker",
    "piss",
    "prick",
    "shit",
    "shitty",
    "slut",
    "twat",
    "wanker",
    "whore",
];

/// Character used to mask blocked words.
const MASK: char = '*';

/// Masks blocked words in text.
///
/// Matching is whole-word and case-insensitive. Each character of a matched
/// word becomes `*`, so the message length is preserved.
#[derive(Debug, Clone)]
pub struct ProfanityFilter {
    pattern: Option<Regex>,
}

impl ProfanityFilter {
    /// Create a filter from a word list.
    pub fn new<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut words: Vec<String> = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();

        if words.is_empty() {
            return Ok(Self { pattern: None });
        }

        // Longest first so the alternation never settles on a prefix.
        words.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then(a.cmp(b)));
        words.dedup();

        let alternation = words
            .iter()
            .map(|w| regex::escape(w))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&format!(r"(?i)\b(?:{alternation})\b"))
            .map_err(|e| HyperChatError::Config(format!("invalid blocked word list: {e}")))?;

        Ok(Self {
            pattern: Some(pattern),
        })
    }

    /// Create a filter with the built-in word list plus `extra` words.
    pub fn with_defaults<S: AsRef<str>>(extra: &[S]) -> Result<Self> {
        let words = DEFAULT_BLOCKED_WORDS
            .iter()
            .map(|w| w.to_string())
            .chain(extra.iter().map(|w| w.as_ref().to_string()));
        Self::new(words)
    }

    /// Mask blocked words in the text.
    pub fn clean(&self, text: &str) -> String {
        match &self.pattern {
            Some(pattern) => pattern
                .replace_all(text, |caps: &regex::Captures<'_>| {
                    MASK.to_string().repeat(caps[0].chars().count())
                })
                .into_owned(),
            None => text.to_string(),
        }
    }
}

/// Render markdown to HTML.
pub fn render_markdown(text: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);

    let parser = Parser::new_ext(text, options);
    let mut out = String::with_capacity(text.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Strip scripts, event handler attributes and tags outside the allow-list.
pub fn sanitize_html(html: &str) -> String {
    ammonia::clean(html)
}

/// The full content transformation for accepted messages.
#[derive(Debug, Clone)]
pub struct ContentPolicy {
    filter: ProfanityFilter,
}

impl ContentPolicy {
    /// Create a policy around the given filter.
    pub fn new(filter: ProfanityFilter) -> Self {
        Self { filter }
    }

    /// Mask profanity, render markdown, then sanitize.
    pub fn render(&self, raw: &str) -> String {
        let filtered = self.filter.clean(raw);
        let html = render_markdown(&filtered);
        sanitize_html(&html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> ContentPolicy {
        ContentPolicy::new(ProfanityFilter::with_defaults::<&str>(&[]).unwrap())
    }

    #[test]
    fn test_clean_masks_whole_words() {
        let filter = ProfanityFilter::with_defaults::<&str>(&[]).unwrap();
        assert_eq!(filter.clean("well shit happens"), "well **** happens");
        assert_eq!(filter.clean("SHIT"), "****");
        assert_eq!(filter.clean("oh Shit"), "oh ****");
    }

    #[test]
    fn test_clean_leaves_substrings_alone() {
        let filter = ProfanityFilter::with_defaults::<&str>(&[]).unwrap();
        assert_eq!(filter.clean("Scunthorpe classic"), "Scunthorpe classic");
        assert_eq!(filter.clean("assessment"), "assessment");
    }

    #[test]
    fn test_clean_prefers_longest_word() {
        let filter = ProfanityFilter::new(["fuck", "fucking"]).unwrap();
        assert_eq!(filter.clean("fucking"), "*******");
    }

    #[test]
    fn test_extra_words() {
        let filter = ProfanityFilter::with_defaults(&["heck"]).unwrap();
        assert_eq!(filter.clean("what the heck"), "what the ****");
    }

    #[test]
    fn test_extra_words_are_escaped() {
        let filter = ProfanityFilter::new(["a.b"]).unwrap();
        assert_eq!(filter.clean("a.b axb"), "*** axb");
    }

    #[test]
    fn test_empty_word_list() {
        let filter = ProfanityFilter::new(Vec::<String>::new()).unwrap();
        assert_eq!(filter.clean("anything goes"), "anything goes");
        assert_eq!(filter.clean("shit"), "shit");
    }

    #[test]
    fn test_render_markdown() {
        let html = render_markdown("**bold** and _em_");
        assert_eq!(html, "<p><strong>bold</strong> and <em>em</em></p>\n");
    }

    #[test]
    fn test_render_keeps_safe_markup() {
        let out = policy().render("# Title\n\n`code` ~~gone~~");
        assert!(out.contains("<h1>Title</h1>"));
        assert!(out.contains("<code>code</code>"));
        assert!(out.contains("<del>gone</del>"));
    }

    #[test]
    fn test_render_strips_script_tags() {
        let out = policy().render("hi <script>alert('x')</script>");
        assert!(!out.contains("<script"));
        assert!(!out.contains("alert"));
        assert!(out.contains("hi"));
    }

    #[test]
    fn test_render_strips_script_block() {
        let out = policy().render("<script>\ndocument.cookie\n</script>");
        assert!(!out.to_lowercase().contains("<script"));
        assert!(!out.contains("document.cookie"));
    }

    #[test]
    fn test_render_strips_event_handlers() {
        let out = policy().render(r#"<img src="x.png" onerror="alert(1)"> <a href="/" onclick="steal()">x</a>"#);
        assert!(!out.contains("onerror"));
        assert!(!out.contains("onclick"));
    }

    #[test]
    fn test_render_strips_javascript_links() {
        let out = policy().render("[click](javascript:alert(1))");
        assert!(!out.contains("javascript:"));
    }

    #[test]
    fn test_render_masks_before_markdown() {
        let out = policy().render("you are shit ok");
        assert!(out.contains("<p>you are **** ok</p>"));
    }
}
