use anyhow::Result;
use log::debug;

use crate::fetcher::PageFetcher;

/// Page fetched when no URL is given.
pub const DEFAULT_URL: &str = "https://bbc.com";

/// Number of characters printed from the fetched page.
pub const DEFAULT_PREVIEW_CHARS: usize = 500;

/// Fetch a page once and print the start of its body.
///
/// Transport errors are reported on stdout and are not fatal.
#[tracing::instrument]
pub fn fetch(url: &str, chars: usize) -> Result<()> {
    debug!("Fetching {} (preview {} chars)", url, chars);
    let mut fetcher = PageFetcher::new(url);

    match fetcher.fetch() {
        Ok(text) => println!("{}", preview(text, chars)),
        Err(e) => println!("Failed to fetch: {}", e),
    }
    Ok(())
}

/// Returns at most the first `chars` characters of `text`.
pub fn preview(text: &str, chars: usize) -> &str {
    match text.char_indices().nth(chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_truncates() {
        assert_eq!(preview("hello world", 5), "hello");
    }

    #[test]
    fn test_preview_short_text_unchanged() {
        assert_eq!(preview("hi", 500), "hi");
        assert_eq!(preview("", 10), "");
    }

    #[test]
    fn test_preview_respects_char_boundaries() {
        assert_eq!(preview("héllo", 2), "hé");
        assert_eq!(preview("日本語テキスト", 3), "日本語");
    }

    #[test]
    fn test_preview_zero() {
        assert_eq!(preview("abc", 0), "");
    }
}
