//! Where page text comes from.
//!
//! Rasterisation and OCR live outside this crate; the parser only sees one
//! text result per page.

use crate::error::PageTextError;

/// Ordered page text of one document.
pub trait PageSource {
    fn page_count(&self) -> usize;

    /// Text of page `index`. An `Err` is treated as a page without content.
    fn page_text(&self, index: usize) -> Result<String, PageTextError>;
}

/// Page text already held in memory.
#[derive(Debug, Clone, Default)]
pub struct TextPages {
    pages: Vec<Result<String, PageTextError>>,
}

impl TextPages {
    pub fn new<I, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TextPages {
            pages: pages.into_iter().map(|p| Ok(p.into())).collect(),
        }
    }

    /// Pages whose retrieval may already have failed.
    pub fn from_results(pages: Vec<Result<String, PageTextError>>) -> Self {
        TextPages { pages }
    }

    /// Split text on form feeds, one page per segment. A single trailing
    /// form feed does not open an extra page.
    pub fn from_form_feed(text: &str) -> Self {
        let text = text.strip_suffix('\x0c').unwrap_or(text);
        TextPages::new(text.split('\x0c'))
    }
}

impl PageSource for TextPages {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, index: usize) -> Result<String, PageTextError> {
        match self.pages.get(index) {
            Some(page) => page.clone(),
            None => Err(PageTextError::new(index, "no such page")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_feed_pages() {
        let pages = TextPages::from_form_feed("cover\x0cpage two\nline\x0c");
        assert_eq!(pages.page_count(), 2);
        assert_eq!(pages.page_text(1).unwrap(), "page two\nline");
        assert!(pages.page_text(2).is_err());
    }

    #[test]
    fn test_failed_page_is_reported() {
        let pages = TextPages::from_results(vec![Ok("x".into()), Err(PageTextError::new(1, "timed out"))]);
        assert_eq!(pages.page_text(1).unwrap_err().reason, "timed out");
    }
}
