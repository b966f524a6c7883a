//! Reference extraction.
//!
//! Harvests citation-list entries from excluded reference-labeled
//! fragments into a bounded [`ReferenceList`]: per-entry text (preferring
//! a dedicated `cite` element), the first outbound hyperlink, footnote
//! back-reference markers stripped, with fixed entry and character caps.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Selector};
use wikideck_core::types::{MAX_REFERENCE_ENTRIES, MAX_REFERENCE_ENTRY_CHARS};
use wikideck_core::{ReferenceEntry, ReferenceList};

/// Leading footnote back-references: caret symbols and bracketed letter
/// sequences (`^ `, `[a][b] `).
static BACKREF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:\^+\s*)*(?:\[[a-z]+\]\s*)*").unwrap());

static LI_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("li").unwrap());
static CITE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("cite").unwrap());
static LINK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());

/// Accumulates entries across multiple reference-labeled fragments.
#[derive(Debug, Default)]
pub struct ReferenceCollector {
    entries: Vec<ReferenceEntry>,
    truncated: bool,
}

impl ReferenceCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Harvest list entries from one excluded fragment's elements.
    pub fn collect_fragment(&mut self, elements: &[ElementRef]) {
        for el in elements {
            for li in el.select(&LI_SELECTOR) {
                if self.entries.len() >= MAX_REFERENCE_ENTRIES {
                    self.truncated = true;
                    return;
                }
                if let Some(entry) = entry_from_item(&li) {
                    self.entries.push(entry);
                }
            }
        }
    }

    /// Finish the pass, attaching the article URL.
    pub fn finish(self, source_url: &str) -> ReferenceList {
        ReferenceList {
            entries: self.entries,
            source_url: source_url.to_string(),
            truncated: self.truncated,
        }
    }
}

/// Build one entry from a list item, or `None` when it has no usable text.
fn entry_from_item(li: &ElementRef) -> Option<ReferenceEntry> {
    // Prefer the dedicated citation element; fall back to the item text.
    let raw: String = match li.select(&CITE_SELECTOR).next() {
        Some(cite) => cite.text().collect::<Vec<_>>().join(" "),
        None => li.text().collect::<Vec<_>>().join(" "),
    };

    let cleaned = BACKREF_RE.replace(&raw, "");
    let cleaned = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.is_empty() {
        return None;
    }

    let url = li
        .select(&LINK_SELECTOR)
        .filter_map(|a| a.value().attr("href"))
        .find(|href| href.starts_with("http"))
        .map(String::from);

    Some(ReferenceEntry {
        text: truncate_chars(&cleaned, MAX_REFERENCE_ENTRY_CHARS),
        url,
    })
}

fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn collect(html: &str) -> ReferenceList {
        let doc = Html::parse_document(html);
        let body = doc
            .select(&Selector::parse("body").unwrap())
            .next()
            .unwrap();
        let elements: Vec<ElementRef> = body.children().filter_map(ElementRef::wrap).collect();

        let mut collector = ReferenceCollector::new();
        collector.collect_fragment(&elements);
        collector.finish("https://en.wikipedia.org/wiki/Example")
    }

    #[test]
    fn test_prefers_cite_element_and_first_link() {
        let html = r##"<html><body><ol class="references">
            <li>^ <a href="#back">b</a> <cite>Smith, J. (2001). A History. Publisher.</cite>
                <a href="https://example.org/source">source</a></li>
        </ol></body></html>"##;

        let refs = collect(html);
        assert_eq!(refs.entries.len(), 1);
        assert_eq!(refs.entries[0].text, "Smith, J. (2001). A History. Publisher.");
        assert_eq!(
            refs.entries[0].url.as_deref(),
            Some("https://example.org/source")
        );
    }

    #[test]
    fn test_strips_backreference_markers() {
        let html = r#"<html><body><ol>
            <li>^ [a] [b] Doe, A. Field Notes.</li>
        </ol></body></html>"#;

        let refs = collect(html);
        assert_eq!(refs.entries[0].text, "Doe, A. Field Notes.");
    }

    #[test]
    fn test_entry_cap() {
        let items: String = (0..20)
            .map(|i| format!("<li>Entry number {}.</li>", i))
            .collect();
        let html = format!("<html><body><ol>{}</ol></body></html>", items);

        let refs = collect(&html);
        assert_eq!(refs.entries.len(), MAX_REFERENCE_ENTRIES);
        assert!(refs.truncated);
    }

    #[test]
    fn test_entry_text_truncated() {
        let html = format!(
            "<html><body><ol><li>{}</li></ol></body></html>",
            "long entry ".repeat(60)
        );

        let refs = collect(&html);
        assert_eq!(
            refs.entries[0].text.chars().count(),
            MAX_REFERENCE_ENTRY_CHARS
        );
    }

    #[test]
    fn test_empty_items_skipped() {
        let html = "<html><body><ol><li>  </li><li>Real entry.</li></ol></body></html>";
        let refs = collect(&html);
        assert_eq!(refs.entries.len(), 1);
    }
}
