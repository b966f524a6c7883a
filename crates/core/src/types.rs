//! Domain types for article sections, slide specifications, and decks.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Maximum accepted images per section.
pub const MAX_IMAGES_PER_SECTION: usize = 2;

/// One kept subtopic of the source article, mapped to exactly one slide.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    /// Section heading text, artifact-stripped, unique within a deck.
    pub title: String,

    /// Plain paragraph text with citation markers removed.
    pub body_text: String,

    /// Accepted embedded images in discovery order (at most two).
    pub images: Vec<ImageRef>,
}

impl Section {
    /// Create a section with no images.
    pub fn new(title: impl Into<String>, body_text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body_text: body_text.into(),
            images: Vec::new(),
        }
    }

    /// Add an image, ignoring it once the per-section cap is reached.
    pub fn add_image(&mut self, image: ImageRef) -> bool {
        if self.images.len() >= MAX_IMAGES_PER_SECTION {
            return false;
        }
        self.images.push(image);
        true
    }
}

/// A downloaded image belonging to one section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRef {
    /// Path of the downloaded file (`<out>/<Section_Title>/img<N>.<ext>`).
    pub local_path: PathBuf,

    /// Best-effort caption; possibly empty, possibly summarized.
    pub caption: String,

    /// Intrinsic pixel width, probed at download time.
    pub width_px: u32,

    /// Intrinsic pixel height, probed at download time.
    pub height_px: u32,
}

/// Maximum entries kept in a [`ReferenceList`].
pub const MAX_REFERENCE_ENTRIES: usize = 8;

/// Maximum characters kept per reference entry.
pub const MAX_REFERENCE_ENTRY_CHARS: usize = 300;

/// Total character budget for the rendered reference blob.
pub const REFERENCE_CHAR_BUDGET: usize = 2000;

/// One citation entry pulled from a references section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceEntry {
    /// Citation text, truncated to [`MAX_REFERENCE_ENTRY_CHARS`].
    pub text: String,

    /// First outbound hyperlink in the entry, if any.
    pub url: Option<String>,
}

/// Bounded citation summary built from excluded reference sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferenceList {
    /// Entries in document order, capped at [`MAX_REFERENCE_ENTRIES`].
    pub entries: Vec<ReferenceEntry>,

    /// URL of the source article.
    pub source_url: String,

    /// True when entries were dropped to stay within the budget.
    pub truncated: bool,
}

impl ReferenceList {
    /// Render the list as numbered lines, staying within the global
    /// character budget.
    ///
    /// Each entry becomes `"{n}. {text}"`, followed by an indented URL line
    /// when a hyperlink was found. Rendering stops once the budget would be
    /// exceeded, appending an `"And more..."` marker.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let mut cut_short = self.truncated;

        for (idx, entry) in self.entries.iter().enumerate() {
            let mut block = format!("{}. {}\n", idx + 1, entry.text);
            if let Some(url) = &entry.url {
                block.push_str(&format!("    {}\n", url));
            }
            if out.len() + block.len() > REFERENCE_CHAR_BUDGET {
                cut_short = true;
                break;
            }
            out.push_str(&block);
        }

        if cut_short {
            out.push_str("And more...\n");
        }

        out
    }
}

/// Which slide template a section maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutKind {
    /// Full-width bullet text, no picture.
    TextOnly,
    /// Bullet text on one half, picture(s) on the other.
    TextPlusImage,
}

/// Which half of an image-bearing slide holds the picture.
///
/// The side alternates across consecutive image-bearing slides; text-only
/// slides leave the state untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageSide {
    Left,
    Right,
}

impl ImageSide {
    /// The opposite side.
    pub fn toggled(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// A caption resolved to its final position under an image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacedCaption {
    pub text: String,
    pub font_pt: u32,
    pub left_in: f64,
    pub top_in: f64,
    pub width_in: f64,
}

/// An image resolved to its final position inside the content region.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacedImage {
    pub path: PathBuf,
    pub left_in: f64,
    pub top_in: f64,
    pub width_in: f64,
    pub height_in: f64,
    pub caption: Option<PlacedCaption>,
}

/// The fully resolved layout/content description for one content slide.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlideSpec {
    /// Slide title (the section title).
    pub title: String,

    /// Summarized bullet lines, one per row.
    pub bullets: Vec<String>,

    /// Selected template.
    pub layout: LayoutKind,

    /// Side holding the picture(s); meaningful only for `TextPlusImage`.
    pub image_side: ImageSide,

    /// Body font size in points after heuristic adjustment.
    pub font_pt: u32,

    /// Placed images with captions (empty for `TextOnly`).
    pub images: Vec<PlacedImage>,

    /// Off-screen speaker notes: the pre-summarization body text, capped.
    pub notes: String,
}

/// One slide of the final deck.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Slide {
    /// Opening slide: topic plus a subtitle naming the first subtopics.
    Title { title: String, subtitle: String },

    /// One slide per kept section.
    Content(SlideSpec),

    /// Trailing slide: hyperlinked source line plus the citation summary.
    References { source_url: String, body: String },
}

/// An assembled deck, fully in memory, ready to be persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deck {
    /// The chosen topic, used for the title slide and the output filename.
    pub topic: String,

    /// Slides in final order: title first, references last.
    pub slides: Vec<Slide>,
}

impl Deck {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            slides: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_image_cap() {
        let mut section = Section::new("History", "body");
        let img = ImageRef {
            local_path: PathBuf::from("img0.jpg"),
            caption: String::new(),
            width_px: 100,
            height_px: 100,
        };
        assert!(section.add_image(img.clone()));
        assert!(section.add_image(img.clone()));
        assert!(!section.add_image(img));
        assert_eq!(section.images.len(), MAX_IMAGES_PER_SECTION);
    }

    #[test]
    fn test_reference_render_numbers_and_urls() {
        let list = ReferenceList {
            entries: vec![
                ReferenceEntry {
                    text: "Smith, J. (2001). A History.".to_string(),
                    url: Some("https://example.org/history".to_string()),
                },
                ReferenceEntry {
                    text: "Doe, A. (2010). Another Work.".to_string(),
                    url: None,
                },
            ],
            source_url: "https://en.wikipedia.org/wiki/Example".to_string(),
            truncated: false,
        };

        let blob = list.render();
        assert!(blob.starts_with("1. Smith, J. (2001). A History.\n"));
        assert!(blob.contains("    https://example.org/history\n"));
        assert!(blob.contains("2. Doe, A. (2010). Another Work.\n"));
        assert!(!blob.contains("And more"));
    }

    #[test]
    fn test_reference_render_respects_budget() {
        let entries: Vec<ReferenceEntry> = (0..MAX_REFERENCE_ENTRIES)
            .map(|i| ReferenceEntry {
                text: format!("{} {}", "x".repeat(290), i),
                url: None,
            })
            .collect();
        let list = ReferenceList {
            entries,
            source_url: String::new(),
            truncated: false,
        };

        let blob = list.render();
        assert!(blob.len() <= REFERENCE_CHAR_BUDGET + "And more...\n".len());
        assert!(blob.ends_with("And more...\n"));
    }

    #[test]
    fn test_reference_render_marks_upstream_truncation() {
        let list = ReferenceList {
            entries: vec![ReferenceEntry {
                text: "Only entry".to_string(),
                url: None,
            }],
            source_url: String::new(),
            truncated: true,
        };
        assert!(list.render().ends_with("And more...\n"));
    }

    #[test]
    fn test_image_side_toggles() {
        assert_eq!(ImageSide::Left.toggled(), ImageSide::Right);
        assert_eq!(ImageSide::Right.toggled(), ImageSide::Left);
        assert_eq!(ImageSide::Left.toggled().toggled(), ImageSide::Left);
    }
}
