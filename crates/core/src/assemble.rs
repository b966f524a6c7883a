//! Deck assembly.
//!
//! Orchestrates the segmented sections through summarization and layout
//! into a complete in-memory deck: title slide, one content slide per kept
//! section, and a trailing references slide.

use crate::error::Result;
use crate::layout::LayoutEngine;
use crate::types::{Deck, ImageSide, ReferenceList, Section, Slide};

/// External text-summarization capability.
///
/// Implementations call a language-model service; tests substitute a stub.
/// On `Ok`, both methods always yield a usable string: `summarize_body`
/// returns 4-8 newline-joined bullet lines, `summarize_caption` returns a
/// short phrase (or empty for empty input, without a service call).
pub trait Summarizer {
    /// Compress section body text into slide-ready bullet lines.
    fn summarize_body(&self, text: &str) -> Result<String>;

    /// Compress an image caption into a 5-8 word phrase.
    fn summarize_caption(&self, text: &str) -> Result<String>;
}

/// Builds a [`Deck`] from segmented article content.
pub struct DeckAssembler<'a> {
    summarizer: &'a dyn Summarizer,
    layout: LayoutEngine,
}

impl<'a> DeckAssembler<'a> {
    pub fn new(summarizer: &'a dyn Summarizer) -> Self {
        Self {
            summarizer,
            layout: LayoutEngine::new(),
        }
    }

    /// Assemble the full deck in memory.
    ///
    /// Sections are consumed in document order. A summarization failure for
    /// a section body aborts assembly; a caption summarization failure is
    /// logged and the raw caption kept.
    pub fn assemble(
        &self,
        topic: &str,
        sections: Vec<Section>,
        references: ReferenceList,
    ) -> Result<Deck> {
        let mut deck = Deck::new(topic);
        let total = sections.len();

        deck.slides.push(Slide::Title {
            title: topic.to_string(),
            subtitle: subtitle_from_titles(&sections),
        });

        let mut side = ImageSide::Right;
        for (idx, mut section) in sections.into_iter().enumerate() {
            for image in &mut section.images {
                if image.caption.is_empty() {
                    continue;
                }
                match self.summarizer.summarize_caption(&image.caption) {
                    Ok(caption) => image.caption = caption,
                    Err(e) => {
                        log::warn!(
                            "caption summarization failed for '{}': {}",
                            section.title,
                            e
                        );
                    }
                }
            }

            let bullet_text = self.summarizer.summarize_body(&section.body_text)?;
            let bullets: Vec<String> = bullet_text
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(String::from)
                .collect();

            let (spec, next_side) = self.layout.plan(&section, bullets, side);
            side = next_side;

            log::info!("Generated slide {}/{}: {}", idx + 1, total, spec.title);
            deck.slides.push(Slide::Content(spec));
        }

        let body = references.render();
        deck.slides.push(Slide::References {
            source_url: references.source_url,
            body,
        });

        Ok(deck)
    }
}

/// Title-slide subtitle: the first three kept section titles, with an
/// "and more" tail when further sections exist.
fn subtitle_from_titles(sections: &[Section]) -> String {
    let titles: Vec<&str> = sections.iter().map(|s| s.title.as_str()).collect();
    if titles.len() > 3 {
        format!("{}, {}, {} and more", titles[0], titles[1], titles[2])
    } else {
        titles.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::types::{ImageRef, LayoutKind};
    use std::path::PathBuf;

    struct StubSummarizer {
        fail_body: bool,
    }

    impl Summarizer for StubSummarizer {
        fn summarize_body(&self, _text: &str) -> Result<String> {
            if self.fail_body {
                return Err(Error::SummarizationFailure("stub".to_string()));
            }
            Ok("First point\nSecond point\nThird point\nFourth point".to_string())
        }

        fn summarize_caption(&self, _text: &str) -> Result<String> {
            Ok("short descriptive phrase".to_string())
        }
    }

    fn sections(n: usize) -> Vec<Section> {
        (0..n)
            .map(|i| Section::new(format!("Section {}", i + 1), "body text"))
            .collect()
    }

    fn refs() -> ReferenceList {
        ReferenceList {
            entries: Vec::new(),
            source_url: "https://en.wikipedia.org/wiki/Example".to_string(),
            truncated: false,
        }
    }

    #[test]
    fn test_slide_count_invariant() {
        let stub = StubSummarizer { fail_body: false };
        let assembler = DeckAssembler::new(&stub);
        for n in [0usize, 1, 3, 7] {
            let deck = assembler.assemble("Topic", sections(n), refs()).unwrap();
            assert_eq!(deck.slides.len(), 2 + n);
            assert!(matches!(deck.slides[0], Slide::Title { .. }));
            assert!(matches!(deck.slides.last(), Some(Slide::References { .. })));
        }
    }

    #[test]
    fn test_subtitle_three_or_fewer() {
        let subtitle = subtitle_from_titles(&sections(3));
        assert_eq!(subtitle, "Section 1, Section 2, Section 3");
        assert_eq!(subtitle_from_titles(&sections(1)), "Section 1");
        assert_eq!(subtitle_from_titles(&[]), "");
    }

    #[test]
    fn test_subtitle_more_than_three() {
        let subtitle = subtitle_from_titles(&sections(5));
        assert_eq!(subtitle, "Section 1, Section 2, Section 3 and more");
    }

    #[test]
    fn test_body_failure_aborts() {
        let stub = StubSummarizer { fail_body: true };
        let assembler = DeckAssembler::new(&stub);
        let err = assembler.assemble("Topic", sections(2), refs()).unwrap_err();
        assert!(matches!(err, Error::SummarizationFailure(_)));
    }

    #[test]
    fn test_captions_summarized_and_sides_alternate() {
        let stub = StubSummarizer { fail_body: false };
        let assembler = DeckAssembler::new(&stub);

        let img = |caption: &str| ImageRef {
            local_path: PathBuf::from("img0.jpg"),
            caption: caption.to_string(),
            width_px: 800,
            height_px: 600,
        };

        let mut first = Section::new("First", "body");
        first.add_image(img("An original long caption from the article"));
        let middle = Section::new("Middle", "body");
        let mut last = Section::new("Last", "body");
        last.add_image(img("Another caption"));

        let deck = assembler
            .assemble("Topic", vec![first, middle, last], refs())
            .unwrap();

        let specs: Vec<_> = deck
            .slides
            .iter()
            .filter_map(|s| match s {
                Slide::Content(spec) => Some(spec),
                _ => None,
            })
            .collect();

        assert_eq!(specs.len(), 3);
        assert_eq!(
            specs[0].images[0].caption.as_ref().unwrap().text,
            "short descriptive phrase"
        );
        // Image-bearing slides alternate; the text-only slide between them
        // does not consume a toggle.
        assert_eq!(specs[0].image_side, ImageSide::Right);
        assert_eq!(specs[1].layout, LayoutKind::TextOnly);
        assert_eq!(specs[2].image_side, ImageSide::Left);
    }
}
