//! Slide layout heuristics.
//!
//! Decides the slide template for a section, sizes the body font from the
//! bullet text, and places one or two images (with captions) inside the
//! fixed content region. The text/image side alternates across consecutive
//! image-bearing slides; the alternation state is threaded explicitly
//! through each [`LayoutEngine::plan`] call.

use crate::geometry::fit;
use crate::types::{
    ImageRef, ImageSide, LayoutKind, PlacedCaption, PlacedImage, Section, SlideSpec,
};

/// Top of the content region, inches from the slide's top edge.
const REGION_TOP_IN: f64 = 1.5;

/// Width of the image half of the content region.
const REGION_WIDTH_IN: f64 = 4.5;

/// Height of the image region when a single image is placed.
const REGION_HEIGHT_IN: f64 = 5.5;

/// Height of each stacked sub-region when two images are placed.
const SUB_REGION_HEIGHT_IN: f64 = 2.6;

/// Vertical gap between the two stacked sub-regions.
const SUB_REGION_GAP_IN: f64 = 0.3;

/// Left edge of the image region when the image sits on the left half.
const LEFT_HALF_IN: f64 = 0.5;

/// Left edge of the image region when the image sits on the right half.
const RIGHT_HALF_IN: f64 = 5.0;

/// Gap between an image's bottom edge and its caption.
const CAPTION_OFFSET_IN: f64 = 0.05;

/// Caption font size under a single image.
const SINGLE_CAPTION_PT: u32 = 12;

/// Caption font size under each of two stacked images.
const DUAL_CAPTION_PT: u32 = 10;

/// Base body font size for a text-only slide.
const TEXT_ONLY_BASE_PT: i32 = 24;

/// Base body font size for a text-plus-image slide.
const TEXT_IMAGE_BASE_PT: i32 = 18;

/// Speaker-notes cap in characters.
const NOTES_CAP_CHARS: usize = 5000;

/// Plans one slide per section.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine;

impl LayoutEngine {
    pub fn new() -> Self {
        Self
    }

    /// Produce the slide specification for `section` and the alternation
    /// state to feed into the next call.
    ///
    /// `bullets` are the summarized lines for the slide body; `side` is
    /// where the picture goes if this slide carries one. The returned side
    /// toggles only when this slide actually bears an image.
    pub fn plan(
        &self,
        section: &Section,
        bullets: Vec<String>,
        side: ImageSide,
    ) -> (SlideSpec, ImageSide) {
        let layout = if section.images.is_empty() {
            LayoutKind::TextOnly
        } else {
            LayoutKind::TextPlusImage
        };

        let font_pt = body_font_pt(layout, &bullets);
        let images = self.place_images(&section.images, side);
        let notes = truncate_chars(&section.body_text, NOTES_CAP_CHARS);

        let spec = SlideSpec {
            title: section.title.clone(),
            bullets,
            layout,
            image_side: side,
            font_pt,
            images,
            notes,
        };

        let next_side = match layout {
            LayoutKind::TextPlusImage => side.toggled(),
            LayoutKind::TextOnly => side,
        };

        (spec, next_side)
    }

    fn place_images(&self, images: &[ImageRef], side: ImageSide) -> Vec<PlacedImage> {
        let region_left = match side {
            ImageSide::Left => LEFT_HALF_IN,
            ImageSide::Right => RIGHT_HALF_IN,
        };

        match images {
            [] => Vec::new(),
            [single] => vec![place_one(
                single,
                region_left,
                REGION_TOP_IN,
                REGION_HEIGHT_IN,
                SINGLE_CAPTION_PT,
            )],
            [first, second, ..] => {
                let second_top = REGION_TOP_IN + SUB_REGION_HEIGHT_IN + SUB_REGION_GAP_IN;
                vec![
                    place_one(
                        first,
                        region_left,
                        REGION_TOP_IN,
                        SUB_REGION_HEIGHT_IN,
                        DUAL_CAPTION_PT,
                    ),
                    place_one(
                        second,
                        region_left,
                        second_top,
                        SUB_REGION_HEIGHT_IN,
                        DUAL_CAPTION_PT,
                    ),
                ]
            }
        }
    }
}

/// Fit one image into its sub-region, centering via the fit slack, and hang
/// its caption directly below.
fn place_one(
    image: &ImageRef,
    region_left: f64,
    region_top: f64,
    region_height: f64,
    caption_pt: u32,
) -> PlacedImage {
    let f = fit(
        image.width_px as f64,
        image.height_px as f64,
        REGION_WIDTH_IN,
        region_height,
    );

    let top = region_top + f.height_slack / 2.0;
    let caption = if image.caption.trim().is_empty() {
        None
    } else {
        Some(PlacedCaption {
            text: image.caption.clone(),
            font_pt: caption_pt,
            left_in: region_left,
            top_in: top + f.height + CAPTION_OFFSET_IN,
            width_in: REGION_WIDTH_IN,
        })
    };

    PlacedImage {
        path: image.local_path.clone(),
        left_in: region_left + f.width_slack / 2.0,
        top_in: top,
        width_in: f.width,
        height_in: f.height,
        caption,
    }
}

/// Body font size from content length and line count.
///
/// The two adjustment passes compose additively: the character-count branch
/// picks one of -4/-2/+2, then the line-count pass adds +2 (short decks) or
/// -1 (long decks) on top. The passes can partially cancel; that composed
/// arithmetic is intentional.
fn body_font_pt(layout: LayoutKind, bullets: &[String]) -> u32 {
    let base = match layout {
        LayoutKind::TextOnly => TEXT_ONLY_BASE_PT,
        LayoutKind::TextPlusImage => TEXT_IMAGE_BASE_PT,
    };

    let chars: usize = bullets.iter().map(|b| b.chars().count()).sum();
    let lines = bullets.len();

    let mut pt = base;
    if chars > 700 {
        pt -= 4;
    } else if chars > 550 {
        pt -= 2;
    } else if chars < 400 {
        pt += 2;
    }

    if lines <= 5 {
        pt += 2;
    }
    if lines >= 8 {
        pt -= 1;
    }

    pt.max(1) as u32
}

/// Truncate on a character boundary.
fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn image(caption: &str, w: u32, h: u32) -> ImageRef {
        ImageRef {
            local_path: PathBuf::from("img0.jpg"),
            caption: caption.to_string(),
            width_px: w,
            height_px: h,
        }
    }

    fn bullets(lines: usize, chars_per_line: usize) -> Vec<String> {
        (0..lines).map(|_| "x".repeat(chars_per_line)).collect()
    }

    #[test]
    fn test_layout_kind_follows_images() {
        let engine = LayoutEngine::new();
        let mut section = Section::new("History", "body");
        let (spec, _) = engine.plan(&section, vec!["a".to_string()], ImageSide::Left);
        assert_eq!(spec.layout, LayoutKind::TextOnly);

        section.add_image(image("", 800, 600));
        let (spec, _) = engine.plan(&section, vec!["a".to_string()], ImageSide::Left);
        assert_eq!(spec.layout, LayoutKind::TextPlusImage);
    }

    #[test]
    fn test_side_toggles_only_on_image_slides() {
        let engine = LayoutEngine::new();
        let text_only = Section::new("A", "body");
        let mut with_image = Section::new("B", "body");
        with_image.add_image(image("", 800, 600));

        let (_, side) = engine.plan(&text_only, vec![], ImageSide::Left);
        assert_eq!(side, ImageSide::Left);

        let (_, side) = engine.plan(&with_image, vec![], side);
        assert_eq!(side, ImageSide::Right);

        let (_, side) = engine.plan(&text_only, vec![], side);
        assert_eq!(side, ImageSide::Right);
    }

    #[test]
    fn test_font_short_text_few_lines() {
        // Under 400 chars (+2) and at most 5 lines (+2) on a 24pt base.
        let spec_bullets = bullets(4, 50);
        assert_eq!(body_font_pt(LayoutKind::TextOnly, &spec_bullets), 28);
    }

    #[test]
    fn test_font_long_text_many_lines() {
        // Over 700 chars (-4) and 8 lines (-1) on an 18pt base.
        let spec_bullets = bullets(8, 100);
        assert_eq!(body_font_pt(LayoutKind::TextPlusImage, &spec_bullets), 13);
    }

    #[test]
    fn test_font_adjustments_compose() {
        // 600 chars (-2) but only 5 lines (+2): passes partially cancel.
        let spec_bullets = bullets(5, 120);
        assert_eq!(body_font_pt(LayoutKind::TextOnly, &spec_bullets), 24);
    }

    #[test]
    fn test_font_mid_band_no_char_adjustment() {
        // 450 chars: no character adjustment, 6 lines: no line adjustment.
        let spec_bullets = bullets(6, 75);
        assert_eq!(body_font_pt(LayoutKind::TextOnly, &spec_bullets), 24);
    }

    #[test]
    fn test_single_image_centered_in_region() {
        let engine = LayoutEngine::new();
        let mut section = Section::new("A", "body");
        // 2:1 landscape: fits to 4.5 x 2.25 with 3.25 height slack.
        section.add_image(image("A caption", 1600, 800));

        let (spec, _) = engine.plan(&section, vec![], ImageSide::Right);
        assert_eq!(spec.images.len(), 1);
        let placed = &spec.images[0];
        assert!((placed.width_in - 4.5).abs() < 1e-9);
        assert!((placed.height_in - 2.25).abs() < 1e-9);
        assert!((placed.left_in - 5.0).abs() < 1e-9);
        assert!((placed.top_in - (1.5 + 3.25 / 2.0)).abs() < 1e-9);

        let caption = placed.caption.as_ref().unwrap();
        assert_eq!(caption.font_pt, 12);
        assert!((caption.top_in - (placed.top_in + 2.25 + 0.05)).abs() < 1e-9);
    }

    #[test]
    fn test_two_images_stack_in_sub_regions() {
        let engine = LayoutEngine::new();
        let mut section = Section::new("A", "body");
        section.add_image(image("first", 1000, 1000));
        section.add_image(image("second", 1000, 1000));

        let (spec, _) = engine.plan(&section, vec![], ImageSide::Left);
        assert_eq!(spec.images.len(), 2);

        for placed in &spec.images {
            assert!(placed.height_in <= 2.6 + 1e-9);
            assert_eq!(placed.caption.as_ref().unwrap().font_pt, 10);
        }
        // Second sub-region starts below the first plus the gap.
        assert!(spec.images[1].top_in >= 1.5 + 2.6 + 0.3 - 1e-9);
    }

    #[test]
    fn test_empty_caption_omitted() {
        let engine = LayoutEngine::new();
        let mut section = Section::new("A", "body");
        section.add_image(image("   ", 800, 600));
        let (spec, _) = engine.plan(&section, vec![], ImageSide::Left);
        assert!(spec.images[0].caption.is_none());
    }

    #[test]
    fn test_notes_capped() {
        let engine = LayoutEngine::new();
        let section = Section::new("A", "y".repeat(6000));
        let (spec, _) = engine.plan(&section, vec![], ImageSide::Left);
        assert_eq!(spec.notes.chars().count(), 5000);
    }
}
