//! Article segmentation.
//!
//! Splits fetched article HTML on second-level headings into an ordered
//! sequence of [`Section`]s, routing denylisted fragments (references,
//! see-also, galleries, ...) to the reference extractor. Within each kept
//! fragment it collects paragraph text, strips citation markers, and
//! extracts up to two qualifying embedded images with best-effort captions,
//! downloading each accepted image synchronously.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use unicode_normalization::UnicodeNormalization;
use url::Url;
use wikideck_core::{ImageRef, ReferenceList, Section};

use crate::fetch::ImageFetcher;
use crate::references::ReferenceCollector;

/// Bracketed citation markers like `[12]`, `[note 3]`, `[edit]`.
static CITATION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[[^\]]*\]").unwrap());

static H2_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h2").unwrap());
static P_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p").unwrap());
static IMG_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("img").unwrap());
static CAPTION_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("figcaption, .thumbcaption").unwrap());
static CONTENT_ROOT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.mw-parser-output").unwrap());
static BODY_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("body").unwrap());

/// Section titles excluded from the deck (normalized, lowercase, exact).
const TITLE_DENYLIST: &[&str] = &[
    "references",
    "see also",
    "external links",
    "gallery",
    "bibliography",
    "further reading",
    "notes",
    "citations",
    "sources",
    "works cited",
];

/// Denylisted titles whose fragments still carry citation lists worth
/// harvesting for the references slide.
const REFERENCE_TITLES: &[&str] = &[
    "references",
    "citations",
    "sources",
    "works cited",
    "bibliography",
    "notes",
    "further reading",
];

/// Decorative and iconographic assets never worth a slide.
const IMAGE_DENYLIST: &[&str] = &[
    "Question_book-new.svg",
    "Nuvola_apps_kaboodle.svg",
    "Ambox_current_red_Asia_Australia.svg",
    "Information_icon4.svg",
    "Climate_change_icon",
    "Symbol_list_class.svg",
    "Ambox_rewrite.svg",
    "Ambox_important.svg",
    "Wikipedia-logo",
    "Commons-logo",
    "Wiki_letter",
    "Padlock",
    "OOjs_UI_icon",
];

/// File extensions kept as-is when naming downloaded images.
const KNOWN_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "svg"];

/// The result of one segmentation pass.
#[derive(Debug)]
pub struct SegmentedArticle {
    /// Kept sections in document order.
    pub sections: Vec<Section>,

    /// Bounded citation summary from the excluded reference fragments.
    pub references: ReferenceList,
}

/// Segment article HTML into sections and a reference summary.
///
/// Accepted images are downloaded under `out_dir/<Section_Title>/` as a
/// side effect; download failures skip the image but never the section.
/// An article with no second-level headings degrades to an empty section
/// list rather than an error.
pub fn segment_article(
    html: &str,
    article_url: &Url,
    out_dir: &Path,
    fetcher: &dyn ImageFetcher,
) -> SegmentedArticle {
    let doc = Html::parse_document(html);
    let root = doc
        .select(&CONTENT_ROOT_SELECTOR)
        .next()
        .or_else(|| doc.select(&BODY_SELECTOR).next())
        .unwrap_or_else(|| doc.root_element());

    let fragments = split_fragments(root);
    if fragments.is_empty() {
        log::warn!("no second-level headings found; producing a minimal deck");
    }

    let mut sections = Vec::new();
    let mut collector = ReferenceCollector::new();

    for (title, elements) in fragments {
        if title.is_empty() {
            continue;
        }
        let lowered = title.to_lowercase();
        if TITLE_DENYLIST.contains(&lowered.as_str()) {
            if REFERENCE_TITLES.contains(&lowered.as_str()) {
                collector.collect_fragment(&elements);
            }
            log::debug!("excluded section '{}'", title);
            continue;
        }

        let body = paragraph_text(&elements);
        let mut section = Section::new(title, body);
        collect_images(&mut section, &elements, article_url, out_dir, fetcher);
        sections.push(section);
    }

    SegmentedArticle {
        sections,
        references: collector.finish(article_url.as_str()),
    }
}

/// Split the content root's children into (title, body elements) fragments
/// delimited by second-level headings. Content before the first heading
/// (the article lead) is dropped, matching one-slide-per-subtopic.
fn split_fragments(root: ElementRef) -> Vec<(String, Vec<ElementRef>)> {
    let mut fragments = Vec::new();
    let mut current: Option<(String, Vec<ElementRef>)> = None;

    for child in root.children().filter_map(ElementRef::wrap) {
        if let Some(heading) = second_level_heading(&child) {
            if let Some(done) = current.take() {
                fragments.push(done);
            }
            current = Some((clean_title(&heading), Vec::new()));
        } else if child.value().name() == "h1" {
            // A higher-level heading closes the open fragment.
            if let Some(done) = current.take() {
                fragments.push(done);
            }
        } else if let Some((_, elements)) = current.as_mut() {
            elements.push(child);
        }
    }

    if let Some(done) = current.take() {
        fragments.push(done);
    }
    fragments
}

/// Recognize a section boundary: either a bare `h2` or the wrapper div
/// Wikipedia emits (`<div class="mw-heading mw-heading2"><h2 ...>`).
fn second_level_heading<'a>(el: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    if el.value().name() == "h2" {
        return Some(*el);
    }
    if el.value().name() == "div" && has_class(el, "mw-heading2") {
        return el.select(&H2_SELECTOR).next();
    }
    None
}

fn has_class(el: &ElementRef, class: &str) -> bool {
    el.value()
        .attr("class")
        .map(|c| c.split_whitespace().any(|c| c == class))
        .unwrap_or(false)
}

/// Heading text with edit links and other bracketed artifacts stripped,
/// NFC-normalized and whitespace-collapsed.
fn clean_title(heading: &ElementRef) -> String {
    let raw: String = heading.text().collect();
    let stripped = CITATION_RE.replace_all(&raw, "");
    stripped
        .nfc()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Collect paragraph-level text across the fragment, citation markers
/// stripped, paragraphs joined with single spaces.
fn paragraph_text(elements: &[ElementRef]) -> String {
    let mut paragraphs = Vec::new();
    for el in elements {
        // A fragment child may itself be the paragraph; `select` only
        // visits descendants.
        let own = (el.value().name() == "p").then_some(*el);
        for p in own.into_iter().chain(el.select(&P_SELECTOR)) {
            let text: String = p.text().collect();
            let text = CITATION_RE.replace_all(&text, "");
            let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
            if !text.is_empty() {
                paragraphs.push(text);
            }
        }
    }
    paragraphs.join(" ")
}

/// Scan the fragment's images in document order, downloading up to two
/// accepted ones into the section's subdirectory.
fn collect_images(
    section: &mut Section,
    elements: &[ElementRef],
    article_url: &Url,
    out_dir: &Path,
    fetcher: &dyn ImageFetcher,
) {
    let section_dir = out_dir.join(directory_name(&section.title));
    let mut accepted = 0usize;

    'outer: for el in elements {
        let own = (el.value().name() == "img").then_some(*el);
        for img in own.into_iter().chain(el.select(&IMG_SELECTOR)) {
            if accepted >= wikideck_core::types::MAX_IMAGES_PER_SECTION {
                break 'outer;
            }

            let Some(src) = resolve_src(&img) else {
                continue;
            };
            let Some(link) = absolutize(&src, article_url) else {
                continue;
            };
            if denylisted_image(&link) {
                log::debug!("skipping decorative image {}", link);
                continue;
            }

            let caption = resolve_caption(&img);
            let ext = extension_for(&link);
            let dest = section_dir.join(format!("img{}{}", accepted, ext));

            if let Err(e) = std::fs::create_dir_all(&section_dir) {
                log::warn!("cannot create {}: {}", section_dir.display(), e);
                return;
            }

            match fetcher.download(&link, &dest) {
                Ok((width_px, height_px)) => {
                    log::debug!("saved {}", dest.display());
                    section.add_image(ImageRef {
                        local_path: dest,
                        caption,
                        width_px,
                        height_px,
                    });
                    accepted += 1;
                }
                Err(e) => {
                    log::warn!("failed to save {}: {}", link, e);
                }
            }
        }
    }
}

/// Filesystem-safe per-section directory name.
fn directory_name(title: &str) -> String {
    title.replace([' ', '/'], "_")
}

/// Resolve a usable source URL from the image element's attributes.
///
/// Prefers the direct `src`; falls back to lazy-loading and responsive
/// variants. A srcset-style list yields its last (densest) candidate with
/// the descriptor suffix stripped.
fn resolve_src(img: &ElementRef) -> Option<String> {
    let el = img.value();
    let raw = el
        .attr("src")
        .or_else(|| el.attr("data-src"))
        .or_else(|| el.attr("data-srcset"))
        .or_else(|| el.attr("srcset"))?;

    if raw.contains(',') && raw.contains(' ') {
        let last = raw.split(',').map(str::trim).filter(|s| !s.is_empty()).last()?;
        return last.split_whitespace().next().map(String::from);
    }

    Some(raw.to_string())
}

/// Normalize protocol-relative and root-relative URLs against the article.
fn absolutize(src: &str, article_url: &Url) -> Option<Url> {
    if let Some(rest) = src.strip_prefix("//") {
        return Url::parse(&format!("https://{}", rest)).ok();
    }
    if src.starts_with('/') {
        return article_url.join(src).ok();
    }
    if src.starts_with("http") {
        return Url::parse(src).ok();
    }
    None
}

/// Skip warning icons, wiki logos, padlocks, and math-formula renders.
fn denylisted_image(url: &Url) -> bool {
    if url.path().contains("/math/render/") {
        return true;
    }
    let filename = url.path().rsplit('/').next().unwrap_or("");
    IMAGE_DENYLIST.iter().any(|bad| filename.contains(bad))
}

/// Filename extension for the downloaded copy; unknown extensions default
/// to `.jpg` (the dominant case for scaled thumbnails).
fn extension_for(url: &Url) -> String {
    let ext = Path::new(url.path())
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());
    match ext {
        Some(e) if KNOWN_EXTENSIONS.contains(&e.as_str()) => format!(".{}", e),
        _ => ".jpg".to_string(),
    }
}

/// Best-effort caption resolution, in order: a caption element inside the
/// enclosing figure, the nearest following caption-like element, then the
/// image's own alt/title attribute.
fn resolve_caption(img: &ElementRef) -> String {
    if let Some(figure) = img
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|a| a.value().name() == "figure")
    {
        if let Some(cap) = figure.select(&CAPTION_SELECTOR).next() {
            let text = caption_text(&cap);
            if !text.is_empty() {
                return text;
            }
        }
    }

    if let Some(text) = following_caption(img) {
        if !text.is_empty() {
            return text;
        }
    }

    img.value()
        .attr("alt")
        .or_else(|| img.value().attr("title"))
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

/// Document-order search for the next caption-like element after `img`.
fn following_caption(img: &ElementRef) -> Option<String> {
    let mut node = **img;
    loop {
        while let Some(sibling) = node.next_sibling() {
            for descendant in sibling.descendants() {
                if let Some(el) = ElementRef::wrap(descendant) {
                    if el.value().name() == "figcaption" || has_class(&el, "thumbcaption") {
                        return Some(caption_text(&el));
                    }
                }
            }
            node = sibling;
        }
        node = node.parent()?;
    }
}

fn caption_text(el: &ElementRef) -> String {
    let raw: String = el.text().collect::<Vec<_>>().join(" ");
    let stripped = CITATION_RE.replace_all(&raw, "");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use wikideck_core::Result;

    /// Records requested URLs; pretends every download is an 800x600 image.
    struct StubFetcher {
        fail: bool,
    }

    impl ImageFetcher for StubFetcher {
        fn download(&self, url: &Url, _dest: &Path) -> Result<(u32, u32)> {
            if self.fail {
                return Err(wikideck_core::Error::FetchFailure {
                    url: url.to_string(),
                    reason: "stub failure".to_string(),
                });
            }
            Ok((800, 600))
        }
    }

    fn article_url() -> Url {
        Url::parse("https://en.wikipedia.org/wiki/Example").unwrap()
    }

    fn segment(html: &str, fetcher: &dyn ImageFetcher) -> SegmentedArticle {
        let dir = tempfile::tempdir().unwrap();
        segment_article(html, &article_url(), dir.path(), fetcher)
    }

    #[test]
    fn test_sections_split_on_h2() {
        let html = r#"<html><body>
            <p>Lead paragraph, not a section.</p>
            <h2>History</h2><p>Old things happened.</p>
            <h2>Geography</h2><p>It is somewhere.</p>
        </body></html>"#;

        let result = segment(html, &StubFetcher { fail: false });
        let titles: Vec<&str> = result.sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["History", "Geography"]);
        assert_eq!(result.sections[0].body_text, "Old things happened.");
    }

    #[test]
    fn test_mw_heading_wrapper_recognized() {
        let html = r#"<html><body><div class="mw-parser-output">
            <div class="mw-heading mw-heading2"><h2 id="History">History<span class="mw-editsection">[edit]</span></h2></div>
            <p>Body text.</p>
        </div></body></html>"#;

        let result = segment(html, &StubFetcher { fail: false });
        assert_eq!(result.sections.len(), 1);
        assert_eq!(result.sections[0].title, "History");
    }

    #[test]
    fn test_denylisted_titles_excluded_case_insensitively() {
        let html = r#"<html><body>
            <h2>Keep Me</h2><p>Content.</p>
            <h2>SEE ALSO</h2><p>Links.</p>
            <h2>References</h2><ol><li>An entry.</li></ol>
        </body></html>"#;

        let result = segment(html, &StubFetcher { fail: false });
        let titles: Vec<&str> = result.sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Keep Me"]);
    }

    #[test]
    fn test_denylist_is_exact_not_substring() {
        // A legitimate section merely containing a denylisted word stays.
        let html = r#"<html><body>
            <h2>Historical references in fiction</h2><p>Kept.</p>
        </body></html>"#;

        let result = segment(html, &StubFetcher { fail: false });
        assert_eq!(result.sections.len(), 1);
    }

    #[test]
    fn test_citation_markers_stripped() {
        let html = r#"<html><body>
            <h2>Science</h2><p>Water is wet.[1][note 2] It flows.[citation needed]</p>
        </body></html>"#;

        let result = segment(html, &StubFetcher { fail: false });
        assert_eq!(result.sections[0].body_text, "Water is wet. It flows.");
    }

    #[test]
    fn test_image_cap_and_decorative_skip() {
        let html = r#"<html><body>
            <h2>Fauna</h2>
            <img src="//upload.wikimedia.org/Question_book-new.svg.png">
            <img src="//upload.wikimedia.org/real1.jpg">
            <img src="//upload.wikimedia.org/real2.jpg">
            <img src="//upload.wikimedia.org/real3.jpg">
        </body></html>"#;

        let result = segment(html, &StubFetcher { fail: false });
        let section = &result.sections[0];
        assert_eq!(section.images.len(), 2);
        assert!(section.images[0]
            .local_path
            .to_string_lossy()
            .ends_with("Fauna/img0.jpg"));
        assert!(section.images[1]
            .local_path
            .to_string_lossy()
            .ends_with("Fauna/img1.jpg"));
    }

    #[test]
    fn test_download_failure_skips_image_not_section() {
        let html = r#"<html><body>
            <h2>Flora</h2><p>Plants.</p>
            <img src="//upload.wikimedia.org/a.jpg">
        </body></html>"#;

        let result = segment(html, &StubFetcher { fail: true });
        assert_eq!(result.sections.len(), 1);
        assert!(result.sections[0].images.is_empty());
    }

    #[test]
    fn test_srcset_takes_last_candidate() {
        let img_html = r#"<html><body><img srcset="//u.org/a.jpg 1.5x, //u.org/b.jpg 2x"></body></html>"#;
        let doc = Html::parse_document(img_html);
        let img = doc.select(&IMG_SELECTOR).next().unwrap();
        assert_eq!(resolve_src(&img).unwrap(), "//u.org/b.jpg");
    }

    #[test]
    fn test_absolutize_variants() {
        let base = article_url();
        assert_eq!(
            absolutize("//upload.wikimedia.org/x.jpg", &base).unwrap().as_str(),
            "https://upload.wikimedia.org/x.jpg"
        );
        assert_eq!(
            absolutize("/static/x.jpg", &base).unwrap().as_str(),
            "https://en.wikipedia.org/static/x.jpg"
        );
        assert_eq!(
            absolutize("https://a.example/x.jpg", &base).unwrap().as_str(),
            "https://a.example/x.jpg"
        );
        assert!(absolutize("data:image/png;base64,xyz", &base).is_none());
    }

    #[test]
    fn test_extension_default_jpg() {
        let url = Url::parse("https://u.org/thumb/photo.webp").unwrap();
        assert_eq!(extension_for(&url), ".jpg");
        let url = Url::parse("https://u.org/thumb/photo.PNG").unwrap();
        assert_eq!(extension_for(&url), ".png");
    }

    #[test]
    fn test_caption_from_enclosing_figure() {
        let html = r#"<html><body>
            <h2>Art</h2>
            <figure><img src="//u.org/a.jpg"><figcaption>A famous painting[3]</figcaption></figure>
        </body></html>"#;

        let result = segment(html, &StubFetcher { fail: false });
        assert_eq!(result.sections[0].images[0].caption, "A famous painting");
    }

    #[test]
    fn test_caption_from_following_element() {
        let html = r#"<html><body>
            <h2>Art</h2>
            <div><img src="//u.org/a.jpg"></div>
            <div class="thumbcaption">Nearby caption</div>
        </body></html>"#;

        let result = segment(html, &StubFetcher { fail: false });
        assert_eq!(result.sections[0].images[0].caption, "Nearby caption");
    }

    #[test]
    fn test_caption_falls_back_to_alt() {
        let html = r#"<html><body>
            <h2>Art</h2>
            <img src="//u.org/a.jpg" alt="Alt text here">
        </body></html>"#;

        let result = segment(html, &StubFetcher { fail: false });
        assert_eq!(result.sections[0].images[0].caption, "Alt text here");
    }

    #[test]
    fn test_no_headings_degrades_to_empty() {
        let html = "<html><body><p>Just a paragraph.</p></body></html>";
        let result = segment(html, &StubFetcher { fail: false });
        assert!(result.sections.is_empty());
    }

    #[test]
    fn test_end_to_end_synthetic_article() {
        // Five sections; one denylisted, one with three embedded images of
        // which two are decorative.
        let html = r#"<html><body>
            <h2>Alpha</h2><p>First body.</p>
            <h2>Beta</h2>
            <p>Second body.</p>
            <img src="//u.org/Ambox_important.svg.png">
            <img src="//u.org/photo.jpg">
            <img src="//u.org/Commons-logo.svg.png">
            <h2>See Also</h2><ul><li>Other article</li></ul>
            <h2>Gamma</h2><p>Third body.</p>
            <h2>Delta</h2><p>Fourth body.</p>
        </body></html>"#;

        let result = segment(html, &StubFetcher { fail: false });
        let titles: Vec<&str> = result.sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Alpha", "Beta", "Gamma", "Delta"]);
        assert_eq!(result.sections[1].images.len(), 1);
    }
}
