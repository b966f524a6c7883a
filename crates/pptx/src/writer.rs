//! PPTX serialization.
//!
//! Persists an assembled [`Deck`] as a PowerPoint file: a ZIP archive of
//! OOXML parts. Static scaffolding (master, layout, theme) is emitted from
//! fixed templates; slide, notes, and relationship parts are generated per
//! deck. Downloaded section images are embedded under `ppt/media/` at the
//! inch offsets the layout engine computed.

use std::io::Write;
use std::path::{Path, PathBuf};

use quick_xml::events::{BytesDecl, BytesText, Event};
use quick_xml::Writer;
use zip::write::FileOptions;
use zip::ZipWriter;

use wikideck_core::{Deck, Error, ImageSide, PlacedImage, Result, Slide, SlideSpec};

const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";

/// English Metric Units per inch.
const EMU_PER_INCH: f64 = 914_400.0;

/// 10in x 7.5in slide surface.
const SLIDE_CX: i64 = 9_144_000;
const SLIDE_CY: i64 = 6_858_000;

/// Caption text-box height.
const CAPTION_HEIGHT_IN: f64 = 0.4;

fn emu(inches: f64) -> i64 {
    (inches * EMU_PER_INCH).round() as i64
}

/// `<out_dir>/<Topic> Powerpoint.pptx`, overwritten on rerun.
pub fn deck_filename(out_dir: &Path, topic: &str) -> PathBuf {
    out_dir.join(format!("{} Powerpoint.pptx", topic))
}

/// A relationship entry for a part's `.rels` file.
struct Rel {
    id: String,
    kind: &'static str,
    target: String,
    external: bool,
}

const REL_SLIDE_LAYOUT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
const REL_SLIDE_MASTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
const REL_NOTES_MASTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/notesMaster";
const REL_SLIDE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
const REL_NOTES_SLIDE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/notesSlide";
const REL_IMAGE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
const REL_THEME: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";
const REL_HYPERLINK: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink";
const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";

/// One text run inside a paragraph.
struct Run {
    text: String,
    /// Font size in hundredths of a point.
    sz: u32,
    bold: bool,
    italic: bool,
    hyperlink_rid: Option<String>,
}

impl Run {
    fn plain(text: impl Into<String>, pt: u32) -> Self {
        Self {
            text: text.into(),
            sz: pt * 100,
            bold: false,
            italic: false,
            hyperlink_rid: None,
        }
    }
}

/// One paragraph of a text box.
struct Para {
    runs: Vec<Run>,
    center: bool,
}

impl Para {
    fn plain(text: impl Into<String>, pt: u32) -> Self {
        Self {
            runs: vec![Run::plain(text, pt)],
            center: false,
        }
    }
}

/// Write the deck to `path`.
pub fn write_deck(deck: &Deck, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)?;
    let mut zip = ZipWriter::new(file);
    let options: FileOptions = FileOptions::default();

    let slide_count = deck.slides.len();
    let mut media: Vec<(String, PathBuf)> = Vec::new();
    let mut notes_indices: Vec<usize> = Vec::new();

    for (idx, slide) in deck.slides.iter().enumerate() {
        if let Slide::Content(spec) = slide {
            if !spec.notes.trim().is_empty() {
                notes_indices.push(idx + 1);
            }
        }
    }

    write_part(&mut zip, &options, "[Content_Types].xml", {
        content_types_xml(slide_count, &notes_indices).as_bytes()
    })?;
    write_part(&mut zip, &options, "_rels/.rels", {
        rels_xml(&[Rel {
            id: "rId1".to_string(),
            kind: REL_OFFICE_DOCUMENT,
            target: "ppt/presentation.xml".to_string(),
            external: false,
        }])
        .as_bytes()
    })?;

    write_part(
        &mut zip,
        &options,
        "ppt/presentation.xml",
        presentation_xml(slide_count).as_bytes(),
    )?;
    write_part(
        &mut zip,
        &options,
        "ppt/_rels/presentation.xml.rels",
        presentation_rels_xml(slide_count).as_bytes(),
    )?;

    write_part(&mut zip, &options, "ppt/slideMasters/slideMaster1.xml", SLIDE_MASTER_XML.as_bytes())?;
    write_part(
        &mut zip,
        &options,
        "ppt/slideMasters/_rels/slideMaster1.xml.rels",
        rels_xml(&[
            Rel {
                id: "rId1".to_string(),
                kind: REL_SLIDE_LAYOUT,
                target: "../slideLayouts/slideLayout1.xml".to_string(),
                external: false,
            },
            Rel {
                id: "rId2".to_string(),
                kind: REL_THEME,
                target: "../theme/theme1.xml".to_string(),
                external: false,
            },
        ])
        .as_bytes(),
    )?;
    write_part(&mut zip, &options, "ppt/slideLayouts/slideLayout1.xml", SLIDE_LAYOUT_XML.as_bytes())?;
    write_part(
        &mut zip,
        &options,
        "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
        rels_xml(&[Rel {
            id: "rId1".to_string(),
            kind: REL_SLIDE_MASTER,
            target: "../slideMasters/slideMaster1.xml".to_string(),
            external: false,
        }])
        .as_bytes(),
    )?;
    write_part(&mut zip, &options, "ppt/notesMasters/notesMaster1.xml", NOTES_MASTER_XML.as_bytes())?;
    write_part(
        &mut zip,
        &options,
        "ppt/notesMasters/_rels/notesMaster1.xml.rels",
        rels_xml(&[Rel {
            id: "rId1".to_string(),
            kind: REL_THEME,
            target: "../theme/theme1.xml".to_string(),
            external: false,
        }])
        .as_bytes(),
    )?;
    write_part(&mut zip, &options, "ppt/theme/theme1.xml", THEME_XML.as_bytes())?;

    for (idx, slide) in deck.slides.iter().enumerate() {
        let number = idx + 1;
        let mut rels = vec![Rel {
            id: "rId1".to_string(),
            kind: REL_SLIDE_LAYOUT,
            target: "../slideLayouts/slideLayout1.xml".to_string(),
            external: false,
        }];
        let mut next_rid = 2usize;

        // Image relationships and media registration.
        let mut image_rids: Vec<String> = Vec::new();
        if let Slide::Content(spec) = slide {
            for placed in &spec.images {
                let ext = placed
                    .path
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("jpg")
                    .to_lowercase();
                let name = format!("image{}.{}", media.len() + 1, ext);
                let rid = format!("rId{}", next_rid);
                next_rid += 1;
                rels.push(Rel {
                    id: rid.clone(),
                    kind: REL_IMAGE,
                    target: format!("../media/{}", name),
                    external: false,
                });
                image_rids.push(rid);
                media.push((name, placed.path.clone()));
            }
            if notes_indices.contains(&number) {
                rels.push(Rel {
                    id: format!("rId{}", next_rid),
                    kind: REL_NOTES_SLIDE,
                    target: format!("../notesSlides/notesSlide{}.xml", number),
                    external: false,
                });
                next_rid += 1;
            }
        }

        let mut hyperlink_rid = None;
        if let Slide::References { source_url, .. } = slide {
            let rid = format!("rId{}", next_rid);
            rels.push(Rel {
                id: rid.clone(),
                kind: REL_HYPERLINK,
                target: source_url.clone(),
                external: true,
            });
            hyperlink_rid = Some(rid);
        }

        let xml = slide_xml(slide, &image_rids, hyperlink_rid.as_deref())?;
        write_part(&mut zip, &options, &format!("ppt/slides/slide{}.xml", number), &xml)?;
        write_part(
            &mut zip,
            &options,
            &format!("ppt/slides/_rels/slide{}.xml.rels", number),
            rels_xml(&rels).as_bytes(),
        )?;
    }

    for &number in &notes_indices {
        let Slide::Content(spec) = &deck.slides[number - 1] else {
            continue;
        };
        let xml = notes_xml(&spec.notes)?;
        write_part(
            &mut zip,
            &options,
            &format!("ppt/notesSlides/notesSlide{}.xml", number),
            &xml,
        )?;
        write_part(
            &mut zip,
            &options,
            &format!("ppt/notesSlides/_rels/notesSlide{}.xml.rels", number),
            rels_xml(&[Rel {
                id: "rId1".to_string(),
                kind: REL_SLIDE,
                target: format!("../slides/slide{}.xml", number),
                external: false,
            }])
            .as_bytes(),
        )?;
    }

    for (name, source) in &media {
        let bytes = std::fs::read(source)?;
        write_part(&mut zip, &options, &format!("ppt/media/{}", name), &bytes)?;
    }

    zip.finish().map_err(|e| Error::ZipError(e.to_string()))?;
    log::debug!("wrote {} slides to {}", slide_count, path.display());
    Ok(())
}

fn write_part(
    zip: &mut ZipWriter<std::fs::File>,
    options: &FileOptions,
    name: &str,
    bytes: &[u8],
) -> Result<()> {
    zip.start_file(name, *options)
        .map_err(|e| Error::ZipError(format!("cannot start {}: {}", name, e)))?;
    zip.write_all(bytes)?;
    Ok(())
}

fn xml_escape(raw: &str) -> String {
    quick_xml::escape::escape(raw).into_owned()
}

fn rels_xml(rels: &[Rel]) -> String {
    let mut out = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
         <Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">",
    );
    for rel in rels {
        out.push_str(&format!(
            "<Relationship Id=\"{}\" Type=\"{}\" Target=\"{}\"{}/>",
            xml_escape(&rel.id),
            rel.kind,
            xml_escape(&rel.target),
            if rel.external {
                " TargetMode=\"External\""
            } else {
                ""
            }
        ));
    }
    out.push_str("</Relationships>");
    out
}

fn content_types_xml(slide_count: usize, notes_indices: &[usize]) -> String {
    let mut out = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
         <Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
         <Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\
         <Default Extension=\"xml\" ContentType=\"application/xml\"/>\
         <Default Extension=\"jpg\" ContentType=\"image/jpeg\"/>\
         <Default Extension=\"jpeg\" ContentType=\"image/jpeg\"/>\
         <Default Extension=\"png\" ContentType=\"image/png\"/>\
         <Default Extension=\"gif\" ContentType=\"image/gif\"/>\
         <Override PartName=\"/ppt/presentation.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml\"/>\
         <Override PartName=\"/ppt/slideMasters/slideMaster1.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml\"/>\
         <Override PartName=\"/ppt/notesMasters/notesMaster1.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.notesMaster+xml\"/>\
         <Override PartName=\"/ppt/slideLayouts/slideLayout1.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml\"/>\
         <Override PartName=\"/ppt/theme/theme1.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.theme+xml\"/>",
    );
    for number in 1..=slide_count {
        out.push_str(&format!(
            "<Override PartName=\"/ppt/slides/slide{}.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.slide+xml\"/>",
            number
        ));
    }
    for number in notes_indices {
        out.push_str(&format!(
            "<Override PartName=\"/ppt/notesSlides/notesSlide{}.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.notesSlide+xml\"/>",
            number
        ));
    }
    out.push_str("</Types>");
    out
}

fn presentation_xml(slide_count: usize) -> String {
    let mut out = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
         <p:presentation xmlns:a=\"{a}\" xmlns:r=\"{r}\" xmlns:p=\"{p}\">\
         <p:sldMasterIdLst><p:sldMasterId id=\"2147483648\" r:id=\"rId1\"/></p:sldMasterIdLst>\
         <p:notesMasterIdLst><p:notesMasterId r:id=\"rId2\"/></p:notesMasterIdLst>\
         <p:sldIdLst>",
        a = NS_A,
        r = NS_R,
        p = NS_P
    );
    for number in 1..=slide_count {
        out.push_str(&format!(
            "<p:sldId id=\"{}\" r:id=\"rId{}\"/>",
            255 + number,
            2 + number
        ));
    }
    out.push_str(&format!(
        "</p:sldIdLst><p:sldSz cx=\"{}\" cy=\"{}\"/><p:notesSz cx=\"{}\" cy=\"{}\"/></p:presentation>",
        SLIDE_CX, SLIDE_CY, SLIDE_CY, SLIDE_CX
    ));
    out
}

fn presentation_rels_xml(slide_count: usize) -> String {
    let mut rels = vec![
        Rel {
            id: "rId1".to_string(),
            kind: REL_SLIDE_MASTER,
            target: "slideMasters/slideMaster1.xml".to_string(),
            external: false,
        },
        Rel {
            id: "rId2".to_string(),
            kind: REL_NOTES_MASTER,
            target: "notesMasters/notesMaster1.xml".to_string(),
            external: false,
        },
    ];
    for number in 1..=slide_count {
        rels.push(Rel {
            id: format!("rId{}", 2 + number),
            kind: REL_SLIDE,
            target: format!("slides/slide{}.xml", number),
            external: false,
        });
    }
    rels_xml(&rels)
}

type Xml<'a> = &'a mut Writer<Vec<u8>>;

/// Generate one slide part.
fn slide_xml(slide: &Slide, image_rids: &[String], hyperlink_rid: Option<&str>) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Vec::new());
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
        .map_err(|e| Error::XmlError(e.to_string()))?;

    writer
        .create_element("p:sld")
        .with_attributes([("xmlns:a", NS_A), ("xmlns:r", NS_R), ("xmlns:p", NS_P)])
        .write_inner_content::<_, quick_xml::Error>(|w| {
            w.create_element("p:cSld").write_inner_content::<_, quick_xml::Error>(|w| {
                w.create_element("p:spTree").write_inner_content::<_, quick_xml::Error>(|w| {
                    write_group_header(w)?;
                    let mut shape_id = 2u32;
                    match slide {
                        Slide::Title { title, subtitle } => {
                            write_textbox(
                                w,
                                &mut shape_id,
                                "Title",
                                (0.5, 2.5, 9.0, 1.5),
                                &[Para {
                                    runs: vec![Run {
                                        text: title.clone(),
                                        sz: 4400,
                                        bold: true,
                                        italic: false,
                                        hyperlink_rid: None,
                                    }],
                                    center: true,
                                }],
                            )?;
                            if !subtitle.is_empty() {
                                write_textbox(
                                    w,
                                    &mut shape_id,
                                    "Subtitle",
                                    (0.5, 4.2, 9.0, 1.0),
                                    &[Para {
                                        runs: vec![Run::plain(subtitle.clone(), 20)],
                                        center: true,
                                    }],
                                )?;
                            }
                        }
                        Slide::Content(spec) => {
                            write_content_shapes(w, &mut shape_id, spec, image_rids)?;
                        }
                        Slide::References { source_url, body } => {
                            write_textbox(
                                w,
                                &mut shape_id,
                                "Title",
                                (0.5, 0.3, 9.0, 1.0),
                                &[Para {
                                    runs: vec![Run {
                                        text: "References".to_string(),
                                        sz: 3200,
                                        bold: true,
                                        italic: false,
                                        hyperlink_rid: None,
                                    }],
                                    center: false,
                                }],
                            )?;
                            let mut paras = vec![Para {
                                runs: vec![Run {
                                    text: source_url.clone(),
                                    sz: 1400,
                                    bold: false,
                                    italic: false,
                                    hyperlink_rid: hyperlink_rid.map(String::from),
                                }],
                                center: false,
                            }];
                            for line in body.lines() {
                                paras.push(Para::plain(line.to_string(), 12));
                            }
                            write_textbox(w, &mut shape_id, "Body", (0.5, 1.5, 9.0, 5.5), &paras)?;
                        }
                    }
                    Ok(())
                })?;
                Ok(())
            })?;
            w.create_element("p:clrMapOvr").write_inner_content::<_, quick_xml::Error>(|w| {
                w.create_element("a:masterClrMapping").write_empty()?;
                Ok(())
            })?;
            Ok(())
        })
        .map_err(|e| Error::XmlError(e.to_string()))?;

    Ok(writer.into_inner())
}

/// Title, body text on one half, pictures and captions on the other.
fn write_content_shapes(
    w: Xml,
    shape_id: &mut u32,
    spec: &SlideSpec,
    image_rids: &[String],
) -> quick_xml::Result<()> {
    write_textbox(
        w,
        shape_id,
        "Title",
        (0.5, 0.3, 9.0, 1.0),
        &[Para {
            runs: vec![Run {
                text: spec.title.clone(),
                sz: 3200,
                bold: true,
                italic: false,
                hyperlink_rid: None,
            }],
            center: false,
        }],
    )?;

    let body_region = if spec.images.is_empty() {
        (0.5, 1.5, 9.0, 5.5)
    } else {
        // The body claims the half the pictures do not.
        match spec.image_side {
            ImageSide::Left => (5.0, 1.5, 4.5, 5.5),
            ImageSide::Right => (0.5, 1.5, 4.5, 5.5),
        }
    };

    let paras: Vec<Para> = spec
        .bullets
        .iter()
        .map(|line| Para::plain(line.clone(), spec.font_pt))
        .collect();
    write_textbox(w, shape_id, "Body", body_region, &paras)?;

    for (placed, rid) in spec.images.iter().zip(image_rids) {
        write_picture(w, shape_id, rid, placed)?;
        if let Some(caption) = &placed.caption {
            write_textbox(
                w,
                shape_id,
                "Caption",
                (
                    caption.left_in,
                    caption.top_in,
                    caption.width_in,
                    CAPTION_HEIGHT_IN,
                ),
                &[Para {
                    runs: vec![Run {
                        text: caption.text.clone(),
                        sz: caption.font_pt * 100,
                        bold: false,
                        italic: true,
                        hyperlink_rid: None,
                    }],
                    center: true,
                }],
            )?;
        }
    }
    Ok(())
}

/// The fixed `nvGrpSpPr`/`grpSpPr` header every shape tree starts with.
fn write_group_header(w: Xml) -> quick_xml::Result<()> {
    w.create_element("p:nvGrpSpPr").write_inner_content::<_, quick_xml::Error>(|w| {
        w.create_element("p:cNvPr")
            .with_attributes([("id", "1"), ("name", "")])
            .write_empty()?;
        w.create_element("p:cNvGrpSpPr").write_empty()?;
        w.create_element("p:nvPr").write_empty()?;
        Ok(())
    })?;
    w.create_element("p:grpSpPr").write_inner_content::<_, quick_xml::Error>(|w| {
        w.create_element("a:xfrm").write_inner_content::<_, quick_xml::Error>(|w| {
            w.create_element("a:off")
                .with_attributes([("x", "0"), ("y", "0")])
                .write_empty()?;
            w.create_element("a:ext")
                .with_attributes([("cx", "0"), ("cy", "0")])
                .write_empty()?;
            w.create_element("a:chOff")
                .with_attributes([("x", "0"), ("y", "0")])
                .write_empty()?;
            w.create_element("a:chExt")
                .with_attributes([("cx", "0"), ("cy", "0")])
                .write_empty()?;
            Ok(())
        })?;
        Ok(())
    })?;
    Ok(())
}

fn write_textbox(
    w: Xml,
    shape_id: &mut u32,
    name: &str,
    region: (f64, f64, f64, f64),
    paras: &[Para],
) -> quick_xml::Result<()> {
    let id = shape_id.to_string();
    *shape_id += 1;
    let (x, y, cx, cy) = region;
    let (x, y, cx, cy) = (
        emu(x).to_string(),
        emu(y).to_string(),
        emu(cx).to_string(),
        emu(cy).to_string(),
    );

    w.create_element("p:sp").write_inner_content::<_, quick_xml::Error>(|w| {
        w.create_element("p:nvSpPr").write_inner_content::<_, quick_xml::Error>(|w| {
            w.create_element("p:cNvPr")
                .with_attributes([("id", id.as_str()), ("name", name)])
                .write_empty()?;
            w.create_element("p:cNvSpPr")
                .with_attributes([("txBox", "1")])
                .write_empty()?;
            w.create_element("p:nvPr").write_empty()?;
            Ok(())
        })?;
        w.create_element("p:spPr").write_inner_content::<_, quick_xml::Error>(|w| {
            w.create_element("a:xfrm").write_inner_content::<_, quick_xml::Error>(|w| {
                w.create_element("a:off")
                    .with_attributes([("x", x.as_str()), ("y", y.as_str())])
                    .write_empty()?;
                w.create_element("a:ext")
                    .with_attributes([("cx", cx.as_str()), ("cy", cy.as_str())])
                    .write_empty()?;
                Ok(())
            })?;
            w.create_element("a:prstGeom")
                .with_attributes([("prst", "rect")])
                .write_inner_content::<_, quick_xml::Error>(|w| {
                    w.create_element("a:avLst").write_empty()?;
                    Ok(())
                })?;
            Ok(())
        })?;
        w.create_element("p:txBody").write_inner_content::<_, quick_xml::Error>(|w| {
            w.create_element("a:bodyPr")
                .with_attributes([("wrap", "square")])
                .write_empty()?;
            w.create_element("a:lstStyle").write_empty()?;
            for para in paras {
                write_paragraph(w, para)?;
            }
            Ok(())
        })?;
        Ok(())
    })?;
    Ok(())
}

fn write_paragraph(w: Xml, para: &Para) -> quick_xml::Result<()> {
    w.create_element("a:p").write_inner_content::<_, quick_xml::Error>(|w| {
        if para.center {
            w.create_element("a:pPr")
                .with_attributes([("algn", "ctr")])
                .write_empty()?;
        }
        for run in &para.runs {
            w.create_element("a:r").write_inner_content::<_, quick_xml::Error>(|w| {
                let sz = run.sz.to_string();
                let mut attrs: Vec<(&str, &str)> = vec![("lang", "en-US"), ("sz", sz.as_str())];
                if run.bold {
                    attrs.push(("b", "1"));
                }
                if run.italic {
                    attrs.push(("i", "1"));
                }
                let rpr = w.create_element("a:rPr").with_attributes(attrs);
                match &run.hyperlink_rid {
                    Some(rid) => {
                        rpr.write_inner_content::<_, quick_xml::Error>(|w| {
                            w.create_element("a:hlinkClick")
                                .with_attributes([("xmlns:r", NS_R), ("r:id", rid.as_str())])
                                .write_empty()?;
                            Ok(())
                        })?;
                    }
                    None => {
                        rpr.write_empty()?;
                    }
                }
                w.create_element("a:t")
                    .write_text_content(BytesText::new(&run.text))?;
                Ok(())
            })?;
        }
        Ok(())
    })?;
    Ok(())
}

fn write_picture(
    w: Xml,
    shape_id: &mut u32,
    rid: &str,
    placed: &PlacedImage,
) -> quick_xml::Result<()> {
    let id = shape_id.to_string();
    *shape_id += 1;
    let name = format!("Picture {}", id);
    let (x, y, cx, cy) = (
        emu(placed.left_in).to_string(),
        emu(placed.top_in).to_string(),
        emu(placed.width_in).to_string(),
        emu(placed.height_in).to_string(),
    );

    w.create_element("p:pic").write_inner_content::<_, quick_xml::Error>(|w| {
        w.create_element("p:nvPicPr").write_inner_content::<_, quick_xml::Error>(|w| {
            w.create_element("p:cNvPr")
                .with_attributes([("id", id.as_str()), ("name", name.as_str())])
                .write_empty()?;
            w.create_element("p:cNvPicPr").write_empty()?;
            w.create_element("p:nvPr").write_empty()?;
            Ok(())
        })?;
        w.create_element("p:blipFill").write_inner_content::<_, quick_xml::Error>(|w| {
            w.create_element("a:blip")
                .with_attributes([("xmlns:r", NS_R), ("r:embed", rid)])
                .write_empty()?;
            w.create_element("a:stretch").write_inner_content::<_, quick_xml::Error>(|w| {
                w.create_element("a:fillRect").write_empty()?;
                Ok(())
            })?;
            Ok(())
        })?;
        w.create_element("p:spPr").write_inner_content::<_, quick_xml::Error>(|w| {
            w.create_element("a:xfrm").write_inner_content::<_, quick_xml::Error>(|w| {
                w.create_element("a:off")
                    .with_attributes([("x", x.as_str()), ("y", y.as_str())])
                    .write_empty()?;
                w.create_element("a:ext")
                    .with_attributes([("cx", cx.as_str()), ("cy", cy.as_str())])
                    .write_empty()?;
                Ok(())
            })?;
            w.create_element("a:prstGeom")
                .with_attributes([("prst", "rect")])
                .write_inner_content::<_, quick_xml::Error>(|w| {
                    w.create_element("a:avLst").write_empty()?;
                    Ok(())
                })?;
            Ok(())
        })?;
        Ok(())
    })?;
    Ok(())
}

/// Generate one notes part holding the off-screen speaker notes.
fn notes_xml(notes: &str) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Vec::new());
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
        .map_err(|e| Error::XmlError(e.to_string()))?;

    writer
        .create_element("p:notes")
        .with_attributes([("xmlns:a", NS_A), ("xmlns:r", NS_R), ("xmlns:p", NS_P)])
        .write_inner_content::<_, quick_xml::Error>(|w| {
            w.create_element("p:cSld").write_inner_content::<_, quick_xml::Error>(|w| {
                w.create_element("p:spTree").write_inner_content::<_, quick_xml::Error>(|w| {
                    write_group_header(w)?;
                    let mut shape_id = 2u32;
                    write_textbox(
                        w,
                        &mut shape_id,
                        "Notes",
                        (0.5, 0.5, 6.5, 9.0),
                        &[Para::plain(notes.to_string(), 12)],
                    )?;
                    Ok(())
                })?;
                Ok(())
            })?;
            w.create_element("p:clrMapOvr").write_inner_content::<_, quick_xml::Error>(|w| {
                w.create_element("a:masterClrMapping").write_empty()?;
                Ok(())
            })?;
            Ok(())
        })
        .map_err(|e| Error::XmlError(e.to_string()))?;

    Ok(writer.into_inner())
}

const SLIDE_MASTER_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldMaster xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr></p:spTree></p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/><p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst></p:sldMaster>"#;

const SLIDE_LAYOUT_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldLayout xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" type="blank"><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr></p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#;

const NOTES_MASTER_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:notesMaster xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr></p:spTree></p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/></p:notesMaster>"#;

const THEME_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Office"><a:themeElements><a:clrScheme name="Office"><a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1><a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1><a:dk2><a:srgbClr val="44546A"/></a:dk2><a:lt2><a:srgbClr val="E7E6E6"/></a:lt2><a:accent1><a:srgbClr val="4472C4"/></a:accent1><a:accent2><a:srgbClr val="ED7D31"/></a:accent2><a:accent3><a:srgbClr val="A5A5A5"/></a:accent3><a:accent4><a:srgbClr val="FFC000"/></a:accent4><a:accent5><a:srgbClr val="5B9BD5"/></a:accent5><a:accent6><a:srgbClr val="70AD47"/></a:accent6><a:hlink><a:srgbClr val="0563C1"/></a:hlink><a:folHlink><a:srgbClr val="954F72"/></a:folHlink></a:clrScheme><a:fontScheme name="Office"><a:majorFont><a:latin typeface="Calibri Light"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont><a:minorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont></a:fontScheme><a:fmtScheme name="Office"><a:fillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:fillStyleLst><a:lnStyleLst><a:ln w="6350"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="12700"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="19050"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln></a:lnStyleLst><a:effectStyleLst><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle></a:effectStyleLst><a:bgFillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:bgFillStyleLst></a:fmtScheme></a:themeElements></a:theme>"#;
