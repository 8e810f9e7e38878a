//! Fixed-layout export on US letter pages.
//!
//! Text is drawn with the standard Helvetica fonts under WinAnsiEncoding. A run holding any
//! character outside that encoding is drawn with an embedded DejaVu Sans face instead
//! (Type0, Identity-H, with a ToUnicode map so the text stays extractable).
//!
//! Every drawn line is its own text object. A field puts its bold label at the left margin
//! and its word-wrapped value in the value column. Pages break per wrapped segment, so a long
//! value continues on the next page without repeating the label.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use tracing::warn;

use crate::record::ResumeFields;
use crate::render::content::canonical_blocks;
use crate::render::fonts::{UnicodeFace, Weight};
use crate::render::metrics::{winansi_byte, wrap, GlyphWidths, HELVETICA};
use crate::render::{RenderError, RenderOptions};

const PAGE_WIDTH: i64 = 612;
const PAGE_HEIGHT: i64 = 792;
const LEFT_MARGIN: i64 = 40;
const RIGHT_MARGIN: i64 = 40;
const VALUE_X: i64 = LEFT_MARGIN + 120;
const VALUE_WIDTH: i64 = PAGE_WIDTH - VALUE_X - RIGHT_MARGIN;
/// No baseline is drawn below this height.
pub(crate) const BOTTOM_MARGIN: i64 = 100;
const FIRST_PAGE_TOP: i64 = PAGE_HEIGHT - 60;
const NEXT_PAGE_TOP: i64 = PAGE_HEIGHT - 50;

const BODY_SIZE: i64 = 10;
const LINE_HEIGHT: i64 = 15;
const HEADING_SIZE: i64 = 12;
const HEADING_HEIGHT: i64 = 20;
const BRAND_SIZE: i64 = 16;
const SUBTITLE_SIZE: i64 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum FontKey {
    Standard(Weight),
    Embedded(Weight),
}

impl FontKey {
    /// Standard fonts when every character has a WinAnsi code, otherwise the embedded face.
    fn for_text(text: &str, weight: Weight) -> Self {
        if text.chars().all(|c| winansi_byte(c).is_some()) {
            FontKey::Standard(weight)
        } else {
            FontKey::Embedded(weight)
        }
    }

    fn resource_name(&self) -> &'static str {
        match self {
            FontKey::Standard(Weight::Regular) => "F1",
            FontKey::Standard(Weight::Bold) => "F2",
            FontKey::Embedded(Weight::Regular) => "F3",
            FontKey::Embedded(Weight::Bold) => "F4",
        }
    }

    fn widths(&self) -> Result<&'static dyn GlyphWidths, RenderError> {
        match self {
            FontKey::Standard(_) => Ok(&HELVETICA),
            FontKey::Embedded(weight) => Ok(UnicodeFace::load(*weight)?),
        }
    }
}

/// Accumulates page content operations and the fonts and glyphs they reference.
struct PageLayout {
    pages: Vec<Vec<Operation>>,
    current: Vec<Operation>,
    y: i64,
    fonts: BTreeSet<FontKey>,
    glyphs: BTreeMap<Weight, BTreeMap<u16, char>>,
    missing_glyphs: usize,
}

impl PageLayout {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            current: Vec::new(),
            y: FIRST_PAGE_TOP,
            fonts: BTreeSet::new(),
            glyphs: BTreeMap::new(),
            missing_glyphs: 0,
        }
    }

    fn new_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.current));
        self.y = NEXT_PAGE_TOP;
    }

    fn encode(&mut self, font: FontKey, text: &str) -> Result<Object, RenderError> {
        match font {
            FontKey::Standard(_) => Ok(Object::String(
                text.chars().filter_map(winansi_byte).collect(),
                StringFormat::Literal,
            )),
            FontKey::Embedded(weight) => {
                let face = UnicodeFace::load(weight)?;
                let used = self.glyphs.entry(weight).or_default();
                let mut bytes = Vec::with_capacity(text.len() * 2);
                for c in text.chars() {
                    let gid = match face.glyph(c) {
                        Some(gid) => {
                            used.entry(gid).or_insert(c);
                            gid
                        }
                        None => {
                            self.missing_glyphs += 1;
                            0
                        }
                    };
                    bytes.extend_from_slice(&gid.to_be_bytes());
                }
                Ok(Object::String(bytes, StringFormat::Hexadecimal))
            }
        }
    }

    /// Draws one run with its baseline at the cursor.
    fn draw(&mut self, font: FontKey, size: i64, x: i64, text: &str) -> Result<(), RenderError> {
        let string = self.encode(font, text)?;
        self.fonts.insert(font);
        self.current.extend([
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![font.resource_name().into(), Object::Integer(size)],
            ),
            Operation::new("Td", vec![Object::Integer(x), Object::Integer(self.y)]),
            Operation::new("Tj", vec![string]),
            Operation::new("ET", vec![]),
        ]);
        Ok(())
    }

    fn single_line(
        &mut self,
        weight: Weight,
        size: i64,
        text: &str,
        advance: i64,
    ) -> Result<(), RenderError> {
        self.draw(FontKey::for_text(text, weight), size, LEFT_MARGIN, text)?;
        self.y -= advance;
        Ok(())
    }

    /// Headings keep room for at least one field line below them.
    fn heading(&mut self, title: &str) -> Result<(), RenderError> {
        if self.y - HEADING_HEIGHT < BOTTOM_MARGIN {
            self.new_page();
        }
        self.single_line(Weight::Bold, HEADING_SIZE, title, HEADING_HEIGHT)
    }

    fn field(&mut self, label: &str, value: &str) -> Result<(), RenderError> {
        let value_font = FontKey::for_text(value, Weight::Regular);
        let segments = wrap(value_font.widths()?, value, BODY_SIZE as f32, VALUE_WIDTH as f32);

        for (i, segment) in segments.iter().enumerate() {
            if self.y < BOTTOM_MARGIN {
                self.new_page();
            }
            if i == 0 {
                let label = format!("{label}:");
                let label_font = FontKey::for_text(&label, Weight::Bold);
                self.draw(label_font, BODY_SIZE, LEFT_MARGIN, &label)?;
            }
            self.draw(value_font, BODY_SIZE, VALUE_X, segment)?;
            self.y -= LINE_HEIGHT;
        }
        Ok(())
    }
}

pub fn render_pdf(fields: &ResumeFields, options: &RenderOptions) -> Result<Vec<u8>, RenderError> {
    let mut layout = PageLayout::new();
    let brand = options.brand_name.split_whitespace().collect::<Vec<_>>().join(" ");
    layout.single_line(Weight::Bold, BRAND_SIZE, &brand, 20)?;
    layout.single_line(Weight::Regular, SUBTITLE_SIZE, "Resume Standardized", 30)?;

    for block in canonical_blocks(fields) {
        layout.heading(block.section.title())?;
        for line in &block.lines {
            layout.field(line.label, &line.value)?;
        }
    }

    if layout.missing_glyphs > 0 {
        warn!(
            missing = layout.missing_glyphs,
            "PDF export: characters without a glyph in the embedded font drawn as .notdef"
        );
    }
    assemble(layout)
}

fn standard_font(weight: Weight) -> Dictionary {
    let base = match weight {
        Weight::Regular => "Helvetica",
        Weight::Bold => "Helvetica-Bold",
    };
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base,
        "Encoding" => "WinAnsiEncoding",
    }
}

/// Adds a Type0 font over `face` with widths and a ToUnicode map for the `used` glyphs.
fn embed_font(doc: &mut Document, face: &UnicodeFace, used: &BTreeMap<u16, char>) -> ObjectId {
    let file_id = doc.add_object(Stream::new(
        dictionary! { "Length1" => Object::Integer(face.data.len() as i64) },
        face.data.to_vec(),
    ));

    let descriptor_id = doc.add_object(dictionary! {
        "Type" => "FontDescriptor",
        "FontName" => face.postscript_name,
        "Flags" => 32,
        "FontBBox" => face.bounding_box().map(Object::Integer).to_vec(),
        "ItalicAngle" => 0,
        "Ascent" => Object::Integer(face.ascent()),
        "Descent" => Object::Integer(face.descent()),
        "CapHeight" => Object::Integer(face.cap_height()),
        "StemV" => 80,
        "FontFile2" => file_id,
    });

    let widths: Vec<Object> = used
        .keys()
        .flat_map(|&gid| {
            [
                Object::Integer(i64::from(gid)),
                Object::Array(vec![Object::Integer(face.advance(gid))]),
            ]
        })
        .collect();

    let cid_font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "CIDFontType2",
        "BaseFont" => face.postscript_name,
        "CIDSystemInfo" => dictionary! {
            "Registry" => Object::string_literal("Adobe"),
            "Ordering" => Object::string_literal("Identity"),
            "Supplement" => 0,
        },
        "FontDescriptor" => descriptor_id,
        "DW" => Object::Integer(face.advance(0)),
        "W" => widths,
        "CIDToGIDMap" => "Identity",
    });

    let to_unicode_id =
        doc.add_object(Stream::new(dictionary! {}, to_unicode_cmap(used).into_bytes()));

    doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type0",
        "BaseFont" => face.postscript_name,
        "Encoding" => "Identity-H",
        "DescendantFonts" => vec![Object::Reference(cid_font_id)],
        "ToUnicode" => to_unicode_id,
    })
}

/// CMap from two-byte glyph ids back to UTF-16BE text.
fn to_unicode_cmap(used: &BTreeMap<u16, char>) -> String {
    let mut cmap = String::from(
        "/CIDInit /ProcSet findresource begin\n\
         12 dict begin\n\
         begincmap\n\
         /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
         /CMapName /Adobe-Identity-UCS def\n\
         /CMapType 2 def\n\
         1 begincodespacerange\n\
         <0000> <FFFF>\n\
         endcodespacerange\n",
    );

    let entries: Vec<(&u16, &char)> = used.iter().collect();
    // bfchar blocks are limited to 100 entries.
    for block in entries.chunks(100) {
        let _ = writeln!(cmap, "{} beginbfchar", block.len());
        for (gid, c) in block {
            let mut units = [0u16; 2];
            let hex: String = c
                .encode_utf16(&mut units)
                .iter()
                .map(|u| format!("{u:04X}"))
                .collect();
            let _ = writeln!(cmap, "<{gid:04X}> <{hex}>");
        }
        cmap.push_str("endbfchar\n");
    }

    cmap.push_str("endcmap\nCMapName currentdict /CMap defineresource pop\nend\nend\n");
    cmap
}

fn assemble(layout: PageLayout) -> Result<Vec<u8>, RenderError> {
    let PageLayout {
        mut pages,
        current,
        fonts,
        glyphs,
        ..
    } = layout;
    pages.push(current);

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut font_resources = Dictionary::new();
    for font in &fonts {
        let id = match *font {
            FontKey::Standard(weight) => doc.add_object(standard_font(weight)),
            FontKey::Embedded(weight) => {
                let used = glyphs.get(&weight).cloned().unwrap_or_default();
                embed_font(&mut doc, UnicodeFace::load(weight)?, &used)
            }
        };
        font_resources.set(font.resource_name(), id);
    }
    let resources_id = doc.add_object(dictionary! { "Font" => font_resources });

    let mut kids = Vec::with_capacity(pages.len());
    for operations in pages {
        let content = Content { operations }.encode()?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, content));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => Object::Integer(page_count),
            "Resources" => resources_id,
            "MediaBox" => [0, 0, PAGE_WIDTH, PAGE_HEIGHT].map(Object::Integer).to_vec(),
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::record::schema::ExperienceEntry;
    use crate::record::validation::tests::complete_fields;

    /// One drawn text run, decoded back to text.
    #[derive(Debug, Clone)]
    pub(crate) struct Run {
        pub font: String,
        pub x: f64,
        pub y: f64,
        pub text: String,
    }

    fn number(obj: &Object) -> f64 {
        match obj {
            Object::Integer(i) => *i as f64,
            Object::Real(r) => *r as f64,
            _ => f64::NAN,
        }
    }

    fn reverse_map(lookup: impl Fn(char) -> Option<u16>) -> HashMap<u16, char> {
        let mut map = HashMap::new();
        for c in (0x20u32..=0x2122).filter_map(char::from_u32) {
            if let Some(code) = lookup(c) {
                map.entry(code).or_insert(c);
            }
        }
        map
    }

    fn decode(font: &str, bytes: &[u8]) -> String {
        match font {
            "F1" | "F2" => {
                let table = reverse_map(|c| winansi_byte(c).map(u16::from));
                bytes.iter().map(|b| table[&u16::from(*b)]).collect()
            }
            _ => {
                let weight = if font == "F4" { Weight::Bold } else { Weight::Regular };
                let face = UnicodeFace::load(weight).unwrap();
                let table = reverse_map(|c| face.glyph(c));
                bytes
                    .chunks(2)
                    .map(|pair| table[&u16::from_be_bytes([pair[0], pair[1]])])
                    .collect()
            }
        }
    }

    /// Text runs of each page, in drawing order.
    pub(crate) fn page_runs(pdf: &[u8]) -> Vec<Vec<Run>> {
        let doc = Document::load_mem(pdf).unwrap();
        doc.get_pages()
            .into_values()
            .map(|page_id| {
                let content = doc.get_and_decode_page_content(page_id).unwrap();
                let (mut font, mut x, mut y) = (String::new(), 0.0, 0.0);
                let mut runs = Vec::new();
                for op in content.operations {
                    match op.operator.as_str() {
                        "Tf" => {
                            if let Object::Name(name) = &op.operands[0] {
                                font = String::from_utf8_lossy(name).into_owned();
                            }
                        }
                        "Td" => {
                            x = number(&op.operands[0]);
                            y = number(&op.operands[1]);
                        }
                        "Tj" => {
                            if let Object::String(bytes, _) = &op.operands[0] {
                                runs.push(Run {
                                    font: font.clone(),
                                    x,
                                    y,
                                    text: decode(&font, bytes),
                                });
                            }
                        }
                        _ => {}
                    }
                }
                runs
            })
            .collect()
    }

    /// (label, value) pairs: a label run opens a pair, value-column runs extend it.
    pub(crate) fn field_pairs(pdf: &[u8]) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = Vec::new();
        let mut open = false;
        for run in page_runs(pdf).into_iter().flatten() {
            if run.x == LEFT_MARGIN as f64 {
                open = match run.text.strip_suffix(':') {
                    Some(label) => {
                        pairs.push((label.to_string(), String::new()));
                        true
                    }
                    None => false,
                };
            } else if open {
                if let Some((_, value)) = pairs.last_mut() {
                    if !value.is_empty() {
                        value.push(' ');
                    }
                    value.push_str(&run.text);
                }
            }
        }
        pairs
    }

    fn options() -> RenderOptions {
        RenderOptions {
            brand_name: "TalentWise HR".into(),
        }
    }

    fn render(fields: &ResumeFields) -> Vec<u8> {
        render_pdf(fields, &options()).unwrap()
    }

    fn collapse(text: &str) -> String {
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_header_and_headings_drawn() {
        let pdf = render(&complete_fields());
        assert!(pdf.starts_with(b"%PDF-1.5"));
        let runs = page_runs(&pdf).remove(0);
        assert_eq!(runs[0].text, "TalentWise HR");
        assert_eq!(runs[0].font, "F2");
        assert_eq!(runs[1].text, "Resume Standardized");
        assert!(runs.iter().any(|r| r.text == "Current Compensation"));
    }

    #[test]
    fn test_long_values_wrap_into_segments() {
        let mut fields = complete_fields();
        let long = "Owned the payments platform end to end ".repeat(8);
        fields.experience[0].achievements = long.clone();
        let pdf = render(&fields);

        let value_runs = page_runs(&pdf)
            .into_iter()
            .flatten()
            .skip_while(|r| r.text != "Responsibilities:")
            .skip(1)
            .take_while(|r| r.x == VALUE_X as f64)
            .count();
        assert!(value_runs > 1);
        let (_, value) = field_pairs(&pdf)
            .into_iter()
            .find(|(label, _)| label == "Responsibilities")
            .unwrap();
        assert_eq!(value, collapse(&long));
    }

    #[test]
    fn test_many_entries_break_pages() {
        let mut fields = complete_fields();
        let entry = fields.experience[0].clone();
        fields.experience = vec![entry; 40];
        let pdf = render(&fields);
        assert!(page_runs(&pdf).len() > 1);
        assert_eq!(
            field_pairs(&pdf)
                .iter()
                .filter(|(label, _)| label == "Experience")
                .count(),
            40
        );
    }

    #[test]
    fn test_single_page_for_short_record() {
        let mut fields = complete_fields();
        fields.experience = vec![ExperienceEntry::default()];
        assert_eq!(page_runs(&render(&fields)).len(), 1);
    }

    #[test]
    fn test_value_taller_than_a_page_stays_above_bottom_margin() {
        let mut fields = complete_fields();
        let long = "Delivered quarterly roadmap milestones across regions ".repeat(160);
        fields.experience[0].achievements = long.clone();
        let pdf = render(&fields);

        let pages = page_runs(&pdf);
        assert!(pages.len() > 2);
        for run in pages.iter().flatten() {
            assert!(
                run.y >= BOTTOM_MARGIN as f64,
                "'{}' drawn at y={}",
                run.text,
                run.y
            );
        }
        // Continuation pages open in the value column, without a repeated label.
        assert_eq!(pages[1][0].x, VALUE_X as f64);
        assert_eq!(pages[1][0].y, NEXT_PAGE_TOP as f64);

        let (_, value) = field_pairs(&pdf)
            .into_iter()
            .find(|(label, _)| label == "Responsibilities")
            .unwrap();
        assert_eq!(value, collapse(&long));
    }

    #[test]
    fn test_overwide_word_stays_inside_value_column() {
        let mut fields = complete_fields();
        let url = format!("https://portfolio.example.com/{}", "projects".repeat(30));
        fields.personal.location = url.clone();
        let pdf = render(&fields);

        let runs: Vec<Run> = page_runs(&pdf)
            .into_iter()
            .flatten()
            .skip_while(|r| r.text != "Location:")
            .skip(1)
            .take_while(|r| r.x == VALUE_X as f64)
            .collect();
        assert!(runs.len() > 1);
        for run in &runs {
            let width = HELVETICA.measure_str(&run.text) * BODY_SIZE as f32;
            assert!(width <= VALUE_WIDTH as f32, "{} overflows", run.text);
        }
        assert_eq!(runs.iter().map(|r| r.text.as_str()).collect::<String>(), url);
    }

    #[test]
    fn test_cp1252_text_uses_standard_fonts() {
        let mut fields = complete_fields();
        fields.personal.full_name = "Zoë Müller".into();
        fields.experience[0].achievements = "Led 2019–2021 “core” migration €2M".into();
        let pdf = render(&fields);

        assert!(page_runs(&pdf)
            .iter()
            .flatten()
            .all(|r| r.font == "F1" || r.font == "F2"));
        let pairs = field_pairs(&pdf);
        assert!(pairs.contains(&("Full Name".into(), "Zoë Müller".into())));
        assert!(pairs.contains(&(
            "Responsibilities".into(),
            "Led 2019–2021 “core” migration €2M".into()
        )));
    }

    #[test]
    fn test_text_outside_winansi_uses_embedded_font() {
        let mut fields = complete_fields();
        fields.personal.full_name = "Łukasz Nowak".into();
        fields.personal.location = "Kraków, Şişli".into();
        let pdf = render_pdf(
            &fields,
            &RenderOptions {
                brand_name: "Gdańsk Talent".into(),
            },
        )
        .unwrap();

        let runs: Vec<Run> = page_runs(&pdf).into_iter().flatten().collect();
        assert_eq!(runs[0].font, "F4");
        assert_eq!(runs[0].text, "Gdańsk Talent");
        let name = runs.iter().find(|r| r.text == "Łukasz Nowak").unwrap();
        assert_eq!(name.font, "F3");

        let pairs = field_pairs(&pdf);
        assert!(pairs.contains(&("Location".into(), "Kraków, Şişli".into())));
    }

    #[test]
    fn test_embedded_font_only_when_needed() {
        let has_font_file = |pdf: &[u8]| {
            Document::load_mem(pdf).unwrap().objects.values().any(|obj| {
                obj.as_dict()
                    .map(|d| d.has(b"FontFile2"))
                    .unwrap_or(false)
            })
        };
        assert!(!has_font_file(&render(&complete_fields())));

        let mut fields = complete_fields();
        fields.personal.location = "İzmir".into();
        assert!(has_font_file(&render(&fields)));
    }

    #[test]
    fn test_to_unicode_maps_glyphs_to_utf16() {
        let used = BTreeMap::from([(36u16, 'A'), (0x01a2, 'Ł'), (0x0f00, '😀')]);
        let cmap = to_unicode_cmap(&used);
        assert!(cmap.contains("3 beginbfchar"));
        assert!(cmap.contains("<0024> <0041>"));
        assert!(cmap.contains("<01A2> <0141>"));
        assert!(cmap.contains("<0F00> <D83DDE00>"));
    }
}
