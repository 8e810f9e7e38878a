//! Tabular export: a single-sheet XLSX workbook with one label/value row per content line.

use std::collections::HashMap;
use std::fmt::Write as _;

use crate::record::ResumeFields;
use crate::render::content::canonical_lines;
use crate::render::package::{xml_escape, PackageWriter};
use crate::render::RenderError;

pub const SHEET_NAME: &str = "Resume";
const LABEL_COLUMN_WIDTH: u32 = 25;
const VALUE_COLUMN_WIDTH: u32 = 80;

// Indices into `cellXfs` in styles.xml.
const STYLE_LABEL: u32 = 1;
const STYLE_VALUE: u32 = 2;

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const NS_MAIN: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";

const CONTENT_TYPES: &str = r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/><Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/><Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK_RELS: &str = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/><Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/></Relationships>"#;

// Label cells: bold, light blue fill, thin border. Value cells: thin border.
// Both wrap and align top-left.
const STYLES: &str = r#"<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><fonts count="2"><font><sz val="11"/><name val="Calibri"/></font><font><b/><sz val="11"/><name val="Calibri"/></font></fonts><fills count="3"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill><fill><patternFill patternType="solid"><fgColor rgb="FFDCE6F1"/><bgColor rgb="FFDCE6F1"/></patternFill></fill></fills><borders count="2"><border><left/><right/><top/><bottom/><diagonal/></border><border><left style="thin"/><right style="thin"/><top style="thin"/><bottom style="thin"/><diagonal/></border></borders><cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs><cellXfs count="3"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/><xf numFmtId="0" fontId="1" fillId="2" borderId="1" xfId="0" applyFont="1" applyFill="1" applyBorder="1" applyAlignment="1"><alignment horizontal="left" vertical="top" wrapText="1"/></xf><xf numFmtId="0" fontId="0" fillId="0" borderId="1" xfId="0" applyBorder="1" applyAlignment="1"><alignment horizontal="left" vertical="top" wrapText="1"/></xf></cellXfs><cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles></styleSheet>"#;

/// Shared string table, indexed in first-use order.
#[derive(Default)]
struct SharedStrings {
    strings: Vec<String>,
    index: HashMap<String, usize>,
    references: usize,
}

impl SharedStrings {
    fn intern(&mut self, s: &str) -> usize {
        self.references += 1;
        if let Some(&idx) = self.index.get(s) {
            return idx;
        }
        let idx = self.strings.len();
        self.strings.push(s.to_string());
        self.index.insert(s.to_string(), idx);
        idx
    }

    fn to_xml(&self) -> String {
        let mut xml = format!(
            r#"{XML_DECL}<sst xmlns="{NS_MAIN}" count="{}" uniqueCount="{}">"#,
            self.references,
            self.strings.len()
        );
        for s in &self.strings {
            let _ = write!(xml, r#"<si><t xml:space="preserve">{}</t></si>"#, xml_escape(s));
        }
        xml.push_str("</sst>");
        xml
    }
}

pub fn render_xlsx(fields: &ResumeFields) -> Result<Vec<u8>, RenderError> {
    let mut strings = SharedStrings::default();
    let mut rows = String::new();

    for (i, line) in canonical_lines(fields).iter().enumerate() {
        let r = i + 1;
        let label_idx = strings.intern(line.label);
        let value_idx = strings.intern(&line.value);
        let _ = write!(
            rows,
            r#"<row r="{r}"><c r="A{r}" s="{STYLE_LABEL}" t="s"><v>{label_idx}</v></c><c r="B{r}" s="{STYLE_VALUE}" t="s"><v>{value_idx}</v></c></row>"#
        );
    }

    let sheet = format!(
        r#"{XML_DECL}<worksheet xmlns="{NS_MAIN}"><cols><col min="1" max="1" width="{LABEL_COLUMN_WIDTH}" customWidth="1"/><col min="2" max="2" width="{VALUE_COLUMN_WIDTH}" customWidth="1"/></cols><sheetData>{rows}</sheetData></worksheet>"#
    );
    let workbook = format!(
        r#"{XML_DECL}<workbook xmlns="{NS_MAIN}" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="{SHEET_NAME}" sheetId="1" r:id="rId1"/></sheets></workbook>"#
    );

    let mut pkg = PackageWriter::new();
    pkg.add("[Content_Types].xml", format!("{XML_DECL}{CONTENT_TYPES}").as_bytes())?;
    pkg.add("_rels/.rels", format!("{XML_DECL}{ROOT_RELS}").as_bytes())?;
    pkg.add("xl/workbook.xml", workbook.as_bytes())?;
    pkg.add("xl/_rels/workbook.xml.rels", format!("{XML_DECL}{WORKBOOK_RELS}").as_bytes())?;
    pkg.add("xl/styles.xml", format!("{XML_DECL}{STYLES}").as_bytes())?;
    pkg.add("xl/sharedStrings.xml", strings.to_xml().as_bytes())?;
    pkg.add("xl/worksheets/sheet1.xml", sheet.as_bytes())?;
    pkg.finish()
}
