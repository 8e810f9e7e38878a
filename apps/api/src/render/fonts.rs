//! Bundled DejaVu Sans faces, embedded into PDF exports for text outside WinAnsiEncoding.

use std::sync::OnceLock;

use ttf_parser::{Face, FaceParsingError, GlyphId};

use crate::render::metrics::GlyphWidths;

static REGULAR_DATA: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");
static BOLD_DATA: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans-Bold.ttf");

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Weight {
    Regular,
    Bold,
}

pub struct UnicodeFace {
    pub postscript_name: &'static str,
    pub data: &'static [u8],
    face: Face<'static>,
}

type FaceCell = OnceLock<Result<UnicodeFace, FaceParsingError>>;

impl UnicodeFace {
    /// Parses the bundled face once per process.
    pub fn load(weight: Weight) -> Result<&'static UnicodeFace, FaceParsingError> {
        static REGULAR: FaceCell = OnceLock::new();
        static BOLD: FaceCell = OnceLock::new();

        let (cell, data, postscript_name) = match weight {
            Weight::Regular => (&REGULAR, REGULAR_DATA, "DejaVuSans"),
            Weight::Bold => (&BOLD, BOLD_DATA, "DejaVuSans-Bold"),
        };
        cell.get_or_init(|| {
            Face::parse(data, 0).map(|face| UnicodeFace {
                postscript_name,
                data,
                face,
            })
        })
        .as_ref()
        .map_err(|e| *e)
    }

    /// Glyph id for `c`, or `None` when the face has no glyph for it.
    pub fn glyph(&self, c: char) -> Option<u16> {
        self.face.glyph_index(c).map(|g| g.0)
    }

    fn to_milli(&self, units: i32) -> i64 {
        i64::from(units) * 1000 / i64::from(self.face.units_per_em())
    }

    /// Horizontal advance of `gid` in 1/1000 em.
    pub fn advance(&self, gid: u16) -> i64 {
        let units = self.face.glyph_hor_advance(GlyphId(gid)).unwrap_or(0);
        self.to_milli(i32::from(units))
    }

    pub fn ascent(&self) -> i64 {
        self.to_milli(i32::from(self.face.ascender()))
    }

    pub fn descent(&self) -> i64 {
        self.to_milli(i32::from(self.face.descender()))
    }

    pub fn cap_height(&self) -> i64 {
        let units = self.face.capital_height().unwrap_or(self.face.ascender());
        self.to_milli(i32::from(units))
    }

    /// `[x_min, y_min, x_max, y_max]` in 1/1000 em.
    pub fn bounding_box(&self) -> [i64; 4] {
        let b = self.face.global_bounding_box();
        [b.x_min, b.y_min, b.x_max, b.y_max].map(|v| self.to_milli(i32::from(v)))
    }
}

impl GlyphWidths for UnicodeFace {
    fn char_width(&self, c: char) -> f32 {
        self.advance(self.glyph(c).unwrap_or(0)) as f32 / 1000.0
    }
}
