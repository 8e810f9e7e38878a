//! Glyph widths and line wrapping for the PDF export.
//!
//! The standard Helvetica fonts are addressed through WinAnsiEncoding, so their width table
//! is indexed by WinAnsi byte (0x20..=0xFF). Widths are AFM widths / 1000 (em units).

/// Advance widths of a face in em units.
pub trait GlyphWidths {
    fn char_width(&self, c: char) -> f32;

    fn measure_str(&self, s: &str) -> f32 {
        s.chars().map(|c| self.char_width(c)).sum()
    }
}

/// WinAnsiEncoding byte for `c`, or `None` when the standard fonts cannot show it.
pub fn winansi_byte(c: char) -> Option<u8> {
    let byte = match c {
        ' '..='~' | '\u{a0}'..='\u{ff}' => c as u32 as u8,
        '\u{20ac}' => 0x80,
        '\u{201a}' => 0x82,
        '\u{0192}' => 0x83,
        '\u{201e}' => 0x84,
        '\u{2026}' => 0x85,
        '\u{2020}' => 0x86,
        '\u{2021}' => 0x87,
        '\u{02c6}' => 0x88,
        '\u{2030}' => 0x89,
        '\u{0160}' => 0x8a,
        '\u{2039}' => 0x8b,
        '\u{0152}' => 0x8c,
        '\u{017d}' => 0x8e,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201c}' => 0x93,
        '\u{201d}' => 0x94,
        '\u{2022}' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '\u{02dc}' => 0x98,
        '\u{2122}' => 0x99,
        '\u{0161}' => 0x9a,
        '\u{203a}' => 0x9b,
        '\u{0153}' => 0x9c,
        '\u{017e}' => 0x9e,
        '\u{0178}' => 0x9f,
        _ => return None,
    };
    Some(byte)
}

pub struct FontMetricTable {
    widths: [f32; 224],
    pub average_char_width: f32,
}

impl GlyphWidths for FontMetricTable {
    fn char_width(&self, c: char) -> f32 {
        match winansi_byte(c) {
            Some(byte) => self.widths[byte as usize - 0x20],
            None => self.average_char_width,
        }
    }
}

/// Greedy word-wrap of `s` into lines no wider than `max_width_pt` at `font_size_pt`.
///
/// Whitespace runs collapse to one space. A word wider than the line is cut into the longest
/// pieces that fit, each on its own line. Always returns at least one (possibly empty) line.
pub fn wrap(
    widths: &dyn GlyphWidths,
    s: &str,
    font_size_pt: f32,
    max_width_pt: f32,
) -> Vec<String> {
    let max_width = max_width_pt / font_size_pt;
    let space_width = widths.char_width(' ');
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0.0_f32;

    for word in s.split_whitespace() {
        for piece in split_overwide(widths, word, max_width) {
            let piece_w = widths.measure_str(&piece);
            if current.is_empty() {
                current = piece;
                current_width = piece_w;
            } else if current_width + space_width + piece_w > max_width {
                lines.push(std::mem::replace(&mut current, piece));
                current_width = piece_w;
            } else {
                current.push(' ');
                current.push_str(&piece);
                current_width += space_width + piece_w;
            }
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

fn split_overwide(widths: &dyn GlyphWidths, word: &str, max_width: f32) -> Vec<String> {
    if widths.measure_str(word) <= max_width {
        return vec![word.to_string()];
    }

    let mut pieces = Vec::new();
    let mut piece = String::new();
    let mut piece_width = 0.0_f32;
    for c in word.chars() {
        let w = widths.char_width(c);
        if !piece.is_empty() && piece_width + w > max_width {
            pieces.push(std::mem::take(&mut piece));
            piece_width = 0.0;
        }
        piece.push(c);
        piece_width += w;
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}

/// Helvetica (PDF standard font F1). Unassigned WinAnsi codes hold 0.
pub static HELVETICA: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // 0x20: sp ! " # $ % & ' ( ) * + , - . /
        0.278, 0.278, 0.355, 0.556, 0.556, 0.889, 0.667, 0.191, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0x30: 0-9 : ; < = > ?
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.278, 0.278, 0.584, 0.584, 0.584, 0.556,
        // 0x40: @ A-O
        1.015, 0.667, 0.667, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.500, 0.667, 0.556, 0.833, 0.722, 0.778,
        // 0x50: P-Z [ \ ] ^ _
        0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611, 0.278, 0.278, 0.278, 0.469, 0.556,
        // 0x60: ` a-o
        0.333, 0.556, 0.556, 0.500, 0.556, 0.556, 0.278, 0.556, 0.556, 0.222, 0.222, 0.500, 0.222, 0.833, 0.556, 0.556,
        // 0x70: p-z { | } ~ DEL
        0.556, 0.556, 0.333, 0.500, 0.278, 0.556, 0.500, 0.722, 0.500, 0.500, 0.500, 0.334, 0.260, 0.334, 0.584, 0.000,
        // 0x80: € - ‚ ƒ „ … † ‡ ˆ ‰ Š ‹ Œ - Ž -
        0.556, 0.000, 0.222, 0.556, 0.333, 1.000, 0.556, 0.556, 0.333, 1.000, 0.667, 0.333, 1.000, 0.000, 0.611, 0.000,
        // 0x90: - ‘ ’ “ ” • – — ˜ ™ š › œ - ž Ÿ
        0.000, 0.222, 0.222, 0.333, 0.333, 0.350, 0.556, 1.000, 0.333, 1.000, 0.500, 0.333, 0.944, 0.000, 0.500, 0.667,
        // 0xA0: nbsp ¡ ¢ £ ¤ ¥ ¦ § ¨ © ª « ¬ shy ® ¯
        0.278, 0.333, 0.556, 0.556, 0.556, 0.556, 0.260, 0.556, 0.333, 0.737, 0.370, 0.556, 0.584, 0.333, 0.737, 0.333,
        // 0xB0: ° ± ² ³ ´ µ ¶ · ¸ ¹ º » ¼ ½ ¾ ¿
        0.400, 0.584, 0.333, 0.333, 0.333, 0.556, 0.537, 0.278, 0.333, 0.333, 0.365, 0.556, 0.834, 0.834, 0.834, 0.611,
        // 0xC0: À Á Â Ã Ä Å Æ Ç È É Ê Ë Ì Í Î Ï
        0.667, 0.667, 0.667, 0.667, 0.667, 0.667, 1.000, 0.722, 0.667, 0.667, 0.667, 0.667, 0.278, 0.278, 0.278, 0.278,
        // 0xD0: Ð Ñ Ò Ó Ô Õ Ö × Ø Ù Ú Û Ü Ý Þ ß
        0.722, 0.722, 0.778, 0.778, 0.778, 0.778, 0.778, 0.584, 0.778, 0.722, 0.722, 0.722, 0.722, 0.667, 0.667, 0.611,
        // 0xE0: à á â ã ä å æ ç è é ê ë ì í î ï
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.889, 0.500, 0.556, 0.556, 0.556, 0.556, 0.278, 0.278, 0.278, 0.278,
        // 0xF0: ð ñ ò ó ô õ ö ÷ ø ù ú û ü ý þ ÿ
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.584, 0.611, 0.556, 0.556, 0.556, 0.556, 0.500, 0.556, 0.500,
    ],
    average_char_width: 0.556,
};
