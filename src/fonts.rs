use pdf_writer::{Name, Pdf, Ref};

use crate::model::FontId;

pub(crate) struct FontEntry {
    pub(crate) pdf_name: &'static str,
    pub(crate) base_font: &'static str,
    pub(crate) widths_1000: Vec<f32>,
}

impl FontEntry {
    pub(crate) fn char_width_1000(&self, ch: char) -> f32 {
        let byte = char_to_winansi(ch);
        if byte >= 32 {
            self.widths_1000[(byte - 32) as usize]
        } else {
            0.0
        }
    }

    pub(crate) fn word_width(&self, word: &str, font_size: f32) -> f32 {
        word.chars()
            .map(|ch| self.char_width_1000(ch) * font_size / 1000.0)
            .sum()
    }

    pub(crate) fn space_width(&self, font_size: f32) -> f32 {
        self.char_width_1000(' ') * font_size / 1000.0
    }
}

const ALL_FONTS: [FontId; 4] = [
    FontId::Serif,
    FontId::SerifBold,
    FontId::SerifItalic,
    FontId::SerifBoldItalic,
];

/// The four base-14 Times faces the report uses. No font files are embedded;
/// viewers resolve the base fonts themselves, and layout runs off the
/// approximate width tables below.
pub struct FontCatalog {
    serif: FontEntry,
    bold: FontEntry,
    italic: FontEntry,
    bold_italic: FontEntry,
}

impl FontCatalog {
    pub fn base14() -> Self {
        Self {
            serif: FontEntry {
                pdf_name: "F1",
                base_font: "Times-Roman",
                widths_1000: times_roman_widths(),
            },
            bold: FontEntry {
                pdf_name: "F2",
                base_font: "Times-Bold",
                widths_1000: times_bold_widths(),
            },
            italic: FontEntry {
                pdf_name: "F3",
                base_font: "Times-Italic",
                widths_1000: times_italic_widths(),
            },
            bold_italic: FontEntry {
                pdf_name: "F4",
                base_font: "Times-BoldItalic",
                widths_1000: times_bold_italic_widths(),
            },
        }
    }

    pub(crate) fn entry(&self, id: FontId) -> &FontEntry {
        match id {
            FontId::Serif => &self.serif,
            FontId::SerifBold => &self.bold,
            FontId::SerifItalic => &self.italic,
            FontId::SerifBoldItalic => &self.bold_italic,
        }
    }

    /// Rendered width of `s` in points. Used by wrapping, justification,
    /// centered/right-aligned text and dot leaders.
    pub fn text_width(&self, font: FontId, size: f32, s: &str) -> f32 {
        self.entry(font).word_width(s, size)
    }

    /// Write the four Type1 font dicts and return (resource name, ref) pairs
    /// for the shared per-page resource dictionary.
    pub(crate) fn register(
        &self,
        pdf: &mut Pdf,
        alloc: &mut impl FnMut() -> Ref,
    ) -> Vec<(&'static str, Ref)> {
        ALL_FONTS
            .iter()
            .map(|&id| {
                let entry = self.entry(id);
                let font_ref = alloc();
                pdf.type1_font(font_ref)
                    .base_font(Name(entry.base_font.as_bytes()))
                    .encoding_predefined(Name(b"WinAnsiEncoding"));
                (entry.pdf_name, font_ref)
            })
            .collect()
    }
}

/// Approximate Times-Roman widths at 1000 units/em for WinAnsi chars 32..=255.
fn times_roman_widths() -> Vec<f32> {
    (32u8..=255u8)
        .map(|b| match b {
            32 => 250.0,                    // space
            33..=47 => 333.0,               // punctuation
            48..=57 => 500.0,               // digits
            58..=64 => 444.0,               // more punctuation
            73 => 333.0,                    // I (narrow uppercase)
            74 => 389.0,                    // J
            77 => 889.0,                    // M (wide)
            87 => 944.0,                    // W
            65..=90 => 667.0,               // uppercase A-Z (average)
            91..=96 => 333.0,               // brackets etc.
            105 | 106 | 108 | 116 => 278.0, // narrow lowercase: i j l t
            102 | 114 => 333.0,             // f r
            109 => 778.0,                   // m (wide)
            119 => 722.0,                   // w
            97..=122 => 480.0,              // lowercase a-z (average)
            _ => 500.0,
        })
        .collect()
}

/// Approximate Times-Bold widths at 1000 units/em for WinAnsi chars 32..=255.
fn times_bold_widths() -> Vec<f32> {
    (32u8..=255u8)
        .map(|b| match b {
            32 => 250.0,
            33..=47 => 333.0,
            48..=57 => 500.0,
            58..=64 => 500.0,
            73 => 389.0,
            74 => 500.0,
            77 => 944.0,
            87 => 1000.0,
            65..=90 => 722.0,
            91..=96 => 333.0,
            105 | 106 | 108 | 116 => 278.0,
            102 | 114 => 389.0,
            109 => 833.0,
            119 => 722.0,
            97..=122 => 520.0,
            _ => 500.0,
        })
        .collect()
}

/// Approximate Times-Italic widths at 1000 units/em for WinAnsi chars 32..=255.
fn times_italic_widths() -> Vec<f32> {
    (32u8..=255u8)
        .map(|b| match b {
            32 => 250.0,
            33..=47 => 333.0,
            48..=57 => 500.0,
            58..=64 => 420.0,
            73 => 333.0,
            74 => 444.0,
            77 => 833.0,
            87 => 833.0,
            65..=90 => 611.0,
            91..=96 => 333.0,
            105 | 106 | 108 | 116 => 278.0,
            102 | 114 => 333.0,
            109 => 722.0,
            119 => 667.0,
            97..=122 => 460.0,
            _ => 500.0,
        })
        .collect()
}

/// Approximate Times-BoldItalic widths at 1000 units/em for WinAnsi chars 32..=255.
fn times_bold_italic_widths() -> Vec<f32> {
    (32u8..=255u8)
        .map(|b| match b {
            32 => 250.0,
            33..=47 => 333.0,
            48..=57 => 500.0,
            58..=64 => 444.0,
            73 => 389.0,
            74 => 500.0,
            77 => 889.0,
            87 => 889.0,
            65..=90 => 667.0,
            91..=96 => 333.0,
            105 | 106 | 108 | 116 => 278.0,
            102 | 114 => 333.0,
            109 => 778.0,
            119 => 667.0,
            97..=122 => 500.0,
            _ => 500.0,
        })
        .collect()
}

/// Map a single Unicode char to its WinAnsi byte, or 0 if unmappable.
fn char_to_winansi(c: char) -> u8 {
    match c as u32 {
        0x0020..=0x007F => c as u8,
        0x00A0..=0x00FF => c as u8,
        0x20AC => 0x80,
        0x201A => 0x82,
        0x0192 => 0x83,
        0x201E => 0x84,
        0x2026 => 0x85,
        0x2020 => 0x86,
        0x2021 => 0x87,
        0x02C6 => 0x88,
        0x2030 => 0x89,
        0x0160 => 0x8A,
        0x2039 => 0x8B,
        0x0152 => 0x8C,
        0x017D => 0x8E,
        0x2018 => 0x91,
        0x2019 => 0x92,
        0x201C => 0x93,
        0x201D => 0x94,
        0x2022 => 0x95, // bullet
        0x2013 => 0x96,
        0x2014 => 0x97,
        0x02DC => 0x98,
        0x2122 => 0x99,
        0x0161 => 0x9A,
        0x203A => 0x9B,
        0x0153 => 0x9C,
        0x017E => 0x9E,
        0x0178 => 0x9F,
        _ => 0,
    }
}

/// Convert a UTF-8 string to WinAnsi (Windows-1252) bytes for PDF Str encoding.
/// Unmappable chars are dropped.
pub(crate) fn to_winansi_bytes(s: &str) -> Vec<u8> {
    s.chars()
        .map(char_to_winansi)
        .filter(|&b| b != 0)
        .collect()
}
