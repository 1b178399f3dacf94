use super::canvas::{Canvas, PageSet, PageStyle};
use crate::fonts::FontCatalog;
use crate::model::{FontId, Rgb, TextStyle, TocEntry};

const TOC_TITLE: &str = "Table of Contents";
const TITLE_DROP: f32 = 100.0;
const FIRST_ENTRY_DROP: f32 = 150.0;
const ENTRY_STEP: f32 = 20.0;
const ENTRY_INDENT: f32 = 20.0;
const SUB_INDENT: f32 = 20.0;
const ENTRY_SIZE: f32 = 12.0;

const BLACK: Rgb = [0, 0, 0];

/// Append-only side channel filled during the body pass.
#[derive(Default)]
pub struct TocRecorder {
    entries: Vec<TocEntry>,
}

impl TocRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// `page` is the body page number at the time the heading was drawn,
    /// page 1 being the cover.
    pub fn record(&mut self, title: &str, page: usize, indent: bool) {
        self.entries.push(TocEntry {
            title: title.to_string(),
            page,
            indent,
        });
    }

    pub fn entries(&self) -> &[TocEntry] {
        &self.entries
    }
}

fn entries_per_page(style: &PageStyle) -> usize {
    let span = (style.page_height - FIRST_ENTRY_DROP) - style.footer_margin;
    (span / ENTRY_STEP).floor() as usize + 1
}

/// Number of pages the rendered TOC will occupy. A pure function of the
/// entry count and page geometry, which is what lets the final page numbers
/// be computed before the TOC itself is drawn.
pub fn toc_page_count(entries: &[TocEntry], style: &PageStyle) -> usize {
    entries.len().div_ceil(entries_per_page(style)).max(1)
}

/// Final page number of a heading in the assembled document: the cover keeps
/// page 1, the TOC occupies the next `toc_pages`, and body content follows.
pub fn assembled_page(recorded: usize, toc_pages: usize) -> usize {
    1 + toc_pages + (recorded - 1)
}

/// Second pass: draw the TOC onto its own page set. Every TOC page gets the
/// title redrawn; entries paginate purely by vertical exhaustion.
pub fn render_toc(
    entries: &[TocEntry],
    style: &PageStyle,
    fonts: &FontCatalog,
    accent: Rgb,
) -> PageSet {
    let mut toc_style = style.clone();
    toc_style.chrome = None;

    let toc_pages = toc_page_count(entries, style);
    let per_page = entries_per_page(style);
    let mut canvas = Canvas::new(toc_style, fonts);

    for page_idx in 0..toc_pages {
        if page_idx > 0 {
            canvas.break_page();
        }
        draw_title(&mut canvas, accent);
        let chunk = entries
            .iter()
            .skip(page_idx * per_page)
            .take(per_page);
        let mut y = canvas.style().page_height - FIRST_ENTRY_DROP;
        for entry in chunk {
            draw_entry(&mut canvas, entry, y, toc_pages);
            y -= ENTRY_STEP;
        }
    }

    canvas.finish()
}

fn draw_title(canvas: &mut Canvas, accent: Rgb) {
    canvas.set_style(TextStyle {
        font: FontId::SerifBold,
        size: 26.0,
        color: accent,
    });
    let x = canvas.style().margin_left;
    let y = canvas.style().page_height - TITLE_DROP;
    canvas.text_at(x, y, TOC_TITLE);
}

fn draw_entry(canvas: &mut Canvas, entry: &TocEntry, y: f32, toc_pages: usize) {
    canvas.set_style(TextStyle {
        font: FontId::Serif,
        size: ENTRY_SIZE,
        color: BLACK,
    });
    let fonts = canvas.fonts();
    let x = canvas.style().margin_left
        + ENTRY_INDENT
        + if entry.indent { SUB_INDENT } else { 0.0 };
    let right = canvas.style().right_edge();

    let number = assembled_page(entry.page, toc_pages).to_string();
    let title_w = fonts.text_width(FontId::Serif, ENTRY_SIZE, &entry.title);
    let number_w = fonts.text_width(FontId::Serif, ENTRY_SIZE, &number);
    let dot_w = fonts.text_width(FontId::Serif, ENTRY_SIZE, ".");

    // Leader dots fill the space between title and right-aligned number.
    let available = right - x - title_w - number_w - 10.0;
    let dots = if available > 0.0 && dot_w > 0.0 {
        (available / dot_w) as usize
    } else {
        0
    };

    let line = format!("{} {}", entry.title, ".".repeat(dots));
    canvas.text_at(x, y, &line);
    canvas.text_right_at(right, y, &number);
}
