use pdf_writer::{Content, Name, Str};

use super::assemble::ImageHandle;
use crate::error::Error;
use crate::fonts::{FontCatalog, to_winansi_bytes};
use crate::model::{FontId, Rgb, TextStyle};

pub const A4_WIDTH: f32 = 595.28;
pub const A4_HEIGHT: f32 = 841.89;

const BLACK: Rgb = [0, 0, 0];

// Header/footer geometry, measured from the page edges.
const HEADER_TITLE_DROP: f32 = 40.0;
const HEADER_RULE_DROP: f32 = 60.0;
const HEADER_RULE_INSET: f32 = 40.0;
const LOGO_WIDTH: f32 = 80.0;
const LOGO_HEIGHT: f32 = 50.0;
const FOOTER_BASELINE: f32 = 30.0;

/// Repeated header/footer furniture for every page after the cover.
#[derive(Clone)]
pub struct PageChrome {
    pub title: String,
    pub accent: Rgb,
    pub logo: Option<ImageHandle>,
}

#[derive(Clone)]
pub struct PageStyle {
    pub page_width: f32,
    pub page_height: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    /// Distance from the top edge to the first baseline of a fresh page.
    pub margin_top: f32,
    /// Lowest writable baseline.
    pub footer_margin: f32,
    /// Uniform pad above the footer that triggers page breaks.
    pub safety_pad: f32,
    pub chrome: Option<PageChrome>,
}

impl PageStyle {
    pub fn a4(chrome: Option<PageChrome>) -> Self {
        Self {
            page_width: A4_WIDTH,
            page_height: A4_HEIGHT,
            margin_left: 50.0,
            margin_right: 50.0,
            margin_top: 100.0,
            footer_margin: 70.0,
            safety_pad: 30.0,
            chrome,
        }
    }

    pub fn usable_width(&self) -> f32 {
        self.page_width - self.margin_left - self.margin_right
    }

    pub fn right_edge(&self) -> f32 {
        self.page_width - self.margin_right
    }

    pub fn top_y(&self) -> f32 {
        self.page_height - self.margin_top
    }

    pub fn bottom_limit(&self) -> f32 {
        self.footer_margin + self.safety_pad
    }

    pub fn writable_height(&self) -> f32 {
        self.top_y() - self.bottom_limit()
    }
}

/// Finished per-page content streams, in page order. Opaque to everything
/// but the assembler, which copies them verbatim.
pub struct PageSet {
    pub pages: Vec<Vec<u8>>,
}

/// Drawing surface over a growing sequence of pages. Owns the vertical
/// cursor and the declared text state; the state survives page breaks and is
/// re-emitted into each fresh content stream on first use.
pub struct Canvas<'a> {
    style: PageStyle,
    fonts: &'a FontCatalog,
    done: Vec<Vec<u8>>,
    current: Content,
    page_number: usize,
    y: f32,
    state: TextStyle,
    emitted_font: Option<(FontId, f32)>,
    emitted_color: Option<Rgb>,
}

impl<'a> Canvas<'a> {
    /// Opens page 1. Chrome is never drawn on page 1 (the cover).
    pub fn new(style: PageStyle, fonts: &'a FontCatalog) -> Self {
        let y = style.top_y();
        Self {
            style,
            fonts,
            done: Vec::new(),
            current: Content::new(),
            page_number: 1,
            y,
            state: TextStyle {
                font: FontId::Serif,
                size: 14.0,
                color: BLACK,
            },
            emitted_font: None,
            emitted_color: None,
        }
    }

    pub fn style(&self) -> &PageStyle {
        &self.style
    }

    pub fn fonts(&self) -> &'a FontCatalog {
        self.fonts
    }

    pub fn page_number(&self) -> usize {
        self.page_number
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn set_y(&mut self, y: f32) {
        self.y = y;
    }

    pub fn advance(&mut self, dy: f32) {
        self.y -= dy;
    }

    pub fn text_style(&self) -> TextStyle {
        self.state
    }

    pub fn set_style(&mut self, style: TextStyle) {
        self.state = style;
    }

    /// Break the page if `required` points of height do not fit above the
    /// bottom limit. Returns whether a break happened. Fails if `required`
    /// cannot fit even on an empty page.
    pub fn ensure_space(&mut self, required: f32) -> Result<bool, Error> {
        let available = self.style.writable_height();
        if required > available {
            return Err(Error::Layout {
                required,
                available,
            });
        }
        if self.y - required < self.style.bottom_limit() {
            self.break_page();
            return Ok(true);
        }
        Ok(false)
    }

    /// Close the current page and open the next one. The cursor returns to
    /// the top margin and chrome is drawn on the fresh page.
    pub fn break_page(&mut self) {
        let raw = std::mem::replace(&mut self.current, Content::new()).finish();
        self.done.push(raw.to_vec());
        self.page_number += 1;
        self.y = self.style.top_y();
        self.emitted_font = None;
        self.emitted_color = None;
        self.draw_chrome();
    }

    fn draw_chrome(&mut self) {
        let Some(chrome) = self.style.chrome.clone() else {
            return;
        };
        let w = self.style.page_width;
        let h = self.style.page_height;
        let saved = self.state;

        self.state = TextStyle {
            font: FontId::SerifBold,
            size: 12.0,
            color: chrome.accent,
        };
        self.text_centered_at(w / 2.0, h - HEADER_TITLE_DROP, &chrome.title);

        if let Some(logo) = chrome.logo {
            self.draw_image(
                logo,
                w - LOGO_WIDTH - 20.0,
                h - LOGO_HEIGHT - FOOTER_BASELINE,
                LOGO_WIDTH,
                LOGO_HEIGHT,
            );
        }

        self.stroke_line(
            HEADER_RULE_INSET,
            h - HEADER_RULE_DROP,
            w - HEADER_RULE_INSET,
            h - HEADER_RULE_DROP,
            chrome.accent,
        );

        self.state = TextStyle {
            font: FontId::Serif,
            size: 10.0,
            color: BLACK,
        };
        let label = format!("Page {}", self.page_number);
        self.text_centered_at(w / 2.0, FOOTER_BASELINE, &label);

        self.state = saved;
    }

    fn sync_fill(&mut self, color: Rgb) {
        if self.emitted_color != Some(color) {
            self.current.set_fill_rgb(
                color[0] as f32 / 255.0,
                color[1] as f32 / 255.0,
                color[2] as f32 / 255.0,
            );
            self.emitted_color = Some(color);
        }
    }

    /// Draw `text` with its baseline starting at (x, y) in the declared style.
    pub fn text_at(&mut self, x: f32, y: f32, text: &str) {
        self.sync_fill(self.state.color);
        let fonts = self.fonts;
        let pdf_name = fonts.entry(self.state.font).pdf_name;
        self.current.begin_text();
        if self.emitted_font != Some((self.state.font, self.state.size)) {
            self.current
                .set_font(Name(pdf_name.as_bytes()), self.state.size);
            self.emitted_font = Some((self.state.font, self.state.size));
        }
        self.current.next_line(x, y);
        self.current.show(Str(&to_winansi_bytes(text)));
        self.current.end_text();
    }

    pub fn text_centered_at(&mut self, x_center: f32, y: f32, text: &str) {
        let w = self
            .fonts
            .text_width(self.state.font, self.state.size, text);
        self.text_at(x_center - w / 2.0, y, text);
    }

    pub fn text_right_at(&mut self, x_right: f32, y: f32, text: &str) {
        let w = self
            .fonts
            .text_width(self.state.font, self.state.size, text);
        self.text_at(x_right - w, y, text);
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb) {
        self.sync_fill(color);
        self.current.rect(x, y, w, h);
        self.current.fill_nonzero();
    }

    pub fn stroke_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: Rgb) {
        self.current.set_stroke_rgb(
            color[0] as f32 / 255.0,
            color[1] as f32 / 255.0,
            color[2] as f32 / 255.0,
        );
        self.current.move_to(x1, y1);
        self.current.line_to(x2, y2);
        self.current.stroke();
    }

    /// Place a staged image with its lower-left corner at (x, y).
    pub fn draw_image(&mut self, handle: ImageHandle, x: f32, y: f32, w: f32, h: f32) {
        let name = handle.resource_name();
        self.current.save_state();
        self.current.transform([w, 0.0, 0.0, h, x, y]);
        self.current.x_object(Name(name.as_bytes()));
        self.current.restore_state();
    }

    /// Close the last page and hand over the finished streams.
    pub fn finish(mut self) -> PageSet {
        let raw = self.current.finish();
        self.done.push(raw.to_vec());
        PageSet { pages: self.done }
    }
}
