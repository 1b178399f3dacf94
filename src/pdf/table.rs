use super::canvas::Canvas;
use crate::error::Error;
use crate::model::{ColumnAlign, FontId, Rgb, TableSpec, TextStyle};

const BLACK: Rgb = [0, 0, 0];
const TITLE_HEIGHT: f32 = 30.0;
const TRAILING_GAP: f32 = 20.0;
const CELL_PAD: f32 = 5.0;

fn heading_height(spec: &TableSpec) -> f32 {
    let title = if spec.title.is_some() { TITLE_HEIGHT } else { 0.0 };
    let band = if spec.headers.is_empty() {
        0.0
    } else {
        spec.header_height
    };
    title + band
}

fn column_align(spec: &TableSpec, col: usize) -> ColumnAlign {
    spec.aligns.get(col).copied().unwrap_or(if col == 0 {
        ColumnAlign::Left
    } else {
        ColumnAlign::Center
    })
}

// Baseline sits a third of the band height above its bottom edge, which
// centers the text optically for the row heights in use.
fn baseline(y_top: f32, band_height: f32) -> f32 {
    y_top - band_height + band_height * 0.3
}

fn draw_cells(canvas: &mut Canvas, spec: &TableSpec, x0: f32, y: f32, cells: &[String]) {
    let mut x = x0;
    for (col, (text, width)) in cells.iter().zip(&spec.column_widths).enumerate() {
        match column_align(spec, col) {
            ColumnAlign::Left => canvas.text_at(x + CELL_PAD, y, text),
            ColumnAlign::Center => canvas.text_centered_at(x + width / 2.0, y, text),
        }
        x += width;
    }
}

fn draw_heading(canvas: &mut Canvas, spec: &TableSpec) {
    let x0 = canvas.style().margin_left + spec.indent;
    if let Some(ref title) = spec.title {
        canvas.set_style(TextStyle {
            font: FontId::SerifBold,
            size: 14.0,
            color: BLACK,
        });
        let y = canvas.y();
        canvas.text_centered_at(x0 + spec.total_width() / 2.0, y - 14.0, title);
        canvas.advance(TITLE_HEIGHT);
    }
    if spec.headers.is_empty() {
        return;
    }
    let y_top = canvas.y();
    canvas.fill_rect(
        x0 - CELL_PAD,
        y_top - spec.header_height,
        spec.total_width() + 2.0 * CELL_PAD,
        spec.header_height,
        spec.header_fill,
    );
    canvas.set_style(TextStyle {
        font: FontId::SerifBold,
        size: spec.font_size,
        color: spec.header_text_color,
    });
    let y = baseline(y_top, spec.header_height);
    draw_cells(canvas, spec, x0, y, &spec.headers);
    canvas.advance(spec.header_height);
}

/// Height of the table if drawn without a page break, trailing gap included.
pub fn table_height(spec: &TableSpec) -> f32 {
    heading_height(spec) + spec.rows.len() as f32 * spec.row_height + TRAILING_GAP
}

/// Draw a table starting at the current cursor, breaking pages between rows.
/// Each fragment redraws the title and header band, and row fills alternate
/// by the row's original index so striping stays continuous across breaks.
/// Returns the cursor position after the trailing gap.
pub fn draw_table(canvas: &mut Canvas, spec: &TableSpec) -> Result<f32, Error> {
    canvas.ensure_space(heading_height(spec) + spec.row_height)?;
    draw_heading(canvas, spec);

    let x0 = canvas.style().margin_left + spec.indent;
    for (idx, row) in spec.rows.iter().enumerate() {
        if canvas.ensure_space(spec.row_height)? {
            log::debug!(
                "table break before row {idx} (page {})",
                canvas.page_number()
            );
            draw_heading(canvas, spec);
        }
        let y_top = canvas.y();
        canvas.fill_rect(
            x0 - CELL_PAD,
            y_top - spec.row_height,
            spec.total_width() + 2.0 * CELL_PAD,
            spec.row_height,
            spec.zebra[idx % 2],
        );
        canvas.set_style(TextStyle {
            font: FontId::Serif,
            size: spec.font_size,
            color: BLACK,
        });
        draw_cells(canvas, spec, x0, baseline(y_top, spec.row_height), row);
        canvas.advance(spec.row_height);
    }

    canvas.advance(TRAILING_GAP);
    Ok(canvas.y())
}
