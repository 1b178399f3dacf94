use super::canvas::Canvas;
use crate::error::Error;
use crate::fonts::{FontCatalog, FontEntry};
use crate::model::{FontId, Justify, TextBlock};

/// Greedy word wrap against the width table of `font` at `size`.
/// Words that alone exceed `max_width` are hard-broken by characters, so
/// every returned line fits within `max_width`.
pub fn wrap(
    fonts: &FontCatalog,
    font: FontId,
    size: f32,
    max_width: f32,
    text: &str,
) -> Vec<String> {
    let entry = fonts.entry(font);
    let space_w = entry.space_width(size);
    let mut lines: Vec<String> = Vec::new();
    let mut line = String::new();
    let mut line_w = 0.0f32;

    for word in text.split_whitespace() {
        let word_w = entry.word_width(word, size);
        if word_w > max_width {
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
                line_w = 0.0;
            }
            lines.extend(break_long_word(entry, size, max_width, word));
            continue;
        }
        if line.is_empty() {
            line.push_str(word);
            line_w = word_w;
        } else if line_w + space_w + word_w <= max_width {
            line.push(' ');
            line.push_str(word);
            line_w += space_w + word_w;
        } else {
            lines.push(std::mem::take(&mut line));
            line.push_str(word);
            line_w = word_w;
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

fn break_long_word(entry: &FontEntry, size: f32, max_width: f32, word: &str) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    let mut piece_w = 0.0f32;
    for ch in word.chars() {
        let ch_w = entry.char_width_1000(ch) * size / 1000.0;
        if !piece.is_empty() && piece_w + ch_w > max_width {
            pieces.push(std::mem::take(&mut piece));
            piece_w = 0.0;
        }
        piece.push(ch);
        piece_w += ch_w;
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}

/// Uniform extra width added to each inter-word gap so that a line of
/// `word_count` words spans `usable_width` exactly. The gap replaces the
/// natural space; it is not added on top of it.
pub fn justify_gap(total_word_width: f32, word_count: usize, usable_width: f32) -> f32 {
    debug_assert!(word_count > 1);
    (usable_width - total_word_width) / (word_count - 1) as f32
}

fn draw_line(
    canvas: &mut Canvas,
    line: &str,
    x_left: f32,
    usable_width: f32,
    justify: Justify,
    is_last: bool,
) {
    let words: Vec<&str> = line.split(' ').collect();
    // Short lines under a gap cap read better ragged than stretched.
    let too_short = matches!(justify, Justify::Capped(_)) && words.len() < 4;
    let justified = !is_last && words.len() > 1 && justify != Justify::None && !too_short;
    if !justified {
        let y = canvas.y();
        canvas.text_at(x_left, y, line);
        return;
    }

    let style = canvas.text_style();
    let fonts = canvas.fonts();
    let widths: Vec<f32> = words
        .iter()
        .map(|w| fonts.text_width(style.font, style.size, w))
        .collect();
    let total: f32 = widths.iter().sum();
    let mut gap = justify_gap(total, words.len(), usable_width);
    if let Justify::Capped(max_gap) = justify {
        gap = gap.min(max_gap);
    }

    let y = canvas.y();
    let mut x = x_left;
    for (word, w) in words.iter().zip(&widths) {
        canvas.text_at(x, y, word);
        x += w + gap;
    }
}

/// Flow a block onto the canvas, breaking pages internally as needed.
/// Runs to completion: every word of the block is drawn exactly once.
pub fn draw_text_block(canvas: &mut Canvas, block: &TextBlock) -> Result<(), Error> {
    canvas.set_style(block.style);
    let x_left = canvas.style().margin_left + block.indent;
    let usable = canvas.style().usable_width() - block.indent;

    for paragraph in block.text.split('\n') {
        if paragraph.trim().is_empty() {
            canvas.ensure_space(block.line_height)?;
            canvas.advance(block.line_height);
            continue;
        }
        let lines = wrap(
            canvas.fonts(),
            block.style.font,
            block.style.size,
            usable,
            paragraph,
        );
        let last = lines.len() - 1;
        for (i, line) in lines.iter().enumerate() {
            canvas.ensure_space(block.line_height)?;
            draw_line(canvas, line, x_left, usable, block.justify, i == last);
            canvas.advance(block.line_height);
        }
        canvas.advance(block.paragraph_gap);
    }
    Ok(())
}

/// Flow a block until the current page is exhausted, never breaking the page
/// itself. Returns the unconsumed remainder, or None when the whole block
/// was drawn. The caller decides what happens at the boundary (typically a
/// `break_page` followed by another call with the remainder).
pub fn draw_text_block_bounded(
    canvas: &mut Canvas,
    block: &TextBlock,
) -> Result<Option<TextBlock>, Error> {
    let available = canvas.style().writable_height();
    if block.line_height > available {
        return Err(Error::Layout {
            required: block.line_height,
            available,
        });
    }

    canvas.set_style(block.style);
    let x_left = canvas.style().margin_left + block.indent;
    let usable = canvas.style().usable_width() - block.indent;
    let limit = canvas.style().bottom_limit();

    let paragraphs: Vec<&str> = block.text.split('\n').collect();
    for (pi, paragraph) in paragraphs.iter().enumerate() {
        if paragraph.trim().is_empty() {
            if canvas.y() - block.line_height < limit {
                return Ok(remainder(block, String::new(), &paragraphs[pi + 1..]));
            }
            canvas.advance(block.line_height);
            continue;
        }
        let lines = wrap(
            canvas.fonts(),
            block.style.font,
            block.style.size,
            usable,
            paragraph,
        );
        for (i, line) in lines.iter().enumerate() {
            if canvas.y() - block.line_height < limit {
                let rest = lines[i..].join(" ");
                return Ok(remainder(block, rest, &paragraphs[pi + 1..]));
            }
            draw_line(canvas, line, x_left, usable, block.justify, i + 1 == lines.len());
            canvas.advance(block.line_height);
        }
        canvas.advance(block.paragraph_gap);
    }
    Ok(None)
}

fn remainder(block: &TextBlock, first: String, rest: &[&str]) -> Option<TextBlock> {
    let mut parts: Vec<String> = Vec::new();
    if !first.is_empty() {
        parts.push(first);
    }
    parts.extend(rest.iter().map(|s| s.to_string()));
    if parts.iter().all(|p| p.trim().is_empty()) {
        return None;
    }
    Some(TextBlock {
        text: parts.join("\n"),
        ..block.clone()
    })
}
