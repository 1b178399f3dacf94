mod common;

use folio_report::{
    Canvas, FontCatalog, FontId, Justify, PageStyle, TextBlock, TextStyle, draw_text_block,
    draw_text_block_bounded, justify_gap, wrap,
};

const SAMPLE: &str = "Diversification remains the only reliable defence against forecast \
error, and the proposed allocation leans on it heavily across regions, durations and real \
assets while keeping implementation costs contained.";

#[test]
fn wrapped_lines_fit_the_width() {
    let fonts = FontCatalog::base14();
    for max_width in [120.0, 250.0, 495.0] {
        let lines = wrap(&fonts, FontId::Serif, 14.0, max_width, SAMPLE);
        assert!(!lines.is_empty());
        for line in &lines {
            let w = fonts.text_width(FontId::Serif, 14.0, line);
            assert!(
                w <= max_width + 0.01,
                "line {line:?} is {w:.2}pt wide, limit {max_width}"
            );
        }
    }
}

#[test]
fn wrapping_preserves_every_word_in_order() {
    let fonts = FontCatalog::base14();
    let lines = wrap(&fonts, FontId::Serif, 14.0, 200.0, SAMPLE);
    let rejoined: Vec<&str> = lines.iter().flat_map(|l| l.split(' ')).collect();
    let original: Vec<&str> = SAMPLE.split_whitespace().collect();
    assert_eq!(rejoined, original);
}

#[test]
fn wrapping_is_deterministic() {
    let fonts = FontCatalog::base14();
    let paragraphs = [
        SAMPLE,
        "Rates markets have already priced several cuts, leaving the front end \
vulnerable to sticky services inflation.",
        "Within equities the preference stays with quality balance sheets and \
stable cash conversion over speculative growth.",
    ];
    let run = || -> Vec<Vec<String>> {
        paragraphs
            .iter()
            .map(|p| wrap(&fonts, FontId::Serif, 12.0, 350.0, p))
            .collect()
    };
    let a = run();
    let b = run();
    assert_eq!(a, b);
    assert_eq!(
        a.iter().map(Vec::len).sum::<usize>(),
        b.iter().map(Vec::len).sum::<usize>()
    );
}

#[test]
fn overlong_words_are_hard_broken() {
    let fonts = FontCatalog::base14();
    let word = "x".repeat(300);
    let lines = wrap(&fonts, FontId::Serif, 14.0, 100.0, &word);
    assert!(lines.len() > 1);
    for line in &lines {
        assert!(fonts.text_width(FontId::Serif, 14.0, line) <= 100.0 + 0.01);
    }
    let rejoined: String = lines.concat();
    assert_eq!(rejoined, word);
}

#[test]
fn justified_gaps_span_the_usable_width() {
    let fonts = FontCatalog::base14();
    let usable = 300.0;
    let lines = wrap(&fonts, FontId::Serif, 14.0, usable, SAMPLE);
    // All non-last, multi-word lines must span exactly when fully justified.
    for line in &lines[..lines.len() - 1] {
        let words: Vec<&str> = line.split(' ').collect();
        if words.len() < 2 {
            continue;
        }
        let total: f32 = words
            .iter()
            .map(|w| fonts.text_width(FontId::Serif, 14.0, w))
            .sum();
        let gap = justify_gap(total, words.len(), usable);
        let spanned = total + gap * (words.len() - 1) as f32;
        assert!((spanned - usable).abs() < 0.001);
    }
}

#[test]
fn block_flows_across_pages_without_text_loss() {
    let fonts = FontCatalog::base14();
    let mut style = PageStyle::a4(None);
    style.page_height = 300.0;
    style.margin_top = 60.0;
    let mut canvas = Canvas::new(style, &fonts);

    let words: Vec<String> = (0..180).map(|i| format!("word{i:03}")).collect();
    let block = TextBlock {
        text: words.join(" "),
        style: TextStyle {
            font: FontId::Serif,
            size: 14.0,
            color: [0, 0, 0],
        },
        indent: 0.0,
        line_height: 18.0,
        paragraph_gap: 10.0,
        justify: Justify::Full,
    };
    draw_text_block(&mut canvas, &block).expect("draw");
    let pages = canvas.finish();
    assert!(pages.pages.len() > 1, "expected the block to span pages");

    let all: Vec<u8> = pages.pages.concat();
    for word in &words {
        assert_eq!(
            common::count(&all, word.as_bytes()),
            1,
            "{word} should be drawn exactly once"
        );
    }
}

#[test]
fn bounded_flavor_returns_the_remainder() {
    let fonts = FontCatalog::base14();
    let mut style = PageStyle::a4(None);
    style.page_height = 260.0;
    style.margin_top = 40.0;
    let mut canvas = Canvas::new(style, &fonts);

    let words: Vec<String> = (0..150).map(|i| format!("tok{i:03}")).collect();
    let mut block = TextBlock {
        text: words.join(" "),
        style: TextStyle {
            font: FontId::Serif,
            size: 14.0,
            color: [0, 0, 0],
        },
        indent: 20.0,
        line_height: 18.0,
        paragraph_gap: 10.0,
        justify: Justify::Capped(10.0),
    };

    let mut rounds = 0;
    while let Some(rest) = draw_text_block_bounded(&mut canvas, &block).expect("draw") {
        canvas.break_page();
        block = rest;
        rounds += 1;
        assert!(rounds < 100, "remainder loop did not converge");
    }
    assert!(rounds > 0, "expected at least one remainder");

    let pages = canvas.finish();
    let all: Vec<u8> = pages.pages.concat();
    for word in &words {
        assert_eq!(common::count(&all, word.as_bytes()), 1);
    }
}

#[test]
fn paragraph_boundaries_survive_the_remainder() {
    let fonts = FontCatalog::base14();
    let mut style = PageStyle::a4(None);
    style.page_height = 240.0;
    style.margin_top = 40.0;
    let mut canvas = Canvas::new(style, &fonts);

    let para_a: Vec<String> = (0..60).map(|i| format!("alpha{i:02}")).collect();
    let para_b: Vec<String> = (0..60).map(|i| format!("beta{i:02}")).collect();
    let mut block = TextBlock {
        text: format!("{}\n{}", para_a.join(" "), para_b.join(" ")),
        style: TextStyle {
            font: FontId::Serif,
            size: 14.0,
            color: [0, 0, 0],
        },
        indent: 0.0,
        line_height: 18.0,
        paragraph_gap: 10.0,
        justify: Justify::None,
    };

    while let Some(rest) = draw_text_block_bounded(&mut canvas, &block).expect("draw") {
        canvas.break_page();
        block = rest;
    }
    let pages = canvas.finish();
    let all: Vec<u8> = pages.pages.concat();
    for word in para_a.iter().chain(&para_b) {
        assert_eq!(common::count(&all, word.as_bytes()), 1);
    }
}
