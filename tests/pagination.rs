mod common;

use folio_report::{Canvas, Error, FontCatalog, FontId, PageChrome, PageStyle, TextStyle};

fn chrome() -> Option<PageChrome> {
    Some(PageChrome {
        title: "Asset Allocation Report".to_string(),
        accent: [0x6F, 0x1D, 0x1B],
        logo: None,
    })
}

#[test]
fn ensure_space_keeps_the_cursor_above_the_bottom_limit() {
    let fonts = FontCatalog::base14();
    let style = PageStyle::a4(None);
    let limit = style.bottom_limit();
    let mut canvas = Canvas::new(style, &fonts);

    for required in [12.0, 80.0, 200.0, 640.0] {
        canvas.ensure_space(required).expect("fits on an empty page");
        assert!(
            canvas.y() - required >= limit - 0.001,
            "required {required}: y {} leaves less than the limit {limit}",
            canvas.y()
        );
        canvas.advance(required);
    }
}

#[test]
fn oversized_requests_are_rejected_up_front() {
    let fonts = FontCatalog::base14();
    let style = PageStyle::a4(None);
    let writable = style.writable_height();
    let mut canvas = Canvas::new(style, &fonts);

    let err = canvas.ensure_space(writable + 1.0).unwrap_err();
    match err {
        Error::Layout {
            required,
            available,
        } => {
            assert!(required > available);
        }
        other => panic!("expected a layout error, got {other}"),
    }
    // The canvas stays usable after the rejection.
    assert!(!canvas.ensure_space(100.0).expect("fits"));
}

#[test]
fn ensure_space_breaks_exactly_when_needed() {
    let fonts = FontCatalog::base14();
    let style = PageStyle::a4(None);
    let limit = style.bottom_limit();
    let mut canvas = Canvas::new(style, &fonts);

    canvas.set_y(limit + 50.0);
    assert!(!canvas.ensure_space(50.0).expect("fits"), "50pt still fits");
    assert_eq!(canvas.page_number(), 1);

    canvas.set_y(limit + 50.0);
    assert!(canvas.ensure_space(50.1).expect("fits"), "50.1pt must break");
    assert_eq!(canvas.page_number(), 2);
    assert_eq!(canvas.y(), canvas.style().top_y());
}

#[test]
fn footers_number_pages_monotonically() {
    let fonts = FontCatalog::base14();
    let mut canvas = Canvas::new(PageStyle::a4(chrome()), &fonts);
    canvas.break_page();
    canvas.break_page();
    canvas.break_page();
    let pages = canvas.finish().pages;
    assert_eq!(pages.len(), 4);

    for (i, page) in pages.iter().enumerate().skip(1) {
        let label = format!("(Page {})", i + 1);
        assert_eq!(
            common::count(page, label.as_bytes()),
            1,
            "page {} footer",
            i + 1
        );
    }
}

#[test]
fn the_first_page_carries_no_chrome() {
    let fonts = FontCatalog::base14();
    let mut canvas = Canvas::new(PageStyle::a4(chrome()), &fonts);
    canvas.break_page();
    let pages = canvas.finish().pages;

    assert_eq!(common::count(&pages[0], b"(Asset Allocation Report)"), 0);
    assert_eq!(common::count(&pages[0], b"(Page 1)"), 0);
    assert_eq!(common::count(&pages[1], b"(Asset Allocation Report)"), 1);
    assert_eq!(common::count(&pages[1], b"(Page 2)"), 1);
}

#[test]
fn declared_style_is_reapplied_after_a_break() {
    let fonts = FontCatalog::base14();
    let mut canvas = Canvas::new(PageStyle::a4(None), &fonts);
    canvas.set_style(TextStyle {
        font: FontId::Serif,
        size: 14.0,
        color: [0, 0, 0],
    });
    canvas.text_at(50.0, 700.0, "before");
    canvas.break_page();
    canvas.text_at(50.0, 700.0, "after");
    let pages = canvas.finish().pages;

    assert_eq!(common::count(&pages[0], b"/F1 14 Tf"), 1);
    assert_eq!(common::count(&pages[1], b"/F1 14 Tf"), 1, "fresh page must re-declare");
}

#[test]
fn repeated_text_reuses_the_emitted_font_on_one_page() {
    let fonts = FontCatalog::base14();
    let mut canvas = Canvas::new(PageStyle::a4(None), &fonts);
    canvas.set_style(TextStyle {
        font: FontId::Serif,
        size: 14.0,
        color: [0, 0, 0],
    });
    canvas.text_at(50.0, 700.0, "one");
    canvas.text_at(50.0, 680.0, "two");
    canvas.text_at(50.0, 660.0, "three");
    let pages = canvas.finish().pages;

    assert_eq!(common::count(&pages[0], b"/F1 14 Tf"), 1);
}
