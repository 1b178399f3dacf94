pub mod commentary;

use std::time::Instant;

use crate::error::Error;
use crate::fonts::FontCatalog;
use crate::model::{
    Allocation, ChartImage, ColumnAlign, FontId, Justify, ModelComparison, ReportContent,
    ReturnMetrics, Rgb, RiskMetrics, TableSpec, TextBlock, TextStyle,
};
use crate::pdf::{
    AssetStore, Canvas, PageChrome, PageSet, PageStyle, TocRecorder, draw_table,
    draw_text_block, draw_text_block_bounded, merge, render_toc, table_height, wrap,
};

const BURGUNDY: Rgb = [0x6F, 0x1D, 0x1B];
const GOLD: Rgb = [0xFF, 0xA8, 0x00];
const BLACK: Rgb = [0, 0, 0];
const WHITE: Rgb = [255, 255, 255];
const GREY: Rgb = [120, 120, 120];
const WHITESMOKE: Rgb = [245, 245, 245];
const LIGHTGREY: Rgb = [211, 211, 211];

const HEADER_TITLE: &str = "Asset Allocation Report";

const BODY_SIZE: f32 = 14.0;
const LINE_HEIGHT: f32 = 18.0;
const PARA_GAP: f32 = 10.0;
const NOTE_SIZE: f32 = 11.0;
const NOTE_LINE_HEIGHT: f32 = 14.0;
// Minimum room before starting a heading, so a title never strands at a
// page bottom with nothing under it.
const SECTION_KEEP: f32 = 200.0;
const SUBSECTION_KEEP: f32 = 120.0;
const OUTLOOK_GAP_CAP: f32 = 10.0;
// Narrowest column a side note may occupy; below this the note is dropped
// rather than degraded to a character per line.
const MIN_NOTE_WIDTH: f32 = 60.0;

pub(crate) fn render(content: &ReportContent) -> Result<Vec<u8>, Error> {
    let t0 = Instant::now();
    let fonts = FontCatalog::base14();
    let mut assets = AssetStore::new();

    let logo = content.logo.as_ref().and_then(|img| assets.insert(img));
    let style = PageStyle::a4(Some(PageChrome {
        title: HEADER_TITLE.to_string(),
        accent: BURGUNDY,
        logo,
    }));

    let mut toc = TocRecorder::new();
    let mut canvas = Canvas::new(style.clone(), &fonts);

    draw_cover(&mut canvas, &mut assets, content);
    canvas.break_page();

    section_summary(&mut canvas, &mut toc, content)?;
    section_macro(&mut canvas, &mut toc, content)?;
    section_outlook(&mut canvas, &mut toc, content)?;
    section_allocation(&mut canvas, &mut toc, &mut assets, content)?;
    section_composition(&mut canvas, &mut toc, &mut assets, content)?;
    section_performance(&mut canvas, &mut toc, &mut assets, content)?;

    // Every section that draws anything records a TOC entry, so an empty
    // recorder means the body holds nothing but the cover placeholder and a
    // blank chrome page.
    if toc.entries().is_empty() {
        return Err(Error::Assembly(
            "report content produced no sections; refusing to emit an empty document"
                .to_string(),
        ));
    }

    let body = canvas.finish();
    let t_body = t0.elapsed();

    // Body page 1 doubles as the cover; the assembler drops it from the body
    // sequence and places the copy up front.
    let cover = PageSet {
        pages: vec![body.pages[0].clone()],
    };
    let toc_pages = render_toc(toc.entries(), &style, &fonts, BURGUNDY);
    let t_toc = t0.elapsed();

    let bytes = merge(
        &fonts,
        &assets,
        (style.page_width, style.page_height),
        &cover,
        &toc_pages,
        &body,
    )?;

    log::info!(
        "Render phases: body={:.1}ms ({} pages), toc={:.1}ms ({} pages), assembly={:.1}ms",
        t_body.as_secs_f64() * 1000.0,
        body.pages.len(),
        (t_toc - t_body).as_secs_f64() * 1000.0,
        toc_pages.pages.len(),
        (t0.elapsed() - t_toc).as_secs_f64() * 1000.0,
    );

    Ok(bytes)
}

fn body_style() -> TextStyle {
    TextStyle {
        font: FontId::Serif,
        size: BODY_SIZE,
        color: BLACK,
    }
}

fn note_style() -> TextStyle {
    TextStyle {
        font: FontId::SerifItalic,
        size: NOTE_SIZE,
        color: BURGUNDY,
    }
}

fn body_block(text: &str) -> TextBlock {
    TextBlock {
        text: text.to_string(),
        style: body_style(),
        indent: 0.0,
        line_height: LINE_HEIGHT,
        paragraph_gap: PARA_GAP,
        justify: Justify::Full,
    }
}

fn commentary_block(text: &str) -> TextBlock {
    TextBlock {
        text: text.to_string(),
        style: body_style(),
        indent: 0.0,
        line_height: LINE_HEIGHT,
        paragraph_gap: 5.0,
        justify: Justify::Full,
    }
}

fn draw_cover(canvas: &mut Canvas, assets: &mut AssetStore, content: &ReportContent) {
    let w = canvas.style().page_width;
    let h = canvas.style().page_height;
    match &content.cover_background {
        Some(bg) => match assets.insert(bg) {
            Some(handle) => canvas.draw_image(handle, 0.0, 0.0, w, h),
            None => log::warn!("cover background could not be decoded; rendering plain cover"),
        },
        None => log::warn!("no cover background supplied; rendering plain cover"),
    }

    let x = canvas.style().margin_left;
    canvas.set_style(TextStyle {
        font: FontId::SerifBold,
        size: 46.0,
        color: GOLD,
    });
    canvas.text_at(x, h - 540.0, "Asset Allocation Report");

    canvas.set_style(TextStyle {
        font: FontId::SerifBold,
        size: 24.0,
        color: GOLD,
    });
    canvas.text_at(x, h - 590.0, "Portfolio Review & Outlook");

    canvas.set_style(TextStyle {
        font: FontId::SerifItalic,
        size: 28.0,
        color: WHITE,
    });
    canvas.text_at(x, h - 690.0, &format!("Prepared for {}", content.client_name));

    canvas.set_style(TextStyle {
        font: FontId::SerifItalic,
        size: 16.0,
        color: WHITE,
    });
    canvas.text_at(x, h - 730.0, &content.report_date);
    if let Some(amount) = content.investment_amount {
        let line = format!(
            "Investment amount: USD {}",
            commentary::format_amount(amount)
        );
        canvas.text_at(x, h - 760.0, &line);
    }
}

fn section_title(canvas: &mut Canvas, toc: &mut TocRecorder, title: &str) -> Result<(), Error> {
    canvas.ensure_space(SECTION_KEEP)?;
    toc.record(title, canvas.page_number(), false);
    let block = TextBlock {
        text: title.to_string(),
        style: TextStyle {
            font: FontId::SerifBold,
            size: 20.0,
            color: BURGUNDY,
        },
        indent: 0.0,
        line_height: 24.0,
        paragraph_gap: 6.0,
        justify: Justify::None,
    };
    draw_text_block(canvas, &block)
}

fn subsection_title(canvas: &mut Canvas, toc: &mut TocRecorder, title: &str) -> Result<(), Error> {
    canvas.ensure_space(SUBSECTION_KEEP)?;
    toc.record(title, canvas.page_number(), true);
    canvas.set_style(TextStyle {
        font: FontId::SerifBold,
        size: 16.0,
        color: BLACK,
    });
    let x = canvas.style().margin_left + 10.0;
    let y = canvas.y();
    canvas.text_at(x, y, title);
    canvas.advance(24.0);
    Ok(())
}

fn section_summary(
    canvas: &mut Canvas,
    toc: &mut TocRecorder,
    content: &ReportContent,
) -> Result<(), Error> {
    if content.executive_summary.is_empty() {
        return Ok(());
    }
    section_title(canvas, toc, "I. Executive Summary")?;
    draw_text_block(canvas, &body_block(&content.executive_summary))
}

fn section_macro(
    canvas: &mut Canvas,
    toc: &mut TocRecorder,
    content: &ReportContent,
) -> Result<(), Error> {
    if content.macro_commentary.is_empty() {
        return Ok(());
    }
    section_title(canvas, toc, "II. Macroeconomic Overview")?;
    draw_text_block(canvas, &body_block(&content.macro_commentary))
}

fn section_outlook(
    canvas: &mut Canvas,
    toc: &mut TocRecorder,
    content: &ReportContent,
) -> Result<(), Error> {
    if content.asset_class_outlook.is_empty() {
        return Ok(());
    }
    section_title(canvas, toc, "III. Asset Classes Outlook")?;

    for item in &content.asset_class_outlook {
        subsection_title(canvas, toc, &item.name)?;
        let mut block = TextBlock {
            text: item.commentary.clone(),
            style: body_style(),
            indent: 20.0,
            line_height: LINE_HEIGHT,
            paragraph_gap: PARA_GAP,
            justify: Justify::Capped(OUTLOOK_GAP_CAP),
        };
        // The outlook flows page by page: whatever does not fit returns as a
        // remainder and continues at the top of a fresh page.
        while let Some(rest) = draw_text_block_bounded(canvas, &block)? {
            canvas.break_page();
            block = rest;
        }
        canvas.advance(6.0);
    }
    Ok(())
}

fn section_allocation(
    canvas: &mut Canvas,
    toc: &mut TocRecorder,
    assets: &mut AssetStore,
    content: &ReportContent,
) -> Result<(), Error> {
    if content.current_allocation.is_empty()
        && content.proposed_allocation.is_empty()
        && content.model_comparison.model_names.is_empty()
    {
        return Ok(());
    }
    section_title(canvas, toc, "IV. Asset Allocation & Optimization")?;

    if !content.current_allocation.is_empty() {
        subsection_title(canvas, toc, "Current Portfolio Allocation")?;
        let spec = allocation_table(&content.current_allocation);
        let note = commentary::allocation_overview(&content.current_allocation);
        draw_table_with_note(canvas, &spec, note.as_deref())?;
    }

    if !content.model_comparison.model_names.is_empty() {
        subsection_title(canvas, toc, "Optimisation Models Comparison")?;
        let spec = comparison_table(canvas.style().usable_width(), &content.model_comparison);
        draw_table(canvas, &spec)?;
        if let Some(text) = commentary::model_summary(&content.model_comparison) {
            draw_text_block(canvas, &commentary_block(&text))?;
        }
    }

    if !content.proposed_allocation.is_empty() {
        subsection_title(canvas, toc, "Proposed Portfolio Allocation")?;
        let note = commentary::proposed_structure(&content.proposed_allocation);
        draw_chart_with_note(
            canvas,
            assets,
            content.charts.proposed_pie.as_ref(),
            note.as_deref(),
        )?;
        draw_chart_full(canvas, assets, content.charts.allocation_bars.as_ref())?;

        let spec = delta_table(&content.current_allocation, &content.proposed_allocation);
        draw_table(canvas, &spec)?;
        if let Some(text) =
            commentary::delta_summary(&content.current_allocation, &content.proposed_allocation)
        {
            draw_text_block(canvas, &commentary_block(&text))?;
        }
    }
    Ok(())
}

fn section_composition(
    canvas: &mut Canvas,
    toc: &mut TocRecorder,
    assets: &mut AssetStore,
    content: &ReportContent,
) -> Result<(), Error> {
    if content.holdings.is_empty()
        && content.return_metrics.is_empty()
        && content.risk_metrics.is_empty()
    {
        return Ok(());
    }
    section_title(canvas, toc, "V. Target Portfolio Composition & Insights")?;

    if !content.holdings.is_empty() {
        subsection_title(canvas, toc, "Proposed Portfolio Composition")?;
        draw_text_block(canvas, &commentary_block(commentary::UNIVERSE_NOTE))?;
        draw_table(canvas, &holdings_table(&content.holdings))?;
    }

    if !content.return_metrics.is_empty() {
        subsection_title(canvas, toc, "Assets Returns Overview")?;
        let note = commentary::returns_overview(&content.return_metrics);
        draw_chart_with_note(
            canvas,
            assets,
            content.charts.rebased_returns.as_ref(),
            note.as_deref(),
        )?;
        draw_table(canvas, &returns_table(&content.return_metrics))?;
    }

    if !content.risk_metrics.is_empty() {
        subsection_title(canvas, toc, "Assets Risk Overview")?;
        let note = commentary::volatility_overview(&content.risk_metrics);
        draw_chart_with_note(
            canvas,
            assets,
            content.charts.volatility_bars.as_ref(),
            note.as_deref(),
        )?;
        draw_table(canvas, &risk_table(&content.risk_metrics))?;
        if let Some(text) = commentary::risk_summary(&content.risk_metrics) {
            draw_text_block(canvas, &commentary_block(&text))?;
        }
    }
    Ok(())
}

fn section_performance(
    canvas: &mut Canvas,
    toc: &mut TocRecorder,
    assets: &mut AssetStore,
    content: &ReportContent,
) -> Result<(), Error> {
    let charts = &content.charts;
    let has_any = !content.return_metrics.is_empty()
        || charts.sharpe_bars.is_some()
        || charts.correlation_heatmap.is_some()
        || charts.efficient_frontier.is_some()
        || charts.backtest.is_some()
        || charts.monte_carlo.is_some();
    if !has_any {
        return Ok(());
    }
    section_title(canvas, toc, "VI. Backtested & Forecast Performance")?;

    if charts.sharpe_bars.is_some() || !content.return_metrics.is_empty() {
        subsection_title(canvas, toc, "Risk/Return Analysis")?;
        draw_chart_full(canvas, assets, charts.sharpe_bars.as_ref())?;
        if let Some(text) = commentary::sharpe_overview(&content.return_metrics) {
            draw_text_block(canvas, &commentary_block(&text))?;
        }
    }

    if charts.correlation_heatmap.is_some() {
        subsection_title(canvas, toc, "Correlation Structure")?;
        draw_chart_with_note(
            canvas,
            assets,
            charts.correlation_heatmap.as_ref(),
            Some(commentary::HEATMAP_NOTE),
        )?;
    }

    if charts.efficient_frontier.is_some() {
        subsection_title(canvas, toc, "Efficient Frontier")?;
        draw_chart_with_note(
            canvas,
            assets,
            charts.efficient_frontier.as_ref(),
            Some(commentary::FRONTIER_NOTE),
        )?;
    }

    if charts.backtest.is_some() {
        subsection_title(canvas, toc, "Historical Backtest")?;
        draw_chart_full(canvas, assets, charts.backtest.as_ref())?;
        draw_text_block(canvas, &commentary_block(commentary::BACKTEST_NOTE))?;
    }

    if charts.monte_carlo.is_some() {
        subsection_title(canvas, toc, "Monte Carlo Projection")?;
        draw_chart_full(canvas, assets, charts.monte_carlo.as_ref())?;
        draw_text_block(canvas, &commentary_block(commentary::MONTE_CARLO_NOTE))?;
    }
    Ok(())
}

fn text_height(
    fonts: &FontCatalog,
    text: &str,
    font: FontId,
    size: f32,
    width: f32,
    line_height: f32,
    paragraph_gap: f32,
) -> f32 {
    let mut h = 0.0;
    for paragraph in text.split('\n') {
        if paragraph.trim().is_empty() {
            h += line_height;
            continue;
        }
        h += wrap(fonts, font, size, width, paragraph).len() as f32 * line_height
            + paragraph_gap;
    }
    h
}

/// Small table with an italic side note to its right. Space for the taller
/// of the two is reserved up front so neither crosses a page boundary.
fn draw_table_with_note(
    canvas: &mut Canvas,
    spec: &TableSpec,
    note: Option<&str>,
) -> Result<(), Error> {
    let note_indent = spec.indent + spec.total_width() + 40.0;
    let note_width = canvas.style().usable_width() - note_indent;
    let note = note.filter(|_| note_width >= MIN_NOTE_WIDTH);
    let note_h = note
        .map(|n| {
            text_height(
                canvas.fonts(),
                n,
                FontId::SerifItalic,
                NOTE_SIZE,
                note_width,
                NOTE_LINE_HEIGHT,
                5.0,
            )
        })
        .unwrap_or(0.0);
    canvas.ensure_space(table_height(spec).max(note_h) + 10.0)?;

    let top = canvas.y();
    draw_table(canvas, spec)?;
    let after_table = canvas.y();

    if let Some(text) = note {
        canvas.set_y(top - NOTE_LINE_HEIGHT);
        let block = TextBlock {
            text: text.to_string(),
            style: note_style(),
            indent: note_indent,
            line_height: NOTE_LINE_HEIGHT,
            paragraph_gap: 5.0,
            justify: Justify::None,
        };
        draw_text_block(canvas, &block)?;
        let after_note = canvas.y();
        canvas.set_y(after_table.min(after_note));
    }
    Ok(())
}

/// Chart at the left margin with a note in the remaining column. When the
/// chart is missing or undecodable a placeholder line takes its spot.
fn draw_chart_with_note(
    canvas: &mut Canvas,
    assets: &mut AssetStore,
    chart: Option<&ChartImage>,
    note: Option<&str>,
) -> Result<(), Error> {
    let margin = canvas.style().margin_left;
    let (chart_w, chart_h) = chart
        .map(|c| (c.display_width, c.display_height))
        .unwrap_or((0.0, 0.0));
    let note_indent = if chart.is_some() { chart_w + 30.0 } else { 0.0 };
    let note_width = canvas.style().usable_width() - note_indent;
    let note = note.filter(|_| note_width >= MIN_NOTE_WIDTH);
    let note_h = note
        .map(|n| {
            text_height(
                canvas.fonts(),
                n,
                FontId::SerifItalic,
                NOTE_SIZE,
                note_width,
                NOTE_LINE_HEIGHT,
                5.0,
            )
        })
        .unwrap_or(0.0);
    let block_h = chart_h.max(note_h) + 20.0;
    canvas.ensure_space(block_h)?;
    let top = canvas.y();

    let mut drew_chart = false;
    if let Some(c) = chart {
        if let Some(handle) = assets.insert(c) {
            canvas.draw_image(handle, margin, top - chart_h, chart_w, chart_h);
            drew_chart = true;
        }
    }
    let mut note_top = top - NOTE_LINE_HEIGHT;
    if !drew_chart {
        if chart.is_none() {
            log::warn!("chart slot empty; substituting placeholder");
        }
        canvas.set_style(TextStyle {
            font: FontId::SerifItalic,
            size: NOTE_SIZE,
            color: GREY,
        });
        canvas.text_at(margin, top - NOTE_LINE_HEIGHT, "(chart unavailable: N/A)");
        note_top -= NOTE_LINE_HEIGHT;
    }

    if let Some(text) = note {
        canvas.set_y(note_top);
        let block = TextBlock {
            text: text.to_string(),
            style: note_style(),
            indent: note_indent,
            line_height: NOTE_LINE_HEIGHT,
            paragraph_gap: 5.0,
            justify: Justify::None,
        };
        draw_text_block(canvas, &block)?;
    }

    canvas.set_y(top - block_h);
    Ok(())
}

fn draw_chart_full(
    canvas: &mut Canvas,
    assets: &mut AssetStore,
    chart: Option<&ChartImage>,
) -> Result<(), Error> {
    let margin = canvas.style().margin_left;
    let Some(c) = chart else {
        log::warn!("chart slot empty; substituting placeholder");
        canvas.ensure_space(NOTE_LINE_HEIGHT + 10.0)?;
        let y = canvas.y();
        canvas.set_style(TextStyle {
            font: FontId::SerifItalic,
            size: NOTE_SIZE,
            color: GREY,
        });
        canvas.text_at(margin, y - NOTE_LINE_HEIGHT, "(chart unavailable: N/A)");
        canvas.advance(NOTE_LINE_HEIGHT + 10.0);
        return Ok(());
    };

    canvas.ensure_space(c.display_height + 20.0)?;
    let top = canvas.y();
    if let Some(handle) = assets.insert(c) {
        canvas.draw_image(handle, margin, top - c.display_height, c.display_width, c.display_height);
        canvas.set_y(top - c.display_height - 20.0);
    } else {
        canvas.set_style(TextStyle {
            font: FontId::SerifItalic,
            size: NOTE_SIZE,
            color: GREY,
        });
        canvas.text_at(margin, top - NOTE_LINE_HEIGHT, "(chart unavailable: N/A)");
        canvas.set_y(top - NOTE_LINE_HEIGHT - 10.0);
    }
    Ok(())
}

fn base_table(
    title: Option<String>,
    column_widths: Vec<f32>,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
) -> TableSpec {
    TableSpec {
        title,
        indent: 10.0,
        column_widths,
        headers,
        rows,
        aligns: Vec::new(),
        zebra: [WHITESMOKE, LIGHTGREY],
        header_fill: BURGUNDY,
        header_text_color: WHITE,
        font_size: 11.0,
        row_height: 20.0,
        header_height: 22.0,
    }
}

fn allocation_table(alloc: &[Allocation]) -> TableSpec {
    base_table(
        None,
        vec![140.0, 80.0],
        vec!["Asset Class".to_string(), "Weight".to_string()],
        alloc
            .iter()
            .map(|a| vec![a.asset_class.clone(), format!("{:.1}%", a.weight_pct)])
            .collect(),
    )
}

fn comparison_table(usable_width: f32, mc: &ModelComparison) -> TableSpec {
    let metric_col = 150.0;
    let n = mc.model_names.len().max(1);
    let per_model = ((usable_width - 20.0 - metric_col) / n as f32).min(110.0);

    let mut widths = vec![metric_col];
    widths.extend(std::iter::repeat_n(per_model, n));

    let mut headers = vec!["Metric".to_string()];
    headers.extend(mc.model_names.iter().cloned());

    let rows = mc
        .metrics
        .iter()
        .map(|row| {
            let mut cells = vec![row.name.clone()];
            cells.extend((0..n).map(|i| {
                row.values
                    .get(i)
                    .map(|v| format!("{v:.2}"))
                    .unwrap_or_else(|| "-".to_string())
            }));
            cells
        })
        .collect();

    base_table(None, widths, headers, rows)
}

fn delta_table(current: &[Allocation], proposed: &[Allocation]) -> TableSpec {
    let rows = commentary::allocation_pairs(current, proposed)
        .into_iter()
        .map(|(class, cur, tgt)| {
            vec![
                class.to_string(),
                format!("{cur:.1}%"),
                format!("{tgt:.1}%"),
                format!("{:+.1}%", tgt - cur),
            ]
        })
        .collect();
    base_table(
        Some("Current vs Target Allocation".to_string()),
        vec![160.0, 90.0, 90.0, 95.0],
        vec![
            "Asset Class".to_string(),
            "Current".to_string(),
            "Target".to_string(),
            "Change".to_string(),
        ],
        rows,
    )
}

fn holdings_table(holdings: &[String]) -> TableSpec {
    let split = holdings.len().div_ceil(2);
    let rows = (0..split)
        .map(|i| {
            vec![
                holdings[i].clone(),
                holdings.get(split + i).cloned().unwrap_or_default(),
            ]
        })
        .collect();
    let mut spec = base_table(None, vec![240.0, 240.0], Vec::new(), rows);
    spec.aligns = vec![ColumnAlign::Left, ColumnAlign::Left];
    spec
}

fn returns_table(metrics: &[ReturnMetrics]) -> TableSpec {
    base_table(
        Some("Return & Risk Metrics".to_string()),
        vec![85.0, 100.0, 100.0, 100.0, 80.0],
        vec![
            "Symbol".to_string(),
            "Cumulative".to_string(),
            "Annualized".to_string(),
            "Volatility".to_string(),
            "Sharpe".to_string(),
        ],
        metrics
            .iter()
            .map(|m| {
                vec![
                    m.symbol.clone(),
                    format!("{:.1}%", m.cumulative_pct),
                    format!("{:.1}%", m.annualized_pct),
                    format!("{:.1}%", m.volatility_pct),
                    format!("{:.2}", m.sharpe),
                ]
            })
            .collect(),
    )
}

fn risk_table(metrics: &[RiskMetrics]) -> TableSpec {
    base_table(
        Some("Downside Risk Metrics".to_string()),
        vec![100.0, 110.0, 125.0, 130.0],
        vec![
            "Symbol".to_string(),
            "Volatility".to_string(),
            "Max Drawdown".to_string(),
            "Downside Dev.".to_string(),
        ],
        metrics
            .iter()
            .map(|m| {
                vec![
                    m.symbol.clone(),
                    format!("{:.1}%", m.volatility_pct),
                    format!("{:.1}%", m.max_drawdown_pct),
                    format!("{:.1}%", m.downside_deviation_pct),
                ]
            })
            .collect(),
    )
}
