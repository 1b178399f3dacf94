mod error;
mod fonts;
mod model;
mod pdf;
mod report;

pub use error::Error;
pub use fonts::FontCatalog;
pub use model::{
    Allocation, AssetClassComment, ChartImage, ColumnAlign, FontId, ImageFormat, Justify,
    MetricRow, ModelComparison, ReportCharts, ReportContent, ReturnMetrics, Rgb, RiskMetrics,
    TableSpec, TextBlock, TextStyle, TocEntry,
};
pub use pdf::{
    A4_HEIGHT, A4_WIDTH, AssetStore, Canvas, ImageHandle, PageChrome, PageSet, PageStyle,
    TocRecorder, assembled_page, draw_table, draw_text_block, draw_text_block_bounded,
    justify_gap, merge, render_toc, table_height, toc_page_count, wrap,
};
pub use report::commentary;

use std::path::Path;
use std::time::Instant;

/// Render the full report and return the finished PDF bytes.
pub fn render_report(content: &ReportContent) -> Result<Vec<u8>, Error> {
    let t0 = Instant::now();
    let bytes = report::render(content)?;
    log::info!(
        "Timing: total={:.1}ms (output {} bytes)",
        t0.elapsed().as_secs_f64() * 1000.0,
        bytes.len(),
    );
    Ok(bytes)
}

/// Render the full report and write it to `output`.
pub fn render_report_to_file(content: &ReportContent, output: &Path) -> Result<(), Error> {
    let bytes = render_report(content)?;
    std::fs::write(output, &bytes).map_err(Error::Io)?;
    Ok(())
}
