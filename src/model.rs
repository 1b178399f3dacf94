pub type Rgb = [u8; 3];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FontId {
    Serif,
    SerifBold,
    SerifItalic,
    SerifBoldItalic,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub font: FontId,
    pub size: f32,
    pub color: Rgb,
}

/// Inter-word gap policy for wrapped lines. The last line of a paragraph and
/// single-word lines are always drawn left-aligned.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Justify {
    None,
    Full,
    /// Full justification with a per-gap ceiling in points. Lines whose gaps
    /// would exceed the ceiling get the ceiling instead of spanning the width.
    Capped(f32),
}

#[derive(Clone, Debug)]
pub struct TextBlock {
    pub text: String,
    pub style: TextStyle,
    /// Extra left inset from the page margin, in points.
    pub indent: f32,
    pub line_height: f32,
    /// Vertical gap after each paragraph ('\n'-separated), in points.
    pub paragraph_gap: f32,
    pub justify: Justify,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ColumnAlign {
    Left,
    Center,
}

#[derive(Clone, Debug)]
pub struct TableSpec {
    /// Centered bold title above the header band.
    pub title: Option<String>,
    /// Left inset from the page margin, in points.
    pub indent: f32,
    pub column_widths: Vec<f32>, // points
    /// Empty = no header band (plain zebra list).
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub aligns: Vec<ColumnAlign>,
    /// Alternating row fills, keyed on the original row index.
    pub zebra: [Rgb; 2],
    pub header_fill: Rgb,
    pub header_text_color: Rgb,
    pub font_size: f32,
    pub row_height: f32,
    pub header_height: f32,
}

impl TableSpec {
    pub fn total_width(&self) -> f32 {
        self.column_widths.iter().sum()
    }
}

/// One recorded heading: title plus the body page it appeared on
/// (page 1 being the cover).
#[derive(Clone, Debug, PartialEq)]
pub struct TocEntry {
    pub title: String,
    pub page: usize,
    pub indent: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ImageFormat {
    Jpeg,
    Png,
}

/// Pre-rendered raster chart, ready for embedding.
#[derive(Clone)]
pub struct ChartImage {
    pub data: Vec<u8>,
    pub format: ImageFormat,
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub display_width: f32,  // points
    pub display_height: f32, // points
}

#[derive(Clone, Debug)]
pub struct Allocation {
    pub asset_class: String,
    pub weight_pct: f64,
}

#[derive(Clone, Debug)]
pub struct AssetClassComment {
    pub name: String,
    pub commentary: String,
}

/// One metric row across all candidate models, e.g. "Sharpe Ratio".
/// `values` is parallel to `ModelComparison::model_names`.
#[derive(Clone, Debug)]
pub struct MetricRow {
    pub name: String,
    pub values: Vec<f64>,
}

#[derive(Clone, Debug, Default)]
pub struct ModelComparison {
    pub model_names: Vec<String>,
    pub metrics: Vec<MetricRow>,
}

#[derive(Clone, Debug)]
pub struct ReturnMetrics {
    pub symbol: String,
    pub cumulative_pct: f64,
    pub annualized_pct: f64,
    pub volatility_pct: f64,
    pub sharpe: f64,
}

#[derive(Clone, Debug)]
pub struct RiskMetrics {
    pub symbol: String,
    pub volatility_pct: f64,
    pub max_drawdown_pct: f64,
    pub downside_deviation_pct: f64,
}

/// Chart slots, all optional. A missing chart becomes a short note in the
/// rendered section rather than a failed report.
#[derive(Clone, Default)]
pub struct ReportCharts {
    pub proposed_pie: Option<ChartImage>,
    pub allocation_bars: Option<ChartImage>,
    pub rebased_returns: Option<ChartImage>,
    pub volatility_bars: Option<ChartImage>,
    pub sharpe_bars: Option<ChartImage>,
    pub correlation_heatmap: Option<ChartImage>,
    pub efficient_frontier: Option<ChartImage>,
    pub backtest: Option<ChartImage>,
    pub monte_carlo: Option<ChartImage>,
}

/// Everything the renderer draws. All numbers arrive precomputed; the
/// renderer does no financial math of its own.
#[derive(Clone, Default)]
pub struct ReportContent {
    pub client_name: String,
    /// Preformatted, e.g. "29 August 2026".
    pub report_date: String,
    pub investment_amount: Option<f64>,
    pub executive_summary: String,
    pub macro_commentary: String,
    pub asset_class_outlook: Vec<AssetClassComment>,
    pub current_allocation: Vec<Allocation>,
    pub proposed_allocation: Vec<Allocation>,
    pub model_comparison: ModelComparison,
    pub holdings: Vec<String>,
    pub return_metrics: Vec<ReturnMetrics>,
    pub risk_metrics: Vec<RiskMetrics>,
    pub charts: ReportCharts,
    pub cover_background: Option<ChartImage>,
    pub logo: Option<ChartImage>,
}
