#![allow(dead_code)]

use folio_report::{
    Allocation, AssetClassComment, ChartImage, ImageFormat, MetricRow, ModelComparison,
    ReportCharts, ReportContent, ReturnMetrics, RiskMetrics,
};

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

pub fn count(haystack: &[u8], needle: &[u8]) -> usize {
    if needle.is_empty() {
        return 0;
    }
    haystack.windows(needle.len()).filter(|w| *w == needle).count()
}

/// Inflate every Flate stream in a finished PDF, in file order.
pub fn flate_streams(pdf: &[u8]) -> Vec<Vec<u8>> {
    let mut out = Vec::new();
    let marker = b"stream\n";
    let mut i = 0;
    while let Some(pos) = find(&pdf[i..], marker) {
        let start = i + pos + marker.len();
        let Some(end_rel) = find(&pdf[start..], b"endstream") else {
            break;
        };
        let mut end = start + end_rel;
        while end > start && (pdf[end - 1] == b'\n' || pdf[end - 1] == b'\r') {
            end -= 1;
        }
        if let Ok(data) = miniz_oxide::inflate::decompress_to_vec_zlib(&pdf[start..end]) {
            out.push(data);
        }
        i = start + end_rel + b"endstream".len();
    }
    out
}

/// Document bytes with every stream payload removed, leaving only the object
/// and dictionary structure. Tiny streams deflate into stored blocks that
/// still contain their operator text literally, so resource-name assertions
/// must not run against the raw file.
pub fn without_stream_data(pdf: &[u8]) -> Vec<u8> {
    let marker = b"stream\n";
    let mut out = Vec::with_capacity(pdf.len());
    let mut i = 0;
    while let Some(pos) = find(&pdf[i..], marker) {
        let start = i + pos + marker.len();
        out.extend_from_slice(&pdf[i..start]);
        match find(&pdf[start..], b"endstream") {
            Some(end_rel) => {
                // Skip past the keyword itself so the trailing "stream\n" in
                // "endstream\n" is not mistaken for the next stream start.
                out.extend_from_slice(b"endstream");
                i = start + end_rel + b"endstream".len();
            }
            None => {
                i = pdf.len();
                break;
            }
        }
    }
    out.extend_from_slice(&pdf[i..]);
    out
}

/// Page content streams only (streams carrying text operators), in page order.
pub fn text_streams(pdf: &[u8]) -> Vec<Vec<u8>> {
    flate_streams(pdf)
        .into_iter()
        .filter(|s| find(s, b"BT").is_some())
        .collect()
}

pub fn tiny_png(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb(rgb));
    let mut out = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .expect("encode fixture png");
    out.into_inner()
}

pub fn chart(rgb: [u8; 3], pixels: (u32, u32), display: (f32, f32)) -> ChartImage {
    ChartImage {
        data: tiny_png(pixels.0, pixels.1, rgb),
        format: ImageFormat::Png,
        pixel_width: pixels.0,
        pixel_height: pixels.1,
        display_width: display.0,
        display_height: display.1,
    }
}

/// A fully populated report, every section and chart slot present.
pub fn sample_content() -> ReportContent {
    ReportContent {
        client_name: "Halvorsen Family Office".to_string(),
        report_date: "29 August 2026".to_string(),
        investment_amount: Some(2_500_000.0),
        executive_summary: "This report reviews the current portfolio against the agreed \
mandate and proposes a rebalanced allocation. The recommended changes reduce concentration \
risk while keeping the expected return profile intact.\nAll figures are stated in USD unless \
noted otherwise."
            .to_string(),
        macro_commentary: "Growth has cooled across developed markets while inflation \
continues to normalise. Central banks are expected to ease gradually over the coming \
quarters, supporting duration assets and quality equities."
            .to_string(),
        asset_class_outlook: vec![
            AssetClassComment {
                name: "Global Equities".to_string(),
                commentary: "Earnings revisions have stabilised and valuations sit near \
long-term averages. We keep a neutral stance with a quality tilt, favouring balance sheets \
that can absorb slower nominal growth."
                    .to_string(),
            },
            AssetClassComment {
                name: "Government Bonds".to_string(),
                commentary: "Real yields remain attractive relative to the past decade. \
Duration adds ballast against growth disappointments and is the primary diversifier in the \
proposed allocation."
                    .to_string(),
            },
            AssetClassComment {
                name: "Commodities".to_string(),
                commentary: "Supply discipline supports energy while industrial metals track \
the capex cycle. A modest allocation hedges inflation surprises."
                    .to_string(),
            },
        ],
        current_allocation: vec![
            Allocation {
                asset_class: "Equities".to_string(),
                weight_pct: 55.0,
            },
            Allocation {
                asset_class: "Bonds".to_string(),
                weight_pct: 30.0,
            },
            Allocation {
                asset_class: "Commodities".to_string(),
                weight_pct: 10.0,
            },
            Allocation {
                asset_class: "Cash".to_string(),
                weight_pct: 5.0,
            },
        ],
        proposed_allocation: vec![
            Allocation {
                asset_class: "Equities".to_string(),
                weight_pct: 48.0,
            },
            Allocation {
                asset_class: "Bonds".to_string(),
                weight_pct: 35.0,
            },
            Allocation {
                asset_class: "Commodities".to_string(),
                weight_pct: 12.0,
            },
            Allocation {
                asset_class: "Cash".to_string(),
                weight_pct: 5.0,
            },
        ],
        model_comparison: ModelComparison {
            model_names: vec![
                "Max Sharpe".to_string(),
                "Min CVaR".to_string(),
                "Risk Parity".to_string(),
            ],
            metrics: vec![
                MetricRow {
                    name: "Sharpe Ratio".to_string(),
                    values: vec![1.12, 0.94, 0.88],
                },
                MetricRow {
                    name: "Sortino Ratio".to_string(),
                    values: vec![1.41, 1.52, 1.10],
                },
                MetricRow {
                    name: "CVaR at 95%".to_string(),
                    values: vec![-2.8, -1.9, -2.2],
                },
            ],
        },
        holdings: vec![
            "VWCE - Vanguard FTSE All-World".to_string(),
            "AGGH - iShares Core Global Bond".to_string(),
            "SGLD - Invesco Physical Gold".to_string(),
            "EIMI - iShares EM IMI".to_string(),
            "IB01 - iShares Treasury 0-1yr".to_string(),
        ],
        return_metrics: vec![
            ReturnMetrics {
                symbol: "VWCE".to_string(),
                cumulative_pct: 42.3,
                annualized_pct: 9.1,
                volatility_pct: 14.2,
                sharpe: 0.64,
            },
            ReturnMetrics {
                symbol: "AGGH".to_string(),
                cumulative_pct: 6.8,
                annualized_pct: 1.7,
                volatility_pct: 5.1,
                sharpe: 0.33,
            },
            ReturnMetrics {
                symbol: "SGLD".to_string(),
                cumulative_pct: 38.9,
                annualized_pct: 8.5,
                volatility_pct: 12.8,
                sharpe: 0.66,
            },
        ],
        risk_metrics: vec![
            RiskMetrics {
                symbol: "VWCE".to_string(),
                volatility_pct: 14.2,
                max_drawdown_pct: -21.5,
                downside_deviation_pct: 9.8,
            },
            RiskMetrics {
                symbol: "AGGH".to_string(),
                volatility_pct: 5.1,
                max_drawdown_pct: -8.2,
                downside_deviation_pct: 3.4,
            },
            RiskMetrics {
                symbol: "SGLD".to_string(),
                volatility_pct: 12.8,
                max_drawdown_pct: -14.0,
                downside_deviation_pct: 8.1,
            },
        ],
        charts: ReportCharts {
            proposed_pie: Some(chart([180, 40, 40], (40, 40), (200.0, 200.0))),
            allocation_bars: Some(chart([40, 180, 40], (60, 30), (480.0, 180.0))),
            rebased_returns: Some(chart([40, 40, 180], (60, 40), (270.0, 180.0))),
            volatility_bars: Some(chart([90, 90, 20], (60, 40), (270.0, 180.0))),
            sharpe_bars: Some(chart([20, 90, 90], (60, 30), (480.0, 170.0))),
            correlation_heatmap: Some(chart([120, 60, 120], (40, 40), (240.0, 220.0))),
            efficient_frontier: Some(chart([60, 120, 60], (50, 40), (260.0, 200.0))),
            backtest: Some(chart([150, 90, 30], (60, 30), (480.0, 190.0))),
            monte_carlo: Some(chart([30, 90, 150], (60, 30), (480.0, 190.0))),
        },
        cover_background: Some(chart([30, 30, 60], (30, 42), (595.0, 842.0))),
        logo: Some(chart([200, 160, 40], (32, 20), (80.0, 50.0))),
    }
}
