//! Deterministic narrative text built from the structured metrics supplied
//! with the report. Every function returns None when its inputs are absent,
//! and the caller omits the corresponding paragraph.

use crate::model::{Allocation, MetricRow, ModelComparison, ReturnMetrics, RiskMetrics};

pub const UNIVERSE_NOTE: &str = "The investable universe is screened for liquidity, cost and \
replication quality before optimisation. Instruments listed here form the building blocks of \
the proposed portfolio.";

pub const HEATMAP_NOTE: &str = "The correlation heatmap shows pairwise co-movement of the \
selected instruments. Lighter cells indicate diversification potential, while dark cells mark \
pairs that tend to move together and add little incremental risk reduction.";

pub const FRONTIER_NOTE: &str = "Each dot represents a simulated portfolio; the curve traces \
the efficient frontier. The proposed allocation sits on the frontier at the risk level agreed \
for the mandate.";

pub const BACKTEST_NOTE: &str = "The backtest applies the proposed weights to historical data. \
Past performance is not indicative of future results and is shown for context only.";

pub const MONTE_CARLO_NOTE: &str = "Monte Carlo paths project the portfolio value distribution \
over the planning horizon. The shaded band spans the 5th to 95th percentile of simulated \
outcomes.";

/// Format a monetary amount with thousands separators, no decimals.
pub fn format_amount(amount: f64) -> String {
    let whole = amount.round() as i64;
    let digits = whole.abs().to_string();
    let mut out = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if whole < 0 {
        format!("-{out}")
    } else {
        out
    }
}

fn list_names(names: &[&str]) -> String {
    match names {
        [] => String::new(),
        [only] => (*only).to_string(),
        [a, b] => format!("{a} and {b}"),
        [head @ .., last] => format!("{} and {last}", head.join(", ")),
    }
}

pub fn allocation_overview(alloc: &[Allocation]) -> Option<String> {
    let largest = alloc.iter().max_by(|a, b| a.weight_pct.total_cmp(&b.weight_pct))?;
    let smallest = alloc.iter().min_by(|a, b| a.weight_pct.total_cmp(&b.weight_pct))?;
    Some(format!(
        "The allocation is anchored by {} at {:.1}% of assets, while {} is the smallest \
position at {:.1}%.",
        largest.asset_class, largest.weight_pct, smallest.asset_class, smallest.weight_pct,
    ))
}

pub fn proposed_structure(alloc: &[Allocation]) -> Option<String> {
    if alloc.is_empty() {
        return None;
    }
    let core: Vec<&str> = alloc
        .iter()
        .filter(|a| a.weight_pct >= 10.0)
        .map(|a| a.asset_class.as_str())
        .collect();
    let mut text = String::from("The target portfolio distributes capital across ");
    text.push_str(&format!("{} asset classes.", alloc.len()));
    if !core.is_empty() {
        text.push_str(&format!(
            " Core exposure is concentrated in {}, each carrying at least 10% of assets.",
            list_names(&core)
        ));
    }
    Some(text)
}

fn metric_row<'a>(mc: &'a ModelComparison, metric: &str) -> Option<&'a MetricRow> {
    mc.metrics.iter().find(|m| m.name.eq_ignore_ascii_case(metric))
}

fn best_model<'a>(mc: &'a ModelComparison, metric: &str) -> Option<(&'a str, f64)> {
    let row = metric_row(mc, metric)?;
    let (idx, value) = row
        .values
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.total_cmp(b))?;
    mc.model_names.get(idx).map(|name| (name.as_str(), *value))
}

// For CVaR the lower value wins.
fn lowest_model<'a>(mc: &'a ModelComparison, metric: &str) -> Option<(&'a str, f64)> {
    let row = metric_row(mc, metric)?;
    let (idx, value) = row
        .values
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.total_cmp(b))?;
    mc.model_names.get(idx).map(|name| (name.as_str(), *value))
}

pub fn model_summary(mc: &ModelComparison) -> Option<String> {
    if mc.model_names.is_empty() {
        return None;
    }
    let mut text = format!(
        "{} candidate optimisation models were evaluated over the common lookback window.",
        mc.model_names.len()
    );
    if let Some((name, value)) = best_model(mc, "Sharpe Ratio") {
        text.push_str(&format!(
            " The {name} model achieved the highest Sharpe ratio ({value:.2}), delivering the \
most return per unit of total risk."
        ));
    }
    if let Some((name, value)) = best_model(mc, "Sortino Ratio") {
        text.push_str(&format!(
            " {name} leads on the Sortino ratio ({value:.2}), rewarding upside while penalising \
only downside variability."
        ));
    }
    if let Some((name, value)) = lowest_model(mc, "CVaR at 95%") {
        text.push_str(&format!(
            " On tail risk, {name} reported the lowest CVaR at 95% ({value:.2})."
        ));
    }
    Some(text)
}

pub fn delta_summary(current: &[Allocation], proposed: &[Allocation]) -> Option<String> {
    if current.is_empty() && proposed.is_empty() {
        return None;
    }
    let mut increases: Vec<&str> = Vec::new();
    let mut decreases: Vec<&str> = Vec::new();
    let mut unchanged: Vec<&str> = Vec::new();

    for (class, cur, tgt) in allocation_pairs(current, proposed) {
        let delta = tgt - cur;
        if delta > 0.05 {
            increases.push(class);
        } else if delta < -0.05 {
            decreases.push(class);
        } else {
            unchanged.push(class);
        }
    }

    if increases.is_empty() && decreases.is_empty() {
        return Some(
            "The proposed allocation keeps the current weights unchanged.".to_string(),
        );
    }

    let mut parts: Vec<String> = Vec::new();
    if !increases.is_empty() {
        parts.push(format!(
            "Allocations to {} have been increased to reflect the updated outlook.",
            list_names(&increases)
        ));
    }
    if !decreases.is_empty() {
        parts.push(format!(
            "Exposure to {} has been reduced.",
            list_names(&decreases)
        ));
    }
    if !unchanged.is_empty() {
        parts.push(format!(
            "Weights for {} are unchanged.",
            list_names(&unchanged)
        ));
    }
    Some(parts.join(" "))
}

/// Union of asset classes with (current, target) weights; current order
/// first, then classes that only appear in the proposal.
pub fn allocation_pairs<'a>(
    current: &'a [Allocation],
    proposed: &'a [Allocation],
) -> Vec<(&'a str, f64, f64)> {
    let mut out: Vec<(&str, f64, f64)> = Vec::new();
    for cur in current {
        let tgt = proposed
            .iter()
            .find(|p| p.asset_class == cur.asset_class)
            .map(|p| p.weight_pct)
            .unwrap_or(0.0);
        out.push((cur.asset_class.as_str(), cur.weight_pct, tgt));
    }
    for tgt in proposed {
        if !current.iter().any(|c| c.asset_class == tgt.asset_class) {
            out.push((tgt.asset_class.as_str(), 0.0, tgt.weight_pct));
        }
    }
    out
}

pub fn returns_overview(metrics: &[ReturnMetrics]) -> Option<String> {
    let best = metrics
        .iter()
        .max_by(|a, b| a.cumulative_pct.total_cmp(&b.cumulative_pct))?;
    let worst = metrics
        .iter()
        .min_by(|a, b| a.cumulative_pct.total_cmp(&b.cumulative_pct))?;
    Some(format!(
        "Over the analysis window {} delivered the strongest cumulative return at {:.1}%, \
while {} trailed the selection at {:.1}%.",
        best.symbol, best.cumulative_pct, worst.symbol, worst.cumulative_pct,
    ))
}

pub fn volatility_overview(metrics: &[RiskMetrics]) -> Option<String> {
    let most = metrics
        .iter()
        .max_by(|a, b| a.volatility_pct.total_cmp(&b.volatility_pct))?;
    let least = metrics
        .iter()
        .min_by(|a, b| a.volatility_pct.total_cmp(&b.volatility_pct))?;
    Some(format!(
        "Realised volatility ranges from {:.1}% for {} down to {:.1}% for {}, which drives \
the sizing of each position.",
        most.volatility_pct, most.symbol, least.volatility_pct, least.symbol,
    ))
}

pub fn risk_summary(metrics: &[RiskMetrics]) -> Option<String> {
    let deepest = metrics
        .iter()
        .min_by(|a, b| a.max_drawdown_pct.total_cmp(&b.max_drawdown_pct))?;
    let downside = metrics
        .iter()
        .max_by(|a, b| a.downside_deviation_pct.total_cmp(&b.downside_deviation_pct))?;
    Some(format!(
        "The deepest drawdown in the selection belongs to {} at {:.1}%. {} shows the highest \
downside deviation ({:.1}%), and is therefore the main contributor to loss risk in stressed \
markets.",
        deepest.symbol, deepest.max_drawdown_pct, downside.symbol,
        downside.downside_deviation_pct,
    ))
}

pub fn sharpe_overview(metrics: &[ReturnMetrics]) -> Option<String> {
    let best = metrics.iter().max_by(|a, b| a.sharpe.total_cmp(&b.sharpe))?;
    Some(format!(
        "{} offers the best risk-adjusted profile of the selection with a Sharpe ratio of \
{:.2}.",
        best.symbol, best.sharpe,
    ))
}
