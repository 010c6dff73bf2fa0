//! Reporting and output generation
//!
//! Global invariants enforced:
//! - Deterministic output ordering
//! - Byte-for-byte identical output across runs

use crate::engine::{compute_metrics, Metrics, Tier};
use crate::error::Condition;
use crate::explain::fte_summary;
use crate::format::{
    format_currency, format_number, format_per_document, format_percent, format_ratio,
};
use crate::inputs::Configuration;
use crate::pricing::PricingParams;
use crate::sensitivity::{Sensitivity, SensitivityPoint};
use serde::{Deserialize, Serialize};

/// One complete cost comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Estimate {
    pub configuration: Configuration,
    pub params: PricingParams,
    pub metrics: Metrics,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub sensitivity: Option<Sensitivity>,
}

impl Estimate {
    /// Compute metrics for `config` without sensitivity series
    pub fn new(config: &Configuration, params: &PricingParams) -> Self {
        Estimate {
            configuration: *config,
            params: *params,
            metrics: compute_metrics(config, params),
            sensitivity: None,
        }
    }

    /// Attach sensitivity series over the given sample points
    pub fn with_sensitivity(mut self, minutes: &[f64], pages: &[f64]) -> Self {
        self.sensitivity = Some(Sensitivity::with_samples(
            &self.configuration,
            &self.params,
            &self.metrics,
            minutes,
            pages,
        ));
        self
    }
}

/// Render an estimate as text output
pub fn render_text(estimate: &Estimate) -> String {
    let config = &estimate.configuration;
    let metrics = &estimate.metrics;
    let mut output = String::new();

    // Assumptions
    output.push_str("Assumptions\n");
    output.push_str(&format!(
        "  Documents: {}  Pages/doc: {}  Fields/doc: {}  Minutes/doc: {:.1}\n",
        format_number(config.document_count as f64),
        format_number(config.pages_per_document),
        format_number(config.fields_per_document),
        config.human_seconds_per_document / 60.0,
    ));
    output.push_str(&format!(
        "  Enhanced pages: {}%  Image documents: {}%\n",
        format_number(config.enhanced_page_percentage),
        format_number(config.image_page_percentage),
    ));
    output.push('\n');

    // Summary
    let fte = fte_summary(metrics, &estimate.params);
    output.push_str("Summary\n");
    output.push_str(&format!("  {:<16} {:<14} {}\n", "", "Standard", "Expert"));
    output.push_str(&format!(
        "  {:<16} {:<14} {}\n",
        "ROI",
        format_percent(metrics.roi_standard_percent),
        format_percent(metrics.roi_expert_percent),
    ));
    output.push_str(&format!(
        "  {:<16} {:<14} {}\n",
        "Net savings",
        savings_with_badge(metrics, Tier::Standard),
        savings_with_badge(metrics, Tier::Expert),
    ));
    let break_even: Vec<String> = Tier::ALL
        .iter()
        .map(|&tier| format!("{} docs", format_number(metrics.break_even_documents(tier) as f64)))
        .collect();
    output.push_str(&format!(
        "  {:<16} {:<14} {}\n",
        "Break-even", break_even[0], break_even[1],
    ));
    output.push_str(&format!(
        "  {:<16} {} ({}){}\n",
        "FTEs required",
        format_number(fte.headcount as f64),
        fte.subtext,
        if fte.critical { " [critical]" } else { "" },
    ));
    output.push_str(&format!(
        "  {:<16} {}\n",
        "AI cost",
        format_currency(metrics.ai_total_cost)
    ));
    output.push('\n');

    // Comparison table
    output.push_str(&format!(
        "{:<18} {:<10} {:<10} {:<12} {:<10} {:<12} {}\n",
        "METHOD", "RATE", "HOURS", "TOTAL", "PER DOC", "SAVINGS", "RATIO"
    ));
    let pack_price = format!("${}/pack", format_number(estimate.params.cost_per_pack));
    output.push_str(&format!(
        "{:<18} {:<10} {:<10} {:<12} {:<10} {:<12} {}\n",
        "AI Processing",
        pack_price,
        "-",
        format_currency(metrics.ai_total_cost),
        format_per_document(metrics.ai_cost_per_document),
        "-",
        "-",
    ));
    for tier in Tier::ALL {
        let rate = format!("${:.2}/h", tier.hourly_rate(config));
        let ratio = format!("{:.2}x", metrics.efficiency_ratio(tier));
        output.push_str(&format!(
            "{:<18} {:<10} {:<10} {:<12} {:<10} {:<12} {}\n",
            truncate_or_pad(tier.label(), 18),
            rate,
            format_number(metrics.total_human_hours.round()),
            format_currency(metrics.labor_cost(tier)),
            format_per_document(metrics.cost_per_document(tier)),
            format_currency(metrics.net_savings(tier)),
            ratio,
        ));
    }

    // Insight
    if let Some(ratio) = metrics.cheaper_ratio(Tier::Standard) {
        output.push('\n');
        output.push_str(&format!(
            "AI is {} cheaper per document than standard manual processing.\n",
            format_ratio(ratio)
        ));
    }

    // Degenerate inputs
    if !metrics.conditions.is_empty() {
        output.push('\n');
        for condition in &metrics.conditions {
            output.push_str(&format!("Note: {}\n", condition_note(*condition)));
        }
    }

    if let Some(ref sensitivity) = estimate.sensitivity {
        output.push('\n');
        output.push_str(&render_series("Time sensitivity (minutes/doc)", &sensitivity.time));
        output.push('\n');
        output.push_str(&render_series("Page sensitivity (pages/doc)", &sensitivity.pages));
    }

    output
}

/// Render an estimate as JSON output
pub fn render_json(estimate: &Estimate) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(estimate)?)
}

fn savings_with_badge(metrics: &Metrics, tier: Tier) -> String {
    let savings = metrics.net_savings(tier);
    let badge = if savings > 0.0 {
        format_ratio(metrics.efficiency_ratio(tier))
    } else {
        "Loss".to_string()
    };
    format!("{} ({})", format_currency(savings), badge)
}

fn condition_note(condition: Condition) -> &'static str {
    match condition {
        Condition::DivisionUndefined => "no documents, per-document costs are undefined",
        Condition::ZeroInvestmentGuard => "AI cost is zero, ROI and ratios are reported as 0",
    }
}

fn render_series(title: &str, points: &[SensitivityPoint]) -> String {
    let mut output = String::new();
    output.push_str(title);
    output.push('\n');
    output.push_str(&format!(
        "  {:<8} {:<12} {:<12} {}\n",
        "X", "AI", "STANDARD", "EXPERT"
    ));
    for point in points {
        output.push_str(&format!(
            "  {:<8} {:<12} {:<12} {}\n",
            format_number(point.x),
            format_currency(point.ai_cost),
            format_currency(point.standard_cost),
            format_currency(point.expert_cost),
        ));
    }
    output
}

/// Truncate or pad string to fixed width
fn truncate_or_pad(s: &str, width: usize) -> String {
    if s.chars().count() > width {
        let kept: String = s.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        format!("{:<width$}", s, width = width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensitivity::{PAGE_SAMPLE_COUNTS, TIME_SAMPLE_MINUTES};

    fn default_estimate() -> Estimate {
        Estimate::new(&Configuration::default(), &PricingParams::default())
    }

    #[test]
    fn test_render_text_summary() {
        let text = render_text(&default_estimate());
        assert!(text.contains("1,338%"));
        assert!(text.contains("$27K (14.4x)"));
        assert!(text.contains("696 docs"));
        assert!(text.contains("2 (approx 1.4 years)"));
        assert!(text.contains("AI is 14.4x cheaper per document"));
        assert!(!text.contains("Note:"));
        assert!(!text.contains("Time sensitivity"));
    }

    #[test]
    fn test_render_text_table_rows() {
        let text = render_text(&default_estimate());
        let standard = text
            .lines()
            .find(|l| l.starts_with("Human (Standard)"))
            .unwrap();
        assert!(standard.contains("$15.00/h"));
        assert!(standard.contains("1,917"));
        assert!(standard.contains("$2.8750"));
        assert!(standard.ends_with("14.38x"));

        let ai = text.lines().find(|l| l.starts_with("AI Processing")).unwrap();
        assert!(ai.contains("$2,000/pack"));
        assert!(ai.contains("$0.2000"));
    }

    #[test]
    fn test_render_text_zero_documents() {
        let config = Configuration {
            document_count: 0,
            ..Configuration::default()
        };
        let text = render_text(&Estimate::new(&config, &PricingParams::default()));
        assert!(text.contains("n/a"));
        assert!(text.contains("Loss"));
        assert!(text.contains("Note: no documents"));
        assert!(text.contains("Note: AI cost is zero"));
        assert!(!text.contains("cheaper per document"));
    }

    #[test]
    fn test_render_text_with_sensitivity() {
        let estimate = default_estimate().with_sensitivity(&TIME_SAMPLE_MINUTES, &PAGE_SAMPLE_COUNTS);
        let text = render_text(&estimate);
        assert!(text.contains("Time sensitivity (minutes/doc)"));
        assert!(text.contains("Page sensitivity (pages/doc)"));
        // 10_000 docs * 30 min at $200/h
        assert!(text.contains("$1.00M"));
    }

    #[test]
    fn test_render_json_shape() {
        let estimate = default_estimate().with_sensitivity(&[5.0], &[1.0]);
        let json: serde_json::Value =
            serde_json::from_str(&render_json(&estimate).unwrap()).unwrap();
        assert_eq!(json["configuration"]["document_count"], 10_000);
        assert_eq!(json["metrics"]["packs_required"], 1);
        assert_eq!(json["params"]["cost_per_pack"], 2_000.0);
        assert_eq!(json["sensitivity"]["time"].as_array().unwrap().len(), 1);
        assert!(json["metrics"].get("conditions").is_none());
    }

    #[test]
    fn test_render_json_omits_missing_sensitivity() {
        let json: serde_json::Value =
            serde_json::from_str(&render_json(&default_estimate()).unwrap()).unwrap();
        assert!(json.get("sensitivity").is_none());
    }

    #[test]
    fn test_render_is_deterministic() {
        let a = render_text(&default_estimate());
        let b = render_text(&default_estimate());
        assert_eq!(a, b);
    }

    #[test]
    fn test_truncate_or_pad() {
        assert_eq!(truncate_or_pad("abc", 5), "abc  ");
        assert_eq!(truncate_or_pad("abcdefgh", 6), "abc...");
    }
}
