//! Per-metric breakdowns
//!
//! Each breakdown walks from the configuration to one headline metric, one
//! line per intermediate value, so the arithmetic can be checked by hand.

use crate::engine::{Metrics, Tier};
use crate::format::{format_currency, format_number, format_per_document, format_percent};
use crate::inputs::Configuration;
use crate::pricing::PricingParams;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Headcount above which staffing is flagged as critical
pub const FTE_CRITICAL_THRESHOLD: f64 = 5.0;

/// Metric a breakdown explains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Topic {
    Roi,
    Savings,
    BreakEven,
    Fte,
    Ai,
}

impl Topic {
    pub const ALL: [Topic; 5] = [
        Topic::Roi,
        Topic::Savings,
        Topic::BreakEven,
        Topic::Fte,
        Topic::Ai,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Roi => "roi",
            Topic::Savings => "savings",
            Topic::BreakEven => "break-even",
            Topic::Fte => "fte",
            Topic::Ai => "ai",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Topic::Roi => "Projected ROI Breakdown",
            Topic::Savings => "Net Estimated Savings Breakdown",
            Topic::BreakEven => "Break-Even Volume Analysis",
            Topic::Fte => "Est. FTEs Required Breakdown",
            Topic::Ai => "Est. AI Cost Breakdown",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Topic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Topic::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = Topic::ALL.iter().map(|t| t.as_str()).collect();
                format!("unknown metric '{}' (expected one of: {})", s, names.join(", "))
            })
    }
}

/// One labelled value in a breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownLine {
    pub label: String,
    pub value: String,
}

/// A titled group of lines, typically one per labor tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownSection {
    pub heading: String,
    pub lines: Vec<BreakdownLine>,
}

/// Complete explanation of one metric
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakdown {
    pub topic: Topic,
    pub title: String,
    pub sections: Vec<BreakdownSection>,
}

/// Headline staffing figure with its context line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FteSummary {
    /// Whole people needed (rounded up)
    pub headcount: u64,
    /// Working years when the work exceeds one year, hours otherwise
    pub subtext: String,
    pub critical: bool,
}

/// Headcount, subtext and critical flag for the staffing metric
pub fn fte_summary(metrics: &Metrics, params: &PricingParams) -> FteSummary {
    let fte = metrics.required_full_time_equivalents;
    let subtext = if metrics.total_human_hours > params.effective_annual_hours {
        format!("approx {:.1} years", metrics.equivalent_working_years)
    } else {
        format!("{} hours", format_number(metrics.total_human_hours.round()))
    };
    FteSummary {
        headcount: fte.ceil().max(0.0) as u64,
        subtext,
        critical: fte > FTE_CRITICAL_THRESHOLD,
    }
}

struct SectionBuilder {
    heading: String,
    lines: Vec<BreakdownLine>,
}

impl SectionBuilder {
    fn new(heading: impl Into<String>) -> Self {
        SectionBuilder {
            heading: heading.into(),
            lines: Vec::new(),
        }
    }

    fn line(mut self, label: &str, value: impl Into<String>) -> Self {
        self.lines.push(BreakdownLine {
            label: label.to_string(),
            value: value.into(),
        });
        self
    }

    fn build(self) -> BreakdownSection {
        BreakdownSection {
            heading: self.heading,
            lines: self.lines,
        }
    }
}

/// Build the breakdown for one metric
pub fn explain(
    topic: Topic,
    config: &Configuration,
    params: &PricingParams,
    metrics: &Metrics,
) -> Breakdown {
    let sections = match topic {
        Topic::Roi => roi_sections(metrics),
        Topic::Savings => savings_sections(config, metrics),
        Topic::BreakEven => break_even_sections(params, metrics),
        Topic::Fte => vec![fte_section(config, params, metrics)],
        Topic::Ai => vec![ai_section(params, metrics)],
    };
    Breakdown {
        topic,
        title: topic.title().to_string(),
        sections,
    }
}

fn roi_sections(metrics: &Metrics) -> Vec<BreakdownSection> {
    Tier::ALL
        .iter()
        .map(|&tier| {
            SectionBuilder::new(tier.label())
                .line("Manual labor cost", format_currency(metrics.labor_cost(tier)))
                .line("AI processing cost", format_currency(metrics.ai_total_cost))
                .line("Net savings", format_currency(metrics.net_savings(tier)))
                .line(
                    "ROI (net savings / AI cost)",
                    format_percent(metrics.roi_percent(tier)),
                )
                .build()
        })
        .collect()
}

fn savings_sections(config: &Configuration, metrics: &Metrics) -> Vec<BreakdownSection> {
    let ai = SectionBuilder::new("AI Processing")
        .line("AI units", format_number(metrics.total_units.ceil()))
        .line("Packs", metrics.packs_required.to_string())
        .line("Total cost", format_currency(metrics.ai_total_cost))
        .build();

    let mut sections = vec![ai];
    for tier in Tier::ALL {
        sections.push(
            SectionBuilder::new(tier.label())
                .line(
                    "Manual hours",
                    format_number(metrics.total_human_hours.round()),
                )
                .line("Hourly rate", format!("${:.2}", tier.hourly_rate(config)))
                .line("Manual labor cost", format_currency(metrics.labor_cost(tier)))
                .line("AI processing cost", format_currency(metrics.ai_total_cost))
                .line("Net savings", format_currency(metrics.net_savings(tier)))
                .line(
                    "Efficiency ratio",
                    format!("{:.1}x", metrics.efficiency_ratio(tier)),
                )
                .build(),
        );
    }
    sections
}

fn break_even_sections(params: &PricingParams, metrics: &Metrics) -> Vec<BreakdownSection> {
    Tier::ALL
        .iter()
        .map(|&tier| {
            SectionBuilder::new(tier.label())
                .line(
                    "Manual cost per document",
                    format_per_document(metrics.cost_per_document(tier)),
                )
                .line("Price of one pack", format_currency(params.cost_per_pack))
                .line(
                    "Break-even volume",
                    format!(
                        "{} documents",
                        format_number(metrics.break_even_documents(tier) as f64)
                    ),
                )
                .build()
        })
        .collect()
}

fn fte_section(
    config: &Configuration,
    params: &PricingParams,
    metrics: &Metrics,
) -> BreakdownSection {
    let summary = fte_summary(metrics, params);
    let mut builder = SectionBuilder::new("Staffing")
        .line("Documents", format_number(config.document_count as f64))
        .line(
            "Minutes per document",
            format!("{:.1}", config.human_seconds_per_document / 60.0),
        )
        .line(
            "Total manual hours",
            format_number(metrics.total_human_hours.round()),
        )
        .line(
            "Productive hours per employee-year",
            format_number(params.effective_annual_hours),
        )
        .line("FTEs required", format_number(summary.headcount as f64))
        .line(
            "Equivalent working years",
            format!("{:.1}", metrics.equivalent_working_years),
        );
    if summary.critical {
        builder = builder.line(
            "Warning",
            format!("more than {} FTEs required", FTE_CRITICAL_THRESHOLD),
        );
    }
    builder.build()
}

fn ai_section(params: &PricingParams, metrics: &Metrics) -> BreakdownSection {
    SectionBuilder::new("AI Processing")
        .line("Effective pages", format_number(metrics.total_pages.ceil()))
        .line(
            "AI units per page",
            format!("{:.2}", metrics.effective_units_per_page),
        )
        .line("Total AI units", format_number(metrics.total_units.ceil()))
        .line("Units per pack", format_number(params.units_per_pack))
        .line("Packs", metrics.packs_required.to_string())
        .line("Price per pack", format_currency(params.cost_per_pack))
        .line("Total cost", format_currency(metrics.ai_total_cost))
        .build()
}

/// Render a breakdown as indented text
pub fn render_breakdown(breakdown: &Breakdown) -> String {
    let mut output = String::new();
    output.push_str(&breakdown.title);
    output.push('\n');
    output.push_str(&"=".repeat(breakdown.title.len()));
    output.push('\n');

    let width = breakdown
        .sections
        .iter()
        .flat_map(|s| s.lines.iter())
        .map(|l| l.label.len())
        .max()
        .unwrap_or(0);

    for section in &breakdown.sections {
        output.push('\n');
        output.push_str(&section.heading);
        output.push('\n');
        for line in &section.lines {
            output.push_str(&format!(
                "  {:<width$}  {}\n",
                line.label,
                line.value,
                width = width
            ));
        }
    }
    output
}
