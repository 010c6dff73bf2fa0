//! Metrics engine
//!
//! Global invariants enforced:
//! - Pure and deterministic: identical configuration and parameters yield
//!   identical metrics
//! - Input is never mutated; nothing is cached between calls
//! - No non-finite value ever reaches the metrics record
//!
//! AI cost is a step function of volume: units are bought in whole packs, so
//! cost jumps at every multiple of `units_per_pack` instead of scaling
//! continuously. ROI counts avoided labor cost only.

use crate::error::Condition;
use crate::inputs::{effective_pages, effective_units_per_page_with_multiplier, Configuration};
use crate::pricing::{PricingParams, SECONDS_PER_HOUR};
use serde::{Deserialize, Serialize};

/// Manual labor tier being compared against AI processing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Minimum-wage rate
    Standard,
    /// Expert consultant rate
    Expert,
}

impl Tier {
    pub const ALL: [Tier; 2] = [Tier::Standard, Tier::Expert];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Standard => "standard",
            Tier::Expert => "expert",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tier::Standard => "Human (Standard)",
            Tier::Expert => "Human (Expert)",
        }
    }

    pub fn hourly_rate(&self, config: &Configuration) -> f64 {
        match self {
            Tier::Standard => config.standard_hourly_rate,
            Tier::Expert => config.expert_hourly_rate,
        }
    }
}

/// Derived cost, ROI, break-even and staffing figures
///
/// Per-document figures are `None` when the document count is zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Metrics {
    pub effective_pages_per_document: f64,
    pub effective_units_per_page: f64,
    pub total_pages: f64,
    pub total_units: f64,
    pub packs_required: u64,
    pub ai_total_cost: f64,
    pub ai_cost_per_document: Option<f64>,
    pub total_human_hours: f64,
    pub standard_labor_cost: f64,
    pub expert_labor_cost: f64,
    pub standard_cost_per_document: Option<f64>,
    pub expert_cost_per_document: Option<f64>,
    pub net_savings_standard: f64,
    pub net_savings_expert: f64,
    pub roi_standard_percent: f64,
    pub roi_expert_percent: f64,
    pub efficiency_ratio_standard: f64,
    pub efficiency_ratio_expert: f64,
    pub break_even_documents_standard: u64,
    pub break_even_documents_expert: u64,
    pub required_full_time_equivalents: f64,
    pub equivalent_working_years: f64,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub conditions: Vec<Condition>,
}

impl Metrics {
    pub fn labor_cost(&self, tier: Tier) -> f64 {
        match tier {
            Tier::Standard => self.standard_labor_cost,
            Tier::Expert => self.expert_labor_cost,
        }
    }

    pub fn cost_per_document(&self, tier: Tier) -> Option<f64> {
        match tier {
            Tier::Standard => self.standard_cost_per_document,
            Tier::Expert => self.expert_cost_per_document,
        }
    }

    pub fn net_savings(&self, tier: Tier) -> f64 {
        match tier {
            Tier::Standard => self.net_savings_standard,
            Tier::Expert => self.net_savings_expert,
        }
    }

    pub fn roi_percent(&self, tier: Tier) -> f64 {
        match tier {
            Tier::Standard => self.roi_standard_percent,
            Tier::Expert => self.roi_expert_percent,
        }
    }

    pub fn efficiency_ratio(&self, tier: Tier) -> f64 {
        match tier {
            Tier::Standard => self.efficiency_ratio_standard,
            Tier::Expert => self.efficiency_ratio_expert,
        }
    }

    pub fn break_even_documents(&self, tier: Tier) -> u64 {
        match tier {
            Tier::Standard => self.break_even_documents_standard,
            Tier::Expert => self.break_even_documents_expert,
        }
    }

    /// How many times cheaper AI is per document than manual work at `tier`
    pub fn cheaper_ratio(&self, tier: Tier) -> Option<f64> {
        let ai = self.ai_cost_per_document.filter(|c| *c > 0.0)?;
        self.cost_per_document(tier).map(|manual| manual / ai)
    }

    pub fn has_condition(&self, condition: Condition) -> bool {
        self.conditions.contains(&condition)
    }
}

/// Compute all metrics for a configuration
pub fn compute_metrics(config: &Configuration, params: &PricingParams) -> Metrics {
    let mut conditions = Vec::new();
    let documents = config.document_count as f64;

    // AI side
    let effective_pages_per_document = finite(effective_pages(
        config.pages_per_document,
        config.image_page_percentage,
    ));
    let units_per_page = finite(effective_units_per_page_with_multiplier(
        config.enhanced_page_percentage,
        params.enhanced_unit_multiplier,
    ));
    let total_pages = finite(documents * effective_pages_per_document);
    let total_units = finite(total_pages * units_per_page);
    let packs_required = params.packs_for(total_units);
    let ai_total_cost = params.cost_of(packs_required);

    // Manual side
    let total_human_hours =
        finite(documents * config.human_seconds_per_document / SECONDS_PER_HOUR);
    let standard_labor_cost = finite(total_human_hours * config.standard_hourly_rate);
    let expert_labor_cost = finite(total_human_hours * config.expert_hourly_rate);

    let per_document = |total: f64| -> Option<f64> {
        if config.document_count == 0 {
            None
        } else {
            Some(total / documents)
        }
    };
    if config.document_count == 0 {
        conditions.push(Condition::DivisionUndefined);
    }
    let ai_cost_per_document = per_document(ai_total_cost);
    let standard_cost_per_document = per_document(standard_labor_cost);
    let expert_cost_per_document = per_document(expert_labor_cost);

    let net_savings_standard = standard_labor_cost - ai_total_cost;
    let net_savings_expert = expert_labor_cost - ai_total_cost;

    if ai_total_cost <= 0.0 {
        conditions.push(Condition::ZeroInvestmentGuard);
    }
    let over_investment = |value: f64| -> f64 {
        if ai_total_cost > 0.0 {
            value / ai_total_cost
        } else {
            0.0
        }
    };

    let annual_hours = |hours: f64| -> f64 {
        if params.effective_annual_hours > 0.0 {
            hours / params.effective_annual_hours
        } else {
            0.0
        }
    };
    let full_time_equivalents = annual_hours(total_human_hours);

    Metrics {
        effective_pages_per_document,
        effective_units_per_page: units_per_page,
        total_pages,
        total_units,
        packs_required,
        ai_total_cost,
        ai_cost_per_document,
        total_human_hours,
        standard_labor_cost,
        expert_labor_cost,
        standard_cost_per_document,
        expert_cost_per_document,
        net_savings_standard,
        net_savings_expert,
        roi_standard_percent: over_investment(net_savings_standard) * 100.0,
        roi_expert_percent: over_investment(net_savings_expert) * 100.0,
        efficiency_ratio_standard: over_investment(standard_labor_cost),
        efficiency_ratio_expert: over_investment(expert_labor_cost),
        break_even_documents_standard: break_even_documents(
            params.cost_per_pack,
            standard_cost_per_document,
        ),
        break_even_documents_expert: break_even_documents(
            params.cost_per_pack,
            expert_cost_per_document,
        ),
        required_full_time_equivalents: full_time_equivalents,
        equivalent_working_years: full_time_equivalents,
        conditions,
    }
}

/// Documents until manual cost exceeds the price of exactly one pack
///
/// Deliberately a one-pack proxy, not the intersection of the manual cost line
/// with the AI cost staircase beyond the first pack.
pub fn break_even_documents(cost_per_pack: f64, cost_per_document: Option<f64>) -> u64 {
    match cost_per_document {
        Some(cost) if cost > 0.0 => (cost_per_pack / cost).ceil() as u64,
        _ => 0,
    }
}

fn finite(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_config() -> impl Strategy<Value = Configuration> {
        (
            0u64..5_000_000,
            1.0..200.0f64,
            0.0..50.0f64,
            0.0..7_200.0f64,
            0.0..500.0f64,
            0.0..100.0f64,
            0.0..100.0f64,
        )
            .prop_map(|(docs, pages, fields, secs, rate, enhanced, image)| Configuration {
                document_count: docs,
                pages_per_document: pages,
                fields_per_document: fields,
                human_seconds_per_document: secs,
                standard_hourly_rate: rate,
                expert_hourly_rate: rate * 10.0,
                enhanced_page_percentage: enhanced,
                image_page_percentage: image,
            })
    }

    proptest! {
        #[test]
        fn ai_cost_is_whole_packs(config in arb_config()) {
            let params = PricingParams::default();
            let metrics = compute_metrics(&config, &params);
            prop_assert_eq!(metrics.ai_total_cost % 2_000.0, 0.0);
            prop_assert_eq!(
                metrics.packs_required,
                (metrics.total_units / 100_000.0).ceil() as u64
            );
        }

        #[test]
        fn costs_never_decrease_with_volume(config in arb_config(), extra in 1u64..100_000) {
            let params = PricingParams::default();
            let base = compute_metrics(&config, &params);
            let bigger = compute_metrics(
                &Configuration { document_count: config.document_count + extra, ..config },
                &params,
            );
            prop_assert!(bigger.ai_total_cost >= base.ai_total_cost);
            prop_assert!(bigger.standard_labor_cost >= base.standard_labor_cost);
            prop_assert!(bigger.expert_labor_cost >= base.expert_labor_cost);
        }

        #[test]
        fn metrics_are_always_finite(config in arb_config()) {
            let metrics = compute_metrics(&config, &PricingParams::default());
            let values = [
                metrics.total_units,
                metrics.ai_total_cost,
                metrics.roi_standard_percent,
                metrics.roi_expert_percent,
                metrics.efficiency_ratio_standard,
                metrics.required_full_time_equivalents,
            ];
            prop_assert!(values.iter().all(|v| v.is_finite()));
            if let Some(cost) = metrics.ai_cost_per_document {
                prop_assert!(cost.is_finite());
            }
        }
    }
}
