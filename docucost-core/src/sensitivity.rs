//! Sensitivity series for visualization
//!
//! Each series varies one input while holding the other side of the
//! comparison at its base value. The configuration is never mutated.

use crate::engine::Metrics;
use crate::inputs::{effective_pages, effective_units_per_page_with_multiplier, Configuration};
use crate::pricing::PricingParams;
use serde::{Deserialize, Serialize};

/// Canonical minutes-per-document sample points
pub const TIME_SAMPLE_MINUTES: [f64; 6] = [1.0, 5.0, 10.0, 15.0, 20.0, 30.0];
/// Canonical pages-per-document sample points
pub const PAGE_SAMPLE_COUNTS: [f64; 6] = [1.0, 5.0, 10.0, 20.0, 50.0, 100.0];

/// One sample of a sensitivity series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SensitivityPoint {
    /// Sampled input value (minutes or pages per document)
    pub x: f64,
    pub ai_cost: f64,
    pub standard_cost: f64,
    pub expert_cost: f64,
}

/// Both canonical series for one configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Sensitivity {
    pub time: Vec<SensitivityPoint>,
    pub pages: Vec<SensitivityPoint>,
}

impl Sensitivity {
    /// Series over the canonical sample points
    pub fn generate(config: &Configuration, params: &PricingParams, base: &Metrics) -> Self {
        Self::with_samples(
            config,
            params,
            base,
            &TIME_SAMPLE_MINUTES,
            &PAGE_SAMPLE_COUNTS,
        )
    }

    /// Series over caller-chosen sample points
    pub fn with_samples(
        config: &Configuration,
        params: &PricingParams,
        base: &Metrics,
        minutes: &[f64],
        pages: &[f64],
    ) -> Self {
        Sensitivity {
            time: time_sensitivity(config, base, minutes),
            pages: page_sensitivity(config, params, base, pages),
        }
    }
}

/// Labor cost at each minutes-per-document sample; AI cost held at base
pub fn time_sensitivity(
    config: &Configuration,
    base: &Metrics,
    minutes: &[f64],
) -> Vec<SensitivityPoint> {
    let documents = config.document_count as f64;
    minutes
        .iter()
        .map(|&min| {
            let hours = documents * min / 60.0;
            SensitivityPoint {
                x: min,
                ai_cost: base.ai_total_cost,
                standard_cost: hours * config.standard_hourly_rate,
                expert_cost: hours * config.expert_hourly_rate,
            }
        })
        .collect()
}

/// AI cost at each pages-per-document sample; labor cost held at base
pub fn page_sensitivity(
    config: &Configuration,
    params: &PricingParams,
    base: &Metrics,
    pages: &[f64],
) -> Vec<SensitivityPoint> {
    let documents = config.document_count as f64;
    let units_per_page = effective_units_per_page_with_multiplier(
        config.enhanced_page_percentage,
        params.enhanced_unit_multiplier,
    );
    pages
        .iter()
        .map(|&count| {
            let pages_per_document = effective_pages(count, config.image_page_percentage);
            let total_units = documents * pages_per_document * units_per_page;
            SensitivityPoint {
                x: count,
                ai_cost: params.cost_of(params.packs_for(total_units)),
                standard_cost: base.standard_labor_cost,
                expert_cost: base.expert_labor_cost,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::compute_metrics;

    fn config() -> Configuration {
        Configuration {
            document_count: 10_000,
            pages_per_document: 5.0,
            fields_per_document: 10.0,
            human_seconds_per_document: 690.0,
            standard_hourly_rate: 15.0,
            expert_hourly_rate: 200.0,
            enhanced_page_percentage: 0.0,
            image_page_percentage: 0.0,
        }
    }

    #[test]
    fn test_time_series_holds_ai_cost() {
        let config = config();
        let params = PricingParams::default();
        let base = compute_metrics(&config, &params);
        let series = time_sensitivity(&config, &base, &TIME_SAMPLE_MINUTES);

        assert_eq!(series.len(), 6);
        assert!(series.iter().all(|p| p.ai_cost == base.ai_total_cost));
        // 10_000 docs * 1 min = 166.67 h
        assert!((series[0].standard_cost - 2_500.0).abs() < 1e-9);
        assert!((series[5].expert_cost - 1_000_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_page_series_holds_labor_cost() {
        let config = config();
        let params = PricingParams::default();
        let base = compute_metrics(&config, &params);
        let series = page_sensitivity(&config, &params, &base, &PAGE_SAMPLE_COUNTS);

        let ai: Vec<f64> = series.iter().map(|p| p.ai_cost).collect();
        // 10_000 docs * pages units, 100_000 units per pack
        assert_eq!(
            ai,
            vec![2_000.0, 2_000.0, 2_000.0, 4_000.0, 10_000.0, 20_000.0]
        );
        assert!(series
            .iter()
            .all(|p| p.standard_cost == base.standard_labor_cost
                && p.expert_cost == base.expert_labor_cost));
    }

    #[test]
    fn test_page_series_matches_engine_at_configured_pages() {
        let config = Configuration {
            enhanced_page_percentage: 40.0,
            image_page_percentage: 25.0,
            ..config()
        };
        let params = PricingParams::default();
        let base = compute_metrics(&config, &params);
        let series = page_sensitivity(&config, &params, &base, &[config.pages_per_document]);
        assert_eq!(series[0].ai_cost, base.ai_total_cost);
    }

    #[test]
    fn test_generate_does_not_touch_config() {
        let config = config();
        let params = PricingParams::default();
        let base = compute_metrics(&config, &params);
        let before = config;
        let sensitivity = Sensitivity::generate(&config, &params, &base);
        assert_eq!(config, before);
        assert_eq!(sensitivity.time.len(), TIME_SAMPLE_MINUTES.len());
        assert_eq!(sensitivity.pages.len(), PAGE_SAMPLE_COUNTS.len());
    }
}
