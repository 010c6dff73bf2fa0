//! Integration tests for docucost estimates

use docucost_core::config::{load_and_resolve, load_config_file};
use docucost_core::inputs::{parse_query_string, Field};
use docucost_core::{
    estimate, explain, render_json, render_text, resolve, Condition, Configuration, Preset,
    PricingParams, ResolvedConfig, Session, Topic,
};
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn resolved_fixture(name: &str) -> ResolvedConfig {
    let path = fixture_path(name);
    let dir = tempfile::tempdir().unwrap();
    load_and_resolve(dir.path(), Some(path.as_path())).unwrap()
}

#[test]
fn test_reference_scenario_from_query() {
    let raw = parse_query_string("?docs=10000&pages=5&img=0&mix=0&time=11.5&rate_std=15");
    let resolution = resolve(raw, &Configuration::default(), &PricingParams::default());
    assert!(resolution.recovered.is_empty());
    assert!(resolution.time_supplied);

    let metrics = docucost_core::compute_metrics(&resolution.config, &PricingParams::default());
    assert_eq!(metrics.total_pages, 50_000.0);
    assert_eq!(metrics.total_units, 50_000.0);
    assert_eq!(metrics.packs_required, 1);
    assert_eq!(metrics.ai_total_cost, 2_000.0);
    assert!((metrics.total_human_hours - 1_916.67).abs() < 0.01);
    assert!((metrics.standard_labor_cost - 28_750.05).abs() < 0.1);
    assert!((metrics.net_savings_standard - 26_750.05).abs() < 0.1);
    assert!((metrics.roi_standard_percent - 1_337.5).abs() < 0.01);
}

#[test]
fn test_zero_documents_never_panics() {
    let mut session = Session::new(Configuration::default(), PricingParams::default());
    session.set(Field::Documents, "0");
    let metrics = session.metrics();

    assert_eq!(metrics.ai_cost_per_document, None);
    assert_eq!(metrics.standard_cost_per_document, None);
    assert_eq!(metrics.expert_cost_per_document, None);
    assert!(metrics.has_condition(Condition::DivisionUndefined));

    let resolved = ResolvedConfig::defaults().unwrap();
    let result = estimate(session.config(), &resolved, true);
    assert!(render_text(&result).contains("n/a"));
    let json: serde_json::Value = serde_json::from_str(&render_json(&result).unwrap()).unwrap();
    assert!(json["metrics"]["standard_cost_per_document"].is_null());
}

#[test]
fn test_enhanced_pages_triple_units() {
    let params = PricingParams::default();
    let base = Configuration {
        enhanced_page_percentage: 0.0,
        ..Configuration::default()
    };
    let enhanced = Configuration {
        enhanced_page_percentage: 100.0,
        ..Configuration::default()
    };
    let base_metrics = docucost_core::compute_metrics(&base, &params);
    let enhanced_metrics = docucost_core::compute_metrics(&enhanced, &params);
    assert_eq!(enhanced_metrics.effective_units_per_page, 3.0);
    assert_eq!(enhanced_metrics.total_units, base_metrics.total_units * 3.0);
}

#[test]
fn test_pack_step_at_boundary() {
    let params = PricingParams::default();
    assert_eq!(params.packs_for(100_000.0), 1);
    assert_eq!(params.packs_for(100_000.0001), 2);
    assert_eq!(params.packs_for(0.0), 0);
}

#[test]
fn test_share_query_round_trip() {
    let mut session = Session::new(Configuration::default(), PricingParams::default());
    session.set(Field::Pages, "12");
    session.set(Field::ExpertRate, "175.5");
    session.set(Field::HumanTime, "9.25");

    let query = session.share_query();
    let (restored, recovered) = Session::from_query(
        parse_query_string(&query),
        Configuration::default(),
        PricingParams::default(),
    );
    assert!(recovered.is_empty());
    assert_eq!(restored.config(), session.config());
    assert_eq!(restored.metrics(), session.metrics());
}

#[test]
fn test_invalid_query_values_are_recovered() {
    let raw = parse_query_string("docs=lots&pages=&fields=NaN&mix=30");
    let resolution = resolve(raw, &Configuration::default(), &PricingParams::default());

    assert_eq!(resolution.recovered.len(), 3);
    assert_eq!(resolution.config.document_count, 0);
    assert_eq!(resolution.config.pages_per_document, 1.0);
    assert_eq!(resolution.config.fields_per_document, 5.0);
    assert_eq!(resolution.config.enhanced_page_percentage, 30.0);
    // Drivers changed without time: 5 * 60 + (0.5 + 0.5 * 1) * 30
    assert_eq!(resolution.config.human_seconds_per_document, 330.0);
}

#[test]
fn test_full_time_fixture() {
    let resolved = resolved_fixture("full-time.json");
    assert_eq!(resolved.preset, Preset::FullTime);
    // 4 fields * 60 + 2 pages * 30
    assert_eq!(resolved.defaults.human_seconds_per_document, 300.0);

    let result = estimate(&resolved.defaults, &resolved, false);
    assert_eq!(result.metrics.total_units, 100_000.0);
    assert_eq!(result.metrics.packs_required, 1);
    assert!((result.metrics.required_full_time_equivalents - 4_166.667 / 2_080.0).abs() < 1e-4);

    let breakdown = explain(Topic::Fte, &result.configuration, &resolved.params, &result.metrics);
    let text = docucost_core::explain::render_breakdown(&breakdown);
    assert!(text.contains("2,080"));
    assert!(text.contains("FTEs required"));
}

#[test]
fn test_custom_pricing_fixture() {
    let resolved = resolved_fixture("custom-pricing.json");
    assert_eq!(resolved.params.units_per_pack, 50_000.0);
    assert_eq!(resolved.params.enhanced_unit_multiplier, 5.0);

    let result = estimate(&resolved.defaults, &resolved, true);
    // 30_000 effective pages * 3 units per page
    assert_eq!(result.metrics.total_units, 90_000.0);
    assert_eq!(result.metrics.packs_required, 2);
    assert_eq!(result.metrics.ai_total_cost, 2_000.0);

    let sensitivity = result.sensitivity.unwrap();
    let minutes: Vec<f64> = sensitivity.time.iter().map(|p| p.x).collect();
    assert_eq!(minutes, vec![2.0, 8.0]);
    let ai: Vec<f64> = sensitivity.pages.iter().map(|p| p.ai_cost).collect();
    assert_eq!(ai, vec![1_000.0, 2_000.0, 3_000.0]);
}

#[test]
fn test_invalid_fixture_is_rejected() {
    let err = load_config_file(&fixture_path("invalid-range.json")).unwrap_err();
    let message = format!("{:#}", err);
    assert!(message.contains("invalid config in"));
    assert!(message.contains("inputs.image_percentage"));
}
