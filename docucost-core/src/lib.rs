//! docucost core library - AI versus manual document processing cost model

#![deny(warnings)]

// Global invariants enforced in this crate:
// - Metrics are a pure function of configuration and pricing parameters
// - No global mutable state; callers own the configuration
// - No randomness, clocks, threads, or async
// - Nothing is cached between computations
// - Identical input yields byte-for-byte identical output

pub mod config;
pub mod engine;
pub mod error;
pub mod explain;
pub mod format;
pub mod inputs;
pub mod pricing;
pub mod report;
pub mod sensitivity;

pub use config::ResolvedConfig;
pub use engine::{compute_metrics, Metrics, Tier};
pub use error::{Condition, InputError};
pub use explain::{explain, Breakdown, Topic};
pub use inputs::{resolve, Configuration, Field, Resolution, Session};
pub use pricing::{Preset, PricingParams};
pub use report::{render_json, render_text, Estimate};
pub use sensitivity::Sensitivity;

/// Compute an estimate, optionally with the sensitivity series from `resolved`
pub fn estimate(
    config: &Configuration,
    resolved: &ResolvedConfig,
    with_sensitivity: bool,
) -> Estimate {
    let estimate = Estimate::new(config, &resolved.params);
    if with_sensitivity {
        estimate.with_sensitivity(&resolved.time_samples, &resolved.page_samples)
    } else {
        estimate
    }
}
