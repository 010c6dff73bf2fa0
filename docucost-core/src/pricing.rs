//! Pricing parameters and presets
//!
//! Every constant the cost formulas depend on lives here so that each observed
//! variant of the calculator is one parameterization of the same engine.

use serde::{Deserialize, Serialize};

/// Units contained in one purchasable pack
pub const DEFAULT_UNITS_PER_PACK: f64 = 100_000.0;
/// Price of one pack
pub const DEFAULT_COST_PER_PACK: f64 = 2_000.0;
/// Productive hours per employee per year (230 workdays at 75% of 8h)
pub const REALISTIC_ANNUAL_HOURS: f64 = 1_380.0;
/// Raw full-time hours per year, no discount for time off or utilization
pub const FULL_TIME_ANNUAL_HOURS: f64 = 2_080.0;
/// Unit cost of an enhanced page relative to a standard page
pub const DEFAULT_ENHANCED_UNIT_MULTIPLIER: f64 = 3.0;
/// Manual seconds spent per extracted field
pub const DEFAULT_SECONDS_PER_FIELD: f64 = 60.0;
/// Manual seconds spent per page read
pub const DEFAULT_SECONDS_PER_PAGE: f64 = 30.0;

pub const SECONDS_PER_HOUR: f64 = 3_600.0;

/// Named parameter sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    /// Staffing based on realistic productive capacity (1380 h/year)
    Realistic,
    /// Staffing based on raw full-time hours (2080 h/year)
    FullTime,
}

impl Preset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Realistic => "realistic",
            Preset::FullTime => "full-time",
        }
    }

    pub fn params(&self) -> PricingParams {
        match self {
            Preset::Realistic => PricingParams::default(),
            Preset::FullTime => PricingParams {
                effective_annual_hours: FULL_TIME_ANNUAL_HOURS,
                ..PricingParams::default()
            },
        }
    }
}

/// Constants consumed by the metrics engine and the time heuristic
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingParams {
    pub units_per_pack: f64,
    pub cost_per_pack: f64,
    pub effective_annual_hours: f64,
    pub enhanced_unit_multiplier: f64,
    pub seconds_per_field: f64,
    pub seconds_per_page: f64,
}

impl Default for PricingParams {
    fn default() -> Self {
        PricingParams {
            units_per_pack: DEFAULT_UNITS_PER_PACK,
            cost_per_pack: DEFAULT_COST_PER_PACK,
            effective_annual_hours: REALISTIC_ANNUAL_HOURS,
            enhanced_unit_multiplier: DEFAULT_ENHANCED_UNIT_MULTIPLIER,
            seconds_per_field: DEFAULT_SECONDS_PER_FIELD,
            seconds_per_page: DEFAULT_SECONDS_PER_PAGE,
        }
    }
}

impl PricingParams {
    /// Number of packs needed to cover `units`
    ///
    /// Step function: 100_000 units is one pack, 100_000.0001 is two.
    pub fn packs_for(&self, units: f64) -> u64 {
        if units <= 0.0 || self.units_per_pack <= 0.0 {
            return 0;
        }
        (units / self.units_per_pack).ceil() as u64
    }

    /// Total price of `packs`
    pub fn cost_of(&self, packs: u64) -> f64 {
        packs as f64 * self.cost_per_pack
    }
}
