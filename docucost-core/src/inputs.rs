//! Configuration resolution
//!
//! Turns raw key/value input (query parameters, form values, CLI flags) into a
//! [`Configuration`] record. Absent keys keep the supplied defaults; present
//! keys that fail numeric coercion fall back to a per-field value instead:
//! pages fall back to 1, fields to 5 and everything else to 0.
//!
//! Human time is derived from fields, pages and image ratio whenever one of
//! those drivers changes, but never when the time itself is edited.

use crate::engine::{compute_metrics, Metrics};
use crate::error::InputError;
use crate::pricing::{
    PricingParams, DEFAULT_ENHANCED_UNIT_MULTIPLIER, DEFAULT_SECONDS_PER_FIELD,
    DEFAULT_SECONDS_PER_PAGE,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Configurable input fields, in query-string order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Documents,
    Pages,
    Fields,
    EnhancedMix,
    ImageRatio,
    StandardRate,
    ExpertRate,
    HumanTime,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::Documents,
        Field::Pages,
        Field::Fields,
        Field::EnhancedMix,
        Field::ImageRatio,
        Field::StandardRate,
        Field::ExpertRate,
        Field::HumanTime,
    ];

    /// Query-string key for this field
    pub fn key(&self) -> &'static str {
        match self {
            Field::Documents => "docs",
            Field::Pages => "pages",
            Field::Fields => "fields",
            Field::EnhancedMix => "mix",
            Field::ImageRatio => "img",
            Field::StandardRate => "rate_std",
            Field::ExpertRate => "rate_exp",
            Field::HumanTime => "time",
        }
    }

    pub fn from_key(key: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.key() == key)
    }

    /// Value substituted when a supplied input fails numeric coercion
    pub fn fallback(&self) -> f64 {
        match self {
            Field::Pages => 1.0,
            Field::Fields => 5.0,
            _ => 0.0,
        }
    }

    /// Whether a parsed value is usable as-is
    ///
    /// Pages and fields treat zero like an unparseable value; documents
    /// reject negatives.
    pub fn accepts(&self, value: f64) -> bool {
        match self {
            Field::Pages | Field::Fields => value != 0.0,
            Field::Documents => value >= 0.0,
            _ => true,
        }
    }

    /// Whether editing this field overwrites human time with the heuristic
    pub fn rederives_human_time(&self) -> bool {
        matches!(self, Field::Pages | Field::Fields | Field::ImageRatio)
    }
}

/// Inputs to one metrics computation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    pub document_count: u64,
    pub pages_per_document: f64,
    pub fields_per_document: f64,
    /// Manual processing time per document, in seconds
    pub human_seconds_per_document: f64,
    pub standard_hourly_rate: f64,
    pub expert_hourly_rate: f64,
    /// Share of pages needing enhanced processing (0-100)
    pub enhanced_page_percentage: f64,
    /// Share of documents that are single-page images (0-100)
    pub image_page_percentage: f64,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            document_count: 10_000,
            pages_per_document: 5.0,
            fields_per_document: 10.0,
            human_seconds_per_document: 690.0,
            standard_hourly_rate: 15.0,
            expert_hourly_rate: 200.0,
            enhanced_page_percentage: 50.0,
            image_page_percentage: 50.0,
        }
    }
}

impl Configuration {
    /// Field value in its external unit (human time in minutes)
    pub fn value(&self, field: Field) -> f64 {
        match field {
            Field::Documents => self.document_count as f64,
            Field::Pages => self.pages_per_document,
            Field::Fields => self.fields_per_document,
            Field::EnhancedMix => self.enhanced_page_percentage,
            Field::ImageRatio => self.image_page_percentage,
            Field::StandardRate => self.standard_hourly_rate,
            Field::ExpertRate => self.expert_hourly_rate,
            Field::HumanTime => self.human_seconds_per_document / 60.0,
        }
    }

    /// Store a field value given in its external unit (human time in minutes)
    pub fn set_value(&mut self, field: Field, value: f64) {
        match field {
            Field::Documents => self.document_count = value.max(0.0).floor() as u64,
            Field::Pages => self.pages_per_document = value,
            Field::Fields => self.fields_per_document = value,
            Field::EnhancedMix => self.enhanced_page_percentage = value,
            Field::ImageRatio => self.image_page_percentage = value,
            Field::StandardRate => self.standard_hourly_rate = value,
            Field::ExpertRate => self.expert_hourly_rate = value,
            Field::HumanTime => self.human_seconds_per_document = value * 60.0,
        }
    }

    /// Copy with percentages clamped to [0, 100], pages kept positive and
    /// negative amounts raised to 0
    pub fn clamped(&self) -> Configuration {
        Configuration {
            document_count: self.document_count,
            pages_per_document: if self.pages_per_document > 0.0 {
                self.pages_per_document
            } else {
                Field::Pages.fallback()
            },
            fields_per_document: self.fields_per_document.max(0.0),
            human_seconds_per_document: self.human_seconds_per_document.max(0.0),
            standard_hourly_rate: self.standard_hourly_rate.max(0.0),
            expert_hourly_rate: self.expert_hourly_rate.max(0.0),
            enhanced_page_percentage: self.enhanced_page_percentage.clamp(0.0, 100.0),
            image_page_percentage: self.image_page_percentage.clamp(0.0, 100.0),
        }
    }

    /// Heuristic manual time for this configuration, in seconds
    pub fn suggested_human_seconds(&self, params: &PricingParams) -> f64 {
        let pages = effective_pages(self.pages_per_document, self.image_page_percentage);
        suggested_human_time_with_params(self.fields_per_document, pages, params)
    }

    /// Copy with human time replaced by the heuristic suggestion
    pub fn with_suggested_time(mut self, params: &PricingParams) -> Configuration {
        self.human_seconds_per_document = self.suggested_human_seconds(params);
        self
    }

    /// Serialize to query-string pairs in a stable order
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        Field::ALL
            .into_iter()
            .map(|field| (field.key().to_string(), format_query_number(self.value(field))))
            .collect()
    }

    /// Serialize to a shareable query string (without leading `?`)
    pub fn to_query_string(&self) -> String {
        self.to_query_pairs()
            .into_iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Outcome of resolving raw input
#[derive(Debug, Clone)]
pub struct Resolution {
    pub config: Configuration,
    /// Inputs that failed coercion and were replaced by their fallback
    pub recovered: Vec<InputError>,
    /// Whether the input carried an explicit human time
    pub time_supplied: bool,
}

/// Resolve raw key/value input against a defaults record
///
/// When the input changes a time driver (pages, fields, image ratio) without
/// supplying `time`, human time is re-derived from the resolved values.
pub fn resolve<I, K, V>(raw: I, defaults: &Configuration, params: &PricingParams) -> Resolution
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut config = *defaults;
    let mut recovered = Vec::new();
    let mut time_supplied = false;
    let mut driver_supplied = false;

    for (key, value) in raw {
        let key = key.as_ref();
        let Some(field) = Field::from_key(key) else {
            debug!(key, "ignoring unrecognized input key");
            continue;
        };
        let (number, error) = coerce_field(field, value.as_ref());
        if let Some(error) = error {
            warn!("{}", error);
            recovered.push(error);
        }
        config.set_value(field, number);
        time_supplied |= field == Field::HumanTime;
        driver_supplied |= field.rederives_human_time();
    }

    if driver_supplied && !time_supplied {
        config = config.with_suggested_time(params);
        debug!(
            seconds = config.human_seconds_per_document,
            "derived human time from heuristic"
        );
    }

    Resolution {
        config,
        recovered,
        time_supplied,
    }
}

/// Coerce one raw value for `field`, substituting the field fallback on failure
pub fn coerce_field(field: Field, raw: &str) -> (f64, Option<InputError>) {
    let parsed = coerce_number(raw).filter(|v| field.accepts(*v));
    match parsed {
        Some(v) => (v, None),
        None => (
            field.fallback(),
            Some(InputError::InvalidNumericInput {
                key: field.key().to_string(),
                value: raw.to_string(),
                fallback: field.fallback(),
            }),
        ),
    }
}

/// Parse a finite number, treating blank input as missing
fn coerce_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Split `?a=1&b=2` style input into key/value pairs
pub fn parse_query_string(query: &str) -> Vec<(String, String)> {
    query
        .trim()
        .trim_start_matches('?')
        .split('&')
        .filter(|part| !part.is_empty())
        .map(|part| match part.split_once('=') {
            Some((k, v)) => (k.to_string(), v.replace('+', " ")),
            None => (part.to_string(), String::new()),
        })
        .collect()
}

fn format_query_number(value: f64) -> String {
    format!("{}", value)
}

/// Blended page count: image documents count as exactly one page
///
/// `image_pct/100 * 1 + (1 - image_pct/100) * pages`
pub fn effective_pages(pages_per_document: f64, image_percentage: f64) -> f64 {
    let image_ratio = image_percentage / 100.0;
    image_ratio + (1.0 - image_ratio) * pages_per_document
}

/// Units consumed per page with the default 3x enhanced multiplier
pub fn effective_units_per_page(enhanced_percentage: f64) -> f64 {
    effective_units_per_page_with_multiplier(enhanced_percentage, DEFAULT_ENHANCED_UNIT_MULTIPLIER)
}

/// Units consumed per page: standard pages cost 1, enhanced pages `multiplier`
pub fn effective_units_per_page_with_multiplier(enhanced_percentage: f64, multiplier: f64) -> f64 {
    let enhanced_ratio = enhanced_percentage / 100.0;
    (1.0 - enhanced_ratio) + enhanced_ratio * multiplier
}

/// Suggested manual seconds per document with the default heuristic constants
///
/// `fields * 60 + effective_pages * 30`
pub fn suggested_human_time(fields_per_document: f64, effective_pages: f64) -> f64 {
    fields_per_document * DEFAULT_SECONDS_PER_FIELD + effective_pages * DEFAULT_SECONDS_PER_PAGE
}

/// Suggested manual seconds per document with custom heuristic constants
pub fn suggested_human_time_with_params(
    fields_per_document: f64,
    effective_pages: f64,
    params: &PricingParams,
) -> f64 {
    fields_per_document * params.seconds_per_field + effective_pages * params.seconds_per_page
}

/// Caller-owned mutable configuration with the recompute trigger policy applied
#[derive(Debug, Clone)]
pub struct Session {
    config: Configuration,
    defaults: Configuration,
    params: PricingParams,
}

impl Session {
    pub fn new(defaults: Configuration, params: PricingParams) -> Self {
        Session {
            config: defaults,
            defaults,
            params,
        }
    }

    /// Start a session from raw query input
    pub fn from_query<I, K, V>(
        raw: I,
        defaults: Configuration,
        params: PricingParams,
    ) -> (Self, Vec<InputError>)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let resolution = resolve(raw, &defaults, &params);
        let session = Session {
            config: resolution.config,
            defaults,
            params,
        };
        (session, resolution.recovered)
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn params(&self) -> &PricingParams {
        &self.params
    }

    /// Apply one raw edit, returning the recovery if coercion failed
    pub fn set(&mut self, field: Field, raw: &str) -> Option<InputError> {
        let (value, error) = coerce_field(field, raw);
        if let Some(ref e) = error {
            warn!("{}", e);
        }
        self.set_value(field, value);
        error
    }

    /// Apply one typed edit
    pub fn set_value(&mut self, field: Field, value: f64) {
        self.config.set_value(field, value);
        if field.rederives_human_time() {
            self.config = self.config.with_suggested_time(&self.params);
        }
    }

    /// Restore the defaults record
    pub fn reset(&mut self) {
        self.config = self.defaults;
    }

    /// Fresh metrics for the current (clamped) configuration
    pub fn metrics(&self) -> Metrics {
        compute_metrics(&self.config.clamped(), &self.params)
    }

    pub fn share_query(&self) -> String {
        self.config.to_query_string()
    }
}
