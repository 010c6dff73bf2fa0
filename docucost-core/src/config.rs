//! Configuration file support for docucost
//!
//! Loads project-specific defaults and pricing parameters from JSON files.
//!
//! Search order:
//! 1. Explicit path (--config CLI flag)
//! 2. `.docucostrc.json` in the working directory
//! 3. `docucost.config.json` in the working directory
//!
//! All fields are optional. CLI flags and query input take precedence over
//! config file values.

use crate::inputs::Configuration;
use crate::pricing::{PricingParams, Preset};
use crate::sensitivity::{PAGE_SAMPLE_COUNTS, TIME_SAMPLE_MINUTES};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// docucost configuration loaded from a JSON config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocucostConfig {
    /// Parameter preset the pricing overrides are applied on top of
    #[serde(default)]
    pub preset: Option<Preset>,

    /// Default calculator inputs
    #[serde(default)]
    pub inputs: Option<InputDefaults>,

    /// Pricing and heuristic constants
    #[serde(default)]
    pub pricing: Option<PricingConfig>,

    /// Sample points for the sensitivity series
    #[serde(default)]
    pub sensitivity: Option<SensitivityConfig>,
}

/// Default calculator inputs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputDefaults {
    /// Number of documents (default: 10000)
    pub documents: Option<u64>,
    /// Average pages per document (default: 5)
    pub pages: Option<f64>,
    /// Average extracted fields per document (default: 10)
    pub fields: Option<f64>,
    /// Manual minutes per document (default: derived from fields and pages)
    pub time_minutes: Option<f64>,
    /// Standard hourly rate (default: 15.00)
    pub rate_std: Option<f64>,
    /// Expert hourly rate (default: 200.00)
    pub rate_exp: Option<f64>,
    /// Percentage of enhanced pages (default: 50)
    pub enhanced_percentage: Option<f64>,
    /// Percentage of single-page image documents (default: 50)
    pub image_percentage: Option<f64>,
}

/// Pricing and heuristic constants
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PricingConfig {
    /// Units per pack (default: 100000)
    pub units_per_pack: Option<f64>,
    /// Price per pack (default: 2000)
    pub cost_per_pack: Option<f64>,
    /// Productive hours per employee per year (default: 1380)
    pub effective_annual_hours: Option<f64>,
    /// Unit multiplier for enhanced pages (default: 3)
    pub enhanced_unit_multiplier: Option<f64>,
    /// Heuristic seconds per field (default: 60)
    pub seconds_per_field: Option<f64>,
    /// Heuristic seconds per page (default: 30)
    pub seconds_per_page: Option<f64>,
}

/// Sensitivity sample points
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SensitivityConfig {
    /// Minutes-per-document samples (default: 1, 5, 10, 15, 20, 30)
    pub time_minutes: Option<Vec<f64>>,
    /// Pages-per-document samples (default: 1, 5, 10, 20, 50, 100)
    pub pages: Option<Vec<f64>>,
}

/// Resolved configuration ready for use
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Defaults record handed to the input resolver
    pub defaults: Configuration,
    pub params: PricingParams,
    pub preset: Preset,
    pub time_samples: Vec<f64>,
    pub page_samples: Vec<f64>,
    /// Path the config was loaded from (None if defaults)
    pub config_path: Option<PathBuf>,
}

fn check_non_negative(name: &str, value: Option<f64>) -> Result<()> {
    if let Some(v) = value {
        if !v.is_finite() || v < 0.0 {
            anyhow::bail!("{} must be non-negative (got {})", name, v);
        }
    }
    Ok(())
}

fn check_positive(name: &str, value: Option<f64>) -> Result<()> {
    if let Some(v) = value {
        if !v.is_finite() || v <= 0.0 {
            anyhow::bail!("{} must be positive (got {})", name, v);
        }
    }
    Ok(())
}

fn check_percentage(name: &str, value: Option<f64>) -> Result<()> {
    if let Some(v) = value {
        if !(0.0..=100.0).contains(&v) {
            anyhow::bail!("{} must be between 0 and 100 (got {})", name, v);
        }
    }
    Ok(())
}

fn check_samples(name: &str, samples: Option<&Vec<f64>>) -> Result<()> {
    if let Some(samples) = samples {
        if samples.is_empty() {
            anyhow::bail!("{} must contain at least one sample", name);
        }
        for v in samples {
            if !v.is_finite() || *v <= 0.0 {
                anyhow::bail!("{} samples must be positive (got {})", name, v);
            }
        }
    }
    Ok(())
}

impl DocucostConfig {
    /// Validate the configuration for logical errors
    pub fn validate(&self) -> Result<()> {
        if let Some(ref i) = self.inputs {
            check_positive("inputs.pages", i.pages)?;
            check_non_negative("inputs.fields", i.fields)?;
            check_non_negative("inputs.time_minutes", i.time_minutes)?;
            check_non_negative("inputs.rate_std", i.rate_std)?;
            check_non_negative("inputs.rate_exp", i.rate_exp)?;
            check_percentage("inputs.enhanced_percentage", i.enhanced_percentage)?;
            check_percentage("inputs.image_percentage", i.image_percentage)?;
        }

        if let Some(ref p) = self.pricing {
            check_positive("pricing.units_per_pack", p.units_per_pack)?;
            check_non_negative("pricing.cost_per_pack", p.cost_per_pack)?;
            check_positive("pricing.effective_annual_hours", p.effective_annual_hours)?;
            check_non_negative("pricing.seconds_per_field", p.seconds_per_field)?;
            check_non_negative("pricing.seconds_per_page", p.seconds_per_page)?;
            if let Some(m) = p.enhanced_unit_multiplier {
                if !m.is_finite() || m < 1.0 {
                    anyhow::bail!("pricing.enhanced_unit_multiplier must be at least 1.0 (got {})", m);
                }
            }
        }

        if let Some(ref s) = self.sensitivity {
            check_samples("sensitivity.time_minutes", s.time_minutes.as_ref())?;
            check_samples("sensitivity.pages", s.pages.as_ref())?;
        }

        Ok(())
    }

    /// Resolve config into the form consumed by the engine
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        self.validate()?;

        let preset = self.preset.unwrap_or(Preset::Realistic);
        let base = preset.params();
        let params = match &self.pricing {
            Some(p) => PricingParams {
                units_per_pack: p.units_per_pack.unwrap_or(base.units_per_pack),
                cost_per_pack: p.cost_per_pack.unwrap_or(base.cost_per_pack),
                effective_annual_hours: p
                    .effective_annual_hours
                    .unwrap_or(base.effective_annual_hours),
                enhanced_unit_multiplier: p
                    .enhanced_unit_multiplier
                    .unwrap_or(base.enhanced_unit_multiplier),
                seconds_per_field: p.seconds_per_field.unwrap_or(base.seconds_per_field),
                seconds_per_page: p.seconds_per_page.unwrap_or(base.seconds_per_page),
            },
            None => base,
        };

        let defaults = match &self.inputs {
            Some(i) => resolve_input_defaults(i, &params),
            None => Configuration::default(),
        };

        let (time_samples, page_samples) = match &self.sensitivity {
            Some(s) => (
                s.time_minutes
                    .clone()
                    .unwrap_or_else(|| TIME_SAMPLE_MINUTES.to_vec()),
                s.pages.clone().unwrap_or_else(|| PAGE_SAMPLE_COUNTS.to_vec()),
            ),
            None => (TIME_SAMPLE_MINUTES.to_vec(), PAGE_SAMPLE_COUNTS.to_vec()),
        };

        Ok(ResolvedConfig {
            defaults,
            params,
            preset,
            time_samples,
            page_samples,
            config_path: None,
        })
    }
}

/// Merge file input defaults over the built-in defaults
///
/// A file that changes pages, fields or image ratio without an explicit time
/// gets the heuristic time for its own values.
fn resolve_input_defaults(inputs: &InputDefaults, params: &PricingParams) -> Configuration {
    let builtin = Configuration::default();
    let mut config = Configuration {
        document_count: inputs.documents.unwrap_or(builtin.document_count),
        pages_per_document: inputs.pages.unwrap_or(builtin.pages_per_document),
        fields_per_document: inputs.fields.unwrap_or(builtin.fields_per_document),
        human_seconds_per_document: builtin.human_seconds_per_document,
        standard_hourly_rate: inputs.rate_std.unwrap_or(builtin.standard_hourly_rate),
        expert_hourly_rate: inputs.rate_exp.unwrap_or(builtin.expert_hourly_rate),
        enhanced_page_percentage: inputs
            .enhanced_percentage
            .unwrap_or(builtin.enhanced_page_percentage),
        image_page_percentage: inputs
            .image_percentage
            .unwrap_or(builtin.image_page_percentage),
    };

    let driver_changed =
        inputs.pages.is_some() || inputs.fields.is_some() || inputs.image_percentage.is_some();
    match inputs.time_minutes {
        Some(minutes) => config.human_seconds_per_document = minutes * 60.0,
        None if driver_changed => config = config.with_suggested_time(params),
        None => {}
    }
    config
}

impl ResolvedConfig {
    /// Build a ResolvedConfig with all defaults (no config file)
    pub fn defaults() -> Result<Self> {
        DocucostConfig::default().resolve()
    }
}

/// Discover and load a config file from the project root
///
/// Search order:
/// 1. `.docucostrc.json`
/// 2. `docucost.config.json`
///
/// Returns `None` if no config file is found (use defaults).
pub fn discover_config(project_root: &Path) -> Result<Option<(DocucostConfig, PathBuf)>> {
    for name in [".docucostrc.json", "docucost.config.json"] {
        let path = project_root.join(name);
        if path.exists() {
            let config = load_config_file(&path)?;
            return Ok(Some((config, path)));
        }
    }
    Ok(None)
}

/// Load config from an explicit file path
pub fn load_config_file(path: &Path) -> Result<DocucostConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;

    let config: DocucostConfig = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse config file: {}", path.display()))?;

    config
        .validate()
        .with_context(|| format!("invalid config in: {}", path.display()))?;

    Ok(config)
}

/// Load and resolve config for a project
///
/// If `config_path` is provided, loads from that file.
/// Otherwise, discovers config from the project root.
/// Returns default config if nothing is found.
pub fn load_and_resolve(project_root: &Path, config_path: Option<&Path>) -> Result<ResolvedConfig> {
    load_and_resolve_with_preset(project_root, config_path, None)
}

/// Load and resolve config, with `preset` replacing the file's preset
///
/// Pricing overrides from the file still apply on top of the chosen preset.
pub fn load_and_resolve_with_preset(
    project_root: &Path,
    config_path: Option<&Path>,
    preset: Option<Preset>,
) -> Result<ResolvedConfig> {
    let (mut config, source_path) = if let Some(path) = config_path {
        let config = load_config_file(path)?;
        (config, Some(path.to_path_buf()))
    } else {
        match discover_config(project_root)? {
            Some((config, path)) => (config, Some(path)),
            None => (DocucostConfig::default(), None),
        }
    };

    if preset.is_some() {
        config.preset = preset;
    }

    let mut resolved = config.resolve()?;
    resolved.config_path = source_path;
    Ok(resolved)
}
