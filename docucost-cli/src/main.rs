//! docucost CLI - AI versus manual document processing cost calculator

#![deny(warnings)]

// Global invariants enforced:
// - Deterministic output ordering
// - Identical input yields byte-for-byte identical output

use anyhow::Context;
use clap::builder::{PossibleValuesParser, TypedValueParser};
use clap::{Args, Parser, Subcommand};
use docucost_core::config::{self, ResolvedConfig};
use docucost_core::explain::render_breakdown;
use docucost_core::inputs::{parse_query_string, resolve, Configuration, Field};
use docucost_core::{estimate, explain, render_json, render_text, InputError, Preset, Topic};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "docucost")]
#[command(about = "Compare the cost of AI document processing with manual data entry")]
#[command(version = env!("DOCUCOST_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute costs, ROI, break-even and staffing for a workload
    Estimate {
        #[command(flatten)]
        inputs: InputArgs,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,

        /// Include time and page sensitivity series
        #[arg(long)]
        sensitivity: bool,
    },
    /// Show how one metric is derived
    Explain {
        /// Metric to explain
        #[arg(value_parser = topic_parser())]
        metric: Topic,

        #[command(flatten)]
        inputs: InputArgs,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },
    /// Print the heuristic manual time per document
    SuggestTime {
        /// Extracted fields per document
        #[arg(long, default_value_t = 10.0)]
        fields: f64,

        /// Pages per document
        #[arg(long, default_value_t = 5.0)]
        pages: f64,

        /// Percentage of single-page image documents
        #[arg(long, default_value_t = 50.0)]
        img: f64,

        /// Path to config file (default: auto-discover)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print a shareable query string for a workload
    Share {
        #[command(flatten)]
        inputs: InputArgs,
    },
    /// Validate or show a configuration file
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Validate a config file without computing anything
    Validate {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Show the resolved configuration (merged defaults + config file)
    Show {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

/// Workload inputs shared by estimate, explain and share
#[derive(Args)]
struct InputArgs {
    /// Number of documents
    #[arg(long)]
    docs: Option<u64>,

    /// Average pages per document
    #[arg(long)]
    pages: Option<f64>,

    /// Average extracted fields per document
    #[arg(long)]
    fields: Option<f64>,

    /// Manual minutes per document (default: derived from fields and pages)
    #[arg(long)]
    time: Option<f64>,

    /// Standard hourly rate
    #[arg(long)]
    rate_std: Option<f64>,

    /// Expert hourly rate
    #[arg(long)]
    rate_exp: Option<f64>,

    /// Percentage of pages needing enhanced processing
    #[arg(long)]
    mix: Option<f64>,

    /// Percentage of single-page image documents
    #[arg(long)]
    img: Option<f64>,

    /// Query string to start from, e.g. "docs=5000&pages=3"
    #[arg(long)]
    query: Option<String>,

    /// Staffing preset (overrides config file)
    #[arg(long)]
    preset: Option<PresetArg>,

    /// Path to config file (default: auto-discover)
    #[arg(long)]
    config: Option<PathBuf>,
}

impl InputArgs {
    /// Explicit flags as raw key/value pairs, in query-string order
    fn flag_pairs(&self) -> Vec<(&'static str, String)> {
        let values = [
            (Field::Documents, self.docs.map(|d| d as f64)),
            (Field::Pages, self.pages),
            (Field::Fields, self.fields),
            (Field::EnhancedMix, self.mix),
            (Field::ImageRatio, self.img),
            (Field::StandardRate, self.rate_std),
            (Field::ExpertRate, self.rate_exp),
            (Field::HumanTime, self.time),
        ];
        values
            .into_iter()
            .filter_map(|(field, value)| value.map(|v| (field.key(), v.to_string())))
            .collect()
    }
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum PresetArg {
    Realistic,
    FullTime,
}

impl From<PresetArg> for Preset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Realistic => Preset::Realistic,
            PresetArg::FullTime => Preset::FullTime,
        }
    }
}

/// Possible values and parsing both come from `Topic::ALL`
fn topic_parser() -> impl TypedValueParser<Value = Topic> {
    PossibleValuesParser::new(Topic::ALL.map(|topic| topic.as_str()))
        .try_map(|name| name.parse::<Topic>())
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Estimate {
            inputs,
            format,
            sensitivity,
        } => {
            let (config, resolved) = resolve_inputs(&inputs)?;
            let result = estimate(&config, &resolved, sensitivity);
            match format {
                OutputFormat::Text => print!("{}", render_text(&result)),
                OutputFormat::Json => println!("{}", render_json(&result)?),
            }
        }
        Commands::Explain {
            metric,
            inputs,
            format,
        } => {
            let (config, resolved) = resolve_inputs(&inputs)?;
            let result = estimate(&config, &resolved, false);
            let breakdown = explain(metric, &config, &resolved.params, &result.metrics);
            match format {
                OutputFormat::Text => print!("{}", render_breakdown(&breakdown)),
                OutputFormat::Json => println!(
                    "{}",
                    serde_json::to_string_pretty(&breakdown)
                        .context("failed to serialize breakdown")?
                ),
            }
        }
        Commands::SuggestTime {
            fields,
            pages,
            img,
            config: config_path,
        } => {
            let resolved = load_config(config_path.as_deref(), None)?;
            let config = Configuration {
                fields_per_document: fields,
                pages_per_document: pages,
                image_page_percentage: img,
                ..resolved.defaults
            }
            .clamped();
            let seconds = config.suggested_human_seconds(&resolved.params);
            println!(
                "Suggested time: {:.0} seconds ({:.1} minutes) per document",
                seconds,
                seconds / 60.0
            );
        }
        Commands::Share { inputs } => {
            let (config, _) = resolve_inputs(&inputs)?;
            println!("?{}", config.to_query_string());
        }
        Commands::Config { action } => match action {
            ConfigAction::Validate { path } => {
                let project_root = std::env::current_dir()?;
                let resolved = config::load_and_resolve(&project_root, path.as_deref());

                match resolved {
                    Ok(config) => {
                        if let Some(ref p) = config.config_path {
                            println!("Config valid: {}", p.display());
                        } else {
                            println!("No config file found. Using defaults.");
                        }
                    }
                    Err(e) => {
                        eprintln!("Config validation failed: {:#}", e);
                        std::process::exit(1);
                    }
                }
            }
            ConfigAction::Show { path } => {
                let resolved = load_config(path.as_deref(), None)?;
                print_resolved_config(&resolved);
            }
        },
    }

    Ok(())
}

/// Log to stderr, filtered by RUST_LOG (default: warn)
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(config_path: Option<&Path>, preset: Option<Preset>) -> anyhow::Result<ResolvedConfig> {
    let project_root = std::env::current_dir()?;
    let resolved = config::load_and_resolve_with_preset(&project_root, config_path, preset)
        .context("failed to load configuration")?;
    if let Some(ref path) = resolved.config_path {
        info!(path = %path.display(), "using config file");
    }
    Ok(resolved)
}

/// Config-file defaults, then the query string, then individual flags
///
/// Flags are resolved against the query result so that an explicit pages,
/// fields or image flag re-derives the time even when the query carried one.
fn resolve_inputs(inputs: &InputArgs) -> anyhow::Result<(Configuration, ResolvedConfig)> {
    let resolved = load_config(inputs.config.as_deref(), inputs.preset.map(Preset::from))?;
    let mut recovered: Vec<InputError> = Vec::new();

    let mut config = resolved.defaults;
    if let Some(ref query) = inputs.query {
        let resolution = resolve(parse_query_string(query), &config, &resolved.params);
        recovered.extend(resolution.recovered);
        config = resolution.config;
    }

    let flags = inputs.flag_pairs();
    if !flags.is_empty() {
        let resolution = resolve(flags, &config, &resolved.params);
        recovered.extend(resolution.recovered);
        config = resolution.config;
    }

    if !recovered.is_empty() {
        debug!(count = recovered.len(), "substituted fallbacks for invalid input");
    }

    let clamped = config.clamped();
    if clamped != config {
        debug!("clamped configuration to valid ranges");
    }
    Ok((clamped, resolved))
}

fn print_resolved_config(resolved: &ResolvedConfig) {
    let defaults = &resolved.defaults;
    let params = &resolved.params;

    println!("Configuration:");
    if let Some(ref p) = resolved.config_path {
        println!("  Source: {}", p.display());
    } else {
        println!("  Source: defaults (no config file found)");
    }
    println!("  Preset: {}", resolved.preset.as_str());
    println!();
    println!("Inputs:");
    for field in Field::ALL {
        println!("  {}: {}", field.key(), defaults.value(field));
    }
    println!();
    println!("Pricing:");
    println!("  units_per_pack: {}", params.units_per_pack);
    println!("  cost_per_pack: {}", params.cost_per_pack);
    println!("  effective_annual_hours: {}", params.effective_annual_hours);
    println!("  enhanced_unit_multiplier: {}", params.enhanced_unit_multiplier);
    println!("  seconds_per_field: {}", params.seconds_per_field);
    println!("  seconds_per_page: {}", params.seconds_per_page);
    println!();
    println!("Sensitivity:");
    println!("  time_minutes: {}", join_samples(&resolved.time_samples));
    println!("  pages: {}", join_samples(&resolved.page_samples));
}

fn join_samples(samples: &[f64]) -> String {
    samples
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explain_parses_every_topic() {
        for topic in Topic::ALL {
            let cli = Cli::try_parse_from(["docucost", "explain", topic.as_str()])
                .unwrap_or_else(|e| panic!("{} should parse: {}", topic, e));
            match cli.command {
                Commands::Explain { metric, .. } => assert_eq!(metric, topic),
                _ => panic!("expected explain command"),
            }
        }
    }

    #[test]
    fn test_explain_rejects_unknown_metric() {
        assert!(Cli::try_parse_from(["docucost", "explain", "payback"]).is_err());
    }
}
