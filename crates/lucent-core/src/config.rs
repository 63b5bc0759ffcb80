//! Engine configuration
//!
//! Every tunable of the ranking and projection engines lives here so the
//! policy stays data-driven.
//!
//! ## Configuration Resolution
//!
//! Config is loaded in layers, each overriding only the keys it sets:
//! 1. Built-in defaults compiled into the binary (`config/ranking.toml`)
//! 2. An explicit path if one is given, otherwise the override in the data
//!    dir (~/.local/share/lucent/config/ranking.toml) when it exists

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::registry;

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/ranking.toml");

/// Family -> quick score lookup with a mandatory fallback
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuickScoreTable {
    scores: HashMap<String, i64>,
    default: i64,
}

impl QuickScoreTable {
    pub fn new(default: i64) -> Self {
        Self {
            scores: HashMap::new(),
            default,
        }
    }

    pub fn with_score(mut self, family: impl Into<String>, score: i64) -> Self {
        self.scores.insert(family.into(), score);
        self
    }

    /// Score for a family (higher = more actionable)
    pub fn score(&self, family: &str) -> i64 {
        self.scores.get(family).copied().unwrap_or(self.default)
    }

    pub fn default_score(&self) -> i64 {
        self.default
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Explicit family scores, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.scores.iter().map(|(family, score)| (family.as_str(), *score))
    }
}

impl Default for QuickScoreTable {
    fn default() -> Self {
        Self::new(40)
    }
}

/// Limits for the structured section view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionConfig {
    /// Maximum insights across all sections
    pub cap: usize,
    pub highlights: usize,
    pub major_spending_family: String,
    pub major_spending_limit: usize,
    pub cross_domain_families: Vec<String>,
    pub cross_domain_limit: usize,
    pub per_domain_limit: usize,
    /// Domain keys, most important first
    pub domain_order: Vec<String>,
}

impl Default for SectionConfig {
    fn default() -> Self {
        Self {
            cap: 15,
            highlights: 5,
            major_spending_family: "category_saturation".to_string(),
            major_spending_limit: 3,
            cross_domain_families: vec![
                "cross_user_affinity".to_string(),
                "duplicate_services".to_string(),
                "merchant_bundling".to_string(),
            ],
            cross_domain_limit: 3,
            per_domain_limit: 2,
            domain_order: registry::domain_order(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChipConfig {
    pub max: usize,
    /// Generic chips are added until at least this many exist
    pub min: usize,
}

impl Default for ChipConfig {
    fn default() -> Self {
        Self { max: 6, min: 4 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionConfig {
    /// Most recent populated months considered
    pub window_months: usize,
    /// Fewer populated months than this yields `insufficient`
    pub min_months: usize,
    pub forecast_months: usize,
    /// Volatility as a share of average spending when spending never varies
    pub volatility_fallback: f64,
    /// Standard deviations above mean spending that flag an anomaly
    pub anomaly_sigma: f64,
    pub high_confidence_cv: f64,
    pub medium_confidence_cv: f64,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            window_months: 6,
            min_months: 3,
            forecast_months: 4,
            volatility_fallback: 0.15,
            anomaly_sigma: 1.8,
            high_confidence_cv: 0.20,
            medium_confidence_cv: 0.45,
        }
    }
}

/// Full engine configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineConfig {
    /// Quick insight count
    pub quick_limit: usize,
    pub quick_scores: QuickScoreTable,
    pub sections: SectionConfig,
    pub chips: ChipConfig,
    pub projection: ProjectionConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            quick_limit: 6,
            quick_scores: QuickScoreTable::default(),
            sections: SectionConfig::default(),
            chips: ChipConfig::default(),
            projection: ProjectionConfig::default(),
        }
    }
}

/// Where the effective configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Embedded,
    File(PathBuf),
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Embedded => write!(f, "built-in defaults"),
            ConfigSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl EngineConfig {
    /// Built-in configuration (embedded TOML over hard-coded defaults)
    pub fn embedded() -> Result<Self> {
        parse_config(Self::default(), DEFAULT_CONFIG)
    }

    /// Resolve configuration from an explicit path or the data dir override
    pub fn load(explicit: Option<&Path>) -> Result<(Self, ConfigSource)> {
        let base = Self::embedded()?;

        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::NotFound(format!(
                        "config file {}",
                        path.display()
                    )));
                }
                path.to_path_buf()
            }
            None => match default_config_path() {
                Some(path) if path.exists() => path,
                _ => return Ok((base, ConfigSource::Embedded)),
            },
        };

        let content = fs::read_to_string(&path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        let config = parse_config(base, &content)?;
        tracing::debug!(path = %path.display(), "Loaded config override");
        Ok((config, ConfigSource::File(path)))
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("lucent").join("config").join("ranking.toml"))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    quick: Option<RawQuick>,
    quick_scores: Option<HashMap<String, i64>>,
    sections: Option<RawSections>,
    chips: Option<RawChips>,
    projection: Option<RawProjection>,
}

#[derive(Debug, Deserialize)]
struct RawQuick {
    limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawSections {
    cap: Option<usize>,
    highlights: Option<usize>,
    major_spending_family: Option<String>,
    major_spending_limit: Option<usize>,
    cross_domain_families: Option<Vec<String>>,
    cross_domain_limit: Option<usize>,
    per_domain_limit: Option<usize>,
    domain_order: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RawChips {
    max: Option<usize>,
    min: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawProjection {
    window_months: Option<usize>,
    min_months: Option<usize>,
    forecast_months: Option<usize>,
    volatility_fallback: Option<f64>,
    anomaly_sigma: Option<f64>,
    high_confidence_cv: Option<f64>,
    medium_confidence_cv: Option<f64>,
}

/// Parse TOML content on top of `config`
fn parse_config(mut config: EngineConfig, content: &str) -> Result<EngineConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    if let Some(quick) = raw.quick {
        if let Some(limit) = quick.limit {
            config.quick_limit = limit;
        }
    }

    if let Some(mut scores) = raw.quick_scores {
        let default = scores.remove("default").ok_or_else(|| {
            Error::Config("[quick_scores] must define a `default` entry".to_string())
        })?;
        config.quick_scores = QuickScoreTable { scores, default };
    }

    if let Some(sections) = raw.sections {
        let s = &mut config.sections;
        if let Some(cap) = sections.cap {
            s.cap = cap;
        }
        if let Some(highlights) = sections.highlights {
            s.highlights = highlights;
        }
        if let Some(family) = sections.major_spending_family {
            s.major_spending_family = family;
        }
        if let Some(limit) = sections.major_spending_limit {
            s.major_spending_limit = limit;
        }
        if let Some(families) = sections.cross_domain_families {
            s.cross_domain_families = families;
        }
        if let Some(limit) = sections.cross_domain_limit {
            s.cross_domain_limit = limit;
        }
        if let Some(limit) = sections.per_domain_limit {
            s.per_domain_limit = limit;
        }
        if let Some(order) = sections.domain_order {
            for key in order.iter().filter(|k| registry::domain(k).is_none()) {
                tracing::warn!(domain = %key, "Unknown domain in domain_order");
            }
            s.domain_order = order;
        }
    }

    if let Some(chips) = raw.chips {
        if let Some(max) = chips.max {
            config.chips.max = max;
        }
        if let Some(min) = chips.min {
            config.chips.min = min;
        }
    }

    if let Some(projection) = raw.projection {
        let p = &mut config.projection;
        if let Some(v) = projection.window_months {
            p.window_months = v;
        }
        if let Some(v) = projection.min_months {
            p.min_months = v;
        }
        if let Some(v) = projection.forecast_months {
            p.forecast_months = v;
        }
        if let Some(v) = projection.volatility_fallback {
            p.volatility_fallback = v;
        }
        if let Some(v) = projection.anomaly_sigma {
            p.anomaly_sigma = v;
        }
        if let Some(v) = projection.high_confidence_cv {
            p.high_confidence_cv = v;
        }
        if let Some(v) = projection.medium_confidence_cv {
            p.medium_confidence_cv = v;
        }
    }

    validate(&config)?;
    Ok(config)
}

fn validate(config: &EngineConfig) -> Result<()> {
    let p = &config.projection;
    if p.min_months == 0 {
        return Err(Error::Config("projection.min_months must be at least 1".to_string()));
    }
    if p.window_months < p.min_months {
        return Err(Error::Config(format!(
            "projection.window_months ({}) is smaller than min_months ({})",
            p.window_months, p.min_months
        )));
    }
    if p.high_confidence_cv > p.medium_confidence_cv {
        return Err(Error::Config(
            "projection.high_confidence_cv must not exceed medium_confidence_cv".to_string(),
        ));
    }
    if config.chips.min > config.chips.max {
        return Err(Error::Config(format!(
            "chips.min ({}) exceeds chips.max ({})",
            config.chips.min, config.chips.max
        )));
    }
    Ok(())
}
