use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::core::allocation::DEFAULT_DIVERSITY_MULTIPLIER;
use crate::core::similarity::SkillEmbeddings;
use crate::models::ScoringWeights;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub allocation: AllocationSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
    /// Largest accepted JSON body; batch requests carry whole student lists
    #[serde(default = "default_json_limit")]
    pub json_limit_bytes: usize,
    /// Size of the rayon pool used for scoring (defaults to one per core)
    pub scoring_threads: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
            json_limit_bytes: default_json_limit(),
            scoring_threads: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8000 }
fn default_json_limit() -> usize { 16 * 1024 * 1024 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
    /// Optional skill taxonomy: one embedding vector per skill
    #[serde(default)]
    pub skill_embeddings: HashMap<String, Vec<f64>>,
}

impl ScoringSettings {
    pub fn skill_embeddings(&self) -> Option<SkillEmbeddings> {
        if self.skill_embeddings.is_empty() {
            return None;
        }
        Some(self.skill_embeddings.clone().into_iter().collect())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_skill_weight")]
    pub skill: f64,
    #[serde(default = "default_qualification_weight")]
    pub qualification: f64,
    #[serde(default = "default_location_weight")]
    pub location: f64,
    #[serde(default = "default_sector_weight")]
    pub sector: f64,
    #[serde(default = "default_diversity_weight")]
    pub diversity: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            skill: default_skill_weight(),
            qualification: default_qualification_weight(),
            location: default_location_weight(),
            sector: default_sector_weight(),
            diversity: default_diversity_weight(),
        }
    }
}

impl From<&WeightsConfig> for ScoringWeights {
    fn from(config: &WeightsConfig) -> Self {
        ScoringWeights {
            skill: config.skill,
            qualification: config.qualification,
            location: config.location,
            sector: config.sector,
            diversity: config.diversity,
        }
    }
}

fn default_skill_weight() -> f64 { 0.30 }
fn default_qualification_weight() -> f64 { 0.20 }
fn default_location_weight() -> f64 { 0.20 }
fn default_sector_weight() -> f64 { 0.15 }
fn default_diversity_weight() -> f64 { 0.15 }

#[derive(Debug, Clone, Deserialize)]
pub struct AllocationSettings {
    /// Factor applied to the diversity weight when internships rank proposals
    #[serde(default = "default_diversity_multiplier")]
    pub diversity_multiplier: f64,
}

impl Default for AllocationSettings {
    fn default() -> Self {
        Self {
            diversity_multiplier: default_diversity_multiplier(),
        }
    }
}

fn default_diversity_multiplier() -> f64 { DEFAULT_DIVERSITY_MULTIPLIER }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with INTERNSHIP_MATCH)
    /// 5. `PORT`, as set by most container platforms
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., INTERNSHIP_MATCH__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("INTERNSHIP_MATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings = apply_port_override(settings)?;

        Self::finish(settings)
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("INTERNSHIP_MATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Self::finish(settings)
    }

    fn finish(config: Config) -> Result<Self, ConfigError> {
        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject weight sets that would break the [0, 1] score range
    pub fn validate(&self) -> Result<(), ConfigError> {
        ScoringWeights::from(&self.scoring.weights)
            .validate()
            .map_err(|e| ConfigError::Message(e.to_string()))?;

        let multiplier = self.allocation.diversity_multiplier;
        if !multiplier.is_finite() || multiplier < 1.0 {
            return Err(ConfigError::Message(
                "allocation.diversity_multiplier must be a finite value >= 1.0".to_string(),
            ));
        }

        Ok(())
    }
}

fn apply_port_override(settings: Config) -> Result<Config, ConfigError> {
    match std::env::var("PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
        Some(port) => Config::builder()
            .add_source(settings)
            .set_override("server.port", i64::from(port))?
            .build(),
        None => Ok(settings),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(contents: &str) -> Result<Settings, ConfigError> {
        let config = Config::builder()
            .add_source(File::from_str(contents, FileFormat::Toml))
            .build()?;
        Settings::finish(config)
    }

    #[test]
    fn test_default_weights() {
        let weights = WeightsConfig::default();
        assert_eq!(weights.skill, 0.30);
        assert_eq!(weights.qualification, 0.20);
        assert_eq!(weights.location, 0.20);
        assert_eq!(weights.sector, 0.15);
        assert_eq!(weights.diversity, 0.15);
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let settings = from_toml("").unwrap();
        assert_eq!(settings.server.port, 8000);
        assert_eq!(settings.allocation.diversity_multiplier, 2.0);
        assert!(settings.scoring.skill_embeddings().is_none());
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        let result = from_toml(
            r#"
            [scoring.weights]
            skill = 0.9
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_custom_weights_and_embeddings() {
        let settings = from_toml(
            r#"
            [scoring.weights]
            skill = 0.35
            qualification = 0.25
            location = 0.15
            sector = 0.15
            diversity = 0.10

            [scoring.skill_embeddings]
            tensorflow = [0.9, 0.1]
            pytorch = [0.8, 0.2]
            "#,
        )
        .unwrap();

        assert_eq!(ScoringWeights::from(&settings.scoring.weights).skill, 0.35);
        assert_eq!(settings.scoring.skill_embeddings().map(|e| e.len()), Some(2));
    }

    #[test]
    fn test_diversity_multiplier_below_one_rejected() {
        let result = from_toml(
            r#"
            [allocation]
            diversity_multiplier = 0.5
            "#,
        );
        assert!(result.is_err());
    }
}
