//! Configuration management for the CV screener

use crate::error::{Result, ScreenerError};
use crate::scoring::criterion::CriterionKey;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub scoring: ScoringConfig,
    pub batch: BatchConfig,
    pub output: OutputConfig,
}

/// Aggregation policy. The formula shape (normalized weighted base plus
/// penalty, clamped to 0-100) is fixed; the weights and scales are not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub experience_weight: f32,
    pub skills_weight: f32,
    pub education_weight: f32,
    pub languages_weight: f32,
    pub strengths_weight: f32,
    /// Divisor applied to the weaknesses value before scaling to 0-100.
    pub penalty_scale: f32,
    /// How many characters of the job description open the critical analysis.
    pub summary_preview_chars: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Upper bound on candidates scored at the same time.
    pub max_concurrency: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scoring: ScoringConfig {
                experience_weight: 1.0,
                skills_weight: 1.0,
                education_weight: 1.0,
                languages_weight: 1.0,
                strengths_weight: 1.0,
                penalty_scale: 3.0,
                summary_preview_chars: 160,
            },
            batch: BatchConfig { max_concurrency: 4 },
            output: OutputConfig {
                format: OutputFormat::Console,
                detailed: false,
                color_output: true,
            },
        }
    }
}

impl ScoringConfig {
    /// Weight of one positive criterion. Weaknesses has no weight; it enters
    /// the formula as a separate penalty term.
    pub fn weight_for(&self, key: CriterionKey) -> f32 {
        match key {
            CriterionKey::Experience => self.experience_weight,
            CriterionKey::Skills => self.skills_weight,
            CriterionKey::Education => self.education_weight,
            CriterionKey::Languages => self.languages_weight,
            CriterionKey::Strengths => self.strengths_weight,
            CriterionKey::Weaknesses => 0.0,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let total: f32 = CriterionKey::POSITIVE
            .iter()
            .map(|k| self.weight_for(*k))
            .sum();
        if total <= 0.0 {
            return Err(ScreenerError::Configuration(
                "positive criterion weights must sum to a positive value".to_string(),
            ));
        }
        if self.penalty_scale <= 0.0 {
            return Err(ScreenerError::Configuration(
                "penalty_scale must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content).map_err(|e| {
                ScreenerError::Configuration(format!("Failed to parse config: {}", e))
            })?;
            config.scoring.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            ScreenerError::Configuration(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(&config_path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("cv-screener")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_are_equal_and_valid() {
        let config = Config::default();
        assert!(config.scoring.validate().is_ok());
        for key in CriterionKey::POSITIVE {
            assert_eq!(config.scoring.weight_for(key), 1.0);
        }
        assert_eq!(config.scoring.weight_for(CriterionKey::Weaknesses), 0.0);
    }

    #[test]
    fn zero_weights_rejected() {
        let mut config = Config::default();
        config.scoring.experience_weight = 0.0;
        config.scoring.skills_weight = 0.0;
        config.scoring.education_weight = 0.0;
        config.scoring.languages_weight = 0.0;
        config.scoring.strengths_weight = 0.0;
        assert!(config.scoring.validate().is_err());
    }
}
