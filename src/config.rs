//! # Unified Application Configuration
//!
//! Consolidates the settings of the `pocket-tally` binary into a single
//! structure loaded from environment variables and validated up front.

use crate::errors::{AppError, AppResult};
use crate::price_recognition::{load_price_vocabulary, load_price_vocabulary_from, PriceVocabulary};
use crate::stepped_gesture::{StepConfig, StopPoint};
use std::env;

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Environment name (development, staging, production)
    pub environment: String,
    pub log_level: String,
    /// `json` or `pretty`
    pub log_format: String,
    /// Explicit vocabulary file; when unset the default lookup applies
    pub vocabulary_path: Option<String>,
    pub slider: StepConfig,
    /// Print the Prometheus exposition when the binary exits
    pub print_metrics: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            log_level: "info".to_string(),
            log_format: "json".to_string(),
            vocabulary_path: None,
            slider: StepConfig::default(),
            print_metrics: false,
        }
    }
}

fn parse_list<T: std::str::FromStr>(key: &str, raw: &str) -> AppResult<Vec<T>> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<T>().map_err(|_| {
                AppError::Config(format!("{} contains an invalid entry '{}'", key, part))
            })
        })
        .collect()
}

fn parse_optional<T: std::str::FromStr>(key: &str) -> AppResult<Option<T>> {
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| AppError::Config(format!("{} must be a valid number", key))),
        _ => Ok(None),
    }
}

fn parse_bool(key: &str, default: bool) -> AppResult<bool> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<bool>()
            .map_err(|_| AppError::Config(format!("{} must be 'true' or 'false'", key))),
        Err(_) => Ok(default),
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> AppResult<Self> {
        let defaults = Self::default();

        let thresholds: Vec<f64> = match env::var("SLIDER_STOP_THRESHOLDS") {
            Ok(raw) => parse_list("SLIDER_STOP_THRESHOLDS", &raw)?,
            Err(_) => defaults.slider.stops.iter().map(|s| s.threshold).collect(),
        };
        let magnitudes: Vec<u32> = match env::var("SLIDER_STOP_MAGNITUDES") {
            Ok(raw) => parse_list("SLIDER_STOP_MAGNITUDES", &raw)?,
            Err(_) => defaults.slider.stops.iter().map(|s| s.magnitude).collect(),
        };
        if thresholds.len() != magnitudes.len() {
            return Err(AppError::Config(format!(
                "SLIDER_STOP_THRESHOLDS has {} entries but SLIDER_STOP_MAGNITUDES has {}",
                thresholds.len(),
                magnitudes.len()
            )));
        }

        let slider = StepConfig::new(
            thresholds
                .into_iter()
                .zip(magnitudes)
                .map(|(threshold, magnitude)| StopPoint::new(threshold, magnitude))
                .collect(),
        )
        .with_clamp(parse_optional("SLIDER_MIN")?, parse_optional("SLIDER_MAX")?);

        Ok(Self {
            environment: env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            log_level: env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
            log_format: env::var("LOG_FORMAT").unwrap_or(defaults.log_format),
            vocabulary_path: env::var("PRICE_VOCABULARY_CONFIG_PATH").ok(),
            slider,
            print_metrics: parse_bool("PRINT_METRICS", defaults.print_metrics)?,
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Resolve the price vocabulary. An explicit path must load; otherwise the
    /// fallback lookup of [`load_price_vocabulary`] applies.
    pub fn price_vocabulary(&self) -> AppResult<PriceVocabulary> {
        match &self.vocabulary_path {
            Some(path) => load_price_vocabulary_from(path),
            None => Ok(load_price_vocabulary()),
        }
    }

    /// Validate the complete configuration
    pub fn validate(&self) -> AppResult<()> {
        if !matches!(self.log_format.as_str(), "json" | "pretty") {
            return Err(AppError::Config(format!(
                "LOG_FORMAT must be 'json' or 'pretty', got '{}'",
                self.log_format
            )));
        }
        if self.log_level.parse::<tracing::Level>().is_err() {
            return Err(AppError::Config(format!(
                "LOG_LEVEL '{}' is not a valid level",
                self.log_level
            )));
        }
        self.slider
            .validate()
            .map_err(|e| AppError::Config(format!("slider configuration: {}", e)))?;
        if let Some(path) = &self.vocabulary_path {
            self.price_vocabulary().map_err(|e| {
                AppError::Config(format!("price vocabulary at '{}': {}", path, e))
            })?;
        }
        Ok(())
    }
}
