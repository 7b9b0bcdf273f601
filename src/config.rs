//! Pipeline configuration.
//!
//! A run is described by a small JSON document:
//!
//! ```json
//! {
//!   "input": "armut_data.csv",
//!   "min_support": 0.01,
//!   "metric": "support",
//!   "min_threshold": 0.01,
//!   "rec_count": 1,
//!   "queries": ["2_0"]
//! }
//! ```
//!
//! Every field except `input` has a default.

use crate::error::{BasketError, Result};
use crate::mining::{Apriori, RuleMetric, DEFAULT_MIN_SUPPORT, DEFAULT_MIN_THRESHOLD};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_min_support() -> f64 {
    DEFAULT_MIN_SUPPORT
}

fn default_min_threshold() -> f64 {
    DEFAULT_MIN_THRESHOLD
}

fn default_rec_count() -> usize {
    1
}

/// Settings for one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Transaction CSV
    pub input: PathBuf,
    /// Minimum itemset support
    #[serde(default = "default_min_support")]
    pub min_support: f64,
    /// Metric rules are filtered by
    #[serde(default)]
    pub metric: RuleMetric,
    /// Minimum value of `metric`
    #[serde(default = "default_min_threshold")]
    pub min_threshold: f64,
    /// Largest itemset size to mine
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_len: Option<usize>,
    /// Recommendations per query
    #[serde(default = "default_rec_count")]
    pub rec_count: usize,
    /// Item keys to recommend for
    #[serde(default)]
    pub queries: Vec<String>,
}

impl PipelineConfig {
    /// Creates a configuration with defaults for `input`.
    #[must_use]
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            min_support: DEFAULT_MIN_SUPPORT,
            metric: RuleMetric::default(),
            min_threshold: DEFAULT_MIN_THRESHOLD,
            max_len: None,
            rec_count: default_rec_count(),
            queries: Vec::new(),
        }
    }

    /// Set the minimum support threshold.
    #[must_use]
    pub fn with_min_support(mut self, min_support: f64) -> Self {
        self.min_support = min_support;
        self
    }

    /// Set the rule metric and its threshold.
    #[must_use]
    pub fn with_metric(mut self, metric: RuleMetric, min_threshold: f64) -> Self {
        self.metric = metric;
        self.min_threshold = min_threshold;
        self
    }

    /// Limit mined itemsets to `max_len` items.
    #[must_use]
    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = Some(max_len);
        self
    }

    /// Set how many items each query returns.
    #[must_use]
    pub fn with_rec_count(mut self, rec_count: usize) -> Self {
        self.rec_count = rec_count;
        self
    }

    /// Add an item key to recommend for.
    #[must_use]
    pub fn with_query(mut self, item: impl Into<String>) -> Self {
        self.queries.push(item.into());
        self
    }

    /// Loads and validates a JSON configuration file.
    ///
    /// A relative `input` is resolved against the directory holding the
    /// configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON for
    /// this schema, or fails [`PipelineConfig::validate`].
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let mut config = Self::from_json(&text)?;
        if config.input.is_relative() {
            if let Some(dir) = path.parent() {
                config.input = dir.join(&config.input);
            }
        }
        Ok(config)
    }

    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns an error on malformed JSON or invalid values.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`BasketError::InvalidHyperparameter`] for the first bad value.
    pub fn validate(&self) -> Result<()> {
        if !(self.min_support > 0.0 && self.min_support <= 1.0) {
            return Err(BasketError::invalid_hyperparameter(
                "min_support",
                self.min_support,
                "a value in (0, 1]",
            ));
        }
        if !self.min_threshold.is_finite() {
            return Err(BasketError::invalid_hyperparameter(
                "min_threshold",
                self.min_threshold,
                "a finite number",
            ));
        }
        if self.max_len == Some(0) {
            return Err(BasketError::invalid_hyperparameter("max_len", 0, ">= 1"));
        }
        if self.input.as_os_str().is_empty() {
            return Err(BasketError::Config("input path is empty".to_string()));
        }
        Ok(())
    }

    /// The miner these settings describe.
    #[must_use]
    pub fn miner(&self) -> Apriori {
        let miner = Apriori::new()
            .with_min_support(self.min_support)
            .with_metric(self.metric, self.min_threshold);
        match self.max_len {
            Some(max_len) => miner.with_max_len(max_len),
            None => miner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_from_minimal_json() {
        let config = PipelineConfig::from_json(r#"{"input": "data.csv"}"#).expect("valid");
        assert_eq!(config.input, PathBuf::from("data.csv"));
        assert_eq!(config.min_support, 0.01);
        assert_eq!(config.metric, RuleMetric::Support);
        assert_eq!(config.min_threshold, 0.01);
        assert_eq!(config.max_len, None);
        assert_eq!(config.rec_count, 1);
        assert!(config.queries.is_empty());
        assert_eq!(config, PipelineConfig::new("data.csv"));
    }

    #[test]
    fn test_full_json() {
        let json = r#"{
            "input": "/tmp/x.csv",
            "min_support": 0.05,
            "metric": "lift",
            "min_threshold": 1.5,
            "max_len": 3,
            "rec_count": 4,
            "queries": ["2_0", "15_1"]
        }"#;
        let config = PipelineConfig::from_json(json).expect("valid");
        assert_eq!(config.metric, RuleMetric::Lift);
        assert_eq!(config.max_len, Some(3));
        assert_eq!(config.queries, vec!["2_0".to_string(), "15_1".to_string()]);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = PipelineConfig::from_json(r#"{"input": "a.csv", "min_suport": 0.1}"#).unwrap_err();
        assert!(matches!(err, BasketError::Config(_)));
    }

    #[test]
    fn test_unknown_metric_rejected() {
        let err = PipelineConfig::from_json(r#"{"input": "a.csv", "metric": "zhang"}"#).unwrap_err();
        assert!(matches!(err, BasketError::Config(_)));
    }

    #[test]
    fn test_validate_ranges() {
        assert!(PipelineConfig::new("a.csv").with_min_support(0.0).validate().is_err());
        assert!(PipelineConfig::new("a.csv").with_min_support(1.01).validate().is_err());
        assert!(PipelineConfig::new("a.csv")
            .with_metric(RuleMetric::Lift, f64::INFINITY)
            .validate()
            .is_err());
        assert!(PipelineConfig::new("a.csv").with_max_len(0).validate().is_err());
        assert!(PipelineConfig::new("").validate().is_err());
        assert!(PipelineConfig::new("a.csv").with_min_support(1.0).validate().is_ok());
    }

    #[test]
    fn test_miner_reflects_settings() {
        let miner = PipelineConfig::new("a.csv")
            .with_min_support(0.2)
            .with_metric(RuleMetric::Confidence, 0.4)
            .miner();
        assert_eq!(miner.min_support(), 0.2);
        assert_eq!(miner.metric(), RuleMetric::Confidence);
        assert_eq!(miner.min_threshold(), 0.4);
    }

    #[test]
    fn test_from_path_resolves_relative_input() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("run.json");
        let mut file = std::fs::File::create(&path).expect("create");
        write!(file, r#"{{"input": "events.csv", "queries": ["2_0"]}}"#).expect("write");

        let config = PipelineConfig::from_path(&path).expect("valid");
        assert_eq!(config.input, dir.path().join("events.csv"));
        assert_eq!(config.queries, vec!["2_0".to_string()]);
    }

    #[test]
    fn test_round_trip_through_json() {
        let config = PipelineConfig::new("a.csv").with_query("2_0").with_rec_count(3);
        let json = serde_json::to_string(&config).expect("serialize");
        assert_eq!(PipelineConfig::from_json(&json).expect("parse"), config);
    }
}
