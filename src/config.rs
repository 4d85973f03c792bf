//! Run configuration: the subject list, query suffix and search language.
//!
//! Everything has a built-in default, so the YAML file is optional and may
//! set any subset of keys:
//!
//! ```yaml
//! subjects:
//!   - Reliance Industries
//!   - HDFC Bank
//! query_suffix: stock India
//! lang: en
//! ```

use crate::fetcher::DEFAULT_QUERY_SUFFIX;
use serde::Deserialize;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Stocks in the F&O segment queried when no list is configured.
pub const DEFAULT_SUBJECTS: &[&str] = &[
    "Reliance Industries",
    "HDFC Bank",
    "ICICI Bank",
    "Infosys",
    "TCS",
    "Axis Bank",
    "State Bank of India",
    "Bharti Airtel",
    "HCL Tech",
    "ITC",
    "Kotak Mahindra Bank",
    "Larsen & Toubro",
    "Maruti Suzuki",
    "Bajaj Finance",
    "Adani Enterprises",
    "NTPC",
    "Power Grid",
    "Hindustan Unilever",
    "Tata Motors",
    "Tata Steel",
    "UltraTech Cement",
    "JSW Steel",
    "Tech Mahindra",
    "Sun Pharma",
    "Wipro",
    "Asian Paints",
    "SBI Life Insurance",
];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub subjects: Vec<String>,
    pub query_suffix: String,
    pub lang: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            subjects: DEFAULT_SUBJECTS.iter().map(|s| s.to_string()).collect(),
            query_suffix: DEFAULT_QUERY_SUFFIX.to_string(),
            lang: "en".to_string(),
        }
    }
}

impl FetchConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, Box<dyn Error>> {
        let config: FetchConfig = serde_yaml::from_str(yaml)?;
        if config.lang.trim().is_empty() {
            return Err("config: `lang` must not be empty".into());
        }
        Ok(config)
    }

    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub async fn load(path: &Path) -> Result<Self, Box<dyn Error>> {
        let yaml = fs::read_to_string(path).await?;
        let config = Self::from_yaml(&yaml)?;
        info!(subjects = config.subjects.len(), lang = %config.lang, "Loaded configuration");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FetchConfig::default();
        assert_eq!(config.subjects.len(), 27);
        assert_eq!(config.subjects[0], "Reliance Industries");
        assert_eq!(config.query_suffix, "stock India");
        assert_eq!(config.lang, "en");
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = FetchConfig::from_yaml("subjects:\n  - Infosys\n  - Wipro\n").unwrap();
        assert_eq!(config.subjects, vec!["Infosys", "Wipro"]);
        assert_eq!(config.query_suffix, "stock India");
        assert_eq!(config.lang, "en");
    }

    #[test]
    fn test_full_yaml() {
        let yaml = "subjects: [NTPC]\nquery_suffix: share price\nlang: hi\n";
        let config = FetchConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.subjects, vec!["NTPC"]);
        assert_eq!(config.query_suffix, "share price");
        assert_eq!(config.lang, "hi");
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(FetchConfig::from_yaml("subjects: {not: [a list").is_err());
        assert!(FetchConfig::from_yaml("lang: ''").is_err());
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.yaml");
        std::fs::write(&path, "query_suffix: NSE\n").unwrap();

        let config = FetchConfig::load(&path).await.unwrap();
        assert_eq!(config.query_suffix, "NSE");
        assert_eq!(config.subjects.len(), DEFAULT_SUBJECTS.len());
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(FetchConfig::load(&tmp.path().join("nope.yaml")).await.is_err());
    }
}
