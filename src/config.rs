//! Conversion configuration.
//!
//! [`ConversionConfig`] holds every path and naming choice of a conversion
//! run. All fields have defaults matching the Siena Scalp EEG release, so a
//! caller usually only sets the two roots:
//!
//! ```
//! use siena2bids::ConversionConfig;
//!
//! let cfg = ConversionConfig {
//!     source_root: "/data/siena-scalp-eeg/1.0.0".into(),
//!     bids_root:   "/data/siena-bids".into(),
//!     ..ConversionConfig::default()
//! };
//! assert_eq!(cfg.seizure_list_name("PN05"), "Seizures-list-PN05.txt");
//! assert_eq!(cfg.bids_subject_id("PN05"), "05");
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::bids::DatasetDescription;
use crate::error::{ConvertError, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    /// Dataset root holding `PNxx/` subject directories.
    pub source_root: PathBuf,

    /// Output BIDS root; created when absent.
    pub bids_root: PathBuf,

    /// Directory-name prefix identifying subjects. Stripped to form the
    /// BIDS subject label (`PN00` → `00`).
    ///
    /// Default: `"PN"`.
    pub subject_prefix: String,

    /// Recording file extension without the dot. Also marks section headers
    /// in delimited seizure lists.
    ///
    /// Default: `"edf"`.
    pub recording_extension: String,

    /// File-name prefix of the per-subject seizure list; the subject
    /// directory name and `.txt` are appended.
    ///
    /// Default: `"Seizures-list-"`.
    pub seizure_list_prefix: String,

    /// Demographics table at the source root, used for `participants.tsv`.
    ///
    /// Default: `"subject_info.csv"`.
    pub subject_info_file: String,

    /// BIDS session label. Default: `"01"`.
    pub session: String,

    /// BIDS task label. Default: `"seizuremonitoring"`.
    pub task: String,

    /// Contents of `dataset_description.json`.
    pub dataset: DatasetDescription,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            source_root: PathBuf::from("siena-scalp-eeg"),
            bids_root: PathBuf::from("siena-bids"),
            subject_prefix: "PN".to_string(),
            recording_extension: "edf".to_string(),
            seizure_list_prefix: "Seizures-list-".to_string(),
            subject_info_file: "subject_info.csv".to_string(),
            session: "01".to_string(),
            task: "seizuremonitoring".to_string(),
            dataset: DatasetDescription::default(),
        }
    }
}

fn is_bids_label(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric())
}

impl ConversionConfig {
    /// Loads a JSON configuration; missing keys take their defaults
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            ConvertError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that labels can be used in BIDS entity names
    pub fn validate(&self) -> Result<()> {
        if !is_bids_label(&self.session) {
            return Err(ConvertError::Config(format!("session label '{}' must be alphanumeric", self.session)));
        }
        if !is_bids_label(&self.task) {
            return Err(ConvertError::Config(format!("task label '{}' must be alphanumeric", self.task)));
        }
        if self.subject_prefix.is_empty() {
            return Err(ConvertError::Config("subject prefix must not be empty".to_string()));
        }
        if self.recording_extension.is_empty() || self.recording_extension.starts_with('.') {
            return Err(ConvertError::Config(format!(
                "recording extension '{}' must be non-empty and given without the dot",
                self.recording_extension
            )));
        }
        Ok(())
    }

    /// Seizure list file name for a subject directory
    pub fn seizure_list_name(&self, subject_dir_name: &str) -> String {
        format!("{}{}.txt", self.seizure_list_prefix, subject_dir_name)
    }

    /// BIDS subject label for a subject directory (`PN00` → `00`)
    pub fn bids_subject_id(&self, subject_dir_name: &str) -> String {
        subject_dir_name.replace(&self.subject_prefix, "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let cfg = ConversionConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.session, "01");
        assert_eq!(cfg.task, "seizuremonitoring");
    }

    #[test]
    fn test_rejects_non_alphanumeric_labels() {
        let cfg = ConversionConfig {
            task: "seizure-monitoring".to_string(),
            ..ConversionConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConvertError::Config(_))));

        let cfg = ConversionConfig {
            recording_extension: ".edf".to_string(),
            ..ConversionConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let path = std::env::temp_dir().join("siena2bids_config_partial.json");
        fs::write(&path, r#"{ "source_root": "/in", "session": "02" }"#).unwrap();

        let cfg = ConversionConfig::from_json_file(&path).unwrap();
        assert_eq!(cfg.source_root, PathBuf::from("/in"));
        assert_eq!(cfg.session, "02");
        assert_eq!(cfg.subject_prefix, "PN");
        assert_eq!(cfg.dataset.name, "Siena Scalp EEG Dataset");

        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_missing_config_file() {
        let err = ConversionConfig::from_json_file("/nonexistent/siena2bids.json").unwrap_err();
        assert!(matches!(err, ConvertError::Config(_)));
    }
}
