use std::fs;
use std::path::Path;

use regex::Regex;

use crate::config::AcquisitionSettings;
use crate::error::{AuditError, Result};

/// Decides which files are analysed and loads their text
#[derive(Debug, Clone)]
pub struct EligibilityPolicy {
    max_file_size: u64,
    extensions: Vec<String>,
    excluded: Vec<Regex>,
}

impl EligibilityPolicy {
    /// Compiles the exclude patterns; an invalid regex is a config error
    pub fn from_settings(settings: &AcquisitionSettings) -> Result<Self> {
        let excluded = settings
            .exclude_patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| {
                    AuditError::config(format!("Invalid exclude pattern '{}': {}", pattern, e))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            max_file_size: settings.max_file_size,
            extensions: settings.extensions.clone(),
            excluded,
        })
    }

    /// True when the file name ends with one of the configured suffixes
    pub fn has_allowed_extension(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .map(|name| self.extensions.iter().any(|ext| name.ends_with(ext.as_str())))
            .unwrap_or(false)
    }

    /// True when `relative` matches an exclusion pattern
    pub fn is_excluded(&self, relative: &Path) -> bool {
        if self.excluded.is_empty() {
            return false;
        }
        let path_str = relative.to_string_lossy().replace('\\', "/");
        self.excluded.iter().any(|regex| regex.is_match(&path_str))
    }

    /// Extensions joined for error messages, e.g. `.py or .ts`
    pub fn describe_extensions(&self) -> String {
        self.extensions.join(" or ")
    }

    /// Reads `path` after the size check; rejects undecodable or blank files
    pub fn load(&self, path: &Path) -> Result<String> {
        let size = fs::metadata(path)?.len();
        if size > self.max_file_size {
            return Err(AuditError::TooLarge {
                path: path.to_path_buf(),
                size,
                limit: self.max_file_size,
            });
        }

        let bytes = fs::read(path)?;
        let content =
            String::from_utf8(bytes).map_err(|_| AuditError::DecodeFailure(path.to_path_buf()))?;

        if content.trim().is_empty() {
            return Err(AuditError::Empty(path.to_path_buf()));
        }
        Ok(content)
    }
}
