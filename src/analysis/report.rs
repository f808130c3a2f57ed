use serde::{Deserialize, Deserializer, Serialize};

/// One vulnerable function reported by the model
///
/// Fields are decoded leniently: missing or `null` values become defaults and
/// a numeric string is accepted for `line`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Finding {
    /// Display path of the analysed file; filled in when the model leaves it blank
    #[serde(deserialize_with = "null_as_default")]
    pub file: String,
    /// Name of the vulnerable function
    #[serde(deserialize_with = "null_as_default")]
    pub function: String,
    /// Starting line, when the model gave one
    #[serde(deserialize_with = "lenient_line")]
    pub line: Option<u64>,
    /// Snippet of the function as written
    #[serde(deserialize_with = "null_as_default")]
    pub vulnerable_code: String,
    /// Why the validation is incomplete
    #[serde(deserialize_with = "null_as_default")]
    pub issue: String,
    /// Suggested version with full validation
    #[serde(deserialize_with = "null_as_default")]
    pub corrected_code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub recommendations: Vec<String>,
}

/// Expected shape of one model reply
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub vulnerabilities: Vec<Finding>,
}

/// A file that could not be analysed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileError {
    pub file: String,
    pub error: String,
}

/// An entry of the combined report, told apart by the presence of `error`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReportEntry {
    Error(FileError),
    Finding(Finding),
}

/// Findings and per-file errors of a whole run, in file-processing order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateReport {
    pub vulnerabilities: Vec<ReportEntry>,
}

impl AggregateReport {
    /// Appends the findings of one file, in the order the model gave them
    pub fn push_findings(&mut self, findings: impl IntoIterator<Item = Finding>) {
        self.vulnerabilities
            .extend(findings.into_iter().map(ReportEntry::Finding));
    }

    /// Records that `file` could not be analysed
    pub fn push_error(&mut self, file: impl Into<String>, error: impl Into<String>) {
        self.vulnerabilities.push(ReportEntry::Error(FileError {
            file: file.into(),
            error: error.into(),
        }));
    }

    /// Finding entries only
    pub fn findings(&self) -> impl Iterator<Item = &Finding> {
        self.vulnerabilities.iter().filter_map(|entry| match entry {
            ReportEntry::Finding(finding) => Some(finding),
            ReportEntry::Error(_) => None,
        })
    }

    /// Error entries only
    pub fn errors(&self) -> impl Iterator<Item = &FileError> {
        self.vulnerabilities.iter().filter_map(|entry| match entry {
            ReportEntry::Error(error) => Some(error),
            ReportEntry::Finding(_) => None,
        })
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_line<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_u64(),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}
