//! Source acquisition: turn a repository URL or local path into in-memory files
//!
//! Remote repositories are cloned into a [`tempfile::TempDir`] owned by a
//! single [`SourceAcquirer::acquire`] call. Contents are read into memory
//! before the guard drops, so the clone is removed on every exit path.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use log::info;
use tempfile::TempDir;

use crate::config::AcquisitionSettings;
use crate::error::{AuditError, Result};

pub mod eligibility;
pub mod local;
pub mod remote;

pub use eligibility::EligibilityPolicy;

/// Where the code to analyse lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// A git URL (or anything `git clone` accepts)
    Remote(String),
    /// A local directory, or a single local file
    Local(PathBuf),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote(url) => write!(f, "{}", url),
            Self::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// One eligible file and its full text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path on disk at acquisition time
    pub path: PathBuf,
    /// UTF-8 content
    pub content: String,
}

/// Result of one acquisition
#[derive(Debug, Clone)]
pub struct Acquisition {
    /// Working root the files were resolved against; `None` for a lone local file
    pub root: Option<PathBuf>,
    /// Files in processing order
    pub files: Vec<SourceFile>,
}

impl Acquisition {
    /// Path shown to the model and in the report for `file`
    ///
    /// Relative to the working root when there is one, otherwise the path as given.
    pub fn display_path(&self, file: &SourceFile) -> String {
        let shown = match &self.root {
            Some(root) => pathdiff::diff_paths(&file.path, root).unwrap_or_else(|| file.path.clone()),
            None => file.path.clone(),
        };
        shown.to_string_lossy().replace('\\', "/")
    }
}

/// Produces the set of files a run will analyse
#[derive(Debug, Clone)]
pub struct SourceAcquirer {
    policy: EligibilityPolicy,
}

impl SourceAcquirer {
    /// Builds the acquirer, compiling the exclude patterns of `settings`
    pub fn new(settings: &AcquisitionSettings) -> Result<Self> {
        Ok(Self {
            policy: EligibilityPolicy::from_settings(settings)?,
        })
    }

    /// Acquires files from `location`, optionally restricted to `single_path`
    ///
    /// `single_path` is resolved under the working root. In single-file mode
    /// every eligibility failure is an error; in walk mode they are skipped.
    pub async fn acquire(&self, location: &Location, single_path: Option<&Path>) -> Result<Acquisition> {
        match location {
            Location::Remote(url) => {
                let temp_dir = TempDir::new()?;
                let root = remote::clone_repository(url, temp_dir.path()).await?;
                let acquisition = self.read_tree(root, single_path);
                // temp_dir drops here, after every file has been read
                drop(temp_dir);
                acquisition
            }
            Location::Local(path) => {
                if !path.exists() {
                    return Err(AuditError::NotFound(path.clone()));
                }
                if path.is_file() && single_path.is_none() {
                    let file = local::read_single_file(path, &self.policy)?;
                    return Ok(Acquisition {
                        root: None,
                        files: vec![file],
                    });
                }
                self.read_tree(path.clone(), single_path)
            }
        }
    }

    fn read_tree(&self, root: PathBuf, single_path: Option<&Path>) -> Result<Acquisition> {
        let files = match single_path {
            Some(relative) => {
                ensure_inside_root(relative)?;
                vec![local::read_single_file(&root.join(relative), &self.policy)?]
            }
            None => {
                let files = local::collect_files(&root, &self.policy);
                info!("Found {} eligible file(s) under {}", files.len(), root.display());
                files
            }
        };

        Ok(Acquisition {
            root: Some(root),
            files,
        })
    }
}

/// Rejects root-relative paths that are absolute or climb out with `..`
fn ensure_inside_root(relative: &Path) -> Result<()> {
    let escapes = relative.components().any(|component| {
        !matches!(component, Component::Normal(_) | Component::CurDir)
    });
    if escapes {
        return Err(AuditError::OutsideRoot(relative.to_path_buf()));
    }
    Ok(())
}
