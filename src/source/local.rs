use std::path::Path;

use log::{debug, warn};
use walkdir::WalkDir;

use super::eligibility::EligibilityPolicy;
use super::SourceFile;
use crate::error::{AuditError, Result};

/// Reads exactly one file, failing on the first violated rule
///
/// Checks run in order: existence, extension, size, UTF-8, emptiness.
pub fn read_single_file(path: &Path, policy: &EligibilityPolicy) -> Result<SourceFile> {
    if !path.exists() {
        return Err(AuditError::NotFound(path.to_path_buf()));
    }
    if !path.is_file() || !policy.has_allowed_extension(path) {
        return Err(AuditError::WrongExtension {
            path: path.to_path_buf(),
            allowed: policy.describe_extensions(),
        });
    }

    let content = policy.load(path)?;
    Ok(SourceFile {
        path: path.to_path_buf(),
        content,
    })
}

/// Collects every eligible file under `root`, sorted by path
///
/// Ineligible and unreadable files are logged and skipped; the walk never aborts.
/// Symbolic links are followed, so a linked source file is read like any other
/// and a link loop is reported as an unreadable entry.
pub fn collect_files(root: &Path, policy: &EligibilityPolicy) -> Vec<SourceFile> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_file() || !policy.has_allowed_extension(entry.path()) {
            continue;
        }

        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path);
        if policy.is_excluded(relative) {
            debug!("Skipping {}: matches an exclude pattern", path.display());
            continue;
        }

        match policy.load(path) {
            Ok(content) => files.push(SourceFile {
                path: path.to_path_buf(),
                content,
            }),
            Err(e) => warn!("Skipping {}: {}", path.display(), skip_reason(&e)),
        }
    }

    files
}

fn skip_reason(error: &AuditError) -> String {
    match error {
        AuditError::TooLarge { limit, .. } => format!("File size exceeds {} bytes", limit),
        AuditError::Empty(_) => "File is empty".to_string(),
        AuditError::DecodeFailure(_) => "Unable to decode file as UTF-8".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AcquisitionSettings;
    use std::fs;
    use tempfile::TempDir;

    fn policy() -> EligibilityPolicy {
        EligibilityPolicy::from_settings(&AcquisitionSettings::default()).unwrap()
    }

    #[test]
    fn test_walk_filters_and_orders() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("pkg/nested")).unwrap();
        fs::write(root.join("b.ts"), "export const b = 1;").unwrap();
        fs::write(root.join("a.py"), "def a(): return True").unwrap();
        fs::write(root.join("README.md"), "# readme").unwrap();
        fs::write(root.join("pkg/nested/c.py"), "def c(): return False").unwrap();
        fs::write(root.join("pkg/empty.py"), "\n").unwrap();
        fs::write(root.join("pkg/binary.ts"), [0xc3, 0x28]).unwrap();

        let files = collect_files(root, &policy());
        let relative: Vec<_> = files
            .iter()
            .map(|f| f.path.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();

        assert_eq!(relative, vec!["a.py", "b.ts", "pkg/nested/c.py"]);
        assert_eq!(files[0].content, "def a(): return True");
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_reads_symlinked_sources() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("real.txt"), "def linked(x): return True").unwrap();
        std::os::unix::fs::symlink(root.join("real.txt"), root.join("link.py")).unwrap();
        fs::create_dir(root.join("shared")).unwrap();
        fs::write(root.join("shared/guard.ts"), "export const g = 1;").unwrap();
        std::os::unix::fs::symlink(root.join("shared"), root.join("alias")).unwrap();

        let files = collect_files(root, &policy());
        let relative: Vec<_> = files
            .iter()
            .map(|f| f.path.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();

        assert_eq!(relative, vec!["alias/guard.ts", "link.py", "shared/guard.ts"]);
        assert_eq!(files[1].content, "def linked(x): return True");
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_survives_symlink_loop() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir(root.join("pkg")).unwrap();
        fs::write(root.join("pkg/a.py"), "def a(): return True").unwrap();
        std::os::unix::fs::symlink(root.join("pkg"), root.join("pkg/again")).unwrap();

        let files = collect_files(root, &policy());
        assert_eq!(files.len(), 1);
        assert!(files[0].path.ends_with("pkg/a.py"));
    }

    #[test]
    fn test_walk_of_empty_tree() {
        let temp_dir = TempDir::new().unwrap();
        assert!(collect_files(temp_dir.path(), &policy()).is_empty());
    }

    #[test]
    fn test_single_file_errors() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("notes.txt"), "hello").unwrap();
        fs::write(root.join("blank.py"), "   ").unwrap();

        assert!(matches!(
            read_single_file(&root.join("missing.py"), &policy()),
            Err(AuditError::NotFound(_))
        ));
        assert!(matches!(
            read_single_file(&root.join("notes.txt"), &policy()),
            Err(AuditError::WrongExtension { .. })
        ));
        assert!(matches!(
            read_single_file(&root.join("blank.py"), &policy()),
            Err(AuditError::Empty(_))
        ));
    }

    #[test]
    fn test_directory_named_like_source_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("module.py");
        fs::create_dir(&dir).unwrap();

        assert!(matches!(
            read_single_file(&dir, &policy()),
            Err(AuditError::WrongExtension { .. })
        ));
    }
}
