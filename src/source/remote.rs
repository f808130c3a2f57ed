use std::path::{Path, PathBuf};
use std::process::Stdio;

use log::info;
use tokio::process::Command;

use crate::error::{AuditError, Result};

/// Directory name for a clone: the last URL segment without `.git`
pub fn repo_name(repo_url: &str) -> String {
    let name = repo_url
        .trim()
        .trim_end_matches('/')
        .rsplit(|c| c == '/' || c == ':')
        .next()
        .unwrap_or("")
        .trim_end_matches(".git");

    if name.is_empty() {
        "repository".to_string()
    } else {
        name.to_string()
    }
}

/// Shallow-clones `repo_url` into `parent/<repo name>` and returns the clone root
pub async fn clone_repository(repo_url: &str, parent: &Path) -> Result<PathBuf> {
    let dest = parent.join(repo_name(repo_url));
    info!("Cloning {} into {}", repo_url, dest.display());

    let output = Command::new("git")
        .arg("clone")
        .arg("--depth")
        .arg("1")
        .arg("--quiet")
        .arg(repo_url)
        .arg(&dest)
        .env("GIT_TERMINAL_PROMPT", "0")
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|e| AuditError::CloneFailure {
            url: repo_url.to_string(),
            reason: format!("could not run git: {}", e),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(AuditError::CloneFailure {
            url: repo_url.to_string(),
            reason: if stderr.is_empty() {
                format!("git exited with {}", output.status)
            } else {
                stderr
            },
        });
    }

    Ok(dest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_repo_name() {
        assert_eq!(repo_name("https://github.com/user/repo.git"), "repo");
        assert_eq!(repo_name("https://github.com/user/repo/"), "repo");
        assert_eq!(repo_name("git@github.com:user/tool.git"), "tool");
        assert_eq!(repo_name("/srv/git/local"), "local");
        assert_eq!(repo_name(""), "repository");
    }

    #[tokio::test]
    async fn test_clone_failure_names_the_url() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("does-not-exist");
        let url = missing.to_string_lossy().to_string();

        let err = clone_repository(&url, &temp_dir.path().join("clones")).await.unwrap_err();
        match err {
            AuditError::CloneFailure { url: failed, .. } => assert_eq!(failed, url),
            other => panic!("expected CloneFailure, got {other:?}"),
        }
    }
}
