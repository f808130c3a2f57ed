use std::path::PathBuf;

/// Normalize a user-provided local path string into a PathBuf suitable for acquisition.
///
/// - Trims leading/trailing ASCII and Unicode whitespace
/// - Strips surrounding single or double quotes if present
/// - Expands a leading '~' to the HOME directory when possible
pub fn normalize_user_input_path(input: &str) -> PathBuf {
    let unquoted = strip_quoting(input);

    if unquoted == "~" || unquoted.starts_with("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            let mut buf = PathBuf::from(home);
            let rest = unquoted.trim_start_matches('~').trim_start_matches('/');
            if !rest.is_empty() {
                buf.push(rest);
            }
            return buf;
        }
    }

    PathBuf::from(unquoted)
}

/// Normalize a path naming a file inside a repository
///
/// Trims and unquotes like [`normalize_user_input_path`] but never expands
/// `~`, which has no meaning relative to a repository root.
pub fn normalize_repo_relative_path(input: &str) -> PathBuf {
    PathBuf::from(strip_quoting(input))
}

fn strip_quoting(input: &str) -> &str {
    let trimmed = input.trim();

    if trimmed.len() >= 2
        && ((trimmed.starts_with('"') && trimmed.ends_with('"'))
            || (trimmed.starts_with('\'') && trimmed.ends_with('\'')))
    {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    }
}
