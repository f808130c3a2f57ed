#![allow(dead_code)]

use std::fs;

use serde_json::json;
use tempfile::TempDir;

pub mod test_helpers {
    use super::*;

    /// Creates a temporary tree from `(relative path, content)` pairs
    pub fn write_tree(files: &[(&str, &str)]) -> TempDir {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        for (relative, content) in files {
            let path = temp_dir.path().join(relative);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).expect("failed to create parent dir");
            }
            fs::write(&path, content).expect("failed to write fixture");
        }
        temp_dir
    }

    /// A chat-completions response body whose assistant text is `content`
    pub fn completion_body(content: &str) -> String {
        json!({
            "id": "chatcmpl-test",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }]
        })
        .to_string()
    }

    /// Body regex matching the user message of a request about `display_path`
    pub fn names_file(display_path: &str) -> mockito::Matcher {
        mockito::Matcher::Regex(format!("from {}:", regex::escape(display_path)))
    }

    pub fn setup_test_logger() {
        let _ = env_logger::builder()
            .filter_level(log::LevelFilter::Debug)
            .is_test(true)
            .try_init();
    }
}
