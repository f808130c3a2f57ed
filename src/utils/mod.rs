pub mod path;
pub mod retry;

pub use path::{normalize_repo_relative_path, normalize_user_input_path};
pub use retry::{with_retry, Exhausted, RetryPolicy};
