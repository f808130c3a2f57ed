use std::path::Path;
use std::sync::Arc;

use mockito::Server;
use pretty_assertions::assert_eq;
use predicate_audit::config::LlmSettings;
use predicate_audit::{AuditError, Auditor, Config, Credentials, GroqClient, Location, ReportEntry};

mod common;
use common::test_helpers::*;

fn auditor_for(server: &mockito::ServerGuard) -> Auditor {
    let mut config = Config::default();
    config.llm = LlmSettings {
        base_url: server.url(),
        ..LlmSettings::default()
    };
    config.retry.delay_seconds = 0;

    let client = GroqClient::new(&Credentials::new("test-key"), &config.llm).unwrap();
    Auditor::new(Arc::new(client), &config).unwrap()
}

#[tokio::test]
async fn test_repository_walk_against_mock_endpoint() {
    setup_test_logger();
    let tree = write_tree(&[
        ("guards/is_map.py", "def is_map(x) -> TypeGuard[dict[str, int]]:\n    return isinstance(x, dict)\n"),
        ("web/predicates.ts", "export function isMap(x: unknown): x is Record<string, number> { return true; }\n"),
        ("docs/notes.md", "not analysed"),
    ]);
    let mut server = Server::new_async().await;

    let python = server
        .mock("POST", "/chat/completions")
        .match_body(names_file("guards/is_map.py"))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body(
            "Here is my analysis:\n```json\n{\"vulnerabilities\": [\
             {\"file\": \"guards/is_map.py\", \"function\": \"is_map\", \"line\": 1, \
              \"vulnerable_code\": \"return isinstance(x, dict)\", \"issue\": \"keys and values unchecked\", \
              \"corrected_code\": \"...\", \"recommendations\": [\"use mypy --strict\"]},\
             {\"file\": \"guards/is_map.py\", \"function\": \"is_map_again\", \"line\": 9}]}\n```",
        ))
        .expect(1)
        .create_async()
        .await;

    let typescript = server
        .mock("POST", "/chat/completions")
        .match_body(names_file("web/predicates.ts"))
        .with_status(502)
        .with_body("bad gateway")
        .expect(3)
        .create_async()
        .await;

    let report = auditor_for(&server)
        .run(&Location::Local(tree.path().to_path_buf()), None)
        .await
        .unwrap();

    python.assert_async().await;
    typescript.assert_async().await;

    assert_eq!(report.findings().count(), 2);
    assert_eq!(report.errors().count(), 1);
    assert_eq!(report.findings().next().unwrap().recommendations, vec!["use mypy --strict"]);

    match &report.vulnerabilities[2] {
        ReportEntry::Error(error) => {
            assert_eq!(error.file, "web/predicates.ts");
            assert!(error.error.starts_with("Failed to analyze web/predicates.ts after 3 attempt(s)"));
        }
        other => panic!("expected error entry last, got {other:?}"),
    }
}

#[tokio::test]
async fn test_rejected_key_is_recorded_once_per_file() {
    let tree = write_tree(&[("a.py", "def ok(x): return True\n")]);
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error": {"message": "Invalid API Key"}}"#)
        .expect(1)
        .create_async()
        .await;

    let report = auditor_for(&server)
        .run(&Location::Local(tree.path().to_path_buf()), None)
        .await
        .unwrap();

    mock.assert_async().await;
    let errors: Vec<_> = report.errors().collect();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].error.contains("Invalid API Key"));
}

#[tokio::test]
async fn test_single_file_errors_stop_before_any_request() {
    let tree = write_tree(&[("README.md", "# hi"), ("empty.ts", "\n\n")]);
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .expect(0)
        .create_async()
        .await;
    let auditor = auditor_for(&server);
    let root = Location::Local(tree.path().to_path_buf());

    let missing = auditor.run(&root, Some(Path::new("missing.py"))).await.unwrap_err();
    let wrong = auditor.run(&root, Some(Path::new("README.md"))).await.unwrap_err();
    let empty = auditor.run(&root, Some(Path::new("empty.ts"))).await.unwrap_err();

    assert!(matches!(missing, AuditError::NotFound(_)));
    assert!(matches!(wrong, AuditError::WrongExtension { .. }));
    assert!(matches!(empty, AuditError::Empty(_)));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_oversized_file_is_skipped_in_walk() {
    let big = "x".repeat(1_000_001);
    let tree = write_tree(&[("big.py", big.as_str()), ("small.py", "def f(): return 1\n")]);
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_body(names_file("small.py"))
        .with_status(200)
        .with_body(completion_body("{\"vulnerabilities\": []}"))
        .expect(1)
        .create_async()
        .await;

    let report = auditor_for(&server)
        .run(&Location::Local(tree.path().to_path_buf()), None)
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(report.vulnerabilities.is_empty());
}
