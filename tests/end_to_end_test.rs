use httpmock::prelude::*;
use jsonl_harvest::{CliConfig, EtlEngine, EtlError, LocalStorage, RunOutcome};
use std::path::Path;
use tempfile::TempDir;

fn config(server: &MockServer, output_dir: &Path) -> CliConfig {
    let mut config = CliConfig::new(
        server.url("/api/tree"),
        server.url("/resolve/"),
        output_dir.to_str().unwrap(),
    );
    config.retry_delay_seconds = 0;
    config.pause_millis = 0;
    config.timeout_seconds = 5;
    config
}

fn always_yes(_: &[String]) -> bool {
    true
}

fn mock_listing(server: &MockServer) -> httpmock::Mock<'_> {
    server.mock(|when, then| {
        when.method(GET).path("/api/tree");
        then.status(200).json_body(serde_json::json!([
            {"path": "data/train.jsonl", "type": "file"},
            {"path": "data", "type": "directory"},
            {"path": "data/test.jsonl", "type": "file"},
            {"path": "data/broken.jsonl", "type": "file"},
            {"path": "LICENSE", "type": "file"}
        ]));
    })
}

#[tokio::test]
async fn test_end_to_end_run_and_rerun() {
    let temp_dir = TempDir::new().unwrap();
    let output_dir = temp_dir.path().join("converted");
    let server = MockServer::start();

    let listing_mock = mock_listing(&server);
    let train_mock = server.mock(|when, then| {
        when.method(GET).path("/resolve/data/train.jsonl");
        then.status(200)
            .body("{\"q\":\"x\",\"a\":\"y\"}\n\nnot-json\n{\"q\":\"z\",\"a\":\"w\",\"score\":3}\n");
    });
    let test_mock = server.mock(|when, then| {
        when.method(GET).path("/resolve/data/test.jsonl");
        then.status(200).body("{\"id\":1,\"meta\":{\"lang\":\"en\"}}");
    });
    let broken_mock = server.mock(|when, then| {
        when.method(GET).path("/resolve/data/broken.jsonl");
        then.status(502);
    });

    let mut engine = EtlEngine::new(config(&server, &output_dir));
    let outcome = engine
        .run(LocalStorage::new(&output_dir), &always_yes)
        .await
        .unwrap();

    let summary = match outcome {
        RunOutcome::Completed(summary) => summary,
        other => panic!("unexpected outcome: {:?}", other),
    };
    assert_eq!(summary.attempted, 3);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.already_present, 0);
    assert_eq!(summary.total_rows, 3);
    assert_eq!(summary.failed_paths(), vec!["data/broken.jsonl"]);

    train_mock.assert_hits(1);
    test_mock.assert_hits(1);
    broken_mock.assert_hits(3);

    let train_csv = std::fs::read_to_string(output_dir.join("train.csv")).unwrap();
    assert_eq!(train_csv, "q,a,score\nx,y,\nz,w,3\n");
    let test_csv = std::fs::read_to_string(output_dir.join("test.csv")).unwrap();
    assert_eq!(test_csv, "id,meta\n1,\"{\"\"lang\"\":\"\"en\"\"}\"\n");
    assert!(!output_dir.join("broken.csv").exists());

    let expected_bytes = (train_csv.len() + test_csv.len()) as u64;
    assert_eq!(summary.total_bytes, expected_bytes);

    // 第二次執行：已存在的檔案不再下載
    let outcome = engine
        .run(LocalStorage::new(&output_dir), &always_yes)
        .await
        .unwrap();
    let rerun = match outcome {
        RunOutcome::Completed(summary) => summary,
        other => panic!("unexpected outcome: {:?}", other),
    };

    listing_mock.assert_hits(2);
    train_mock.assert_hits(1);
    test_mock.assert_hits(1);
    assert_eq!(rerun.already_present, 2);
    assert_eq!(rerun.total_bytes, expected_bytes);
    assert_eq!(rerun.total_rows, 0);
    assert_eq!(
        std::fs::read_to_string(output_dir.join("train.csv")).unwrap(),
        train_csv
    );
}

#[tokio::test]
async fn test_declined_confirmation_transfers_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start();

    let listing_mock = mock_listing(&server);
    let download_mock = server.mock(|when, then| {
        when.method(GET).path_contains("/resolve/");
        then.status(200).body("{\"id\":1}\n");
    });

    let mut engine = EtlEngine::new(config(&server, temp_dir.path()));
    let decline = |paths: &[String]| {
        assert_eq!(paths.len(), 3);
        false
    };
    let outcome = engine
        .run(LocalStorage::new(temp_dir.path()), &decline)
        .await
        .unwrap();

    listing_mock.assert();
    download_mock.assert_hits(0);
    assert!(matches!(outcome, RunOutcome::Declined { files: 3 }));
    assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_failed_listing_means_nothing_to_do() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/tree");
        then.status(404);
    });

    let mut engine = EtlEngine::new(config(&server, temp_dir.path()));
    let outcome = engine
        .run(LocalStorage::new(temp_dir.path()), &always_yes)
        .await
        .unwrap();

    assert!(matches!(outcome, RunOutcome::NothingToDo));
}

#[tokio::test]
async fn test_unusable_output_dir_aborts_before_downloading() {
    let temp_dir = TempDir::new().unwrap();
    let blocker = temp_dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"occupied").unwrap();
    let output_dir = blocker.join("out");

    let server = MockServer::start();
    mock_listing(&server);
    let download_mock = server.mock(|when, then| {
        when.method(GET).path_contains("/resolve/");
        then.status(200).body("{\"id\":1}\n");
    });

    let mut engine = EtlEngine::new(config(&server, &output_dir));
    let result = engine
        .run(LocalStorage::new(&output_dir), &always_yes)
        .await;

    assert!(matches!(result, Err(EtlError::OutputDirError { .. })));
    download_mock.assert_hits(0);
}

#[tokio::test]
async fn test_discover_lists_without_downloading() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start();
    mock_listing(&server);

    let engine = EtlEngine::new(config(&server, temp_dir.path()));
    let files = engine.discover().await.unwrap();

    assert_eq!(
        files,
        vec!["data/train.jsonl", "data/test.jsonl", "data/broken.jsonl"]
    );
}
