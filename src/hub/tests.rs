//! Tests for the hub module

use super::*;
use crate::config::HubConfig;
use crate::error::Error;
use pretty_assertions::assert_eq;
use std::path::PathBuf;
use tempfile::{tempdir, TempDir};
use test_case::test_case;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MANIFEST: &str = "All_Beauty\nVideo_Games\n\nToys_and_Games\n";

fn categories() -> Vec<String> {
    parse_manifest(MANIFEST)
}

fn repo_for(server: &MockServer, cache: &TempDir) -> DatasetRepo {
    let config = HubConfig {
        endpoint: server.uri(),
        repo_id: "org/reviews".to_string(),
        cache_dir: cache.path().to_path_buf(),
        max_retries: 0,
        ..HubConfig::default()
    };
    DatasetRepo::new(config).unwrap()
}

// ============================================================================
// Catalog Tests
// ============================================================================

#[test]
fn test_parse_manifest() {
    assert_eq!(
        parse_manifest("  All_Beauty \r\nVideo_Games\n\n"),
        vec!["All_Beauty".to_string(), "Video_Games".to_string()]
    );
    assert!(parse_manifest("").is_empty());
}

#[test_case("Video_Games" ; "exact")]
#[test_case("video_games" ; "lower")]
#[test_case("VIDEO_GAMES" ; "upper")]
fn test_select_category_case_insensitive(requested: &str) {
    let selected = select_categories(&categories(), requested, false).unwrap();
    assert_eq!(selected, vec!["Video_Games".to_string()]);
}

#[test]
fn test_select_all_categories() {
    let selected = select_categories(&categories(), "ignored", true).unwrap();
    assert_eq!(selected, categories());
}

#[test]
fn test_select_unknown_category_lists_available() {
    let err = select_categories(&categories(), "Video Games", false).unwrap_err();
    match err {
        Error::CategoryNotFound {
            category,
            available,
        } => {
            assert_eq!(category, "Video Games");
            assert_eq!(available, categories());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_select_from_empty_manifest() {
    assert!(select_categories(&[], "ignored", true).unwrap().is_empty());

    let err = select_categories(&[], "Video_Games", false).unwrap_err();
    assert!(matches!(
        err,
        Error::CategoryNotFound { ref available, .. } if available.is_empty()
    ));
}

// ============================================================================
// Repository Tests
// ============================================================================

#[test]
fn test_file_url_and_cache_path() {
    let config = HubConfig {
        endpoint: "https://huggingface.co/".to_string(),
        cache_dir: PathBuf::from("/tmp/cache"),
        ..HubConfig::default()
    };
    let repo = DatasetRepo::new(config).unwrap();

    assert_eq!(
        repo.file_url("raw/review_categories/Video_Games.jsonl")
            .unwrap()
            .as_str(),
        "https://huggingface.co/datasets/McAuley-Lab/Amazon-Reviews-2023/resolve/main/raw/review_categories/Video_Games.jsonl"
    );
    assert_eq!(
        repo.cache_path("raw/review_categories/Video_Games.jsonl"),
        PathBuf::from(
            "/tmp/cache/McAuley-Lab/Amazon-Reviews-2023/main/raw/review_categories/Video_Games.jsonl"
        )
    );
}

#[test]
fn test_cache_path_ignores_parent_segments() {
    let config = HubConfig {
        cache_dir: PathBuf::from("/tmp/cache"),
        ..HubConfig::default()
    };
    let repo = DatasetRepo::new(config).unwrap();
    assert_eq!(
        repo.cache_path("../../etc/passwd"),
        PathBuf::from("/tmp/cache/McAuley-Lab/Amazon-Reviews-2023/main/etc/passwd")
    );
}

#[tokio::test]
async fn test_fetch_categories() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/datasets/org/reviews/resolve/main/all_categories.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(MANIFEST))
        .mount(&server)
        .await;

    let cache = tempdir().unwrap();
    let repo = repo_for(&server, &cache);

    assert_eq!(repo.fetch_categories().await.unwrap(), categories());
}

#[tokio::test]
async fn test_empty_manifest_lists_no_categories() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/datasets/org/reviews/resolve/main/all_categories.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("\n\n"))
        .mount(&server)
        .await;

    let cache = tempdir().unwrap();
    let repo = repo_for(&server, &cache);

    assert!(repo.fetch_categories().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_fetch_uses_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/datasets/org/reviews/resolve/main/raw/meta.jsonl"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}\n"))
        .expect(1)
        .mount(&server)
        .await;

    let cache = tempdir().unwrap();
    let repo = repo_for(&server, &cache);

    let first = repo.fetch("raw/meta.jsonl").await.unwrap();
    let second = repo.fetch("raw/meta.jsonl").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(std::fs::read_to_string(&first).unwrap(), "{}\n");
    assert!(!first.with_file_name("meta.jsonl.part").exists());
}

#[tokio::test]
async fn test_failed_fetch_leaves_no_cache_entry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/datasets/org/reviews/resolve/main/raw/missing.jsonl"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Entry not found"))
        .mount(&server)
        .await;

    let cache = tempdir().unwrap();
    let repo = repo_for(&server, &cache);

    let err = repo.fetch("raw/missing.jsonl").await.unwrap_err();
    assert!(matches!(err, Error::HttpStatus { status: 404, .. }));

    let local = repo.cache_path("raw/missing.jsonl");
    assert!(!local.exists());
    assert!(!local.with_file_name("missing.jsonl.part").exists());
}

#[tokio::test]
async fn test_fetch_all_preserves_order() {
    let server = MockServer::start().await;
    for name in ["a", "b", "c"] {
        Mock::given(method("GET"))
            .and(path(format!("/datasets/org/reviews/resolve/main/{name}.jsonl")))
            .respond_with(ResponseTemplate::new(200).set_body_string(name))
            .mount(&server)
            .await;
    }

    let cache = tempdir().unwrap();
    let repo = repo_for(&server, &cache);

    let paths = vec![
        "c.jsonl".to_string(),
        "a.jsonl".to_string(),
        "b.jsonl".to_string(),
    ];
    let fetched = repo.fetch_all(&paths).await.unwrap();
    let contents: Vec<String> = fetched
        .iter()
        .map(|p| std::fs::read_to_string(p).unwrap())
        .collect();
    assert_eq!(contents, vec!["c", "a", "b"]);
}

#[tokio::test]
async fn test_token_sent_as_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/datasets/org/reviews/resolve/main/all_categories.txt"))
        .and(header("Authorization", "Bearer hf_test"))
        .respond_with(ResponseTemplate::new(200).set_body_string(MANIFEST))
        .mount(&server)
        .await;

    let cache = tempdir().unwrap();
    let config = HubConfig {
        endpoint: server.uri(),
        repo_id: "org/reviews".to_string(),
        cache_dir: cache.path().to_path_buf(),
        token: Some("hf_test".to_string()),
        max_retries: 0,
        ..HubConfig::default()
    };
    let repo = DatasetRepo::new(config).unwrap();

    assert_eq!(repo.fetch_categories().await.unwrap().len(), 3);
}
