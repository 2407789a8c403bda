use rpeetracker::cache::manager::AssetCache;
use rpeetracker::cache::storage::CacheStorage;
use rpeetracker::cache::{AssetRequest, ResponseSource};
use rpeetracker::errors::AppError;
use std::time::Duration;
use url::Url;

mod common;
use common::MockFetcher;

const ORIGIN: &str = "http://localhost:8080/";

fn manifest() -> Vec<String> {
    ["/", "/index.html", "/app.js", "/styles.css"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn serve_shell(fetcher: &MockFetcher, version: &str) {
    fetcher.serve("http://localhost:8080/", &format!("root {version}"));
    fetcher.serve("http://localhost:8080/index.html", &format!("index {version}"));
    fetcher.serve("http://localhost:8080/app.js", &format!("app {version}"));
    fetcher.serve("http://localhost:8080/styles.css", &format!("styles {version}"));
}

fn cache_with(
    storage: &CacheStorage,
    fetcher: &MockFetcher,
    generation: &str,
) -> AssetCache<MockFetcher> {
    AssetCache::new(
        storage.clone(),
        fetcher.clone(),
        generation,
        ORIGIN,
        manifest(),
    )
    .unwrap()
}

#[tokio::test]
async fn test_installed_shell_is_served_offline() {
    let storage = CacheStorage::open_in_memory().unwrap();
    let fetcher = MockFetcher::new();
    serve_shell(&fetcher, "v1");
    let cache = cache_with(&storage, &fetcher, "shell-v1");

    assert_eq!(cache.install().await.unwrap(), 4);
    fetcher.set_offline(true);

    for path in manifest() {
        let request = cache.request_for(&path).unwrap();
        let served = cache.handle_request(request).await.unwrap();
        assert_eq!(served.source, ResponseSource::Cache, "{path}");
        assert_eq!(served.response.status, 200);
        assert_eq!(served.response.header("Content-Type"), Some("text/plain"));
    }

    let app = cache.request_for("/app.js").unwrap();
    let served = cache.handle_request(app).await.unwrap();
    assert_eq!(served.response.body, b"app v1".to_vec());

    // every revalidation failed while offline
    assert_eq!(cache.settle().await, 0);
}

#[tokio::test]
async fn test_install_with_missing_asset_commits_nothing() {
    let storage = CacheStorage::open_in_memory().unwrap();
    let fetcher = MockFetcher::new();
    serve_shell(&fetcher, "v1");
    fetcher.serve_status("http://localhost:8080/styles.css", 404);
    let cache = cache_with(&storage, &fetcher, "shell-v1");

    let err = cache.install().await.unwrap_err();
    assert!(matches!(err, AppError::NetworkUnavailable(_)), "{err}");

    assert!(cache.generations().unwrap().is_empty());
    assert!(!storage.has_generation("shell-v1").unwrap());
    let index = cache.request_for("/index.html").unwrap();
    assert_eq!(storage.match_request("shell-v1", &index).unwrap(), None);
}

#[tokio::test]
async fn test_install_offline_fails() {
    let storage = CacheStorage::open_in_memory().unwrap();
    let fetcher = MockFetcher::new();
    serve_shell(&fetcher, "v1");
    fetcher.set_offline(true);
    let cache = cache_with(&storage, &fetcher, "shell-v1");

    assert!(matches!(
        cache.install().await,
        Err(AppError::NetworkUnavailable(_))
    ));
    assert!(storage.generations().unwrap().is_empty());
}

#[tokio::test]
async fn test_activate_drops_previous_generations() {
    let storage = CacheStorage::open_in_memory().unwrap();
    let fetcher = MockFetcher::new();

    serve_shell(&fetcher, "v1");
    let old = cache_with(&storage, &fetcher, "shell-v1");
    old.install().await.unwrap();

    serve_shell(&fetcher, "v2");
    let new = cache_with(&storage, &fetcher, "shell-v2");
    new.install().await.unwrap();

    let names: Vec<String> = storage.generations().unwrap().into_iter().map(|g| g.name).collect();
    assert_eq!(names.len(), 2);

    let deleted = new.activate().unwrap();
    assert_eq!(deleted, vec!["shell-v1".to_string()]);

    let remaining = storage.generations().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].name, "shell-v2");
    assert_eq!(remaining[0].entries, 4);

    let app = new.request_for("/app.js").unwrap();
    assert_eq!(storage.match_request("shell-v1", &app).unwrap(), None);
    assert_eq!(
        storage.match_request("shell-v2", &app).unwrap().unwrap().body,
        b"app v2".to_vec()
    );

    // activating again has nothing left to delete
    assert!(new.activate().unwrap().is_empty());
}

#[tokio::test]
async fn test_stale_entry_is_served_then_refreshed() {
    let storage = CacheStorage::open_in_memory().unwrap();
    let fetcher = MockFetcher::new();
    serve_shell(&fetcher, "v1");
    let cache = cache_with(&storage, &fetcher, "shell-v1");
    cache.install().await.unwrap();

    fetcher.serve("http://localhost:8080/app.js", "app v2");

    let first = cache
        .handle_request(cache.request_for("/app.js").unwrap())
        .await
        .unwrap();
    assert_eq!(first.source, ResponseSource::Cache);
    assert_eq!(first.response.body, b"app v1".to_vec());

    assert_eq!(cache.settle().await, 1);

    let second = cache
        .handle_request(cache.request_for("/app.js").unwrap())
        .await
        .unwrap();
    assert_eq!(second.source, ResponseSource::Cache);
    assert_eq!(second.response.body, b"app v2".to_vec());
    cache.settle().await;
}

#[tokio::test]
async fn test_finished_revalidations_are_not_retained() {
    let storage = CacheStorage::open_in_memory().unwrap();
    let fetcher = MockFetcher::new();
    serve_shell(&fetcher, "v1");
    let cache = cache_with(&storage, &fetcher, "shell-v1");
    cache.install().await.unwrap();

    for _ in 0..20 {
        for _ in 0..10 {
            let served = cache
                .handle_request(cache.request_for("/app.js").unwrap())
                .await
                .unwrap();
            assert_eq!(served.source, ResponseSource::Cache);
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert!(
        cache.pending_revalidations() < 200,
        "{} handles retained",
        cache.pending_revalidations()
    );

    tokio::time::sleep(Duration::from_millis(300)).await;
    cache
        .handle_request(cache.request_for("/app.js").unwrap())
        .await
        .unwrap();
    assert!(
        cache.pending_revalidations() <= 2,
        "{} handles retained",
        cache.pending_revalidations()
    );
    cache.settle().await;
    assert_eq!(cache.pending_revalidations(), 0);
}

#[tokio::test]
async fn test_miss_goes_to_network_and_is_stored() {
    let storage = CacheStorage::open_in_memory().unwrap();
    let fetcher = MockFetcher::new();
    fetcher.serve("http://localhost:8080/icon.svg", "<svg/>");
    let cache = cache_with(&storage, &fetcher, "shell-v1");

    let served = cache
        .handle_request(cache.request_for("/icon.svg").unwrap())
        .await
        .unwrap();
    assert_eq!(served.source, ResponseSource::Network);
    assert_eq!(served.response.body, b"<svg/>".to_vec());
    assert_eq!(fetcher.calls(), 1);

    fetcher.set_offline(true);
    let again = cache
        .handle_request(cache.request_for("/icon.svg").unwrap())
        .await
        .unwrap();
    assert_eq!(again.source, ResponseSource::Cache);
    assert_eq!(again.response.body, b"<svg/>".to_vec());
}

#[tokio::test]
async fn test_miss_while_offline_is_network_unavailable() {
    let storage = CacheStorage::open_in_memory().unwrap();
    let fetcher = MockFetcher::new();
    fetcher.set_offline(true);
    let cache = cache_with(&storage, &fetcher, "shell-v1");

    let result = cache
        .handle_request(cache.request_for("/index.html").unwrap())
        .await;
    assert!(matches!(result, Err(AppError::NetworkUnavailable(_))));
}

#[tokio::test]
async fn test_error_responses_are_returned_but_not_cached() {
    let storage = CacheStorage::open_in_memory().unwrap();
    let fetcher = MockFetcher::new();
    let cache = cache_with(&storage, &fetcher, "shell-v1");

    let request = cache.request_for("/missing.js").unwrap();
    let served = cache.handle_request(request.clone()).await.unwrap();
    assert_eq!(served.source, ResponseSource::Network);
    assert_eq!(served.response.status, 404);
    assert!(!served.response.is_success());

    assert_eq!(storage.match_request("shell-v1", &request).unwrap(), None);
    assert!(!storage.has_generation("shell-v1").unwrap());
}

#[tokio::test]
async fn test_non_get_requests_bypass_the_cache() {
    let storage = CacheStorage::open_in_memory().unwrap();
    let fetcher = MockFetcher::new();
    fetcher.serve("http://localhost:8080/app.js", "app v1");
    let cache = cache_with(&storage, &fetcher, "shell-v1");

    let post = AssetRequest {
        method: "POST".to_string(),
        url: Url::parse("http://localhost:8080/app.js").unwrap(),
    };
    let served = cache.handle_request(post.clone()).await.unwrap();
    assert_eq!(served.source, ResponseSource::Network);

    assert_eq!(storage.match_request("shell-v1", &post).unwrap(), None);
    let get = AssetRequest::get(post.url.clone());
    assert_eq!(storage.match_request("shell-v1", &get).unwrap(), None);
}

#[tokio::test]
async fn test_entries_survive_reopen() {
    let mut path = std::env::temp_dir();
    path.push("rpeetracker_cache_reopen.sqlite");
    std::fs::remove_file(&path).ok();
    let path = path.to_string_lossy().to_string();

    let fetcher = MockFetcher::new();
    serve_shell(&fetcher, "v1");
    {
        let storage = CacheStorage::open(&path).unwrap();
        cache_with(&storage, &fetcher, "shell-v1")
            .install()
            .await
            .unwrap();
    }

    let storage = CacheStorage::open(&path).unwrap();
    let generations = storage.generations().unwrap();
    assert_eq!(generations.len(), 1);
    assert_eq!(generations[0].entries, 4);
}

#[test]
fn test_invalid_origin_is_rejected() {
    let storage = CacheStorage::open_in_memory().unwrap();
    let result = AssetCache::new(storage, MockFetcher::new(), "shell-v1", "not a url", manifest());
    assert!(matches!(result, Err(AppError::Config(_))));
}
