#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use parking_lot::Mutex;
use rpeetracker::cache::fetch::Fetcher;
use rpeetracker::cache::{AssetRequest, AssetResponse};
use rpeetracker::errors::{AppError, AppResult};
use rpeetracker::ui::banner::ErrorSink;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Command for the binary, with HOME pointed at a throwaway directory so
/// that no real configuration is read or written.
pub fn rti(home: &str) -> Command {
    let mut cmd = cargo_bin_cmd!("rpeetracker");
    cmd.env("HOME", home).env_remove("RUST_LOG");
    cmd
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rpeetracker.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create an empty fake HOME directory for one test
pub fn setup_home(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rpeetracker_home", name));
    fs::remove_dir_all(&path).ok();
    fs::create_dir_all(&path).expect("create test home");
    path.to_string_lossy().to_string()
}

/// In-memory network: serves registered URLs, 404 for anything else, and
/// fails every request while offline.
#[derive(Clone, Default)]
pub struct MockFetcher {
    assets: Arc<Mutex<HashMap<String, AssetResponse>>>,
    offline: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn serve(&self, url: &str, body: &str) {
        let mut response = AssetResponse::ok(body.as_bytes().to_vec());
        response
            .headers
            .push(("content-type".to_string(), "text/plain".to_string()));
        self.assets.lock().insert(url.to_string(), response);
    }

    pub fn serve_status(&self, url: &str, status: u16) {
        let response = AssetResponse {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        };
        self.assets.lock().insert(url.to_string(), response);
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Fetcher for MockFetcher {
    async fn fetch(&self, request: &AssetRequest) -> AppResult<AssetResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.offline.load(Ordering::SeqCst) {
            return Err(AppError::NetworkUnavailable(format!(
                "{}: offline",
                request.url
            )));
        }

        let found = self.assets.lock().get(request.url.as_str()).cloned();
        Ok(found.unwrap_or(AssetResponse {
            status: 404,
            headers: Vec::new(),
            body: b"not found".to_vec(),
        }))
    }
}

/// Error sink whose state stays observable after the session owning it is
/// gone.
#[derive(Clone, Default)]
pub struct RecordingSink {
    shown: Arc<Mutex<Option<String>>>,
    reports: Arc<AtomicUsize>,
}

impl RecordingSink {
    pub fn shown(&self) -> Option<String> {
        self.shown.lock().clone()
    }

    pub fn reports(&self) -> usize {
        self.reports.load(Ordering::SeqCst)
    }
}

impl ErrorSink for RecordingSink {
    fn display_error(&mut self, message: &str) {
        self.reports.fetch_add(1, Ordering::SeqCst);
        *self.shown.lock() = Some(message.to_string());
    }

    fn hide_error(&mut self) {
        *self.shown.lock() = None;
    }
}
