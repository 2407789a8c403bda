use super::runtime;
use crate::cache::fetch::HttpFetcher;
use crate::cache::manager::AssetCache;
use crate::cache::storage::CacheStorage;
use crate::cache::{ResponseSource, Served};
use crate::cli::parser::{CacheAction, Commands};
use crate::config::Config;
use crate::core::store::EventStore;
use crate::db::log;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};
use crate::utils::colors::{RESET, color_for_source};
use std::fs;

fn open_cache(cfg: &Config) -> AppResult<AssetCache<HttpFetcher>> {
    let storage = CacheStorage::open(&cfg.cache.database)?;
    AssetCache::new(
        storage,
        HttpFetcher::new()?,
        &cfg.cache.generation,
        &cfg.cache.origin,
        cfg.cache.manifest.clone(),
    )
}

/// Audit entries go to the event database's log table, when it is there.
fn audit(cfg: &Config, operation: &str, target: &str, message: &str) {
    match EventStore::open(&cfg.database) {
        Ok(store) => log::ttlog_or_warn(store.conn(), operation, target, message),
        Err(e) => tracing::debug!(error = %e, "audit log unavailable"),
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Cache { action } = cmd {
        let cache = open_cache(cfg)?;
        let rt = runtime()?;

        match action {
            CacheAction::Install => {
                info(format!(
                    "Installing {} assets into '{}'…",
                    cfg.cache.manifest.len(),
                    cache.generation()
                ));
                let n = rt.block_on(cache.install())?;
                success(format!("Cached {} assets in '{}'.", n, cache.generation()));
                audit(
                    cfg,
                    "cache_install",
                    cache.generation(),
                    &format!("{} assets cached", n),
                );
            }

            CacheAction::Activate => {
                let deleted = cache.activate()?;
                if deleted.is_empty() {
                    info("No stale cache generations.");
                } else {
                    for name in &deleted {
                        warning(format!("Deleted cache generation '{}'", name));
                    }
                }
                success(format!("Active cache generation: '{}'", cache.generation()));
                audit(
                    cfg,
                    "cache_activate",
                    cache.generation(),
                    &format!("{} stale generations deleted", deleted.len()),
                );
            }

            CacheAction::Fetch { path, output } => {
                let request = cache.request_for(path)?;
                let served = rt.block_on(async {
                    let served = cache.handle_request(request).await;
                    // let the background refresh land before the runtime stops
                    cache.settle().await;
                    served
                })?;
                print_served(path, &served);

                if let Some(file) = output {
                    fs::write(file, &served.response.body)?;
                    success(format!("Body written to {}", file));
                }
            }

            CacheAction::List => {
                let generations = cache.generations()?;
                if generations.is_empty() {
                    info("No cache generations.");
                }
                for g in generations {
                    let marker = if g.name == cache.generation() { "*" } else { " " };
                    println!("{} {:<32} {} entries", marker, g.name, g.entries);
                }
            }
        }
    }

    Ok(())
}

fn print_served(path: &str, served: &Served) {
    let hit = served.source == ResponseSource::Cache;
    let label = if hit { "cache" } else { "network" };
    println!(
        "{} → {} {}({}){} {} bytes",
        path,
        served.response.status,
        color_for_source(hit),
        label,
        RESET,
        served.response.body.len()
    );
    if let Some(ct) = served.response.header("content-type") {
        println!("  content-type: {}", ct);
    }
}
