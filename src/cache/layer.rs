//! Cache layer that orchestrates caching logic with network fetching.

use chrono::{DateTime, Duration, Utc};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

use super::key::{EntityTag, QueryKey};
use super::storage::CacheStorage;

/// Result from a cache operation, including data and metadata about the source.
#[derive(Debug, Clone)]
pub struct CacheResult<T> {
  pub data: T,
  pub source: CacheSource,
}

impl<T> CacheResult<T> {
  pub fn from_network(data: T) -> Self {
    Self {
      data,
      source: CacheSource::Network,
    }
  }

  pub fn from_cache(data: T) -> Self {
    Self {
      data,
      source: CacheSource::Cache,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheSource {
  Network,
  /// Fresh entry served without a request
  Cache,
}

/// Cache layer that manages caching logic and network fetching.
///
/// Reads go through [`CacheLayer::fetch`]; mutations call
/// [`CacheLayer::invalidate`], which drops the tag's entries and bumps its
/// generation so mounted views know to refetch.
#[derive(Clone)]
pub struct CacheLayer {
  storage: Arc<dyn CacheStorage>,
  /// How long before cached data is considered stale
  stale_time: Duration,
  generations: Arc<Mutex<HashMap<EntityTag, u64>>>,
}

impl CacheLayer {
  pub fn new(storage: impl CacheStorage + 'static) -> Self {
    Self {
      storage: Arc::new(storage),
      stale_time: Duration::minutes(5),
      generations: Arc::new(Mutex::new(HashMap::new())),
    }
  }

  pub fn with_stale_time(mut self, stale_time: Duration) -> Self {
    self.stale_time = stale_time;
    self
  }

  fn is_stale(&self, cached_at: DateTime<Utc>) -> bool {
    Utc::now() - cached_at > self.stale_time
  }

  /// Fetch with a cache-first strategy.
  ///
  /// 1. Fresh entry: return it without calling `fetcher`
  /// 2. Stale or missing: fetch from network and store the result
  /// 3. Network failure: return the error, the stale entry is not served
  ///
  /// A result whose tag was invalidated while the fetch ran is returned but
  /// not stored. Storage failures are logged and treated as a miss.
  pub async fn fetch<T, E, F, Fut>(&self, key: &QueryKey, fetcher: F) -> Result<CacheResult<T>, E>
  where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
  {
    if let Some(data) = self.lookup::<T>(key) {
      return Ok(CacheResult::from_cache(data));
    }

    let generation = self.generation(key.tag);
    let data = fetcher().await?;
    if self.generation(key.tag) != generation {
      debug!(key = %key.description(), "invalidated during fetch, not storing");
      return Ok(CacheResult::from_network(data));
    }
    match serde_json::to_vec(&data) {
      Ok(bytes) => {
        if let Err(e) = self.storage.store(key, &bytes) {
          warn!(key = %key.description(), error = %e, "cache store failed");
        }
      }
      Err(e) => warn!(key = %key.description(), error = %e, "cache encode failed"),
    }
    Ok(CacheResult::from_network(data))
  }

  fn lookup<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<T> {
    let entry = match self.storage.get(key) {
      Ok(entry) => entry?,
      Err(e) => {
        warn!(key = %key.description(), error = %e, "cache read failed");
        return None;
      }
    };
    if self.is_stale(entry.cached_at) {
      return None;
    }
    match serde_json::from_slice(&entry.data) {
      Ok(data) => Some(data),
      Err(e) => {
        debug!(key = %key.description(), error = %e, "discarding undecodable cache entry");
        None
      }
    }
  }

  /// Drop every entry under `tag` and its dependents, bumping their generations.
  pub fn invalidate(&self, tag: EntityTag) {
    self.drop_tags(tag.with_dependents());
  }

  /// Drop `tag` alone, so its next read goes to the network.
  pub fn refresh(&self, tag: EntityTag) {
    self.drop_tags(std::iter::once(tag));
  }

  fn drop_tags(&self, tags: impl Iterator<Item = EntityTag>) {
    let mut generations = self.generations.lock().unwrap_or_else(|e| e.into_inner());
    for t in tags {
      match self.storage.invalidate(t) {
        Ok(removed) => debug!(tag = t.as_str(), removed, "cache invalidated"),
        Err(e) => warn!(tag = t.as_str(), error = %e, "cache invalidation failed"),
      }
      *generations.entry(t).or_insert(0) += 1;
    }
  }

  /// Invalidation counter for `tag`; changes whenever its data may have.
  pub fn generation(&self, tag: EntityTag) -> u64 {
    self
      .generations
      .lock()
      .unwrap_or_else(|e| e.into_inner())
      .get(&tag)
      .copied()
      .unwrap_or(0)
  }

  pub fn clear(&self) {
    if let Err(e) = self.storage.clear() {
      warn!(error = %e, "cache clear failed");
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cache::MemoryStorage;
  use std::sync::atomic::{AtomicU32, Ordering};

  async fn counted_fetch(
    cache: &CacheLayer,
    key: &QueryKey,
    calls: &AtomicU32,
  ) -> Result<CacheResult<Vec<i32>>, String> {
    cache
      .fetch(key, || async move {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok::<_, String>(vec![1, 2, 3])
      })
      .await
  }

  #[tokio::test]
  async fn test_fresh_entry_skips_network() {
    let cache = CacheLayer::new(MemoryStorage::new());
    let key = QueryKey::all(EntityTag::Owners);
    let calls = AtomicU32::new(0);

    let first = counted_fetch(&cache, &key, &calls).await.unwrap();
    assert_eq!(first.source, CacheSource::Network);

    let second = counted_fetch(&cache, &key, &calls).await.unwrap();
    assert_eq!(second.source, CacheSource::Cache);
    assert_eq!(second.data, vec![1, 2, 3]);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn test_stale_entry_refetches() {
    let cache = CacheLayer::new(MemoryStorage::new()).with_stale_time(Duration::zero());
    let key = QueryKey::all(EntityTag::Owners);
    let calls = AtomicU32::new(0);

    counted_fetch(&cache, &key, &calls).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    counted_fetch(&cache, &key, &calls).await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
  }

  #[tokio::test]
  async fn test_network_error_is_not_masked_by_stale_entry() {
    let cache = CacheLayer::new(MemoryStorage::new()).with_stale_time(Duration::zero());
    let key = QueryKey::all(EntityTag::Owners);
    let calls = AtomicU32::new(0);

    counted_fetch(&cache, &key, &calls).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    let result: Result<CacheResult<Vec<i32>>, String> = cache
      .fetch(&key, || async { Err("offline".to_string()) })
      .await;
    assert_eq!(result.unwrap_err(), "offline");
  }

  #[tokio::test]
  async fn test_invalidate_drops_entries_and_bumps_generation() {
    let cache = CacheLayer::new(MemoryStorage::new());
    let codes = QueryKey::all(EntityTag::Codes);
    let breeds = QueryKey::param(EntityTag::Breeds, 1);
    let calls = AtomicU32::new(0);

    counted_fetch(&cache, &codes, &calls).await.unwrap();
    counted_fetch(&cache, &breeds, &calls).await.unwrap();
    assert_eq!(cache.generation(EntityTag::Codes), 0);

    cache.invalidate(EntityTag::Codes);
    assert_eq!(cache.generation(EntityTag::Codes), 1);
    assert_eq!(cache.generation(EntityTag::Breeds), 1);
    assert_eq!(cache.generation(EntityTag::Vaccines), 0);

    counted_fetch(&cache, &codes, &calls).await.unwrap();
    counted_fetch(&cache, &breeds, &calls).await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 4);
  }

  #[tokio::test]
  async fn test_read_overlapping_invalidation_is_not_stored() {
    let cache = CacheLayer::new(MemoryStorage::new());
    let key = QueryKey::all(EntityTag::Owners);
    let (release, released) = tokio::sync::oneshot::channel::<()>();

    let slow = {
      let cache = cache.clone();
      let key = key.clone();
      tokio::spawn(async move {
        cache
          .fetch(&key, || async move {
            let _ = released.await;
            Ok::<_, String>(vec!["before-create".to_string()])
          })
          .await
      })
    };
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    cache.invalidate(EntityTag::Owners);
    let _ = release.send(());

    let stale = slow.await.unwrap().unwrap();
    assert_eq!(stale.data, vec!["before-create".to_string()]);

    let next = cache
      .fetch(&key, || async { Ok::<_, String>(vec!["after-create".to_string()]) })
      .await
      .unwrap();
    assert_eq!(next.source, CacheSource::Network);
    assert_eq!(next.data, vec!["after-create".to_string()]);
  }

  #[tokio::test]
  async fn test_refresh_drops_only_its_tag() {
    let cache = CacheLayer::new(MemoryStorage::new());
    let owners = QueryKey::all(EntityTag::Owners);
    let pets = QueryKey::all(EntityTag::Pets);
    let calls = AtomicU32::new(0);

    counted_fetch(&cache, &owners, &calls).await.unwrap();
    counted_fetch(&cache, &pets, &calls).await.unwrap();

    cache.refresh(EntityTag::Owners);
    assert_eq!(cache.generation(EntityTag::Owners), 1);
    assert_eq!(cache.generation(EntityTag::Pets), 0);

    let owners_again = counted_fetch(&cache, &owners, &calls).await.unwrap();
    let pets_again = counted_fetch(&cache, &pets, &calls).await.unwrap();
    assert_eq!(owners_again.source, CacheSource::Network);
    assert_eq!(pets_again.source, CacheSource::Cache);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
  }
}
