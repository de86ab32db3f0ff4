//! Behavior tests for the expiring price-frame cache.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use etfpulse_core::{CacheKey, PriceCache, PriceFrame, SourceError};
use etfpulse_tests::{column, date, frame, series};

fn sample_frame() -> PriceFrame {
    frame(vec![column(
        "Broad",
        "VOO",
        series(&[("2024-05-16", 1.0), ("2024-05-17", 2.0)]),
    )])
}

async fn load(cache: &PriceCache, key: CacheKey, calls: &AtomicUsize) -> Result<bool, SourceError> {
    let lookup = cache
        .get_or_fetch(key, move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, SourceError>(sample_frame())
        })
        .await?;
    Ok(lookup.hit)
}

#[tokio::test]
async fn when_same_set_and_start_requested_twice_system_fetches_once() {
    let cache = PriceCache::with_default_ttl();
    let calls = AtomicUsize::new(0);
    let key = CacheKey::new("factor", date("2023-05-17"));

    assert!(!load(&cache, key.clone(), &calls).await.expect("first load"));
    assert!(load(&cache, key, &calls).await.expect("second load"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn when_start_date_changes_system_treats_it_as_a_new_entry() {
    let cache = PriceCache::with_default_ttl();
    let calls = AtomicUsize::new(0);

    load(&cache, CacheKey::new("factor", date("2023-05-17")), &calls).await.expect("load");
    load(&cache, CacheKey::new("factor", date("2023-05-18")), &calls).await.expect("load");
    load(&cache, CacheKey::new("sector", date("2023-05-17")), &calls).await.expect("load");

    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(cache.len().await, 3);
}

#[tokio::test]
async fn when_entry_outlives_ttl_system_refetches() {
    let cache = PriceCache::new(Duration::from_millis(20));
    let calls = AtomicUsize::new(0);
    let key = CacheKey::new("regional", date("2023-05-17"));

    load(&cache, key.clone(), &calls).await.expect("load");
    tokio::time::sleep(Duration::from_millis(40)).await;
    let hit = load(&cache, key, &calls).await.expect("reload");

    assert!(!hit);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn when_fetch_fails_system_does_not_cache_the_failure() {
    let cache = PriceCache::with_default_ttl();
    let key = CacheKey::new("factor", date("2023-05-17"));

    let failed = cache
        .get_or_fetch(key.clone(), || async {
            Err::<PriceFrame, _>(SourceError::unavailable("offline"))
        })
        .await;
    assert!(failed.is_err());

    let calls = AtomicUsize::new(0);
    let hit = load(&cache, key, &calls).await.expect("recovers");
    assert!(!hit);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn when_cache_is_disabled_system_fetches_every_time() {
    let cache = PriceCache::disabled();
    let calls = AtomicUsize::new(0);
    let key = CacheKey::new("factor", date("2023-05-17"));

    load(&cache, key.clone(), &calls).await.expect("load");
    load(&cache, key, &calls).await.expect("load");

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert!(cache.is_empty().await);
}
