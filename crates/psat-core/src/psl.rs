//! Public Suffix List (PSL) utilities for eTLD+1 extraction
//!
//! Used to classify cookies as first- or third-party relative to the tab.
//! A full list can be loaded at runtime with [`init_psl`]; until then a
//! heuristic covering common two-part TLDs is used. Lookups go through a
//! small LRU cache either way.
//!
//! # Examples
//!
//! ```
//! use psat_core::psl::get_etld1;
//!
//! assert_eq!(get_etld1("sub.example.com"), "example.com");
//! assert_eq!(get_etld1("sub.example.co.uk"), "example.co.uk");
//! ```

use std::collections::{HashMap, VecDeque};
use std::net::IpAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, RwLock};

use publicsuffix::{List, Psl};

use crate::error::{Error, Result};

const CACHE_CAPACITY: usize = 4096;

// =============================================================================
// LRU Cache
// =============================================================================

/// Simple fixed-size cache for eTLD+1 lookups.
/// Uses a basic LRU strategy with a hashmap + deque.
pub struct LruCache {
    capacity: usize,
    entries: HashMap<String, String>,
    order: VecDeque<String>,
}

impl LruCache {
    /// Create a new LRU cache with the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
        }
    }

    /// Get a value from the cache.
    pub fn get(&mut self, key: &str) -> Option<&str> {
        if self.entries.contains_key(key) {
            // Move to back (most recently used)
            self.order.retain(|k| k != key);
            self.order.push_back(key.to_string());
            self.entries.get(key).map(|s| s.as_str())
        } else {
            None
        }
    }

    /// Insert a value into the cache.
    pub fn insert(&mut self, key: String, value: String) {
        if self.entries.contains_key(&key) {
            self.order.retain(|k| k != &key);
        } else if self.entries.len() >= self.capacity {
            // Evict oldest
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
        self.order.push_back(key.clone());
        self.entries.insert(key, value);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clear the cache.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

// =============================================================================
// Global PSL State
// =============================================================================

static PSL_LIST: RwLock<Option<List>> = RwLock::new(None);

static ETLD1_CACHE: Mutex<Option<LruCache>> = Mutex::new(None);

static PSL_GENERATION: AtomicU64 = AtomicU64::new(0);

/// Load a Public Suffix List (the `public_suffix_list.dat` text format).
///
/// Replaces any previously loaded list and drops cached lookups.
pub fn init_psl(list_text: &str) -> Result<()> {
    let list: List = list_text
        .parse()
        .map_err(|e: publicsuffix::Error| Error::InvalidSuffixList(e.to_string()))?;

    if let Ok(mut guard) = PSL_LIST.write() {
        *guard = Some(list);
    }
    if let Ok(mut guard) = ETLD1_CACHE.lock() {
        if let Some(cache) = guard.as_mut() {
            cache.clear();
        }
    }
    let generation = PSL_GENERATION.fetch_add(1, Ordering::SeqCst) + 1;
    log::debug!("public suffix list {} loaded ({} bytes)", generation, list_text.len());

    Ok(())
}

/// Bumped every time a list is loaded. eTLD+1 values computed under an
/// older generation may be stale.
pub fn psl_generation() -> u64 {
    PSL_GENERATION.load(Ordering::SeqCst)
}

// =============================================================================
// eTLD+1 Extraction
// =============================================================================

/// Common two-part TLDs for fallback.
const COMMON_TWO_PART_TLDS: &[&str] = &[
    "co.uk", "co.jp", "co.nz", "co.za", "co.in", "co.kr",
    "com.au", "com.br", "com.cn", "com.mx", "com.tw", "com.hk",
    "net.au", "net.nz",
    "org.uk", "org.au",
    "gov.uk", "gov.au",
    "ac.uk", "ac.jp",
    "ne.jp", "or.jp",
];

/// Get the eTLD+1 (registrable domain) for a hostname.
///
/// If no PSL is loaded, falls back to a simple heuristic.
pub fn get_etld1(host: &str) -> String {
    let host = host.trim().trim_start_matches('.').to_lowercase();
    let host = host.trim_end_matches('.');

    if let Ok(mut guard) = ETLD1_CACHE.lock() {
        if let Some(cached) = guard.as_mut().and_then(|cache| cache.get(host)) {
            return cached.to_string();
        }
    }

    let result = compute_etld1(host);

    if let Ok(mut guard) = ETLD1_CACHE.lock() {
        guard
            .get_or_insert_with(|| LruCache::new(CACHE_CAPACITY))
            .insert(host.to_string(), result.clone());
    }

    result
}

/// Compute eTLD+1 without caching.
fn compute_etld1(host: &str) -> String {
    if is_ip_address(host) {
        return host.to_string();
    }

    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() <= 1 {
        return host.to_string();
    }

    if let Ok(guard) = PSL_LIST.read() {
        if let Some(list) = guard.as_ref() {
            if let Some(domain) = list.domain(host.as_bytes()) {
                if let Ok(domain) = std::str::from_utf8(domain.as_bytes()) {
                    return domain.to_string();
                }
            }
            // Host is itself a public suffix
            return host.to_string();
        }
    }

    fallback_etld1(&labels)
}

fn is_ip_address(host: &str) -> bool {
    host.trim_start_matches('[')
        .trim_end_matches(']')
        .parse::<IpAddr>()
        .is_ok()
}

/// Fallback eTLD+1 heuristic.
fn fallback_etld1(labels: &[&str]) -> String {
    let n = labels.len();
    if n <= 2 {
        return labels.join(".");
    }

    // Check for common two-part TLDs
    let last_two = format!("{}.{}", labels[n - 2], labels[n - 1]);
    if COMMON_TWO_PART_TLDS.contains(&last_two.as_str()) {
        return labels[n - 3..].join(".");
    }

    // Default: last 2 labels
    labels[n - 2..].join(".")
}

/// Check if two hosts share the same eTLD+1.
pub fn is_same_site(host1: &str, host2: &str) -> bool {
    get_etld1(host1) == get_etld1(host2)
}

/// Check if a cookie domain is third-party to the site.
///
/// A leading `.` on either side is ignored.
pub fn is_third_party(site_host: &str, cookie_domain: &str) -> bool {
    !is_same_site(site_host, cookie_domain)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_etld1_simple() {
        assert_eq!(fallback_etld1(&["example", "com"]), "example.com");
        assert_eq!(fallback_etld1(&["sub", "example", "com"]), "example.com");
    }

    #[test]
    fn test_fallback_etld1_two_part() {
        assert_eq!(fallback_etld1(&["sub", "example", "co", "uk"]), "example.co.uk");
        assert_eq!(fallback_etld1(&["example", "co", "uk"]), "example.co.uk");
    }

    #[test]
    fn test_leading_dot_cookie_domains() {
        assert_eq!(get_etld1(".cnn.com"), "cnn.com");
        assert_eq!(get_etld1("Edition.CNN.com."), "cnn.com");
        assert!(!is_third_party("edition.cnn.com", ".cnn.com"));
        assert!(is_third_party("edition.cnn.com", ".ads.pubmatic.com"));
    }

    #[test]
    fn test_ip_hosts_are_kept_whole() {
        assert_eq!(get_etld1("192.168.0.1"), "192.168.0.1");
        assert_eq!(get_etld1("[::1]"), "[::1]");
        assert!(is_third_party("192.168.0.1", "10.0.0.1"));
        assert!(!is_third_party("10.0.0.1", "10.0.0.1"));
    }

    #[test]
    fn test_lru_cache_evicts_oldest() {
        let mut cache = LruCache::new(2);
        cache.insert("a".to_string(), "1".to_string());
        cache.insert("b".to_string(), "2".to_string());
        assert_eq!(cache.get("a"), Some("1"));

        cache.insert("c".to_string(), "3".to_string());
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("b"), None);
        assert_eq!(cache.get("a"), Some("1"));
        assert_eq!(cache.get("c"), Some("3"));

        cache.clear();
        assert!(cache.is_empty());
    }
}
