use crate::clock::{Clock, MonotonicClock};
use crate::config::{ConfigError, TokenCacheConfig};
use crate::janitor::Sweep;
use crate::shared::SharedMap;
use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub const DEFAULT_TTL_MINUTES: i64 = 15;

// a century fits in every platform's `Instant`
const MAX_TTL_MINUTES: i64 = 100 * 365 * 24 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenEntry {
    expires_at: Instant,
    admin: bool,
}

impl TokenEntry {
    fn new(now: Instant, ttl_minutes: i64, admin: bool) -> Self {
        let ttl = Duration::from_secs(ttl_minutes.unsigned_abs().saturating_mul(60));
        let expires_at = if ttl_minutes > 0 {
            now + ttl
        } else {
            now.checked_sub(ttl).unwrap_or(now)
        };
        Self { expires_at, admin }
    }

    pub fn expires_at(&self) -> Instant {
        self.expires_at
    }

    pub fn is_admin(&self) -> bool {
        self.admin
    }

    pub fn is_live_at(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// What a lookup actually found, independent of the validation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Valid,
    Missing,
    Expired,
    NotAdmin,
}

impl Verdict {
    pub fn is_valid(self) -> bool {
        self == Self::Valid
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
    #[default]
    Strict,
    /// Diagnostics only: every check passes and the real verdict is logged.
    FailOpen,
}

/// Session tokens with a fixed expiry and an admin flag.
///
/// Reads never extend an entry's lifetime. Expired entries keep occupying
/// memory until [`TokenCache::cleanup_expired`] runs, usually from a
/// [`Janitor`](crate::Janitor).
pub struct TokenCache<K = String, C = MonotonicClock> {
    entries: SharedMap<K, TokenEntry>,
    clock: C,
    validation: Validation,
    default_ttl_minutes: i64,
    bypassed: AtomicU64,
}

impl<K: Eq + Hash> TokenCache<K> {
    pub fn new() -> Self {
        Self::with_clock(MonotonicClock)
    }

    /// A cache that lets every token through. Never use it in production.
    #[cfg(feature = "diagnostics")]
    pub fn fail_open() -> Self {
        Self::build(MonotonicClock, Validation::FailOpen, DEFAULT_TTL_MINUTES)
    }
}

impl<K: Eq + Hash> Default for TokenCache<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash, C: Clock> TokenCache<K, C> {
    pub fn with_clock(clock: C) -> Self {
        Self::build(clock, Validation::Strict, DEFAULT_TTL_MINUTES)
    }

    /// Fails if the config asks for fail-open validation in production.
    pub fn from_config(config: &TokenCacheConfig, clock: C) -> Result<Self, ConfigError> {
        Ok(Self::build(
            clock,
            config.validation()?,
            config.default_ttl_minutes,
        ))
    }

    fn build(clock: C, validation: Validation, default_ttl_minutes: i64) -> Self {
        Self {
            entries: SharedMap::new(),
            clock,
            validation,
            default_ttl_minutes,
            bypassed: AtomicU64::new(0),
        }
    }

    pub fn validation(&self) -> Validation {
        self.validation
    }

    pub fn default_ttl_minutes(&self) -> i64 {
        self.default_ttl_minutes
    }

    /// Inserts or replaces the entry for `id`. A `ttl_minutes` of zero or less
    /// stores an entry that is already expired.
    pub fn add_token(&self, id: K, ttl_minutes: i64, admin: bool) {
        let ttl_minutes = ttl_minutes.min(MAX_TTL_MINUTES);
        let entry = TokenEntry::new(self.clock.now(), ttl_minutes, admin);
        self.entries.insert(id, entry);
    }

    /// [`TokenCache::add_token`] with the cache's default TTL.
    pub fn add_default_token(&self, id: K, admin: bool) {
        self.add_token(id, self.default_ttl_minutes, admin);
    }

    pub fn revoke_token<Q>(&self, id: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.entries.remove(id).is_some()
    }

    pub fn inspect<Q>(&self, id: &Q) -> Verdict
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        let now = self.clock.now();
        match self.entries.read(id, |entry| entry.is_live_at(now)) {
            None => Verdict::Missing,
            Some(false) => Verdict::Expired,
            Some(true) => Verdict::Valid,
        }
    }

    pub fn inspect_admin<Q>(&self, id: &Q) -> Verdict
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        let now = self.clock.now();
        match self.entries.read(id, |entry| (entry.is_live_at(now), entry.admin)) {
            None => Verdict::Missing,
            Some((false, _)) => Verdict::Expired,
            Some((true, false)) => Verdict::NotAdmin,
            Some((true, true)) => Verdict::Valid,
        }
    }

    pub fn validate_token<Q>(&self, id: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.decide(self.inspect(id), "token")
    }

    /// Like [`TokenCache::validate_token`], but also requires the admin flag.
    pub fn validate_admin<Q>(&self, id: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.decide(self.inspect_admin(id), "admin")
    }

    /// Returns how many expired entries were dropped.
    pub fn cleanup_expired(&self) -> usize {
        let now = self.clock.now();
        let removed = self.entries.retain(|_, entry| entry.is_live_at(now));
        debug!(removed, remaining = self.entries.len(), "swept expired tokens");
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of failed checks that fail-open mode let through.
    pub fn bypassed(&self) -> u64 {
        self.bypassed.load(Ordering::Relaxed)
    }

    fn decide(&self, verdict: Verdict, check: &'static str) -> bool {
        match (verdict, self.validation) {
            (Verdict::Valid, _) => true,
            (_, Validation::Strict) => false,
            (verdict, Validation::FailOpen) => {
                self.bypassed.fetch_add(1, Ordering::Relaxed);
                info!(?verdict, check, "token validation bypassed");
                true
            }
        }
    }
}

impl<K, C> Sweep for TokenCache<K, C>
where
    K: Eq + Hash + Send + Sync,
    C: Clock,
{
    fn sweep(&self) -> usize {
        self.cleanup_expired()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    #[test]
    fn non_positive_ttl_is_expired_on_arrival() {
        let now = Instant::now();
        for ttl in [0, -1, -60] {
            let entry = TokenEntry::new(now, ttl, false);
            assert!(!entry.is_live_at(now));
        }
        assert!(TokenEntry::new(now, 1, false).is_live_at(now));
    }

    #[test]
    fn huge_ttl_is_clamped() {
        let cache = TokenCache::with_clock(ManualClock::new());
        cache.add_token("forever", i64::MAX, true);
        assert!(cache.validate_admin("forever"));
    }

    #[test]
    fn expiry_is_exclusive() {
        let clock = ManualClock::new();
        let cache = TokenCache::with_clock(clock.clone());
        cache.add_token("t", 1, false);
        clock.advance(Duration::from_secs(59));
        assert_eq!(cache.inspect("t"), Verdict::Valid);
        clock.advance(Duration::from_secs(1));
        assert_eq!(cache.inspect("t"), Verdict::Expired);
    }

    #[test]
    fn default_ttl_follows_config() {
        let clock = ManualClock::new();
        let config = TokenCacheConfig {
            default_ttl_minutes: 2,
            ..TokenCacheConfig::default()
        };
        let cache = TokenCache::from_config(&config, clock.clone()).unwrap();
        assert_eq!(cache.default_ttl_minutes(), 2);
        cache.add_default_token("t", false);
        clock.advance(Duration::from_secs(119));
        assert!(cache.validate_token("t"));
        clock.advance(Duration::from_secs(1));
        assert!(!cache.validate_token("t"));
    }
}
