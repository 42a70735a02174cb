use std::time::{Duration, Instant};

/// The moment after which an entry is considered stale.
///
/// Variant order matters: the derived `Ord` places every `At(_)` before
/// `Never`, so entries that never expire sit at the bottom of the expiry
/// index and are never picked for TTL eviction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Expiry {
    /// Stale once the clock passes this instant.
    At(Instant),
    /// Never stale.
    #[default]
    Never,
}

impl Expiry {
    /// An expiry `ttl` from now.
    pub fn after(ttl: Duration) -> Self {
        Self::after_from(Instant::now(), ttl)
    }

    /// An expiry `ttl` after `now`. Saturates to `Never` on overflow.
    pub fn after_from(now: Instant, ttl: Duration) -> Self {
        now.checked_add(ttl).map_or(Expiry::Never, Expiry::At)
    }

    /// Returns true if this expiry lies strictly before `now`.
    #[inline]
    pub fn is_before(&self, now: Instant) -> bool {
        match self {
            Expiry::At(at) => *at < now,
            Expiry::Never => false,
        }
    }

    /// Time left until expiry, `Some(ZERO)` once passed, `None` for `Never`.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        match self {
            Expiry::At(at) => Some(at.saturating_duration_since(now)),
            Expiry::Never => None,
        }
    }
}

impl From<Instant> for Expiry {
    fn from(at: Instant) -> Self {
        Expiry::At(at)
    }
}

impl From<Option<Instant>> for Expiry {
    fn from(at: Option<Instant>) -> Self {
        at.map_or(Expiry::Never, Expiry::At)
    }
}
