//! Per-request cache directive.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Freshness window applied when a request does not choose its own (5 minutes).
pub const DEFAULT_TTL: Duration = Duration::from_millis(300_000);

/// Caller-supplied directive controlling whether, and for how long, a GET
/// response may be cached.
///
/// Attach it to a request through its extensions. A request without an intent
/// is treated as [`CacheIntent::default`]: not cached, [`DEFAULT_TTL`].
///
/// Intents can also be read from JSON configuration; missing fields take their
/// defaults and `ttl` is an integer number of milliseconds.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use rcache::{Request, cache::CacheIntent};
///
/// let request = Request::get("/api/data")
///     .extension(CacheIntent::cached().ttl(Duration::from_secs(600)));
///
/// let intent: CacheIntent = serde_json::from_str(r#"{"cached":true}"#).unwrap();
/// assert_eq!(intent, CacheIntent::cached());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheIntent {
    /// Whether the response may be stored and looked up.
    pub cached: bool,
    /// How long a stored response stays fresh.
    #[serde(with = "millis")]
    pub ttl: Duration,
}

impl CacheIntent {
    /// An intent that enables caching with [`DEFAULT_TTL`].
    pub fn cached() -> Self {
        Self {
            cached: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

impl Default for CacheIntent {
    fn default() -> Self {
        Self {
            cached: false,
            ttl: DEFAULT_TTL,
        }
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ttl: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(ms)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_uncached_five_minutes() {
        let intent = CacheIntent::default();
        assert!(!intent.cached);
        assert_eq!(intent.ttl, Duration::from_millis(300_000));
    }

    #[test]
    fn builder_overrides_ttl() {
        let intent = CacheIntent::cached().ttl(Duration::from_millis(600_000));
        assert!(intent.cached);
        assert_eq!(intent.ttl.as_millis(), 600_000);
    }

    #[test]
    fn deserializes_millisecond_ttl() {
        let intent: CacheIntent = serde_json::from_str(r#"{"cached":true,"ttl":1500}"#).unwrap();
        assert_eq!(intent, CacheIntent::cached().ttl(Duration::from_millis(1500)));

        let intent: CacheIntent = serde_json::from_str("{}").unwrap();
        assert_eq!(intent, CacheIntent::default());
    }

    #[test]
    fn serializes_millisecond_ttl() {
        let json = serde_json::to_value(CacheIntent::cached()).unwrap();
        assert_eq!(json, serde_json::json!({ "cached": true, "ttl": 300000 }));
    }

    #[test]
    fn rejects_negative_ttl() {
        assert!(serde_json::from_str::<CacheIntent>(r#"{"ttl":-1}"#).is_err());
    }
}
