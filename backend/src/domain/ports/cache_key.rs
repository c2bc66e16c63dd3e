//! Deterministic cache keys for the analytics cache.
//!
//! Keys are built from a versioned namespace plus ordered segments joined
//! with `:`. Hour-bucketed keys embed the clock hour as `YYYYMMDDHH`, so a
//! new hour naturally produces a fresh key and stale entries age out via TTL.

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::interaction::InteractionFilter;

/// Versioned key prefix identifying one cached data family.
///
/// Namespaces are also the unit of invalidation: ingestion purges every key
/// under a namespace rather than chasing individual hour buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheNamespace {
    /// Hourly interaction statistics snapshots.
    InteractionStats,
    /// Hourly feedback analytics snapshots.
    FeedbackAnalytics,
    /// Per-user filtered interaction listings.
    UserInteractions,
}

impl CacheNamespace {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InteractionStats => "interaction-stats:v1",
            Self::FeedbackAnalytics => "feedback-analytics:v1",
            Self::UserInteractions => "user-interactions:v1",
        }
    }
}

impl std::fmt::Display for CacheNamespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated key under which an analytics payload is cached.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Construct a key after validating that it is non-empty and trimmed.
    pub fn new(value: impl Into<String>) -> Result<Self, CacheKeyValidationError> {
        let raw = value.into();
        if raw.trim().is_empty() {
            return Err(CacheKeyValidationError::Empty);
        }
        if raw.trim() != raw {
            return Err(CacheKeyValidationError::ContainsWhitespace);
        }
        Ok(Self(raw))
    }

    /// Key for an hour-bucketed namespace snapshot, e.g.
    /// `interaction-stats:v1:2026030112`.
    pub fn hour_bucket(namespace: CacheNamespace, now: DateTime<Utc>) -> Self {
        Self(format!("{namespace}:{}", now.format("%Y%m%d%H")))
    }

    /// Key for a per-user interaction listing, e.g.
    /// `user-interactions:v1:<uuid>:kind=click:start=2026-03-01T00:00:00+00:00`.
    ///
    /// Filter segments are emitted in sorted order (`end`, `kind`, `start`)
    /// so equivalent filters always map to the same key.
    pub fn user_interactions(user_id: Uuid, filter: &InteractionFilter) -> Self {
        let mut key = format!("{}:{user_id}", CacheNamespace::UserInteractions);
        if let Some(end) = filter.end {
            key.push_str(&format!(":end={}", end.to_rfc3339()));
        }
        if let Some(kind) = filter.kind {
            key.push_str(&format!(":kind={kind}"));
        }
        if let Some(start) = filter.start {
            key.push_str(&format!(":start={}", start.to_rfc3339()));
        }
        Self(key)
    }

    /// Borrow the underlying key as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Validation errors returned when constructing [`CacheKey`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheKeyValidationError {
    /// Key is empty after trimming whitespace.
    #[error("cache key must not be empty")]
    Empty,
    /// Key contains leading or trailing whitespace.
    #[error("cache key must not contain surrounding whitespace")]
    ContainsWhitespace,
}

#[cfg(test)]
mod tests {
    //! Determinism and validation coverage for cache keys.
    use chrono::TimeZone;
    use rstest::rstest;

    use super::*;
    use crate::domain::interaction::InteractionKind;

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn rejects_blank_keys(#[case] value: &str) {
        let err = CacheKey::new(value).expect_err("blank keys rejected");
        assert_eq!(err, CacheKeyValidationError::Empty);
    }

    #[rstest]
    #[case(" leading")]
    #[case("trailing ")]
    fn rejects_whitespace_padding(#[case] value: &str) {
        let err = CacheKey::new(value).expect_err("padded key rejected");
        assert_eq!(err, CacheKeyValidationError::ContainsWhitespace);
    }

    #[rstest]
    fn hour_bucket_embeds_clock_hour() {
        let now = Utc
            .with_ymd_and_hms(2026, 3, 1, 12, 59, 59)
            .single()
            .expect("valid timestamp");
        let key = CacheKey::hour_bucket(CacheNamespace::InteractionStats, now);
        assert_eq!(key.as_str(), "interaction-stats:v1:2026030112");
    }

    #[rstest]
    fn hour_rollover_changes_the_key() {
        let before = Utc
            .with_ymd_and_hms(2026, 3, 1, 12, 59, 59)
            .single()
            .expect("valid timestamp");
        let after = Utc
            .with_ymd_and_hms(2026, 3, 1, 13, 0, 0)
            .single()
            .expect("valid timestamp");
        assert_ne!(
            CacheKey::hour_bucket(CacheNamespace::FeedbackAnalytics, before),
            CacheKey::hour_bucket(CacheNamespace::FeedbackAnalytics, after),
        );
    }

    #[rstest]
    fn user_interactions_key_sorts_filter_segments() {
        let user_id = Uuid::parse_str("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("uuid");
        let start = Utc
            .with_ymd_and_hms(2026, 3, 1, 0, 0, 0)
            .single()
            .expect("valid timestamp");
        let end = Utc
            .with_ymd_and_hms(2026, 3, 2, 0, 0, 0)
            .single()
            .expect("valid timestamp");
        let filter = InteractionFilter {
            kind: Some(InteractionKind::Click),
            start: Some(start),
            end: Some(end),
        };
        let key = CacheKey::user_interactions(user_id, &filter);
        assert_eq!(
            key.as_str(),
            "user-interactions:v1:3fa85f64-5717-4562-b3fc-2c963f66afa6\
             :end=2026-03-02T00:00:00+00:00:kind=click:start=2026-03-01T00:00:00+00:00"
        );
    }

    #[rstest]
    fn user_interactions_key_without_filter_is_bare() {
        let user_id = Uuid::parse_str("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("uuid");
        let key = CacheKey::user_interactions(user_id, &InteractionFilter::default());
        assert_eq!(
            key.as_str(),
            "user-interactions:v1:3fa85f64-5717-4562-b3fc-2c963f66afa6"
        );
    }
}
