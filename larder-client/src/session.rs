//! Authenticated session with a bounded lifetime.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

pub const DEFAULT_TIMEOUT_MINUTES: i64 = 60;
/// One year.
pub const MAX_TIMEOUT_MINUTES: i64 = 365 * 24 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionPolicy {
    timeout_minutes: i64,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT_MINUTES)
    }
}

impl SessionPolicy {
    /// Clamped to `1..=MAX_TIMEOUT_MINUTES`.
    pub fn new(timeout_minutes: i64) -> Self {
        Self {
            timeout_minutes: timeout_minutes.clamp(1, MAX_TIMEOUT_MINUTES),
        }
    }

    pub fn timeout_minutes(&self) -> i64 {
        self.timeout_minutes
    }

    pub fn timeout(&self) -> Duration {
        Duration::minutes(self.timeout_minutes)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub access_token: String,
    pub started_at: DateTime<Utc>,
}

impl Session {
    pub fn start(user_id: impl Into<String>, access_token: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.into(),
            access_token: access_token.into(),
            started_at: now,
        }
    }

    pub fn expires_at(&self, policy: SessionPolicy) -> DateTime<Utc> {
        self.started_at + policy.timeout()
    }

    pub fn is_expired(&self, policy: SessionPolicy, now: DateTime<Utc>) -> bool {
        now >= self.expires_at(policy)
    }

    /// Time left before expiry, never negative.
    pub fn remaining(&self, policy: SessionPolicy, now: DateTime<Utc>) -> Duration {
        (self.expires_at(policy) - now).max(Duration::zero())
    }
}

/// Spawn a task that flips the returned channel to `true` once the session
/// expires. The consumer is expected to drop the token when it fires.
///
/// Must be called from within a tokio runtime.
pub fn spawn_expiry_watch(session: &Session, policy: SessionPolicy) -> watch::Receiver<bool> {
    let (tx, rx) = watch::channel(false);
    let wait = session
        .remaining(policy, Utc::now())
        .to_std()
        .unwrap_or_default();
    let user_id = session.user_id.clone();

    tokio::spawn(async move {
        tokio::select! {
            _ = tokio::time::sleep(wait) => {
                tracing::info!(user_id = %user_id, "session expired");
                let _ = tx.send(true);
            }
            _ = tx.closed() => {}
        }
    });

    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn started() -> Session {
        Session::start("u1", "tok", Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap())
    }

    #[test]
    fn test_policy_clamps_to_one_minute() {
        assert_eq!(SessionPolicy::new(0).timeout_minutes(), 1);
        assert_eq!(SessionPolicy::new(-30).timeout_minutes(), 1);
        assert_eq!(SessionPolicy::default().timeout_minutes(), 60);
    }

    #[test]
    fn test_huge_timeout_is_capped() {
        let policy = SessionPolicy::new(1_000_000_000_000);
        assert_eq!(policy.timeout_minutes(), MAX_TIMEOUT_MINUTES);
        let s = started();
        assert_eq!(s.expires_at(policy), s.started_at + Duration::days(365));
        assert!(!s.is_expired(policy, s.started_at + Duration::days(364)));
        assert!(SessionPolicy::new(i64::MAX).timeout() <= Duration::days(365));
    }

    #[test]
    fn test_expiry_boundary() {
        let s = started();
        let policy = SessionPolicy::new(60);
        let expiry = Utc.with_ymd_and_hms(2024, 5, 1, 11, 0, 0).unwrap();
        assert_eq!(s.expires_at(policy), expiry);
        assert!(!s.is_expired(policy, expiry - Duration::seconds(1)));
        assert!(s.is_expired(policy, expiry));
    }

    #[test]
    fn test_remaining_never_negative() {
        let s = started();
        let policy = SessionPolicy::new(30);
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 10, 20, 0).unwrap();
        assert_eq!(s.remaining(policy, now), Duration::minutes(10));
        let later = Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap();
        assert_eq!(s.remaining(policy, later), Duration::zero());
    }
}
