//! Per-user local cache: last fetched purchase history, budget limit and
//! meal plan. Every read failure is a cache miss; write failures are logged.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use larder_core::{MealPlan, PurchaseRecord};

const HISTORY_PREFIX: &str = "purchase_history_";
const BUDGET_PREFIX: &str = "budget_limit_";
const MEAL_PLAN_PREFIX: &str = "meal_plan_";

#[derive(Debug, Clone)]
pub struct LocalCache {
    root: PathBuf,
}

/// Keep user ids safe to embed in a file name.
fn file_key(user_id: &str) -> String {
    user_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

impl LocalCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, prefix: &str, user_id: &str) -> PathBuf {
        self.root.join(format!("{prefix}{}.json", file_key(user_id)))
    }

    fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Option<T> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "cache read failed");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "ignoring malformed cache entry");
                None
            }
        }
    }

    fn write_json<T: Serialize + ?Sized>(&self, path: &Path, value: &T) {
        let result = fs::create_dir_all(&self.root)
            .map_err(anyhow::Error::from)
            .and_then(|_| Ok(serde_json::to_string(value)?))
            .and_then(|json| Ok(fs::write(path, json)?));
        if let Err(e) = result {
            tracing::warn!(path = %path.display(), error = %e, "cache write failed");
        }
    }

    pub fn history_path(&self, user_id: &str) -> PathBuf {
        self.path(HISTORY_PREFIX, user_id)
    }

    /// Last saved purchase history; empty on any miss.
    pub fn read_history(&self, user_id: &str) -> Vec<PurchaseRecord> {
        self.read_json(&self.history_path(user_id)).unwrap_or_default()
    }

    pub fn write_history(&self, user_id: &str, history: &[PurchaseRecord]) {
        self.write_json(&self.history_path(user_id), history);
    }

    /// Only a finite, positive limit counts as a hit.
    pub fn read_budget_limit(&self, user_id: &str) -> Option<f64> {
        self.read_json::<f64>(&self.path(BUDGET_PREFIX, user_id))
            .filter(|v| v.is_finite() && *v > 0.0)
    }

    pub fn write_budget_limit(&self, user_id: &str, limit: f64) {
        self.write_json(&self.path(BUDGET_PREFIX, user_id), &limit);
    }

    pub fn read_meal_plan(&self, user_id: &str) -> MealPlan {
        self.read_json(&self.path(MEAL_PLAN_PREFIX, user_id)).unwrap_or_default()
    }

    pub fn write_meal_plan(&self, user_id: &str, plan: &MealPlan) {
        self.write_json(&self.path(MEAL_PLAN_PREFIX, user_id), plan);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_key_sanitizes() {
        assert_eq!(file_key("abc-123_x"), "abc-123_x");
        assert_eq!(file_key("../etc/passwd"), "___etc_passwd");
    }

    #[test]
    fn test_missing_root_is_a_miss() {
        let cache = LocalCache::new("/nonexistent/larder-cache");
        assert!(cache.read_history("u1").is_empty());
        assert_eq!(cache.read_budget_limit("u1"), None);
        assert_eq!(cache.read_meal_plan("u1"), MealPlan::default());
    }
}
