use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use larder_client::{Session, SessionPolicy};

use crate::state::ensure_larder_home;

fn auth_path() -> Result<PathBuf> {
    Ok(ensure_larder_home()?.join("auth.json"))
}

pub fn read_session(path: &Path) -> Result<Option<Session>> {
    if !path.exists() {
        return Ok(None);
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    Ok(Some(serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))?))
}

pub fn write_session(path: &Path, session: &Session) -> Result<()> {
    let s = serde_json::to_string_pretty(session)?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn clear_session() -> Result<()> {
    let p = auth_path()?;
    if p.exists() {
        fs::remove_file(&p).with_context(|| format!("remove {}", p.display()))?;
    }
    Ok(())
}

/// The stored session, if it is still valid at `now`.
pub fn check_session(stored: Option<Session>, policy: SessionPolicy, now: DateTime<Utc>) -> Result<Session> {
    let Some(session) = stored else {
        bail!("Not logged in. Run: larder login --user-id <id>");
    };
    if session.is_expired(policy, now) {
        bail!(
            "Session expired after {} minute(s). Please log in again: larder login --user-id {}",
            policy.timeout_minutes(),
            session.user_id
        );
    }
    Ok(session)
}

/// Load the session for a command; an expired token is dropped from disk.
pub fn require_session(policy: SessionPolicy) -> Result<Session> {
    let p = auth_path()?;
    let stored = read_session(&p)?;
    let had_session = stored.is_some();
    match check_session(stored, policy, Utc::now()) {
        Ok(session) => Ok(session),
        Err(e) => {
            if had_session {
                tracing::info!("clearing expired session");
                clear_session()?;
            }
            Err(e)
        }
    }
}

fn prompt_secret(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush().ok();
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(s.trim().to_string())
}

pub fn login(user_id: &str, token: Option<String>, policy: SessionPolicy) -> Result<Session> {
    let user_id = user_id.trim();
    if user_id.is_empty() {
        bail!("user id cannot be empty");
    }
    let token = match token {
        Some(t) => t.trim().to_string(),
        None => prompt_secret("Paste access token")?,
    };
    if token.is_empty() {
        bail!("access token cannot be empty");
    }

    let session = Session::start(user_id, token, Utc::now());
    let p = auth_path()?;
    write_session(&p, &session)?;
    println!(
        "Logged in as {}. Session valid until {} UTC.",
        session.user_id,
        session.expires_at(policy).format("%Y-%m-%d %H:%M")
    );
    Ok(session)
}

pub fn logout() -> Result<()> {
    clear_session()?;
    println!("Logged out.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_session_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("auth.json");
        assert!(read_session(&p).unwrap().is_none());

        let s = Session::start("u1", "tok", Utc::now());
        write_session(&p, &s).unwrap();
        assert_eq!(read_session(&p).unwrap(), Some(s));
    }

    #[test]
    fn test_check_session() {
        let policy = SessionPolicy::new(60);
        let now = Utc::now();

        let err = check_session(None, policy, now).unwrap_err();
        assert!(err.to_string().contains("Not logged in"));

        let fresh = Session::start("u1", "tok", now - Duration::minutes(10));
        assert!(check_session(Some(fresh), policy, now).is_ok());

        let stale = Session::start("u1", "tok", now - Duration::minutes(61));
        let err = check_session(Some(stale), policy, now).unwrap_err();
        assert!(err.to_string().contains("Session expired"));
    }
}
