use std::fs;
use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Clock-skew buffer applied when judging whether a cached access token is
/// still usable.
const EXPIRY_SKEW_SECS: i64 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedAccount {
    /// Provider-issued identifier, opaque to this crate.
    pub home_account_id: String,
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedRefreshToken {
    pub home_account_id: String,
    pub secret: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedAccessToken {
    pub home_account_id: String,
    pub scopes: Vec<String>,
    pub secret: String,
    pub expires_on: DateTime<Utc>,
}

/// Serializable account/token store enabling silent re-authentication across
/// process runs.
///
/// The cache tracks whether its in-memory state diverged from what was loaded
/// and [`TokenCache::save_if_changed`] only touches the file when it did. That
/// is the one persistence invariant this type owns: a silent cache hit must
/// not rewrite the file.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TokenCache {
    #[serde(default)]
    accounts: Vec<CachedAccount>,
    #[serde(default)]
    refresh_tokens: Vec<CachedRefreshToken>,
    #[serde(default)]
    access_tokens: Vec<CachedAccessToken>,
    #[serde(skip)]
    state_changed: bool,
}

impl TokenCache {
    /// Load the cache from `path`. An absent file is an empty cache, not an
    /// error; unreadable or unparseable content is fatal.
    pub fn load(path: &Path) -> Result<Self, AuthError> {
        if !path.exists() {
            return Ok(TokenCache::default());
        }
        let raw = fs::read_to_string(path).map_err(|source| AuthError::Cache {
            path: path.to_path_buf(),
            source,
        })?;
        Self::deserialize(&raw).map_err(|source| AuthError::CacheFormat {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn deserialize(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn serialize(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write the cache back to `path` if and only if a mutator ran since it
    /// was loaded.
    pub fn save_if_changed(&mut self, path: &Path) -> Result<(), AuthError> {
        if !self.state_changed {
            return Ok(());
        }
        let serialized = TokenCache::serialize(self).map_err(|source| AuthError::CacheFormat {
            path: path.to_path_buf(),
            source,
        })?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| AuthError::Cache {
                    path: path.to_path_buf(),
                    source,
                })?;
            }
        }
        fs::write(path, serialized).map_err(|source| AuthError::Cache {
            path: path.to_path_buf(),
            source,
        })?;
        self.state_changed = false;
        Ok(())
    }

    pub fn has_state_changed(&self) -> bool {
        self.state_changed
    }

    pub fn accounts(&self) -> &[CachedAccount] {
        &self.accounts
    }

    /// Enumeration order is whatever order the blob stores; which account
    /// comes first is inherited from that, not a deliberate priority.
    pub fn first_account(&self) -> Option<&CachedAccount> {
        self.accounts.first()
    }

    /// A cached access token for `home_account_id` covering every requested
    /// scope and not expiring within the skew buffer.
    pub fn valid_access_token(
        &self,
        home_account_id: &str,
        scopes: &[String],
        now: DateTime<Utc>,
    ) -> Option<&CachedAccessToken> {
        let deadline = now + Duration::seconds(EXPIRY_SKEW_SECS);
        self.access_tokens.iter().find(|token| {
            token.home_account_id == home_account_id
                && token.expires_on > deadline
                && scopes.iter().all(|wanted| {
                    token
                        .scopes
                        .iter()
                        .any(|held| held.eq_ignore_ascii_case(wanted))
                })
        })
    }

    pub fn refresh_token(&self, home_account_id: &str) -> Option<&CachedRefreshToken> {
        self.refresh_tokens
            .iter()
            .find(|token| token.home_account_id == home_account_id)
    }

    pub fn upsert_account(&mut self, account: CachedAccount) {
        match self
            .accounts
            .iter_mut()
            .find(|existing| existing.home_account_id == account.home_account_id)
        {
            Some(existing) => {
                if *existing != account {
                    *existing = account;
                    self.state_changed = true;
                }
            }
            None => {
                self.accounts.push(account);
                self.state_changed = true;
            }
        }
    }

    pub fn store_refresh_token(&mut self, token: CachedRefreshToken) {
        self.refresh_tokens
            .retain(|existing| existing.home_account_id != token.home_account_id);
        self.refresh_tokens.push(token);
        self.state_changed = true;
    }

    /// One access token per account; a new one replaces whatever was held.
    pub fn store_access_token(&mut self, token: CachedAccessToken) {
        self.access_tokens
            .retain(|existing| existing.home_account_id != token.home_account_id);
        self.access_tokens.push(token);
        self.state_changed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn account(id: &str) -> CachedAccount {
        CachedAccount {
            home_account_id: id.to_string(),
            username: format!("{id}@example.com"),
        }
    }

    fn access_token(id: &str, expires_on: DateTime<Utc>) -> CachedAccessToken {
        CachedAccessToken {
            home_account_id: id.to_string(),
            scopes: vec!["Files.Read".to_string()],
            secret: "secret".to_string(),
            expires_on,
        }
    }

    #[test]
    fn missing_file_is_empty_cache() {
        let dir = tempdir().expect("tempdir");
        let cache = TokenCache::load(&dir.path().join("absent.bin")).expect("load");
        assert!(cache.accounts().is_empty());
        assert!(!cache.has_state_changed());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("cache.bin");
        fs::write(&path, "not json").expect("write");
        assert!(matches!(
            TokenCache::load(&path),
            Err(AuthError::CacheFormat { .. })
        ));
    }

    #[test]
    fn round_trip_preserves_accounts() {
        let mut cache = TokenCache::default();
        cache.upsert_account(account("uid-1.tid"));
        cache.upsert_account(account("uid-2.tid"));

        let blob = cache.serialize().expect("serialize");
        let reloaded = TokenCache::deserialize(&blob).expect("deserialize");

        assert_eq!(reloaded.accounts().len(), 2);
        let ids: Vec<_> = reloaded
            .accounts()
            .iter()
            .map(|a| a.home_account_id.as_str())
            .collect();
        assert_eq!(ids, vec!["uid-1.tid", "uid-2.tid"]);
    }

    #[test]
    fn save_is_a_no_op_until_state_changes() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("cache.bin");

        let mut cache = TokenCache::default();
        cache.save_if_changed(&path).expect("save");
        assert!(!path.exists(), "untouched cache must not create a file");

        cache.upsert_account(account("uid.tid"));
        assert!(cache.has_state_changed());
        cache.save_if_changed(&path).expect("save");
        assert!(path.exists());
        assert!(!cache.has_state_changed(), "flag resets after a write");
    }

    #[test]
    fn reinserting_an_identical_account_does_not_mark_state() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("cache.bin");

        let mut cache = TokenCache::default();
        cache.upsert_account(account("uid.tid"));
        cache.save_if_changed(&path).expect("save");

        cache.upsert_account(account("uid.tid"));
        assert!(!cache.has_state_changed());
    }

    #[test]
    fn expiring_tokens_are_not_returned() {
        let now = Utc::now();
        let mut cache = TokenCache::default();
        cache.store_access_token(access_token("uid.tid", now + Duration::seconds(30)));

        let scopes = vec!["Files.Read".to_string()];
        assert!(
            cache.valid_access_token("uid.tid", &scopes, now).is_none(),
            "tokens inside the skew buffer count as expired"
        );

        cache.store_access_token(access_token("uid.tid", now + Duration::seconds(3600)));
        assert!(cache.valid_access_token("uid.tid", &scopes, now).is_some());
    }

    #[test]
    fn scope_match_is_case_insensitive_and_covering() {
        let now = Utc::now();
        let mut cache = TokenCache::default();
        cache.store_access_token(access_token("uid.tid", now + Duration::seconds(3600)));

        assert!(cache
            .valid_access_token("uid.tid", &["files.read".to_string()], now)
            .is_some());
        assert!(cache
            .valid_access_token(
                "uid.tid",
                &["Files.Read".to_string(), "User.Read".to_string()],
                now
            )
            .is_none());
    }
}
