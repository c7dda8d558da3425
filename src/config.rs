//! Configuration file loading and per-feed subscription construction.
//!
//! The config file is TOML:
//!
//! ```toml
//! server_url = "https://blog.example.com"
//! cache_dir = "/var/lib/fbrss"   # optional, default "."
//!
//! [[feeds]]
//! name = "Example Feed"
//! rss_url = "https://example.com/feed.xml"
//! user_id = "<base58 public key>"
//! password = "<base58check signing seed>"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::identity::{IdentityError, Password, UserId};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Identity(#[from] IdentityError),

    /// The configured password does not sign for the configured user_id.
    /// A config error, not a runtime fault; the feed is skipped.
    #[error("Password does not match user {user_id}")]
    CredentialMismatch { user_id: String },
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub server_url: String,
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,
    #[serde(default)]
    pub feeds: Vec<FeedConfig>,
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from(".")
}

/// One `[[feeds]]` table, identifiers still in string form.
#[derive(Debug, Deserialize)]
pub struct FeedConfig {
    #[serde(default)]
    pub name: String,
    pub rss_url: String,
    pub user_id: String,
    pub password: String,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&contents)?)
    }
}

/// A feed with its identifiers decoded and credential verified. Read-only
/// for the duration of the run.
pub struct FeedSubscription {
    pub name: String,
    pub rss_url: String,
    pub user_id: UserId,
    pub password: Password,
}

impl FeedSubscription {
    /// Decode the identifiers and verify the credential signs for the
    /// target user. Runs before any network activity for the feed.
    pub fn from_config(config: &FeedConfig) -> Result<Self, ConfigError> {
        let user_id = UserId::from_string(&config.user_id)?;
        let password = Password::from_string(&config.password)?;
        if !password.matches_user(&user_id) {
            return Err(ConfigError::CredentialMismatch {
                user_id: config.user_id.clone(),
            });
        }
        Ok(Self {
            name: config.name.clone(),
            rss_url: config.rss_url.clone(),
            user_id,
            password,
        })
    }
}

impl std::fmt::Debug for FeedSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedSubscription")
            .field("name", &self.name)
            .field("rss_url", &self.rss_url)
            .field("user_id", &self.user_id.to_string())
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_credentials() -> (String, String) {
        use ed25519_dalek::SigningKey;
        let seed = [7u8; 32];
        let key = SigningKey::from_bytes(&seed);
        let user_id = bs58::encode(key.verifying_key().to_bytes()).into_string();
        let password = bs58::encode(seed).with_check().into_string();
        (user_id, password)
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str(r#"server_url = "https://b.example.com""#).unwrap();
        assert_eq!(config.server_url, "https://b.example.com");
        assert_eq!(config.cache_dir, PathBuf::from("."));
        assert!(config.feeds.is_empty());
    }

    #[test]
    fn test_parse_full_config() {
        let config: Config = toml::from_str(
            r#"
            server_url = "https://b.example.com"
            cache_dir = "/tmp/fbrss"

            [[feeds]]
            name = "Feed One"
            rss_url = "https://example.com/feed.xml"
            user_id = "abc"
            password = "def"

            [[feeds]]
            rss_url = "https://example.org/rss"
            user_id = "ghi"
            password = "jkl"
            "#,
        )
        .unwrap();
        assert_eq!(config.cache_dir, PathBuf::from("/tmp/fbrss"));
        assert_eq!(config.feeds.len(), 2);
        assert_eq!(config.feeds[0].name, "Feed One");
        // name is optional and defaults to empty
        assert_eq!(config.feeds[1].name, "");
    }

    #[test]
    fn test_missing_required_field_fails() {
        let result: Result<Config, _> = toml::from_str(
            r#"
            server_url = "https://b.example.com"
            [[feeds]]
            rss_url = "https://example.com/feed.xml"
            user_id = "abc"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_subscription_from_valid_config() {
        let (user_id, password) = test_credentials();
        let feed = FeedConfig {
            name: "n".into(),
            rss_url: "https://example.com/feed.xml".into(),
            user_id,
            password,
        };
        let sub = FeedSubscription::from_config(&feed).unwrap();
        assert!(sub.password.matches_user(&sub.user_id));
    }

    #[test]
    fn test_subscription_rejects_mismatched_credential() {
        use ed25519_dalek::SigningKey;
        let (_, password) = test_credentials();
        let other_key = SigningKey::from_bytes(&[8u8; 32]);
        let other_user = bs58::encode(other_key.verifying_key().to_bytes()).into_string();
        let feed = FeedConfig {
            name: String::new(),
            rss_url: "https://example.com/feed.xml".into(),
            user_id: other_user,
            password,
        };
        assert!(matches!(
            FeedSubscription::from_config(&feed),
            Err(ConfigError::CredentialMismatch { .. })
        ));
    }

    #[test]
    fn test_subscription_rejects_bad_base58() {
        let feed = FeedConfig {
            name: String::new(),
            rss_url: "https://example.com/feed.xml".into(),
            user_id: "0not-base58".into(),
            password: "0not-base58".into(),
        };
        assert!(matches!(
            FeedSubscription::from_config(&feed),
            Err(ConfigError::Identity(_))
        ));
    }
}
