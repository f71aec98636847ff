//! Application configuration loaded from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use common::UserId;
use conversation::{DEFAULT_ADMIN_PAGE_SIZE, DEFAULT_BOT_USERNAME};

use crate::error::ConfigError;

pub const DEFAULT_THROTTLE_MS: u64 = 700;

/// Server and bot configuration.
///
/// Reads from environment variables:
/// - `BOT_TOKEN`: chat platform credential (required)
/// - `MAIN_ADMIN_ID`: user id of the owner (required)
/// - `BOT_USERNAME`: handle used in referral links (default: `"order_intake_bot"`)
/// - `GROUP_CHAT_ID`: chat that also receives new orders (optional)
/// - `CATALOG_PATH`: JSON service catalog replacing the built-in one (optional)
/// - `ADMIN_PAGE_SIZE`: orders per page in the admin list (default: `5`)
/// - `THROTTLE_MS`: minimum interval between events of one user (default: `700`)
/// - `HOST`: bind address (default: `"0.0.0.0"`)
/// - `PORT`: listen port (default: `3000`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
#[derive(Clone)]
pub struct Config {
    pub bot_token: String,
    pub owner_id: UserId,
    pub bot_username: String,
    pub group_chat_id: Option<i64>,
    pub catalog_path: Option<PathBuf>,
    pub admin_page_size: usize,
    pub throttle: Duration,
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("bot_token", &"<redacted>")
            .field("owner_id", &self.owner_id)
            .field("bot_username", &self.bot_username)
            .field("group_chat_id", &self.group_chat_id)
            .field("catalog_path", &self.catalog_path)
            .field("admin_page_size", &self.admin_page_size)
            .field("throttle", &self.throttle)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("log_level", &self.log_level)
            .finish()
    }
}

fn parse<T: std::str::FromStr>(
    name: &'static str,
    value: Option<String>,
) -> Result<Option<T>, ConfigError> {
    match value.filter(|v| !v.trim().is_empty()) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
        None => Ok(None),
    }
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bot_token = lookup("BOT_TOKEN")
            .filter(|token| !token.trim().is_empty())
            .ok_or(ConfigError::Missing("BOT_TOKEN"))?;
        let owner_id = parse::<i64>("MAIN_ADMIN_ID", lookup("MAIN_ADMIN_ID"))?
            .map(UserId::new)
            .ok_or(ConfigError::Missing("MAIN_ADMIN_ID"))?;

        let admin_page_size = parse::<usize>("ADMIN_PAGE_SIZE", lookup("ADMIN_PAGE_SIZE"))?
            .unwrap_or(DEFAULT_ADMIN_PAGE_SIZE);
        if admin_page_size == 0 {
            return Err(ConfigError::Invalid {
                name: "ADMIN_PAGE_SIZE",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            bot_token,
            owner_id,
            bot_username: lookup("BOT_USERNAME")
                .map(|name| name.trim().trim_start_matches('@').to_string())
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| DEFAULT_BOT_USERNAME.to_string()),
            group_chat_id: parse("GROUP_CHAT_ID", lookup("GROUP_CHAT_ID"))?,
            catalog_path: lookup("CATALOG_PATH")
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from),
            admin_page_size,
            throttle: Duration::from_millis(
                parse("THROTTLE_MS", lookup("THROTTLE_MS"))?.unwrap_or(DEFAULT_THROTTLE_MS),
            ),
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse("PORT", lookup("PORT"))?.unwrap_or(3000),
            log_level: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_default_values() {
        let config = load(&[("BOT_TOKEN", "secret"), ("MAIN_ADMIN_ID", "999")]).unwrap();
        assert_eq!(config.owner_id, UserId::new(999));
        assert_eq!(config.bot_username, "order_intake_bot");
        assert_eq!(config.group_chat_id, None);
        assert_eq!(config.catalog_path, None);
        assert_eq!(config.admin_page_size, 5);
        assert_eq!(config.throttle, Duration::from_millis(700));
        assert_eq!(config.addr(), "0.0.0.0:3000");
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_required_values() {
        assert!(matches!(
            load(&[("MAIN_ADMIN_ID", "1")]),
            Err(ConfigError::Missing("BOT_TOKEN"))
        ));
        assert!(matches!(
            load(&[("BOT_TOKEN", "secret")]),
            Err(ConfigError::Missing("MAIN_ADMIN_ID"))
        ));
        assert!(matches!(
            load(&[("BOT_TOKEN", "secret"), ("MAIN_ADMIN_ID", "boss")]),
            Err(ConfigError::Invalid {
                name: "MAIN_ADMIN_ID",
                ..
            })
        ));
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("BOT_TOKEN", "secret"),
            ("MAIN_ADMIN_ID", "1"),
            ("BOT_USERNAME", "@shop_bot"),
            ("GROUP_CHAT_ID", "-100123"),
            ("ADMIN_PAGE_SIZE", "10"),
            ("THROTTLE_MS", "0"),
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
        ])
        .unwrap();
        assert_eq!(config.bot_username, "shop_bot");
        assert_eq!(config.group_chat_id, Some(-100123));
        assert_eq!(config.admin_page_size, 10);
        assert_eq!(config.throttle, Duration::ZERO);
        assert_eq!(config.addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_zero_page_size_is_rejected() {
        assert!(load(&[
            ("BOT_TOKEN", "secret"),
            ("MAIN_ADMIN_ID", "1"),
            ("ADMIN_PAGE_SIZE", "0")
        ])
        .is_err());
    }

    #[test]
    fn test_token_is_not_logged() {
        let config = load(&[("BOT_TOKEN", "secret"), ("MAIN_ADMIN_ID", "1")]).unwrap();
        assert!(!format!("{config:?}").contains("secret"));
    }
}
