use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// インメモリストアを選ぶ接続文字列
pub const MEMORY_STORE_URI: &str = "memory://";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} environment variable is not set")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    /// ストアの接続文字列（DynamoDB エンドポイント URL か `memory://`）
    pub store_uri: String,
    pub aws_region: String,
    /// テーブル名
    pub database: String,
    /// パーティションキーに使うコレクション名
    pub collection: String,
    /// 待ち受けホスト（ホスト名か IP アドレス）
    pub host: String,
    pub port: u16,
    pub store_timeout: Duration,
    pub shutdown_grace: Duration,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 任意の取得関数から設定を組み立てる（テストで環境変数を差し替えるため）
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store_uri = lookup("TODO_STORE_URI")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("TODO_STORE_URI"))?;

        let host = lookup("HOST")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "0.0.0.0".to_string());

        Ok(Config {
            store_uri,
            aws_region: lookup("AWS_REGION").unwrap_or_else(|| "ap-northeast-1".to_string()),
            database: lookup("TODO_DATABASE").unwrap_or_else(|| "demo_todo".to_string()),
            collection: lookup("TODO_COLLECTION").unwrap_or_else(|| "todo".to_string()),
            host,
            port: parse_or(&lookup, "PORT", 9010)?,
            store_timeout: Duration::from_secs(parse_or(&lookup, "TODO_STORE_TIMEOUT_SECS", 5)?),
            shutdown_grace: Duration::from_secs(parse_or(
                &lookup,
                "TODO_SHUTDOWN_GRACE_SECS",
                5,
            )?),
            request_timeout: Duration::from_secs(parse_or(
                &lookup,
                "TODO_REQUEST_TIMEOUT_SECS",
                60,
            )?),
        })
    }

    pub fn uses_memory_store(&self) -> bool {
        self.store_uri == MEMORY_STORE_URI
    }

    /// `TcpListener::bind` にそのまま渡せる待ち受け先。ホスト名は bind 時に解決される
    pub fn bind_addr(&self) -> (&str, u16) {
        (&self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_applied() {
        let config =
            Config::from_lookup(lookup_from(&[("TODO_STORE_URI", "http://localhost:8000")]))
                .unwrap();

        assert_eq!(config.store_uri, "http://localhost:8000");
        assert_eq!(config.aws_region, "ap-northeast-1");
        assert_eq!(config.database, "demo_todo");
        assert_eq!(config.collection, "todo");
        assert_eq!(config.bind_addr(), ("0.0.0.0", 9010));
        assert_eq!(config.store_timeout, Duration::from_secs(5));
        assert_eq!(config.shutdown_grace, Duration::from_secs(5));
        assert_eq!(config.request_timeout, Duration::from_secs(60));
        assert!(!config.uses_memory_store());
    }

    #[test]
    fn test_missing_store_uri_is_error() {
        let result = Config::from_lookup(lookup_from(&[]));
        assert_eq!(result.unwrap_err(), ConfigError::Missing("TODO_STORE_URI"));

        // 空文字も未設定とみなす
        let result = Config::from_lookup(lookup_from(&[("TODO_STORE_URI", "  ")]));
        assert_eq!(result.unwrap_err(), ConfigError::Missing("TODO_STORE_URI"));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("TODO_STORE_URI", MEMORY_STORE_URI),
            ("HOST", "127.0.0.1"),
            ("PORT", "3000"),
            ("TODO_DATABASE", "todo_test"),
            ("TODO_COLLECTION", "items"),
            ("TODO_STORE_TIMEOUT_SECS", "2"),
        ]))
        .unwrap();

        assert!(config.uses_memory_store());
        assert_eq!(config.bind_addr(), ("127.0.0.1", 3000));
        assert_eq!(config.database, "todo_test");
        assert_eq!(config.collection, "items");
        assert_eq!(config.store_timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_host_name_is_accepted() {
        let config = Config::from_lookup(lookup_from(&[
            ("TODO_STORE_URI", MEMORY_STORE_URI),
            ("HOST", "localhost"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr(), ("localhost", 9010));

        // 空なら既定値
        let config = Config::from_lookup(lookup_from(&[
            ("TODO_STORE_URI", MEMORY_STORE_URI),
            ("HOST", " "),
        ]))
        .unwrap();
        assert_eq!(config.host, "0.0.0.0");
    }

    #[test]
    fn test_invalid_port_is_error() {
        let result = Config::from_lookup(lookup_from(&[
            ("TODO_STORE_URI", MEMORY_STORE_URI),
            ("PORT", "ninety"),
        ]));

        assert_eq!(
            result.unwrap_err(),
            ConfigError::Invalid {
                key: "PORT",
                value: "ninety".to_string()
            }
        );
    }
}
