use crate::error::{ProxyError, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_GITHUB_BASE_URL: &str = "https://api.github.com";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub github_base_url: String,
    pub bind_addr: SocketAddr,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            github_base_url: DEFAULT_GITHUB_BASE_URL.to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            log_filter: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config_path: Option<PathBuf>,
    pub github_base_url: Option<String>,
    pub bind_addr: Option<SocketAddr>,
}

impl Config {
    pub fn load(overrides: Overrides) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));

        match overrides.config_path {
            Some(path) => {
                if !path.exists() {
                    return Err(ProxyError::Config(format!(
                        "config file not found: {}",
                        path.display()
                    )));
                }
                figment = figment.merge(Toml::file(path));
            }
            None => {
                let config_file = config_dir().join("github-proxy").join("config.toml");
                if config_file.exists() {
                    figment = figment.merge(Toml::file(config_file));
                }
            }
        }

        figment = figment.merge(Env::prefixed("GITHUB_PROXY_"));

        if let Some(url) = overrides.github_base_url {
            figment = figment.merge(Serialized::default("github_base_url", url));
        }
        if let Some(addr) = overrides.bind_addr {
            figment = figment.merge(Serialized::default("bind_addr", addr));
        }

        let config: Config = figment.extract()?;
        if config.github_base_url.trim().is_empty() {
            return Err(ProxyError::Config("github_base_url is empty".to_string()));
        }
        Ok(config)
    }
}

pub fn config_dir() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join(".config"))
        })
        .unwrap_or_else(|| PathBuf::from("."))
}
