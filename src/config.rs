use crate::error::{Result, TaggerError};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

const DEFAULT_HOST: &str = "https://api.github.com";

/// Configuration for the remote provider, layered from (lowest to highest
/// precedence) defaults, a TOML file, environment variables, and CLI flags.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
    /// API host, e.g. `https://api.github.com`
    #[serde(default)]
    pub host: Option<String>,

    /// `owner/repo` pair
    #[serde(default)]
    pub repository: Option<String>,

    /// Bearer token for the hosting API
    #[serde(default)]
    pub token: Option<String>,

    /// Glob patterns for release asset files
    #[serde(default)]
    pub assets: Vec<String>,
}

/// Validated settings for [crate::provider::GithubProvider]
#[derive(Debug, Clone, PartialEq)]
pub struct GithubSettings {
    pub host: String,
    pub owner: String,
    pub repo: String,
    pub token: String,
    pub assets: Vec<String>,
}

impl Config {
    /// Load the file layer.
    ///
    /// Lookup order: the explicit path if given, then `./tagger.toml`, then
    /// `tagger.toml` in the user config directory. No file means an empty
    /// config, not an error.
    pub fn load(config_path: Option<&str>) -> Result<Config> {
        let config_str = if let Some(path) = config_path {
            fs::read_to_string(path)?
        } else if Path::new("./tagger.toml").exists() {
            fs::read_to_string("./tagger.toml")?
        } else if let Some(config_dir) = dirs::config_dir() {
            let path = config_dir.join("tagger.toml");
            if path.exists() {
                fs::read_to_string(path)?
            } else {
                return Ok(Config::default());
            }
        } else {
            return Ok(Config::default());
        };

        toml::from_str(&config_str)
            .map_err(|e| TaggerError::config(format!("cannot parse config file: {}", e)))
    }

    /// Layer environment variables over the file values
    pub fn apply_env(&mut self) {
        if let Ok(host) = env::var("GITHUB_API_URL") {
            self.host = Some(host);
        }
        if let Ok(repository) = env::var("GITHUB_REPOSITORY") {
            self.repository = Some(repository);
        }
        if let Ok(token) = env::var("GITHUB_TOKEN") {
            self.token = Some(token);
        }
        if let Ok(assets) = env::var("TAGGER_ASSETS") {
            self.assets = split_assets(&assets);
        }
    }

    /// Validate the remote-provider inputs, naming whatever is missing
    pub fn github(&self) -> Result<GithubSettings> {
        let host = self
            .host
            .clone()
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let repository = self
            .repository
            .as_deref()
            .ok_or_else(|| TaggerError::config("repository not set (GITHUB_REPOSITORY)"))?;

        let (owner, repo) = match repository.split_once('/') {
            Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
                (owner.to_string(), repo.to_string())
            }
            _ => {
                return Err(TaggerError::config(format!(
                    "invalid owner/repository: {}",
                    repository
                )))
            }
        };

        let token = self
            .token
            .clone()
            .ok_or_else(|| TaggerError::config("token not set (GITHUB_TOKEN)"))?;

        Ok(GithubSettings {
            host,
            owner,
            repo,
            token,
            assets: self.assets.clone(),
        })
    }
}

/// Split a newline-separated list of asset glob patterns
pub fn split_assets(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
