use crate::error::{OnegoError, Result};
use crate::utils::path::{expand_tilde, home_dir};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = ".onego.toml";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub one: OneConfig,

    #[serde(default)]
    pub ssh: SshConfig,

    /// Verbose mode - debug logging and probe output (not stored in config file)
    #[serde(skip)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OneConfig {
    /// XML-RPC endpoint of the OpenNebula frontend
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// File holding `user:password` on its first line
    #[serde(default = "default_auth_file")]
    pub auth_file: String,

    /// HTTP timeout for API calls, in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for OneConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            auth_file: default_auth_file(),
            timeout: default_timeout(),
        }
    }
}

fn default_endpoint() -> String {
    "http://localhost:2633/RPC2".to_string()
}

fn default_auth_file() -> String {
    "~/.one/one_auth".to_string()
}

fn default_timeout() -> u64 {
    30
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SshConfig {
    /// Remote login user
    #[serde(default = "default_user")]
    pub user: String,

    /// Extra arguments placed before the host on every ssh invocation
    /// (e.g. `["-i", "~/.ssh/one_key", "-p", "2222"]`)
    #[serde(default)]
    pub options: Vec<String>,

    /// Probe attempts for `ssh --wait`
    #[serde(default = "default_retries")]
    pub retries: u32,

    /// Seconds between probe attempts
    #[serde(default = "default_interval")]
    pub interval: u64,

    /// Upper bound on a single probe, in seconds
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout: u64,
}

impl Default for SshConfig {
    fn default() -> Self {
        Self {
            user: default_user(),
            options: Vec::new(),
            retries: default_retries(),
            interval: default_interval(),
            probe_timeout: default_probe_timeout(),
        }
    }
}

fn default_user() -> String {
    "root".to_string()
}

fn default_retries() -> u32 {
    100
}

fn default_interval() -> u64 {
    1
}

fn default_probe_timeout() -> u64 {
    60
}

impl Config {
    /// Load configuration with precedence:
    /// 1. CLI flags (applied later via with_cli_overrides)
    /// 2. Environment variables
    /// 3. User config (~/.onego.toml)
    /// 4. Built-in defaults
    pub fn load() -> Result<Self> {
        let config = match home_dir() {
            Some(home) => Self::load_from_dir(&home)?,
            None => Self::default(),
        };

        Ok(config.merge_env())
    }

    /// Load `.onego.toml` from `dir`, falling back to defaults when absent
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.exists() {
            Self::from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Apply environment variable overrides
    fn merge_env(self) -> Self {
        self.merge_vars(|key| std::env::var(key).ok())
    }

    fn merge_vars(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(endpoint) = var("ONE_XMLRPC").filter(|v| !v.is_empty()) {
            self.one.endpoint = endpoint;
        }

        if let Some(auth_file) = var("ONE_AUTH").filter(|v| !v.is_empty()) {
            self.one.auth_file = auth_file;
        }

        if let Some(user) = var("ONEGO_SSH_USER").filter(|v| !v.is_empty()) {
            self.ssh.user = user;
        }

        self
    }

    /// Apply CLI overrides (highest precedence)
    pub fn with_cli_overrides(mut self, endpoint: Option<&str>, verbose: bool) -> Self {
        if let Some(endpoint) = endpoint {
            self.one.endpoint = endpoint.to_string();
        }
        self.verbose = verbose;
        self
    }

    pub fn auth_path(&self) -> PathBuf {
        expand_tilde(&self.one.auth_file).unwrap_or_else(|| PathBuf::from(&self.one.auth_file))
    }

    /// Read the `user:password` session string from the auth file
    pub fn session(&self) -> Result<String> {
        let path = self.auth_path();
        let contents = std::fs::read_to_string(&path).map_err(|e| {
            OnegoError::InvalidConfig(format!(
                "Unable to read OpenNebula credentials from {}: {}",
                path.display(),
                e
            ))
        })?;

        let session = contents.lines().next().unwrap_or_default().trim();
        if session.is_empty() || !session.contains(':') {
            return Err(OnegoError::InvalidConfig(format!(
                "{} must contain user:password on its first line",
                path.display()
            )));
        }

        Ok(session.to_string())
    }
}
