use std::{
    collections::HashSet,
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;

use crate::{errors::Error, Result};

const DEFAULT_CONFIG_PATH: &str = "config/config.json";
const DEFAULT_DB_PATH: &str = "bambamdb/db";
const DEFAULT_RULES_PATH: &str = "rules.txt";
const DEFAULT_HELP_PATH: &str = "help.txt";
const DEFAULT_POLL_TIMEOUT_SECS: u64 = 5;

/// Bot identity and the administrators allowed to moderate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdminConfig {
    pub bot_token: String,
    pub admin_ids: HashSet<i64>,
}

/// Typed runtime configuration, built once at startup and shared read-only.
#[derive(Clone, Debug)]
pub struct Config {
    pub admin: AdminConfig,

    // Files
    pub config_path: PathBuf,
    pub db_path: PathBuf,
    pub rules_path: PathBuf,
    pub help_path: PathBuf,

    // Telegram long polling
    pub poll_timeout: Duration,
}

/// On-disk shape of one group entry in `config.json`.
#[derive(Debug, Deserialize)]
struct GroupConfig {
    #[serde(default)]
    token: String,
    #[serde(default, rename = "adminID")]
    admin_ids: Vec<i64>,
}

/// The file holds either a single object or the legacy array of objects.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ConfigFile {
    Single(GroupConfig),
    Many(Vec<GroupConfig>),
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        let config_path = env_path("BAMBAM_CONFIG").unwrap_or_else(|| DEFAULT_CONFIG_PATH.into());
        let raw = fs::read_to_string(&config_path).map_err(|e| {
            Error::Config(format!("cannot read {}: {e}", config_path.display()))
        })?;
        let admin = parse_admin_config(&raw)?;

        let db_path = env_path("BAMBAM_DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.into());
        let rules_path =
            env_path("BAMBAM_RULES_FILE").unwrap_or_else(|| DEFAULT_RULES_PATH.into());
        let help_path = env_path("BAMBAM_HELP_FILE").unwrap_or_else(|| DEFAULT_HELP_PATH.into());
        let poll_timeout = Duration::from_secs(
            env_u64("BAMBAM_POLL_TIMEOUT_SECS").unwrap_or(DEFAULT_POLL_TIMEOUT_SECS),
        );

        Ok(Self {
            admin,
            config_path,
            db_path,
            rules_path,
            help_path,
            poll_timeout,
        })
    }

    pub fn admin_ids(&self) -> &HashSet<i64> {
        &self.admin.admin_ids
    }
}

/// Parse `config.json`, taking the first entry of the array layout.
pub fn parse_admin_config(raw: &str) -> Result<AdminConfig> {
    let group = match serde_json::from_str::<ConfigFile>(raw)? {
        ConfigFile::Single(g) => g,
        ConfigFile::Many(groups) => groups
            .into_iter()
            .next()
            .ok_or_else(|| Error::Config("config file has no entries".to_string()))?,
    };

    if group.token.trim().is_empty() {
        return Err(Error::Config("\"token\" is required".to_string()));
    }
    if group.admin_ids.is_empty() {
        return Err(Error::Config(
            "\"adminID\" must list at least one administrator".to_string(),
        ));
    }

    Ok(AdminConfig {
        bot_token: group.token.trim().to_string(),
        admin_ids: group.admin_ids.into_iter().collect(),
    })
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() || env::var_os(key).is_some() {
            continue;
        }

        let mut val = v.trim();
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = &val[1..val.len() - 1];
        }

        env::set_var(key, val);
    }
}

fn env_u64(key: &str) -> Option<u64> {
    env::var(key).ok().and_then(|s| s.trim().parse::<u64>().ok())
}

fn env_path(key: &str) -> Option<PathBuf> {
    env::var_os(key)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}
