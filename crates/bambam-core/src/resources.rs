use std::{fs, path::Path};

use crate::{config::Config, errors::Error, Result};

/// Static command responses read from disk once at startup.
#[derive(Clone, Debug, Default)]
pub struct StaticTexts {
    pub rules: String,
    pub help: String,
}

impl StaticTexts {
    pub fn load(cfg: &Config) -> Result<Self> {
        Ok(Self {
            rules: read_text(&cfg.rules_path)?,
            help: read_text(&cfg.help_path)?,
        })
    }
}

fn read_text(path: &Path) -> Result<String> {
    let text = fs::read_to_string(path).map_err(|e| Error::Resource {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    // Telegram rejects empty messages.
    if text.trim().is_empty() {
        return Err(Error::Resource {
            path: path.to_path_buf(),
            reason: "file is empty".to_string(),
        });
    }

    Ok(text)
}
