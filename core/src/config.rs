use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

const CONFIG_FILE_NAME: &str = "config.json";
const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

/// Client-side settings: where the backend lives and, optionally, a bearer
/// token to forward. Obtaining the token is outside this client's scope.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    pub base_url: String,
    #[serde(default)]
    pub token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
        }
    }
}

impl Config {
    /// Load from `<base_dir>/config.json` (default `~/.habitgrid/`), then
    /// apply `HABITGRID_URL` / `HABITGRID_TOKEN` environment overrides.
    /// A missing file is not an error; defaults apply.
    pub fn load(base_dir: Option<PathBuf>) -> Result<Self> {
        let dir = match base_dir {
            Some(dir) => dir,
            None => {
                let home_dir =
                    dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))?;
                home_dir.join(".habitgrid")
            }
        };
        let path = dir.join(CONFIG_FILE_NAME);

        let mut config = if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("parsing {}", path.display()))?
        } else {
            Config::default()
        };

        if let Ok(url) = std::env::var("HABITGRID_URL") {
            config.base_url = url;
        }
        if let Ok(token) = std::env::var("HABITGRID_TOKEN") {
            config.token = Some(token);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = std::env::temp_dir().join("habitgrid-config-missing");
        let config = Config::load(Some(dir)).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.token.is_none());
    }

    #[test]
    fn reads_config_file() {
        let dir = std::env::temp_dir().join("habitgrid-config-file");
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join(CONFIG_FILE_NAME),
            r#"{"base_url":"http://tracker.local/api","token":"t0k3n"}"#,
        )
        .unwrap();
        let config = Config::load(Some(dir)).unwrap();
        assert_eq!(config.base_url, "http://tracker.local/api");
        assert_eq!(config.token.as_deref(), Some("t0k3n"));
    }
}
