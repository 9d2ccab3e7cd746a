use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_GRAPH_API_URL: &str = "https://graph.microsoft.com/v1.0";
pub const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com";

/// Optional on-disk settings, same keys as the environment in snake_case.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct FileConfig {
    pub tenant_id: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub authority: Option<String>,
    pub user_email: Option<String>,
    pub graph_api_url: Option<String>,
    pub page_size: Option<u32>,
    pub max_pages: Option<u32>,
}

#[derive(Clone)]
pub struct Config {
    pub client_id: String,
    /// May still be filled from the keyring later.
    pub client_secret: Option<String>,
    pub authority: String,
    pub user_email: String,
    pub graph_api_url: String,
    pub page_size: Option<u32>,
    pub max_pages: Option<u32>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "***"))
            .field("authority", &self.authority)
            .field("user_email", &self.user_email)
            .field("graph_api_url", &self.graph_api_url)
            .field("page_size", &self.page_size)
            .field("max_pages", &self.max_pages)
            .finish()
    }
}

fn config_dir() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .ok_or_else(|| anyhow!("no config dir available"))?
        .join("graph_mail_client"))
}

pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Reads the TOML config file; a missing file is an empty config.
pub fn read_file_config(path: &Path) -> Result<FileConfig> {
    if !path.exists() {
        return Ok(FileConfig::default());
    }
    let s = fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    let cfg: FileConfig =
        toml::from_str(&s).with_context(|| format!("parsing config file {}", path.display()))?;
    Ok(cfg)
}

/// Config file values overridden by the process environment. Callers load
/// `.env` into the environment beforehand.
pub fn load_config() -> Result<Config> {
    let file = match config_path() {
        Ok(path) => read_file_config(&path)?,
        Err(e) => {
            log::debug!("skipping config file: {e}");
            FileConfig::default()
        }
    };
    Config::resolve(file, |key| std::env::var(key).ok())
}

impl Config {
    pub fn resolve(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        // Blank values count as unset, wherever they come from.
        let non_blank =
            |v: Option<String>| v.map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let pick = |key: &str, fallback: Option<String>| {
            non_blank(env(key)).or_else(|| non_blank(fallback))
        };
        let pick_u32 = |key: &str, fallback: Option<u32>| -> Result<Option<u32>> {
            match pick(key, None) {
                Some(v) => v.parse::<u32>().map(Some).with_context(|| {
                    format!("{key} must be a non-negative integer (0 = no limit), got '{v}'")
                }),
                None => Ok(fallback),
            }
        };

        let tenant_id = pick("TENANT_ID", file.tenant_id);
        let client_id = pick("CLIENT_ID", file.client_id);
        let client_secret = pick("CLIENT_SECRET", file.client_secret);
        let authority = pick("AUTHORITY", file.authority);
        let user_email = pick("USER_EMAIL", file.user_email);
        let graph_api_url = pick("GRAPH_API_URL", file.graph_api_url)
            .unwrap_or_else(|| DEFAULT_GRAPH_API_URL.to_string());
        let page_size = pick_u32("PAGE_SIZE", file.page_size)?;
        let max_pages = pick_u32("MAX_PAGES", file.max_pages)?;

        let mut missing = Vec::new();
        if client_id.is_none() {
            missing.push("CLIENT_ID");
        }
        if user_email.is_none() {
            missing.push("USER_EMAIL");
        }
        if authority.is_none() && tenant_id.is_none() {
            missing.push("AUTHORITY or TENANT_ID");
        }
        if !missing.is_empty() {
            return Err(anyhow!(
                "missing required configuration: {}",
                missing.join(", ")
            ));
        }

        let authority = match authority {
            Some(a) => a.trim_end_matches('/').to_string(),
            None => format!(
                "{DEFAULT_AUTHORITY_HOST}/{}",
                tenant_id.as_deref().unwrap_or_default()
            ),
        };

        Ok(Self {
            client_id: client_id.unwrap_or_default(),
            client_secret,
            authority,
            user_email: user_email.unwrap_or_default(),
            graph_api_url,
            page_size,
            max_pages,
        })
    }
}
