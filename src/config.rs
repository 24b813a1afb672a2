use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Identity configuration for the portfolio page.
///
/// Everything that ties the page to one person lives here instead of being
/// embedded in the pipeline: the GitHub login the projects are fetched for
/// and the contact identifiers the renderer displays.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct PortfolioConfig {
    pub version: u32,
    /// GitHub login whose public repositories populate the project grid.
    pub username: String,
    pub contact_email: String,
    /// Label -> URL pairs rendered as contact links.
    #[serde(default)]
    pub social_links: HashMap<String, String>,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            version: 1,
            username: String::new(),
            contact_email: String::new(),
            social_links: HashMap::new(),
        }
    }
}

pub fn get_default_config_path() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("", "", "gitfolio")
        .context("Failed to determine project directories")?;

    let config_dir = proj_dirs.config_dir();
    Ok(config_dir.join("gitfolio.toml"))
}

impl PortfolioConfig {
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let path = match config_path {
            Some(p) => p,
            None => get_default_config_path()?,
        };

        if !path.exists() {
            let default_config = PortfolioConfig::default();
            // Create directory if it doesn't exist
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .context("Failed to create config directory")?;
            }
            default_config.save(&path)?;
            return Ok(default_config);
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: PortfolioConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .context("Failed to serialize config to TOML")?;

        fs::write(&path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// The fetcher expects a fixed, non-empty login; a freshly created
    /// default config fails this until the deployer fills it in.
    pub fn validate(&self) -> Result<()> {
        if self.username.trim().is_empty() {
            bail!("username must not be empty");
        }
        Ok(())
    }
}
