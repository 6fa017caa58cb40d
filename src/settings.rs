//! Runtime settings
//!
//! Resolved once at startup from CLI flags and the environment, then used
//! to build the store, the AI service and the team roster that the router
//! shares. Nothing here reads the environment on its own: clap has
//! already merged `TERMBOOK_*` and `GOOGLE_API_KEY` into the values.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::ai::gemini::DEFAULT_MODEL;
use crate::ai::{AiService, GeminiClient};
use crate::store::{StoreError, TermStore, DEFAULT_MAX_BACKUPS};
use crate::web::team::{default_roster, load_roster, TeamError, TeamMember};

/// Default glossary file, relative to the working directory
pub const DEFAULT_GLOSSARY_PATH: &str = "glossary.txt";

/// Environment variable holding the Gemini API key
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Path is not valid UTF-8: {0}")]
    InvalidPathEncoding(PathBuf),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Team(#[from] TeamError),
}

/// Expands a leading `~` in `path`.
///
/// # Errors
///
/// Returns `SettingsError::InvalidPathEncoding` for non-UTF-8 paths.
pub fn expand_path(path: &Path) -> Result<PathBuf, SettingsError> {
    let raw = path
        .to_str()
        .ok_or_else(|| SettingsError::InvalidPathEncoding(path.to_path_buf()))?;
    Ok(PathBuf::from(shellexpand::tilde(raw).as_ref()))
}

/// Glossary location and backup policy, shared by every command
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreSettings {
    pub glossary_path: PathBuf,
    /// Backups kept after each write; 0 disables them
    pub max_backups: usize,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            glossary_path: PathBuf::from(DEFAULT_GLOSSARY_PATH),
            max_backups: DEFAULT_MAX_BACKUPS,
        }
    }
}

impl StoreSettings {
    /// Opens the store with the glossary path tilde-expanded.
    pub fn open_store(&self) -> Result<TermStore, SettingsError> {
        let path = expand_path(&self.glossary_path)?;
        Ok(TermStore::new(path, self.max_backups)?)
    }
}

/// Everything the `serve` command needs
#[derive(Clone, Debug)]
pub struct ServeSettings {
    pub store: StoreSettings,
    pub host: String,
    pub port: u16,
    /// Directory served under `/assets`
    pub assets_dir: Option<PathBuf>,
    /// JSON roster; the built-in roster is used when absent
    pub team_file: Option<PathBuf>,
    pub model: String,
    pub api_key: Option<String>,
}

impl Default for ServeSettings {
    fn default() -> Self {
        Self {
            store: StoreSettings::default(),
            host: "127.0.0.1".to_string(),
            port: 5000,
            assets_dir: None,
            team_file: None,
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
        }
    }
}

impl ServeSettings {
    /// `host:port`, resolved by the listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Builds the AI service.
    ///
    /// A missing or unusable key does not fail startup; the service is
    /// created without a client and the AI page reports why.
    pub fn ai_service(&self) -> AiService {
        let key = self.api_key.as_deref().map(str::trim).unwrap_or("");
        if key.is_empty() {
            warn!("{} is not set, the AI page is disabled", API_KEY_ENV);
            return AiService::unavailable(format!("{} is not set", API_KEY_ENV));
        }

        match GeminiClient::new(key, &self.model) {
            Ok(client) => {
                info!(model = %self.model, "AI client ready");
                AiService::new(Arc::new(client))
            }
            Err(e) => {
                warn!("AI client could not be created: {}", e);
                AiService::unavailable(e.to_string())
            }
        }
    }

    /// Team roster from `team_file`, or the built-in one.
    pub fn team(&self) -> Result<Vec<TeamMember>, SettingsError> {
        match &self.team_file {
            Some(path) => {
                let roster = load_roster(&expand_path(path)?)?;
                info!(members = roster.len(), path = %path.display(), "team roster loaded");
                Ok(roster)
            }
            None => Ok(default_roster()),
        }
    }

    pub fn assets_dir(&self) -> Result<Option<PathBuf>, SettingsError> {
        self.assets_dir.as_deref().map(expand_path).transpose()
    }
}
