//! CLI execution context.

use std::path::PathBuf;

use amcros_app::{App, Session};
use amcros_auth::AuthSession;
use anyhow::{bail, Context as _, Result};
use tokio::sync::OnceCell;

use crate::config::LoadedConfig;
use crate::output::Output;

const SESSION_FILE: &str = "session.json";

/// Execution context for CLI commands.
pub struct Context {
    pub config: LoadedConfig,
    pub output: Output,
    pub cwd: PathBuf,
    app: OnceCell<App>,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;
        let config = LoadedConfig::resolve(config_path, &cwd)?;

        Ok(Self {
            config,
            output,
            cwd,
            app: OnceCell::new(),
        })
    }

    /// Open the store and services on first use.
    pub async fn app(&self) -> Result<&App> {
        self.app
            .get_or_try_init(|| async {
                App::from_config(self.config.config.clone())
                    .await
                    .context("Failed to open the store")
            })
            .await
    }

    fn session_path(&self) -> PathBuf {
        self.config.data_dir().join(SESSION_FILE)
    }

    /// Remember a session for later commands.
    pub fn save_session(&self, session: &Session) -> Result<()> {
        let path = self.session_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(&session.auth)?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write session file: {}", path.display()))
    }

    pub fn clear_session(&self) -> Result<bool> {
        let path = self.session_path();
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).with_context(|| format!("Failed to remove {}", path.display())),
        }
    }

    fn saved_session(&self) -> Result<Option<AuthSession>> {
        let path = self.session_path();
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()))
            }
        };
        let auth = serde_json::from_str(&content)
            .with_context(|| format!("Corrupt session file: {}", path.display()))?;
        Ok(Some(auth))
    }

    /// The saved session, re-hydrated against the store.
    pub async fn session(&self) -> Result<Option<Session>> {
        let Some(auth) = self.saved_session()? else {
            return Ok(None);
        };
        let app = self.app().await?;
        match app.accounts().restore(auth).await {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                tracing::warn!(error = %e, "saved session is no longer valid");
                self.output.debug(&format!("Discarding saved session: {}", e));
                self.clear_session()?;
                Ok(None)
            }
        }
    }

    pub async fn require_session(&self) -> Result<Session> {
        match self.session().await? {
            Some(session) => Ok(session),
            None => bail!("Not signed in. Run `amcros signin` first."),
        }
    }
}
