//! On-disk bearer token.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use tracing::debug;

/// Bearer token persisted between invocations.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// Store backed by the file at `path`, which need not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the token file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored token, `None` when no session exists.
    pub fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read token file {}", self.path.display()))?;
        let token = contents.trim();
        Ok((!token.is_empty()).then(|| token.to_string()))
    }

    /// Writes the token with owner-only permissions.
    pub fn save(&self, token: &str) -> Result<()> {
        ensure_parent(&self.path)?;
        fs::write(&self.path, format!("{}\n", token.trim()))
            .with_context(|| format!("failed to write token file {}", self.path.display()))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))
                .context("failed to set token file permissions")?;
        }
        debug!(path = %self.path.display(), "token saved");
        Ok(())
    }

    /// Removes the token file. Returns whether one existed.
    pub fn clear(&self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        fs::remove_file(&self.path)
            .with_context(|| format!("failed to remove token file {}", self.path.display()))?;
        debug!(path = %self.path.display(), "token removed");
        Ok(true)
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create token directory {}", parent.display()))?;
    }
    Ok(())
}
