//! Local sign-in against the configured credentials.
//!
//! There is no login endpoint: the same static credentials that authenticate
//! API requests are checked here, and a flag file records a successful login.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::config::Settings;

const AUTHENTICATED: &str = "true";

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("session file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub struct Session {
    path: PathBuf,
    username: String,
    password: String,
}

impl Session {
    pub fn new(settings: &Settings) -> Self {
        Session {
            path: settings.session_path.clone(),
            username: settings.username.clone(),
            password: settings.password.clone(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn login(&self, username: &str, password: &str) -> Result<(), AuthError> {
        if username.trim() != self.username || password != self.password {
            tracing::warn!("rejected login for {}", username.trim());
            return Err(AuthError::InvalidCredentials);
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }
        fs::write(&self.path, AUTHENTICATED).map_err(|source| self.io_error(source))?;
        tracing::info!("logged in as {}", self.username);
        Ok(())
    }

    pub fn logout(&self) -> Result<(), AuthError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(self.io_error(source)),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        fs::read_to_string(&self.path)
            .map(|content| content.trim() == AUTHENTICATED)
            .unwrap_or(false)
    }

    fn io_error(&self, source: std::io::Error) -> AuthError {
        AuthError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
