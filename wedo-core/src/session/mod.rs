//! Authenticated session gate.
//!
//! A session is either anonymous or holds the organizer's id token. It is
//! persisted between runs at `<config dir>/session.toml` and removed on logout.

mod login;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{config_dir, AuthConfig};
use crate::error::{WeDoError, WeDoResult};

pub use login::{decode_claims, IdTokenClaims};

/// Token material for a logged-in organizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    /// Subject of the id token; doubles as the organizer id invitees respond against.
    pub sub: String,
    pub id_token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum SessionState {
    #[default]
    Anonymous,
    Authenticated(Credentials),
}

pub struct Session {
    path: Option<PathBuf>,
    state: SessionState,
}

impl Session {
    /// A session that is never written to disk.
    pub fn in_memory(state: SessionState) -> Self {
        Session { path: None, state }
    }

    pub fn session_path() -> WeDoResult<PathBuf> {
        Ok(config_dir()?.join("session.toml"))
    }

    /// Load the persisted session; a missing file means anonymous.
    pub fn load() -> WeDoResult<Self> {
        Self::load_from(Self::session_path()?)
    }

    pub fn load_from(path: PathBuf) -> WeDoResult<Self> {
        if !path.exists() {
            return Ok(Session {
                path: Some(path),
                state: SessionState::Anonymous,
            });
        }

        let contents = std::fs::read_to_string(&path)?;

        // An unreadable file counts as logged out; `logout` still removes it
        let state = match toml::from_str::<Credentials>(&contents) {
            Ok(credentials) => SessionState::Authenticated(credentials),
            Err(e) => {
                log::warn!(
                    "Ignoring unreadable session at {}: {e}",
                    path.display()
                );
                SessionState::Anonymous
            }
        };

        Ok(Session {
            path: Some(path),
            state,
        })
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated_at(Utc::now())
    }

    /// Authenticated and the id token has not expired at `now`.
    pub fn is_authenticated_at(&self, now: DateTime<Utc>) -> bool {
        match &self.state {
            SessionState::Authenticated(creds) => now < creds.expires_at,
            SessionState::Anonymous => false,
        }
    }

    /// The bearer token for API calls. Fails when not logged in or expired.
    pub fn id_token(&self) -> WeDoResult<&str> {
        match &self.state {
            SessionState::Authenticated(creds) if self.is_authenticated() => Ok(creds.id_token.as_str()),
            _ => Err(WeDoError::NotAuthenticated),
        }
    }

    pub fn sub(&self) -> Option<&str> {
        match &self.state {
            SessionState::Authenticated(creds) => Some(&creds.sub),
            SessionState::Anonymous => None,
        }
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        match &self.state {
            SessionState::Authenticated(creds) => Some(creds.expires_at),
            SessionState::Anonymous => None,
        }
    }

    /// Run the browser login flow and become authenticated.
    pub async fn login(&mut self, auth: &AuthConfig) -> WeDoResult<()> {
        auth.ensure_configured()?;
        let credentials = login::authorize(auth).await?;
        self.authenticate(credentials)
    }

    /// Store credentials and transition to authenticated.
    pub fn authenticate(&mut self, credentials: Credentials) -> WeDoResult<()> {
        if let Some(path) = &self.path {
            save(path, &credentials)?;
        }
        log::info!("Logged in as {}", credentials.sub);
        self.state = SessionState::Authenticated(credentials);
        Ok(())
    }

    /// Drop the token and forget the persisted session.
    pub fn logout(&mut self) -> WeDoResult<()> {
        if let Some(path) = &self.path {
            if path.exists() {
                std::fs::remove_file(path)?;
            }
        }
        self.state = SessionState::Anonymous;
        Ok(())
    }
}

fn save(path: &Path, credentials: &Credentials) -> WeDoResult<()> {
    let contents = toml::to_string_pretty(credentials)
        .map_err(|e| WeDoError::Auth(format!("Failed to serialize session: {e}")))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(path, contents)?;

    // Owner-only: the file holds a bearer token
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    }

    Ok(())
}
