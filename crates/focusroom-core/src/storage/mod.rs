mod config;
pub mod database;

pub use config::{Config, ReportConfig, TimerConfig};
pub use database::Database;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::error::{CoreError, StorageError};
use crate::session::Session;

/// Append-only log of finished sessions.
///
/// `append` must be durable before it returns `Ok`. `load_all` returns a
/// consistent snapshot in no particular order.
pub trait SessionStore: Send {
    fn append(&self, session: &Session) -> Result<(), StorageError>;
    fn load_all(&self) -> Result<Vec<Session>, StorageError>;
}

impl<S: SessionStore + ?Sized> SessionStore for Box<S> {
    fn append(&self, session: &Session) -> Result<(), StorageError> {
        (**self).append(session)
    }

    fn load_all(&self) -> Result<Vec<Session>, StorageError> {
        (**self).load_all()
    }
}

/// In-memory session log. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    sessions: Arc<Mutex<Vec<Session>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStore for MemoryStore {
    fn append(&self, session: &Session) -> Result<(), StorageError> {
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        sessions.push(session.clone());
        Ok(())
    }

    fn load_all(&self) -> Result<Vec<Session>, StorageError> {
        let sessions = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Ok(sessions.clone())
    }
}

/// Returns the data directory.
///
/// `FOCUSROOM_DATA_DIR` wins when set. Otherwise `~/.config/focusroom[-dev]/`,
/// with `FOCUSROOM_ENV=dev` selecting the development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, CoreError> {
    let dir = match std::env::var_os("FOCUSROOM_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("FOCUSROOM_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("focusroom-dev")
            } else {
                base_dir.join("focusroom")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
