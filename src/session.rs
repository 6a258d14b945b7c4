//! Local session flag, stored as a small JSON key-value file so that it
//! survives between CLI invocations.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

use crate::error::SessionError;
use crate::router::Route;

pub const LOGGED_IN_KEY: &str = "isLoggedIn";

#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file means nobody has logged in yet.
    pub fn is_logged_in(&self) -> Result<bool, SessionError> {
        let values = self.read()?;
        Ok(values.get(LOGGED_IN_KEY).map(String::as_str) == Some("true"))
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn log_in(&self) -> Result<(), SessionError> {
        let mut values = self.read()?;
        values.insert(LOGGED_IN_KEY.to_string(), "true".to_string());
        self.write(&values)?;
        info!("Session started");
        Ok(())
    }

    /// Clears the flag and returns where the user should be sent next.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn log_out(&self) -> Result<Route, SessionError> {
        let mut values = self.read()?;
        if values.remove(LOGGED_IN_KEY).is_some() {
            self.write(&values)?;
        }
        info!("Session cleared");
        Ok(Route::Login)
    }

    fn read(&self) -> Result<BTreeMap<String, String>, SessionError> {
        match fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No session file yet");
                Ok(BTreeMap::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, values: &BTreeMap<String, String>) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(values)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> SessionStore {
        SessionStore::new(dir.path().join("nested").join("session.json"))
    }

    #[test]
    fn missing_file_is_logged_out() {
        let dir = TempDir::new().unwrap();
        assert!(!store(&dir).is_logged_in().unwrap());
    }

    #[test]
    fn login_then_logout() {
        let dir = TempDir::new().unwrap();
        let session = store(&dir);

        session.log_in().unwrap();
        assert!(session.is_logged_in().unwrap());
        let stored = fs::read_to_string(session.path()).unwrap();
        assert!(stored.contains("\"isLoggedIn\": \"true\""));

        assert_eq!(session.log_out().unwrap(), Route::Login);
        assert!(!session.is_logged_in().unwrap());
    }

    #[test]
    fn other_keys_survive_logout() {
        let dir = TempDir::new().unwrap();
        let session = store(&dir);
        fs::create_dir_all(session.path().parent().unwrap()).unwrap();
        fs::write(session.path(), r#"{"isLoggedIn":"true","theme":"dark"}"#).unwrap();

        session.log_out().unwrap();
        let stored = fs::read_to_string(session.path()).unwrap();
        assert!(stored.contains("theme"));
        assert!(!stored.contains(LOGGED_IN_KEY));
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let session = store(&dir);
        fs::create_dir_all(session.path().parent().unwrap()).unwrap();
        fs::write(session.path(), "not json").unwrap();
        assert!(matches!(session.is_logged_in(), Err(SessionError::Decode(_))));
    }
}
