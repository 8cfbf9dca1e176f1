use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use crate::client::api::JobsClient;
use crate::client::ClientError;

/// Where the admin marker lives between runs. No client-side expiry; the
/// server rejects the token once it lapses.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Option<String>, ClientError>;
    fn save(&self, token: &str) -> Result<(), ClientError>;
    fn clear(&self) -> Result<(), ClientError>;
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    token: Mutex<Option<String>>,
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<String>, ClientError> {
        Ok(self.token.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }

    fn save(&self, token: &str) -> Result<(), ClientError> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), ClientError> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

/// Keeps the token in a single file.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<String>, ClientError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, token: &str) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, token)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), ClientError> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// Screens of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    JobList,
    JobDetail(i64),
    Login,
    Admin,
    PostJob,
    UpdateJob(i64),
}

impl View {
    pub fn requires_admin(self) -> bool {
        matches!(self, View::Admin | View::PostJob | View::UpdateJob(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Render(View),
    RedirectToLogin,
}

pub struct AccessGate<S: SessionStore> {
    store: S,
}

impl<S: SessionStore> AccessGate<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn token(&self) -> Result<Option<String>, ClientError> {
        self.store.load()
    }

    pub fn is_authenticated(&self) -> Result<bool, ClientError> {
        Ok(self.store.load()?.is_some())
    }

    /// Protected views redirect to login when no token is stored.
    pub fn guard(&self, view: View) -> Result<Access, ClientError> {
        if view.requires_admin() && !self.is_authenticated()? {
            return Ok(Access::RedirectToLogin);
        }
        Ok(Access::Render(view))
    }

    /// Exchanges credentials for a token, stores it and hands it to `client`.
    /// A rejected login leaves any previous session untouched.
    pub async fn login(
        &self,
        client: &mut JobsClient,
        username: &str,
        password: &str,
    ) -> Result<(), ClientError> {
        let issued = client.login(username, password).await?;
        self.store.save(&issued.token)?;
        client.set_token(Some(issued.token));
        Ok(())
    }

    /// Restores a stored token into `client`, e.g. at start-up.
    pub fn restore(&self, client: &mut JobsClient) -> Result<bool, ClientError> {
        let token = self.store.load()?;
        let found = token.is_some();
        client.set_token(token);
        Ok(found)
    }

    pub fn logout(&self, client: &mut JobsClient) -> Result<(), ClientError> {
        self.store.clear()?;
        client.set_token(None);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protected_views_redirect_without_a_token() {
        let gate = AccessGate::new(MemorySessionStore::default());
        assert_eq!(gate.guard(View::Admin).unwrap(), Access::RedirectToLogin);
        assert_eq!(gate.guard(View::UpdateJob(3)).unwrap(), Access::RedirectToLogin);
        assert_eq!(gate.guard(View::JobDetail(3)).unwrap(), Access::Render(View::JobDetail(3)));
        assert_eq!(gate.guard(View::Login).unwrap(), Access::Render(View::Login));
    }

    #[test]
    fn stored_token_opens_protected_views_until_logout() {
        let gate = AccessGate::new(MemorySessionStore::default());
        gate.store.save("token").unwrap();
        assert_eq!(gate.guard(View::PostJob).unwrap(), Access::Render(View::PostJob));

        let mut client = JobsClient::with_http(reqwest::Client::new(), "http://localhost");
        assert!(gate.restore(&mut client).unwrap());
        assert_eq!(client.token(), Some("token"));

        gate.logout(&mut client).unwrap();
        assert_eq!(client.token(), None);
        assert!(!gate.is_authenticated().unwrap());
    }

    #[test]
    fn memory_store_survives_a_poisoned_lock() {
        let store = std::sync::Arc::new(MemorySessionStore::default());
        let poisoner = store.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.token.lock().unwrap();
            panic!("poison the session lock");
        })
        .join();
        assert!(store.token.is_poisoned());

        store.save("after-panic").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("after-panic"));
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn file_store_persists_between_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session").join("token");

        let store = FileSessionStore::new(&path);
        assert_eq!(store.load().unwrap(), None);
        store.save("abc.def.ghi").unwrap();

        let reopened = FileSessionStore::new(&path);
        assert_eq!(reopened.load().unwrap().as_deref(), Some("abc.def.ghi"));
        reopened.clear().unwrap();
        reopened.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }
}
