// --- File: crates/vasool_common/src/session.rs ---
//! The authenticated session of the client.
//!
//! The bearer token is persisted under a fixed key (`authToken` by default)
//! and exposed to the rest of the application through an explicit [`Session`]
//! object. Only the auth collaborator writes or clears it; integration
//! components read it.

use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use tracing::{debug, info};
use vasool_config::SessionConfig;

use crate::error::{auth_error, internal_error, Context, VasoolError};

/// Persistent key/value storage for the session token.
pub trait SessionStore: Send + Sync {
    /// Read the persisted token, if any.
    fn read(&self) -> Result<Option<String>, VasoolError>;

    /// Persist a token, replacing any previous one.
    fn write(&self, token: &str) -> Result<(), VasoolError>;

    /// Remove the persisted token.
    fn clear(&self) -> Result<(), VasoolError>;
}

/// JSON file store: `{"authToken": "...", "isAuthenticated": true}`.
pub struct FileSessionStore {
    path: PathBuf,
    token_key: String,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>, token_key: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            token_key: token_key.into(),
        }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(&config.path, &config.token_key)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<Map<String, Value>, VasoolError> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("reading session file {}", self.path.display()))?;
        if raw.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&raw)? {
            Value::Object(map) => Ok(map),
            _ => Err(internal_error(format!(
                "session file {} is not a JSON object",
                self.path.display()
            ))),
        }
    }

    fn write_map(&self, map: &Map<String, Value>) -> Result<(), VasoolError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).context("creating session directory")?;
        }
        fs::write(&self.path, serde_json::to_vec_pretty(map)?)
            .with_context(|| format!("writing session file {}", self.path.display()))?;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn read(&self) -> Result<Option<String>, VasoolError> {
        let map = self.read_map()?;
        Ok(map
            .get(&self.token_key)
            .and_then(|v| v.as_str())
            .filter(|t| !t.is_empty())
            .map(String::from))
    }

    fn write(&self, token: &str) -> Result<(), VasoolError> {
        let mut map = self.read_map()?;
        map.insert(self.token_key.clone(), Value::String(token.to_string()));
        map.insert("isAuthenticated".to_string(), Value::Bool(true));
        self.write_map(&map)
    }

    fn clear(&self) -> Result<(), VasoolError> {
        let mut map = self.read_map()?;
        map.remove(&self.token_key);
        map.remove("isAuthenticated");
        self.write_map(&map)
    }
}

/// Volatile store, used by tests and embedding hosts.
#[derive(Default)]
pub struct MemorySessionStore {
    token: Mutex<Option<String>>,
}

impl MemorySessionStore {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn read(&self) -> Result<Option<String>, VasoolError> {
        Ok(self
            .token
            .lock()
            .map_err(|_| internal_error("session store lock poisoned"))?
            .clone())
    }

    fn write(&self, token: &str) -> Result<(), VasoolError> {
        *self
            .token
            .lock()
            .map_err(|_| internal_error("session store lock poisoned"))? = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), VasoolError> {
        *self
            .token
            .lock()
            .map_err(|_| internal_error("session store lock poisoned"))? = None;
        Ok(())
    }
}

/// The signed-in session shared by every component.
///
/// The generation counter changes on every sign-in and sign-out so holders of
/// session-scoped data can tell when it went stale.
pub struct Session {
    store: Arc<dyn SessionStore>,
    token: RwLock<Option<String>>,
    generation: AtomicU64,
}

impl Session {
    /// Opens the session, loading a previously persisted token.
    pub fn open(store: Arc<dyn SessionStore>) -> Result<Self, VasoolError> {
        let token = store.read()?;
        debug!("Session opened (authenticated: {})", token.is_some());
        Ok(Self {
            store,
            token: RwLock::new(token),
            generation: AtomicU64::new(0),
        })
    }

    /// A session that starts signed in, backed by memory only.
    pub fn in_memory(token: Option<&str>) -> Self {
        let store: Arc<dyn SessionStore> = match token {
            Some(t) => Arc::new(MemorySessionStore::with_token(t)),
            None => Arc::new(MemorySessionStore::default()),
        };
        Self {
            store,
            token: RwLock::new(token.map(String::from)),
            generation: AtomicU64::new(0),
        }
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().ok().and_then(|t| t.clone())
    }

    /// The token, or an auth error when nobody is signed in.
    pub fn require_token(&self) -> Result<String, VasoolError> {
        self.token().ok_or_else(|| auth_error("Not authenticated"))
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Stores a freshly issued token.
    pub fn sign_in(&self, token: &str) -> Result<(), VasoolError> {
        if token.trim().is_empty() {
            return Err(auth_error("Backend returned an empty token"));
        }
        self.store.write(token)?;
        *self
            .token
            .write()
            .map_err(|_| internal_error("session lock poisoned"))? = Some(token.to_string());
        self.generation.fetch_add(1, Ordering::SeqCst);
        info!("Session signed in");
        Ok(())
    }

    /// Clears the token; every later authenticated call fails with an auth error.
    pub fn sign_out(&self) -> Result<(), VasoolError> {
        self.store.clear()?;
        *self
            .token
            .write()
            .map_err(|_| internal_error("session lock poisoned"))? = None;
        self.generation.fetch_add(1, Ordering::SeqCst);
        info!("Session signed out");
        Ok(())
    }
}
