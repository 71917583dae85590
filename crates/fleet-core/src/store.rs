//! Durable client-side key-value state using redb.
//!
//! Holds exactly three things: the bearer token, the organization slug, and
//! the ordered list of dismissed incident ids. Presence of the token key is
//! the sole authentication gate for protected surfaces.

use std::path::Path;

use redb::{Database, TableDefinition};

use crate::credential::{Credential, DEFAULT_ORG};
use crate::error::{FleetError, Result};

// ---------------------------------------------------------------------------
// Table definition
// ---------------------------------------------------------------------------

/// Key: well-known string. Value: UTF-8 string (JSON for the dismissal list).
const CONSOLE_KV: TableDefinition<&str, &str> = TableDefinition::new("console_kv");

const TOKEN_KEY: &str = "token";
const ORG_KEY: &str = "org_slug";
const DISMISSED_KEY: &str = "dismissed_incidents";

/// Most-recent dismissed incident ids retained; the oldest is evicted first.
pub const DISMISSED_CAP: usize = 20;

// ---------------------------------------------------------------------------
// ConsoleStore
// ---------------------------------------------------------------------------

/// Persistent store for the console's durable client-side state.
pub struct ConsoleStore {
    db: Database,
}

impl ConsoleStore {
    /// Open or create the redb database at `path`.
    ///
    /// Creates the parent directory and the table if they don't exist.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path).map_err(|e| FleetError::Store(e.to_string()))?;
        let wt = db
            .begin_write()
            .map_err(|e| FleetError::Store(e.to_string()))?;
        wt.open_table(CONSOLE_KV)
            .map_err(|e| FleetError::Store(e.to_string()))?;
        wt.commit().map_err(|e| FleetError::Store(e.to_string()))?;
        Ok(Self { db })
    }

    // -- credential ---------------------------------------------------------

    /// Persist a credential. Called only by the login flow.
    pub fn set_credential(&self, credential: &Credential) -> Result<()> {
        self.put(TOKEN_KEY, &credential.token)?;
        self.put(ORG_KEY, &credential.org_slug)
    }

    /// The stored credential, or `None` when logged out.
    ///
    /// A missing org slug falls back to `"personal"`.
    pub fn credential(&self) -> Result<Option<Credential>> {
        let Some(token) = self.get(TOKEN_KEY)? else {
            return Ok(None);
        };
        let org_slug = self.get(ORG_KEY)?.unwrap_or_else(|| DEFAULT_ORG.to_string());
        Ok(Some(Credential { token, org_slug }))
    }

    /// Remove the credential. Called only by the logout flow.
    pub fn clear_credential(&self) -> Result<()> {
        self.delete(TOKEN_KEY)?;
        self.delete(ORG_KEY)
    }

    /// Whether a token is present.
    pub fn is_logged_in(&self) -> Result<bool> {
        Ok(self.get(TOKEN_KEY)?.is_some())
    }

    // -- dismissed incidents ------------------------------------------------

    /// Record `id` as dismissed.
    ///
    /// Order-preserving: the id moves to the newest slot if already present.
    /// The list is capped at [`DISMISSED_CAP`], evicting the oldest.
    pub fn dismiss(&self, id: &str) -> Result<()> {
        let mut ids = self.dismissed()?;
        ids.retain(|existing| existing != id);
        ids.push(id.to_string());
        while ids.len() > DISMISSED_CAP {
            ids.remove(0);
        }
        self.put(DISMISSED_KEY, &serde_json::to_string(&ids)?)
    }

    /// The ordered dismissal list, oldest first.
    pub fn dismissed(&self) -> Result<Vec<String>> {
        match self.get(DISMISSED_KEY)? {
            Some(raw) => Ok(serde_json::from_str(&raw).unwrap_or_default()),
            None => Ok(Vec::new()),
        }
    }

    // -- raw kv -------------------------------------------------------------

    fn get(&self, key: &str) -> Result<Option<String>> {
        let rt = self
            .db
            .begin_read()
            .map_err(|e| FleetError::Store(e.to_string()))?;
        let table = rt
            .open_table(CONSOLE_KV)
            .map_err(|e| FleetError::Store(e.to_string()))?;
        let value = table
            .get(key)
            .map_err(|e| FleetError::Store(e.to_string()))?
            .map(|v| v.value().to_string());
        Ok(value)
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        let wt = self
            .db
            .begin_write()
            .map_err(|e| FleetError::Store(e.to_string()))?;
        {
            let mut table = wt
                .open_table(CONSOLE_KV)
                .map_err(|e| FleetError::Store(e.to_string()))?;
            table
                .insert(key, value)
                .map_err(|e| FleetError::Store(e.to_string()))?;
        }
        wt.commit().map_err(|e| FleetError::Store(e.to_string()))
    }

    fn delete(&self, key: &str) -> Result<()> {
        let wt = self
            .db
            .begin_write()
            .map_err(|e| FleetError::Store(e.to_string()))?;
        {
            let mut table = wt
                .open_table(CONSOLE_KV)
                .map_err(|e| FleetError::Store(e.to_string()))?;
            table
                .remove(key)
                .map_err(|e| FleetError::Store(e.to_string()))?;
        }
        wt.commit().map_err(|e| FleetError::Store(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
