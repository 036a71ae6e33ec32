//! Flat-file datastore: the whole dataset lives in one JSON document that
//! is read and rewritten wholesale.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::auth::repo_types::User;
use crate::comprobantes::model::Comprobante;
use crate::productos::repo_types::Producto;

/// The persisted document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Database {
    #[serde(default)]
    pub usuarios: Vec<User>,
    #[serde(default)]
    pub productos: Vec<Producto>,
    #[serde(default)]
    pub comprobantes: Vec<Comprobante>,
}

/// Next integer id for a collection: max existing id + 1, or 1 when empty.
pub fn next_id(ids: impl Iterator<Item = u64>) -> u64 {
    ids.max().map_or(1, |max| max + 1)
}

pub struct JsonStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the document. A missing or unparseable file yields the empty default.
    pub async fn read(&self) -> Database {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::NotFound => return Database::default(),
            Err(e) => {
                warn!(error = %e, path = %self.path.display(), "store unreadable; using empty dataset");
                return Database::default();
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(db) => db,
            Err(e) => {
                warn!(error = %e, path = %self.path.display(), "store unparseable; using empty dataset");
                Database::default()
            }
        }
    }

    /// Overwrite the document. Goes through a temp file + rename so readers
    /// never observe a half-written file.
    pub async fn write(&self, db: &Database) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(db).context("serialize store")?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("create store dir {}", parent.display()))?;
        }
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .with_context(|| format!("write {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("replace {}", self.path.display()))?;
        debug!(path = %self.path.display(), "store written");
        Ok(())
    }

    /// Read, mutate and write back under the store lock. Nothing is written
    /// when `f` returns an error.
    pub async fn update<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Database) -> Result<T, E>,
        E: From<anyhow::Error>,
    {
        let _guard = self.write_lock.lock().await;
        let mut db = self.read().await;
        let out = f(&mut db)?;
        self.write(&db).await?;
        Ok(out)
    }
}
