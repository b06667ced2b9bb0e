//! Tray persistence and the wallet seed file.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use accounts::TrayState;
use async_trait::async_trait;
use keytree::Xprv;
use rand::{CryptoRng, RngCore};
use tracing::debug;

use crate::errors::ClientError;
use crate::services::TrayStore;

/// Keeps the tray state in memory. Used by tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<Option<TrayState>>,
}

impl MemoryStore {
    /// Store that starts out holding `state`.
    pub fn with_state(state: TrayState) -> Self {
        MemoryStore {
            state: Mutex::new(Some(state)),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<TrayState>> {
        // writers replace the whole state, so a poisoned lock still holds a complete one
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl TrayStore for MemoryStore {
    async fn load(&self) -> Result<Option<TrayState>, ClientError> {
        Ok(self.lock().clone())
    }

    async fn store(&self, state: &TrayState) -> Result<(), ClientError> {
        *self.lock() = Some(state.clone());
        Ok(())
    }
}

/// Keeps the tray state in a JSON file. Writes go through a sibling
/// temporary file and a rename, so a crash never leaves a partial file.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }

    /// Location of the state file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TrayStore for JsonFileStore {
    async fn load(&self) -> Result<Option<TrayState>, ClientError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn store(&self, state: &TrayState) -> Result<(), ClientError> {
        let bytes = serde_json::to_vec_pretty(state)?;
        if let Some(dir) = self.path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        debug!(path = %self.path.display(), "stored tray state");
        Ok(())
    }
}

/// Reads a master key from a file holding a hex-encoded 32-byte seed.
pub async fn load_seed(path: &Path) -> Result<Xprv, ClientError> {
    let text = tokio::fs::read_to_string(path).await?;
    let bytes = hex::decode(text.trim()).map_err(|_| ClientError::InvalidSeed)?;
    if bytes.len() != 32 {
        return Err(ClientError::InvalidSeed);
    }
    let mut seed = [0u8; 32];
    seed.copy_from_slice(&bytes);
    Ok(Xprv::from_seed(&seed))
}

/// Writes a fresh random seed to `path` and returns the master key it expands to.
/// Refuses to overwrite an existing seed.
pub async fn create_seed<R: RngCore + CryptoRng>(rng: &mut R, path: &Path) -> Result<Xprv, ClientError> {
    if tokio::fs::metadata(path).await.is_ok() {
        return Err(ClientError::Io(std::io::Error::new(
            ErrorKind::AlreadyExists,
            format!("{} already exists", path.display()),
        )));
    }
    let mut seed = [0u8; 32];
    rng.fill_bytes(&mut seed);
    if let Some(dir) = path.parent() {
        tokio::fs::create_dir_all(dir).await?;
    }
    tokio::fs::write(path, hex::encode(&seed[..])).await?;
    Ok(Xprv::from_seed(&seed))
}

/// Restores the committed tray from the wallet files. A wallet without a
/// state file starts empty at index zero.
pub async fn open_wallet(
    seed_path: &Path,
    store: &impl TrayStore,
    env: &ledger::Environment,
) -> Result<accounts::Tray, ClientError> {
    let root = load_seed(seed_path).await?;
    let state = store.load().await?.unwrap_or_default();
    Ok(accounts::Tray::restore(root, env.clone(), &state)?)
}
