use super::{SessionId, SessionStore};
use crate::error::StoreError;
use crate::state::FlowState;
use dashmap::DashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// One JSON file per session under a directory
///
/// `set` stages a record in memory; `save` writes it to `<dir>/<id>.json`
/// through a temporary file and rename.
#[derive(Debug)]
pub struct FileSessionStore {
    dir: PathBuf,
    staged: DashMap<SessionId, FlowState>,
}

impl FileSessionStore {
    /// Open (and create if needed) a store rooted at `dir`
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            staged: DashMap::new(),
        })
    }

    #[inline]
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &SessionId) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    fn read(path: &Path) -> Result<Option<FlowState>, StoreError> {
        match fs::read(path) {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|e| StoreError::Corrupt(format!("{}: {e}", path.display()))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, id: &SessionId) -> Result<Option<FlowState>, StoreError> {
        if let Some(staged) = self.staged.get(id) {
            return Ok(Some(staged.value().clone()));
        }
        Self::read(&self.path_for(id))
    }

    fn set(&self, id: &SessionId, state: &FlowState) -> Result<(), StoreError> {
        self.staged.insert(*id, state.clone());
        Ok(())
    }

    fn delete(&self, id: &SessionId) -> Result<(), StoreError> {
        self.staged.remove(id);
        match fs::remove_file(self.path_for(id)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, id: &SessionId) -> Result<(), StoreError> {
        let Some((_, state)) = self.staged.remove(id) else {
            return Ok(());
        };
        let bytes = serde_json::to_vec(&state)?;
        let path = self.path_for(id);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn purge_idle(&self, now: i64, idle_timeout: i64) -> Result<usize, StoreError> {
        let mut removed = 0;
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let expired = match Self::read(&path) {
                Ok(Some(state)) => state.is_idle(now, idle_timeout),
                Ok(None) => false,
                // unreadable records can never be resumed
                Err(StoreError::Corrupt(_)) => true,
                Err(e) => return Err(e),
            };
            if expired {
                match fs::remove_file(&path) {
                    Ok(()) => removed += 1,
                    Err(e) if e.kind() == ErrorKind::NotFound => {}
                    Err(e) => return Err(e.into()),
                }
            }
        }
        self.staged.retain(|_, state| !state.is_idle(now, idle_timeout));
        Ok(removed)
    }
}
