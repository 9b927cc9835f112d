//! On-disk ballot snapshots, one `<ballot-id>.ballot` file per ballot.

use crate::error::RpcError;
use ballot_engine::BallotEngine;
use ballot_types::BallotId;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const EXTENSION: &str = "ballot";

#[derive(Debug, Clone)]
pub struct StateDir {
    path: PathBuf,
}

impl StateDir {
    /// Open (creating if needed) a state directory.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, RpcError> {
        let path = path.into();
        fs::create_dir_all(&path)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn ballot_path(&self, id: &BallotId) -> PathBuf {
        self.path.join(format!("{id}.{EXTENSION}"))
    }

    /// Load every snapshot in the directory. Files that are not named after a
    /// ballot id are skipped; a corrupt snapshot is an error.
    pub fn load_all(&self) -> Result<Vec<(BallotId, BallotEngine)>, RpcError> {
        let mut loaded = Vec::new();
        for entry in fs::read_dir(&self.path)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            let Some(id) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| s.parse::<BallotId>().ok())
            else {
                warn!(path = %path.display(), "skipping snapshot with unrecognised name");
                continue;
            };
            let bytes = fs::read(&path)?;
            let engine = BallotEngine::load_state(&bytes).map_err(|e| {
                RpcError::Storage(format!("{}: {e}", path.display()))
            })?;
            debug!(ballot = %id, "loaded snapshot");
            loaded.push((id, engine));
        }
        Ok(loaded)
    }

    /// Write a snapshot atomically: temp file first, then rename over the old one.
    pub async fn save(&self, id: &BallotId, bytes: Vec<u8>) -> Result<(), RpcError> {
        let target = self.ballot_path(id);
        let tmp = target.with_extension(format!("{EXTENSION}.tmp"));
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &target).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ballot_types::{ProposalName, VoterId};

    fn engine() -> BallotEngine {
        let names = ["A", "B"].map(|n| ProposalName::new(n).unwrap());
        let mut engine = BallotEngine::new(names, VoterId::new([1; 20])).unwrap();
        engine.vote(&VoterId::new([1; 20]), 1).unwrap();
        engine
    }

    #[tokio::test]
    async fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let state = StateDir::open(dir.path()).unwrap();
        let id = BallotId::new([7; 20]);
        state.save(&id, engine().save_state().unwrap()).await.unwrap();

        let loaded = state.load_all().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].0, id);
        assert_eq!(loaded[0].1.snapshot(), engine().snapshot());
    }

    #[tokio::test]
    async fn foreign_files_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes.txt"), b"hello").unwrap();
        fs::write(dir.path().join("junk.ballot"), b"hello").unwrap();
        let state = StateDir::open(dir.path()).unwrap();
        assert!(state.load_all().unwrap().is_empty());
    }

    #[test]
    fn corrupt_snapshot_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let state = StateDir::open(dir.path()).unwrap();
        fs::write(state.ballot_path(&BallotId::new([7; 20])), b"garbage").unwrap();
        assert!(matches!(state.load_all(), Err(RpcError::Storage(_))));
    }
}
