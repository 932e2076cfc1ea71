//! Persistence boundary.
//!
//! The editor never talks to a backend directly; it goes through
//! [`PersistenceGateway`]. Implementations here cover the headless cases
//! (tests, CLI); a remote REST/Firestore backend plugs in behind the same
//! trait. All methods are `async fn` but runtime-agnostic: nothing here
//! spawns or requires a specific executor.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::model::MindMapDocument;

/// RAII guard for a live-update subscription. Dropping it (or calling
/// [`WatchHandle::unsubscribe`]) runs the teardown exactly once; sessions
/// tear the previous watch down before resubscribing to another case.
pub struct WatchHandle {
    teardown: Option<Box<dyn FnOnce() + Send>>,
}

impl WatchHandle {
    pub fn new(teardown: impl FnOnce() + Send + 'static) -> Self {
        Self {
            teardown: Some(Box::new(teardown)),
        }
    }

    pub fn unsubscribe(mut self) {
        if let Some(teardown) = self.teardown.take() {
            teardown();
        }
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        if let Some(teardown) = self.teardown.take() {
            teardown();
        }
    }
}

impl std::fmt::Debug for WatchHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchHandle")
            .field("active", &self.teardown.is_some())
            .finish()
    }
}

pub trait PersistenceGateway {
    async fn load(&self, case_id: &str) -> Result<Option<MindMapDocument>>;

    async fn save(&self, case_id: &str, doc: &MindMapDocument) -> Result<()>;

    /// Subscribes to remote updates for a case. Backends without live
    /// updates return `None`.
    fn watch(&self, case_id: &str) -> Option<WatchHandle> {
        let _ = case_id;
        None
    }
}

impl<G: PersistenceGateway + ?Sized> PersistenceGateway for &G {
    async fn load(&self, case_id: &str) -> Result<Option<MindMapDocument>> {
        (**self).load(case_id).await
    }

    async fn save(&self, case_id: &str, doc: &MindMapDocument) -> Result<()> {
        (**self).save(case_id, doc).await
    }

    fn watch(&self, case_id: &str) -> Option<WatchHandle> {
        (**self).watch(case_id)
    }
}

/// In-memory store keyed by case id; the reference backend the original
/// prototype server used.
#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: Mutex<FxHashMap<String, MindMapDocument>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn saved_cases(&self) -> Vec<String> {
        let docs = self.docs.lock().expect("store mutex poisoned");
        docs.keys().cloned().collect()
    }
}

impl PersistenceGateway for MemoryStore {
    async fn load(&self, case_id: &str) -> Result<Option<MindMapDocument>> {
        let docs = self.docs.lock().expect("store mutex poisoned");
        Ok(docs.get(case_id).cloned())
    }

    async fn save(&self, case_id: &str, doc: &MindMapDocument) -> Result<()> {
        let mut docs = self.docs.lock().expect("store mutex poisoned");
        docs.insert(case_id.to_string(), doc.clone());
        Ok(())
    }
}

/// One pretty-printed JSON document per case under a directory. Backs the
/// CLI so sessions survive across invocations.
#[derive(Debug, Clone)]
pub struct FsStore {
    dir: PathBuf,
}

impl FsStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn case_path(&self, case_id: &str) -> Result<PathBuf> {
        if case_id.is_empty()
            || case_id.contains(['/', '\\'])
            || case_id == "."
            || case_id == ".."
        {
            return Err(Error::gateway(
                "store",
                format!("invalid case id: {case_id:?}"),
            ));
        }
        Ok(self.dir.join(format!("{case_id}.json")))
    }
}

impl PersistenceGateway for FsStore {
    async fn load(&self, case_id: &str) -> Result<Option<MindMapDocument>> {
        let path = self.case_path(case_id)?;
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(serde_json::from_str(&text)?))
    }

    async fn save(&self, case_id: &str, doc: &MindMapDocument) -> Result<()> {
        let path = self.case_path(case_id)?;
        std::fs::create_dir_all(&self.dir)?;
        let mut text = serde_json::to_string_pretty(doc)?;
        text.push('\n');
        std::fs::write(&path, text)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Node, NodeKind};
    use futures::executor::block_on;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn doc() -> MindMapDocument {
        MindMapDocument {
            nodes: vec![Node {
                id: "outcome".into(),
                text: "Outcome".into(),
                x: 310.0,
                y: 50.0,
                kind: NodeKind::Outcome,
                year: None,
                is_fixed: true,
            }],
            links: Vec::new(),
            last_updated: None,
        }
    }

    #[test]
    fn memory_store_round_trips() {
        let store = MemoryStore::new();
        assert!(block_on(store.load("grain-exchange")).unwrap().is_none());
        block_on(store.save("grain-exchange", &doc())).unwrap();
        let loaded = block_on(store.load("grain-exchange")).unwrap().unwrap();
        assert_eq!(loaded.nodes.len(), 1);
        assert_eq!(store.saved_cases(), vec!["grain-exchange".to_string()]);
    }

    #[test]
    fn fs_store_round_trips_and_misses_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStore::new(dir.path());
        assert!(block_on(store.load("grain-exchange")).unwrap().is_none());
        block_on(store.save("grain-exchange", &doc())).unwrap();
        let loaded = block_on(store.load("grain-exchange")).unwrap().unwrap();
        assert_eq!(loaded.nodes[0].id, "outcome");
    }

    #[test]
    fn fs_store_rejects_path_like_ids() {
        let store = FsStore::new("unused");
        assert!(block_on(store.load("../etc/passwd")).is_err());
        assert!(block_on(store.save("a/b", &doc())).is_err());
    }

    #[test]
    fn watch_handle_tears_down_exactly_once() {
        let count = Arc::new(AtomicUsize::new(0));

        let c = Arc::clone(&count);
        let handle = WatchHandle::new(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        handle.unsubscribe();
        assert_eq!(count.load(Ordering::SeqCst), 1);

        let c = Arc::clone(&count);
        {
            let _handle = WatchHandle::new(move || {
                c.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }
}
