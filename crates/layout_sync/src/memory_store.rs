//! In-memory widget store implementation.
//!
//! `MemoryWidgetStore` keeps each directory's widget list in a `HashMap`
//! behind an `RwLock`. It is meant for tests and development: nothing
//! survives a restart.
//!
//! # Test hooks
//!
//! - an optional artificial latency applied before every call, so concurrent
//!   sessions actually interleave
//! - an injectable failure returned by writes until cleared
//! - per-operation call counters

use grid_model::{DirectoryId, Widget};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use crate::storage::{StorageError, StorageResult, WidgetStore};

/// In-memory implementation of `WidgetStore`
#[derive(Default)]
pub struct MemoryWidgetStore {
    /// Widget lists keyed by directory
    directories: RwLock<HashMap<DirectoryId, Vec<Widget>>>,
    /// Delay applied to every call
    latency: Option<Duration>,
    /// Error returned by writes while set
    write_failure: RwLock<Option<StorageError>>,
    fetch_calls: AtomicUsize,
    persist_calls: AtomicUsize,
    append_calls: AtomicUsize,
}

impl MemoryWidgetStore {
    /// Create a new empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that waits `latency` before serving each call
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..Self::default()
        }
    }

    /// Create (or replace) a directory document
    pub fn insert_directory(&self, directory_id: DirectoryId, widgets: Vec<Widget>) {
        self.directories
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(directory_id, widgets);
    }

    /// Current stored widgets of a directory
    pub fn widgets(&self, directory_id: &DirectoryId) -> Option<Vec<Widget>> {
        self.directories
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(directory_id)
            .cloned()
    }

    /// Make every subsequent write fail with `error` (or succeed again with `None`)
    pub fn set_write_failure(&self, error: Option<StorageError>) {
        *self
            .write_failure
            .write()
            .unwrap_or_else(PoisonError::into_inner) = error;
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn persist_calls(&self) -> usize {
        self.persist_calls.load(Ordering::SeqCst)
    }

    pub fn append_calls(&self) -> usize {
        self.append_calls.load(Ordering::SeqCst)
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }

    fn check_write(&self) -> StorageResult<()> {
        match self
            .write_failure
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

impl WidgetStore for MemoryWidgetStore {
    async fn fetch_directory_widgets(
        &self,
        directory_id: &DirectoryId,
    ) -> StorageResult<Vec<Widget>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;

        self.widgets(directory_id)
            .ok_or_else(|| StorageError::DirectoryNotFound(directory_id.clone()))
    }

    async fn persist_widget_list(
        &self,
        directory_id: &DirectoryId,
        widgets: &[Widget],
    ) -> StorageResult<()> {
        self.persist_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;
        self.check_write()?;

        self.directories
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(directory_id.clone(), widgets.to_vec());
        Ok(())
    }

    async fn append_widget_atomic(
        &self,
        directory_id: &DirectoryId,
        widget: &Widget,
    ) -> StorageResult<()> {
        self.append_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;
        self.check_write()?;

        // Read-modify-write under one lock acquisition.
        self.directories
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(directory_id.clone())
            .or_default()
            .push(widget.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_model::{WidgetFootprint, WidgetKind};
    use std::sync::Arc;

    fn widget(x: u32) -> Widget {
        Widget::new(WidgetKind::Notes, WidgetFootprint::new(x, 0, 4, 3))
    }

    #[tokio::test]
    async fn test_fetch_missing_directory() {
        let store = MemoryWidgetStore::new();
        let err = store
            .fetch_directory_widgets(&DirectoryId::from("nope"))
            .await
            .unwrap_err();
        assert_eq!(err, StorageError::DirectoryNotFound(DirectoryId::from("nope")));
        assert_eq!(store.fetch_calls(), 1);
    }

    #[tokio::test]
    async fn test_persist_overwrites() {
        let store = MemoryWidgetStore::new();
        let dir = DirectoryId::from("d");
        store.insert_directory(dir.clone(), vec![widget(0), widget(4)]);

        store.persist_widget_list(&dir, &[widget(8)]).await.unwrap();
        let stored = store.fetch_directory_widgets(&dir).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].footprint.x, 8);
    }

    #[tokio::test]
    async fn test_write_failure_injection() {
        let store = MemoryWidgetStore::new();
        let dir = DirectoryId::from("d");
        store.insert_directory(dir.clone(), Vec::new());
        store.set_write_failure(Some(StorageError::Unavailable("offline".to_string())));

        assert!(store.append_widget_atomic(&dir, &widget(0)).await.is_err());
        assert!(store.persist_widget_list(&dir, &[widget(0)]).await.is_err());
        assert_eq!(store.widgets(&dir), Some(Vec::new()));

        store.set_write_failure(None);
        store.append_widget_atomic(&dir, &widget(0)).await.unwrap();
        assert_eq!(store.widgets(&dir).unwrap().len(), 1);
        assert_eq!(store.append_calls(), 2);
        assert_eq!(store.persist_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_appends_all_land() {
        let store = Arc::new(MemoryWidgetStore::with_latency(Duration::from_millis(50)));
        let dir = DirectoryId::from("d");
        store.insert_directory(dir.clone(), Vec::new());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                let dir = dir.clone();
                tokio::spawn(async move { store.append_widget_atomic(&dir, &widget(i)).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(store.widgets(&dir).unwrap().len(), 8);
    }
}
