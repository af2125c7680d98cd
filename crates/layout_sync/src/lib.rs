//! Layout Sync - Directory grid sessions backed by a document store
//!
//! This crate bridges interactive grid edits and persisted layout state:
//!
//! - `synchronizer`: the per-directory session (`LayoutSynchronizer`), its
//!   state machine, edit operations and presentation event handlers
//! - `storage`: the `WidgetStore` contract consumed from the document store
//! - `memory_store`: an in-memory `WidgetStore` for tests and development
//! - `debounce`: trailing-edge debouncing of full-list writes
//! - `presentation`: translation to and from the UI's layout item format
//! - `notify`: user-facing notifications for failed saves
//! - `config` / `context`: injected session configuration
//! - `telemetry`: tracing subscriber setup
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use grid_model::{DirectoryId, WidgetKind};
//! use layout_sync::{LayoutSynchronizer, MemoryWidgetStore, SessionContext, SyncConfig, TracingNotifier};
//!
//! let store = Arc::new(MemoryWidgetStore::new());
//! store.insert_directory(DirectoryId::from("inbox"), Vec::new());
//!
//! let mut session = LayoutSynchronizer::new(
//!     DirectoryId::from("inbox"),
//!     store,
//!     Arc::new(TracingNotifier),
//!     SyncConfig::default(),
//!     SessionContext::default(),
//! );
//! session.load().await?;
//! let widget = session.add_widget(WidgetKind::Tasks, None, Default::default()).await?;
//! ```

pub mod config;
pub mod context;
pub mod debounce;
pub mod error;
pub mod memory_store;
pub mod notify;
pub mod presentation;
pub mod storage;
pub mod synchronizer;
pub mod telemetry;

pub use config::{OverlapPolicy, SyncConfig};
pub use context::{SessionContext, Theme};
pub use debounce::PersistDebouncer;
pub use error::{ConfigError, SyncError, SyncResult};
pub use memory_store::MemoryWidgetStore;
pub use notify::{Notification, NotificationLevel, Notifier, RecordingNotifier, TracingNotifier};
pub use presentation::{layout_items, LayoutItem};
pub use storage::{StorageError, StorageResult, WidgetStore};
pub use synchronizer::{LayoutSynchronizer, SyncState, SyncStatus};
pub use telemetry::init_tracing;
