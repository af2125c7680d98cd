//! Directory grid session.
//!
//! A `LayoutSynchronizer` owns the in-memory layout of one open directory and
//! keeps the document store in step with it:
//!
//! - drag/resize in progress only touch memory
//! - drag-stop, resize-stop and remove schedule a debounced full-list save
//! - add places the widget with the layout engine and appends it atomically
//!
//! Memory is the source of truth for the next write. A failed save is
//! reported through the `Notifier` and recorded in the status, but the edit
//! stays in memory and rides along with the next successful save. Closing the
//! session drops any save still waiting out its debounce.

use crate::config::{OverlapPolicy, SyncConfig};
use crate::context::SessionContext;
use crate::debounce::PersistDebouncer;
use crate::error::{SyncError, SyncResult};
use crate::notify::{Notification, Notifier};
use crate::presentation::{layout_items, LayoutItem};
use crate::storage::{StorageError, StorageResult, WidgetStore};
use chrono::{DateTime, Utc};
use grid_model::{
    fits, DirectoryId, DirectoryLayout, GridBounds, GridError, Widget, WidgetFootprint, WidgetId,
    WidgetKind, WidgetPayload,
};
use layout_engine::find_position;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncState {
    /// Waiting for the initial fetch
    Loading,
    /// Layout in memory, accepting edits
    Ready,
}

/// Snapshot of a session's save state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncStatus {
    pub state: SyncState,
    pub widget_count: usize,
    /// Whether a debounced save is waiting or running
    pub has_pending_save: bool,
    /// Error message from the last failed write, cleared by the next success
    pub last_error: Option<String>,
    /// Time of the last successful write
    pub last_save_time: Option<DateTime<Utc>>,
    /// Successful writes (full-list saves and appends)
    pub saves_committed: u64,
}

/// Outcome bookkeeping shared with the debounce task
#[derive(Default)]
struct SaveHealth {
    last_error: RwLock<Option<String>>,
    last_save_time: RwLock<Option<DateTime<Utc>>>,
    saves_committed: AtomicU64,
}

impl SaveHealth {
    fn record_success(&self) {
        self.saves_committed.fetch_add(1, Ordering::SeqCst);
        *self
            .last_save_time
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(Utc::now());
        *self.last_error.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn record_failure(&self, err: &StorageError) {
        *self.last_error.write().unwrap_or_else(PoisonError::into_inner) = Some(err.to_string());
    }
}

/// State reachable from the session and its pending save task
struct SessionShared<S> {
    directory_id: DirectoryId,
    layout: RwLock<DirectoryLayout>,
    store: Arc<S>,
    notifier: Arc<dyn Notifier>,
    health: SaveHealth,
}

impl<S: WidgetStore> SessionShared<S> {
    fn read_layout(&self) -> RwLockReadGuard<'_, DirectoryLayout> {
        self.layout.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_layout(&self) -> RwLockWriteGuard<'_, DirectoryLayout> {
        self.layout.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Overwrite the stored list with the current in-memory list
    async fn save_widget_list(&self) -> StorageResult<()> {
        let widgets = self.read_layout().widgets().to_vec();
        match self
            .store
            .persist_widget_list(&self.directory_id, &widgets)
            .await
        {
            Ok(()) => {
                self.health.record_success();
                tracing::debug!(
                    directory = %self.directory_id,
                    widgets = widgets.len(),
                    "Saved directory layout"
                );
                Ok(())
            }
            Err(err) => {
                self.report_failure("Couldn't save layout", &err);
                Err(err)
            }
        }
    }

    fn report_failure(&self, title: &str, err: &StorageError) {
        tracing::warn!("{} for directory {}: {}", title, self.directory_id, err);
        self.health.record_failure(err);
        self.notifier
            .notify(Notification::destructive(title, err.to_string()));
    }
}

/// Layout session for one open directory
pub struct LayoutSynchronizer<S: WidgetStore + 'static> {
    config: SyncConfig,
    context: SessionContext,
    state: SyncState,
    shared: Arc<SessionShared<S>>,
    debouncer: PersistDebouncer,
}

impl<S: WidgetStore + 'static> LayoutSynchronizer<S> {
    /// Create a session in the `Loading` state; call [`load`](Self::load) next
    pub fn new(
        directory_id: DirectoryId,
        store: Arc<S>,
        notifier: Arc<dyn Notifier>,
        config: SyncConfig,
        context: SessionContext,
    ) -> Self {
        let layout = DirectoryLayout::new(directory_id.clone(), config.bounds);
        let debouncer = PersistDebouncer::new(config.debounce());
        Self {
            config,
            context,
            state: SyncState::Loading,
            shared: Arc::new(SessionShared {
                directory_id,
                layout: RwLock::new(layout),
                store,
                notifier,
                health: SaveHealth::default(),
            }),
            debouncer,
        }
    }

    pub fn directory_id(&self) -> &DirectoryId {
        &self.shared.directory_id
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn bounds(&self) -> GridBounds {
        self.config.bounds
    }

    /// Current in-memory widgets, in insertion order
    pub fn widgets(&self) -> Vec<Widget> {
        self.shared.read_layout().widgets().to_vec()
    }

    /// Copy of the current in-memory layout
    pub fn layout(&self) -> DirectoryLayout {
        self.shared.read_layout().clone()
    }

    /// Widgets in the grid UI's item format, with the size floor attached
    pub fn layout_items(&self) -> Vec<LayoutItem> {
        layout_items(self.shared.read_layout().widgets(), &self.config.constraints)
    }

    pub fn status(&self) -> SyncStatus {
        let health = &self.shared.health;
        SyncStatus {
            state: self.state,
            widget_count: self.shared.read_layout().len(),
            has_pending_save: self.debouncer.is_pending(),
            last_error: health
                .last_error
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .clone(),
            last_save_time: *health
                .last_save_time
                .read()
                .unwrap_or_else(PoisonError::into_inner),
            saves_committed: health.saves_committed.load(Ordering::SeqCst),
        }
    }

    // ========== Loading ==========

    /// Fetch the directory's widgets and enter `Ready`.
    ///
    /// On failure the user is notified and the session stays as it was.
    pub async fn load(&mut self) -> SyncResult<DirectoryLayout> {
        let fetched = self
            .shared
            .store
            .fetch_directory_widgets(&self.shared.directory_id)
            .await;
        match fetched {
            Ok(widgets) => Ok(self.load_layout(widgets)),
            Err(err) => {
                self.shared.report_failure("Couldn't load directory", &err);
                Err(err.into())
            }
        }
    }

    /// Refresh the in-memory list from the store, picking up other sessions' edits
    pub async fn reload(&mut self) -> SyncResult<DirectoryLayout> {
        tracing::debug!("Reloading directory {}", self.shared.directory_id);
        self.load().await
    }

    /// Replace the in-memory layout with persisted widgets and enter `Ready`.
    ///
    /// Sizes are raised to the floor; positions are trusted and overlaps are
    /// left alone. Repeated ids keep their first occurrence.
    pub fn load_layout(&mut self, persisted: Vec<Widget>) -> DirectoryLayout {
        let (layout, dropped) = DirectoryLayout::from_persisted(
            self.shared.directory_id.clone(),
            self.config.bounds,
            persisted,
            &self.config.constraints,
        );

        if !dropped.is_empty() {
            tracing::warn!(
                "Dropped {} duplicate widget id(s) while loading directory {}: {:?}",
                dropped.len(),
                self.shared.directory_id,
                dropped
            );
        }
        let violations = layout.validate();
        if !violations.is_empty() {
            tracing::debug!(
                "Directory {} loaded with {} layout violation(s): {:?}",
                self.shared.directory_id,
                violations.len(),
                violations
            );
        }

        *self.shared.write_layout() = layout.clone();
        self.state = SyncState::Ready;
        tracing::info!(
            directory = %self.shared.directory_id,
            user = self.context.user_label(),
            widgets = layout.len(),
            "Directory layout ready"
        );
        layout
    }

    fn ensure_ready(&self) -> SyncResult<()> {
        match self.state {
            SyncState::Ready => Ok(()),
            SyncState::Loading => Err(SyncError::NotReady),
        }
    }

    // ========== Edits ==========

    /// Move a widget to the position of `footprint`, keeping its size.
    ///
    /// Memory only; callers decide whether a save follows.
    pub fn apply_drag(
        &mut self,
        id: &WidgetId,
        footprint: WidgetFootprint,
    ) -> SyncResult<WidgetFootprint> {
        self.ensure_ready()?;
        let mut layout = self.shared.write_layout();
        let current = current_footprint(&layout, id)?;
        let candidate = current.with_position(footprint.position());
        enforce_policy(self.config.overlap_policy, &layout, id, &candidate)?;

        let moved = layout.move_widget(id, candidate.position())?;
        tracing::debug!("Moved widget {} to ({}, {})", id, moved.x, moved.y);
        Ok(moved)
    }

    /// Resize a widget to the size of `footprint` (floor re-applied), keeping
    /// its position. Memory only.
    pub fn apply_resize(
        &mut self,
        id: &WidgetId,
        footprint: WidgetFootprint,
    ) -> SyncResult<WidgetFootprint> {
        self.ensure_ready()?;
        let constraints = self.config.constraints;
        let mut layout = self.shared.write_layout();
        let current = current_footprint(&layout, id)?;
        let candidate = constraints.clamp(current.with_size(footprint.w, footprint.h));
        enforce_policy(self.config.overlap_policy, &layout, id, &candidate)?;

        let resized = layout.resize_widget(id, candidate.w, candidate.h, &constraints)?;
        tracing::debug!("Resized widget {} to {}x{}", id, resized.w, resized.h);
        Ok(resized)
    }

    /// Take over geometry for every known widget in `items`.
    ///
    /// Under `OverlapPolicy::Reject` the batch is applied all-or-nothing.
    /// Items naming unknown widgets are ignored. Returns how many widgets
    /// changed.
    pub fn reconcile_items(&mut self, items: &[LayoutItem]) -> SyncResult<usize> {
        self.ensure_ready()?;
        let constraints = self.config.constraints;
        let mut layout = self.shared.write_layout();
        let mut staged = layout.clone();
        let mut changed = Vec::new();

        for item in items {
            let id = item.widget_id();
            let footprint = item.to_footprint(&constraints);
            match staged.get_mut(&id) {
                Some(widget) if widget.footprint != footprint => {
                    widget.footprint = footprint;
                    changed.push(id);
                }
                Some(_) => {}
                None => tracing::debug!("Ignoring layout item for unknown widget {}", id),
            }
        }

        for id in &changed {
            let footprint = current_footprint(&staged, id)?;
            enforce_policy(self.config.overlap_policy, &staged, id, &footprint)?;
        }

        *layout = staged;
        Ok(changed.len())
    }

    /// Place a new widget of the default size, add it to memory and append it
    /// to the store.
    ///
    /// `hint` is the size the UI suggested for its creation dialog; placement
    /// always uses the configured default size. A full grid places the widget
    /// just below the last row. A failed append is reported, not returned:
    /// the widget stays in memory.
    pub async fn add_widget(
        &mut self,
        kind: WidgetKind,
        hint: Option<WidgetFootprint>,
        payload: WidgetPayload,
    ) -> SyncResult<Widget> {
        self.ensure_ready()?;
        let constraints = self.config.constraints;

        let widget = {
            let mut layout = self.shared.write_layout();
            let placement = find_position(
                layout.widgets(),
                constraints.default_w,
                constraints.default_h,
                layout.bounds(),
            );
            if placement.is_grid_full() {
                tracing::warn!(
                    "Directory {} grid is full; placing {} widget below the last row",
                    self.shared.directory_id,
                    kind
                );
            }

            let footprint = WidgetFootprint::at(
                placement.position(),
                constraints.default_w,
                constraints.default_h,
            );
            let widget = Widget::new(kind, footprint).with_payload(payload);
            layout.push(widget.clone())?;
            widget
        };
        tracing::debug!(?hint, "Added {} widget {} at {:?}", widget.kind, widget.id, widget.footprint);

        let appended = self
            .shared
            .store
            .append_widget_atomic(&self.shared.directory_id, &widget)
            .await;
        match appended {
            Ok(()) => self.shared.health.record_success(),
            Err(err) => self.shared.report_failure("Couldn't save new widget", &err),
        }
        Ok(widget)
    }

    /// Remove a widget and schedule a save
    pub fn remove_widget(&mut self, id: &WidgetId) -> SyncResult<Widget> {
        self.ensure_ready()?;
        let removed = self.shared.write_layout().remove(id)?;
        tracing::debug!("Removed {} widget {}", removed.kind, removed.id);
        self.schedule_save();
        Ok(removed)
    }

    /// Schedule a debounced save of the full in-memory list.
    ///
    /// The list is read when the timer fires, so it carries every edit made
    /// up to that moment.
    pub fn schedule_save(&mut self) {
        let shared = self.shared.clone();
        self.debouncer.schedule(move || async move {
            // Failures are reported inside; the next save retries implicitly.
            let _ = shared.save_widget_list().await;
        });
    }

    /// Cancel the debounce timer and save right now
    pub async fn flush(&mut self) -> SyncResult<()> {
        self.ensure_ready()?;
        self.debouncer.cancel();
        self.shared.save_widget_list().await?;
        Ok(())
    }

    // ========== Presentation events ==========

    /// Continuous drag/resize feedback: memory only, no save
    pub fn on_layout_change(&mut self, items: &[LayoutItem]) {
        if let Err(err) = self.reconcile_items(items) {
            log_event_error("layout change", &err);
        }
    }

    /// End of a drag: take over the final layout and schedule a save
    pub fn on_drag_stop(&mut self, items: &[LayoutItem]) {
        match self.reconcile_items(items) {
            Ok(_) => self.schedule_save(),
            Err(err) => log_event_error("drag stop", &err),
        }
    }

    /// End of a resize: take over the final layout, re-apply the floor to
    /// the resized widget and schedule a save
    pub fn on_resize_stop(&mut self, items: &[LayoutItem], old_item: &LayoutItem, new_item: &LayoutItem) {
        tracing::debug!(
            "Resize of {} from {}x{} to {}x{}",
            new_item.i,
            old_item.w,
            old_item.h,
            new_item.w,
            new_item.h
        );
        let footprint = new_item.to_footprint(&self.config.constraints);
        let result = self
            .reconcile_items(items)
            .and_then(|_| self.apply_resize(&new_item.widget_id(), footprint));
        match result {
            Ok(_) => self.schedule_save(),
            Err(err) => log_event_error("resize stop", &err),
        }
    }

    /// User picked a widget to add
    pub async fn on_add_item(&mut self, kind: WidgetKind, payload: WidgetPayload) -> Option<Widget> {
        match self.add_widget(kind, None, payload).await {
            Ok(widget) => Some(widget),
            Err(err) => {
                log_event_error("add item", &err);
                None
            }
        }
    }

    /// User removed a widget
    pub fn on_remove(&mut self, id: &WidgetId) {
        if let Err(err) = self.remove_widget(id) {
            log_event_error("remove", &err);
        }
    }
}

impl<S: WidgetStore + 'static> Drop for LayoutSynchronizer<S> {
    fn drop(&mut self) {
        if self.debouncer.is_pending() {
            tracing::info!(
                "Closing directory {} with a layout save still pending; it will not be written",
                self.shared.directory_id
            );
        }
    }
}

fn current_footprint(layout: &DirectoryLayout, id: &WidgetId) -> SyncResult<WidgetFootprint> {
    layout
        .get(id)
        .map(|widget| widget.footprint)
        .ok_or_else(|| GridError::WidgetNotFound(id.clone()).into())
}

fn enforce_policy(
    policy: OverlapPolicy,
    layout: &DirectoryLayout,
    id: &WidgetId,
    candidate: &WidgetFootprint,
) -> SyncResult<()> {
    if policy == OverlapPolicy::Trust {
        return Ok(());
    }
    if !fits(candidate, layout.bounds()) {
        return Err(SyncError::Rejected {
            id: id.clone(),
            reason: "outside the grid".to_string(),
        });
    }
    if let Some(other) = layout.first_collision(Some(id), candidate) {
        return Err(SyncError::Rejected {
            id: id.clone(),
            reason: format!("overlaps widget {}", other.id),
        });
    }
    Ok(())
}

fn log_event_error(event: &str, err: &SyncError) {
    match err {
        SyncError::NotReady => tracing::debug!("Ignoring {} while loading", event),
        _ => tracing::warn!("Ignoring {}: {}", event, err),
    }
}
