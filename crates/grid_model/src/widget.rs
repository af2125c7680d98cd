//! Widgets placed on a directory grid

use crate::{WidgetFootprint, WidgetId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Kind-specific widget data, stored as extra fields on the widget record
pub type WidgetPayload = Map<String, Value>;

/// Record fields owned by the grid; payload entries with these names are dropped
pub const RESERVED_FIELDS: &[&str] = &["id", "name", "x", "y", "w", "h"];

/// Which feature renders a widget.
///
/// Persisted records name the kind with a string. Names this build does not
/// know (retired features, newer clients) are kept as `Unknown` so they
/// survive a load/persist cycle untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WidgetKind {
    Tasks,
    Events,
    Habits,
    Notes,
    Files,
    Chat,
    Table,
    Dictionary,
    Places,
    NodeGraph,
    Unknown(String),
}

impl WidgetKind {
    /// All kinds this build can render
    pub const KNOWN: [WidgetKind; 10] = [
        WidgetKind::Tasks,
        WidgetKind::Events,
        WidgetKind::Habits,
        WidgetKind::Notes,
        WidgetKind::Files,
        WidgetKind::Chat,
        WidgetKind::Table,
        WidgetKind::Dictionary,
        WidgetKind::Places,
        WidgetKind::NodeGraph,
    ];

    /// Name used in persisted records
    pub fn as_str(&self) -> &str {
        match self {
            WidgetKind::Tasks => "tasks",
            WidgetKind::Events => "events",
            WidgetKind::Habits => "habits",
            WidgetKind::Notes => "notes",
            WidgetKind::Files => "files",
            WidgetKind::Chat => "chat",
            WidgetKind::Table => "table",
            WidgetKind::Dictionary => "dictionary",
            WidgetKind::Places => "places",
            WidgetKind::NodeGraph => "nodeGraph",
            WidgetKind::Unknown(name) => name,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, WidgetKind::Unknown(_))
    }
}

impl From<&str> for WidgetKind {
    fn from(name: &str) -> Self {
        Self::KNOWN
            .iter()
            .find(|kind| kind.as_str() == name)
            .cloned()
            .unwrap_or_else(|| WidgetKind::Unknown(name.to_string()))
    }
}

impl From<String> for WidgetKind {
    fn from(name: String) -> Self {
        WidgetKind::from(name.as_str())
    }
}

impl From<WidgetKind> for String {
    fn from(kind: WidgetKind) -> Self {
        match kind {
            WidgetKind::Unknown(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A domain item placed on the grid.
///
/// Serializes to the persisted record shape:
/// `{"id", "name", "x", "y", "w", "h", ...payload}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    pub id: WidgetId,
    #[serde(rename = "name")]
    pub kind: WidgetKind,
    #[serde(flatten)]
    pub footprint: WidgetFootprint,
    #[serde(flatten)]
    pub payload: WidgetPayload,
}

impl Widget {
    /// Create a widget with a fresh id and empty payload
    pub fn new(kind: WidgetKind, footprint: WidgetFootprint) -> Self {
        Self::with_id(WidgetId::new(), kind, footprint)
    }

    pub fn with_id(id: WidgetId, kind: WidgetKind, footprint: WidgetFootprint) -> Self {
        Self {
            id,
            kind,
            footprint,
            payload: WidgetPayload::new(),
        }
    }

    /// Attach payload fields, dropping any that collide with record fields
    pub fn with_payload(mut self, mut payload: WidgetPayload) -> Self {
        for field in RESERVED_FIELDS {
            payload.remove(*field);
        }
        self.payload = payload;
        self
    }
}
