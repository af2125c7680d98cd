//! Session context injected by the host application

use serde::{Deserialize, Serialize};

/// Color theme the grid is rendered with
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

/// Who is editing and how the UI is dressed.
///
/// Passed explicitly to each session instead of being read from globals.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionContext {
    /// Signed-in user, if known
    pub user_id: Option<String>,
    pub theme: Theme,
}

impl SessionContext {
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            ..Self::default()
        }
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// User label for log lines
    pub fn user_label(&self) -> &str {
        self.user_id.as_deref().unwrap_or("anonymous")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_label() {
        assert_eq!(SessionContext::default().user_label(), "anonymous");
        assert_eq!(SessionContext::for_user("ada").user_label(), "ada");
    }

    #[test]
    fn test_context_json() {
        let context = SessionContext::for_user("ada").with_theme(Theme::Dark);
        let json = serde_json::to_value(&context).unwrap();
        assert_eq!(json["userId"], "ada");
        assert_eq!(json["theme"], "dark");

        let parsed: SessionContext = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, SessionContext::default());
    }
}
