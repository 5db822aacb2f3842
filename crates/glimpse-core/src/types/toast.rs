use serde::{Deserialize, Serialize};

/// Visual flavor of a notification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastVariant {
    #[default]
    Default,
    Destructive,
    Success,
}

/// An ephemeral user-facing notification.
///
/// Lives in the process-wide notification bus, not in any one consumer;
/// removed automatically after a fixed interval or by explicit dismissal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Toast {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub variant: ToastVariant,
}

impl Toast {
    /// Create a toast with a fresh random id
    pub fn new(
        title: impl Into<String>,
        description: Option<String>,
        variant: ToastVariant,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            description,
            variant,
        }
    }
}
