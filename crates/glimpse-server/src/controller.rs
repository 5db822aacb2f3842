//! Application controller - sequences user actions into the gateway, the
//! session store and the notification bus, and tracks coarse UI state.

use std::sync::Arc;

use glimpse_core::{DataUrl, DataUrlError, Message, Session, ToastVariant};
use glimpse_llm::{GatewayClient, GatewayReply};
use glimpse_session::SessionStore;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::notify::NotificationBus;

/// Which panel the client should show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Panel {
    Upload,
    Chat,
}

/// Controller-level failures. These occur before any network call; the
/// gateway itself never errors.
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("another {0} request is already in flight")]
    Busy(&'static str),

    #[error("invalid screenshot: {0}")]
    InvalidImage(#[from] DataUrlError),
}

/// Result of a send-message flow
#[derive(Debug)]
pub struct ChatOutcome {
    pub reply: GatewayReply,
    /// The appended assistant message; absent when the reply arrived after
    /// the session was cleared and was discarded.
    pub message: Option<Message>,
}

/// Read-only view of the controller state for client hydration
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UiSnapshot {
    pub session: Session,
    pub active_panel: Panel,
    pub is_processing: bool,
    pub is_responding: bool,
}

struct UiState {
    session: Session,
    active_panel: Panel,
    is_processing: bool,
    is_responding: bool,
    /// Bumped on every clear; completions captured under an older epoch are
    /// discarded so a stale reply cannot resurrect a cleared session.
    epoch: u64,
}

impl UiState {
    fn new() -> Self {
        Self {
            session: Session::new(),
            active_panel: Panel::Upload,
            is_processing: false,
            is_responding: false,
            epoch: 0,
        }
    }
}

pub struct AppController {
    gateway: GatewayClient,
    store: Arc<dyn SessionStore>,
    notify: NotificationBus,
    state: Mutex<UiState>,
}

impl AppController {
    pub fn new(
        gateway: GatewayClient,
        store: Arc<dyn SessionStore>,
        notify: NotificationBus,
    ) -> Self {
        Self {
            gateway,
            store,
            notify,
            state: Mutex::new(UiState::new()),
        }
    }

    /// Load the persisted session, if any. A restored screenshot drops the
    /// client straight into the chat panel.
    pub async fn restore(&self) {
        match self.store.load().await {
            Ok(Some(saved)) => {
                let mut state = self.state.lock().await;
                if saved.screenshot.is_some() {
                    state.active_panel = Panel::Chat;
                }
                state.session = saved;
                tracing::info!("restored persisted session");
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("failed to load persisted session: {e}"),
        }
    }

    /// Upload flow: validate the data URL, run extraction, store the text,
    /// switch to the chat panel. Success and fallback are indistinguishable
    /// here by design.
    pub async fn upload_screenshot(
        &self,
        image_data_url: &str,
    ) -> Result<GatewayReply, ControllerError> {
        let image: DataUrl = match image_data_url.parse() {
            Ok(image) => image,
            Err(e) => {
                self.notify.publish(
                    "Processing failed",
                    Some("Failed to extract text from the screenshot.".to_string()),
                    ToastVariant::Destructive,
                );
                return Err(ControllerError::InvalidImage(e));
            }
        };

        let epoch = {
            let mut state = self.state.lock().await;
            if state.is_processing {
                return Err(ControllerError::Busy("extraction"));
            }
            state.is_processing = true;
            state.session.screenshot = Some(image.to_string());
            state.epoch
        };
        self.persist().await;

        let reply = self.gateway.extract_text(&image).await;

        let stale = {
            let mut state = self.state.lock().await;
            state.is_processing = false;
            if state.epoch == epoch {
                state.session.extracted_text = reply.text.clone();
                state.active_panel = Panel::Chat;
                false
            } else {
                true
            }
        };
        if stale {
            tracing::debug!("discarding extraction that finished after the session was cleared");
            return Ok(reply);
        }

        self.persist().await;
        self.notify.publish(
            "Screenshot processed",
            Some("The text has been extracted successfully.".to_string()),
            ToastVariant::Success,
        );
        Ok(reply)
    }

    /// Send-message flow: append the user turn optimistically, ask the
    /// gateway, append the reply. Empty or whitespace-only input is ignored
    /// outright: no message, no network call, no notification.
    pub async fn send_message(
        &self,
        content: &str,
        context: &str,
    ) -> Result<Option<ChatOutcome>, ControllerError> {
        if content.trim().is_empty() {
            return Ok(None);
        }

        let epoch = {
            let mut state = self.state.lock().await;
            if state.is_responding {
                return Err(ControllerError::Busy("chat"));
            }
            state.is_responding = true;
            state.session.append_message(Message::user(content));
            state.epoch
        };
        self.persist().await;

        let reply = self.gateway.generate_chat_response(content, context).await;

        let message = {
            let mut state = self.state.lock().await;
            state.is_responding = false;
            if state.epoch == epoch {
                state
                    .session
                    .append_message(Message::assistant(reply.text.clone()));
                state.session.last_message().cloned()
            } else {
                tracing::debug!("discarding chat reply that finished after the session was cleared");
                None
            }
        };
        if message.is_some() {
            self.persist().await;
        }

        Ok(Some(ChatOutcome { reply, message }))
    }

    /// Clear flow: wipe state, delete the persisted record, return to the
    /// upload panel.
    pub async fn clear_session(&self) {
        {
            let mut state = self.state.lock().await;
            state.epoch += 1;
            state.session = Session::new();
            state.active_panel = Panel::Upload;
        }
        if let Err(e) = self.store.save(None).await {
            tracing::warn!("failed to delete persisted session: {e}");
        }
        self.notify.publish(
            "Session cleared",
            Some("All data has been cleared from this session.".to_string()),
            ToastVariant::Default,
        );
    }

    /// Current state for client hydration
    pub async fn snapshot(&self) -> UiSnapshot {
        let state = self.state.lock().await;
        UiSnapshot {
            session: state.session.clone(),
            active_panel: state.active_panel,
            is_processing: state.is_processing,
            is_responding: state.is_responding,
        }
    }

    /// Persistence is a side effect of state change: whenever the screenshot
    /// or message history is non-empty, the whole session is re-persisted.
    /// Store failures are logged, never surfaced to the user action.
    async fn persist(&self) {
        let session = {
            let state = self.state.lock().await;
            if state.session.is_empty() {
                return;
            }
            state.session.clone()
        };
        if let Err(e) = self.store.save(Some(&session)).await {
            tracing::warn!("failed to persist session: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use glimpse_core::Role;
    use glimpse_llm::GatewayConfig;
    use glimpse_session::StoreResult;
    use std::sync::Mutex as StdMutex;

    struct MemoryStore {
        value: StdMutex<Option<Session>>,
    }

    impl MemoryStore {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                value: StdMutex::new(None),
            })
        }

        fn stored(&self) -> Option<Session> {
            self.value.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SessionStore for MemoryStore {
        async fn save(&self, session: Option<&Session>) -> StoreResult<()> {
            *self.value.lock().unwrap() = session.cloned();
            Ok(())
        }

        async fn load(&self) -> StoreResult<Option<Session>> {
            Ok(self.stored())
        }
    }

    fn controller_with(store: Arc<MemoryStore>) -> (AppController, NotificationBus) {
        let notify = NotificationBus::new();
        let controller = AppController::new(
            GatewayClient::new(GatewayConfig::default()),
            store,
            notify.clone(),
        );
        (controller, notify)
    }

    const IMAGE: &str = "data:image/png;base64,iVBORw0KGgo=";

    #[tokio::test]
    async fn test_upload_extracts_and_switches_to_chat() {
        let store = MemoryStore::new();
        let (controller, notify) = controller_with(store.clone());

        let reply = controller.upload_screenshot(IMAGE).await.unwrap();
        assert!(reply.text.contains("Dashboard Overview"));

        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.active_panel, Panel::Chat);
        assert_eq!(snapshot.session.screenshot.as_deref(), Some(IMAGE));
        assert!(snapshot.session.extracted_text.contains("Total Users: 1,245"));
        assert!(!snapshot.is_processing);

        let persisted = store.stored().unwrap();
        assert_eq!(persisted, snapshot.session);

        let toasts = notify.snapshot();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].title, "Screenshot processed");
        assert_eq!(toasts[0].variant, ToastVariant::Success);
    }

    #[tokio::test]
    async fn test_invalid_image_is_rejected_before_any_call() {
        let store = MemoryStore::new();
        let (controller, notify) = controller_with(store.clone());

        let err = controller.upload_screenshot("not an image").await.unwrap_err();
        assert!(matches!(err, ControllerError::InvalidImage(_)));

        let snapshot = controller.snapshot().await;
        assert!(snapshot.session.is_empty());
        assert_eq!(snapshot.active_panel, Panel::Upload);
        assert!(store.stored().is_none());

        let toasts = notify.snapshot();
        assert_eq!(toasts[0].variant, ToastVariant::Destructive);
    }

    #[tokio::test]
    async fn test_send_message_appends_both_turns() {
        let store = MemoryStore::new();
        let (controller, _notify) = controller_with(store.clone());

        let outcome = controller
            .send_message("What is the revenue?", "Revenue: $12,450")
            .await
            .unwrap()
            .unwrap();
        assert!(outcome.reply.text.contains("$12,450"));

        let appended = outcome.message.unwrap();
        assert_eq!(appended.role, Role::Assistant);

        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.session.messages.len(), 2);
        assert_eq!(snapshot.session.messages[0].role, Role::User);
        assert_eq!(snapshot.session.messages[0].content, "What is the revenue?");
        assert!(!snapshot.is_responding);

        assert_eq!(store.stored().unwrap().messages.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_message_is_ignored() {
        let store = MemoryStore::new();
        let (controller, notify) = controller_with(store.clone());

        assert!(controller.send_message("", "ctx").await.unwrap().is_none());
        assert!(controller.send_message("   \n", "ctx").await.unwrap().is_none());

        let snapshot = controller.snapshot().await;
        assert!(snapshot.session.messages.is_empty());
        assert!(store.stored().is_none());
        assert!(notify.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_clear_resets_state_and_deletes_persisted_record() {
        let store = MemoryStore::new();
        let (controller, notify) = controller_with(store.clone());

        controller.upload_screenshot(IMAGE).await.unwrap();
        controller
            .send_message("What is this?", "Dashboard")
            .await
            .unwrap();
        assert!(store.stored().is_some());

        controller.clear_session().await;

        let snapshot = controller.snapshot().await;
        assert!(snapshot.session.is_empty());
        assert_eq!(snapshot.session.extracted_text, "");
        assert_eq!(snapshot.active_panel, Panel::Upload);
        assert!(store.stored().is_none());

        let titles: Vec<_> = notify.snapshot().into_iter().map(|t| t.title).collect();
        assert!(titles.contains(&"Session cleared".to_string()));
    }

    #[tokio::test]
    async fn test_restore_with_screenshot_opens_chat_panel() {
        let store = MemoryStore::new();
        let mut saved = Session::new();
        saved.screenshot = Some(IMAGE.to_string());
        saved.extracted_text = "Dashboard Overview".to_string();
        store.save(Some(&saved)).await.unwrap();

        let (controller, _notify) = controller_with(store);
        controller.restore().await;

        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.active_panel, Panel::Chat);
        assert_eq!(snapshot.session, saved);
    }

    #[tokio::test]
    async fn test_restore_without_screenshot_stays_on_upload() {
        let store = MemoryStore::new();
        let mut saved = Session::new();
        saved.append_message(Message::user("hello"));
        store.save(Some(&saved)).await.unwrap();

        let (controller, _notify) = controller_with(store);
        controller.restore().await;

        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.active_panel, Panel::Upload);
        assert_eq!(snapshot.session.messages.len(), 1);
    }
}
