pub mod controller;
pub mod notify;
pub mod server;

pub use controller::{AppController, ChatOutcome, ControllerError, Panel, UiSnapshot};
pub use notify::{NotificationBus, ToastSubscription, TOAST_TTL};
pub use server::{create_router, run_server, AppState, ServerConfig};
