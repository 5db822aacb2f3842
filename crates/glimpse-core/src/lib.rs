pub mod types;

// Re-export core types
pub use types::image::{DataUrl, DataUrlError};
pub use types::message::{Message, Role};
pub use types::session::Session;
pub use types::toast::{Toast, ToastVariant};
