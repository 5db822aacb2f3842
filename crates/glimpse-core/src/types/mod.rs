pub mod image;
pub mod message;
pub mod session;
pub mod toast;

pub use image::{DataUrl, DataUrlError};
pub use message::{Message, Role};
pub use session::Session;
pub use toast::{Toast, ToastVariant};
