pub mod error;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use store::{FileSessionStore, SessionStore, SESSION_KEY};
