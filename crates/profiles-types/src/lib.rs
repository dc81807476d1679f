pub mod errors;
pub mod models;
pub mod store;

pub use errors::{StoreError, ValidationError};
pub use models::{Account, Credential, FeedEntry, NewFeedEntry, MAX_FIELD_LEN};
pub use store::{AccountStore, FeedStore};
