//! Account catalog: identity documents and encrypted key blobs on disk.

pub mod store;
pub mod types;

pub use store::AccountStore;
pub use types::{DecryptedKeySet, Handle, Identity, KeyDescriptor, KeyRecord};
