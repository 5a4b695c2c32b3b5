pub mod error;
pub mod json_store;
pub mod note;

pub use error::StorageError;
pub use json_store::JsonStore;
