//! Object-store abstraction for the intake backend
//!
//! The system of record is an external key->bytes object store with
//! list-by-prefix. This crate defines the `ObjectStore` trait, a local
//! filesystem backend for development and tests, a token-authenticated HTTP
//! blob backend for production, and the submission-specific store layer on
//! top of them.
//!
//! **Key format:** submissions live under `submissions/<id>.json`; uploaded
//! attachments under `uploads/<submission-id>-<file-name>`.

pub mod factory;
pub mod http;
pub mod keys;
pub mod local;
pub mod submissions;
pub mod traits;

pub use factory::create_object_store;
pub use http::HttpBlobStore;
pub use local::LocalStore;
pub use submissions::SubmissionStore;
pub use traits::{ObjectMeta, ObjectStore, PutOptions, StorageError, StorageResult, StoredObject};
