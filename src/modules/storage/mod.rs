//! Storage module for file management
//!
//! Provides the on-disk layout for uploaded bytes together with the content
//! digest and MIME helpers used while accepting an upload.

mod digest;
mod local_storage;
mod mime;

pub use digest::{ContentDigest, Sha256Digest};
pub use local_storage::{LocalStorage, RemoveOutcome};
pub use mime::{extension_of, resolve_mime_type, sanitize_file_name};
