//! Object storage module
//!
//! Source and destination locations for listing files (S3, R2, GCS, Azure
//! or a local directory), backed by `object_store`.

mod location;

pub use location::{join_key, StorageLocation};
