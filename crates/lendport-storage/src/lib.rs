//! Lendport Storage Library
//!
//! Object-storage side of the upload workflow:
//!
//! - the `StorageTransfer` capability and its presigned-PUT implementation
//! - storage key naming for newly issued credentials
//! - an S3 presigner that issues upload credentials in-process
//!
//! # Storage key format
//!
//! `{owner_id}/{YYYY-MM-DD}-{version}-{unique_id}.{ext}`. Owner ids must not be
//! empty and must not contain `/` or `..`.

pub mod keys;
#[cfg(feature = "presigner-s3")]
pub mod s3;
pub mod traits;
pub mod transfer;

// Re-export commonly used types
pub use keys::generate_storage_key;
#[cfg(feature = "presigner-s3")]
pub use s3::S3Presigner;
pub use traits::{StorageError, StorageResult, StorageTransfer};
pub use transfer::PresignedPutTransfer;
