//! Lendport upload workflow
//!
//! `UploadCoordinator` drives the presigned upload of one artifact: request a
//! write credential, PUT the bytes, hand back the storage key.

pub mod coordinator;

pub use coordinator::UploadCoordinator;
