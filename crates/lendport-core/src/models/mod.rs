//! Data models for the upload workflow

mod artifact_file;
pub mod upload;

pub use artifact_file::*;
pub use upload::*;
