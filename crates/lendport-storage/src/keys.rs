//! Storage key generation for uploaded artifacts.
//!
//! Key format: `{owner_id}/{YYYY-MM-DD}-{version}-{unique_id}.{ext}`.

use crate::traits::{StorageError, StorageResult};
use chrono::NaiveDate;

const FALLBACK_EXTENSION: &str = "bin";

/// Generate the storage key for a new artifact revision.
///
/// The extension is the lowercase suffix after the last `.` of `file_name`,
/// or `bin` when the name has none.
pub fn generate_storage_key(
    owner_id: &str,
    version: u32,
    file_name: &str,
    date: NaiveDate,
    unique_id: &str,
) -> StorageResult<String> {
    validate_owner_id(owner_id)?;

    Ok(format!(
        "{}/{}-{}-{}.{}",
        owner_id,
        date.format("%Y-%m-%d"),
        version,
        unique_id,
        file_extension(file_name)
    ))
}

fn file_extension(file_name: &str) -> String {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.trim())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| ext.to_lowercase())
        .unwrap_or_else(|| FALLBACK_EXTENSION.to_string())
}

fn validate_owner_id(owner_id: &str) -> StorageResult<()> {
    if owner_id.trim().is_empty() {
        return Err(StorageError::InvalidKey("owner id is empty".to_string()));
    }
    if owner_id.contains('/') || owner_id.contains("..") {
        return Err(StorageError::InvalidKey(format!(
            "owner id must not contain '/' or '..': {}",
            owner_id
        )));
    }
    Ok(())
}
