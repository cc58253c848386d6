//! Backup file naming: `backup-<type>-<timestamp>.json`.

use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::error::{BackupError, Result};
use crate::kind::SnapshotType;
use crate::utils::datetime::{format_backup_timestamp, parse_backup_timestamp};

const PREFIX: &str = "backup-";
const EXTENSION: &str = ".json";

/// File name for a backup of `snapshot_type` taken at `created_at`.
pub fn backup_filename(snapshot_type: SnapshotType, created_at: DateTime<Utc>) -> String {
    format!("{PREFIX}{snapshot_type}-{}{EXTENSION}", format_backup_timestamp(created_at))
}

/// Recover type and creation time from a conforming file name.
pub fn parse_backup_filename(name: &str) -> Option<(SnapshotType, DateTime<Utc>)> {
    let stem = name.strip_prefix(PREFIX)?.strip_suffix(EXTENSION)?;
    let (snapshot_type, stamp) = stem.split_once('-')?;
    Some((SnapshotType::from_str(snapshot_type).ok()?, parse_backup_timestamp(stamp)?))
}

/// Reject anything that is not a plain, conforming backup file name.
///
/// Runs before any filesystem access, so a crafted name cannot address a path
/// outside the backup directory.
pub fn validate_backup_filename(name: &str) -> Result<(SnapshotType, DateTime<Utc>)> {
    let escapes = name.is_empty()
        || name.starts_with('.')
        || name.contains("..")
        || name.chars().any(|c| matches!(c, '/' | '\\' | ':' | '\0'));
    if escapes {
        return Err(BackupError::InvalidName(name.to_string()));
    }
    parse_backup_filename(name).ok_or_else(|| BackupError::InvalidName(name.to_string()))
}
