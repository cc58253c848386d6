//! Constants used throughout the application
//!
//! This module centralizes file names, defaults, and user-facing messages.

// Application paths
pub const APP_DIR_NAME: &str = "cms-backup";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const LOCAL_CONFIG_FILE_NAME: &str = "cms-backup.toml";

// Storage defaults
pub const DEFAULT_DATABASE_URL: &str = "sqlite://cms.db?mode=rwc";
pub const DEFAULT_BACKUP_DIR: &str = "backups";
/// Largest import payload accepted by default (50 MiB)
pub const DEFAULT_MAX_IMPORT_BYTES: usize = 50 * 1024 * 1024;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 4;

// Logging defaults
pub const DEFAULT_LOG_LEVEL: &str = "info";

// Success Messages
pub const SUCCESS_BACKUP_CREATED: &str = "✅ Backup created successfully";
pub const SUCCESS_BACKUP_DELETED: &str = "✅ Backup deleted successfully";
pub const SUCCESS_DATA_IMPORTED: &str = "✅ Data imported successfully";

// Error Messages
pub const ERROR_BACKUP_CREATE_FAILED: &str = "❌ Failed to create backup";
pub const ERROR_BACKUP_DELETE_FAILED: &str = "❌ Failed to delete backup";
pub const ERROR_BACKUP_READ_FAILED: &str = "❌ Failed to read backup";
pub const ERROR_IMPORT_FAILED: &str = "❌ Failed to import data";

// UI Messages
pub const CONFIG_GENERATED: &str = "✅ Generated default configuration file";
pub const NO_BACKUPS_FOUND: &str = "📭 No backups found";
