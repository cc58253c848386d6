//! cms-backup - backup and restore for CMS content
//!
//! This library moves the relational content of the CMS (users, sections,
//! categories, articles, news, reports, settings, messages and the activity
//! log) in and out of self-describing JSON snapshots, and restores them with
//! referential integrity preserved.
//!
//! # Modules
//!
//! The library is organized into several key modules:
//!
//! * [`snapshot`] - Snapshot encoding and validating decode
//! * [`restore`] - Dependency planning and transactional restore
//! * [`backup`] - Backup files on disk
//! * [`service`] - The facade used by route handlers and the CLI
//! * [`storage`] - Database connection and schema
//! * [`config`] - Application configuration management

/// Backup file management
pub mod backup;

/// Command line interface definitions
pub mod cli;

/// Configuration module for managing application settings
pub mod config;

/// Application constants and default values
pub mod constants;

/// SeaORM entity models for database tables
pub mod entities;

/// Error types
pub mod error;

/// Entity kinds, their dependencies and snapshot types
pub mod kind;

/// Logging setup
pub mod logger;

/// Repository layer for database operations
pub mod repositories;

/// Restore planning and application
pub mod restore;

/// Backup service facade
pub mod service;

/// Snapshot document codec
pub mod snapshot;

/// Database connection and schema setup
pub mod storage;

/// Utility functions for date/time handling and other helpers
pub mod utils;

pub use backup::{BackupFile, BackupManager};
pub use error::{BackupError, Result};
pub use kind::{EntityKind, SnapshotType};
pub use restore::{apply_restore, plan_restore, RestorePlan, RestoreResult};
pub use service::BackupService;
pub use snapshot::{decode, encode, Snapshot, CURRENT_FORMAT_VERSION};
pub use storage::Store;
