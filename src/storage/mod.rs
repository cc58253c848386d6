//! Content database access.
//!
//! The schema is derived from the SeaORM entities in [`crate::entities`]; the
//! foreign keys declared there are what the restore path checks against.

pub mod db;

pub use db::Store;
