//! Utility modules shared by the backup manager and the command line.
//!
//! - [`datetime`] - backup timestamps and human-readable ages
//! - [`size`] - human-readable byte sizes

pub mod datetime;
pub mod size;
