//! Observers for inspecting the counts held by a store.
//!
//! - [`table`] - Pretty-print counts as tables using the `tabled` crate
//!
//! The snapshot file itself is plain JSON (see [`crate::snapshot`]), so no
//! separate JSON observer is needed.
//!
//! # Feature Flags
//!
//! - `table` - Enables the [`table`] module
//! - `full` - Enables all observer modules

#[cfg(feature = "table")]
pub mod table;
