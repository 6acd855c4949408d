//! Domain building blocks shared by the database and HTTP crates.
//!
//! Everything in here is pure: no I/O, no async.

pub mod error;
pub mod pagination;
pub mod passport;
pub mod patch;
pub mod types;
