//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Mutations run in their own
//! transaction; a transaction that is dropped before `commit` (early return,
//! error, cancelled future) rolls back.

pub mod user_repo;
pub mod work_repo;

pub use user_repo::UserRepo;
pub use work_repo::WorkRepo;
