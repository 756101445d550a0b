//! Domain records stored in (or returned by) the backend.

pub mod account;
pub mod file;
pub mod post;
pub mod save;
pub mod user;
