//! API endpoint modules organized by category.
//!
//! Each module provides typed methods for a group of related backend endpoints.

pub mod account;
pub mod avatars;
pub mod databases;
pub mod storage;
