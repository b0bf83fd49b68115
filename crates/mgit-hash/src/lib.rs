//! Object identity and digest computation for the mgit object store.
//!
//! This crate provides the `ObjectId` type (a 20-byte SHA-1 digest), the
//! streaming `Hasher` that produces it, and the hex encoding used wherever
//! an id is printed or accepted as an argument.

mod error;
pub mod hex;
mod oid;
pub mod hasher;

pub use error::HashError;
pub use oid::ObjectId;
