//! Domain Layer
//!
//! Contains entities, value objects, token codecs and repository traits.

pub mod entity;
pub mod repository;
pub mod service;
pub mod value_object;

// Re-exports
pub use entity::{blacklist_entry::BlacklistEntry, user::User};
pub use repository::{InsertOutcome, RevocationRepository, RoleGrant, UserRepository};
