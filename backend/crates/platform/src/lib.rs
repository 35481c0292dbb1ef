//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (HMAC-SHA256, base64url, random bytes)
//! - Password policy and hashing (Argon2id)
//! - Time source abstraction
//! - Bearer credential parsing

pub mod client;
pub mod clock;
pub mod crypto;
pub mod password;
