//! Infrastructure Layer
//!
//! Storage implementations and mail delivery.

pub mod mail;
pub mod memory;
pub mod postgres;

pub use mail::{LogMailer, RecordingMailer};
pub use memory::InMemoryAuthRepository;
pub use postgres::PgAuthRepository;
