pub mod blacklist_entry;
pub mod user;
