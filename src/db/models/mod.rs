//! Database models split into domain-specific modules.

pub mod consultation;
pub mod queue_entry;
pub mod user;

pub use consultation::*;
pub use queue_entry::*;
pub use user::*;
