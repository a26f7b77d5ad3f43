//! The single shared table: actor, handle, and message types.

pub mod actor;
pub mod config;
pub mod messages;

pub use actor::{TableActor, TableHandle};
pub use config::TableConfig;
pub use messages::{TableError, TableMessage, TableView};
