//! Application layer for doneit.
//!
//! This crate wires the task store, the session and the board together into
//! a [`TaskCoordinator`], and loads the project configuration shared by
//! front ends.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod session;
pub mod status;
pub mod task_store;

// Re-exports for convenience
pub use config::{ProjectConfig, SessionConfig, StoreConfig, ViewConfig};
pub use coordinator::TaskCoordinator;
pub use error::TaskError;
pub use session::{ENV_OWNER, SessionProvider, SharedSession, StaticSession, owner_from_env, resolve_owner};
pub use status::{Publisher, Statuses};
pub use task_store::TaskStore;
